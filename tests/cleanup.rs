//! Tests for the retention sweep and size parsing.

use daylog::{Error, RetentionSweep, format_size, parse_size};
use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

const DAY: Duration = Duration::from_secs(86_400);

fn write_aged(path: &Path, content: &str, days: u32) {
    fs::write(path, content).unwrap();
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(SystemTime::now() - DAY * days)
        .unwrap();
}

#[test]
fn parse_size_units() {
    assert_eq!(parse_size("100").unwrap(), 100);
    assert_eq!(parse_size("1K").unwrap(), 1024);
    assert_eq!(parse_size("1kb").unwrap(), 1024);
    assert_eq!(parse_size("256M").unwrap(), 256 * 1024 * 1024);
    assert_eq!(parse_size("2G").unwrap(), 2 * 1024 * 1024 * 1024);
    assert_eq!(parse_size(" 10 MB ").unwrap(), 10 * 1024 * 1024);
}

#[test]
fn parse_size_rejects_garbage() {
    for bad in ["", "M", "1.5M", "-3K", "12T", "lots"] {
        assert!(
            matches!(parse_size(bad), Err(Error::InvalidSize(_))),
            "{bad:?} should be rejected"
        );
    }
    assert!(parse_size("99999999999999G").is_err());
}

#[test]
fn format_size_units() {
    assert_eq!(format_size(100), "100 B");
    assert_eq!(format_size(1536), "1.50 KB");
    assert_eq!(format_size(1024 * 1024), "1.00 MB");
    assert_eq!(format_size(1024 * 1024 * 1024), "1.00 GB");
}

#[test]
fn sweep_empty_directory() {
    let dir = tempdir().unwrap();
    let result = RetentionSweep::new(dir.path(), ".log", 7).run();
    assert_eq!(result.count(), 0);
    assert!(result.is_clean());
}

#[test]
fn sweep_deletes_only_expired_matching_files() {
    let dir = tempdir().unwrap();
    let old = dir.path().join("app_2026-01-01.log");
    let fresh = dir.path().join("app_2026-10-15.log");
    let other = dir.path().join("notes.txt");
    write_aged(&old, "old records", 10);
    write_aged(&fresh, "fresh records", 1);
    write_aged(&other, "not a log", 30);

    let result = RetentionSweep::new(dir.path(), ".log", 5).run();

    assert_eq!(result.deleted, vec![old.clone()]);
    assert_eq!(result.freed, "old records".len() as u64);
    assert!(result.is_clean());
    assert!(!old.exists());
    assert!(fresh.exists());
    assert!(other.exists());
}

#[test]
fn sweep_ignores_subdirectories() {
    let dir = tempdir().unwrap();
    let nested_dir = dir.path().join("archive.log");
    fs::create_dir(&nested_dir).unwrap();
    let nested = nested_dir.join("ancient.log");
    write_aged(&nested, "nested", 100);

    let result = RetentionSweep::new(dir.path(), ".log", 1).run();

    assert_eq!(result.count(), 0);
    assert!(nested_dir.is_dir());
    assert!(nested.exists());
}

#[test]
fn sweep_keeps_the_active_file() {
    let dir = tempdir().unwrap();
    let active = dir.path().join("app.log");
    let backup = dir.path().join("app_2026-01-01.log");
    write_aged(&active, "still writing", 40);
    write_aged(&backup, "rotated", 40);

    let result = RetentionSweep::new(dir.path(), ".log", 30)
        .keep(&active)
        .run();

    assert_eq!(result.deleted, vec![backup]);
    assert!(active.exists());
}

#[test]
fn negative_retention_disables_the_sweep() {
    let dir = tempdir().unwrap();
    let ancient = dir.path().join("app_2000-01-01.log");
    write_aged(&ancient, "ancient", 3650);

    let sweep = RetentionSweep::new(dir.path(), ".log", -1);
    assert!(sweep.cutoff(SystemTime::now()).is_none());
    assert_eq!(sweep.run().count(), 0);
    assert!(ancient.exists());
}

#[test]
fn cutoff_is_strict() {
    let dir = tempdir().unwrap();
    let edge = dir.path().join("edge.log");
    fs::write(&edge, "edge").unwrap();
    let mtime = fs::metadata(&edge).unwrap().modified().unwrap();

    let sweep = RetentionSweep::new(dir.path(), ".log", 2);
    assert_eq!(sweep.run_at(mtime + DAY * 2).count(), 0);
    assert!(edge.exists());
    assert_eq!(sweep.run_at(mtime + DAY * 2 + Duration::from_secs(1)).count(), 1);
    assert!(!edge.exists());
}

#[test]
fn missing_directory_is_reported_not_fatal() {
    let dir = tempdir().unwrap();
    let gone = dir.path().join("gone");
    let result = RetentionSweep::new(&gone, ".log", 1).run();
    assert_eq!(result.count(), 0);
    assert!(!result.is_clean());
}

#[test]
fn spawned_sweep_returns_its_result() {
    let dir = tempdir().unwrap();
    let old = dir.path().join("svc_2026-01-01.log");
    write_aged(&old, "bye", 9);

    let handle = RetentionSweep::new(dir.path(), ".log", 3).spawn().unwrap();
    let result = handle.join().unwrap();

    assert_eq!(result.count(), 1);
    assert!(!old.exists());
}
