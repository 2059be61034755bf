//! Tests for the logger entry points, gating and dispatch.

use daylog::{Config, Level, Logger, LoggerBuilder};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::thread;
use tempfile::tempdir;

fn quiet(path: &Path) -> LoggerBuilder {
    Logger::builder()
        .path(path.to_string_lossy())
        .console(false)
        .flush_daemon(false)
        .signal_hook(false)
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn record_layout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = quiet(&path).build().unwrap();

    logger.info(format_args!("user {} logged in", "ada"));
    logger.flush().unwrap();

    let lines = lines(&path);
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert!(daylog::fmt::DayStamp::from_record(line.as_bytes()).is_some());
    assert_eq!(&line[10..11], " ");
    assert_eq!(&line[13..14], ":");
    assert_eq!(&line[19..], " [INFO] user ada logged in");
}

#[test]
fn threshold_drops_lower_levels() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = quiet(&path).level(Level::Warn).build().unwrap();

    logger.debug(format_args!("d"));
    logger.info(format_args!("i"));
    logger.warn(format_args!("w"));
    logger.error(format_args!("e"));
    logger.log(Level::Fatal, format_args!("f"));
    logger.flush().unwrap();

    let lines = lines(&path);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("[WARN] w"));
    assert!(lines[1].ends_with("[ERROR] e"));
    assert!(lines[2].ends_with("[FATAL] f"));
}

#[test]
fn set_level_applies_to_later_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = quiet(&path).build().unwrap();

    logger.debug(format_args!("before"));
    logger.set_level(Level::Error);
    assert_eq!(logger.level(), Level::Error);
    logger.debug(format_args!("after"));
    logger.flush().unwrap();

    let lines = lines(&path);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("[DEBUG] before"));
}

#[test]
fn values_are_space_joined() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = quiet(&path).build().unwrap();

    logger.warn_values(&[&"retry", &3, &"of", &5]);
    logger.flush().unwrap();

    assert!(lines(&path)[0].ends_with("[WARN] retry 3 of 5"));
}

#[test]
fn trailing_newlines_collapse_to_one() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = quiet(&path).build().unwrap();

    logger.info(format_args!("one\n"));
    logger.info(format_args!("two\n\n"));
    logger.info(format_args!("three"));
    logger.flush().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(!content.contains("\n\n"));
    assert_eq!(content.lines().count(), 3);
    assert!(content.ends_with("[INFO] three\n"));
}

#[test]
fn call_site_points_at_the_caller() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = quiet(&path).call_site(true).short_path(true).build().unwrap();

    let line = line!() + 1;
    logger.error(format_args!("boom"));
    daylog::info!(logger: logger, "via macro");
    let macro_line = line!() - 1;
    logger.flush().unwrap();

    let lines = lines(&path);
    assert!(
        lines[0].ends_with(&format!("[ERROR] tests/logger.rs:{line} boom")),
        "{}",
        lines[0]
    );
    assert!(
        lines[1].ends_with(&format!("[INFO] tests/logger.rs:{macro_line} via macro")),
        "{}",
        lines[1]
    );
}

#[test]
fn call_site_can_be_switched_off_at_runtime() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = quiet(&path).call_site(true).build().unwrap();

    logger.info(format_args!("with"));
    logger.set_call_site(false);
    logger.info(format_args!("without"));
    logger.flush().unwrap();

    let lines = lines(&path);
    assert!(lines[0].contains("logger.rs:"));
    assert!(lines[1].ends_with("[INFO] without"));
}

#[test]
fn concurrent_writers_never_interleave() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = quiet(&path).build().unwrap();
    let padding = "p".repeat(64);

    thread::scope(|s| {
        for t in 0..8 {
            let logger = &logger;
            let padding = &padding;
            s.spawn(move || {
                for i in 0..250 {
                    logger.info(format_args!("thread={t} seq={i} {padding}"));
                }
            });
        }
    });
    logger.flush().unwrap();

    let lines = lines(&path);
    assert_eq!(lines.len(), 8 * 250);
    let mut seen = HashSet::new();
    for line in &lines {
        let (_, message) = line.split_once(" [INFO] ").unwrap();
        assert!(message.starts_with("thread="));
        assert!(message.ends_with(&padding));
        assert!(seen.insert(message.to_string()));
    }
}

#[test]
fn flush_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = quiet(&path).build().unwrap();

    logger.flush().unwrap();
    assert!(!path.exists());

    logger.info(format_args!("once"));
    logger.flush().unwrap();
    let first = fs::read_to_string(&path).unwrap();
    logger.flush().unwrap();
    logger.flush().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), first);
}

#[test]
fn drop_flushes_buffered_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    {
        let logger = quiet(&path).build().unwrap();
        logger.info(format_args!("buffered"));
    }
    assert!(fs::read_to_string(&path).unwrap().ends_with("[INFO] buffered\n"));
}

#[test]
fn file_output_disabled_creates_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("app.log");
    let logger = quiet(&path).file_output(false).build().unwrap();

    logger.error(format_args!("console only"));
    logger.flush().unwrap();

    assert!(!path.exists());
    assert!(!dir.path().join("nested").exists());
}

#[test]
fn disabling_file_output_closes_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = quiet(&path).build().unwrap();

    logger.info(format_args!("kept"));
    logger.set_file_disabled(true);
    logger.info(format_args!("dropped"));
    logger.set_file_disabled(false);
    logger.info(format_args!("resumed"));
    logger.flush().unwrap();

    let lines = lines(&path);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("kept"));
    assert!(lines[1].ends_with("resumed"));
}

#[test]
fn set_path_switches_files() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.log");
    let second = dir.path().join("sub").join("second.log");
    let logger = quiet(&first).build().unwrap();

    logger.info(format_args!("a"));
    logger.set_path(&second.to_string_lossy());
    logger.info(format_args!("b"));
    logger.flush().unwrap();

    assert!(lines(&first)[0].ends_with("[INFO] a"));
    assert!(lines(&second)[0].ends_with("[INFO] b"));
    assert_eq!(logger.config().path, second.to_string_lossy());
}

#[test]
fn runtime_setters_apply_defaults_for_zero() {
    let dir = tempdir().unwrap();
    let logger = quiet(&dir.path().join("app.log")).build().unwrap();

    logger.set_max_size(0);
    logger.set_flush_interval(std::time::Duration::ZERO);
    logger.set_max_storage_days(-1);

    let config = logger.config();
    let defaults = Config::default();
    assert_eq!(config.max_size, defaults.max_size);
    assert_eq!(config.flush_interval, defaults.flush_interval);
    assert_eq!(config.max_storage_days, -1);
}

#[test]
fn writer_stamps_plain_text_and_splits_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = quiet(&path).level(Level::Error).build().unwrap();

    let mut writer = logger.writer();
    writeln!(writer, "request {} served in {}ms", 17, 3).unwrap();
    writer.write_all(b"first\nsecond\npartial").unwrap();
    writer.flush().unwrap();

    let lines = lines(&path);
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("[INFO] request 17 served in 3ms"));
    assert!(lines[1].ends_with("[INFO] first"));
    assert!(lines[2].ends_with("[INFO] second"));
    assert!(lines[3].ends_with("[INFO] partial"));
}

#[test]
fn writer_passes_stamped_records_through() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = quiet(&path).build().unwrap();
    let stamped = format!(
        "{} [WARN] from elsewhere\n",
        chrono::Local::now().format("%Y/%m/%d %H:%M:%S")
    );

    let mut writer = logger.writer();
    writer.write_all(stamped.as_bytes()).unwrap();
    drop(writer);
    logger.flush().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), stamped);
}
