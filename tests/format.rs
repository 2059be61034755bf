//! Tests for record formatting and buffer reuse.

use chrono::{NaiveDate, NaiveDateTime};
use daylog::Level;
use daylog::fmt::{BufferPool, CallSite, DayStamp, RecordBuffer, short_path};

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

fn render(build: impl FnOnce(&mut RecordBuffer)) -> String {
    let mut buf = RecordBuffer::new();
    build(&mut buf);
    String::from_utf8(buf.as_bytes().to_vec()).unwrap()
}

#[test]
fn header_is_zero_padded() {
    let line = render(|buf| {
        buf.header(&at(2026, 3, 7, 9, 5, 2), Level::Warn, None, false);
        buf.message(format_args!("disk at {}%", 91));
        buf.finish_line();
    });
    assert_eq!(line, "2026/03/07 09:05:02 [WARN] disk at 91%\n");
}

#[test]
fn header_with_full_call_site() {
    let line = render(|buf| {
        let site = CallSite::new("/srv/app/src/net/conn.rs", 42);
        buf.header(&at(2026, 10, 16, 23, 59, 59), Level::Error, Some(site), false);
        buf.message(format_args!("reset"));
        buf.finish_line();
    });
    assert_eq!(
        line,
        "2026/10/16 23:59:59 [ERROR] /srv/app/src/net/conn.rs:42 reset\n"
    );
}

#[test]
fn header_with_short_call_site() {
    let line = render(|buf| {
        let site = CallSite::new("/srv/app/src/net/conn.rs", 7);
        buf.header(&at(2026, 1, 1, 0, 0, 0), Level::Debug, Some(site), true);
        buf.message(format_args!("x"));
        buf.finish_line();
    });
    assert_eq!(line, "2026/01/01 00:00:00 [DEBUG] net/conn.rs:7 x\n");
}

#[test]
fn short_path_keeps_last_two_segments() {
    assert_eq!(short_path("/a/b/c/d.ext"), "c/d.ext");
    assert_eq!(short_path("src/lib.rs"), "src/lib.rs");
    assert_eq!(short_path("lib.rs"), "lib.rs");
    assert_eq!(short_path("/lib.rs"), "/lib.rs");
    assert_eq!(short_path("/src/lib.rs"), "/src/lib.rs");
    assert_eq!(short_path("a/b/c.rs"), "b/c.rs");
}

#[test]
fn values_are_joined_with_single_spaces() {
    let line = render(|buf| {
        buf.header(&at(2026, 5, 5, 5, 5, 5), Level::Info, None, false);
        buf.message_values(&[&"took", &12, &"ms", &1.5]);
        buf.finish_line();
    });
    assert_eq!(line, "2026/05/05 05:05:05 [INFO] took 12 ms 1.5\n");
}

#[test]
fn finish_line_leaves_exactly_one_newline() {
    for payload in ["done", "done\n", "done\n\n\n"] {
        let line = render(|buf| {
            buf.push_bytes(payload.as_bytes());
            buf.finish_line();
        });
        assert_eq!(line, "done\n");
    }
}

#[test]
fn day_stamp_reads_record_prefix() {
    let stamp = DayStamp::from_record(b"2026/10/16 12:00:00 [INFO] hi\n").unwrap();
    assert_eq!(stamp.as_str(), "2026/10/16");
    assert_eq!(
        stamp,
        DayStamp::from_date(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
    );
}

#[test]
fn day_stamp_rejects_unstamped_text() {
    assert!(DayStamp::from_record(b"hello world\n").is_none());
    assert!(DayStamp::from_record(b"2026-10-16 12:00:00").is_none());
    assert!(DayStamp::from_record(b"2026/10/1").is_none());
}

#[test]
fn pool_hands_out_cleared_buffers() {
    let pool = BufferPool::new();
    let mut buf = pool.acquire();
    buf.push_bytes(b"secret payload");
    pool.release(buf);
    assert_eq!(pool.idle(), 1);

    let reused = pool.acquire();
    assert!(reused.is_empty());
    assert!(reused.capacity() >= "secret payload".len());
    assert_eq!(pool.idle(), 0);
}

#[test]
fn pool_drops_oversized_buffers() {
    let pool = BufferPool::new();
    let mut buf = pool.acquire();
    buf.push_bytes(&vec![b'x'; 1024 * 1024]);
    pool.release(buf);
    assert_eq!(pool.idle(), 0);
}
