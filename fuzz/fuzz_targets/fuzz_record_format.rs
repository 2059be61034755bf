#![no_main]
use chrono::Local;
use daylog::Level;
use daylog::fmt::{CallSite, DayStamp, RecordBuffer, short_path};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let _ = DayStamp::from_record(data.as_bytes());
    let _ = short_path(data);

    // Every rendered record is stamped and ends with exactly one newline
    let mut buf = RecordBuffer::new();
    buf.header(
        &Local::now().naive_local(),
        Level::Info,
        Some(CallSite::new(data, 1)),
        true,
    );
    buf.push_bytes(data.as_bytes());
    buf.finish_line();
    let line = buf.as_bytes();
    assert!(DayStamp::from_record(line).is_some());
    assert!(line.ends_with(b"\n") && !line.ends_with(b"\n\n"));
});
