#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(bytes) = daylog::parse_size(data) {
        let _ = daylog::format_size(bytes);
    }
});
