#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Must not panic on any config content
    if let Ok(config) = daylog::Config::from_toml_str(data) {
        let _ = config.validate();
    }
});
