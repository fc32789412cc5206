//! Fuzz target for reporter.json parsing and validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lsr_config::{validate_settings, ConfigPaths, ConfigSnapshot, ReporterSettings};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(settings) = ReporterSettings::from_json(text) {
        if validate_settings(&settings).is_ok() {
            let _ = ConfigSnapshot::new(&settings, &ConfigPaths::default(), Some(text));
        }
    }
});
