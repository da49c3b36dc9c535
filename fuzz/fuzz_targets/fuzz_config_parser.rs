//! Fuzz target for config parsing and resolution.
//!
//! Goal: Parsing and resolving configuration should **never panic** on any
//! input. It may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only test valid UTF-8 strings (apiguard.toml must be UTF-8)
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(cfg) = apiguard_settings::parse_config_toml(text) {
            // Resolution rejects invalid configs with errors, never panics
            let _ = apiguard_settings::resolve_config(
                cfg,
                apiguard_settings::Overrides::default(),
            );
        }
    }
});
