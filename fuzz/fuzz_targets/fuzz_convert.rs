#![no_main]

use libfuzzer_sys::fuzz_target;
use omas_schema_core::{convert_value, ConvertOptions, Target};

// Arbitrary bytes, parsed as JSON, fed through both targets.
// Goal: errors, never panics.
fuzz_target!(|data: &[u8]| {
    if let Ok(document) = serde_json::from_slice::<serde_json::Value>(data) {
        let _ = convert_value(document.clone(), &ConvertOptions::default());
        let _ = convert_value(document, &ConvertOptions::with_target(Target::SearchMapping));
    }
});
