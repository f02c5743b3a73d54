#![no_main]

use libfuzzer_sys::fuzz_target;
use lineprof::Selector;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Must never panic, whatever the input
        if let Ok(selector) = Selector::parse(input) {
            let _ = selector.matches(input);
            let _ = selector.to_string();
        }
    }
});
