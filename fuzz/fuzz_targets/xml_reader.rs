#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlenum::Reader;

fuzz_target!(|data: &[u8]| {
    for event in Reader::new(data) {
        if event.is_err() {
            break;
        }
    }
});
