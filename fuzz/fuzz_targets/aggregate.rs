#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlenum::{render, Aggregator};

fuzz_target!(|data: &[u8]| {
    let mut aggregator = Aggregator::new("root");
    if aggregator.feed_bytes(data).is_ok() {
        let _ = render(aggregator.tree());
    }
});
