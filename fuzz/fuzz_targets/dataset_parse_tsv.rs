#![no_main]

use libfuzzer_sys::fuzz_target;
use lloyd::Dataset;

fuzz_target!(|data: &[u8]| {
    if let Ok(ds) = Dataset::parse_tsv(data) {
        assert!(ds.len() > 0 && ds.dim() > 0);
    }
});
