#![no_main]

use libfuzzer_sys::fuzz_target;
use lloyd::MapperRecord;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        let _ = MapperRecord::parse(line, 1);
    }
});
