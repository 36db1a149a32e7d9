#![no_main]

use libfuzzer_sys::fuzz_target;
use paperkey::{Blob, ExtractOptionsBuilder};

// extract secrets from a binary keyring
fuzz_target!(|data: &[u8]| {
    let Ok(records) = paperkey::extract(data) else {
        return;
    };

    let blob = Blob::from_records(records);
    let _ = blob.to_raw();

    let options = ExtractOptionsBuilder::default()
        .output_width(14)
        .build()
        .unwrap();
    let _ = blob.to_bytes_with(&options);
});
