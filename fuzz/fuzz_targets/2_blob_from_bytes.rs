#![no_main]

use libfuzzer_sys::fuzz_target;
use paperkey::{Blob, DataType};

// decode paperkey data, checksums are ignored to get past them
fuzz_target!(|data: &[u8]| {
    for typ in [DataType::Auto, DataType::Raw, DataType::Base16] {
        if let Ok(blob) = Blob::from_bytes(data, typ, true) {
            let _ = blob.to_raw();
        }
    }
});
