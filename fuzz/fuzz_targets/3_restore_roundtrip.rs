#![no_main]

use libfuzzer_sys::fuzz_target;
use paperkey::{Blob, DataType};

// restore fuzzed paperkey data into a fuzzed public keyring
fuzz_target!(|data: &[u8]| {
    let Some((&split, data)) = data.split_first() else {
        return;
    };
    let (public_keyring, blob) = data.split_at((split as usize).min(data.len()));
    let Ok(blob) = Blob::from_bytes(blob, DataType::Raw, true) else {
        return;
    };

    if let Ok(restored) = paperkey::restore(public_keyring, blob.records()) {
        let _ = paperkey::extract(&restored);
    }
});
