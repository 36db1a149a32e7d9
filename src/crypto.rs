//! # Cryptography module
//!
//! Only what is needed to recognize key material and verify its checksums.

pub mod checksum;
pub mod public_key;
