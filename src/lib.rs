//! # paperkey
//!
//! Backs up the secret part of an OpenPGP key in a compact form, and merges it back
//! into the public key to restore the full secret key.
//!
//! The public part of a key is large and can always be found again, on a keyserver
//! or in any keyring the key was shared with. The secret part is small enough to be
//! printed on paper:
//!
//! ```no_run
//! # fn main() -> paperkey::errors::Result<()> {
//! let secret_keyring = std::fs::read("secret.gpg")?;
//! let backup = paperkey::extract_to_blob(&secret_keyring, &Default::default())?;
//!
//! let public_keyring = std::fs::read("public.gpg")?;
//! let restored = paperkey::restore_from_blob(&public_keyring, &backup, &Default::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! Only unprotected secret keys can be backed up, remove the passphrase first.

#![forbid(unsafe_code)]

#[macro_use]
pub mod errors;

pub mod base16;
pub mod blob;
pub mod composed;
pub mod crypto;
pub mod options;
pub mod packet;
pub mod parsing;
pub mod raw;
pub mod ser;
pub mod types;

pub use self::blob::{Blob, DataType};
pub use self::composed::{extract, restore, ExtractRecord};
pub use self::options::{
    ExtractOptions, ExtractOptionsBuilder, RestoreOptions, RestoreOptionsBuilder,
};

use crate::errors::Result;

/// Extracts the secrets of a binary secret keyring and encodes them as configured.
pub fn extract_to_blob(secret_keyring: &[u8], options: &ExtractOptions) -> Result<Vec<u8>> {
    let records = extract(secret_keyring)?;
    Blob::from_records(records).to_bytes_with(options)
}

/// Decodes the secrets and restores them into a binary public keyring.
///
/// Returns the binary secret keyring.
pub fn restore_from_blob(
    public_keyring: &[u8],
    blob: &[u8],
    options: &RestoreOptions,
) -> Result<Vec<u8>> {
    let blob = Blob::from_bytes(blob, options.input_type(), options.ignore_checksum_errors())?;
    restore(public_keyring, blob.records())
}
