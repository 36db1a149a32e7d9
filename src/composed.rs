//! # Composed module
//!
//! Walks whole keyrings: pulls the secret material out of a secret keyring
//! and merges it back into the matching public keyring.

mod extract;
mod record;
mod restore;

pub use self::{extract::extract, record::ExtractRecord, restore::restore};
