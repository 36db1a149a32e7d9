use std::num::TryFromIntError;

use snafu::{Backtrace, Snafu};

pub type Result<T, E = Error> = ::std::result::Result<T, E>;

pub use crate::parsing::{Error as ParsingError, RemainingError};

/// Error types
#[derive(Debug, Snafu)]
pub enum Error {
    /// The OpenPGP packet stream is structurally invalid.
    #[snafu(display("malformed packet stream: {message}"))]
    MalformedStream { message: String },
    /// The paperkey data is structurally invalid.
    #[snafu(display("malformed paperkey data: {message}"))]
    MalformedBlob { message: String },
    /// A record in the paperkey data announces more octets than are left.
    #[snafu(display("paperkey data is truncated: needed {needed} octets, {remaining} remaining"))]
    TruncatedBlob { needed: usize, remaining: usize },
    #[snafu(transparent)]
    UnexpectedEndOfStream { source: ParsingError },
    /// Passphrase protected secret keys can not be backed up.
    #[snafu(display(
        "secret key {index} is passphrase protected (s2k usage {s2k_usage}), remove the passphrase first"
    ))]
    EncryptedSecretKeyUnsupported { index: usize, s2k_usage: u8 },
    #[snafu(display("checksum mismatch on {what}: expected {expected:06X}, found {found:06X}"))]
    ChecksumMismatch {
        what: String,
        expected: u32,
        found: u32,
    },
    /// The public keyring and the paperkey data do not belong to the same key.
    #[snafu(display(
        "public keyring holds {public_keys} keys, but the paperkey data holds {records} secrets"
    ))]
    RecordCountMismatch { public_keys: usize, records: usize },
    #[snafu(display("unable to find a secret key packet"))]
    NoSecretKey,
    #[snafu(display("output width {width} is too small, must be at least {min}"))]
    InvalidOutputWidth { width: usize, min: usize },
    /// Signals key versions and algorithms we don't know how to scan.
    #[snafu(display("Unsupported: {message}"))]
    Unsupported { message: String },
    #[snafu(display("{message}"))]
    Message { message: String },
    #[snafu(transparent)]
    IO {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(transparent)]
    TryFromInt { source: TryFromIntError },
}

impl Error {
    /// Returns true if this error can be suppressed with `ignore_checksum_errors`.
    pub fn is_checksum_error(&self) -> bool {
        matches!(self, Self::ChecksumMismatch { .. })
    }
}

impl From<String> for Error {
    fn from(err: String) -> Error {
        Error::Message { message: err }
    }
}

impl From<derive_builder::UninitializedFieldError> for Error {
    fn from(err: derive_builder::UninitializedFieldError) -> Error {
        Error::Message {
            message: err.to_string(),
        }
    }
}

#[macro_export]
macro_rules! unsupported_err {
    ($e:expr) => {
        return Err($crate::errors::Error::Unsupported { message: $e.to_string()})
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::Unsupported { message: format!($fmt, $($arg)+) })
    };
}

#[macro_export]
macro_rules! malformed_stream {
    ($e:expr) => {
        return Err($crate::errors::Error::MalformedStream { message: $e.to_string() })
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::MalformedStream { message: format!($fmt, $($arg)+) })
    };
}

#[macro_export]
macro_rules! malformed_blob {
    ($e:expr) => {
        return Err($crate::errors::Error::MalformedBlob { message: $e.to_string() })
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::MalformedBlob { message: format!($fmt, $($arg)+) })
    };
}

#[macro_export]
macro_rules! bail {
    ($e:expr) => {
        return Err($crate::errors::Error::Message { message: $e.to_string() })
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::Message { message: format!($fmt, $($arg)+) })
    };
}

#[macro_export]
macro_rules! format_err {
    ($e:expr) => {
        $crate::errors::Error::Message { message: $e.to_string() }
    };
    ($fmt:expr, $($arg:tt)+) => {
        $crate::errors::Error::Message { message: format!($fmt, $($arg)+) }
    };
}

#[macro_export(local_inner_macros)]
macro_rules! ensure {
    ($cond:expr, $e:expr) => {
        if !($cond) {
            bail!($e);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)+) => {
        if !($cond) {
            bail!($fmt, $($arg)+);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_error_display() {
        let err = Error::ChecksumMismatch {
            what: "line 3".into(),
            expected: 0xB704CE,
            found: 0x12,
        };
        assert!(err.is_checksum_error());
        assert_eq!(
            err.to_string(),
            "checksum mismatch on line 3: expected B704CE, found 000012"
        );
    }

    #[test]
    fn record_count_display() {
        let err = Error::RecordCountMismatch {
            public_keys: 2,
            records: 1,
        };
        assert!(!err.is_checksum_error());
        assert_eq!(
            err.to_string(),
            "public keyring holds 2 keys, but the paperkey data holds 1 secrets"
        );
    }
}
