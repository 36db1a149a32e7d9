//! # Blob module
//!
//! The portable form of the extracted secrets, either as raw octets or as base16 text.
//!
//! Both carry the same octets:
//!
//! ```text
//! a) 1 octet:  format version, 0
//! b) 1 octet:  key version
//! c) n octets: key fingerprint (16 octets for v3, 20 for v4, 32 for v6)
//! d) 2 octets: big endian length of the secret data
//! e) n octets: secret data, the s2k usage octet followed by the secret key fields
//! ```
//!
//! b) to e) repeat once per key and subkey.

use std::io;

use bytes::Buf;
use chrono::{DateTime, Utc};
use log::debug;

use crate::composed::ExtractRecord;
use crate::errors::{Error, Result};
use crate::options::ExtractOptions;
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::{base16, raw};

/// Version of the paperkey format.
pub const FORMAT_VERSION: u8 = 0;

/// Representation of paperkey data.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum DataType {
    /// Base16 when writing, detected when reading.
    #[default]
    Auto,
    #[cfg_attr(feature = "cli", value(name = "base16"))]
    Base16,
    Raw,
}

/// The extracted secrets of a keyring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    records: Vec<ExtractRecord>,
}

impl Blob {
    pub fn from_records(records: Vec<ExtractRecord>) -> Self {
        Blob { records }
    }

    pub fn records(&self) -> &[ExtractRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ExtractRecord> {
        self.records
    }

    pub fn to_raw(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.write_len() + 3);
        raw::write(self, &mut out)?;

        Ok(out)
    }

    /// Renders the base16 text, with `created_at` noted in the comment header if given.
    pub fn to_base16(
        &self,
        output_width: usize,
        created_at: Option<&DateTime<Utc>>,
    ) -> Result<String> {
        let mut out = Vec::new();
        base16::write(self, &mut out, output_width, &self.comments(created_at))?;

        String::from_utf8(out).map_err(|err| format_err!("invalid base16 output: {}", err))
    }

    /// Encodes according to the given options.
    pub fn to_bytes_with(&self, options: &ExtractOptions) -> Result<Vec<u8>> {
        match options.output_type() {
            DataType::Raw => self.to_raw(),
            DataType::Base16 | DataType::Auto => self
                .to_base16(options.output_width(), options.created_at())
                .map(String::into_bytes),
        }
    }

    pub fn from_raw(input: &[u8], ignore_checksum_errors: bool) -> Result<Self> {
        let data = raw::read(input, ignore_checksum_errors)?;
        Self::from_data(data, ignore_checksum_errors)
    }

    pub fn from_base16(input: &[u8], ignore_checksum_errors: bool) -> Result<Self> {
        let Ok(input) = std::str::from_utf8(input) else {
            malformed_blob!("base16 data is not valid text");
        };
        let data = base16::read(input, ignore_checksum_errors)?;
        Self::from_data(&data, ignore_checksum_errors)
    }

    /// Decodes paperkey data of the given type.
    ///
    /// With [`DataType::Auto`] the input is read as base16 if it has a numbered
    /// line, otherwise as raw octets.
    pub fn from_bytes(
        input: &[u8],
        typ: DataType,
        ignore_checksum_errors: bool,
    ) -> Result<Self> {
        match typ {
            DataType::Raw => Self::from_raw(input, ignore_checksum_errors),
            DataType::Base16 => Self::from_base16(input, ignore_checksum_errors),
            DataType::Auto => {
                if looks_like_base16(input) {
                    debug!("reading input as base16");
                    Self::from_base16(input, ignore_checksum_errors)
                } else {
                    debug!("reading input as raw");
                    Self::from_raw(input, ignore_checksum_errors)
                }
            }
        }
    }

    fn from_data(mut data: &[u8], ignore_checksum_errors: bool) -> Result<Self> {
        let version = data.read_u8().map_err(|_| Error::TruncatedBlob {
            needed: 1,
            remaining: 0,
        })?;
        if version != FORMAT_VERSION {
            unsupported_err!("paperkey format version {}", version);
        }

        let mut records = Vec::new();
        while data.has_remaining() {
            let record = ExtractRecord::from_buf(records.len(), &mut data)?;
            record.verify_checksum(ignore_checksum_errors)?;
            records.push(record);
        }

        if records.is_empty() {
            malformed_blob!("no secret keys");
        }

        Ok(Self::from_records(records))
    }

    fn comments(&self, created_at: Option<&DateTime<Utc>>) -> Vec<String> {
        let mut comments = Vec::new();
        if let Some(primary) = self.records.first() {
            comments.push(format!("Secret portions of key {:X}", primary.fingerprint()));
        }
        if let Some(created_at) = created_at {
            comments.push(format!(
                "Base16 data extracted {}",
                created_at.format("%a %b %e %H:%M:%S %Y")
            ));
        }
        comments.extend(
            [
                "",
                "File format:",
                "a) 1 octet:  Version of the paperkey format (currently 0).",
                "b) 1 octet:  OpenPGP key or subkey version (3, 4 or 6)",
                "c) n octets: Key fingerprint (16 octets for v3, 20 for v4, 32 for v6)",
                "d) 2 octets: 16-bit big endian length of the following secret data",
                "e) n octets: Secret data: a partial OpenPGP secret key or subkey packet,",
                "             starting with the string-to-key usage octet and continuing",
                "             until the end of the packet.",
                "Repeat fields b through e as needed to cover all subkeys.",
                "",
                "To recover a secret key by hand, append each secret data to the public",
                "key packet with the same fingerprint and change its packet tag from",
                "6 to 5 (14 to 7 for subkeys). All other packets are copied as they are.",
                "",
                "Each base16 line ends with a CRC-24 of that line.",
                "The entire block of data ends with a CRC-24 of the entire block of data.",
            ]
            .into_iter()
            .map(String::from),
        );

        comments
    }
}

impl Serialize for Blob {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&[FORMAT_VERSION])?;
        self.records.to_writer(writer)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        1 + self.records.write_len()
    }
}

/// Base16 data has at least one line starting with a line number and a colon.
fn looks_like_base16(input: &[u8]) -> bool {
    input
        .split(|b| *b == b'\n')
        .map(|line| line.trim_ascii_start())
        .filter(|line| !line.is_empty() && !line.starts_with(b"#"))
        .take(1)
        .any(|line| {
            let digits = line.iter().take_while(|b| b.is_ascii_digit()).count();
            digits > 0 && line[digits..].trim_ascii_start().starts_with(b":")
        })
}
