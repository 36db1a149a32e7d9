use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use bytes::Buf;
use zeroize::Zeroizing;

use crate::crypto::checksum;
use crate::errors::{Error, Result};
use crate::packet::SecretKey;
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::{Fingerprint, KeyVersion};

/// The secret material of a single key or subkey.
///
/// Records are matched to public keys purely by their position.
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct ExtractRecord {
    key_index: usize,
    fingerprint: Fingerprint,
    #[debug("{} secret octets", secret_material.len())]
    secret_material: Zeroizing<Vec<u8>>,
}

impl ExtractRecord {
    pub fn new(key_index: usize, fingerprint: Fingerprint, secret_material: &[u8]) -> Self {
        ExtractRecord {
            key_index,
            fingerprint,
            secret_material: Zeroizing::new(secret_material.to_vec()),
        }
    }

    /// Takes the secret material out of an unprotected secret key.
    pub fn from_secret_key(key_index: usize, key: &SecretKey) -> Result<Self> {
        let (_, s2k_usage, secret_material) = key.split();
        if s2k_usage != 0 {
            return Err(Error::EncryptedSecretKeyUnsupported {
                index: key_index,
                s2k_usage,
            });
        }

        if key.version().has_secret_checksum() && secret_material.len() < 2 {
            malformed_stream!(
                "secret key {} ends before its checksum ({} secret octets)",
                key_index,
                secret_material.len()
            );
        }

        let record = Self::new(key_index, key.fingerprint()?, secret_material);
        record.verify_checksum(false)?;

        Ok(record)
    }

    /// Position of the key among all keys and subkeys of the keyring.
    pub fn key_index(&self) -> usize {
        self.key_index
    }

    pub fn version(&self) -> KeyVersion {
        self.fingerprint.version()
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// The secret key fields following the s2k usage octet.
    pub fn secret_material(&self) -> &[u8] {
        &self.secret_material
    }

    /// Verifies the two octet checksum trailing the secret material of
    /// v2, v3 and v4 keys.
    pub fn verify_checksum(&self, ignore_checksum_errors: bool) -> Result<()> {
        if !self.version().has_secret_checksum() {
            return Ok(());
        }

        let Some(split) = self.secret_material.len().checked_sub(2) else {
            malformed_blob!(
                "secret data of key {} is too short for its checksum",
                self.key_index
            );
        };
        let (data, expected) = self.secret_material.split_at(split);
        let expected = u16::from_be_bytes([expected[0], expected[1]]);

        checksum::verify(
            || format!("secret data of key {}", self.key_index),
            expected.into(),
            checksum::simple(data).into(),
            ignore_checksum_errors,
        )
    }

    /// Reads a single record in the paperkey wire format.
    pub(crate) fn from_buf<B: Buf>(key_index: usize, i: &mut B) -> Result<Self> {
        Self::from_buf_inner(key_index, i).map_err(|err| match err {
            Error::UnexpectedEndOfStream { source } => Error::TruncatedBlob {
                needed: source.needed(),
                remaining: source.remaining(),
            },
            err => err,
        })
    }

    fn from_buf_inner<B: Buf>(key_index: usize, i: &mut B) -> Result<Self> {
        let version = KeyVersion::from(i.read_u8()?);
        let Some(fp_len) = version.fingerprint_len() else {
            malformed_blob!("unknown key version {:?} for key {}", version, key_index);
        };
        let fingerprint = Fingerprint::new(version, &i.read_take(fp_len)?)?;

        let len = i.read_be_u16()?;
        if len == 0 {
            malformed_blob!("empty secret data for key {}", key_index);
        }
        let s2k_usage = i.read_u8()?;
        if s2k_usage != 0 {
            malformed_blob!(
                "secret data of key {} is not unprotected (s2k usage {})",
                key_index,
                s2k_usage
            );
        }
        let secret_material = Zeroizing::new(i.read_take(usize::from(len) - 1)?.to_vec());

        Ok(ExtractRecord {
            key_index,
            fingerprint,
            secret_material,
        })
    }

    fn secret_len(&self) -> Result<u16> {
        // includes the s2k usage octet
        let len = self.secret_material.len() + 1;
        let Ok(len) = u16::try_from(len) else {
            unsupported_err!("secret data of {} octets for key {}", len, self.key_index);
        };

        Ok(len)
    }
}

impl Serialize for ExtractRecord {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        let len = self.secret_len()?;
        writer.write_u8(self.version().into())?;
        writer.write_all(self.fingerprint.as_bytes())?;
        writer.write_u16::<BigEndian>(len)?;
        writer.write_u8(0)?;
        writer.write_all(&self.secret_material)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        1 + self.fingerprint.len() + 2 + 1 + self.secret_material.len()
    }
}
