use md5::Md5;
use sha1::{Digest, Sha1};
use sha2::Sha256;

use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::errors::{Error, Result};
use crate::parsing::BufParsing;
use crate::types::{mpi, KeyVersion};

/// Represents a Fingerprint.
#[derive(Clone, Eq, PartialEq, derive_more::Debug)]
pub enum Fingerprint {
    #[debug("{}", hex::encode(_0))]
    V2([u8; 16]),
    #[debug("{}", hex::encode(_0))]
    V3([u8; 16]),
    #[debug("{}", hex::encode(_0))]
    V4([u8; 20]),
    #[debug("{}", hex::encode(_0))]
    V6([u8; 32]),
}

impl Fingerprint {
    pub fn new(version: KeyVersion, fp: &[u8]) -> Result<Self> {
        let invalid = |_| Error::MalformedBlob {
            message: format!(
                "invalid fingerprint length {} for key version {:?}",
                fp.len(),
                version
            ),
        };
        let fp = match version {
            KeyVersion::V2 => Fingerprint::V2(fp.try_into().map_err(invalid)?),
            KeyVersion::V3 => Fingerprint::V3(fp.try_into().map_err(invalid)?),
            KeyVersion::V4 => Fingerprint::V4(fp.try_into().map_err(invalid)?),
            KeyVersion::V6 => Fingerprint::V6(fp.try_into().map_err(invalid)?),
            KeyVersion::V5 | KeyVersion::Other(_) => {
                unsupported_err!("fingerprints of key version {:?}", version)
            }
        };

        Ok(fp)
    }

    /// Calculates the fingerprint of a key from the public part of its packet body.
    ///
    /// `public` runs from the version octet up to the end of the public key material.
    pub fn calculate(public: &[u8]) -> Result<Self> {
        let Some(&version) = public.first() else {
            malformed_stream!("empty key packet");
        };

        match KeyVersion::from(version) {
            KeyVersion::V4 => {
                let len: u16 = public.len().try_into()?;
                let mut h = Sha1::new();
                h.update([0x99]);
                h.update(len.to_be_bytes());
                h.update(public);
                Fingerprint::new(KeyVersion::V4, &h.finalize())
            }
            KeyVersion::V6 => {
                let len: u32 = public.len().try_into()?;
                let mut h = Sha256::new();
                h.update([0x9B]);
                h.update(len.to_be_bytes());
                h.update(public);
                Fingerprint::new(KeyVersion::V6, &h.finalize())
            }
            v @ (KeyVersion::V2 | KeyVersion::V3) => {
                let mut i = &public[1..];
                // created at, validity days
                i.skip(4 + 2)?;
                let alg = PublicKeyAlgorithm::from(i.read_u8()?);
                if !alg.is_rsa() {
                    unsupported_err!("v{} fingerprint of a {:?} key", version, alg);
                }

                let mut h = Md5::new();
                for _ in 0..2 {
                    let len = mpi::read_len(&mut i)?;
                    h.update(i.read_take(len)?);
                }
                Fingerprint::new(v, &h.finalize())
            }
            v => unsupported_err!("key version {:?}", v),
        }
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        match self {
            Self::V2(_) | Self::V3(_) => 16,
            Self::V4(_) => 20,
            Self::V6(_) => 32,
        }
    }

    pub fn version(&self) -> KeyVersion {
        match self {
            Self::V2(_) => KeyVersion::V2,
            Self::V3(_) => KeyVersion::V3,
            Self::V4(_) => KeyVersion::V4,
            Self::V6(_) => KeyVersion::V6,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::V2(fp) | Self::V3(fp) => &fp[..],
            Self::V4(fp) => &fp[..],
            Self::V6(fp) => &fp[..],
        }
    }
}

impl std::fmt::UpperHex for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode_upper(self.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn v4_fingerprint() {
        // sample v4 Ed25519Legacy key from RFC 9580
        let public = hex!(
            "04 53f35f0b 16 09 2b06010401da470f01 0107 40 3f098994bdd916ed4053197934e4a87c80733a1280d62f8010992e43ee3b2406"
        );
        let fp = Fingerprint::calculate(&public).unwrap();
        assert_eq!(fp.version(), KeyVersion::V4);
        assert_eq!(
            format!("{fp:X}"),
            "C959BDBAFA32A2F89A153B678CFDE12197965A9A"
        );
    }

    #[test]
    fn v6_fingerprint() {
        // sample v6 certificate from RFC 9580, primary key
        let public = hex!(
            "06 63877fe3 1b 00000020 f94da7bb48d60a61e567706a6587d0331999bb9d891a08242ead84543df895a3"
        );
        let fp = Fingerprint::calculate(&public).unwrap();
        assert_eq!(fp.len(), 32);
        assert_eq!(
            format!("{fp:X}"),
            "CB186C4F0609A697E4D52DFA6C722B0C1F1E27C18A56708F6525EC27BAD9ACC9"
        );
    }

    #[test]
    fn fingerprint_from_bytes() {
        assert!(Fingerprint::new(KeyVersion::V4, &[0u8; 20]).is_ok());
        assert!(Fingerprint::new(KeyVersion::V4, &[0u8; 16]).is_err());
        assert!(Fingerprint::new(KeyVersion::V5, &[0u8; 32]).is_err());
    }

    #[test]
    fn v3_requires_rsa() {
        // v3, created at, validity, DSA
        let public = hex!("03 00000000 0000 11 0001 01");
        assert!(matches!(
            Fingerprint::calculate(&public),
            Err(Error::Unsupported { .. })
        ));
    }
}
