use std::io;

use bytes::Bytes;
use zeroize::Zeroizing;

use crate::errors::Result;
use crate::packet::public_key_parser::public_key_len;
use crate::packet::PacketHeader;
use crate::ser::Serialize;
use crate::types::{Fingerprint, KeyVersion, PacketLength, Tag};

/// A Secret-Key or Secret-Subkey packet, split into its public part and the
/// secret material that follows it.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-secret-key-packet-formats>
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct SecretKey {
    tag: Tag,
    version: KeyVersion,
    #[debug("{}", hex::encode(public))]
    public: Bytes,
    s2k_usage: u8,
    #[debug("..")]
    secret: Zeroizing<Vec<u8>>,
}

impl SecretKey {
    /// Parses the body of a secret key packet.
    ///
    /// Only the secret material is copied out of `body`, into a buffer that is wiped on drop.
    pub fn from_body(tag: Tag, body: &[u8]) -> Result<Self> {
        ensure!(tag.is_secret_key(), "{:?} is not a secret key packet", tag);

        let (version, public_len) = public_key_len(body)?;
        let (public, rest) = body.split_at(public_len);
        let public = Bytes::copy_from_slice(public);
        let Some((&s2k_usage, secret)) = rest.split_first() else {
            malformed_stream!("secret key packet ends before the s2k usage octet");
        };

        Ok(Self {
            tag,
            version,
            public,
            s2k_usage,
            secret: Zeroizing::new(secret.to_vec()),
        })
    }

    /// Builds an unprotected secret key from the public part of a key packet
    /// and its secret material.
    pub(crate) fn from_parts(tag: Tag, version: KeyVersion, public: Bytes, secret: &[u8]) -> Self {
        Self {
            tag,
            version,
            public,
            s2k_usage: 0,
            secret: Zeroizing::new(secret.to_vec()),
        }
    }

    /// Returns the public prefix, the s2k usage octet and the secret material.
    pub fn split(&self) -> (&[u8], u8, &[u8]) {
        (&self.public, self.s2k_usage, &self.secret)
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn version(&self) -> KeyVersion {
        self.version
    }

    pub fn s2k_usage(&self) -> u8 {
        self.s2k_usage
    }

    pub fn is_encrypted(&self) -> bool {
        self.s2k_usage != 0
    }

    pub fn fingerprint(&self) -> Result<Fingerprint> {
        Fingerprint::calculate(&self.public)
    }

    fn body_len(&self) -> usize {
        self.public.len() + 1 + self.secret.len()
    }
}

impl Serialize for SecretKey {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        PacketHeader::new_fixed(self.tag, self.body_len().try_into()?)?.to_writer(writer)?;
        writer.write_all(&self.public)?;
        writer.write_all(&[self.s2k_usage])?;
        writer.write_all(&self.secret)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        let body_len = self.body_len();
        1 + PacketLength::fixed_encoding_len(body_len as u32) + body_len
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::errors::Error;

    const PUBLIC: [u8; 51] = hex!(
        "04 53f35f0b 16 09 2b06010401da470f01 0107 40 3f098994bdd916ed4053197934e4a87c80733a1280d62f8010992e43ee3b2406"
    );

    #[test]
    fn split_secret_key() {
        let mut body = PUBLIC.to_vec();
        body.extend_from_slice(&hex!("00 00ff 1a2b 0145"));

        let key = SecretKey::from_body(Tag::SecretKey, &body).unwrap();
        let (public, s2k_usage, secret) = key.split();
        assert_eq!(public, &PUBLIC[..]);
        assert_eq!(s2k_usage, 0);
        assert_eq!(secret, &hex!("00ff 1a2b 0145")[..]);
        assert!(!key.is_encrypted());
        assert_eq!(key.version(), KeyVersion::V4);
        assert_eq!(
            format!("{:X}", key.fingerprint().unwrap()),
            "C959BDBAFA32A2F89A153B678CFDE12197965A9A"
        );
    }

    #[test]
    fn serialize_secret_key() {
        let key = SecretKey::from_parts(
            Tag::SecretSubkey,
            KeyVersion::V4,
            Bytes::from_static(&PUBLIC),
            &[0xAA, 0xBB],
        );
        let bytes = key.to_bytes().unwrap();
        assert_eq!(bytes.len(), key.write_len());
        assert_eq!(&bytes[..2], &[0xC7, 54]);
        assert_eq!(&bytes[2..53], &PUBLIC[..]);
        assert_eq!(&bytes[53..], &[0x00, 0xAA, 0xBB]);
    }

    #[test]
    fn missing_s2k_usage() {
        assert!(matches!(
            SecretKey::from_body(Tag::SecretKey, &PUBLIC),
            Err(Error::MalformedStream { .. })
        ));
    }

    #[test]
    fn protected_key() {
        let mut body = PUBLIC.to_vec();
        body.extend_from_slice(&hex!("fe 09 02 0a0b0c"));
        let key = SecretKey::from_body(Tag::SecretSubkey, &body).unwrap();
        assert!(key.is_encrypted());
        assert_eq!(key.s2k_usage(), 0xFE);
    }
}
