use std::io;

use bytes::Bytes;

use crate::errors::Result;
use crate::packet::{PacketHeader, SecretKey};
use crate::ser::Serialize;
use crate::types::{Fingerprint, KeyVersion, PacketLength, Tag};

/// A Public-Key or Public-Subkey packet.
///
/// The body is kept as is, it becomes the public part of the restored secret key.
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct PublicKey {
    tag: Tag,
    #[debug("{}", hex::encode(body))]
    body: Bytes,
}

impl PublicKey {
    pub fn from_body(tag: Tag, body: Bytes) -> Result<Self> {
        ensure!(tag.is_public_key(), "{:?} is not a public key packet", tag);
        if body.is_empty() {
            malformed_stream!("empty {:?} packet", tag);
        }

        Ok(Self { tag, body })
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn version(&self) -> KeyVersion {
        KeyVersion::from(self.body[0])
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn fingerprint(&self) -> Result<Fingerprint> {
        Fingerprint::calculate(&self.body)
    }

    /// Turns this key into the matching unprotected secret key packet.
    pub fn to_secret(&self, secret_material: &[u8]) -> Result<SecretKey> {
        let Some(tag) = self.tag.to_secret() else {
            bail!("{:?} has no secret counterpart", self.tag);
        };

        Ok(SecretKey::from_parts(
            tag,
            self.version(),
            self.body.clone(),
            secret_material,
        ))
    }
}

impl Serialize for PublicKey {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        PacketHeader::new_fixed(self.tag, self.body.len().try_into()?)?.to_writer(writer)?;
        writer.write_all(&self.body)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        1 + PacketLength::fixed_encoding_len(self.body.len() as u32) + self.body.len()
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::errors::Error;

    #[test]
    fn public_to_secret() {
        let body = hex!("06 63877fe3 1b 00000020 f94da7bb48d60a61e567706a6587d0331999bb9d891a08242ead84543df895a3");
        let key = PublicKey::from_body(Tag::PublicSubkey, Bytes::copy_from_slice(&body)).unwrap();
        assert_eq!(key.version(), KeyVersion::V6);
        assert_eq!(key.fingerprint().unwrap().len(), 32);

        let secret = key.to_secret(&[0x11; 32]).unwrap();
        assert_eq!(secret.tag(), Tag::SecretSubkey);
        let (public, s2k_usage, material) = secret.split();
        assert_eq!(public, &body[..]);
        assert_eq!(s2k_usage, 0);
        assert_eq!(material, &[0x11; 32][..]);
        assert_eq!(secret.fingerprint().unwrap(), key.fingerprint().unwrap());
    }

    #[test]
    fn empty_public_key() {
        assert!(matches!(
            PublicKey::from_body(Tag::PublicKey, Bytes::new()),
            Err(Error::MalformedStream { .. })
        ));
    }
}
