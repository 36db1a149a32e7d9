use std::io;

use bytes::Bytes;

use crate::errors::Result;
use crate::packet::{PacketHeader, PublicKey, SecretKey};
use crate::ser::Serialize;
use crate::types::{PacketLength, Tag};

/// Represents a Packet. A packet is the record structure used to encode a chunk of data in OpenPGP.
///
/// Only key packets are interpreted, everything else is carried as an [`OpaquePacket`].
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-packet-syntax>
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Packet {
    PublicKey(PublicKey),
    SecretKey(SecretKey),
    Other(OpaquePacket),
}

impl Packet {
    /// Builds a packet from its header and its complete body.
    pub fn from_parts(header: PacketHeader, body: &[u8]) -> Result<Self> {
        let tag = header.tag();
        let packet = if tag.is_secret_key() {
            Self::SecretKey(SecretKey::from_body(tag, body)?)
        } else if tag.is_public_key() {
            Self::PublicKey(PublicKey::from_body(tag, Bytes::copy_from_slice(body))?)
        } else {
            Self::Other(OpaquePacket {
                header,
                body: Bytes::copy_from_slice(body),
            })
        };

        Ok(packet)
    }

    pub fn tag(&self) -> Tag {
        match self {
            Self::PublicKey(p) => p.tag(),
            Self::SecretKey(p) => p.tag(),
            Self::Other(p) => p.tag(),
        }
    }
}

impl Serialize for Packet {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            Self::PublicKey(p) => p.to_writer(writer),
            Self::SecretKey(p) => p.to_writer(writer),
            Self::Other(p) => p.to_writer(writer),
        }
    }

    fn write_len(&self) -> usize {
        match self {
            Self::PublicKey(p) => p.write_len(),
            Self::SecretKey(p) => p.write_len(),
            Self::Other(p) => p.write_len(),
        }
    }
}

/// A packet that is passed through without looking at its body.
///
/// Serializing it always produces a new style header with a fixed length,
/// whatever framing it was read with.
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct OpaquePacket {
    header: PacketHeader,
    #[debug("{} bytes", body.len())]
    body: Bytes,
}

impl OpaquePacket {
    /// The header the packet was read with.
    pub fn packet_header(&self) -> &PacketHeader {
        &self.header
    }

    pub fn tag(&self) -> Tag {
        self.header.tag()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl Serialize for OpaquePacket {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        PacketHeader::new_fixed(self.tag(), self.body.len().try_into()?)?.to_writer(writer)?;
        writer.write_all(&self.body)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        1 + PacketLength::fixed_encoding_len(self.body.len() as u32) + self.body.len()
    }
}
