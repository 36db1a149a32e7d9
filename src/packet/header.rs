use byteorder::WriteBytesExt;
use bytes::Buf;
use log::debug;

use crate::errors::{Error, Result};
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::{PacketHeaderVersion, PacketLength, Tag};

/// Represents a packet header.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-packet-headers>
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PacketHeader {
    version: PacketHeaderVersion,
    tag: Tag,
    length: PacketLength,
}

/// Maximum size of partial packet length.
const MAX_PARTIAL_LEN: u32 = 2u32.pow(30);

impl PacketHeader {
    /// Parse a single packet header from the given buffer.
    pub fn from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let header = i.read_u8()?;

        let first_two_bits = header & 0b1100_0000;
        let res = match first_two_bits {
            0b1100_0000 => {
                // new starts with 0b11
                let tag = Tag::from(header & 0b0011_1111);
                if tag == Tag::Other(0) {
                    malformed_stream!("reserved packet tag 0");
                }
                new_length(&mut i).map(|length| PacketHeader {
                    version: PacketHeaderVersion::New,
                    tag,
                    length,
                })
            }
            0b1000_0000 => {
                // old starts with 0b10
                let tag = Tag::from((header >> 2) & 0b0000_1111);
                if tag == Tag::Other(0) {
                    malformed_stream!("reserved packet tag 0");
                }
                old_length(&mut i, header & 0b0000_0011).map(|length| PacketHeader {
                    version: PacketHeaderVersion::Old,
                    tag,
                    length,
                })
            }
            _ => {
                malformed_stream!("invalid packet header byte {:#010b}", header);
            }
        };

        res.map_err(|err| match err {
            Error::UnexpectedEndOfStream { source } => Error::MalformedStream {
                message: format!("truncated packet length: {}", source),
            },
            err => err,
        })
    }

    pub fn from_parts(
        version: PacketHeaderVersion,
        tag: Tag,
        length: PacketLength,
    ) -> Result<Self> {
        let raw_tag = u8::from(tag);
        ensure!(raw_tag != 0, "packet tag 0 is reserved");
        match version {
            PacketHeaderVersion::Old => {
                ensure!(
                    raw_tag < 16,
                    "tag is not compatible with old packet headers: {:?}",
                    tag
                );
                ensure!(
                    !matches!(length, PacketLength::Partial(_)),
                    "partial lengths are only supported in new style headers"
                );
            }
            PacketHeaderVersion::New => {
                ensure!(raw_tag < 64, "tag {:?} does not fit a packet header", tag);
                ensure!(
                    !matches!(length, PacketLength::Indeterminate),
                    "indeterminate packet length is only supported in old style headers"
                );
                if let PacketLength::Partial(l) = length {
                    ensure!(l.count_ones() == 1, "partial length must be a power of two");
                    ensure!(
                        l <= MAX_PARTIAL_LEN,
                        "partial length must be less or equal than {}",
                        MAX_PARTIAL_LEN
                    );
                }
            }
        }

        Ok(Self {
            version,
            tag,
            length,
        })
    }

    /// Creates a `New` style packet header with a definite length.
    pub fn new_fixed(tag: Tag, length: u32) -> Result<Self> {
        Self::from_parts(PacketHeaderVersion::New, tag, PacketLength::Fixed(length))
    }

    /// Returns the packet header version.
    pub const fn version(&self) -> PacketHeaderVersion {
        self.version
    }

    /// Returns the packet length.
    pub const fn packet_length(&self) -> PacketLength {
        self.length
    }

    /// Returns the packet tag.
    pub const fn tag(&self) -> Tag {
        self.tag
    }
}

pub(super) fn new_length<B: Buf>(i: &mut B) -> Result<PacketLength> {
    let olen = i.read_u8()?;
    let length = match olen {
        // One-Octet Lengths
        0..=191 => PacketLength::Fixed(olen.into()),
        // Two-Octet Lengths
        192..=223 => {
            let a = i.read_u8()?;
            let l = ((u32::from(olen) - 192) << 8) + 192 + u32::from(a);
            PacketLength::Fixed(l)
        }
        // Partial Body Lengths
        224..=254 => PacketLength::Partial(1 << (olen & 0x1F)),
        // Five-Octet Lengths
        255 => PacketLength::Fixed(i.read_be_u32()?),
    };

    Ok(length)
}

fn old_length<B: Buf>(i: &mut B, length_type: u8) -> Result<PacketLength> {
    let length = match length_type {
        // One-Octet Lengths
        0 => PacketLength::Fixed(i.read_u8()?.into()),
        // Two-Octet Lengths
        1 => PacketLength::Fixed(i.read_be_u16()?.into()),
        // Four-Octet Lengths
        2 => PacketLength::Fixed(i.read_be_u32()?),
        _ => PacketLength::Indeterminate,
    };

    Ok(length)
}

impl Serialize for PacketHeader {
    fn to_writer<W: std::io::Write>(&self, writer: &mut W) -> Result<()> {
        debug!("writing packet header {:?}", self);

        if self.version != PacketHeaderVersion::New {
            bail!("only new style packet headers are written");
        }
        writer.write_u8(0b1100_0000 | u8::from(self.tag))?;
        self.length.to_writer_new(writer)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        match self.length {
            PacketLength::Fixed(len) => 1 + PacketLength::fixed_encoding_len(len),
            _ => 1 + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn test_packet_length() {
        // # off=5053201 ctb=d1 tag=17 hlen=6 plen=4973 new-ctb
        // :attribute packet: [jpeg image of size 4951]
        let packet_header_raw = hex::decode(b"d1ff0000136d").unwrap();
        let header = PacketHeader::from_buf(&mut &packet_header_raw[..]).unwrap();

        assert_eq!(header.version(), PacketHeaderVersion::New);
        assert_eq!(header.tag(), Tag::UserAttribute);
        assert_eq!(header.packet_length(), PacketLength::Fixed(4973));
    }

    #[test]
    fn test_old_headers() {
        // secret key, two octet length
        let header = PacketHeader::from_buf(&[0x95, 0x01, 0xd8][..]).unwrap();
        assert_eq!(header.version(), PacketHeaderVersion::Old);
        assert_eq!(header.tag(), Tag::SecretKey);
        assert_eq!(header.packet_length(), PacketLength::Fixed(0x1d8));

        // public subkey, one octet length
        let header = PacketHeader::from_buf(&[0xb8, 0x0d][..]).unwrap();
        assert_eq!(header.tag(), Tag::PublicSubkey);
        assert_eq!(header.packet_length(), PacketLength::Fixed(13));

        // literal data, indeterminate length
        let header = PacketHeader::from_buf(&[0xaf][..]).unwrap();
        assert_eq!(header.tag(), Tag::LiteralData);
        assert_eq!(header.packet_length(), PacketLength::Indeterminate);
    }

    #[test]
    fn test_new_two_octet_length() {
        let header = PacketHeader::from_buf(&[0xc2, 0xc0, 0x6e][..]).unwrap();
        assert_eq!(header.tag(), Tag::Signature);
        assert_eq!(header.packet_length(), PacketLength::Fixed(302));

        let header = PacketHeader::from_buf(&[0xcb, 0xe2][..]).unwrap();
        assert_eq!(header.packet_length(), PacketLength::Partial(4));
    }

    #[test]
    fn test_invalid_headers() {
        // packet start bit missing
        assert!(matches!(
            PacketHeader::from_buf(&[0x3f, 0x00][..]),
            Err(Error::MalformedStream { .. })
        ));
        // truncated five octet length
        assert!(matches!(
            PacketHeader::from_buf(&[0xc5, 0xff, 0x00, 0x01][..]),
            Err(Error::MalformedStream { .. })
        ));
        // truncated old two octet length
        assert!(matches!(
            PacketHeader::from_buf(&[0x99, 0x01][..]),
            Err(Error::MalformedStream { .. })
        ));
        // nothing at all
        assert!(matches!(
            PacketHeader::from_buf(&[][..]),
            Err(Error::UnexpectedEndOfStream { .. })
        ));
    }

    #[test]
    fn test_reserved_tag() {
        for header in [[0x80, 0x01], [0xc0, 0x01]] {
            assert!(matches!(
                PacketHeader::from_buf(&header[..]),
                Err(Error::MalformedStream { .. })
            ));
        }
        assert!(PacketHeader::new_fixed(Tag::Other(0), 1).is_err());
    }

    #[test]
    fn test_old_headers_are_not_written() {
        let header = PacketHeader::from_buf(&[0x95, 0x01, 0xd8][..]).unwrap();
        assert!(header.to_bytes().is_err());
    }

    #[test]
    fn test_minimal_new_encoding() {
        for (len, expected) in [
            (0u32, &[0xc5, 0x00][..]),
            (191, &[0xc5, 0xbf]),
            (192, &[0xc5, 0xc0, 0x00]),
            (8383, &[0xc5, 0xdf, 0xff]),
            (8384, &[0xc5, 0xff, 0x00, 0x00, 0x20, 0xc0]),
        ] {
            let header = PacketHeader::new_fixed(Tag::SecretKey, len).unwrap();
            assert_eq!(header.to_bytes().unwrap(), expected, "length {}", len);
        }
    }

    impl Arbitrary for PacketHeader {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
            let length = prop_oneof![
                any::<u32>().prop_map(PacketLength::Fixed),
                (0u32..=30).prop_map(|l| PacketLength::Partial(1 << l)),
            ];

            (any::<Tag>(), length)
                .prop_map(|(tag, length)| PacketHeader {
                    version: PacketHeaderVersion::New,
                    tag,
                    length,
                })
                .boxed()
        }
    }

    proptest! {
        #[test]
        fn write_len(header: PacketHeader) {
            let mut buf = Vec::new();
            header.to_writer(&mut buf).unwrap();
            prop_assert_eq!(buf.len(), header.write_len());
        }

        #[test]
        fn packet_roundtrip(header: PacketHeader) {
            let mut buf = Vec::new();
            header.to_writer(&mut buf).unwrap();
            let new_header = PacketHeader::from_buf(&mut &buf[..]).unwrap();
            prop_assert_eq!(header, new_header);
        }

        #[test]
        fn packet_header_from_parts(version: PacketHeaderVersion, tag: Tag, len in 1u32..100000) {
            let maybe_header = PacketHeader::from_parts(version, tag, PacketLength::Fixed(len));
            if u8::from(tag) >= 16 && version == PacketHeaderVersion::Old {
                prop_assert!(maybe_header.is_err());
            } else {
                let header = maybe_header.unwrap();
                prop_assert_eq!(header.tag(), tag);
                prop_assert_eq!(header.packet_length(), PacketLength::Fixed(len));
                prop_assert_eq!(header.version(), version);
            }
        }
    }
}
