use bytes::{Buf, BufMut, BytesMut};
use log::debug;

use crate::errors::{Error, Result};
use crate::packet::header::new_length;
use crate::packet::{Packet, PacketHeader};
use crate::types::PacketLength;

/// Parses packets from a complete, in memory packet stream.
///
/// The input is borrowed, only the parsed packets own copies of their bodies.
/// Iteration stops after the first error.
#[derive(Debug)]
pub struct PacketParser<'a> {
    inner: &'a [u8],
    failed: bool,
}

impl<'a> PacketParser<'a> {
    pub fn new(inner: &'a [u8]) -> Self {
        PacketParser {
            inner,
            failed: false,
        }
    }

    fn next_packet(&mut self) -> Result<Packet> {
        let header = PacketHeader::from_buf(&mut self.inner)?;
        debug!("found header: {:?}", header);

        match header.packet_length() {
            PacketLength::Fixed(len) => {
                let body = read_body(&mut self.inner, len)?;
                Packet::from_parts(header, body)
            }
            PacketLength::Indeterminate => {
                // the body runs to the end of the stream
                let body = std::mem::take(&mut self.inner);
                Packet::from_parts(header, body)
            }
            PacketLength::Partial(len) => {
                if header.tag().requires_fixed_length() {
                    malformed_stream!("{:?} packet with a partial body length", header.tag());
                }
                let body = self.read_partial_body(len)?;
                Packet::from_parts(header, &body)
            }
        }
    }

    /// Collects all chunks of a partial body, up to and including the last one.
    fn read_partial_body(&mut self, first: u32) -> Result<BytesMut> {
        let mut body = BytesMut::new();
        body.put(read_body(&mut self.inner, first)?);

        loop {
            let length = match new_length(&mut self.inner) {
                Ok(length) => length,
                Err(Error::UnexpectedEndOfStream { .. }) => {
                    malformed_stream!("partial body is not continued");
                }
                Err(err) => return Err(err),
            };

            match length {
                PacketLength::Partial(len) => {
                    body.put(read_body(&mut self.inner, len)?);
                }
                PacketLength::Fixed(len) => {
                    body.put(read_body(&mut self.inner, len)?);
                    break;
                }
                PacketLength::Indeterminate => {
                    malformed_stream!("indeterminate length in a partial body");
                }
            }
        }

        Ok(body)
    }
}

fn read_body<'a>(i: &mut &'a [u8], len: u32) -> Result<&'a [u8]> {
    let len = len as usize;
    if i.len() < len {
        malformed_stream!(
            "packet body of {} octets, but only {} remaining",
            len,
            i.len()
        );
    }

    let (body, rest) = i.split_at(len);
    *i = rest;

    Ok(body)
}

impl Iterator for PacketParser<'_> {
    type Item = Result<Packet>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.inner.has_remaining() {
            return None;
        }

        let res = self.next_packet();
        if res.is_err() {
            self.failed = true;
        }

        Some(res)
    }
}
