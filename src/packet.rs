//! # Packet module
//!
//! Splits an OpenPGP packet stream into packets. Key packets are interpreted
//! as far as is needed to separate their secret material, everything else is
//! kept as opaque bytes.

mod header;
mod many;
mod packet_sum;
mod public_key;
mod public_key_parser;
mod secret_key;

pub use self::{
    header::PacketHeader,
    many::PacketParser,
    packet_sum::{OpaquePacket, Packet},
    public_key::PublicKey,
    public_key_parser::public_key_len,
    secret_key::SecretKey,
};
