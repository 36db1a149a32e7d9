//! # Base16 module
//!
//! The line oriented text form of paperkey data, meant to be printed and typed
//! back in by hand:
//!
//! ```text
//! # comment lines
//!
//!   1: 00 04 6A 0B 54 ... 8C 2F 7E0B1D
//!   2: 12 00 C1 5E 43 ... 07 00 A8C3E4
//!   3: 4F61D2
//! ```
//!
//! Every data line ends with the CRC-24 of its octets, the last line holds
//! only the CRC-24 of all octets.

mod reader;
mod writer;

pub use self::reader::read;
pub use self::writer::{line_items, write, MIN_OUTPUT_WIDTH};
