//! # Raw module
//!
//! The binary form of paperkey data: the octets as they are, followed by
//! their three octet CRC-24.

use std::io;

use zeroize::Zeroizing;

use crate::crypto::checksum;
use crate::errors::{Error, Result};
use crate::ser::Serialize;

/// Size of the trailing checksum.
const CRC_LEN: usize = 3;

/// Writes `source` followed by its checksum.
pub fn write(source: &impl Serialize, writer: &mut impl io::Write) -> Result<()> {
    let data = Zeroizing::new(source.to_bytes()?);
    let crc = checksum::crc24(&data);

    writer.write_all(&data)?;
    writer.write_all(&crc.to_be_bytes()[1..])?;

    Ok(())
}

/// Checks the trailing checksum and returns the octets in front of it.
pub fn read(input: &[u8], ignore_checksum_errors: bool) -> Result<&[u8]> {
    let Some(split) = input.len().checked_sub(CRC_LEN).filter(|split| *split > 0) else {
        return Err(Error::TruncatedBlob {
            needed: CRC_LEN + 1,
            remaining: input.len(),
        });
    };

    let (data, crc) = input.split_at(split);
    let crc = u32::from_be_bytes([0, crc[0], crc[1], crc[2]]);
    checksum::verify(
        || "raw data".into(),
        crc,
        checksum::crc24(data),
        ignore_checksum_errors,
    )?;

    Ok(data)
}
