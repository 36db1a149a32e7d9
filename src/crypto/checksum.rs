use crate::errors::{Error, Result};

/// Two octet checksum: sum of all octets mod 65536.
#[inline]
pub fn simple(data: &[u8]) -> u16 {
    data.iter()
        .fold(0u16, |sum, v| sum.wrapping_add(u16::from(*v)))
}

/// OpenPGP CRC-24, as used by ASCII armor.
#[inline]
pub fn crc24(data: &[u8]) -> u32 {
    ::crc24::hash_raw(data) & 0x00FF_FFFF
}

/// Verifies a checksum, reporting `what` on mismatch.
///
/// With `ignore` set a mismatch is only logged.
pub fn verify(what: impl FnOnce() -> String, expected: u32, found: u32, ignore: bool) -> Result<()> {
    if expected == found {
        return Ok(());
    }

    let err = Error::ChecksumMismatch {
        what: what(),
        expected,
        found,
    };
    if ignore {
        log::warn!("ignoring {}", err);
        return Ok(());
    }

    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_checksum() {
        assert_eq!(simple(&[]), 0);
        assert_eq!(simple(&[0x01, 0x02, 0xFF]), 0x0102);
        assert_eq!(simple(&[0xFF; 258]), 0x00FE);
    }

    #[test]
    fn crc24_vectors() {
        // empty input yields the initial value
        assert_eq!(crc24(b""), 0xB704CE);
        assert_eq!(crc24(b"123456789"), 0x21CF02);
    }

    #[test]
    fn verify_ignore() {
        assert!(verify(|| "x".into(), 1, 1, false).is_ok());
        let err = verify(|| "line 1".into(), 1, 2, false).unwrap_err();
        assert!(err.is_checksum_error());
        assert!(verify(|| "line 1".into(), 1, 2, true).is_ok());
    }
}
