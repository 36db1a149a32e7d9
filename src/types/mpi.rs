//! Length handling for multiprecision integers.
//!
//! Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-multiprecision-integers>

use bytes::Buf;

use crate::errors::Result;
use crate::parsing::BufParsing;

/// Number of bits we accept when reading MPIs.
/// The value is the same as gnupgs.
const MAX_EXTERN_MPI_BITS: u16 = 16384;

/// Reads the two octet bit count of an MPI and returns the length of its body in octets.
pub fn read_len<B: Buf>(i: &mut B) -> Result<usize> {
    let len_bits = i.read_be_u16()?;
    if len_bits > MAX_EXTERN_MPI_BITS {
        malformed_stream!("mpi of {} bits is too large", len_bits);
    }

    Ok(usize::from((len_bits + 7) >> 3))
}

/// Skips over a complete MPI.
pub fn skip<B: Buf>(i: &mut B) -> Result<()> {
    let len = read_len(i)?;
    if i.remaining() < len {
        malformed_stream!("mpi of {} octets runs past the packet body", len);
    }
    i.advance(len);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn mpi_len() {
        let mut i = &[0x00, 0x01, 0x01][..];
        assert_eq!(read_len(&mut i).unwrap(), 1);

        let mut i = &[0x01, 0x00][..];
        assert_eq!(read_len(&mut i).unwrap(), 32);

        let mut i = &[0x00, 0x00][..];
        assert_eq!(read_len(&mut i).unwrap(), 0);
    }

    #[test]
    fn mpi_skip() {
        let mut i = &[0x00, 0x09, 0x01, 0xFF, 0xAA][..];
        skip(&mut i).unwrap();
        assert_eq!(i, &[0xAA]);

        let mut i = &[0x00, 0x11, 0x01][..];
        assert!(matches!(skip(&mut i), Err(Error::MalformedStream { .. })));

        let mut i = &[0x40, 0x01][..];
        assert!(matches!(
            read_len(&mut i),
            Err(Error::MalformedStream { .. })
        ));
    }
}
