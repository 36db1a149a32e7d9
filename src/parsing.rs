//! Bounds checked reading of octets from a [Buf].
//!
//! Every parser in this crate reads through [`BufParsing`], so running past the
//! end of the input is always reported as an error and never panics.

use bytes::{Buf, Bytes};
use snafu::{Backtrace, Snafu};

/// Parsing errors
#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("unexpected end of stream: reading {:?}", typ))]
    TooShort {
        typ: Typ,
        #[snafu(backtrace)]
        source: RemainingError,
    },
}

impl Error {
    /// Number of octets the failed read asked for.
    pub fn needed(&self) -> usize {
        match self {
            Self::TooShort { source, .. } => source.needed,
        }
    }

    /// Number of octets that were left when the read failed.
    pub fn remaining(&self) -> usize {
        match self {
            Self::TooShort { source, .. } => source.remaining,
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("needed {}, remaining {}", needed, remaining))]
pub struct RemainingError {
    pub needed: usize,
    pub remaining: usize,
    backtrace: Option<Backtrace>,
}

#[derive(Debug)]
pub enum Typ {
    U8,
    U16Be,
    U32Be,
    Array(usize),
    Take(usize),
}

pub trait BufParsing: Buf + Sized {
    fn read_u8(&mut self) -> Result<u8, Error> {
        self.ensure_remaining(1).map_err(|e| Error::TooShort {
            typ: Typ::U8,
            source: e,
        })?;
        Ok(self.get_u8())
    }

    /// Returns the next octet without consuming it.
    fn peek_u8(&self) -> Result<u8, Error> {
        self.ensure_remaining(1).map_err(|e| Error::TooShort {
            typ: Typ::U8,
            source: e,
        })?;
        Ok(self.chunk()[0])
    }

    fn read_be_u16(&mut self) -> Result<u16, Error> {
        self.ensure_remaining(2).map_err(|e| Error::TooShort {
            typ: Typ::U16Be,
            source: e,
        })?;
        Ok(self.get_u16())
    }

    fn read_be_u32(&mut self) -> Result<u32, Error> {
        self.ensure_remaining(4).map_err(|e| Error::TooShort {
            typ: Typ::U32Be,
            source: e,
        })?;
        Ok(self.get_u32())
    }

    fn read_array<const C: usize>(&mut self) -> Result<[u8; C], Error> {
        self.ensure_remaining(C).map_err(|e| Error::TooShort {
            typ: Typ::Array(C),
            source: e,
        })?;
        let mut arr = [0u8; C];
        self.copy_to_slice(&mut arr[..]);
        Ok(arr)
    }

    /// Reads exactly `size` octets.
    fn read_take(&mut self, size: usize) -> Result<Bytes, Error> {
        self.ensure_remaining(size).map_err(|e| Error::TooShort {
            typ: Typ::Take(size),
            source: e,
        })?;
        Ok(self.copy_to_bytes(size))
    }

    /// Consumes `size` octets without keeping them.
    fn skip(&mut self, size: usize) -> Result<(), Error> {
        self.ensure_remaining(size).map_err(|e| Error::TooShort {
            typ: Typ::Take(size),
            source: e,
        })?;
        self.advance(size);
        Ok(())
    }

    fn rest(&mut self) -> Bytes {
        let len = self.remaining();
        self.copy_to_bytes(len)
    }

    fn ensure_remaining(&self, size: usize) -> Result<(), RemainingError> {
        if self.remaining() < size {
            return Err(RemainingError {
                needed: size,
                remaining: self.remaining(),
                backtrace: snafu::GenerateImplicitData::generate(),
            });
        }

        Ok(())
    }
}

impl<B: Buf> BufParsing for B {}
