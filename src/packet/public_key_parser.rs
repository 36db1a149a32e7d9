use bytes::Buf;
use log::debug;

use crate::crypto::public_key::{PublicKeyAlgorithm, PublicParamsLayout};
use crate::errors::{Error, Result};
use crate::parsing::BufParsing;
use crate::types::{mpi, KeyVersion};

/// Scans the public fields at the start of a key packet body.
///
/// Returns the key version and the number of octets the public part of the
/// body occupies, starting at the version octet. Nothing is decoded beyond what
/// is needed to find the end of the public key material.
pub fn public_key_len(body: &[u8]) -> Result<(KeyVersion, usize)> {
    let mut i = body;
    let version = match public_key_parser(&mut i) {
        Ok(version) => version,
        Err(Error::UnexpectedEndOfStream { source }) => {
            malformed_stream!("key packet is truncated: {}", source);
        }
        Err(err) => return Err(err),
    };

    Ok((version, body.len() - i.remaining()))
}

fn public_key_parser<B: Buf>(i: &mut B) -> Result<KeyVersion> {
    let version = KeyVersion::from(i.read_u8()?);
    match version {
        KeyVersion::V2 | KeyVersion::V3 => {
            // created at, validity days
            i.skip(4 + 2)?;
            let alg = PublicKeyAlgorithm::from(i.read_u8()?);
            public_params_parser(alg, i)?;
        }
        KeyVersion::V4 => {
            // created at
            i.skip(4)?;
            let alg = PublicKeyAlgorithm::from(i.read_u8()?);
            public_params_parser(alg, i)?;
        }
        KeyVersion::V6 => {
            // created at, algorithm
            i.skip(4 + 1)?;
            // "scalar octet count for the following public key material"
            let len = i.read_be_u32()?;
            if len == 0 {
                malformed_stream!("key length must not be 0");
            }
            if i.remaining() < len as usize {
                malformed_stream!("public key material of {} octets runs past the packet", len);
            }
            i.advance(len as usize);
        }
        KeyVersion::V5 | KeyVersion::Other(_) => {
            unsupported_err!("key version {:?}", version);
        }
    }

    Ok(version)
}

fn public_params_parser<B: Buf>(alg: PublicKeyAlgorithm, i: &mut B) -> Result<()> {
    let Some(layout) = alg.public_params_layout() else {
        unsupported_err!("public key algorithm {:?}", alg);
    };
    debug!("scanning public key fields of {:?} as {:?}", alg, layout);

    match layout {
        PublicParamsLayout::Mpis(count) => {
            for _ in 0..count {
                mpi::skip(i)?;
            }
        }
        PublicParamsLayout::Ecc => {
            skip_oid(i)?;
            mpi::skip(i)?;
        }
        PublicParamsLayout::Ecdh => {
            skip_oid(i)?;
            mpi::skip(i)?;
            // KDF parameters
            let len = i.read_u8()?;
            i.skip(len.into())?;
        }
        PublicParamsLayout::Native(len) => {
            i.skip(len)?;
        }
    }

    Ok(())
}

fn skip_oid<B: Buf>(i: &mut B) -> Result<()> {
    let len = i.read_u8()?;
    if len == 0 || len == 0xFF {
        malformed_stream!("invalid curve oid length {}", len);
    }
    i.skip(len.into())?;

    Ok(())
}
