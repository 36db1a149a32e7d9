use log::debug;
use zeroize::Zeroizing;

use crate::crypto::checksum;
use crate::errors::Result;

/// Decodes base16 lines back into the octets they carry.
///
/// Blank lines and lines starting with `#` are skipped. Line numbers must count up
/// from 1 without gaps and the data must end with the checksum line over all octets.
pub fn read(input: &str, ignore_checksum_errors: bool) -> Result<Zeroizing<Vec<u8>>> {
    let mut data = Zeroizing::new(Vec::new());
    let mut expected_line = 1;
    let mut finished = false;

    for (i, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((number, rest)) = line.split_once(':') else {
            malformed_blob!("line {} has no line number", i + 1);
        };
        let Ok(number) = number.trim().parse::<usize>() else {
            malformed_blob!("invalid line number {:?}", number);
        };
        if finished {
            malformed_blob!("unexpected line {} after the final checksum", number);
        }
        if number != expected_line {
            malformed_blob!("expected line {} but found line {}", expected_line, number);
        }
        expected_line += 1;

        let digits: Zeroizing<String> = Zeroizing::new(rest.split_whitespace().collect());
        let octets = match hex::decode(digits.as_bytes()) {
            Ok(octets) => Zeroizing::new(octets),
            Err(err) => malformed_blob!("line {}: {}", number, err),
        };
        if octets.len() < 3 {
            malformed_blob!("line {} is too short", number);
        }

        let (payload, crc) = octets.split_at(octets.len() - 3);
        let crc = u32::from_be_bytes([0, crc[0], crc[1], crc[2]]);

        if payload.is_empty() {
            debug!("final checksum on line {}", number);
            checksum::verify(
                || "all data".into(),
                crc,
                checksum::crc24(&data),
                ignore_checksum_errors,
            )?;
            finished = true;
        } else {
            checksum::verify(
                || format!("line {}", number),
                crc,
                checksum::crc24(payload),
                ignore_checksum_errors,
            )?;
            data.extend_from_slice(payload);
        }
    }

    if !finished {
        malformed_blob!("missing final checksum line {}", expected_line);
    }

    Ok(data)
}
