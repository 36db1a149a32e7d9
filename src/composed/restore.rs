use log::{debug, warn};
use zeroize::Zeroizing;

use crate::composed::ExtractRecord;
use crate::errors::{Error, Result};
use crate::packet::{Packet, PacketParser, PublicKey};
use crate::ser::Serialize;

/// Rebuilds the secret keyring from a public keyring and the extracted secrets.
///
/// Every public key or subkey packet takes the next record, in order. All other
/// packets are copied. Nothing is returned unless every key found its record.
pub fn restore(public_keyring: &[u8], records: &[ExtractRecord]) -> Result<Vec<u8>> {
    let mut packets = Vec::new();
    let mut records_iter = records.iter();
    let mut public_keys = 0;

    for packet in PacketParser::new(public_keyring) {
        match packet? {
            Packet::PublicKey(key) => {
                let index = public_keys;
                public_keys += 1;

                let Some(record) = records_iter.next() else {
                    debug!("no secret data left for key {}", index);
                    continue;
                };
                check_fingerprint(index, &key, record);
                packets.push(Packet::SecretKey(key.to_secret(record.secret_material())?));
            }
            packet => {
                debug!("copying {:?} packet", packet.tag());
                packets.push(packet);
            }
        }
    }

    if public_keys != records.len() {
        return Err(Error::RecordCountMismatch {
            public_keys,
            records: records.len(),
        });
    }

    // sized up front, so the buffer holding secrets never reallocates
    let mut out = Zeroizing::new(Vec::with_capacity(packets.write_len()));
    packets.to_writer(&mut *out)?;

    Ok(std::mem::take(&mut *out))
}

/// Records are matched by position, a differing fingerprint is only reported.
fn check_fingerprint(index: usize, key: &PublicKey, record: &ExtractRecord) {
    match key.fingerprint() {
        Ok(fp) if &fp == record.fingerprint() => {}
        Ok(fp) => {
            warn!(
                "key {}: public key {:X} does not match the fingerprint {:X} of the secret data",
                index,
                fp,
                record.fingerprint()
            );
        }
        Err(err) => {
            warn!("key {}: unable to calculate the fingerprint: {}", index, err);
        }
    }
}
