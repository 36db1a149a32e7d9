use log::debug;

use crate::composed::ExtractRecord;
use crate::errors::{Error, Result};
use crate::packet::{Packet, PacketParser};

/// Collects the secret material of every secret key and subkey in the keyring,
/// in the order they appear.
///
/// Fails on the first passphrase protected key, a keyring is never backed up partially.
pub fn extract(secret_keyring: &[u8]) -> Result<Vec<ExtractRecord>> {
    let mut records = Vec::new();

    for packet in PacketParser::new(secret_keyring) {
        match packet? {
            Packet::SecretKey(key) => {
                let record = ExtractRecord::from_secret_key(records.len(), &key)?;
                debug!(
                    "extracted {:?} {:X} as key {}",
                    key.tag(),
                    record.fingerprint(),
                    record.key_index()
                );
                records.push(record);
            }
            packet => {
                debug!("skipping {:?} packet", packet.tag());
            }
        }
    }

    if records.is_empty() {
        return Err(Error::NoSecretKey);
    }

    Ok(records)
}
