use hex_literal::hex;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use paperkey::errors::Error;
use paperkey::{extract, restore, Blob, DataType};

const ALICE_SEC: &[u8] = include_bytes!("data/alice.sec.gpg");
const ALICE_PUB: &[u8] = include_bytes!("data/alice.pub.gpg");
const ALICE_BASE16: &str = include_str!("data/alice.base16.txt");
const ALICE_RAW: &[u8] = include_bytes!("data/alice.raw");

/// v4 EdDSA public key fields, RFC 9580 sample key
const PUBLIC: [u8; 51] = hex!(
    "04 53f35f0b 16 09 2b06010401da470f01 0107 40 3f098994bdd916ed4053197934e4a87c80733a1280d62f8010992e43ee3b2406"
);

/// A keyring with a single unprotected secret key.
fn secret_keyring(material: &[u8]) -> Vec<u8> {
    let len = PUBLIC.len() + 1 + material.len();
    let mut keyring = vec![0xC5, len as u8];
    keyring.extend_from_slice(&PUBLIC);
    keyring.push(0x00);
    keyring.extend_from_slice(material);
    keyring
}

#[test]
fn secret_key_ends_after_s2k_usage() {
    let keyring = secret_keyring(&[]);
    assert_eq!(&keyring[..2], &[0xC5, 0x34]);
    assert!(matches!(
        extract(&keyring),
        Err(Error::MalformedStream { .. })
    ));
    assert!(paperkey::extract_to_blob(&keyring, &Default::default()).is_err());

    assert!(matches!(
        extract(&secret_keyring(&[0x00])),
        Err(Error::MalformedStream { .. })
    ));
}

#[test]
fn secret_key_with_bad_checksum() {
    let err = extract(&secret_keyring(&hex!("0001 01 0003"))).unwrap_err();
    assert!(err.is_checksum_error(), "{err:?}");
    let keyring = secret_keyring(&hex!("0001 01 0003"));
    assert!(paperkey::extract_to_blob(&keyring, &Default::default()).is_err());

    // the same key with a valid checksum backs up and restores
    let keyring = secret_keyring(&hex!("0001 01 0002"));
    let blob = paperkey::extract_to_blob(&keyring, &Default::default()).unwrap();
    let mut public_keyring = vec![0xC6, PUBLIC.len() as u8];
    public_keyring.extend_from_slice(&PUBLIC);
    let restored =
        paperkey::restore_from_blob(&public_keyring, &blob, &Default::default()).unwrap();
    assert_eq!(restored, keyring);
}

#[test]
fn reserved_packet_tag() {
    for bad_input in [&[0x80, 0x00][..], &[0xC0, 0x00]] {
        assert!(matches!(
            extract(bad_input),
            Err(Error::MalformedStream { .. })
        ));
    }
}

#[test]
fn partial_length_key_packet() {
    // secret key packet with a 2^30 partial body chunk
    let bad_input: &[u8] = &[0xC5, 0xFE, 0x04];
    assert!(matches!(
        extract(bad_input),
        Err(Error::MalformedStream { .. })
    ));
}

#[test]
fn huge_fixed_length() {
    // five octet length far past the end of the input
    let bad_input: &[u8] = &[0xC5, 0xFF, 0xFF, 0xFF, 0xFF, 0xF0, 0x04, 0x00];
    assert!(matches!(
        extract(bad_input),
        Err(Error::MalformedStream { .. })
    ));
}

#[test]
fn huge_mpi() {
    // v4 RSA key announcing a 65535 bit modulus
    let bad_input: &[u8] = &[
        0xC5, 0x0A, 0x04, 0x00, 0x00, 0x00, 0x00, 0x01, 0xFF, 0xFF, 0x01, 0x02,
    ];
    assert!(matches!(
        extract(bad_input),
        Err(Error::MalformedStream { .. })
    ));
}

#[test]
fn v6_zero_key_material_length() {
    let bad_input: &[u8] = &[
        0xC5, 0x0B, 0x06, 0x00, 0x00, 0x00, 0x00, 0x1B, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];
    assert!(matches!(
        extract(bad_input),
        Err(Error::MalformedStream { .. })
    ));
}

#[test]
fn indeterminate_key_packet() {
    // old style secret key packet running to the end of the input
    let mut bad_input = vec![0x97];
    bad_input.extend_from_slice(&ALICE_SEC[2..40]);
    let _ = extract(&bad_input);
}

#[test]
fn record_length_past_end() {
    // version 0, v4 key, zero fingerprint, L = 0xFFFF
    let mut data = vec![0x00, 0x04];
    data.extend_from_slice(&[0u8; 20]);
    data.extend_from_slice(&[0xFF, 0xFF, 0x00, 0x01]);
    let crc = paperkey::crypto::checksum::crc24(&data);
    data.extend_from_slice(&crc.to_be_bytes()[1..]);

    assert!(matches!(
        Blob::from_raw(&data, false),
        Err(Error::TruncatedBlob { .. })
    ));
}

#[test]
fn binary_garbage_as_base16() {
    let bad_input: &[u8] = b"  1: \xff\xfe 00";
    assert!(Blob::from_bytes(bad_input, DataType::Base16, true).is_err());
    assert!(Blob::from_bytes(bad_input, DataType::Auto, true).is_err());

    let bad_input: &[u8] = "  1: 00 ÄÖ 00 112233\n".as_bytes();
    assert!(Blob::from_bytes(bad_input, DataType::Base16, true).is_err());
}

#[test]
fn huge_line_number() {
    let bad_input = b"99999999999999999999999: 00 000000\n";
    assert!(matches!(
        Blob::from_base16(bad_input, true),
        Err(Error::MalformedBlob { .. })
    ));
}

#[test]
fn truncated_inputs() {
    for i in 0..ALICE_SEC.len() {
        let _ = extract(&ALICE_SEC[..i]);
    }
    for i in 0..ALICE_RAW.len() {
        let _ = Blob::from_bytes(&ALICE_RAW[..i], DataType::Auto, true);
    }
    for i in 0..ALICE_BASE16.len() {
        let _ = Blob::from_bytes(&ALICE_BASE16.as_bytes()[..i], DataType::Auto, true);
    }

    let records = extract(ALICE_SEC).unwrap();
    for i in 0..ALICE_PUB.len() {
        let _ = restore(&ALICE_PUB[..i], &records);
    }
}

#[test]
fn random_inputs() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    for _ in 0..2000 {
        let len = rng.gen_range(0..256);
        let mut data = vec![0u8; len];
        rng.fill_bytes(&mut data);

        let _ = extract(&data);
        let _ = Blob::from_bytes(&data, DataType::Auto, true);
        let _ = Blob::from_bytes(&data, DataType::Raw, true);
    }
}

#[test]
fn bit_flips() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let records = extract(ALICE_SEC).unwrap();

    for _ in 0..2000 {
        let mut sec = ALICE_SEC.to_vec();
        let mut public = ALICE_PUB.to_vec();
        let mut raw = ALICE_RAW.to_vec();
        for data in [&mut sec, &mut public, &mut raw] {
            let i = rng.gen_range(0..data.len());
            data[i] ^= 1 << rng.gen_range(0..8);
        }

        let _ = extract(&sec);
        let _ = restore(&public, &records);
        if let Ok(blob) = Blob::from_raw(&raw, true) {
            let _ = restore(ALICE_PUB, blob.records());
        }
    }
}
