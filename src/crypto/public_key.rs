use num_enum::{FromPrimitive, IntoPrimitive};

#[derive(Debug, PartialEq, Eq, Clone, Copy, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum PublicKeyAlgorithm {
    /// RSA (Encrypt and Sign)
    RSA = 1,
    /// DEPRECATED: RSA (Encrypt-Only)
    RSAEncrypt = 2,
    /// DEPRECATED: RSA (Sign-Only)
    RSASign = 3,
    /// Elgamal (Sign-Only)
    ElgamalSign = 16,
    /// DSA (Digital Signature Algorithm)
    DSA = 17,
    /// Elliptic Curve: RFC-6637
    ECDH = 18,
    /// ECDSA: RFC-6637
    ECDSA = 19,
    /// DEPRECATED: Elgamal (Encrypt and Sign)
    Elgamal = 20,
    /// Reserved for Diffie-Hellman (X9.42, as defined for IETF-S/MIME)
    DiffieHellman = 21,
    /// EdDSA legacy format [deprecated in RFC 9580, superseded by Ed25519 (27)]
    EdDSALegacy = 22,

    /// X25519 [RFC 9580]
    X25519 = 25,
    /// X448 [RFC 9580]
    X448 = 26,
    /// Ed25519 [RFC 9580]
    Ed25519 = 27,
    /// Ed448 [RFC 9580]
    Ed448 = 28,

    #[num_enum(catch_all)]
    Unknown(u8),
}

/// Shape of the public key fields of an algorithm, as far as is needed to skip them.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PublicParamsLayout {
    /// A fixed number of MPIs.
    Mpis(usize),
    /// Curve OID followed by a single MPI.
    Ecc,
    /// Curve OID, a single MPI and the KDF parameters.
    Ecdh,
    /// Raw octets of a fixed length.
    Native(usize),
}

impl PublicKeyAlgorithm {
    pub const fn is_rsa(self) -> bool {
        matches!(self, Self::RSA | Self::RSAEncrypt | Self::RSASign)
    }

    /// Returns `None` for algorithms whose key material we can not scan.
    pub const fn public_params_layout(self) -> Option<PublicParamsLayout> {
        let layout = match self {
            Self::RSA | Self::RSAEncrypt | Self::RSASign => PublicParamsLayout::Mpis(2),
            Self::Elgamal | Self::ElgamalSign => PublicParamsLayout::Mpis(3),
            Self::DSA => PublicParamsLayout::Mpis(4),
            Self::ECDH => PublicParamsLayout::Ecdh,
            Self::ECDSA | Self::EdDSALegacy => PublicParamsLayout::Ecc,
            Self::X25519 | Self::Ed25519 => PublicParamsLayout::Native(32),
            Self::X448 => PublicParamsLayout::Native(56),
            Self::Ed448 => PublicParamsLayout::Native(57),
            Self::DiffieHellman | Self::Unknown(_) => return None,
        };

        Some(layout)
    }
}
