//! SHA-256 digests and the pluggable hashing seam.

use alloc::string::String;
use core::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as _, Sha256};

/// A fixed-width hash digest.
///
/// Digests are opaque 32-byte values. The canonical interchange form is the
/// lowercase hex string, used by `Display`, serde, and [`Digest::to_hex`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    /// The all-zero digest, used as the previous-hash of a genesis block.
    pub const ZERO: Digest = Digest([0u8; 32]);

    /// Borrow the raw bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as a lowercase hex string (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Digest, DigestError> {
        let bytes = hex::decode(s).map_err(|_| DigestError::InvalidHex)?;
        if bytes.len() != 32 {
            return Err(DigestError::InvalidLength(bytes.len()));
        }
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&bytes);
        Ok(Digest(digest))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HexVisitor;

        impl Visitor<'_> for HexVisitor {
            type Value = Digest;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a 64-character hex string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Digest, E> {
                Digest::from_hex(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(HexVisitor)
    }
}

/// Digest parsing errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    /// Input was not valid hex
    InvalidHex,
    /// Decoded length was not 32 bytes
    InvalidLength(usize),
}

impl fmt::Display for DigestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestError::InvalidHex => write!(f, "Invalid hex digest"),
            DigestError::InvalidLength(len) => {
                write!(f, "Digest must be 32 bytes, got {}", len)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DigestError {}

/// A hash function usable by the tree builder and the sealer.
///
/// Implementations must be deterministic, side-effect free, and fixed-width.
/// Both ends of an exchange (tree builder and proof verifier, sealer and seal
/// checker) must use the identical implementation.
pub trait Hasher {
    /// Hash an arbitrary byte sequence.
    fn digest(&self, data: &[u8]) -> Digest;

    /// Hash the 64-byte concatenation of two digests, left first.
    fn digest_pair(&self, left: &Digest, right: &Digest) -> Digest {
        let mut combined = [0u8; 64];
        combined[..32].copy_from_slice(&left.0);
        combined[32..].copy_from_slice(&right.0);
        self.digest(&combined)
    }
}

/// The production hasher: single SHA-256.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    #[inline]
    fn digest(&self, data: &[u8]) -> Digest {
        sha256(data)
    }
}

/// Single SHA-256 hash.
#[inline]
pub fn sha256(data: &[u8]) -> Digest {
    let hash = Sha256::digest(data);
    let mut result = [0u8; 32];
    result.copy_from_slice(&hash);
    Digest(result)
}
