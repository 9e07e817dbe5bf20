//! Block headers and sealed blocks.

use alloc::vec::Vec;

use crate::difficulty::meets_difficulty;
use crate::hash::{Digest, Hasher, Sha256Hasher};

/// Width of the fixed trailer appended to the payload: previous hash (32),
/// nonce (8), version (4).
const SEAL_TRAILER_LEN: usize = 44;

/// The fields of a block fixed before sealing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    /// Protocol version.
    pub version: u32,
    /// Required number of leading zero hex characters in the sealed hash.
    pub difficulty: u32,
    /// Hash of the previous block.
    pub previous_hash: Digest,
}

impl BlockHeader {
    /// Create a new block header.
    pub fn new(version: u32, difficulty: u32, previous_hash: Digest) -> Self {
        BlockHeader {
            version,
            difficulty,
            previous_hash,
        }
    }

    /// Build the seal preimage for `data` with a zeroed nonce field.
    ///
    /// Layout, fixed for interoperability (any two implementations comparing
    /// seal hashes must agree on it byte for byte):
    ///
    /// ```text
    /// data || previous_hash (32 bytes) || nonce (8 bytes LE) || version (4 bytes LE)
    /// ```
    ///
    /// The difficulty is a search parameter, not part of the preimage.
    /// Returns the buffer together with the byte offset of the nonce field so
    /// a sealer can patch nonces in place instead of rebuilding the buffer.
    pub fn seal_preimage(&self, data: &[u8]) -> (Vec<u8>, usize) {
        let mut preimage = Vec::with_capacity(data.len() + SEAL_TRAILER_LEN);

        preimage.extend_from_slice(data);
        preimage.extend_from_slice(self.previous_hash.as_bytes());

        let nonce_offset = preimage.len();
        preimage.extend_from_slice(&0u64.to_le_bytes());
        preimage.extend_from_slice(&self.version.to_le_bytes());

        (preimage, nonce_offset)
    }
}

/// A sealed block: payload, header, and the nonce/hash pair found by the
/// proof-of-work search.
///
/// Values of this type only exist for completed seals; an unsealed block has
/// no valid hash and is represented by not existing yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Opaque payload committed by the seal.
    pub data: Vec<u8>,
    /// The header the seal was searched under.
    pub header: BlockHeader,
    /// The nonce found by the search.
    pub nonce: u64,
    /// The resulting digest.
    pub hash: Digest,
}

impl Block {
    /// Assemble a block from a completed seal.
    pub fn from_seal(data: Vec<u8>, header: BlockHeader, nonce: u64, hash: Digest) -> Self {
        Block {
            data,
            header,
            nonce,
            hash,
        }
    }

    /// Recompute the seal hash with SHA-256 and check it against the recorded
    /// hash and the header's difficulty.
    pub fn verify_seal(&self) -> bool {
        self.verify_seal_with(&Sha256Hasher)
    }

    /// [`Block::verify_seal`] with a caller-supplied hasher.
    pub fn verify_seal_with<H: Hasher>(&self, hasher: &H) -> bool {
        let (mut preimage, nonce_offset) = self.header.seal_preimage(&self.data);
        preimage[nonce_offset..nonce_offset + 8].copy_from_slice(&self.nonce.to_le_bytes());

        let hash = hasher.digest(&preimage);
        hash == self.hash && meets_difficulty(&hash, self.header.difficulty)
    }
}
