//! Proof-of-work sealing: brute-force nonce search.
//!
//! The sealer hashes the preimage documented on
//! [`BlockHeader::seal_preimage`] for ascending nonces until the digest meets
//! the header's difficulty. The search is unbounded by design; callers that
//! need bounded latency raise the cancel flag, which is checked between
//! batches.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::block::BlockHeader;
use crate::difficulty::meets_difficulty;
use crate::hash::{Digest, Hasher, Sha256Hasher};

/// Nonces tried between cancellation checks.
pub const SEAL_BATCH_SIZE: u64 = 4096;

/// Result of searching one nonce range.
#[derive(Debug, Clone)]
pub struct SealBatch {
    /// The satisfying nonce, if one was found in the range.
    pub nonce: Option<u64>,
    /// The digest produced by that nonce.
    pub hash: Option<Digest>,
    /// Number of hashes computed in this batch.
    pub hashes_computed: u64,
}

/// Outcome of a sealing search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SealOutcome {
    /// A nonce whose digest meets the difficulty was found.
    Sealed { nonce: u64, hash: Digest },
    /// The caller raised the cancel flag before a nonce was found.
    Cancelled,
}

/// Try nonces `[nonce_start, nonce_start + nonce_count)` in ascending order,
/// stopping at the first digest that meets the header's difficulty.
pub fn seal_batch<H: Hasher>(
    hasher: &H,
    data: &[u8],
    header: &BlockHeader,
    nonce_start: u64,
    nonce_count: u64,
) -> SealBatch {
    let (mut preimage, nonce_offset) = header.seal_preimage(data);

    let nonce_end = nonce_start.saturating_add(nonce_count);
    for nonce in nonce_start..nonce_end {
        // Patch the nonce into its fixed slot (little-endian at the recorded offset)
        preimage[nonce_offset..nonce_offset + 8].copy_from_slice(&nonce.to_le_bytes());

        let hash = hasher.digest(&preimage);
        if meets_difficulty(&hash, header.difficulty) {
            return SealBatch {
                nonce: Some(nonce),
                hash: Some(hash),
                hashes_computed: nonce - nonce_start + 1,
            };
        }
    }

    SealBatch {
        nonce: None,
        hash: None,
        hashes_computed: nonce_end - nonce_start,
    }
}

/// Search nonces from zero with SHA-256 until the difficulty is met or the
/// cancel flag is raised.
///
/// See [`seal_with`].
pub fn seal(data: &[u8], header: &BlockHeader, cancel: &AtomicBool) -> SealOutcome {
    seal_with(&Sha256Hasher, data, header, cancel)
}

/// [`seal`] with a caller-supplied hasher.
///
/// Nonces are tried ascending from zero, so the outcome is deterministic:
/// the same data and header always seal at the minimal satisfying nonce.
/// Difficulty 0 seals immediately at nonce 0. The cancel flag is checked
/// before each batch of [`SEAL_BATCH_SIZE`] nonces, so cancellation latency
/// is at most one batch.
pub fn seal_with<H: Hasher>(
    hasher: &H,
    data: &[u8],
    header: &BlockHeader,
    cancel: &AtomicBool,
) -> SealOutcome {
    let mut nonce_start = 0u64;

    loop {
        if cancel.load(Ordering::Relaxed) {
            return SealOutcome::Cancelled;
        }

        let batch = seal_batch(hasher, data, header, nonce_start, SEAL_BATCH_SIZE);
        if let (Some(nonce), Some(hash)) = (batch.nonce, batch.hash) {
            return SealOutcome::Sealed { nonce, hash };
        }

        nonce_start = nonce_start.saturating_add(SEAL_BATCH_SIZE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::leading_zero_chars;

    fn header(difficulty: u32) -> BlockHeader {
        BlockHeader::new(1, difficulty, Digest::ZERO)
    }

    #[test]
    fn test_difficulty_zero_seals_at_nonce_zero() {
        let cancel = AtomicBool::new(false);

        match seal(b"Block 1", &header(0), &cancel) {
            SealOutcome::Sealed { nonce, hash } => {
                assert_eq!(nonce, 0);
                // The empty prefix matches any digest.
                assert!(meets_difficulty(&hash, 0));
            }
            SealOutcome::Cancelled => panic!("difficulty 0 must seal immediately"),
        }
    }

    #[test]
    fn test_seal_finds_minimal_nonce() {
        let cancel = AtomicBool::new(false);
        let header = header(2);

        let (nonce, hash) = match seal(b"Block 1", &header, &cancel) {
            SealOutcome::Sealed { nonce, hash } => (nonce, hash),
            SealOutcome::Cancelled => panic!("uncancelled seal cannot be cancelled"),
        };

        assert!(leading_zero_chars(&hash) >= 2);

        // No smaller nonce satisfies the predicate.
        let earlier = seal_batch(&Sha256Hasher, b"Block 1", &header, 0, nonce);
        assert!(earlier.nonce.is_none());
        assert_eq!(earlier.hashes_computed, nonce);
    }

    #[test]
    fn test_seal_is_deterministic() {
        let cancel = AtomicBool::new(false);

        let first = seal(b"Block 1", &header(2), &cancel);
        let second = seal(b"Block 1", &header(2), &cancel);
        assert_eq!(first, second);
    }

    #[test]
    fn test_cancelled_seal() {
        let cancel = AtomicBool::new(true);

        // Difficulty 65 is unsatisfiable; only the cancel flag ends the search.
        let outcome = seal(b"Block 1", &header(65), &cancel);
        assert_eq!(outcome, SealOutcome::Cancelled);
    }

    #[test]
    fn test_batch_reports_hashes_computed() {
        let batch = seal_batch(&Sha256Hasher, b"Block 1", &header(65), 0, 100);
        assert!(batch.nonce.is_none());
        assert!(batch.hash.is_none());
        assert_eq!(batch.hashes_computed, 100);
    }

    #[test]
    fn test_injected_hasher_drives_search() {
        // A stub whose digests always meet any satisfiable difficulty.
        struct ZeroHasher;

        impl Hasher for ZeroHasher {
            fn digest(&self, _data: &[u8]) -> Digest {
                Digest::ZERO
            }
        }

        let cancel = AtomicBool::new(false);
        match seal_with(&ZeroHasher, b"Block 1", &header(64), &cancel) {
            SealOutcome::Sealed { nonce, hash } => {
                assert_eq!(nonce, 0);
                assert_eq!(hash, Digest::ZERO);
            }
            SealOutcome::Cancelled => panic!("stub hasher must seal at once"),
        }
    }
}
