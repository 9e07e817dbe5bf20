//! Content-addressed commitment primitives for blockchain-style ledgers.
//!
//! This crate provides pure Rust implementations of:
//! - Binary Merkle trees with compact inclusion proofs
//! - Proof-of-work block sealing with a cancellable nonce search
//! - Difficulty predicates over hex digest renderings
//! - A pluggable hashing seam so both components are testable with
//!   deterministic stub hashes
//!
//! All operations are synchronous and CPU-bound. A built [`MerkleTree`] is
//! immutable and safe to share read-only across threads.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod block;
pub mod difficulty;
pub mod hash;
pub mod merkle;
pub mod pow;

pub use block::{Block, BlockHeader};
pub use difficulty::{leading_zero_chars, meets_difficulty};
pub use hash::{sha256, Digest, DigestError, Hasher, Sha256Hasher};
pub use merkle::{verify_proof, verify_proof_with, MerkleError, MerkleTree, ProofStep, Side};
pub use pow::{seal, seal_batch, seal_with, SealBatch, SealOutcome, SEAL_BATCH_SIZE};
