//! Binary hash trees with compact inclusion proofs.
//!
//! A tree commits to an ordered sequence of data items. Construction hashes
//! each item into a leaf digest, then repeatedly pairs adjacent digests
//! (`parent = H(left || right)`) until a single root remains. A level with an
//! odd count pairs its last digest with itself. All levels are retained so
//! proofs can be produced without rehashing the input.
//!
//! Proofs record one sibling per level below the root together with the side
//! it occupies, so a verifier can recompute the root from a single leaf
//! without seeing the rest of the tree.

use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::hash::{Digest, Hasher, Sha256Hasher};

/// Merkle tree errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MerkleError {
    /// A tree cannot be built from zero items.
    EmptyInput,
    /// Proof requested for a leaf position that does not exist.
    IndexOutOfRange { index: usize, leaf_count: usize },
    /// A proof whose shape cannot belong to any tree for the claimed index.
    InvalidProofFormat,
}

impl fmt::Display for MerkleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MerkleError::EmptyInput => write!(f, "Cannot build a tree from zero items"),
            MerkleError::IndexOutOfRange { index, leaf_count } => {
                write!(f, "Leaf index {} out of range for {} leaves", index, leaf_count)
            }
            MerkleError::InvalidProofFormat => {
                write!(f, "Proof length is inconsistent with the leaf index")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MerkleError {}

/// Which side of the path node a proof sibling lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// One step of an inclusion proof: the sibling digest at one level, and the
/// side it occupies relative to the node on the leaf-to-root path.
///
/// The wire format of a proof is the ordered sequence of these pairs, leaf
/// level first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    /// The sibling digest to combine with at this level.
    pub sibling: Digest,
    /// The sibling's side relative to the path node.
    pub side: Side,
}

/// A binary hash tree over an ordered sequence of data items.
///
/// The tree is immutable once built; a proof becomes stale only if the caller
/// rebuilds from different data. Reads need no locking.
#[derive(Debug, Clone)]
pub struct MerkleTree<H: Hasher = Sha256Hasher> {
    hasher: H,
    /// Level 0 holds the leaves; the last level is the singleton root.
    levels: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Build a tree over `items` using SHA-256.
    ///
    /// Leaves are hashed in input order. Fails with [`MerkleError::EmptyInput`]
    /// for zero items; the pairing step needs at least one leaf.
    pub fn build<T: AsRef<[u8]>>(items: &[T]) -> Result<Self, MerkleError> {
        Self::build_with(Sha256Hasher, items)
    }
}

impl<H: Hasher> MerkleTree<H> {
    /// Build a tree over `items` with a caller-supplied hasher.
    pub fn build_with<T: AsRef<[u8]>>(hasher: H, items: &[T]) -> Result<Self, MerkleError> {
        if items.is_empty() {
            return Err(MerkleError::EmptyInput);
        }

        let leaves: Vec<Digest> = items
            .iter()
            .map(|item| hasher.digest(item.as_ref()))
            .collect();

        let mut levels = Vec::new();
        levels.push(leaves);

        while levels[levels.len() - 1].len() > 1 {
            let current = &levels[levels.len() - 1];
            let mut next = Vec::with_capacity((current.len() + 1) / 2);

            for i in (0..current.len()).step_by(2) {
                let left = current[i];
                // An odd level pairs its last digest with itself
                let right = if i + 1 < current.len() {
                    current[i + 1]
                } else {
                    current[i]
                };
                next.push(hasher.digest_pair(&left, &right));
            }

            levels.push(next);
        }

        Ok(MerkleTree { hasher, levels })
    }

    /// The root commitment.
    pub fn root(&self) -> &Digest {
        // Construction always ends on a singleton level.
        &self.levels[self.levels.len() - 1][0]
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Number of levels, leaves through root. A single-leaf tree has depth 1.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Produce the inclusion proof for the leaf at `index`.
    ///
    /// The proof carries one step per level below the root, so its length is
    /// always `depth() - 1`. Where a level's last digest was paired with
    /// itself, the step records that digest again with [`Side::Right`], which
    /// is exactly what construction hashed.
    pub fn proof(&self, index: usize) -> Result<Vec<ProofStep>, MerkleError> {
        if index >= self.leaf_count() {
            return Err(MerkleError::IndexOutOfRange {
                index,
                leaf_count: self.leaf_count(),
            });
        }

        let mut proof = Vec::with_capacity(self.depth() - 1);
        let mut index = index;

        for level in &self.levels[..self.levels.len() - 1] {
            let sibling_index = index ^ 1;
            let step = if sibling_index < level.len() {
                ProofStep {
                    sibling: level[sibling_index],
                    side: if index % 2 == 0 { Side::Right } else { Side::Left },
                }
            } else {
                // Self-paired last digest of an odd level
                ProofStep {
                    sibling: level[index],
                    side: Side::Right,
                }
            };
            proof.push(step);
            index /= 2;
        }

        Ok(proof)
    }
}

/// Verify an inclusion proof with SHA-256.
///
/// See [`verify_proof_with`].
pub fn verify_proof<T: AsRef<[u8]>>(
    index: usize,
    leaf_data: T,
    proof: &[ProofStep],
    root: &Digest,
) -> Result<bool, MerkleError> {
    verify_proof_with(&Sha256Hasher, index, leaf_data, proof, root)
}

/// Verify an inclusion proof with a caller-supplied hasher, independently of
/// any tree instance.
///
/// The leaf data is hashed, then combined with one sibling per step: at an
/// even position the path node is on the left (`H(current || sibling)`), at
/// an odd position on the right (`H(sibling || current)`), halving the
/// position after each level. The proof is valid iff the final digest equals
/// `root`.
///
/// Every legitimate mismatch (wrong leaf data, tampered sibling or side,
/// wrong index, truncated or extended proof) yields `Ok(false)`.
/// `Err(InvalidProofFormat)` is reserved for proofs that are structurally
/// impossible: an index that cannot reach the root in `proof.len()` halvings.
pub fn verify_proof_with<H: Hasher, T: AsRef<[u8]>>(
    hasher: &H,
    index: usize,
    leaf_data: T,
    proof: &[ProofStep],
    root: &Digest,
) -> Result<bool, MerkleError> {
    // The position halves once per step; an index this large could never
    // reach position zero, so no tree of this depth contains it.
    if proof.len() < usize::BITS as usize && index >> proof.len() != 0 {
        return Err(MerkleError::InvalidProofFormat);
    }

    let mut current = hasher.digest(leaf_data.as_ref());
    let mut index = index;

    for step in proof {
        let side = if index % 2 == 0 { Side::Right } else { Side::Left };
        if step.side != side {
            // The recorded side contradicts the claimed position: the proof
            // was not produced for this index.
            return Ok(false);
        }
        current = match side {
            Side::Right => hasher.digest_pair(&current, &step.sibling),
            Side::Left => hasher.digest_pair(&step.sibling, &current),
        };
        index /= 2;
    }

    Ok(current == *root)
}
