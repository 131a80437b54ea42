use sha3::{Digest, Keccak256};
use thiserror::Error;

pub type Hash = [u8; 32];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MerkleTreeError {
    #[error("Merkle tree requires at least one leaf")]
    Empty,
    #[error("Leaf index {index} is out of bounds for {len} leaves")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("Invalid hex leaf: {0}")]
    InvalidHex(String),
}

pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256::digest(data).into()
}

/// Hashes a pair of nodes in sorted order, so proofs carry no left/right flags.
pub fn hash_pair(a: &Hash, b: &Hash) -> Hash {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Keccak256::new();
    hasher.update(first);
    hasher.update(second);
    hasher.finalize().into()
}

/// Folds a proof into the root it commits to.
pub fn process_proof(leaf: &Hash, proof: &[Hash]) -> Hash {
    proof
        .iter()
        .fold(*leaf, |computed, sibling| hash_pair(&computed, sibling))
}

pub fn verify(root: &Hash, leaf: &Hash, proof: &[Hash]) -> bool {
    process_proof(leaf, proof) == *root
}

/// Array-backed binary merkle tree laid out like OpenZeppelin's `SimpleMerkleTree`:
/// leaves occupy the tail of the array in reverse order and node `i` has children
/// `2i + 1` and `2i + 2`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleMerkleTree {
    tree: Vec<Hash>,
    // tree position of every leaf, indexed by the leaf's position in the input
    leaf_positions: Vec<usize>,
}

impl SimpleMerkleTree {
    pub fn of(leaves: &[Hash], sort_leaves: bool) -> Result<Self, MerkleTreeError> {
        if leaves.is_empty() {
            return Err(MerkleTreeError::Empty);
        }

        let mut ordered: Vec<(usize, Hash)> = leaves.iter().copied().enumerate().collect();
        if sort_leaves {
            ordered.sort_by(|a, b| a.1.cmp(&b.1));
        }

        let len = 2 * leaves.len() - 1;
        let mut tree = vec![[0u8; 32]; len];
        let mut leaf_positions = vec![0usize; leaves.len()];
        for (i, (value_index, leaf)) in ordered.iter().enumerate() {
            tree[len - 1 - i] = *leaf;
            leaf_positions[*value_index] = len - 1 - i;
        }
        for i in (0..len - leaves.len()).rev() {
            tree[i] = hash_pair(&tree[2 * i + 1], &tree[2 * i + 2]);
        }

        Ok(Self {
            tree,
            leaf_positions,
        })
    }

    pub fn from_hex_leaves(leaves: &[&str], sort_leaves: bool) -> Result<Self, MerkleTreeError> {
        let leaves = leaves
            .iter()
            .map(|leaf| {
                let raw = hex::decode(leaf.trim_start_matches("0x"))
                    .map_err(|e| MerkleTreeError::InvalidHex(e.to_string()))?;
                Hash::try_from(raw.as_slice())
                    .map_err(|_| MerkleTreeError::InvalidHex(format!("{leaf} is not 32 bytes")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::of(&leaves, sort_leaves)
    }

    pub fn root(&self) -> Hash {
        self.tree[0]
    }

    pub fn len(&self) -> usize {
        self.leaf_positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_positions.is_empty()
    }

    pub fn leaf(&self, index: usize) -> Result<Hash, MerkleTreeError> {
        Ok(self.tree[self.position(index)?])
    }

    /// Sibling path from the leaf at input position `index` up to the root.
    pub fn get_proof(&self, index: usize) -> Result<Vec<Hash>, MerkleTreeError> {
        let mut position = self.position(index)?;
        let mut proof = Vec::new();
        while position > 0 {
            let sibling = if position % 2 == 1 {
                position + 1
            } else {
                position - 1
            };
            proof.push(self.tree[sibling]);
            position = (position - 1) / 2;
        }
        Ok(proof)
    }

    pub fn verify(&self, index: usize, proof: &[Hash]) -> Result<bool, MerkleTreeError> {
        Ok(verify(&self.root(), &self.leaf(index)?, proof))
    }

    fn position(&self, index: usize) -> Result<usize, MerkleTreeError> {
        self.leaf_positions
            .get(index)
            .copied()
            .ok_or(MerkleTreeError::IndexOutOfBounds {
                index,
                len: self.leaf_positions.len(),
            })
    }
}
