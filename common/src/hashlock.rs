use core::fmt;
use core::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::keccak::{hash, hashv};
use svm_merkle_tree::SimpleMerkleTree;

use crate::error::{EscrowError, Result};
use crate::u256::U256;

/// Bits `[240, 256)` of a multi-fill hash lock hold the parts count.
const PARTS_COUNT_OFFSET: usize = 240;
const PARTS_COUNT_BYTES: usize = 2;

pub const MAX_PARTS_COUNT: u64 = 0xffff;

/// Secret commitment gating escrow withdrawal.
///
/// A single-fill lock is `keccak256(secret)`. A multi-fill lock is the root of a merkle
/// tree over one leaf per secret, with its top 16 bits replaced by the parts count
/// (number of leaves minus one). Which kind a value is must be tracked by the caller.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub struct HashLock([u8; 32]);

impl HashLock {
    pub fn hash_secret(secret: &[u8; 32]) -> [u8; 32] {
        hash(secret).0
    }

    pub fn for_single_fill(secret: &[u8; 32]) -> Self {
        Self(Self::hash_secret(secret))
    }

    /// Builds the packed root for leaves produced by [`HashLock::get_merkle_leaves`].
    pub fn for_multiple_fills(leaves: &[[u8; 32]]) -> Result<Self> {
        if leaves.len() < 2 {
            return Err(EscrowError::Config(
                "multiple fills require at least two leaves, use for_single_fill".to_string(),
            ));
        }
        let parts_count = (leaves.len() - 1) as u64;
        if parts_count > MAX_PARTS_COUNT {
            return Err(EscrowError::Config(format!(
                "{} leaves exceed the maximum of {}",
                leaves.len(),
                MAX_PARTS_COUNT + 1
            )));
        }

        let root = SimpleMerkleTree::of(leaves, true)?.root();
        let packed =
            U256::from_be_bytes(&root).with_bits(PARTS_COUNT_OFFSET, 256, U256::from(parts_count))?;
        Ok(Self(packed.to_be_bytes()))
    }

    pub fn from_bytes(value: [u8; 32]) -> Self {
        Self(value)
    }

    pub fn from_string(value: &str) -> Result<Self> {
        let raw = hex::decode(value.trim_start_matches("0x"))
            .map_err(|e| EscrowError::Config(format!("invalid hash lock {value}: {e}")))?;
        let bytes = <[u8; 32]>::try_from(raw.as_slice())
            .map_err(|_| EscrowError::Config(format!("hash lock {value} must be 32 bytes")))?;
        Ok(Self(bytes))
    }

    pub fn get_merkle_leaves(secrets: &[[u8; 32]]) -> Vec<[u8; 32]> {
        let hashes: Vec<[u8; 32]> = secrets.iter().map(Self::hash_secret).collect();
        Self::get_merkle_leaves_by_secret_hashes(&hashes)
    }

    pub fn get_merkle_leaves_by_secret_hashes(secret_hashes: &[[u8; 32]]) -> Vec<[u8; 32]> {
        secret_hashes
            .iter()
            .enumerate()
            .map(|(idx, secret_hash)| merkle_leaf(idx as u64, secret_hash))
            .collect()
    }

    pub fn get_proof(leaves: &[[u8; 32]], idx: usize) -> Result<Vec<[u8; 32]>> {
        Ok(SimpleMerkleTree::of(leaves, true)?.get_proof(idx)?)
    }

    pub fn get_parts_count(&self) -> u64 {
        U256::from_be_bytes(&self.0)
            .get_bits(PARTS_COUNT_OFFSET, 256)
            .low_u64()
    }

    /// Checks a multi-fill proof against the root bits of this lock.
    pub fn verify_proof(&self, proof: &MerkleProof) -> bool {
        proof.process_proof()[PARTS_COUNT_BYTES..] == self.0[PARTS_COUNT_BYTES..]
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_u256(&self) -> U256 {
        U256::from_be_bytes(&self.0)
    }
}

/// Leaf committing to the secret revealed for fill index `idx`.
pub fn merkle_leaf(idx: u64, secret_hash: &[u8; 32]) -> [u8; 32] {
    hashv(&[&idx.to_be_bytes(), &secret_hash[..]]).0
}

impl AsRef<[u8]> for HashLock {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for HashLock {
    type Err = EscrowError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s)
    }
}

impl fmt::Display for HashLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for HashLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashLock({self})")
    }
}

/// Proof that `hashed_secret` sits at leaf `index` of a multi-fill hash lock.
#[derive(Clone, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct MerkleProof {
    pub proof: Vec<[u8; 32]>,
    pub index: u64,
    pub hashed_secret: [u8; 32],
}

impl MerkleProof {
    pub fn new(leaves: &[[u8; 32]], index: u64, hashed_secret: [u8; 32]) -> Result<Self> {
        Ok(Self {
            proof: HashLock::get_proof(leaves, index as usize)?,
            index,
            hashed_secret,
        })
    }

    /// Computes the Merkle root using the provided proof.
    pub fn process_proof(&self) -> [u8; 32] {
        svm_merkle_tree::process_proof(&merkle_leaf(self.index, &self.hashed_secret), &self.proof)
    }
}
