pub mod address;
pub mod auction;
pub mod bytes_iter;
pub mod chain;
pub mod constants;
pub mod error;
pub mod fills;
pub mod hashlock;
pub mod immutables;
pub mod timelocks;
pub mod u256;

pub use address::{Address, ChainAddress};
pub use error::{EscrowError, Result};
pub use hashlock::{HashLock, MerkleProof};
pub use immutables::{DstImmutablesComplement, Immutables, ImmutablesCodec};
pub use timelocks::TimeLocks;
pub use u256::U256;
