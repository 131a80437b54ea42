use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EscrowError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Unsupported chain: {0}")]
    UnsupportedChain(u64),
    #[error("Source and destination chains are the same: {0}")]
    SameChain(u64),
    #[error("Invalid extension: {0}")]
    InvalidExtension(String),
    #[error("Invalid fill: {0}")]
    InvalidFill(String),
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
    #[error("Invalid instruction: {0}")]
    InvalidInstruction(String),
}

pub type Result<T> = std::result::Result<T, EscrowError>;

impl From<svm_merkle_tree::MerkleTreeError> for EscrowError {
    fn from(err: svm_merkle_tree::MerkleTreeError) -> Self {
        EscrowError::Config(err.to_string())
    }
}

impl From<std::io::Error> for EscrowError {
    fn from(err: std::io::Error) -> Self {
        EscrowError::InvalidEncoding(err.to_string())
    }
}
