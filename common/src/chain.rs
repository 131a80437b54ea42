use crate::error::{EscrowError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChainFamily {
    Evm,
    Solana,
}

/// Chains escrows can be deployed on.
#[repr(u64)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NetworkEnum {
    Ethereum = 1,
    Optimism = 10,
    Binance = 56,
    Gnosis = 100,
    Unichain = 130,
    Polygon = 137,
    Sonic = 146,
    Fantom = 250,
    ZkSync = 324,
    Solana = 501,
    Coinbase = 8453,
    Arbitrum = 42161,
    Avalanche = 43114,
    Linea = 59144,
}

impl NetworkEnum {
    pub const ALL: [NetworkEnum; 14] = [
        NetworkEnum::Ethereum,
        NetworkEnum::Optimism,
        NetworkEnum::Binance,
        NetworkEnum::Gnosis,
        NetworkEnum::Unichain,
        NetworkEnum::Polygon,
        NetworkEnum::Sonic,
        NetworkEnum::Fantom,
        NetworkEnum::ZkSync,
        NetworkEnum::Solana,
        NetworkEnum::Coinbase,
        NetworkEnum::Arbitrum,
        NetworkEnum::Avalanche,
        NetworkEnum::Linea,
    ];

    pub fn chain_id(self) -> u64 {
        self as u64
    }

    pub fn family(self) -> ChainFamily {
        match self {
            NetworkEnum::Solana => ChainFamily::Solana,
            _ => ChainFamily::Evm,
        }
    }

    pub fn is_evm(self) -> bool {
        self.family() == ChainFamily::Evm
    }

    pub fn is_solana(self) -> bool {
        self.family() == ChainFamily::Solana
    }
}

impl TryFrom<u64> for NetworkEnum {
    type Error = EscrowError;

    fn try_from(chain_id: u64) -> Result<Self> {
        NetworkEnum::ALL
            .into_iter()
            .find(|chain| chain.chain_id() == chain_id)
            .ok_or(EscrowError::UnsupportedChain(chain_id))
    }
}

pub fn is_supported_chain(chain_id: u64) -> bool {
    NetworkEnum::try_from(chain_id).is_ok()
}

/// Rejects unsupported chains and a destination equal to the source.
pub fn validate_chain_pair(src_chain_id: u64, dst_chain_id: u64) -> Result<(NetworkEnum, NetworkEnum)> {
    let src = NetworkEnum::try_from(src_chain_id)?;
    let dst = NetworkEnum::try_from(dst_chain_id)?;
    if src == dst {
        return Err(EscrowError::SameChain(src_chain_id));
    }
    Ok((src, dst))
}
