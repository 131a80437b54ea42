use alloy_primitives::B256;
use alloy_sol_types::{sol, SolValue};
use common::address::ChainAddress;
use common::chain::{ChainFamily, NetworkEnum};
use common::constants::ADDRESS_COMPLEMENT_BYTES;
use common::error::{EscrowError, Result};
use common::{Address, HashLock, TimeLocks, U256};
use tracing::debug;

use crate::constants::ESCROW_EXTRA_DATA_LEN;
use crate::extension::Extension;
use crate::fusion_extension::{FusionExtension, HAS_ESCROW_DATA_FLAG};

const SETTLEMENT_BYTES: usize = 20;

sol! {
    struct EscrowExtraData {
        bytes32 hashLock;
        uint256 dstChainId;
        address dstToken;
        uint256 deposits;
        uint256 timelocks;
    }
}

/// Fusion extension carrying the cross-chain escrow parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscrowExtension {
    fusion: FusionExtension,
    hash_lock: HashLock,
    dst_chain_id: u64,
    dst_token: Address,
    src_safety_deposit: U256,
    dst_safety_deposit: U256,
    time_locks: TimeLocks,
    /// High bytes of a destination receiver wider than an EVM address.
    dst_receiver_complement: Option<[u8; ADDRESS_COMPLEMENT_BYTES]>,
}

impl EscrowExtension {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fusion: FusionExtension,
        hash_lock: HashLock,
        dst_chain_id: u64,
        dst_token: Address,
        src_safety_deposit: U256,
        dst_safety_deposit: U256,
        time_locks: TimeLocks,
        dst_receiver_complement: Option<[u8; ADDRESS_COMPLEMENT_BYTES]>,
    ) -> Result<Self> {
        let max_deposit = U256::mask(128);
        for (name, deposit) in [("src", src_safety_deposit), ("dst", dst_safety_deposit)] {
            if deposit > max_deposit {
                return Err(EscrowError::Config(format!(
                    "{name} safety deposit {deposit} does not fit into 128 bits"
                )));
            }
        }

        let dst_family = NetworkEnum::try_from(dst_chain_id)?.family();
        if dst_token.family() != dst_family {
            return Err(EscrowError::Config(format!(
                "destination token {dst_token} does not belong to chain {dst_chain_id}"
            )));
        }
        let dst_receiver_complement = match dst_family {
            ChainFamily::Solana => Some(dst_receiver_complement.unwrap_or_default()),
            ChainFamily::Evm => None,
        };

        Ok(Self {
            fusion,
            hash_lock,
            dst_chain_id,
            dst_token: dst_token.zero_as_native(),
            src_safety_deposit,
            dst_safety_deposit,
            time_locks,
            dst_receiver_complement,
        })
    }

    pub fn fusion(&self) -> &FusionExtension {
        &self.fusion
    }

    pub fn hash_lock(&self) -> HashLock {
        self.hash_lock
    }

    pub fn dst_chain_id(&self) -> u64 {
        self.dst_chain_id
    }

    pub fn dst_token(&self) -> Address {
        self.dst_token
    }

    pub fn src_safety_deposit(&self) -> U256 {
        self.src_safety_deposit
    }

    pub fn dst_safety_deposit(&self) -> U256 {
        self.dst_safety_deposit
    }

    pub fn time_locks(&self) -> TimeLocks {
        self.time_locks
    }

    pub fn dst_receiver_complement(&self) -> Option<[u8; ADDRESS_COMPLEMENT_BYTES]> {
        self.dst_receiver_complement
    }

    fn packed_deposits(&self) -> U256 {
        (self.src_safety_deposit << 128) | self.dst_safety_deposit
    }

    fn extra_data(&self) -> Vec<u8> {
        EscrowExtraData {
            hashLock: B256::from(self.hash_lock.to_bytes()),
            dstChainId: U256::from(self.dst_chain_id).into(),
            dstToken: self.dst_token.low_20(),
            deposits: self.packed_deposits().into(),
            timelocks: self.time_locks.pack().into(),
        }
        .abi_encode()
    }

    fn custom_data(&self) -> Vec<u8> {
        match self.dst_receiver_complement {
            Some(receiver) => [&receiver[..], &self.dst_token.high_12()[..]].concat(),
            None => Vec::new(),
        }
    }

    pub fn build(&self) -> Extension {
        self.fusion
            .build_with(HAS_ESCROW_DATA_FLAG, &self.extra_data(), self.custom_data())
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::from_extension(&Extension::decode(bytes)?)
    }

    pub fn from_extension(extension: &Extension) -> Result<Self> {
        let post = &extension.post_interaction;
        let flags_at = SETTLEMENT_BYTES;
        if post.len() < flags_at + 1 + ESCROW_EXTRA_DATA_LEN {
            return Err(EscrowError::InvalidExtension(format!(
                "post-interaction of {} bytes has no room for escrow data",
                post.len()
            )));
        }
        if post[flags_at] & HAS_ESCROW_DATA_FLAG == 0 {
            return Err(EscrowError::InvalidExtension(
                "post-interaction does not carry escrow data".to_string(),
            ));
        }

        let (prefix, tail) = post.split_at(post.len() - ESCROW_EXTRA_DATA_LEN);
        let mut fusion_post = prefix.to_vec();
        fusion_post[flags_at] &= !HAS_ESCROW_DATA_FLAG;
        let fusion = FusionExtension::from_extension(&Extension {
            post_interaction: fusion_post,
            custom_data: Vec::new(),
            ..extension.clone()
        })?;

        let extra = EscrowExtraData::abi_decode(tail)
            .map_err(|e| EscrowError::InvalidExtension(format!("escrow data: {e}")))?;
        let dst_chain_id: U256 = extra.dstChainId.into();
        let dst_chain_id = dst_chain_id.to_u64().ok_or_else(|| {
            EscrowError::InvalidExtension(format!("destination chain id {dst_chain_id} is too large"))
        })?;
        let deposits: U256 = extra.deposits.into();

        let (dst_token, dst_receiver_complement) = match NetworkEnum::try_from(dst_chain_id)?.family() {
            ChainFamily::Evm => (Address::Evm(extra.dstToken), None),
            ChainFamily::Solana => {
                let custom = &extension.custom_data;
                if custom.len() != 2 * ADDRESS_COMPLEMENT_BYTES {
                    return Err(EscrowError::InvalidExtension(format!(
                        "expected {} bytes of address complement, got {}",
                        2 * ADDRESS_COMPLEMENT_BYTES,
                        custom.len()
                    )));
                }
                let mut receiver = [0u8; ADDRESS_COMPLEMENT_BYTES];
                let mut token = [0u8; ADDRESS_COMPLEMENT_BYTES];
                receiver.copy_from_slice(&custom[..ADDRESS_COMPLEMENT_BYTES]);
                token.copy_from_slice(&custom[ADDRESS_COMPLEMENT_BYTES..]);
                (Address::solana_from_parts(token, extra.dstToken), Some(receiver))
            }
        };

        let escrow = Self::new(
            fusion,
            HashLock::from_bytes(extra.hashLock.0),
            dst_chain_id,
            dst_token,
            deposits >> 128,
            deposits.get_bits(0, 128),
            TimeLocks::from_packed(extra.timelocks.into())?,
            dst_receiver_complement,
        )?;
        debug!(dst_chain_id, hash_lock = %escrow.hash_lock, "decoded escrow extension");
        Ok(escrow)
    }
}
