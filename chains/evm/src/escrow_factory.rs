use alloy_primitives::{keccak256, Address, B256};
use alloy_sol_types::{sol, SolValue};
use common::chain::NetworkEnum;
use common::error::{EscrowError, Result};
use common::immutables::proxy_init_code_hash;
use common::{DstImmutablesComplement, Immutables, ImmutablesCodec};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::ZKSYNC_CREATE2_PREFIX;
use crate::extension::Interaction;

sol! {
    struct MultipleFillTakerData {
        bytes32[] proof;
        uint256 idx;
        bytes32 secretHash;
    }
}

/// Deployed escrow factory of one chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscrowFactoryConfig {
    pub address: Address,
    /// Hash of the zkSync minimal proxy bytecode; required on zkSync only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zksync_proxy_bytecode_hash: Option<B256>,
}

/// Escrow address derivation of an EVM escrow factory.
pub trait EscrowAddressFactory {
    fn address(&self) -> Address;

    /// Address of the clone of `implementation` deployed with salt `immutables_hash`.
    fn get_escrow_address(&self, immutables_hash: B256, implementation: Address) -> Address;

    fn get_src_escrow_address(
        &self,
        src_immutables: &Immutables<Address>,
        implementation: Address,
    ) -> Result<Address> {
        Ok(self.get_escrow_address(src_immutables.hash()?.into(), implementation))
    }

    /// Destination escrow of `src_immutables` once deployed by `taker` at `block_time`.
    fn get_dst_escrow_address(
        &self,
        src_immutables: &Immutables<Address>,
        complement: &DstImmutablesComplement<Address>,
        block_time: u32,
        taker: Address,
        implementation: Address,
    ) -> Result<Address> {
        let dst = src_immutables
            .with_complement(complement)?
            .with_taker(taker)
            .with_deployed_at(block_time);
        Ok(self.get_escrow_address(dst.hash()?.into(), implementation))
    }

    /// Taker interaction revealing merkle leaf `idx` for a partial fill.
    fn get_multiple_fill_interaction(
        &self,
        proof: &[[u8; 32]],
        idx: u64,
        secret_hash: [u8; 32],
    ) -> Interaction {
        let data = MultipleFillTakerData {
            proof: proof.iter().copied().map(B256::from).collect(),
            idx: alloy_primitives::U256::from(idx),
            secretHash: B256::from(secret_hash),
        };
        Interaction::new(self.address(), data.abi_encode())
    }
}

/// Factory deploying EIP-1167 clones with CREATE2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EscrowFactory {
    address: Address,
}

impl EscrowFactory {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

impl EscrowAddressFactory for EscrowFactory {
    fn address(&self) -> Address {
        self.address
    }

    fn get_escrow_address(&self, immutables_hash: B256, implementation: Address) -> Address {
        let escrow = self
            .address
            .create2(immutables_hash, proxy_init_code_hash(implementation));
        debug!(factory = %self.address, %escrow, "derived create2 escrow address");
        escrow
    }
}

/// Factory on zkSync, where the proxy bytecode does not embed the implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EscrowFactoryZkSync {
    address: Address,
    proxy_bytecode_hash: B256,
}

impl EscrowFactoryZkSync {
    pub fn new(address: Address, proxy_bytecode_hash: B256) -> Self {
        Self {
            address,
            proxy_bytecode_hash,
        }
    }
}

impl EscrowAddressFactory for EscrowFactoryZkSync {
    fn address(&self) -> Address {
        self.address
    }

    fn get_escrow_address(&self, immutables_hash: B256, implementation: Address) -> Address {
        let input_hash = keccak256(implementation.abi_encode());
        let preimage = [
            ZKSYNC_CREATE2_PREFIX.as_slice(),
            self.address.into_word().as_slice(),
            immutables_hash.as_slice(),
            self.proxy_bytecode_hash.as_slice(),
            input_hash.as_slice(),
        ]
        .concat();
        let escrow = Address::from_slice(&keccak256(preimage)[12..]);
        debug!(factory = %self.address, %escrow, "derived zksync escrow address");
        escrow
    }
}

/// Picks the address formula of the chain the factory lives on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscrowFactoryFacade {
    Create2(EscrowFactory),
    ZkSync(EscrowFactoryZkSync),
}

impl EscrowFactoryFacade {
    pub fn new(chain_id: u64, config: &EscrowFactoryConfig) -> Result<Self> {
        let chain = NetworkEnum::try_from(chain_id)?;
        if !chain.is_evm() {
            return Err(EscrowError::UnsupportedChain(chain_id));
        }
        if chain != NetworkEnum::ZkSync {
            return Ok(Self::Create2(EscrowFactory::new(config.address)));
        }
        let hash = config.zksync_proxy_bytecode_hash.ok_or_else(|| {
            EscrowError::Config("zkSync factory requires the proxy bytecode hash".to_string())
        })?;
        Ok(Self::ZkSync(EscrowFactoryZkSync::new(config.address, hash)))
    }

    fn inner(&self) -> &dyn EscrowAddressFactory {
        match self {
            Self::Create2(factory) => factory,
            Self::ZkSync(factory) => factory,
        }
    }
}

impl EscrowAddressFactory for EscrowFactoryFacade {
    fn address(&self) -> Address {
        self.inner().address()
    }

    fn get_escrow_address(&self, immutables_hash: B256, implementation: Address) -> Address {
        self.inner().get_escrow_address(immutables_hash, implementation)
    }
}
