use alloy_primitives::{keccak256, Address, B256};
use alloy_sol_types::{eip712_domain, sol, SolStruct};
use common::chain::NetworkEnum;
use common::error::{EscrowError, Result};
use common::U256;

use crate::constants::{limit_order_protocol, EIP712_DOMAIN_NAME, EIP712_DOMAIN_VERSION};
use crate::extension::Extension;
use crate::maker_traits::MakerTraits;

sol! {
    /// Limit order v4 as signed by the maker.
    #[derive(Debug, PartialEq, Eq)]
    struct Order {
        uint256 salt;
        address maker;
        address receiver;
        address makerAsset;
        address takerAsset;
        uint256 makingAmount;
        uint256 takingAmount;
        uint256 makerTraits;
    }
}

const BASE_SALT_OFFSET: usize = 160;
const TRACK_CODE_OFFSET: usize = 224;

/// First four bytes of `keccak256(source)`, identifying the integration that built the order.
pub fn track_code(source: &str) -> u32 {
    let hash = keccak256(source.as_bytes());
    u32::from_be_bytes([hash[0], hash[1], hash[2], hash[3]])
}

/// `trackCode << 224 | baseSalt << 160 | uint160(keccak256(extension))`
pub fn build_salt(extension: &Extension, base_salt: u64, source: &str) -> Result<U256> {
    U256::zero()
        .with_bits(0, BASE_SALT_OFFSET, extension.salt_commitment()?)?
        .with_bits(BASE_SALT_OFFSET, TRACK_CODE_OFFSET, U256::from(base_salt))?
        .with_bits(TRACK_CODE_OFFSET, 256, U256::from(track_code(source) as u64))
}

/// Rejects a salt that does not commit to `extension`.
pub fn verify_salt(salt: U256, extension: &Extension) -> Result<()> {
    let expected = extension.salt_commitment()?;
    if salt.get_bits(0, BASE_SALT_OFFSET) != expected {
        return Err(EscrowError::InvalidExtension(
            "order salt does not commit to the extension".to_string(),
        ));
    }
    Ok(())
}

pub fn base_salt(salt: U256) -> u64 {
    salt.get_bits(BASE_SALT_OFFSET, TRACK_CODE_OFFSET).low_u64()
}

/// Order fields that do not depend on the extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LimitOrder {
    pub salt: U256,
    pub maker: Address,
    pub receiver: Address,
    pub maker_asset: Address,
    pub taker_asset: Address,
    pub making_amount: U256,
    pub taking_amount: U256,
    pub maker_traits: MakerTraits,
}

impl LimitOrder {
    pub fn build(&self) -> Order {
        Order {
            salt: self.salt.into(),
            maker: self.maker,
            receiver: self.receiver,
            makerAsset: self.maker_asset,
            takerAsset: self.taker_asset,
            makingAmount: self.making_amount.into(),
            takingAmount: self.taking_amount.into(),
            makerTraits: self.maker_traits.as_u256().into(),
        }
    }

    pub fn from_order(order: &Order) -> Self {
        Self {
            salt: order.salt.into(),
            maker: order.maker,
            receiver: order.receiver,
            maker_asset: order.makerAsset,
            taker_asset: order.takerAsset,
            making_amount: order.makingAmount.into(),
            taking_amount: order.takingAmount.into(),
            maker_traits: MakerTraits::new(order.makerTraits.into()),
        }
    }

    /// EIP-712 hash under the limit order protocol deployed on `chain`.
    pub fn get_order_hash(&self, chain: NetworkEnum) -> B256 {
        let domain = eip712_domain! {
            name: EIP712_DOMAIN_NAME,
            version: EIP712_DOMAIN_VERSION,
            chain_id: chain.chain_id(),
            verifying_contract: limit_order_protocol(chain),
        };
        self.build().eip712_signing_hash(&domain)
    }
}
