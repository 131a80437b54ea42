use alloy_primitives::{address, b256, Address, B256};
use common::chain::NetworkEnum;

pub const LIMIT_ORDER_PROTOCOL_V4: Address = address!("111111125421ca6dc452d289314280a0f8842a65");
pub const LIMIT_ORDER_PROTOCOL_V4_ZKSYNC: Address =
    address!("6fd4383cb451173d5f9304f041c7bcbf27d561ff");

/// Taker asset of every cross-chain order; the real destination token travels in the extension.
pub const TRUE_ERC20: Address = address!("da0000d4000015a526378bb6fafc650cea5966f8");

/// `keccak256("zksyncCreate2")`
pub const ZKSYNC_CREATE2_PREFIX: B256 =
    b256!("2020dba91b30cc0006188af794c2fb30dd8520db7e2c088b7fc7c103c00ca494");

pub const EIP712_DOMAIN_NAME: &str = "1inch Aggregation Router";
pub const EIP712_DOMAIN_VERSION: &str = "6";

pub const DEFAULT_SOURCE: &str = "sdk";

/// Seconds an order stays valid after its auction ends, unless overridden.
pub const DEFAULT_ORDER_EXPIRATION_DELAY: u64 = 12;

/// ABI tuple `(bytes32, uint256, address, uint256, uint256)` appended to the post-interaction.
pub const ESCROW_EXTRA_DATA_LEN: usize = 160;

pub fn limit_order_protocol(chain: NetworkEnum) -> Address {
    match chain {
        NetworkEnum::ZkSync => LIMIT_ORDER_PROTOCOL_V4_ZKSYNC,
        _ => LIMIT_ORDER_PROTOCOL_V4,
    }
}
