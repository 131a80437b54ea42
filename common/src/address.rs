use core::fmt;
use core::fmt::Debug;

use alloy_primitives::{address, Address as EvmAddress};
use anchor_lang::prelude::Pubkey;

use crate::chain::ChainFamily;
use crate::constants::ADDRESS_COMPLEMENT_BYTES;
use crate::error::{EscrowError, Result};
use crate::u256::U256;

/// Sentinel EVM contracts use for the chain's native currency.
pub const EVM_NATIVE_CURRENCY: EvmAddress = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

/// Wrapped SOL mint, standing in for native SOL.
pub const SOLANA_NATIVE_MINT: Pubkey = anchor_spl::token::spl_token::native_mint::ID;

/// Address representation of one chain family.
pub trait ChainAddress: Copy + Eq + Debug + Send + Sync + 'static {
    const FAMILY: ChainFamily;
    const NATIVE: Self;
    const ZERO: Self;
    /// Largest amount an escrow on this chain can hold.
    const MAX_AMOUNT: U256;

    fn to_buffer(&self) -> Vec<u8>;

    /// Left-padded to 32 bytes.
    fn to_bytes32(&self) -> [u8; 32];

    fn into_address(self) -> Address;

    fn is_native(&self) -> bool {
        *self == Self::NATIVE
    }

    fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    fn zero_as_native(self) -> Self {
        if self.is_zero() {
            Self::NATIVE
        } else {
            self
        }
    }
}

impl ChainAddress for EvmAddress {
    const FAMILY: ChainFamily = ChainFamily::Evm;
    const NATIVE: Self = EVM_NATIVE_CURRENCY;
    const ZERO: Self = EvmAddress::ZERO;
    const MAX_AMOUNT: U256 = U256::MAX;

    fn to_buffer(&self) -> Vec<u8> {
        self.to_vec()
    }

    fn to_bytes32(&self) -> [u8; 32] {
        self.into_word().0
    }

    fn into_address(self) -> Address {
        Address::Evm(self)
    }
}

impl ChainAddress for Pubkey {
    const FAMILY: ChainFamily = ChainFamily::Solana;
    const NATIVE: Self = SOLANA_NATIVE_MINT;
    const ZERO: Self = Pubkey::new_from_array([0u8; 32]);
    const MAX_AMOUNT: U256 = U256::from(u64::MAX);

    fn to_buffer(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn to_bytes32(&self) -> [u8; 32] {
        self.to_bytes()
    }

    fn into_address(self) -> Address {
        Address::Solana(self)
    }
}

/// Address on either chain family.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Address {
    Evm(EvmAddress),
    Solana(Pubkey),
}

impl Address {
    pub fn family(&self) -> ChainFamily {
        match self {
            Address::Evm(_) => ChainFamily::Evm,
            Address::Solana(_) => ChainFamily::Solana,
        }
    }

    pub fn native(family: ChainFamily) -> Self {
        match family {
            ChainFamily::Evm => Address::Evm(EvmAddress::NATIVE),
            ChainFamily::Solana => Address::Solana(Pubkey::NATIVE),
        }
    }

    pub fn to_buffer(&self) -> Vec<u8> {
        match self {
            Address::Evm(a) => a.to_buffer(),
            Address::Solana(a) => a.to_buffer(),
        }
    }

    pub fn to_bytes32(&self) -> [u8; 32] {
        match self {
            Address::Evm(a) => a.to_bytes32(),
            Address::Solana(a) => a.to_bytes32(),
        }
    }

    pub fn is_native(&self) -> bool {
        match self {
            Address::Evm(a) => a.is_native(),
            Address::Solana(a) => a.is_native(),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Address::Evm(a) => a.is_zero(),
            Address::Solana(a) => a.is_zero(),
        }
    }

    pub fn zero_as_native(self) -> Self {
        match self {
            Address::Evm(a) => Address::Evm(a.zero_as_native()),
            Address::Solana(a) => Address::Solana(a.zero_as_native()),
        }
    }

    /// Lowest 20 bytes, the part that fits an EVM address slot.
    pub fn low_20(&self) -> EvmAddress {
        EvmAddress::from_slice(&self.to_bytes32()[ADDRESS_COMPLEMENT_BYTES..])
    }

    /// Highest 12 bytes, zero for EVM addresses.
    pub fn high_12(&self) -> [u8; ADDRESS_COMPLEMENT_BYTES] {
        let mut out = [0u8; ADDRESS_COMPLEMENT_BYTES];
        out.copy_from_slice(&self.to_bytes32()[..ADDRESS_COMPLEMENT_BYTES]);
        out
    }

    /// Rebuilds a Solana address split into an EVM slot and its complement.
    pub fn solana_from_parts(high: [u8; ADDRESS_COMPLEMENT_BYTES], low: EvmAddress) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..ADDRESS_COMPLEMENT_BYTES].copy_from_slice(&high);
        bytes[ADDRESS_COMPLEMENT_BYTES..].copy_from_slice(low.as_slice());
        Address::Solana(Pubkey::new_from_array(bytes))
    }

    pub fn as_evm(&self) -> Result<EvmAddress> {
        match self {
            Address::Evm(a) => Ok(*a),
            Address::Solana(a) => Err(EscrowError::Config(format!(
                "{a} is not an EVM address"
            ))),
        }
    }

    pub fn as_solana(&self) -> Result<Pubkey> {
        match self {
            Address::Solana(a) => Ok(*a),
            Address::Evm(a) => Err(EscrowError::Config(format!(
                "{a} is not a Solana address"
            ))),
        }
    }
}

impl From<EvmAddress> for Address {
    fn from(value: EvmAddress) -> Self {
        Address::Evm(value)
    }
}

impl From<Pubkey> for Address {
    fn from(value: Pubkey) -> Self {
        Address::Solana(value)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Evm(a) => write!(f, "{a}"),
            Address::Solana(a) => write!(f, "{a}"),
        }
    }
}
