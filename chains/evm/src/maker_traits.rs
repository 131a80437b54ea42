use alloy_primitives::Address;
use common::constants::{UINT_40_MAX, UINT_80_MAX};
use common::error::{EscrowError, Result};
use common::U256;

const ALLOWED_SENDER: (usize, usize) = (0, 80);
const EXPIRATION: (usize, usize) = (80, 120);
const NONCE_OR_EPOCH: (usize, usize) = (120, 160);
const SERIES: (usize, usize) = (160, 200);

const NO_PARTIAL_FILLS_FLAG: usize = 255;
const ALLOW_MULTIPLE_FILLS_FLAG: usize = 254;
const PRE_INTERACTION_CALL_FLAG: usize = 252;
const POST_INTERACTION_CALL_FLAG: usize = 251;
const NEED_CHECK_EPOCH_MANAGER_FLAG: usize = 250;
const HAS_EXTENSION_FLAG: usize = 249;
const USE_PERMIT2_FLAG: usize = 248;
const UNWRAP_WETH_FLAG: usize = 247;

/// Limit order v4 `makerTraits` word: fill-mode flags plus packed low fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MakerTraits(U256);

impl MakerTraits {
    pub fn new(value: U256) -> Self {
        Self(value)
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    pub fn allowed_sender(&self) -> u128 {
        self.0.get_bits(ALLOWED_SENDER.0, ALLOWED_SENDER.1).to_u128().unwrap_or_default()
    }

    pub fn is_private(&self) -> bool {
        self.allowed_sender() != 0
    }

    /// Restricts the taker to an address whose low 80 bits match.
    pub fn with_allowed_sender(self, sender: Address) -> Result<Self> {
        let mut low = [0u8; 32];
        low[22..].copy_from_slice(&sender.as_slice()[10..]);
        let value = U256::from_be_bytes(&low) & U256::from_u128(UINT_80_MAX);
        self.with_field(ALLOWED_SENDER, value)
    }

    pub fn expiration(&self) -> Option<u64> {
        let value = self.0.get_bits(EXPIRATION.0, EXPIRATION.1).low_u64();
        (value != 0).then_some(value)
    }

    pub fn with_expiration(self, expiration: u64) -> Result<Self> {
        check_u40("expiration", expiration)?;
        self.with_field(EXPIRATION, U256::from(expiration))
    }

    pub fn is_expired_at(&self, time: u64) -> bool {
        self.expiration().is_some_and(|expiration| expiration <= time)
    }

    pub fn nonce_or_epoch(&self) -> u64 {
        self.0.get_bits(NONCE_OR_EPOCH.0, NONCE_OR_EPOCH.1).low_u64()
    }

    pub fn with_nonce(self, nonce: u64) -> Result<Self> {
        check_u40("nonce", nonce)?;
        self.with_field(NONCE_OR_EPOCH, U256::from(nonce))
    }

    pub fn series(&self) -> u64 {
        self.0.get_bits(SERIES.0, SERIES.1).low_u64()
    }

    /// Epoch-manager invalidation; incompatible with the bit invalidator.
    pub fn with_epoch(self, series: u64, epoch: u64) -> Result<Self> {
        check_u40("series", series)?;
        let traits = self
            .with_field(SERIES, U256::from(series))?
            .with_nonce(epoch)?;
        Ok(traits.with_flag(NEED_CHECK_EPOCH_MANAGER_FLAG, true))
    }

    pub fn is_partial_fill_allowed(&self) -> bool {
        !self.0.get_bit(NO_PARTIAL_FILLS_FLAG)
    }

    pub fn with_partial_fills(self, allowed: bool) -> Self {
        self.with_flag(NO_PARTIAL_FILLS_FLAG, !allowed)
    }

    pub fn is_multiple_fills_allowed(&self) -> bool {
        self.0.get_bit(ALLOW_MULTIPLE_FILLS_FLAG)
    }

    pub fn with_multiple_fills(self, allowed: bool) -> Self {
        self.with_flag(ALLOW_MULTIPLE_FILLS_FLAG, allowed)
    }

    /// Orders that cannot be filled repeatedly are invalidated through a nonce bitmap.
    pub fn is_bit_invalidator_mode(&self) -> bool {
        !self.is_partial_fill_allowed() || !self.is_multiple_fills_allowed()
    }

    pub fn has_pre_interaction(&self) -> bool {
        self.0.get_bit(PRE_INTERACTION_CALL_FLAG)
    }

    pub fn with_pre_interaction(self, enabled: bool) -> Self {
        self.with_flag(PRE_INTERACTION_CALL_FLAG, enabled)
    }

    pub fn has_post_interaction(&self) -> bool {
        self.0.get_bit(POST_INTERACTION_CALL_FLAG)
    }

    pub fn with_post_interaction(self, enabled: bool) -> Self {
        self.with_flag(POST_INTERACTION_CALL_FLAG, enabled)
    }

    pub fn is_epoch_manager_enabled(&self) -> bool {
        self.0.get_bit(NEED_CHECK_EPOCH_MANAGER_FLAG)
    }

    pub fn has_extension(&self) -> bool {
        self.0.get_bit(HAS_EXTENSION_FLAG)
    }

    pub fn with_extension(self, enabled: bool) -> Self {
        self.with_flag(HAS_EXTENSION_FLAG, enabled)
    }

    pub fn is_permit2(&self) -> bool {
        self.0.get_bit(USE_PERMIT2_FLAG)
    }

    pub fn with_permit2(self, enabled: bool) -> Self {
        self.with_flag(USE_PERMIT2_FLAG, enabled)
    }

    pub fn is_native_unwrap_enabled(&self) -> bool {
        self.0.get_bit(UNWRAP_WETH_FLAG)
    }

    pub fn with_native_unwrap(self, enabled: bool) -> Self {
        self.with_flag(UNWRAP_WETH_FLAG, enabled)
    }

    fn with_flag(self, bit: usize, set: bool) -> Self {
        Self(self.0.with_bit(bit, set))
    }

    fn with_field(self, (from, to): (usize, usize), value: U256) -> Result<Self> {
        Ok(Self(self.0.with_bits(from, to, value)?))
    }
}

fn check_u40(name: &str, value: u64) -> Result<()> {
    if value > UINT_40_MAX {
        return Err(EscrowError::Config(format!("{name} {value} does not fit into 40 bits")));
    }
    Ok(())
}

impl From<MakerTraits> for U256 {
    fn from(traits: MakerTraits) -> Self {
        traits.0
    }
}
