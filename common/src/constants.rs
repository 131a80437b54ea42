/// Discriminator size in bytes
pub const DISCRIMINATOR_BYTES: usize = 8;

/// Denominator of auction rate bumps: a bump of 100_000 doubles the taking amount.
pub const BASE_1E5: u64 = 100_000;

pub const RATE_BUMP_DENOMINATOR: u64 = BASE_1E5;

/// Gas bump estimates are expressed in 1e6 units of the gas price estimate.
pub const GAS_PRICE_BASE: u64 = 1_000_000;

pub const UINT_16_MAX: u64 = 0xffff;
pub const UINT_24_MAX: u64 = 0xff_ffff;
pub const UINT_32_MAX: u64 = 0xffff_ffff;
pub const UINT_40_MAX: u64 = 0xff_ffff_ffff;
pub const UINT_80_MAX: u128 = 0xffff_ffff_ffff_ffff_ffff;

/// Number of leading bytes of a 32-byte pubkey that do not fit into an EVM address slot.
pub const ADDRESS_COMPLEMENT_BYTES: usize = 12;

/// Bytes of an EVM address kept by resolver whitelists.
pub const ADDRESS_HALF_BYTES: usize = 10;
