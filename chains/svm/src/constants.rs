use solana_program::{pubkey, pubkey::Pubkey};

pub const SRC_ESCROW_PROGRAM_ID: Pubkey = pubkey!("6NwMYeUmigiMDjhYeYpbxC6Kc63NzZy1dfGd7fGcdkVS");
pub const DST_ESCROW_PROGRAM_ID: Pubkey = pubkey!("AMEAktCrii7mVFQKCM9i5hKES4YrV3zFagrawr8BY8pb");

pub const ORDER_SEED: &[u8] = b"order";
pub const ESCROW_SEED: &[u8] = b"escrow";
pub const RESOLVER_ACCESS_SEED: &[u8] = b"resolver_access";

/// Seconds an order stays valid after its auction ends, unless overridden.
pub const DEFAULT_ORDER_EXPIRATION_DELAY: u64 = 12;
