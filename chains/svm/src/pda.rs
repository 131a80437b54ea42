use anchor_lang::prelude::Pubkey;
use anchor_spl::associated_token::spl_associated_token_account::get_associated_token_address_with_program_id;
use common::U256;

use crate::constants::{ESCROW_SEED, ORDER_SEED, RESOLVER_ACCESS_SEED};

pub fn find_order_address(program_id: &Pubkey, order_hash: &[u8; 32]) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[ORDER_SEED, order_hash], program_id)
}

#[allow(clippy::too_many_arguments)]
pub fn find_escrow_address(
    program_id: &Pubkey,
    order_hash: &[u8; 32],
    hash_lock: &[u8; 32],
    creator: &Pubkey,
    recipient: &Pubkey,
    token: &Pubkey,
    amount: u64,
    safety_deposit: u64,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            ESCROW_SEED,
            order_hash,
            hash_lock,
            creator.as_ref(),
            recipient.as_ref(),
            token.as_ref(),
            &amount.to_be_bytes(),
            &safety_deposit.to_be_bytes(),
        ],
        program_id,
    )
}

pub fn find_resolver_access_address(whitelist_program: &Pubkey, resolver: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[RESOLVER_ACCESS_SEED, resolver.as_ref()], whitelist_program)
}

pub fn find_ata(owner: &Pubkey, mint: &Pubkey, token_program: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(owner, mint, token_program)
}

/// Amount fields of Solana escrows are u64.
pub(crate) fn amount_to_u64(value: U256) -> common::Result<u64> {
    value.to_u64().ok_or_else(|| {
        common::EscrowError::Config(format!("amount {value} does not fit into u64"))
    })
}
