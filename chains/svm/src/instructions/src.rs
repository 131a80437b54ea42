//! Source escrow program: maker orders and the escrows resolvers open against them.

use anchor_lang::prelude::Pubkey;
use common::auction::AuctionData;
use common::{MerkleProof, U256};

use super::{instruction_accounts, instruction_args};

/// Destination side of an order, stored alongside it for resolvers.
#[derive(Clone, Debug, Default, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct DstChainParams {
    pub chain_id: u32,
    pub maker_address: [u8; 32],
    pub token: [u8; 32],
    pub safety_deposit: u128,
}

instruction_args! {
    pub struct Create as "create" = [24, 30, 200, 40, 5, 28, 7, 119];
    {
        pub amount: u64,
        pub hashlock: [u8; 32],
        pub safety_deposit: u64,
        pub timelocks: [u64; 4],
        pub expiration_time: u32,
        pub asset_is_native: bool,
        pub dst_amount: U256,
        pub dutch_auction_data_hash: [u8; 32],
        pub max_cancellation_premium: u64,
        pub cancellation_auction_duration: u32,
        pub allow_multiple_fills: bool,
        pub salt: u64,
        pub dst_chain_params: DstChainParams,
    }
}

instruction_args! {
    pub struct CreateEscrow as "create_escrow" = [253, 215, 165, 116, 36, 108, 68, 80];
    {
        pub amount: u64,
        pub dutch_auction_data: AuctionData,
        /// Present for partial fills of multi-fill orders.
        pub merkle_proof: Option<MerkleProof>,
    }
}

instruction_args! {
    pub struct CancelEscrow as "cancel_escrow" = [156, 203, 54, 179, 38, 72, 33, 21];
    {}
}

instruction_args! {
    pub struct PublicCancelEscrow as "public_cancel_escrow" = [170, 254, 78, 87, 31, 84, 118, 13];
    {}
}

instruction_args! {
    pub struct CancelOrder as "cancel_order" = [95, 129, 237, 240, 8, 49, 223, 132];
    {}
}

instruction_args! {
    pub struct CancelOrderByResolver as "cancel_order_by_resolver" = [21, 141, 34, 234, 210, 108, 56, 236];
    { pub reward_limit: u64 }
}

instruction_accounts! {
    pub struct CreateAccounts {
        maker: Pubkey => (true, true),
        mint: Pubkey => (false, false),
        /// Absent when the maker escrows native SOL.
        maker_ata: Option<Pubkey> => (true, false),
        order: Pubkey => (true, false),
        order_ata: Pubkey => (true, false),
        associated_token_program: Pubkey => (false, false),
        token_program: Pubkey => (false, false),
        rent: Pubkey => (false, false),
        system_program: Pubkey => (false, false),
    }
}

instruction_accounts! {
    pub struct CreateEscrowAccounts {
        taker: Pubkey => (true, true),
        resolver_access: Pubkey => (false, false),
        maker: Pubkey => (true, false),
        mint: Pubkey => (false, false),
        order: Pubkey => (true, false),
        order_ata: Pubkey => (true, false),
        escrow: Pubkey => (true, false),
        escrow_ata: Pubkey => (true, false),
        associated_token_program: Pubkey => (false, false),
        token_program: Pubkey => (false, false),
        system_program: Pubkey => (false, false),
    }
}

instruction_accounts! {
    pub struct WithdrawAccounts {
        taker: Pubkey => (true, true),
        mint: Pubkey => (false, false),
        escrow: Pubkey => (true, false),
        escrow_ata: Pubkey => (true, false),
        taker_ata: Pubkey => (true, false),
        token_program: Pubkey => (false, false),
        system_program: Pubkey => (false, false),
    }
}

instruction_accounts! {
    pub struct PublicWithdrawAccounts {
        taker: Pubkey => (true, false),
        payer: Pubkey => (true, true),
        resolver_access: Pubkey => (false, false),
        mint: Pubkey => (false, false),
        escrow: Pubkey => (true, false),
        escrow_ata: Pubkey => (true, false),
        taker_ata: Pubkey => (true, false),
        token_program: Pubkey => (false, false),
        system_program: Pubkey => (false, false),
    }
}

instruction_accounts! {
    pub struct CancelEscrowAccounts {
        taker: Pubkey => (true, true),
        maker: Pubkey => (true, false),
        mint: Pubkey => (false, false),
        escrow: Pubkey => (true, false),
        escrow_ata: Pubkey => (true, false),
        /// Absent when the escrowed SOL is returned unwrapped.
        maker_ata: Option<Pubkey> => (true, false),
        token_program: Pubkey => (false, false),
        system_program: Pubkey => (false, false),
    }
}

instruction_accounts! {
    pub struct PublicCancelEscrowAccounts {
        taker: Pubkey => (true, false),
        maker: Pubkey => (true, false),
        mint: Pubkey => (false, false),
        payer: Pubkey => (true, true),
        resolver_access: Pubkey => (false, false),
        escrow: Pubkey => (true, false),
        escrow_ata: Pubkey => (true, false),
        maker_ata: Pubkey => (true, false),
        token_program: Pubkey => (false, false),
        system_program: Pubkey => (false, false),
    }
}

instruction_accounts! {
    pub struct CancelOrderAccounts {
        maker: Pubkey => (true, true),
        mint: Pubkey => (false, false),
        order: Pubkey => (true, false),
        order_ata: Pubkey => (true, false),
        maker_ata: Option<Pubkey> => (true, false),
        token_program: Pubkey => (false, false),
        system_program: Pubkey => (false, false),
    }
}

instruction_accounts! {
    pub struct CancelOrderByResolverAccounts {
        resolver: Pubkey => (true, true),
        resolver_access: Pubkey => (false, false),
        maker: Pubkey => (true, false),
        mint: Pubkey => (false, false),
        order: Pubkey => (true, false),
        order_ata: Pubkey => (true, false),
        maker_ata: Option<Pubkey> => (true, false),
        token_program: Pubkey => (false, false),
        system_program: Pubkey => (false, false),
    }
}
