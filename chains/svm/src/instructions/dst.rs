//! Destination escrow program: escrows resolvers fund for the maker.

use anchor_lang::prelude::Pubkey;

use super::{instruction_accounts, instruction_args};

instruction_args! {
    pub struct Create as "create" = [24, 30, 200, 40, 5, 28, 7, 119];
    {
        pub order_hash: [u8; 32],
        pub hashlock: [u8; 32],
        pub amount: u64,
        pub safety_deposit: u64,
        pub recipient: [u8; 32],
        pub timelocks: [u64; 4],
        /// Destination cancellation must not outlive the source one.
        pub src_cancellation_timestamp: u32,
        pub asset_is_native: bool,
    }
}

instruction_args! {
    pub struct Cancel as "cancel" = [232, 219, 223, 41, 219, 236, 220, 190];
    {}
}

instruction_accounts! {
    pub struct CreateAccounts {
        creator: Pubkey => (true, true),
        mint: Pubkey => (false, false),
        creator_ata: Option<Pubkey> => (true, false),
        escrow: Pubkey => (true, false),
        escrow_ata: Pubkey => (true, false),
        associated_token_program: Pubkey => (false, false),
        token_program: Pubkey => (false, false),
        rent: Pubkey => (false, false),
        system_program: Pubkey => (false, false),
    }
}

instruction_accounts! {
    pub struct WithdrawAccounts {
        creator: Pubkey => (true, true),
        recipient: Pubkey => (true, false),
        mint: Pubkey => (false, false),
        escrow: Pubkey => (true, false),
        escrow_ata: Pubkey => (true, false),
        /// Absent when the recipient takes native SOL.
        recipient_ata: Option<Pubkey> => (true, false),
        associated_token_program: Pubkey => (false, false),
        token_program: Pubkey => (false, false),
        system_program: Pubkey => (false, false),
    }
}

instruction_accounts! {
    pub struct PublicWithdrawAccounts {
        creator: Pubkey => (true, false),
        recipient: Pubkey => (true, false),
        payer: Pubkey => (true, true),
        resolver_access: Pubkey => (false, false),
        mint: Pubkey => (false, false),
        escrow: Pubkey => (true, false),
        escrow_ata: Pubkey => (true, false),
        recipient_ata: Option<Pubkey> => (true, false),
        associated_token_program: Pubkey => (false, false),
        token_program: Pubkey => (false, false),
        system_program: Pubkey => (false, false),
    }
}

instruction_accounts! {
    pub struct CancelAccounts {
        creator: Pubkey => (true, true),
        mint: Pubkey => (false, false),
        escrow: Pubkey => (true, false),
        escrow_ata: Pubkey => (true, false),
        creator_ata: Option<Pubkey> => (true, false),
        token_program: Pubkey => (false, false),
        system_program: Pubkey => (false, false),
    }
}
