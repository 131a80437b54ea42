use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_spl::associated_token::ID as ASSOCIATED_TOKEN_PROGRAM_ID;
use common::constants::UINT_32_MAX;
use common::error::{EscrowError, Result};
use common::{HashLock, Immutables, MerkleProof, U256};
use solana_program::{system_program, sysvar::rent};
use tracing::debug;

use crate::config::SvmProgramConfig;
use crate::instructions::{build_instruction, dst, parse_instruction, src, PublicWithdraw, Withdraw};
use crate::order::SvmCrossChainOrder;
use crate::pda::{amount_to_u64, find_ata, find_order_address, find_resolver_access_address};

fn ata_unless_native(native: bool, owner: &Pubkey, mint: &Pubkey, token_program: &Pubkey) -> Option<Pubkey> {
    (!native).then(|| find_ata(owner, mint, token_program))
}

/// Instructions of the source escrow program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SvmSrcEscrowFactory {
    program_id: Pubkey,
    whitelist_program: Pubkey,
}

impl SvmSrcEscrowFactory {
    pub fn new(config: &SvmProgramConfig) -> Self {
        Self {
            program_id: config.src_escrow_program,
            whitelist_program: config.whitelist_program,
        }
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    fn resolver_access(&self, resolver: &Pubkey) -> Pubkey {
        find_resolver_access_address(&self.whitelist_program, resolver).0
    }

    /// Maker places `order`, moving the making amount into the order account.
    pub fn create_order(&self, order: &SvmCrossChainOrder, token_program: &Pubkey) -> Result<Instruction> {
        let order_hash = order.get_order_hash()?;
        let (order_account, _) = find_order_address(&self.program_id, &order_hash);
        let mint = order.src_token();
        let dst_chain_id = order.dst_chain_id();
        if dst_chain_id > UINT_32_MAX {
            return Err(EscrowError::Config(format!("chain id {dst_chain_id} does not fit into u32")));
        }
        let dst_safety_deposit = order.dst_safety_deposit().to_u128().ok_or_else(|| {
            EscrowError::Config(format!(
                "dst safety deposit {} does not fit into u128",
                order.dst_safety_deposit()
            ))
        })?;

        let args = src::Create {
            amount: order.src_amount(),
            hashlock: order.hash_lock().to_bytes(),
            safety_deposit: order.src_safety_deposit(),
            timelocks: order.time_locks().to_limbs(),
            expiration_time: order.deadline(),
            asset_is_native: order.src_asset_is_native(),
            dst_amount: order.min_dst_amount(),
            dutch_auction_data_hash: order.auction().hash_for_solana()?,
            max_cancellation_premium: order.resolver_cancellation().max_cancellation_premium,
            cancellation_auction_duration: order.resolver_cancellation().cancellation_auction_duration,
            allow_multiple_fills: order.is_multiple_fills_allowed(),
            salt: order.salt(),
            dst_chain_params: src::DstChainParams {
                chain_id: dst_chain_id as u32,
                maker_address: order.receiver().to_bytes32(),
                token: order.dst_token().to_bytes32(),
                safety_deposit: dst_safety_deposit,
            },
        };
        let accounts = src::CreateAccounts {
            maker: order.maker(),
            mint,
            maker_ata: ata_unless_native(order.src_asset_is_native(), &order.maker(), &mint, token_program),
            order: order_account,
            order_ata: find_ata(&order_account, &mint, token_program),
            associated_token_program: ASSOCIATED_TOKEN_PROGRAM_ID,
            token_program: *token_program,
            rent: rent::ID,
            system_program: system_program::ID,
        };
        debug!(order = %order_account, "create order");
        build_instruction(&self.program_id, &accounts, &args)
    }

    /// Resolver `taker` fills `amount` of `order` into a new escrow. Partial fills of a
    /// multi-fill order carry the proof of the revealed secret.
    pub fn create_escrow(
        &self,
        order: &SvmCrossChainOrder,
        taker: &Pubkey,
        amount: u64,
        merkle_proof: Option<MerkleProof>,
        token_program: &Pubkey,
    ) -> Result<Instruction> {
        let hash_lock = merkle_proof
            .as_ref()
            .map(|proof| HashLock::from_bytes(proof.hashed_secret));
        let immutables = order.to_src_immutables(*taker, U256::from(amount), hash_lock)?;
        let (order_account, _) = find_order_address(&self.program_id, &immutables.order_hash());
        let escrow = immutables.get_src_escrow_address(&self.program_id);
        let mint = order.src_token();

        let args = src::CreateEscrow {
            amount,
            dutch_auction_data: order.auction().to_auction_data()?,
            merkle_proof,
        };
        let accounts = src::CreateEscrowAccounts {
            taker: *taker,
            resolver_access: self.resolver_access(taker),
            maker: order.maker(),
            mint,
            order: order_account,
            order_ata: find_ata(&order_account, &mint, token_program),
            escrow,
            escrow_ata: find_ata(&escrow, &mint, token_program),
            associated_token_program: ASSOCIATED_TOKEN_PROGRAM_ID,
            token_program: *token_program,
            system_program: system_program::ID,
        };
        build_instruction(&self.program_id, &accounts, &args)
    }

    pub fn withdraw(
        &self,
        immutables: &Immutables<Pubkey>,
        secret: [u8; 32],
        token_program: &Pubkey,
    ) -> Result<Instruction> {
        let escrow = immutables.get_src_escrow_address(&self.program_id);
        let (taker, mint) = (immutables.taker(), immutables.token());
        let accounts = src::WithdrawAccounts {
            taker,
            mint,
            escrow,
            escrow_ata: find_ata(&escrow, &mint, token_program),
            taker_ata: find_ata(&taker, &mint, token_program),
            token_program: *token_program,
            system_program: system_program::ID,
        };
        build_instruction(&self.program_id, &accounts, &Withdraw { secret })
    }

    /// Withdrawal to the taker triggered by any whitelisted `payer`.
    pub fn public_withdraw(
        &self,
        immutables: &Immutables<Pubkey>,
        secret: [u8; 32],
        payer: &Pubkey,
        token_program: &Pubkey,
    ) -> Result<Instruction> {
        let escrow = immutables.get_src_escrow_address(&self.program_id);
        let (taker, mint) = (immutables.taker(), immutables.token());
        let accounts = src::PublicWithdrawAccounts {
            taker,
            payer: *payer,
            resolver_access: self.resolver_access(payer),
            mint,
            escrow,
            escrow_ata: find_ata(&escrow, &mint, token_program),
            taker_ata: find_ata(&taker, &mint, token_program),
            token_program: *token_program,
            system_program: system_program::ID,
        };
        build_instruction(&self.program_id, &accounts, &PublicWithdraw { secret })
    }

    pub fn cancel_escrow(
        &self,
        immutables: &Immutables<Pubkey>,
        asset_is_native: bool,
        token_program: &Pubkey,
    ) -> Result<Instruction> {
        let escrow = immutables.get_src_escrow_address(&self.program_id);
        let (maker, mint) = (immutables.maker(), immutables.token());
        let accounts = src::CancelEscrowAccounts {
            taker: immutables.taker(),
            maker,
            mint,
            escrow,
            escrow_ata: find_ata(&escrow, &mint, token_program),
            maker_ata: ata_unless_native(asset_is_native, &maker, &mint, token_program),
            token_program: *token_program,
            system_program: system_program::ID,
        };
        build_instruction(&self.program_id, &accounts, &src::CancelEscrow {})
    }

    pub fn public_cancel_escrow(
        &self,
        immutables: &Immutables<Pubkey>,
        payer: &Pubkey,
        token_program: &Pubkey,
    ) -> Result<Instruction> {
        let escrow = immutables.get_src_escrow_address(&self.program_id);
        let (maker, mint) = (immutables.maker(), immutables.token());
        let accounts = src::PublicCancelEscrowAccounts {
            taker: immutables.taker(),
            maker,
            mint,
            payer: *payer,
            resolver_access: self.resolver_access(payer),
            escrow,
            escrow_ata: find_ata(&escrow, &mint, token_program),
            maker_ata: find_ata(&maker, &mint, token_program),
            token_program: *token_program,
            system_program: system_program::ID,
        };
        build_instruction(&self.program_id, &accounts, &src::PublicCancelEscrow {})
    }

    /// Maker withdraws the unfilled remainder of `order`.
    pub fn cancel_order(&self, order: &SvmCrossChainOrder, token_program: &Pubkey) -> Result<Instruction> {
        let (order_account, _) = find_order_address(&self.program_id, &order.get_order_hash()?);
        let (maker, mint) = (order.maker(), order.src_token());
        let accounts = src::CancelOrderAccounts {
            maker,
            mint,
            order: order_account,
            order_ata: find_ata(&order_account, &mint, token_program),
            maker_ata: ata_unless_native(order.src_asset_is_native(), &maker, &mint, token_program),
            token_program: *token_program,
            system_program: system_program::ID,
        };
        build_instruction(&self.program_id, &accounts, &src::CancelOrder {})
    }

    /// Resolver cancels an expired `order` for at most `reward_limit` of its premium.
    pub fn cancel_order_by_resolver(
        &self,
        order: &SvmCrossChainOrder,
        resolver: &Pubkey,
        reward_limit: u64,
        token_program: &Pubkey,
    ) -> Result<Instruction> {
        let (order_account, _) = find_order_address(&self.program_id, &order.get_order_hash()?);
        let (maker, mint) = (order.maker(), order.src_token());
        let accounts = src::CancelOrderByResolverAccounts {
            resolver: *resolver,
            resolver_access: self.resolver_access(resolver),
            maker,
            mint,
            order: order_account,
            order_ata: find_ata(&order_account, &mint, token_program),
            maker_ata: ata_unless_native(order.src_asset_is_native(), &maker, &mint, token_program),
            token_program: *token_program,
            system_program: system_program::ID,
        };
        build_instruction(&self.program_id, &accounts, &src::CancelOrderByResolver { reward_limit })
    }

    pub fn parse_create_order(&self, ix: &Instruction) -> Result<(src::CreateAccounts, src::Create)> {
        parse_instruction(&self.program_id, ix)
    }

    pub fn parse_create_escrow(
        &self,
        ix: &Instruction,
    ) -> Result<(src::CreateEscrowAccounts, src::CreateEscrow)> {
        parse_instruction(&self.program_id, ix)
    }

    pub fn parse_withdraw(&self, ix: &Instruction) -> Result<(src::WithdrawAccounts, Withdraw)> {
        parse_instruction(&self.program_id, ix)
    }

    pub fn parse_public_withdraw(
        &self,
        ix: &Instruction,
    ) -> Result<(src::PublicWithdrawAccounts, PublicWithdraw)> {
        parse_instruction(&self.program_id, ix)
    }

    pub fn parse_cancel_escrow(
        &self,
        ix: &Instruction,
    ) -> Result<(src::CancelEscrowAccounts, src::CancelEscrow)> {
        parse_instruction(&self.program_id, ix)
    }

    pub fn parse_public_cancel_escrow(
        &self,
        ix: &Instruction,
    ) -> Result<(src::PublicCancelEscrowAccounts, src::PublicCancelEscrow)> {
        parse_instruction(&self.program_id, ix)
    }

    pub fn parse_cancel_order(
        &self,
        ix: &Instruction,
    ) -> Result<(src::CancelOrderAccounts, src::CancelOrder)> {
        parse_instruction(&self.program_id, ix)
    }

    pub fn parse_cancel_order_by_resolver(
        &self,
        ix: &Instruction,
    ) -> Result<(src::CancelOrderByResolverAccounts, src::CancelOrderByResolver)> {
        parse_instruction(&self.program_id, ix)
    }
}

/// Instructions of the destination escrow program. The resolver (immutables taker)
/// creates the escrow and the maker receives from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SvmDstEscrowFactory {
    program_id: Pubkey,
    whitelist_program: Pubkey,
}

impl SvmDstEscrowFactory {
    pub fn new(config: &SvmProgramConfig) -> Self {
        Self {
            program_id: config.dst_escrow_program,
            whitelist_program: config.whitelist_program,
        }
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    pub fn create_escrow(
        &self,
        immutables: &Immutables<Pubkey>,
        src_cancellation_timestamp: u32,
        asset_is_native: bool,
        token_program: &Pubkey,
    ) -> Result<Instruction> {
        let escrow = immutables.get_dst_escrow_address(&self.program_id);
        let (creator, mint) = (immutables.taker(), immutables.token());
        let args = dst::Create {
            order_hash: immutables.order_hash(),
            hashlock: immutables.hash_lock().to_bytes(),
            amount: amount_to_u64(immutables.amount())?,
            safety_deposit: amount_to_u64(immutables.safety_deposit())?,
            recipient: immutables.maker().to_bytes(),
            timelocks: immutables.time_locks().to_limbs(),
            src_cancellation_timestamp,
            asset_is_native,
        };
        let accounts = dst::CreateAccounts {
            creator,
            mint,
            creator_ata: ata_unless_native(asset_is_native, &creator, &mint, token_program),
            escrow,
            escrow_ata: find_ata(&escrow, &mint, token_program),
            associated_token_program: ASSOCIATED_TOKEN_PROGRAM_ID,
            token_program: *token_program,
            rent: rent::ID,
            system_program: system_program::ID,
        };
        debug!(%escrow, "create dst escrow");
        build_instruction(&self.program_id, &accounts, &args)
    }

    pub fn withdraw(
        &self,
        immutables: &Immutables<Pubkey>,
        secret: [u8; 32],
        asset_is_native: bool,
        token_program: &Pubkey,
    ) -> Result<Instruction> {
        let escrow = immutables.get_dst_escrow_address(&self.program_id);
        let (recipient, mint) = (immutables.maker(), immutables.token());
        let accounts = dst::WithdrawAccounts {
            creator: immutables.taker(),
            recipient,
            mint,
            escrow,
            escrow_ata: find_ata(&escrow, &mint, token_program),
            recipient_ata: ata_unless_native(asset_is_native, &recipient, &mint, token_program),
            associated_token_program: ASSOCIATED_TOKEN_PROGRAM_ID,
            token_program: *token_program,
            system_program: system_program::ID,
        };
        build_instruction(&self.program_id, &accounts, &Withdraw { secret })
    }

    pub fn public_withdraw(
        &self,
        immutables: &Immutables<Pubkey>,
        secret: [u8; 32],
        payer: &Pubkey,
        asset_is_native: bool,
        token_program: &Pubkey,
    ) -> Result<Instruction> {
        let escrow = immutables.get_dst_escrow_address(&self.program_id);
        let (recipient, mint) = (immutables.maker(), immutables.token());
        let accounts = dst::PublicWithdrawAccounts {
            creator: immutables.taker(),
            recipient,
            payer: *payer,
            resolver_access: find_resolver_access_address(&self.whitelist_program, payer).0,
            mint,
            escrow,
            escrow_ata: find_ata(&escrow, &mint, token_program),
            recipient_ata: ata_unless_native(asset_is_native, &recipient, &mint, token_program),
            associated_token_program: ASSOCIATED_TOKEN_PROGRAM_ID,
            token_program: *token_program,
            system_program: system_program::ID,
        };
        build_instruction(&self.program_id, &accounts, &PublicWithdraw { secret })
    }

    pub fn cancel(
        &self,
        immutables: &Immutables<Pubkey>,
        asset_is_native: bool,
        token_program: &Pubkey,
    ) -> Result<Instruction> {
        let escrow = immutables.get_dst_escrow_address(&self.program_id);
        let (creator, mint) = (immutables.taker(), immutables.token());
        let accounts = dst::CancelAccounts {
            creator,
            mint,
            escrow,
            escrow_ata: find_ata(&escrow, &mint, token_program),
            creator_ata: ata_unless_native(asset_is_native, &creator, &mint, token_program),
            token_program: *token_program,
            system_program: system_program::ID,
        };
        build_instruction(&self.program_id, &accounts, &dst::Cancel {})
    }

    pub fn parse_create_escrow(&self, ix: &Instruction) -> Result<(dst::CreateAccounts, dst::Create)> {
        parse_instruction(&self.program_id, ix)
    }

    pub fn parse_withdraw(&self, ix: &Instruction) -> Result<(dst::WithdrawAccounts, Withdraw)> {
        parse_instruction(&self.program_id, ix)
    }

    pub fn parse_public_withdraw(
        &self,
        ix: &Instruction,
    ) -> Result<(dst::PublicWithdrawAccounts, PublicWithdraw)> {
        parse_instruction(&self.program_id, ix)
    }

    pub fn parse_cancel(&self, ix: &Instruction) -> Result<(dst::CancelAccounts, dst::Cancel)> {
        parse_instruction(&self.program_id, ix)
    }
}
