use anchor_lang::prelude::Pubkey;
use borsh::BorshSerialize;
use common::address::{ChainAddress, SOLANA_NATIVE_MINT};
use common::auction::{AuctionCalculator, AuctionDetails};
use common::chain::{validate_chain_pair, ChainFamily};
use common::constants::UINT_32_MAX;
use common::error::{EscrowError, Result};
use common::fills;
use common::{Address, HashLock, Immutables, TimeLocks, U256};
use muldiv::MulDiv;
use solana_program::keccak::hashv;
use tracing::debug;

use crate::constants::DEFAULT_ORDER_EXPIRATION_DELAY;
use crate::pda::{amount_to_u64, find_order_address};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SvmOrderInfo {
    pub maker: Pubkey,
    pub src_token: Pubkey,
    /// Native SOL is escrowed as wrapped SOL and unwrapped by the program.
    pub src_asset_is_native: bool,
    pub dst_token: Address,
    pub receiver: Address,
    pub src_amount: U256,
    pub min_dst_amount: U256,
    pub salt: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SvmEscrowParams {
    pub hash_lock: HashLock,
    pub time_locks: TimeLocks,
    pub src_chain_id: u64,
    pub dst_chain_id: u64,
    pub src_safety_deposit: U256,
    pub dst_safety_deposit: U256,
}

/// Premium a resolver earns for cancelling an expired order on the maker's behalf.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolverCancellationConfig {
    pub max_cancellation_premium: u64,
    pub cancellation_auction_duration: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SvmExtra {
    pub order_expiration_delay: u64,
    pub allow_multiple_fills: bool,
    pub resolver_cancellation: ResolverCancellationConfig,
}

impl Default for SvmExtra {
    fn default() -> Self {
        Self {
            order_expiration_delay: DEFAULT_ORDER_EXPIRATION_DELAY,
            allow_multiple_fills: true,
            resolver_cancellation: ResolverCancellationConfig::default(),
        }
    }
}

/// Cross-chain order with Solana as the source chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SvmCrossChainOrder {
    maker: Pubkey,
    src_token: Pubkey,
    src_asset_is_native: bool,
    dst_token: Address,
    receiver: Address,
    src_amount: u64,
    min_dst_amount: U256,
    hash_lock: HashLock,
    time_locks: TimeLocks,
    dst_chain_id: u64,
    src_safety_deposit: u64,
    dst_safety_deposit: U256,
    auction: AuctionDetails,
    deadline: u32,
    salt: u64,
    allow_multiple_fills: bool,
    resolver_cancellation: ResolverCancellationConfig,
}

impl SvmCrossChainOrder {
    pub fn new(
        order_info: SvmOrderInfo,
        escrow_params: SvmEscrowParams,
        auction: AuctionDetails,
        extra: SvmExtra,
    ) -> Result<Self> {
        let (src_chain, dst_chain) =
            validate_chain_pair(escrow_params.src_chain_id, escrow_params.dst_chain_id)?;
        if !src_chain.is_solana() {
            return Err(EscrowError::UnsupportedChain(escrow_params.src_chain_id));
        }
        for (name, address) in [("receiver", order_info.receiver), ("dst token", order_info.dst_token)] {
            if address.family() != dst_chain.family() {
                return Err(EscrowError::Config(format!(
                    "{name} {address} does not belong to chain {}",
                    escrow_params.dst_chain_id
                )));
            }
        }

        let src_token = order_info.src_token.zero_as_native();
        if order_info.src_asset_is_native && src_token != SOLANA_NATIVE_MINT {
            return Err(EscrowError::Config(format!(
                "native order must escrow {SOLANA_NATIVE_MINT}, got {src_token}"
            )));
        }

        let deadline = auction
            .end_time()
            .checked_add(extra.order_expiration_delay)
            .ok_or_else(|| {
                EscrowError::Config(format!(
                    "order expiration delay {} overflows the deadline",
                    extra.order_expiration_delay
                ))
            })?;
        if deadline > UINT_32_MAX {
            return Err(EscrowError::Config(format!("deadline {deadline} does not fit into u32")));
        }
        if dst_chain.family() == ChainFamily::Evm && escrow_params.dst_safety_deposit > U256::mask(128) {
            return Err(EscrowError::Config(format!(
                "dst safety deposit {} does not fit into 128 bits",
                escrow_params.dst_safety_deposit
            )));
        }

        let order = Self {
            maker: order_info.maker,
            src_token,
            src_asset_is_native: order_info.src_asset_is_native,
            dst_token: order_info.dst_token.zero_as_native(),
            receiver: order_info.receiver,
            src_amount: amount_to_u64(order_info.src_amount)?,
            min_dst_amount: order_info.min_dst_amount,
            hash_lock: escrow_params.hash_lock,
            time_locks: escrow_params.time_locks,
            dst_chain_id: escrow_params.dst_chain_id,
            src_safety_deposit: amount_to_u64(escrow_params.src_safety_deposit)?,
            dst_safety_deposit: escrow_params.dst_safety_deposit,
            auction,
            deadline: deadline as u32,
            salt: order_info.salt.unwrap_or_else(rand::random),
            allow_multiple_fills: extra.allow_multiple_fills,
            resolver_cancellation: extra.resolver_cancellation,
        };
        debug!(maker = %order.maker, dst_chain_id = order.dst_chain_id, "built svm cross-chain order");
        Ok(order)
    }

    /// `keccak256` over the fields the source escrow program commits to, in its order.
    pub fn get_order_hash(&self) -> Result<[u8; 32]> {
        let time_locks: Vec<u8> = self
            .time_locks
            .to_limbs()
            .iter()
            .flat_map(|limb| limb.to_le_bytes())
            .collect();
        let dst_amount = self.min_dst_amount.try_to_vec()?;
        let auction_hash = self.auction.hash_for_solana()?;

        let hash = hashv(&[
            self.hash_lock.as_bytes(),
            self.maker.as_ref(),
            self.src_token.as_ref(),
            &self.src_amount.to_be_bytes(),
            &self.src_safety_deposit.to_be_bytes(),
            &time_locks,
            &self.deadline.to_be_bytes(),
            &[self.src_asset_is_native as u8],
            &dst_amount,
            &auction_hash,
            &self.resolver_cancellation.max_cancellation_premium.to_be_bytes(),
            &self.resolver_cancellation.cancellation_auction_duration.to_be_bytes(),
            &[self.allow_multiple_fills as u8],
            &self.salt.to_be_bytes(),
        ])
        .0;
        debug!(order_hash = %hex::encode(hash), "computed svm order hash");
        Ok(hash)
    }

    pub fn get_order_account(&self, src_program: &Pubkey) -> Result<Pubkey> {
        Ok(find_order_address(src_program, &self.get_order_hash()?).0)
    }

    pub fn maker(&self) -> Pubkey {
        self.maker
    }

    pub fn src_token(&self) -> Pubkey {
        self.src_token
    }

    pub fn src_asset_is_native(&self) -> bool {
        self.src_asset_is_native
    }

    pub fn dst_token(&self) -> Address {
        self.dst_token
    }

    pub fn receiver(&self) -> Address {
        self.receiver
    }

    pub fn src_amount(&self) -> u64 {
        self.src_amount
    }

    pub fn min_dst_amount(&self) -> U256 {
        self.min_dst_amount
    }

    pub fn hash_lock(&self) -> HashLock {
        self.hash_lock
    }

    pub fn time_locks(&self) -> TimeLocks {
        self.time_locks
    }

    pub fn dst_chain_id(&self) -> u64 {
        self.dst_chain_id
    }

    pub fn src_safety_deposit(&self) -> u64 {
        self.src_safety_deposit
    }

    pub fn dst_safety_deposit(&self) -> U256 {
        self.dst_safety_deposit
    }

    pub fn auction(&self) -> &AuctionDetails {
        &self.auction
    }

    pub fn deadline(&self) -> u32 {
        self.deadline
    }

    pub fn salt(&self) -> u64 {
        self.salt
    }

    pub fn is_multiple_fills_allowed(&self) -> bool {
        self.allow_multiple_fills
    }

    pub fn resolver_cancellation(&self) -> ResolverCancellationConfig {
        self.resolver_cancellation
    }

    pub fn is_expired_at(&self, time: u64) -> bool {
        self.deadline as u64 <= time
    }

    pub fn calculator(&self) -> Result<AuctionCalculator> {
        AuctionCalculator::from_auction_details(&self.auction)
    }

    /// Premium paid to a resolver cancelling the order at `time`; grows linearly from
    /// the deadline over the cancellation auction.
    pub fn calc_cancellation_premium(&self, time: u64) -> u64 {
        let ResolverCancellationConfig {
            max_cancellation_premium,
            cancellation_auction_duration,
        } = self.resolver_cancellation;
        let start = self.deadline as u64;
        if time <= start {
            return 0;
        }
        let elapsed = time - start;
        if elapsed >= cancellation_auction_duration as u64 {
            return max_cancellation_premium;
        }
        elapsed
            .mul_div_floor(max_cancellation_premium, cancellation_auction_duration as u64)
            .unwrap_or(max_cancellation_premium)
    }

    pub fn get_multiple_fill_idx(&self, fill_amount: U256, remaining_amount: Option<U256>) -> Result<u64> {
        if !self.allow_multiple_fills {
            return Err(EscrowError::InvalidFill(
                "multiple fills are disabled for this order".to_string(),
            ));
        }
        let making_amount = U256::from(self.src_amount);
        fills::get_multiple_fill_idx(
            making_amount,
            remaining_amount.unwrap_or(making_amount),
            fill_amount,
            self.hash_lock.get_parts_count(),
        )
    }

    /// Source escrow parameters for a fill of `amount` by `taker`. A partial fill must
    /// carry the hash of the secret it reveals instead of the order's root hash lock.
    pub fn to_src_immutables(
        &self,
        taker: Pubkey,
        amount: U256,
        hash_lock: Option<HashLock>,
    ) -> Result<Immutables<Pubkey>> {
        let hash_lock = hash_lock.unwrap_or(self.hash_lock);
        if amount != U256::from(self.src_amount) && hash_lock == self.hash_lock {
            return Err(EscrowError::InvalidFill(
                "partial fill requires the hash lock of the revealed secret".to_string(),
            ));
        }
        Immutables::new(
            self.get_order_hash()?,
            hash_lock,
            self.maker,
            taker,
            self.src_token,
            amount,
            U256::from(self.src_safety_deposit),
            self.time_locks,
        )
    }
}
