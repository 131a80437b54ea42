use alloy_primitives::{Address as EvmAddress, B256};
use common::auction::{AuctionCalculator, AuctionDetails};
use common::chain::{validate_chain_pair, ChainFamily, NetworkEnum};
use common::error::{EscrowError, Result};
use common::fills;
use common::{Address, HashLock, Immutables, TimeLocks, U256};
use tracing::debug;

use crate::constants::{DEFAULT_ORDER_EXPIRATION_DELAY, DEFAULT_SOURCE, TRUE_ERC20};
use crate::escrow_extension::EscrowExtension;
use crate::extension::{Extension, Interaction};
use crate::fusion_extension::FusionExtension;
use crate::limit_order::{build_salt, verify_salt, LimitOrder, Order};
use crate::maker_traits::MakerTraits;
use crate::whitelist::{AuctionWhitelistItem, Whitelist};

/// What the maker gives and receives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderInfo {
    pub maker: EvmAddress,
    pub maker_asset: EvmAddress,
    /// Destination chain token.
    pub taker_asset: Address,
    pub making_amount: U256,
    pub taking_amount: U256,
    /// Destination chain receiver, the maker when absent.
    pub receiver: Option<Address>,
    pub salt: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscrowParams {
    pub hash_lock: HashLock,
    pub time_locks: TimeLocks,
    pub src_chain_id: u64,
    pub dst_chain_id: u64,
    pub src_safety_deposit: U256,
    pub dst_safety_deposit: U256,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Details {
    pub auction: AuctionDetails,
    pub whitelist: Vec<AuctionWhitelistItem>,
    /// Auction start when absent.
    pub resolving_start_time: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extra {
    pub nonce: Option<u64>,
    /// `permit` call data for the maker asset.
    pub permit: Option<Vec<u8>>,
    pub order_expiration_delay: u64,
    pub allow_partial_fills: bool,
    pub allow_multiple_fills: bool,
    pub enable_permit2: bool,
    pub source: String,
}

impl Default for Extra {
    fn default() -> Self {
        Self {
            nonce: None,
            permit: None,
            order_expiration_delay: DEFAULT_ORDER_EXPIRATION_DELAY,
            allow_partial_fills: true,
            allow_multiple_fills: true,
            enable_permit2: false,
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

/// Cross-chain order with an EVM source chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvmCrossChainOrder {
    inner: LimitOrder,
    escrow_extension: EscrowExtension,
}

impl EvmCrossChainOrder {
    pub fn new(
        escrow_factory: EvmAddress,
        order_info: OrderInfo,
        escrow_params: EscrowParams,
        details: Details,
        extra: Extra,
    ) -> Result<Self> {
        let (src_chain, dst_chain) =
            validate_chain_pair(escrow_params.src_chain_id, escrow_params.dst_chain_id)?;
        if !src_chain.is_evm() {
            return Err(EscrowError::UnsupportedChain(escrow_params.src_chain_id));
        }
        let dst_family = dst_chain.family();

        let receiver = match order_info.receiver {
            Some(receiver) if receiver.family() != dst_family => {
                return Err(EscrowError::Config(format!(
                    "receiver {receiver} does not belong to chain {}",
                    escrow_params.dst_chain_id
                )))
            }
            Some(receiver) => receiver,
            None if dst_family == ChainFamily::Evm => Address::Evm(order_info.maker),
            None => {
                return Err(EscrowError::Config(format!(
                    "receiver required for destination chain {}",
                    escrow_params.dst_chain_id
                )))
            }
        };

        let auction = details.auction;
        let resolving_start_time = details.resolving_start_time.unwrap_or(auction.start_time());
        let whitelist = Whitelist::new(resolving_start_time, &details.whitelist)?;
        let deadline = auction
            .end_time()
            .checked_add(extra.order_expiration_delay)
            .ok_or_else(|| {
                EscrowError::Config(format!(
                    "order expiration delay {} overflows the deadline",
                    extra.order_expiration_delay
                ))
            })?;
        let maker_permit = extra
            .permit
            .map(|permit| Interaction::new(order_info.maker_asset, permit));

        let escrow_extension = EscrowExtension::new(
            FusionExtension::new(escrow_factory, auction, whitelist, maker_permit),
            escrow_params.hash_lock,
            escrow_params.dst_chain_id,
            order_info.taker_asset,
            escrow_params.src_safety_deposit,
            escrow_params.dst_safety_deposit,
            escrow_params.time_locks,
            (dst_family == ChainFamily::Solana).then(|| receiver.high_12()),
        )?;

        let mut maker_traits = MakerTraits::default()
            .with_partial_fills(extra.allow_partial_fills)
            .with_multiple_fills(extra.allow_multiple_fills)
            .with_post_interaction(true)
            .with_extension(true)
            .with_permit2(extra.enable_permit2)
            .with_expiration(deadline)?;
        if maker_traits.is_bit_invalidator_mode() && extra.nonce.is_none() {
            return Err(EscrowError::Config(
                "nonce required when partial fills or multiple fills are disabled".to_string(),
            ));
        }
        if let Some(nonce) = extra.nonce {
            maker_traits = maker_traits.with_nonce(nonce)?;
        }

        let extension = escrow_extension.build();
        let base_salt = order_info.salt.unwrap_or_else(rand::random);
        let salt = build_salt(&extension, base_salt, &extra.source)?;

        let receiver = match receiver {
            // the maker's own address is encoded as zero
            Address::Evm(address) if address == order_info.maker => EvmAddress::ZERO,
            other => other.low_20(),
        };

        let order = Self {
            inner: LimitOrder {
                salt,
                maker: order_info.maker,
                receiver,
                maker_asset: order_info.maker_asset,
                taker_asset: TRUE_ERC20,
                making_amount: order_info.making_amount,
                taking_amount: order_info.taking_amount,
                maker_traits,
            },
            escrow_extension,
        };
        debug!(
            maker = %order.inner.maker,
            src_chain_id = escrow_params.src_chain_id,
            dst_chain_id = escrow_params.dst_chain_id,
            "built evm cross-chain order"
        );
        Ok(order)
    }

    /// Rebuilds an order from signed order data and its extension.
    pub fn from_data_and_extension(order: &Order, extension: &Extension) -> Result<Self> {
        verify_salt(order.salt.into(), extension)?;
        let escrow_extension = EscrowExtension::from_extension(extension)?;
        let inner = LimitOrder::from_order(order);
        if inner.taker_asset != TRUE_ERC20 {
            return Err(EscrowError::InvalidExtension(format!(
                "taker asset {} is not the cross-chain placeholder",
                inner.taker_asset
            )));
        }
        if !inner.maker_traits.has_extension() || !inner.maker_traits.has_post_interaction() {
            return Err(EscrowError::InvalidExtension(
                "maker traits do not enable the escrow post-interaction".to_string(),
            ));
        }
        Ok(Self {
            inner,
            escrow_extension,
        })
    }

    pub fn build(&self) -> Order {
        self.inner.build()
    }

    pub fn extension(&self) -> Extension {
        self.escrow_extension.build()
    }

    pub fn escrow_extension(&self) -> &EscrowExtension {
        &self.escrow_extension
    }

    pub fn get_order_hash(&self, src_chain_id: u64) -> Result<B256> {
        let chain = NetworkEnum::try_from(src_chain_id)?;
        let hash = self.inner.get_order_hash(chain);
        debug!(%hash, src_chain_id, "computed order hash");
        Ok(hash)
    }

    pub fn maker(&self) -> EvmAddress {
        self.inner.maker
    }

    /// Destination receiver, rebuilt from its address complement when wider than 20 bytes.
    pub fn receiver(&self) -> Address {
        match self.escrow_extension.dst_receiver_complement() {
            Some(high) => Address::solana_from_parts(high, self.inner.receiver),
            None if self.inner.receiver.is_zero() => Address::Evm(self.inner.maker),
            None => Address::Evm(self.inner.receiver),
        }
    }

    pub fn maker_asset(&self) -> EvmAddress {
        self.inner.maker_asset
    }

    pub fn taker_asset(&self) -> Address {
        self.escrow_extension.dst_token()
    }

    pub fn making_amount(&self) -> U256 {
        self.inner.making_amount
    }

    pub fn taking_amount(&self) -> U256 {
        self.inner.taking_amount
    }

    pub fn salt(&self) -> U256 {
        self.inner.salt
    }

    pub fn maker_traits(&self) -> MakerTraits {
        self.inner.maker_traits
    }

    pub fn nonce(&self) -> u64 {
        self.inner.maker_traits.nonce_or_epoch()
    }

    pub fn dst_chain_id(&self) -> u64 {
        self.escrow_extension.dst_chain_id()
    }

    pub fn hash_lock(&self) -> HashLock {
        self.escrow_extension.hash_lock()
    }

    pub fn time_locks(&self) -> TimeLocks {
        self.escrow_extension.time_locks()
    }

    pub fn src_safety_deposit(&self) -> U256 {
        self.escrow_extension.src_safety_deposit()
    }

    pub fn dst_safety_deposit(&self) -> U256 {
        self.escrow_extension.dst_safety_deposit()
    }

    pub fn auction(&self) -> &AuctionDetails {
        &self.escrow_extension.fusion().auction
    }

    pub fn whitelist(&self) -> &Whitelist {
        &self.escrow_extension.fusion().whitelist
    }

    pub fn escrow_factory(&self) -> EvmAddress {
        self.escrow_extension.fusion().settlement
    }

    pub fn deadline(&self) -> u64 {
        self.inner.maker_traits.expiration().unwrap_or_default()
    }

    pub fn is_expired_at(&self, time: u64) -> bool {
        self.inner.maker_traits.is_expired_at(time)
    }

    pub fn is_multiple_fills_allowed(&self) -> bool {
        self.inner.maker_traits.is_multiple_fills_allowed()
    }

    pub fn is_partial_fill_allowed(&self) -> bool {
        self.inner.maker_traits.is_partial_fill_allowed()
    }

    pub fn calculator(&self) -> Result<AuctionCalculator> {
        AuctionCalculator::from_auction_details(self.auction())
    }

    /// Taking amount required by the auction at `time`.
    pub fn calc_taking_amount(&self, time: u64, block_base_fee: Option<U256>) -> Result<U256> {
        let rate_bump = self.calculator()?.calc_rate_bump(time, block_base_fee);
        AuctionCalculator::calc_auction_taking_amount(self.inner.taking_amount, rate_bump)
    }

    pub fn can_execute_at(&self, executor: &EvmAddress, time: u64) -> bool {
        self.whitelist().can_execute_at(executor, time)
    }

    pub fn is_exclusive_resolver(&self, executor: &EvmAddress) -> bool {
        self.whitelist().is_exclusive_resolver(executor)
    }

    pub fn is_exclusivity_period(&self, time: u64) -> bool {
        self.whitelist().is_exclusivity_period(time)
    }

    /// Merkle leaf index for filling `fill_amount` while `remaining_amount` is left
    /// (the whole making amount when absent).
    pub fn get_multiple_fill_idx(&self, fill_amount: U256, remaining_amount: Option<U256>) -> Result<u64> {
        if !self.is_multiple_fills_allowed() {
            return Err(EscrowError::InvalidFill(
                "multiple fills are disabled for this order".to_string(),
            ));
        }
        fills::get_multiple_fill_idx(
            self.inner.making_amount,
            remaining_amount.unwrap_or(self.inner.making_amount),
            fill_amount,
            self.hash_lock().get_parts_count(),
        )
    }

    /// Source escrow parameters for a fill of `amount` by `taker`. A partial fill must
    /// carry the hash of the secret it reveals instead of the order's root hash lock.
    pub fn to_src_immutables(
        &self,
        src_chain_id: u64,
        taker: EvmAddress,
        amount: U256,
        hash_lock: Option<HashLock>,
    ) -> Result<Immutables<EvmAddress>> {
        let order_hash_lock = self.hash_lock();
        let hash_lock = hash_lock.unwrap_or(order_hash_lock);
        if amount != self.inner.making_amount && hash_lock == order_hash_lock {
            return Err(EscrowError::InvalidFill(
                "partial fill requires the hash lock of the revealed secret".to_string(),
            ));
        }

        Immutables::new(
            self.get_order_hash(src_chain_id)?.0,
            hash_lock,
            self.inner.maker,
            taker,
            self.inner.maker_asset,
            amount,
            self.src_safety_deposit(),
            self.time_locks(),
        )
    }
}
