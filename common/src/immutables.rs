use alloy_primitives::{keccak256, Address as EvmAddress, B256};
use alloy_sol_types::{sol, SolValue};
use anchor_lang::prelude::Pubkey;
use borsh::{BorshDeserialize, BorshSerialize};
use tracing::debug;

use crate::address::ChainAddress;
use crate::error::{EscrowError, Result};
use crate::hashlock::HashLock;
use crate::timelocks::TimeLocks;
use crate::u256::U256;

sol! {
    /// ABI tuple escrow contracts hash into their CREATE2 salt.
    struct EvmImmutables {
        bytes32 orderHash;
        bytes32 hashlock;
        address maker;
        address taker;
        address token;
        uint256 amount;
        uint256 safetyDeposit;
        uint256 timelocks;
    }
}

/// Borsh layout of the same tuple on Solana.
#[derive(BorshSerialize, BorshDeserialize)]
struct SvmImmutables {
    order_hash: [u8; 32],
    hashlock: [u8; 32],
    maker: [u8; 32],
    taker: [u8; 32],
    token: [u8; 32],
    amount: u64,
    safety_deposit: u64,
    timelocks: [u64; 4],
}

const MINIMAL_PROXY_PREFIX: [u8; 20] = [
    0x3d, 0x60, 0x2d, 0x80, 0x60, 0x0a, 0x3d, 0x39, 0x81, 0xf3, 0x36, 0x3d, 0x3d, 0x37, 0x3d, 0x3d,
    0x3d, 0x36, 0x3d, 0x73,
];
const MINIMAL_PROXY_SUFFIX: [u8; 15] = [
    0x5a, 0xf4, 0x3d, 0x82, 0x80, 0x3e, 0x90, 0x3d, 0x91, 0x60, 0x2b, 0x57, 0xfd, 0x5b, 0xf3,
];

/// EIP-1167 clone creation code delegating to `implementation`.
pub fn minimal_proxy_bytecode(implementation: EvmAddress) -> Vec<u8> {
    [
        &MINIMAL_PROXY_PREFIX[..],
        implementation.as_slice(),
        &MINIMAL_PROXY_SUFFIX[..],
    ]
    .concat()
}

pub fn proxy_init_code_hash(implementation: EvmAddress) -> B256 {
    keccak256(minimal_proxy_bytecode(implementation))
}

/// Parameters identifying one escrow; its hash is the escrow's address salt or seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Immutables<A: ChainAddress> {
    order_hash: [u8; 32],
    hash_lock: HashLock,
    maker: A,
    taker: A,
    token: A,
    amount: U256,
    safety_deposit: U256,
    time_locks: TimeLocks,
}

impl<A: ChainAddress> Immutables<A> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        order_hash: [u8; 32],
        hash_lock: HashLock,
        maker: A,
        taker: A,
        token: A,
        amount: U256,
        safety_deposit: U256,
        time_locks: TimeLocks,
    ) -> Result<Self> {
        check_amount("amount", amount, A::MAX_AMOUNT)?;
        check_amount("safety deposit", safety_deposit, A::MAX_AMOUNT)?;
        Ok(Self {
            order_hash,
            hash_lock,
            maker,
            taker,
            token: token.zero_as_native(),
            amount,
            safety_deposit,
            time_locks,
        })
    }

    pub fn order_hash(&self) -> [u8; 32] {
        self.order_hash
    }

    pub fn hash_lock(&self) -> HashLock {
        self.hash_lock
    }

    pub fn maker(&self) -> A {
        self.maker
    }

    pub fn taker(&self) -> A {
        self.taker
    }

    pub fn token(&self) -> A {
        self.token
    }

    pub fn amount(&self) -> U256 {
        self.amount
    }

    pub fn safety_deposit(&self) -> U256 {
        self.safety_deposit
    }

    pub fn time_locks(&self) -> TimeLocks {
        self.time_locks
    }

    pub fn with_taker(mut self, taker: A) -> Self {
        self.taker = taker;
        self
    }

    pub fn with_hash_lock(mut self, hash_lock: HashLock) -> Self {
        self.hash_lock = hash_lock;
        self
    }

    pub fn with_amount(mut self, amount: U256) -> Result<Self> {
        check_amount("amount", amount, A::MAX_AMOUNT)?;
        self.amount = amount;
        Ok(self)
    }

    pub fn with_deployed_at(mut self, deployed_at: u32) -> Self {
        self.time_locks = self.time_locks.with_deployed_at(deployed_at);
        self
    }

    /// Destination escrow parameters: identity and timing from `self`, parties and
    /// amounts from the complement. The complement may belong to another chain family.
    pub fn with_complement<B: ChainAddress>(
        &self,
        complement: &DstImmutablesComplement<B>,
    ) -> Result<Immutables<B>> {
        Immutables::new(
            self.order_hash,
            self.hash_lock,
            complement.maker,
            complement.taker,
            complement.token,
            complement.amount,
            complement.safety_deposit,
            self.time_locks,
        )
    }
}

fn check_amount(name: &str, value: U256, max: U256) -> Result<()> {
    if value > max {
        return Err(EscrowError::Config(format!(
            "{name} {value} exceeds the chain maximum {max}"
        )));
    }
    Ok(())
}

pub trait ImmutablesCodec: Sized {
    fn encode(&self) -> Result<Vec<u8>>;

    fn decode(data: &[u8]) -> Result<Self>;

    /// Escrow identity: `keccak256(encode())`.
    fn hash(&self) -> Result<[u8; 32]> {
        Ok(keccak256(self.encode()?).0)
    }
}

impl ImmutablesCodec for Immutables<EvmAddress> {
    fn encode(&self) -> Result<Vec<u8>> {
        Ok(EvmImmutables {
            orderHash: B256::from(self.order_hash),
            hashlock: B256::from(self.hash_lock.to_bytes()),
            maker: self.maker,
            taker: self.taker,
            token: self.token,
            amount: self.amount.into(),
            safetyDeposit: self.safety_deposit.into(),
            timelocks: self.time_locks.pack().into(),
        }
        .abi_encode())
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let raw = EvmImmutables::abi_decode(data)
            .map_err(|e| EscrowError::InvalidEncoding(e.to_string()))?;
        Self::new(
            raw.orderHash.0,
            HashLock::from_bytes(raw.hashlock.0),
            raw.maker,
            raw.taker,
            raw.token,
            raw.amount.into(),
            raw.safetyDeposit.into(),
            TimeLocks::from_packed(raw.timelocks.into())?,
        )
    }
}

impl ImmutablesCodec for Immutables<Pubkey> {
    fn encode(&self) -> Result<Vec<u8>> {
        let raw = SvmImmutables {
            order_hash: self.order_hash,
            hashlock: self.hash_lock.to_bytes(),
            maker: self.maker.to_bytes(),
            taker: self.taker.to_bytes(),
            token: self.token.to_bytes(),
            // bounded by Pubkey::MAX_AMOUNT on construction
            amount: self.amount.low_u64(),
            safety_deposit: self.safety_deposit.low_u64(),
            timelocks: self.time_locks.to_limbs(),
        };
        raw.try_to_vec()
            .map_err(|e| EscrowError::InvalidEncoding(format!("svm immutables: {e}")))
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let raw = SvmImmutables::try_from_slice(data)?;
        Self::new(
            raw.order_hash,
            HashLock::from_bytes(raw.hashlock),
            Pubkey::new_from_array(raw.maker),
            Pubkey::new_from_array(raw.taker),
            Pubkey::new_from_array(raw.token),
            U256::from(raw.amount),
            U256::from(raw.safety_deposit),
            TimeLocks::from_limbs(raw.timelocks)?,
        )
    }
}

impl Immutables<EvmAddress> {
    /// CREATE2 address of an EIP-1167 clone of `implementation` deployed by `factory`.
    pub fn get_escrow_address(&self, factory: EvmAddress, implementation: EvmAddress) -> Result<EvmAddress> {
        let salt = self.hash()?;
        let address = factory.create2(salt, proxy_init_code_hash(implementation));
        debug!(salt = %hex::encode(salt), %address, "derived escrow address");
        Ok(address)
    }

    pub fn get_src_escrow_address(&self, factory: EvmAddress, implementation: EvmAddress) -> Result<EvmAddress> {
        self.get_escrow_address(factory, implementation)
    }

    pub fn get_dst_escrow_address(&self, factory: EvmAddress, implementation: EvmAddress) -> Result<EvmAddress> {
        self.get_escrow_address(factory, implementation)
    }
}

impl Immutables<Pubkey> {
    /// Escrow PDA; the source escrow is created by the maker for the taker, the
    /// destination escrow by the taker for the maker.
    pub fn get_escrow_address(&self, program_id: &Pubkey, creator: &Pubkey, recipient: &Pubkey) -> Pubkey {
        let (escrow, _) = Pubkey::find_program_address(
            &[
                b"escrow",
                &self.order_hash,
                self.hash_lock.as_bytes(),
                creator.as_ref(),
                recipient.as_ref(),
                self.token.as_ref(),
                &self.amount.low_u64().to_be_bytes(),
                &self.safety_deposit.low_u64().to_be_bytes(),
            ],
            program_id,
        );
        debug!(%escrow, %program_id, "derived escrow address");
        escrow
    }

    pub fn get_src_escrow_address(&self, program_id: &Pubkey) -> Pubkey {
        self.get_escrow_address(program_id, &self.maker, &self.taker)
    }

    pub fn get_dst_escrow_address(&self, program_id: &Pubkey) -> Pubkey {
        self.get_escrow_address(program_id, &self.taker, &self.maker)
    }
}

/// Destination-side fields known only once the destination fill is agreed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DstImmutablesComplement<A: ChainAddress> {
    pub maker: A,
    pub amount: U256,
    pub token: A,
    pub taker: A,
    pub safety_deposit: U256,
    pub chain_id: u64,
}

impl<A: ChainAddress> DstImmutablesComplement<A> {
    pub fn new(
        maker: A,
        amount: U256,
        token: A,
        taker: A,
        safety_deposit: U256,
        chain_id: u64,
    ) -> Self {
        Self {
            maker,
            amount,
            token: token.zero_as_native(),
            taker,
            safety_deposit,
            chain_id,
        }
    }
}
