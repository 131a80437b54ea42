use anchor_lang::prelude::Pubkey;
use anchor_spl::associated_token::ID as ASSOCIATED_TOKEN_PROGRAM_ID;
use anchor_spl::token::ID as TOKEN_PROGRAM_ID;
use common::address::SOLANA_NATIVE_MINT;
use common::{EscrowError, HashLock, Immutables, MerkleProof, U256};
use cross_chain_svm::instructions::{
    dst, src, InstructionAccounts, InstructionArgs, PublicWithdraw, Withdraw,
};
use cross_chain_svm::pda::{find_ata, find_escrow_address, find_resolver_access_address};
use cross_chain_svm::{SvmDstEscrowFactory, SvmSrcEscrowFactory};
use solana_program::hash::hash;
use solana_program::{system_program, sysvar::rent};
use test_context::test_context;

use helpers_svm::*;

fn anchor_discriminator(name: &str) -> [u8; 8] {
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash(format!("global:{name}").as_bytes()).to_bytes()[..8]);
    out
}

fn assert_discriminator<T: InstructionArgs>() {
    assert_eq!(T::DISCRIMINATOR, anchor_discriminator(T::NAME), "{}", T::NAME);
}

#[test]
fn test_discriminators_match_anchor() {
    assert_discriminator::<src::Create>();
    assert_discriminator::<src::CreateEscrow>();
    assert_discriminator::<src::CancelEscrow>();
    assert_discriminator::<src::PublicCancelEscrow>();
    assert_discriminator::<src::CancelOrder>();
    assert_discriminator::<src::CancelOrderByResolver>();
    assert_discriminator::<dst::Create>();
    assert_discriminator::<dst::Cancel>();
    assert_discriminator::<Withdraw>();
    assert_discriminator::<PublicWithdraw>();
}

#[test]
fn test_args_data_layout() {
    let data = src::CancelOrderByResolver { reward_limit: 5 }.data().unwrap();
    assert_eq!(&data[..8], &src::CancelOrderByResolver::DISCRIMINATOR);
    assert_eq!(&data[8..], &5u64.to_le_bytes());
    assert_eq!(src::CancelOrder {}.data().unwrap(), src::CancelOrder::DISCRIMINATOR.to_vec());
}

#[test_context(TestState)]
#[test]
fn test_create_order(ctx: &mut TestState) {
    let order = ctx.order().unwrap();
    let factory = SvmSrcEscrowFactory::new(&ctx.config);
    let ix = factory.create_order(&order, &TOKEN_PROGRAM_ID).unwrap();

    assert_eq!(ix.program_id, ctx.config.src_escrow_program);
    assert_eq!(ix.accounts.len(), src::CreateAccounts::LEN);
    assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);

    let (accounts, args) = factory.parse_create_order(&ix).unwrap();
    let order_account = order.get_order_account(&factory.program_id()).unwrap();
    let mint = ctx.order_info.src_token;
    assert_eq!(accounts.maker, ctx.maker);
    assert_eq!(accounts.mint, mint);
    assert_eq!(accounts.maker_ata, Some(find_ata(&ctx.maker, &mint, &TOKEN_PROGRAM_ID)));
    assert_eq!(accounts.order, order_account);
    assert_eq!(accounts.order_ata, find_ata(&order_account, &mint, &TOKEN_PROGRAM_ID));
    assert_eq!(accounts.associated_token_program, ASSOCIATED_TOKEN_PROGRAM_ID);
    assert_eq!(accounts.token_program, TOKEN_PROGRAM_ID);
    assert_eq!(accounts.rent, rent::ID);
    assert_eq!(accounts.system_program, system_program::ID);

    assert_eq!(args.amount, SRC_AMOUNT);
    assert_eq!(args.hashlock, order.hash_lock().to_bytes());
    assert_eq!(args.safety_deposit, SRC_SAFETY_DEPOSIT);
    assert_eq!(args.timelocks, time_locks().to_limbs());
    assert_eq!(args.expiration_time, order.deadline());
    assert!(!args.asset_is_native);
    assert_eq!(args.dst_amount, U256::from(2_000_000_000));
    assert_eq!(args.dutch_auction_data_hash, auction().hash_for_solana().unwrap());
    assert_eq!(args.max_cancellation_premium, 1_000);
    assert_eq!(args.cancellation_auction_duration, 100);
    assert!(args.allow_multiple_fills);
    assert_eq!(args.salt, 42);
    assert_eq!(args.dst_chain_params.chain_id, 1);
    assert_eq!(args.dst_chain_params.maker_address, ctx.order_info.receiver.to_bytes32());
    assert_eq!(args.dst_chain_params.token, ctx.order_info.dst_token.to_bytes32());
    assert_eq!(args.dst_chain_params.safety_deposit, 2_000);
}

#[test_context(TestState)]
#[test]
fn test_native_order_skips_maker_ata(ctx: &mut TestState) {
    ctx.order_info.src_asset_is_native = true;
    ctx.order_info.src_token = SOLANA_NATIVE_MINT;
    let order = ctx.order().unwrap();
    let factory = SvmSrcEscrowFactory::new(&ctx.config);

    let ix = factory.create_order(&order, &TOKEN_PROGRAM_ID).unwrap();
    assert_eq!(ix.accounts[2].pubkey, factory.program_id());
    assert!(!ix.accounts[2].is_writable && !ix.accounts[2].is_signer);
    let (accounts, args) = factory.parse_create_order(&ix).unwrap();
    assert_eq!(accounts.maker_ata, None);
    assert!(args.asset_is_native);

    let (accounts, _) = factory
        .parse_cancel_order(&factory.cancel_order(&order, &TOKEN_PROGRAM_ID).unwrap())
        .unwrap();
    assert_eq!(accounts.maker_ata, None);
}

#[test_context(TestState)]
#[test]
fn test_create_escrow_full_fill(ctx: &mut TestState) {
    let order = ctx.order().unwrap();
    let factory = SvmSrcEscrowFactory::new(&ctx.config);
    let ix = factory
        .create_escrow(&order, &ctx.resolver, SRC_AMOUNT, None, &TOKEN_PROGRAM_ID)
        .unwrap();
    let (accounts, args) = factory.parse_create_escrow(&ix).unwrap();

    let immutables = order
        .to_src_immutables(ctx.resolver, U256::from(SRC_AMOUNT), None)
        .unwrap();
    let escrow = immutables.get_src_escrow_address(&factory.program_id());
    assert_eq!(accounts.taker, ctx.resolver);
    assert_eq!(
        accounts.resolver_access,
        find_resolver_access_address(&ctx.config.whitelist_program, &ctx.resolver).0
    );
    assert_eq!(accounts.escrow, escrow);
    assert_eq!(
        accounts.escrow_ata,
        find_ata(&escrow, &ctx.order_info.src_token, &TOKEN_PROGRAM_ID)
    );
    assert_eq!(args.amount, SRC_AMOUNT);
    assert_eq!(args.dutch_auction_data, auction().to_auction_data().unwrap());
    assert_eq!(args.merkle_proof, None);

    let (by_seeds, _) = find_escrow_address(
        &factory.program_id(),
        &immutables.order_hash(),
        immutables.hash_lock().as_bytes(),
        &ctx.maker,
        &ctx.resolver,
        &ctx.order_info.src_token,
        SRC_AMOUNT,
        SRC_SAFETY_DEPOSIT,
    );
    assert_eq!(escrow, by_seeds);
}

#[test_context(TestState)]
#[test]
fn test_create_escrow_partial_fill(ctx: &mut TestState) {
    let secrets = [[1; 32], [2; 32], [3; 32], [4; 32], [5; 32]];
    let leaves = ctx.with_secrets(&secrets);
    let order = ctx.order().unwrap();
    let factory = SvmSrcEscrowFactory::new(&ctx.config);
    let amount = SRC_AMOUNT / 4;

    let idx = order.get_multiple_fill_idx(U256::from(amount), None).unwrap();
    let hashed_secret = HashLock::hash_secret(&secrets[idx as usize]);
    let proof = MerkleProof::new(&leaves, idx, hashed_secret).unwrap();
    assert!(order.hash_lock().verify_proof(&proof));

    let ix = factory
        .create_escrow(&order, &ctx.resolver, amount, Some(proof.clone()), &TOKEN_PROGRAM_ID)
        .unwrap();
    let (accounts, args) = factory.parse_create_escrow(&ix).unwrap();
    assert_eq!(args.merkle_proof, Some(proof));

    let immutables = order
        .to_src_immutables(
            ctx.resolver,
            U256::from(amount),
            Some(HashLock::from_bytes(hashed_secret)),
        )
        .unwrap();
    assert_eq!(accounts.escrow, immutables.get_src_escrow_address(&factory.program_id()));

    assert!(matches!(
        factory.create_escrow(&order, &ctx.resolver, amount, None, &TOKEN_PROGRAM_ID),
        Err(EscrowError::InvalidFill(_))
    ));
}

#[test_context(TestState)]
#[test]
fn test_src_withdraw_and_cancel(ctx: &mut TestState) {
    let order = ctx.order().unwrap();
    let factory = SvmSrcEscrowFactory::new(&ctx.config);
    let immutables = order
        .to_src_immutables(ctx.resolver, U256::from(SRC_AMOUNT), None)
        .unwrap();
    let escrow = immutables.get_src_escrow_address(&factory.program_id());
    let mint = ctx.order_info.src_token;
    let secret = [0x11; 32];

    let ix = factory.withdraw(&immutables, secret, &TOKEN_PROGRAM_ID).unwrap();
    let (accounts, args) = factory.parse_withdraw(&ix).unwrap();
    assert_eq!(args.secret, secret);
    assert_eq!(accounts.escrow, escrow);
    assert_eq!(accounts.taker_ata, find_ata(&ctx.resolver, &mint, &TOKEN_PROGRAM_ID));

    let payer = Pubkey::new_unique();
    let ix = factory
        .public_withdraw(&immutables, secret, &payer, &TOKEN_PROGRAM_ID)
        .unwrap();
    let (accounts, _) = factory.parse_public_withdraw(&ix).unwrap();
    assert_eq!(accounts.payer, payer);
    assert_eq!(accounts.taker, ctx.resolver);
    assert_eq!(
        accounts.resolver_access,
        find_resolver_access_address(&ctx.config.whitelist_program, &payer).0
    );

    let ix = factory.cancel_escrow(&immutables, false, &TOKEN_PROGRAM_ID).unwrap();
    let (accounts, _) = factory.parse_cancel_escrow(&ix).unwrap();
    assert_eq!(accounts.maker_ata, Some(find_ata(&ctx.maker, &mint, &TOKEN_PROGRAM_ID)));

    let ix = factory
        .public_cancel_escrow(&immutables, &payer, &TOKEN_PROGRAM_ID)
        .unwrap();
    let (accounts, _) = factory.parse_public_cancel_escrow(&ix).unwrap();
    assert_eq!(accounts.escrow, escrow);
    assert_eq!(accounts.maker, ctx.maker);
}

#[test_context(TestState)]
#[test]
fn test_cancel_order_by_resolver(ctx: &mut TestState) {
    let order = ctx.order().unwrap();
    let factory = SvmSrcEscrowFactory::new(&ctx.config);
    let ix = factory
        .cancel_order_by_resolver(&order, &ctx.resolver, 700, &TOKEN_PROGRAM_ID)
        .unwrap();
    let (accounts, args) = factory.parse_cancel_order_by_resolver(&ix).unwrap();
    assert_eq!(args.reward_limit, 700);
    assert_eq!(accounts.resolver, ctx.resolver);
    assert_eq!(accounts.maker, ctx.maker);
    assert_eq!(
        accounts.order,
        order.get_order_account(&factory.program_id()).unwrap()
    );
}

struct DstState {
    factory: SvmDstEscrowFactory,
    resolver: Pubkey,
    maker: Pubkey,
    immutables: Immutables<Pubkey>,
}

impl test_context::TestContext for DstState {
    fn setup() -> Self {
        let state = <TestState as test_context::TestContext>::setup();
        let maker = Pubkey::new_unique();
        let immutables = Immutables::new(
            [0xaa; 32],
            HashLock::for_single_fill(&[0x11; 32]),
            maker,
            state.resolver,
            Pubkey::new_unique(),
            U256::from(5_000),
            U256::from(50),
            time_locks().with_deployed_at(1_700_000_000),
        )
        .unwrap();
        DstState {
            factory: SvmDstEscrowFactory::new(&state.config),
            resolver: state.resolver,
            maker,
            immutables,
        }
    }
}

#[test_context(DstState)]
#[test]
fn test_dst_create_escrow(ctx: &mut DstState) {
    let ix = ctx
        .factory
        .create_escrow(&ctx.immutables, 1_700_000_200, false, &TOKEN_PROGRAM_ID)
        .unwrap();
    assert_eq!(ix.accounts.len(), dst::CreateAccounts::LEN);
    let (accounts, args) = ctx.factory.parse_create_escrow(&ix).unwrap();

    let escrow = ctx.immutables.get_dst_escrow_address(&ctx.factory.program_id());
    assert_eq!(accounts.creator, ctx.resolver);
    assert_eq!(accounts.escrow, escrow);
    assert_eq!(
        accounts.creator_ata,
        Some(find_ata(&ctx.resolver, &ctx.immutables.token(), &TOKEN_PROGRAM_ID))
    );
    assert_eq!(args.order_hash, [0xaa; 32]);
    assert_eq!(args.amount, 5_000);
    assert_eq!(args.safety_deposit, 50);
    assert_eq!(args.recipient, ctx.maker.to_bytes());
    assert_eq!(args.timelocks, ctx.immutables.time_locks().to_limbs());
    assert_eq!(args.src_cancellation_timestamp, 1_700_000_200);
    assert_ne!(escrow, ctx.immutables.get_src_escrow_address(&ctx.factory.program_id()));
}

#[test_context(DstState)]
#[test]
fn test_dst_withdraw_and_cancel(ctx: &mut DstState) {
    let secret = [0x11; 32];
    let ix = ctx
        .factory
        .withdraw(&ctx.immutables, secret, true, &TOKEN_PROGRAM_ID)
        .unwrap();
    let (accounts, args) = ctx.factory.parse_withdraw(&ix).unwrap();
    assert_eq!(args.secret, secret);
    assert_eq!(accounts.creator, ctx.resolver);
    assert_eq!(accounts.recipient, ctx.maker);
    assert_eq!(accounts.recipient_ata, None);

    let payer = Pubkey::new_unique();
    let ix = ctx
        .factory
        .public_withdraw(&ctx.immutables, secret, &payer, false, &TOKEN_PROGRAM_ID)
        .unwrap();
    let (accounts, _) = ctx.factory.parse_public_withdraw(&ix).unwrap();
    assert_eq!(accounts.payer, payer);
    assert_eq!(
        accounts.recipient_ata,
        Some(find_ata(&ctx.maker, &ctx.immutables.token(), &TOKEN_PROGRAM_ID))
    );

    let ix = ctx.factory.cancel(&ctx.immutables, false, &TOKEN_PROGRAM_ID).unwrap();
    let (accounts, _) = ctx.factory.parse_cancel(&ix).unwrap();
    assert_eq!(
        accounts.escrow,
        ctx.immutables.get_dst_escrow_address(&ctx.factory.program_id())
    );
}

#[test_context(TestState)]
#[test]
fn test_parse_rejects_malformed_instructions(ctx: &mut TestState) {
    let order = ctx.order().unwrap();
    let src_factory = SvmSrcEscrowFactory::new(&ctx.config);
    let dst_factory = SvmDstEscrowFactory::new(&ctx.config);
    let ix = src_factory.cancel_order(&order, &TOKEN_PROGRAM_ID).unwrap();

    // dst program id
    assert!(matches!(
        dst_factory.parse_cancel(&ix),
        Err(EscrowError::InvalidInstruction(_))
    ));

    // discriminator of another instruction
    assert!(matches!(
        src_factory.parse_cancel_escrow(&ix),
        Err(EscrowError::InvalidInstruction(_))
    ));

    let mut short = ix.clone();
    short.accounts.pop();
    assert!(matches!(
        src_factory.parse_cancel_order(&short),
        Err(EscrowError::InvalidInstruction(_))
    ));

    let mut unsigned = ix.clone();
    unsigned.accounts[0].is_signer = false;
    assert!(matches!(
        src_factory.parse_cancel_order(&unsigned),
        Err(EscrowError::InvalidInstruction(_))
    ));

    let mut truncated = src_factory
        .cancel_order_by_resolver(&order, &ctx.resolver, 1, &TOKEN_PROGRAM_ID)
        .unwrap();
    truncated.data.truncate(10);
    assert!(matches!(
        src_factory.parse_cancel_order_by_resolver(&truncated),
        Err(EscrowError::InvalidInstruction(_))
    ));

    assert!(src_factory.parse_cancel_order(&ix).is_ok());
}
