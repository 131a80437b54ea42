use alloy_primitives::{address, b256, keccak256, Address, B256};
use common::error::EscrowError;
use common::timelocks::{DstTimeLockDelays, SrcTimeLockDelays};
use common::{DstImmutablesComplement, HashLock, Immutables, ImmutablesCodec, TimeLocks, U256};
use cross_chain_evm::{
    EscrowAddressFactory, EscrowFactory, EscrowFactoryConfig, EscrowFactoryFacade,
    EscrowFactoryZkSync,
};
use test_context::{test_context, TestContext};

const ONE: Address = address!("0000000000000000000000000000000000000001");
const TWO: Address = address!("0000000000000000000000000000000000000002");
const PROXY_HASH: B256 = b256!("0101010101010101010101010101010101010101010101010101010101010101");

struct Factories {
    factory: Address,
    implementation: Address,
    src_immutables: Immutables<Address>,
}

impl TestContext for Factories {
    fn setup() -> Self {
        let time_locks = TimeLocks::new(
            SrcTimeLockDelays {
                withdrawal: 10,
                public_withdrawal: 120,
                cancellation: 200,
                public_cancellation: 300,
            },
            DstTimeLockDelays {
                withdrawal: 10,
                public_withdrawal: 100,
                cancellation: 150,
            },
        )
        .unwrap();
        let src_immutables = Immutables::new(
            [0xaa; 32],
            HashLock::for_single_fill(&[0x11; 32]),
            Address::repeat_byte(0x11),
            Address::repeat_byte(0x22),
            Address::repeat_byte(0x33),
            U256::from(1_000_000),
            U256::from(1000),
            time_locks,
        )
        .unwrap();
        Factories {
            factory: Address::repeat_byte(0x44),
            implementation: Address::repeat_byte(0x55),
            src_immutables,
        }
    }
}

#[test]
fn test_create2_regression_vector() {
    let factory = EscrowFactory::new(ONE);
    let salt = keccak256(b"");
    assert_eq!(
        factory.get_escrow_address(salt, ONE),
        address!("2f8f065e797ad5499066c0e7d1f8f1c0405e3179")
    );
    assert_eq!(
        factory.get_escrow_address(salt, TWO),
        address!("291200ceb5fab3847c9f30c5f272961f78d6cfd4")
    );
}

#[test]
fn test_zksync_address() {
    let factory = EscrowFactoryZkSync::new(Address::repeat_byte(0x44), PROXY_HASH);
    assert_eq!(
        factory.get_escrow_address(keccak256(b""), Address::repeat_byte(0x55)),
        address!("89fd28724e9d50470e1733f880bbc0c59b4cc5f9")
    );
}

#[test_context(Factories)]
#[test]
fn test_src_escrow_address_uses_immutables_hash(ctx: &mut Factories) {
    let factory = EscrowFactory::new(ctx.factory);
    let expected = ctx
        .src_immutables
        .get_src_escrow_address(ctx.factory, ctx.implementation)
        .unwrap();
    assert_eq!(
        factory
            .get_src_escrow_address(&ctx.src_immutables, ctx.implementation)
            .unwrap(),
        expected
    );
    assert_eq!(
        factory.get_escrow_address(ctx.src_immutables.hash().unwrap().into(), ctx.implementation),
        expected
    );
}

#[test_context(Factories)]
#[test]
fn test_dst_escrow_address(ctx: &mut Factories) {
    let factory = EscrowFactory::new(ctx.factory);
    let taker = Address::repeat_byte(0x66);
    let complement = DstImmutablesComplement::new(
        Address::repeat_byte(0x77),
        U256::from(990),
        Address::ZERO,
        Address::repeat_byte(0x88),
        U256::from(500),
        42161,
    );

    let address = factory
        .get_dst_escrow_address(&ctx.src_immutables, &complement, 1_700_000_100, taker, ctx.implementation)
        .unwrap();

    let dst = ctx
        .src_immutables
        .with_complement(&complement)
        .unwrap()
        .with_taker(taker)
        .with_deployed_at(1_700_000_100);
    assert_eq!(dst.time_locks().deployed_at(), 1_700_000_100);
    assert_eq!(
        address,
        dst.get_dst_escrow_address(ctx.factory, ctx.implementation).unwrap()
    );
    assert_ne!(
        address,
        factory
            .get_src_escrow_address(&ctx.src_immutables, ctx.implementation)
            .unwrap()
    );
}

#[test_context(Factories)]
#[test]
fn test_facade_dispatches_on_chain(ctx: &mut Factories) {
    let config = EscrowFactoryConfig {
        address: ctx.factory,
        zksync_proxy_bytecode_hash: Some(PROXY_HASH),
    };
    let salt = ctx.src_immutables.hash().unwrap().into();

    let ethereum = EscrowFactoryFacade::new(1, &config).unwrap();
    assert!(matches!(ethereum, EscrowFactoryFacade::Create2(_)));
    assert_eq!(
        ethereum.get_escrow_address(salt, ctx.implementation),
        EscrowFactory::new(ctx.factory).get_escrow_address(salt, ctx.implementation)
    );

    let zksync = EscrowFactoryFacade::new(324, &config).unwrap();
    assert!(matches!(zksync, EscrowFactoryFacade::ZkSync(_)));
    assert_eq!(
        zksync.get_escrow_address(salt, ctx.implementation),
        EscrowFactoryZkSync::new(ctx.factory, PROXY_HASH).get_escrow_address(salt, ctx.implementation)
    );
    assert_eq!(zksync.address(), ctx.factory);
}

#[test_context(Factories)]
#[test]
fn test_facade_rejects_bad_config(ctx: &mut Factories) {
    let config = EscrowFactoryConfig {
        address: ctx.factory,
        zksync_proxy_bytecode_hash: None,
    };
    assert!(matches!(
        EscrowFactoryFacade::new(324, &config),
        Err(EscrowError::Config(_))
    ));
    assert_eq!(
        EscrowFactoryFacade::new(501, &config),
        Err(EscrowError::UnsupportedChain(501))
    );
    assert_eq!(
        EscrowFactoryFacade::new(7, &config),
        Err(EscrowError::UnsupportedChain(7))
    );
}

#[test_context(Factories)]
#[test]
fn test_multiple_fill_interaction(ctx: &mut Factories) {
    let factory = EscrowFactory::new(ctx.factory);
    let proof = [[0x01; 32], [0x02; 32]];
    let interaction = factory.get_multiple_fill_interaction(&proof, 2, [0x03; 32]);

    assert_eq!(interaction.target, ctx.factory);
    // offset, head (offset, idx, secretHash), array length, two items
    assert_eq!(interaction.data.len(), 7 * 32);
    assert_eq!(interaction.data[31], 0x20);
    assert_eq!(interaction.data[32 + 31], 0x60);
    assert_eq!(interaction.data[64 + 31], 2);
    assert_eq!(&interaction.data[96..128], &[0x03; 32]);
    assert_eq!(interaction.data[128 + 31], 2);
    assert_eq!(&interaction.data[160..192], &[0x01; 32]);
    assert_eq!(interaction.encode()[..20], ctx.factory[..]);
}

#[test]
fn test_config_from_json() {
    let config: EscrowFactoryConfig = serde_json::from_str(
        r#"{
            "address": "0x4444444444444444444444444444444444444444",
            "zksyncProxyBytecodeHash": "0x0101010101010101010101010101010101010101010101010101010101010101"
        }"#,
    )
    .unwrap();
    assert_eq!(config.address, Address::repeat_byte(0x44));
    assert_eq!(config.zksync_proxy_bytecode_hash, Some(PROXY_HASH));

    let plain: EscrowFactoryConfig =
        serde_json::from_str(r#"{"address": "0x4444444444444444444444444444444444444444"}"#).unwrap();
    assert_eq!(plain.zksync_proxy_bytecode_hash, None);
}
