use alloy_primitives::Address;
use common::auction::{AuctionDetails, AuctionGasCostInfo};
use common::error::EscrowError;
use common::timelocks::{DstTimeLockDelays, SrcTimeLockDelays};
use common::{HashLock, TimeLocks, U256};
use cross_chain_evm::fusion_extension::FusionExtension;
use cross_chain_evm::maker_traits::MakerTraits;
use cross_chain_evm::whitelist::{AuctionWhitelistItem, Whitelist};
use cross_chain_evm::{EscrowExtension, Extension, Interaction};
use test_context::{test_context, TestContext};

struct Fusion {
    fusion: FusionExtension,
}

impl TestContext for Fusion {
    fn setup() -> Self {
        let auction =
            AuctionDetails::new(1_700_000_000, 120, 10_000, vec![], AuctionGasCostInfo::default())
                .unwrap();
        let whitelist = Whitelist::new(
            1_700_000_000,
            &[AuctionWhitelistItem {
                address: Address::repeat_byte(0x22),
                allow_from: 1_700_000_000,
            }],
        )
        .unwrap();
        Fusion {
            fusion: FusionExtension::new(
                Address::repeat_byte(0x44),
                auction,
                whitelist,
                Some(Interaction::new(Address::repeat_byte(0xaa), vec![1, 2, 3, 4])),
            ),
        }
    }
}

impl Fusion {
    fn escrow(&self) -> EscrowExtension {
        let time_locks = TimeLocks::new(
            SrcTimeLockDelays {
                withdrawal: 1,
                public_withdrawal: 2,
                cancellation: 3,
                public_cancellation: 4,
            },
            DstTimeLockDelays {
                withdrawal: 1,
                public_withdrawal: 2,
                cancellation: 3,
            },
        )
        .unwrap();
        EscrowExtension::new(
            self.fusion.clone(),
            HashLock::for_single_fill(&[9; 32]),
            42161,
            common::Address::Evm(Address::ZERO),
            U256::from(7),
            U256::from(5),
            time_locks,
            None,
        )
        .unwrap()
    }
}

#[test]
fn test_empty_extension() {
    let extension = Extension::default();
    assert!(extension.is_empty());
    assert!(extension.encode().unwrap().is_empty());
    assert_eq!(Extension::decode(&[]).unwrap(), extension);
    assert_eq!(extension.salt_commitment().unwrap(), U256::zero());
}

#[test]
fn test_offsets_word() {
    let extension = Extension {
        making_amount_data: vec![0xaa; 3],
        post_interaction: vec![0xbb; 2],
        custom_data: vec![0xcc],
        ..Extension::default()
    };
    let bytes = extension.encode().unwrap();
    assert_eq!(bytes.len(), 32 + 3 + 2 + 1);

    let offsets = U256::from_be_bytes(&bytes[..32].try_into().unwrap());
    let ends: Vec<u64> = (0..8).map(|i| offsets.get_bits(32 * i, 32 * i + 32).low_u64()).collect();
    assert_eq!(ends, vec![0, 0, 3, 3, 3, 3, 3, 5]);
    assert_eq!(&bytes[32..], &[0xaa, 0xaa, 0xaa, 0xbb, 0xbb, 0xcc]);
    assert_eq!(Extension::decode(&bytes).unwrap(), extension);
}

#[test]
fn test_truncated_extension() {
    assert!(matches!(
        Extension::decode(&[0u8; 16]),
        Err(EscrowError::InvalidExtension(_))
    ));

    let extension = Extension {
        predicate: vec![1; 10],
        ..Extension::default()
    };
    let bytes = extension.encode().unwrap();
    assert!(matches!(
        Extension::decode(&bytes[..bytes.len() - 1]),
        Err(EscrowError::InvalidExtension(_))
    ));
}

#[test_context(Fusion)]
#[test]
fn test_fusion_round_trip(ctx: &mut Fusion) {
    let extension = ctx.fusion.build();
    assert_eq!(extension.making_amount_data, extension.taking_amount_data);
    assert_eq!(extension.maker_permit[..20], Address::repeat_byte(0xaa)[..]);
    assert_eq!(FusionExtension::from_extension(&extension).unwrap(), ctx.fusion);
}

#[test_context(Fusion)]
#[test]
fn test_fusion_post_interaction_layout(ctx: &mut Fusion) {
    let post = ctx.fusion.build().post_interaction;

    assert_eq!(post.len(), 20 + 1 + 4 + 1 + 12);
    assert_eq!(&post[..20], Address::repeat_byte(0x44).as_slice());
    assert_eq!(post[20], 0);
    assert_eq!(&post[21..25], &1_700_000_000u32.to_be_bytes());
    assert_eq!(post[25], 1);
    assert_eq!(&post[26..36], &[0x22; 10]);
    assert_eq!(&post[36..38], &[0, 0]);
}

#[test_context(Fusion)]
#[test]
fn test_fusion_rejects_mismatched_settlement(ctx: &mut Fusion) {
    let mut extension = ctx.fusion.build();
    extension.post_interaction[0] ^= 0xff;
    assert!(matches!(
        FusionExtension::from_extension(&extension),
        Err(EscrowError::InvalidExtension(_))
    ));

    let mut extension = ctx.fusion.build();
    extension.taking_amount_data[0] ^= 0xff;
    assert!(matches!(
        FusionExtension::from_extension(&extension),
        Err(EscrowError::InvalidExtension(_))
    ));
}

#[test_context(Fusion)]
#[test]
fn test_escrow_round_trip(ctx: &mut Fusion) {
    let escrow = ctx.escrow();
    let bytes = escrow.build().encode().unwrap();
    let decoded = EscrowExtension::decode(&bytes).unwrap();
    assert_eq!(decoded, escrow);
    assert!(decoded.dst_token().is_native());
    assert_eq!(decoded.src_safety_deposit(), U256::from(7));
    assert_eq!(decoded.dst_safety_deposit(), U256::from(5));
}

#[test_context(Fusion)]
#[test]
fn test_escrow_tail_layout(ctx: &mut Fusion) {
    let escrow = ctx.escrow();
    let post = escrow.build().post_interaction;
    let tail = &post[post.len() - 160..];

    assert_eq!(post[20] & 0x01, 0x01);
    assert_eq!(&tail[..32], &HashLock::for_single_fill(&[9; 32]).to_bytes());
    assert_eq!(U256::from_be_bytes(&tail[32..64].try_into().unwrap()), U256::from(42161));
    let deposits = U256::from_be_bytes(&tail[96..128].try_into().unwrap());
    assert_eq!(deposits, (U256::from(7) << 128) | U256::from(5));
    assert_eq!(
        U256::from_be_bytes(&tail[128..].try_into().unwrap()),
        escrow.time_locks().pack()
    );
}

#[test_context(Fusion)]
#[test]
fn test_escrow_decode_requires_tail(ctx: &mut Fusion) {
    let bytes = ctx.fusion.build().encode().unwrap();
    assert!(matches!(
        EscrowExtension::decode(&bytes),
        Err(EscrowError::InvalidExtension(_))
    ));
}

#[test]
fn test_maker_traits_bits() {
    let traits = MakerTraits::default()
        .with_partial_fills(false)
        .with_multiple_fills(true)
        .with_extension(true)
        .with_post_interaction(true)
        .with_expiration(1_700_000_192)
        .unwrap()
        .with_nonce(1)
        .unwrap();

    let value = traits.as_u256();
    assert!(value.get_bit(255));
    assert!(value.get_bit(254));
    assert!(value.get_bit(251));
    assert!(value.get_bit(249));
    assert!(!value.get_bit(252));
    assert_eq!(value.get_bits(80, 120), U256::from(1_700_000_192));
    assert_eq!(value.get_bits(120, 160), U256::one());
    assert!(!traits.is_partial_fill_allowed());
    assert!(traits.is_bit_invalidator_mode());
    assert_eq!(traits.expiration(), Some(1_700_000_192));
    assert_eq!(traits.nonce_or_epoch(), 1);

    assert!(MakerTraits::default().with_nonce(1 << 40).is_err());
    assert_eq!(MakerTraits::default().expiration(), None);
}

#[test]
fn test_allowed_sender_keeps_low_80_bits() {
    let sender = Address::repeat_byte(0x12);
    let traits = MakerTraits::default().with_allowed_sender(sender).unwrap();
    assert!(traits.is_private());
    assert_eq!(traits.allowed_sender(), u128::from_be_bytes([
        0, 0, 0, 0, 0, 0, 0x12, 0x12, 0x12, 0x12, 0x12, 0x12, 0x12, 0x12, 0x12, 0x12,
    ]));
}
