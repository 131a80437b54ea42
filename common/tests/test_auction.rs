use common::auction::{
    AuctionCalculator, AuctionDetails, AuctionGasCostInfo, AuctionPoint,
};
use common::error::EscrowError;
use common::U256;
use hex_literal::hex;
use test_context::{test_context, TestContext};

const START: u64 = 1_700_000_000;

struct Auction {
    details: AuctionDetails,
}

impl TestContext for Auction {
    fn setup() -> Self {
        let details = AuctionDetails::new(
            START,
            180,
            50_000,
            vec![
                AuctionPoint {
                    coefficient: 40_000,
                    delay: 60,
                },
                AuctionPoint {
                    coefficient: 20_000,
                    delay: 60,
                },
            ],
            AuctionGasCostInfo {
                gas_bump_estimate: 1000,
                gas_price_estimate: 200,
            },
        )
        .unwrap();
        Auction { details }
    }
}

#[test_context(Auction)]
#[test]
fn test_evm_encoding(ctx: &mut Auction) {
    assert_eq!(
        ctx.details.encode(),
        hex!("0003e8000000c86553f1000000b400c35002009c40003c004e20003c").to_vec()
    );
}

#[test_context(Auction)]
#[test]
fn test_decode_round_trip(ctx: &mut Auction) {
    let decoded = AuctionDetails::decode(&ctx.details.encode()).unwrap();
    assert_eq!(decoded, ctx.details);

    let mut with_trailer = ctx.details.encode();
    with_trailer.push(0);
    assert!(matches!(
        AuctionDetails::decode(&with_trailer),
        Err(EscrowError::InvalidEncoding(_))
    ));
}

#[test_context(Auction)]
#[test]
fn test_solana_hash(ctx: &mut Auction) {
    assert_eq!(
        ctx.details.hash_for_solana().unwrap(),
        hex!("dfc0c99c4d92e38232367ce67a61b21ab2849e4816acd04d41525f5ad3991b9b")
    );
}

#[test_context(Auction)]
#[test]
fn test_rate_bump_interpolation(ctx: &mut Auction) {
    let calculator = AuctionCalculator::from_auction_details(&ctx.details).unwrap();
    assert_eq!(calculator.calc_rate_bump(START - 10, None), 50_000);
    assert_eq!(calculator.calc_rate_bump(START, None), 50_000);
    assert_eq!(calculator.calc_rate_bump(START + 30, None), 45_000);
    assert_eq!(calculator.calc_rate_bump(START + 60, None), 40_000);
    assert_eq!(calculator.calc_rate_bump(START + 90, None), 30_000);
    assert_eq!(calculator.calc_rate_bump(START + 120, None), 20_000);
    assert_eq!(calculator.calc_rate_bump(START + 150, None), 10_000);
    assert_eq!(calculator.calc_rate_bump(START + 180, None), 0);
    assert_eq!(calculator.calc_rate_bump(START + 1000, None), 0);
}

#[test_context(Auction)]
#[test]
fn test_rate_bump_is_monotonic(ctx: &mut Auction) {
    let data = ctx.details.to_auction_data().unwrap();
    let mut previous = u64::MAX;
    for t in START..=START + 200 {
        let bump = data.rate_bump_at(t);
        assert!(bump <= previous);
        previous = bump;
    }
}

#[test_context(Auction)]
#[test]
fn test_rate_bump_hits_points_exactly(ctx: &mut Auction) {
    let data = ctx.details.to_auction_data().unwrap();
    assert_eq!(data.end_time(), START + 180);
    assert_eq!(data.rate_bump_at(START + 60), 40_000);
    assert_eq!(data.rate_bump_at(START + 61), 39_666);
    assert_eq!(data.rate_bump_at(data.end_time() - 1), 333);
    assert_eq!(data.rate_bump_at(data.end_time()), 0);
}

#[test_context(Auction)]
#[test]
fn test_gas_bump_reduces_rate(ctx: &mut Auction) {
    let calculator = AuctionCalculator::from_auction_details(&ctx.details).unwrap();
    // 1000 * 400e6 / 200 / 1e6 = 2000
    let base_fee = U256::from(400_000_000);
    assert_eq!(calculator.calc_gas_bump(base_fee), 2000);
    assert_eq!(calculator.calc_rate_bump(START + 60, Some(base_fee)), 38_000);
    assert_eq!(calculator.calc_rate_bump(START + 180, Some(base_fee)), 0);
}

#[test]
fn test_taking_amount() {
    let amount = AuctionCalculator::calc_auction_taking_amount(U256::from(1_000_000), 50_000).unwrap();
    assert_eq!(amount, U256::from(1_500_000));
    let unchanged = AuctionCalculator::calc_auction_taking_amount(U256::from(999), 0).unwrap();
    assert_eq!(unchanged, U256::from(999));
}

#[test]
fn test_initial_rate_bump() {
    let bump =
        AuctionCalculator::calc_initial_rate_bump(U256::from(1_500_000), U256::from(1_000_000))
            .unwrap();
    assert_eq!(bump, 50_000);
    assert!(AuctionCalculator::calc_initial_rate_bump(U256::from(1), U256::from(2)).is_err());
}

#[test]
fn test_points_must_fit_duration() {
    let result = AuctionDetails::new(
        START,
        100,
        1000,
        vec![
            AuctionPoint {
                coefficient: 500,
                delay: 60,
            },
            AuctionPoint {
                coefficient: 100,
                delay: 60,
            },
        ],
        AuctionGasCostInfo::default(),
    );
    assert!(matches!(result, Err(EscrowError::Config(_))));
}

#[test]
fn test_rate_bump_must_fit_u24() {
    let result = AuctionDetails::new(START, 100, 0x0100_0000, vec![], AuctionGasCostInfo::default());
    assert!(matches!(result, Err(EscrowError::Config(_))));
}
