use core::iter;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::keccak::hash;

use crate::bytes_iter::BytesIter;
use crate::constants::{GAS_PRICE_BASE, RATE_BUMP_DENOMINATOR, UINT_24_MAX, UINT_32_MAX};
use crate::error::{EscrowError, Result};
use crate::u256::U256;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct U24([u8; 3]);

impl U24 {
    pub fn to_u32(&self) -> u32 {
        ((self.0[0] as u32) << 16) | ((self.0[1] as u32) << 8) | (self.0[2] as u32)
    }

    pub fn to_u64(&self) -> u64 {
        self.to_u32() as u64
    }
}

impl TryFrom<u32> for U24 {
    type Error = EscrowError;

    fn try_from(val: u32) -> Result<Self> {
        if val as u64 > UINT_24_MAX {
            return Err(EscrowError::Config(format!("{val} does not fit into u24")));
        }
        Ok(Self([(val >> 16) as u8, (val >> 8) as u8, val as u8]))
    }
}

impl From<U24> for u32 {
    fn from(val: U24) -> u32 {
        val.to_u32()
    }
}

impl From<U24> for u64 {
    fn from(val: U24) -> u64 {
        val.to_u64()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct PointAndTimeDelta {
    pub rate_bump: U24,
    pub time_delta: u16,
}

/// Auction schedule as the Solana source escrow program receives it.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct AuctionData {
    pub start_time: u32,
    pub duration: u32,
    pub initial_rate_bump: U24,
    pub points_and_time_deltas: Vec<PointAndTimeDelta>,
}

impl AuctionData {
    pub fn end_time(&self) -> u64 {
        self.start_time as u64 + self.duration as u64
    }

    /// Rate bump at `time`: the initial bump until the start, linear between consecutive
    /// points, falling to zero at the end of the auction.
    pub fn rate_bump_at(&self, time: u64) -> u64 {
        let start = self.start_time as u64;
        let end = self.end_time();
        if time <= start {
            return self.initial_rate_bump.to_u64();
        }
        if time >= end {
            return 0;
        }

        let points = self
            .points_and_time_deltas
            .iter()
            .scan(start, |at, point| {
                *at += point.time_delta as u64;
                Some((*at, point.rate_bump.to_u64()))
            })
            .chain(iter::once((end, 0)));

        let mut previous = (start, self.initial_rate_bump.to_u64());
        for point in points {
            if time <= point.0 {
                return interpolate(previous, point, time);
            }
            previous = point;
        }
        0
    }
}

/// Linear interpolation of `(time, bump)` pairs; `from.0 < time <= to.0`.
fn interpolate(from: (u64, u64), to: (u64, u64), time: u64) -> u64 {
    ((time - from.0) * to.1 + (to.0 - time) * from.1) / (to.0 - from.0)
}

/// Rate bump reached `delay` seconds after the previous point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuctionPoint {
    pub delay: u16,
    pub coefficient: u32,
}

/// Gas price the maker assumed when quoting; lets resolvers recover a higher base fee.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AuctionGasCostInfo {
    pub gas_bump_estimate: u32,
    pub gas_price_estimate: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuctionDetails {
    start_time: u64,
    duration: u64,
    initial_rate_bump: u32,
    points: Vec<AuctionPoint>,
    gas_cost: AuctionGasCostInfo,
}

impl AuctionDetails {
    pub fn new(
        start_time: u64,
        duration: u64,
        initial_rate_bump: u32,
        points: Vec<AuctionPoint>,
        gas_cost: AuctionGasCostInfo,
    ) -> Result<Self> {
        check_range("startTime", start_time, UINT_32_MAX)?;
        check_range("duration", duration, UINT_24_MAX)?;
        check_range("initialRateBump", initial_rate_bump as u64, UINT_24_MAX)?;
        check_range("gasBumpEstimate", gas_cost.gas_bump_estimate as u64, UINT_24_MAX)?;
        if points.len() > u8::MAX as usize {
            return Err(EscrowError::Config(format!(
                "auction supports at most 255 points, got {}",
                points.len()
            )));
        }

        let mut elapsed = 0u64;
        for point in &points {
            check_range("point coefficient", point.coefficient as u64, UINT_24_MAX)?;
            elapsed += point.delay as u64;
        }
        if elapsed > duration {
            return Err(EscrowError::Config(format!(
                "auction points span {elapsed}s, longer than the {duration}s duration"
            )));
        }

        Ok(Self {
            start_time,
            duration,
            initial_rate_bump,
            points,
            gas_cost,
        })
    }

    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn initial_rate_bump(&self) -> u32 {
        self.initial_rate_bump
    }

    pub fn points(&self) -> &[AuctionPoint] {
        &self.points
    }

    pub fn gas_cost(&self) -> AuctionGasCostInfo {
        self.gas_cost
    }

    pub fn end_time(&self) -> u64 {
        self.start_time + self.duration
    }

    /// EVM layout: `gasBumpEstimate u24 | gasPriceEstimate u32 | startTime u32 |
    /// duration u24 | initialRateBump u24 | pointsCount u8 | (coefficient u24 | delay u16)*`.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(18 + self.points.len() * 5);
        out.extend_from_slice(&self.gas_cost.gas_bump_estimate.to_be_bytes()[1..]);
        out.extend_from_slice(&self.gas_cost.gas_price_estimate.to_be_bytes());
        out.extend_from_slice(&(self.start_time as u32).to_be_bytes());
        out.extend_from_slice(&(self.duration as u32).to_be_bytes()[1..]);
        out.extend_from_slice(&self.initial_rate_bump.to_be_bytes()[1..]);
        out.push(self.points.len() as u8);
        for point in &self.points {
            out.extend_from_slice(&point.coefficient.to_be_bytes()[1..]);
            out.extend_from_slice(&point.delay.to_be_bytes());
        }
        out
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut iter = BytesIter::new(data);
        let details = Self::decode_from(&mut iter)?;
        if !iter.is_empty() {
            return Err(EscrowError::InvalidEncoding(format!(
                "{} trailing bytes after auction details",
                iter.remaining()
            )));
        }
        Ok(details)
    }

    pub fn decode_from(iter: &mut BytesIter<'_>) -> Result<Self> {
        let gas_bump_estimate = iter.next_u24()?;
        let gas_price_estimate = iter.next_u32()?;
        let start_time = iter.next_u32()? as u64;
        let duration = iter.next_u24()? as u64;
        let initial_rate_bump = iter.next_u24()?;
        let points_count = iter.next_u8()?;
        let points = (0..points_count)
            .map(|_| {
                let coefficient = iter.next_u24()?;
                let delay = iter.next_u16()?;
                Ok(AuctionPoint { delay, coefficient })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(
            start_time,
            duration,
            initial_rate_bump,
            points,
            AuctionGasCostInfo {
                gas_bump_estimate,
                gas_price_estimate,
            },
        )
    }

    pub fn to_auction_data(&self) -> Result<AuctionData> {
        Ok(AuctionData {
            start_time: self.start_time as u32,
            duration: self.duration as u32,
            initial_rate_bump: U24::try_from(self.initial_rate_bump)?,
            points_and_time_deltas: self
                .points
                .iter()
                .map(|point| {
                    Ok(PointAndTimeDelta {
                        rate_bump: U24::try_from(point.coefficient)?,
                        time_delta: point.delay,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
        })
    }

    /// `keccak256(borsh(AuctionData))`, the auction commitment inside Solana order hashes.
    pub fn hash_for_solana(&self) -> Result<[u8; 32]> {
        let data = self.to_auction_data()?.try_to_vec()?;
        Ok(hash(&data).0)
    }
}

fn check_range(name: &str, value: u64, max: u64) -> Result<()> {
    if value > max {
        return Err(EscrowError::Config(format!(
            "{name} = {value} exceeds the maximum of {max}"
        )));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuctionCalculator {
    data: AuctionData,
    gas_cost: AuctionGasCostInfo,
}

impl AuctionCalculator {
    pub fn from_auction_details(details: &AuctionDetails) -> Result<Self> {
        Ok(Self {
            data: details.to_auction_data()?,
            gas_cost: details.gas_cost(),
        })
    }

    /// Rate bump at `time`, net of the gas credit when the block base fee is known.
    pub fn calc_rate_bump(&self, time: u64, block_base_fee: Option<U256>) -> u64 {
        let auction_bump = self.data.rate_bump_at(time);
        let gas_bump = block_base_fee.map_or(0, |fee| self.calc_gas_bump(fee));
        auction_bump.saturating_sub(gas_bump)
    }

    pub fn calc_gas_bump(&self, block_base_fee: U256) -> u64 {
        let AuctionGasCostInfo {
            gas_bump_estimate,
            gas_price_estimate,
        } = self.gas_cost;
        if gas_bump_estimate == 0 || gas_price_estimate == 0 || block_base_fee.is_zero() {
            return 0;
        }
        U256::from(gas_bump_estimate as u64)
            .checked_mul(block_base_fee)
            .map(|v| v / U256::from(gas_price_estimate as u64) / U256::from(GAS_PRICE_BASE))
            .and_then(|bump| bump.to_u64())
            .unwrap_or(u64::MAX)
    }

    pub fn calc_auction_taking_amount(taking_amount: U256, rate_bump: u64) -> Result<U256> {
        taking_amount
            .checked_mul(U256::from(RATE_BUMP_DENOMINATOR + rate_bump))
            .map(|v| v / U256::from(RATE_BUMP_DENOMINATOR))
            .ok_or_else(|| EscrowError::Config("auction taking amount overflows".to_string()))
    }

    /// Initial rate bump that makes the auction start at `start_amount` and settle at `end_amount`.
    pub fn calc_initial_rate_bump(start_amount: U256, end_amount: U256) -> Result<u32> {
        if end_amount.is_zero() || start_amount < end_amount {
            return Err(EscrowError::Config(format!(
                "start amount {start_amount} must be at least end amount {end_amount}"
            )));
        }
        let denominator = U256::from(RATE_BUMP_DENOMINATOR);
        let bump = start_amount
            .checked_mul(denominator)
            .ok_or_else(|| EscrowError::Config("rate bump overflows".to_string()))?
            / end_amount
            - denominator;
        bump.to_u64()
            .filter(|bump| *bump <= UINT_24_MAX)
            .map(|bump| bump as u32)
            .ok_or_else(|| EscrowError::Config(format!("rate bump {bump} does not fit into u24")))
    }
}
