pub use primitive_types::U256 as PrimitiveU256;
use borsh::{BorshDeserialize, BorshSerialize};
use core::fmt;
use core::ops::{Add, BitAnd, BitOr, Div, Mul, Not, Shl, Shr, Sub};

use crate::error::{EscrowError, Result};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
#[repr(transparent)]
pub struct U256(pub PrimitiveU256);

impl U256 {
    pub const MAX: Self = Self(PrimitiveU256::MAX);

    pub const fn from(value: u64) -> Self {
        Self(PrimitiveU256([value, 0, 0, 0]))
    }

    pub const fn from_u128(value: u128) -> Self {
        Self(PrimitiveU256([value as u64, (value >> 64) as u64, 0, 0]))
    }

    pub const fn zero() -> Self {
        Self(PrimitiveU256([0, 0, 0, 0]))
    }

    pub const fn one() -> Self {
        Self(PrimitiveU256([1, 0, 0, 0]))
    }

    /// Little-endian 64-bit limbs, the layout Solana programs take `u256` arguments in.
    pub const fn from_limbs(limbs: [u64; 4]) -> Self {
        Self(PrimitiveU256(limbs))
    }

    pub const fn limbs(&self) -> [u64; 4] {
        self.0 .0
    }

    pub fn from_be_bytes(bytes: &[u8; 32]) -> Self {
        Self(PrimitiveU256::from_big_endian(bytes))
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0.to_big_endian()
    }

    pub fn from_little_endian(slice: &[u8]) -> Self {
        Self(PrimitiveU256::from_little_endian(slice))
    }

    pub fn to_little_endian(&self) -> [u8; 32] {
        self.0.to_little_endian()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn low_u64(&self) -> u64 {
        self.0.low_u64()
    }

    pub fn to_u64(&self) -> Option<u64> {
        u64::try_from(self.0).ok()
    }

    pub fn to_u128(&self) -> Option<u128> {
        u128::try_from(self.0).ok()
    }

    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        self.0.checked_mul(rhs.0).map(U256)
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(U256)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(U256)
    }

    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        self.0.checked_div(rhs.0).map(U256)
    }

    /// All-ones value of `bits` width.
    pub fn mask(bits: usize) -> Self {
        if bits >= 256 {
            Self::MAX
        } else {
            Self((PrimitiveU256::one() << bits) - PrimitiveU256::one())
        }
    }

    /// Value stored in bits `[from, to)`.
    pub fn get_bits(&self, from: usize, to: usize) -> Self {
        Self((self.0 >> from) & Self::mask(to - from).0)
    }

    /// Replaces bits `[from, to)` with `value`, which must fit the range.
    pub fn with_bits(self, from: usize, to: usize, value: Self) -> Result<Self> {
        let mask = Self::mask(to - from);
        if value > mask {
            return Err(EscrowError::Config(format!(
                "value {value} does not fit into bits [{from}, {to})"
            )));
        }
        let cleared = self.0 & !(mask.0 << from);
        Ok(Self(cleared | (value.0 << from)))
    }

    pub fn get_bit(&self, bit: usize) -> bool {
        self.0.bit(bit)
    }

    pub fn with_bit(self, bit: usize, set: bool) -> Self {
        let flag = PrimitiveU256::one() << bit;
        if set {
            Self(self.0 | flag)
        } else {
            Self(self.0 & !flag)
        }
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        Self(PrimitiveU256::from(value))
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl From<PrimitiveU256> for U256 {
    fn from(value: PrimitiveU256) -> Self {
        Self(value)
    }
}

impl From<U256> for PrimitiveU256 {
    fn from(value: U256) -> Self {
        value.0
    }
}

impl From<alloy_primitives::U256> for U256 {
    fn from(value: alloy_primitives::U256) -> Self {
        Self::from_be_bytes(&value.to_be_bytes::<32>())
    }
}

impl From<U256> for alloy_primitives::U256 {
    fn from(value: U256) -> Self {
        alloy_primitives::U256::from_be_bytes(value.to_be_bytes())
    }
}

impl From<U256> for alloy_primitives::B256 {
    fn from(value: U256) -> Self {
        alloy_primitives::B256::from(value.to_be_bytes())
    }
}

impl BorshSerialize for U256 {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.to_little_endian())
    }
}

impl BorshDeserialize for U256 {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut buf = [0u8; 32];
        reader.read_exact(&mut buf)?;
        Ok(Self(PrimitiveU256::from_little_endian(&buf)))
    }
}

impl Add for U256 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        U256(self.0 + rhs.0)
    }
}

impl Sub for U256 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        U256(self.0 - rhs.0)
    }
}

impl Mul for U256 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        U256(self.0 * rhs.0)
    }
}

impl Div for U256 {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        U256(self.0 / rhs.0)
    }
}

impl Shl<usize> for U256 {
    type Output = Self;
    fn shl(self, rhs: usize) -> Self {
        U256(self.0 << rhs)
    }
}

impl Shr<usize> for U256 {
    type Output = Self;
    fn shr(self, rhs: usize) -> Self {
        U256(self.0 >> rhs)
    }
}

impl BitAnd for U256 {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        U256(self.0 & rhs.0)
    }
}

impl BitOr for U256 {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        U256(self.0 | rhs.0)
    }
}

impl Not for U256 {
    type Output = Self;
    fn not(self) -> Self {
        U256(!self.0)
    }
}
