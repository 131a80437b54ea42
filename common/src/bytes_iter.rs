use alloy_primitives::Address as EvmAddress;

use crate::error::{EscrowError, Result};
use crate::u256::U256;

/// Big-endian cursor over packed calldata.
#[derive(Clone, Debug)]
pub struct BytesIter<'a> {
    data: &'a [u8],
}

impl<'a> BytesIter<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    pub fn rest(self) -> &'a [u8] {
        self.data
    }

    pub fn next_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.data.len() < len {
            return Err(EscrowError::InvalidEncoding(format!(
                "expected {len} more bytes, {} left",
                self.data.len()
            )));
        }
        let (head, tail) = self.data.split_at(len);
        self.data = tail;
        Ok(head)
    }

    pub fn next_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.next_bytes(N)?);
        Ok(out)
    }

    /// Reads a big-endian unsigned integer of `len` bytes (at most 8).
    fn next_uint(&mut self, len: usize) -> Result<u64> {
        Ok(self
            .next_bytes(len)?
            .iter()
            .fold(0u64, |acc, b| (acc << 8) | *b as u64))
    }

    pub fn next_u8(&mut self) -> Result<u8> {
        Ok(self.next_uint(1)? as u8)
    }

    pub fn next_u16(&mut self) -> Result<u16> {
        Ok(self.next_uint(2)? as u16)
    }

    pub fn next_u24(&mut self) -> Result<u32> {
        Ok(self.next_uint(3)? as u32)
    }

    pub fn next_u32(&mut self) -> Result<u32> {
        Ok(self.next_uint(4)? as u32)
    }

    pub fn next_u64(&mut self) -> Result<u64> {
        self.next_uint(8)
    }

    pub fn next_u256(&mut self) -> Result<U256> {
        Ok(U256::from_be_bytes(&self.next_array::<32>()?))
    }

    pub fn next_address(&mut self) -> Result<EvmAddress> {
        Ok(EvmAddress::from(self.next_array::<20>()?))
    }
}
