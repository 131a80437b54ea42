use alloy_primitives::Address;
use common::bytes_iter::BytesIter;
use common::constants::{ADDRESS_HALF_BYTES, UINT_16_MAX, UINT_32_MAX};
use common::error::{EscrowError, Result};

/// Resolver permitted to fill from `allow_from` (unix seconds).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuctionWhitelistItem {
    pub address: Address,
    pub allow_from: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AddressHalf(pub [u8; ADDRESS_HALF_BYTES]);

impl AddressHalf {
    pub fn from_address(address: &Address) -> Self {
        let mut half = [0u8; ADDRESS_HALF_BYTES];
        half.copy_from_slice(&address.as_slice()[20 - ADDRESS_HALF_BYTES..]);
        Self(half)
    }

    pub fn matches(&self, address: &Address) -> bool {
        *self == Self::from_address(address)
    }
}

/// Whitelisted resolver; `delay` counts from the previous entry's start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WhitelistEntry {
    pub address_half: AddressHalf,
    pub delay: u16,
}

/// Resolvers allowed to fill, each unlocked at its own time after `resolving_start_time`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Whitelist {
    resolving_start_time: u64,
    entries: Vec<WhitelistEntry>,
}

impl Whitelist {
    pub fn new(resolving_start_time: u64, items: &[AuctionWhitelistItem]) -> Result<Self> {
        if resolving_start_time > UINT_32_MAX {
            return Err(EscrowError::Config(format!(
                "resolving start time {resolving_start_time} does not fit into 32 bits"
            )));
        }
        if items.is_empty() {
            return Err(EscrowError::Config("whitelist can not be empty".to_string()));
        }
        if items.len() > u8::MAX as usize {
            return Err(EscrowError::Config(format!(
                "whitelist supports at most 255 resolvers, got {}",
                items.len()
            )));
        }

        let mut sorted = items.to_vec();
        sorted.sort_by_key(|item| item.allow_from);

        let mut previous = resolving_start_time;
        let entries = sorted
            .into_iter()
            .map(|item| {
                let allow_from = item.allow_from.max(resolving_start_time);
                let delay = allow_from - previous;
                if delay > UINT_16_MAX {
                    return Err(EscrowError::Config(format!(
                        "delay {delay} of resolver {} does not fit into 16 bits",
                        item.address
                    )));
                }
                previous = allow_from;
                Ok(WhitelistEntry {
                    address_half: AddressHalf::from_address(&item.address),
                    delay: delay as u16,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            resolving_start_time,
            entries,
        })
    }

    pub fn from_entries(resolving_start_time: u64, entries: Vec<WhitelistEntry>) -> Self {
        Self {
            resolving_start_time,
            entries,
        }
    }

    pub fn resolving_start_time(&self) -> u64 {
        self.resolving_start_time
    }

    pub fn entries(&self) -> &[WhitelistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Absolute unlock time of every entry, in entry order.
    fn unlock_times(&self) -> impl Iterator<Item = (&WhitelistEntry, u64)> + '_ {
        self.entries.iter().scan(self.resolving_start_time, |time, entry| {
            *time += entry.delay as u64;
            Some((entry, *time))
        })
    }

    pub fn is_whitelisted(&self, executor: &Address) -> bool {
        self.entries.iter().any(|entry| entry.address_half.matches(executor))
    }

    pub fn can_execute_at(&self, executor: &Address, time: u64) -> bool {
        self.unlock_times()
            .any(|(entry, allow_from)| entry.address_half.matches(executor) && time >= allow_from)
    }

    /// True when the first resolver unlocks strictly before everybody else.
    pub fn is_exclusive_resolver(&self, executor: &Address) -> bool {
        let mut times = self.unlock_times();
        let Some((first, first_time)) = times.next() else {
            return false;
        };
        if !first.address_half.matches(executor) {
            return false;
        }
        match times.next() {
            Some((_, second_time)) => first_time < second_time,
            None => true,
        }
    }

    pub fn is_exclusivity_period(&self, time: u64) -> bool {
        let mut times = self.unlock_times().map(|(_, time)| time);
        match (times.next(), times.next()) {
            (Some(first), Some(second)) => first < second && time < second,
            (Some(_), None) => true,
            _ => false,
        }
    }

    /// `count u8 ‖ addressHalf*`, the whitelist part of the amount getter data.
    pub fn encode_halves(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.entries.len() * ADDRESS_HALF_BYTES);
        out.push(self.entries.len() as u8);
        for entry in &self.entries {
            out.extend_from_slice(&entry.address_half.0);
        }
        out
    }

    pub fn decode_halves(iter: &mut BytesIter<'_>) -> Result<Vec<AddressHalf>> {
        let count = iter.next_u8()?;
        (0..count)
            .map(|_| Ok(AddressHalf(iter.next_array()?)))
            .collect()
    }

    /// `resolvingStartTime u32 ‖ count u8 ‖ (addressHalf ‖ delay u16)*`, the post-interaction form.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(5 + self.entries.len() * (ADDRESS_HALF_BYTES + 2));
        out.extend_from_slice(&(self.resolving_start_time as u32).to_be_bytes());
        out.push(self.entries.len() as u8);
        for entry in &self.entries {
            out.extend_from_slice(&entry.address_half.0);
            out.extend_from_slice(&entry.delay.to_be_bytes());
        }
        out
    }

    pub fn decode(iter: &mut BytesIter<'_>) -> Result<Self> {
        let resolving_start_time = iter.next_u32()? as u64;
        let count = iter.next_u8()?;
        let entries = (0..count)
            .map(|_| {
                Ok(WhitelistEntry {
                    address_half: AddressHalf(iter.next_array()?),
                    delay: iter.next_u16()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_entries(resolving_start_time, entries))
    }
}
