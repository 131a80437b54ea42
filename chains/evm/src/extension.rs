use alloy_primitives::{keccak256, Address};
use common::bytes_iter::BytesIter;
use common::error::{EscrowError, Result};
use common::U256;

/// Call `target` with `data`, packed as `target ‖ data`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interaction {
    pub target: Address,
    pub data: Vec<u8>,
}

impl Interaction {
    pub fn new(target: Address, data: Vec<u8>) -> Self {
        Self { target, data }
    }

    pub fn encode(&self) -> Vec<u8> {
        [self.target.as_slice(), &self.data].concat()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut iter = BytesIter::new(bytes);
        let target = iter.next_address()?;
        Ok(Self {
            target,
            data: iter.rest().to_vec(),
        })
    }
}

const FIELD_COUNT: usize = 8;

/// Limit order v4 extension: eight length-prefixed fields and trailing custom data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extension {
    pub maker_asset_suffix: Vec<u8>,
    pub taker_asset_suffix: Vec<u8>,
    pub making_amount_data: Vec<u8>,
    pub taking_amount_data: Vec<u8>,
    pub predicate: Vec<u8>,
    pub maker_permit: Vec<u8>,
    pub pre_interaction: Vec<u8>,
    pub post_interaction: Vec<u8>,
    pub custom_data: Vec<u8>,
}

impl Extension {
    fn fields(&self) -> [&[u8]; FIELD_COUNT] {
        [
            &self.maker_asset_suffix,
            &self.taker_asset_suffix,
            &self.making_amount_data,
            &self.taking_amount_data,
            &self.predicate,
            &self.maker_permit,
            &self.pre_interaction,
            &self.post_interaction,
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|field| field.is_empty()) && self.custom_data.is_empty()
    }

    pub fn has_maker_permit(&self) -> bool {
        !self.maker_permit.is_empty()
    }

    /// `offsets ‖ fields ‖ customData`; field `i`'s cumulative end offset sits in bits
    /// `[32 * i, 32 * i + 32)` of the offsets word.
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }

        let mut offsets = U256::zero();
        let mut end = 0u64;
        for (i, field) in self.fields().iter().enumerate() {
            end += field.len() as u64;
            offsets = offsets
                .with_bits(32 * i, 32 * (i + 1), U256::from(end))
                .map_err(|_| EscrowError::InvalidExtension(format!("extension field {i} is too long")))?;
        }

        let mut out = Vec::with_capacity(32 + end as usize + self.custom_data.len());
        out.extend_from_slice(&offsets.to_be_bytes());
        for field in self.fields() {
            out.extend_from_slice(field);
        }
        out.extend_from_slice(&self.custom_data);
        Ok(out)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }

        let mut iter = BytesIter::new(bytes);
        let offsets = iter
            .next_u256()
            .map_err(|_| EscrowError::InvalidExtension("missing offsets word".to_string()))?;
        let body = iter.rest();

        let mut fields: Vec<Vec<u8>> = Vec::with_capacity(FIELD_COUNT);
        let mut start = 0usize;
        for i in 0..FIELD_COUNT {
            let end = offsets.get_bits(32 * i, 32 * (i + 1)).low_u64() as usize;
            if end < start || end > body.len() {
                return Err(EscrowError::InvalidExtension(format!(
                    "field {i} ends at {end}, outside [{start}, {}]",
                    body.len()
                )));
            }
            fields.push(body[start..end].to_vec());
            start = end;
        }
        let custom_data = body[start..].to_vec();

        let mut fields = fields.into_iter();
        let mut next = || fields.next().unwrap_or_default();
        Ok(Self {
            maker_asset_suffix: next(),
            taker_asset_suffix: next(),
            making_amount_data: next(),
            taking_amount_data: next(),
            predicate: next(),
            maker_permit: next(),
            pre_interaction: next(),
            post_interaction: next(),
            custom_data,
        })
    }

    /// Low 160 bits of `keccak256(encode())`, which the order salt must carry.
    pub fn salt_commitment(&self) -> Result<U256> {
        if self.is_empty() {
            return Ok(U256::zero());
        }
        let hash = keccak256(self.encode()?);
        Ok(U256::from_be_bytes(&hash.0).get_bits(0, 160))
    }

    pub fn keccak256(&self) -> Result<[u8; 32]> {
        Ok(keccak256(self.encode()?).0)
    }
}
