use crate::error::{EscrowError, Result};
use crate::u256::U256;

/// Merkle leaf index a resolver must reveal when filling `fill_amount` out of an order
/// that still has `remaining_amount` of `making_amount` left.
///
/// Slices are `making_amount / parts_count` wide; the leaf at `parts_count` is reserved for
/// the fill that completes the order.
pub fn get_multiple_fill_idx(
    making_amount: U256,
    remaining_amount: U256,
    fill_amount: U256,
    parts_count: u64,
) -> Result<u64> {
    if parts_count == 0 {
        return Err(EscrowError::InvalidFill(
            "hash lock does not allow multiple fills".to_string(),
        ));
    }
    if making_amount.is_zero() || fill_amount.is_zero() {
        return Err(EscrowError::InvalidFill("zero amount".to_string()));
    }
    if remaining_amount > making_amount {
        return Err(EscrowError::InvalidFill(format!(
            "remaining amount {remaining_amount} exceeds making amount {making_amount}"
        )));
    }
    if fill_amount > remaining_amount {
        return Err(EscrowError::InvalidFill(format!(
            "fill amount {fill_amount} exceeds remaining amount {remaining_amount}"
        )));
    }

    // fill_amount >= 1, so the numerator never underflows
    let filled_after = making_amount - remaining_amount + fill_amount - U256::one();
    let idx = filled_after
        .checked_mul(U256::from(parts_count))
        .ok_or_else(|| EscrowError::InvalidFill("fill index overflows".to_string()))?
        / making_amount;
    let idx = idx.low_u64();

    if fill_amount == remaining_amount {
        return Ok(idx + 1);
    }
    Ok(idx)
}
