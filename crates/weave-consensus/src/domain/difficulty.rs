//! # Difficulty Retargeting
//!
//! Conversions between the legacy leading-zero difficulty and the linear
//! threshold form, the periodic retarget formula, PoA option scaling, and
//! cumulative-difficulty accounting.
//!
//! The retarget arithmetic runs in one of two numeric modes
//! ([`NumericMode`]): exact integer arithmetic, or double-precision floats
//! reproducing the historical chain's rounding bit-for-bit.

use shared_types::constants::{
    max_diff, min_diff, DIFF_ADJUSTMENT_DOWN_LIMIT, DIFF_ADJUSTMENT_UP_LIMIT,
    POA_ALTERNATIVE_DIFF_MULTIPLIER, RETARGET_INTERVAL, RETARGET_TOLERANCE_DEN,
    RETARGET_TOLERANCE_NUM, TARGET_TIME,
};
use shared_types::{Block, U512};

use super::errors::BlockValidationError;
use super::numeric::{f64_to_u512, u512_to_f64};
use crate::config::NumericMode;

/// Convert a leading-zero-count difficulty into its linear threshold:
/// `2^256 - 2^(256 - d)`.
pub fn switch_to_linear_diff(leading_zeros: u32) -> U512 {
    max_diff() - (U512::one() << (256 - leading_zeros as usize))
}

/// Scale a linear difficulty by an integer multiplier:
/// `MAX_DIFF - (MAX_DIFF - diff) / multiplier`.
///
/// A multiplier above one shrinks the valid digest space, making the
/// difficulty harder.
pub fn multiply_diff(diff: U512, multiplier: u64) -> U512 {
    max_diff() - (max_diff() - diff) / U512::from(multiplier.max(1))
}

/// The difficulty a PoW digest must exceed for a given PoA recall option.
///
/// Option 1 pays no penalty; each further option doubles the remaining
/// digest-space squeeze, discouraging recall-byte shopping.
pub fn poa_modified_diff(diff: U512, option: u64) -> U512 {
    if option <= 1 {
        return diff;
    }
    let multiplier = POA_ALTERNATIVE_DIFF_MULTIPLIER.pow((option - 1) as u32);
    multiply_diff(diff, multiplier)
}

/// Cumulative difficulty after a block of difficulty `new_diff`:
/// `prev + 2^256 / (MAX_DIFF - new_diff)`.
pub fn next_cumulative_diff(prev_cumulative_diff: U512, new_diff: U512) -> U512 {
    let remaining = max_diff().saturating_sub(new_diff).max(U512::one());
    prev_cumulative_diff + max_diff() / remaining
}

/// Recompute the difficulty for a retarget block.
///
/// `_height` is carried for interface stability; the formula is uniform
/// across the heights this kernel accepts.
pub fn calculate_difficulty(
    old_diff: U512,
    timestamp: u64,
    last_retarget: u64,
    _height: u64,
    mode: NumericMode,
) -> U512 {
    match mode {
        NumericMode::Exact => retarget_exact(old_diff, timestamp, last_retarget),
        NumericMode::LegacyFloat => retarget_legacy(old_diff, timestamp, last_retarget),
    }
}

fn target_time() -> u64 {
    RETARGET_INTERVAL * TARGET_TIME
}

fn clamp_diff(diff: U512) -> U512 {
    diff.max(min_diff()).min(max_diff())
}

fn retarget_exact(old_diff: U512, timestamp: u64, last_retarget: u64) -> U512 {
    let target = target_time();
    let actual = timestamp.saturating_sub(last_retarget);

    // |1 - actual/target| < NUM/DEN, kept in integers.
    if target.abs_diff(actual) * RETARGET_TOLERANCE_DEN < target * RETARGET_TOLERANCE_NUM {
        return old_diff;
    }

    // Clamp the time ratio to [1/UP_LIMIT, DOWN_LIMIT] as an exact fraction.
    let (num, den) = if actual * DIFF_ADJUSTMENT_UP_LIMIT < target {
        (1, DIFF_ADJUSTMENT_UP_LIMIT)
    } else if actual > target * DIFF_ADJUSTMENT_DOWN_LIMIT {
        (DIFF_ADJUSTMENT_DOWN_LIMIT, 1)
    } else {
        (actual, target)
    };

    let diff_inverse = (max_diff() - old_diff) * U512::from(num) / U512::from(den);
    clamp_diff(max_diff().saturating_sub(diff_inverse))
}

fn retarget_legacy(old_diff: U512, timestamp: u64, last_retarget: u64) -> U512 {
    let target = target_time() as f64;
    let actual = timestamp.saturating_sub(last_retarget) as f64;
    let time_delta = actual / target;

    if (1.0 - time_delta).abs()
        < RETARGET_TOLERANCE_NUM as f64 / RETARGET_TOLERANCE_DEN as f64
    {
        return old_diff;
    }

    let clamped = time_delta.clamp(
        1.0 / DIFF_ADJUSTMENT_UP_LIMIT as f64,
        DIFF_ADJUSTMENT_DOWN_LIMIT as f64,
    );
    let diff_inverse = f64_to_u512((u512_to_f64(max_diff() - old_diff) * clamped).floor());
    clamp_diff(max_diff().saturating_sub(diff_inverse))
}

/// Validate a candidate block's difficulty and last-retarget fields against
/// the previous block.
pub fn validate_difficulty(
    block: &Block,
    prev_block: &Block,
    mode: NumericMode,
) -> Result<(), BlockValidationError> {
    if block.height != 0 && block.height % RETARGET_INTERVAL == 0 {
        let expected = calculate_difficulty(
            prev_block.diff,
            block.timestamp,
            prev_block.last_retarget,
            block.height,
            mode,
        );
        if block.diff != expected {
            return Err(BlockValidationError::InvalidDifficulty);
        }
        if block.last_retarget != block.timestamp {
            return Err(BlockValidationError::InvalidLastRetarget);
        }
    } else {
        if block.diff != prev_block.diff {
            return Err(BlockValidationError::InvalidDifficulty);
        }
        if block.last_retarget != prev_block.last_retarget {
            return Err(BlockValidationError::InvalidLastRetarget);
        }
    }
    Ok(())
}
