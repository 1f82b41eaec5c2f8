//! # Pricing, Inflation and the Endowment Pool
//!
//! The fee a transaction must pay models the perpetual cost of storing its
//! data: a decaying USD-per-GB-year curve, integrated forever, converted to
//! winston through a difficulty-indexed USD/AR rate. The same machinery
//! feeds the per-block reward-pool transition: inflation plus the miner's
//! fee share, topped up from the pool when they fall short of the storage
//! burden of the existing weave.
//!
//! Every formula exists in both numeric modes. The fee schedule is part of
//! the compatibility contract: historical blocks only validate if these
//! numbers come out identical to the chain that produced them.

use shared_types::constants::{
    max_diff, BLOCKS_PER_YEAR, GENESIS_TOKENS, INITIAL_USD_PER_AR, INITIAL_USD_TO_AR_HEIGHT,
    INITIAL_USD_TO_AR_DIFF_LEADING_ZEROS, MINER_FEE_SHARE_DIVISOR, SECONDS_PER_YEAR, TX_SIZE_BASE,
    USD_PER_GBY_2018, USD_PER_GBY_2019, USD_PER_GBY_ANCHOR_TIMESTAMP, USD_PER_GBY_DECAY_ANNUAL,
    WALLET_GEN_FEE, WINSTON_PER_AR,
};
use shared_types::{Transaction, U512};

use super::difficulty::switch_to_linear_diff;
use super::numeric::{pow_fixed, u512_to_f64, FIXED_SCALE, LN2_FIXED};
use crate::config::NumericMode;

/// `0.001045` in fixed-point (2018 USD/GB-year anchor).
const USD_PER_GBY_2018_FIXED: u128 = 1_045_000_000;
/// `0.000925` in fixed-point (2019 USD/GB-year anchor).
const USD_PER_GBY_2019_FIXED: u128 = 925_000_000;
/// `0.995` in fixed-point (annual storage-cost decay).
const DECAY_ANNUAL_FIXED: u128 = 995_000_000_000;
/// `1.5` in fixed-point (USD per AR at the rate anchor).
const INITIAL_USD_PER_AR_FIXED: u128 = 1_500_000_000_000;
/// `2^(-1 / BLOCKS_PER_YEAR)` in fixed-point (per-block inflation decay).
const PER_BLOCK_INFLATION_DECAY_FIXED: u128 = 999_997_362_457;
/// Exact-mode perpetuity multiplier: the geometric sum of the annual decay,
/// `1 / (1 - 0.995)`.
const PERPETUAL_YEARS_EXACT: u128 = 200;
/// Unix timestamp of the 2018 anchor (2018-01-01T00:00:00Z).
const ANCHOR_2018_TIMESTAMP: u64 = 1_514_764_800;

const GIB: u128 = 1024 * 1024 * 1024;

/// Outcome of the per-block reward-pool transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardPoolTransition {
    /// Winston credited to the block producer.
    pub finder_reward: u128,
    /// Endowment pool balance after the block.
    pub new_pool: u128,
}

fn u512_to_u128_saturating(value: U512) -> u128 {
    if value > U512::from(u128::MAX) {
        u128::MAX
    } else {
        value.low_u128()
    }
}

// -----------------------------------------------------------------------------
// Inflation
// -----------------------------------------------------------------------------

/// Winston minted at `height`: `0.2 * GENESIS * 2^(-height/BLOCKS_PER_YEAR)
/// * ln 2 / BLOCKS_PER_YEAR`, halving once per year of blocks.
pub fn inflation_reward(height: u64, mode: NumericMode) -> u128 {
    match mode {
        NumericMode::LegacyFloat => inflation_legacy(height).floor() as u128,
        NumericMode::Exact => inflation_exact(height),
    }
}

fn inflation_legacy(height: u64) -> f64 {
    let genesis_winston = (GENESIS_TOKENS * WINSTON_PER_AR) as f64;
    let per_year = BLOCKS_PER_YEAR as f64;
    0.2 * genesis_winston * 2f64.powf(-(height as f64) / per_year) * std::f64::consts::LN_2
        / per_year
}

fn inflation_exact(height: u64) -> u128 {
    let base =
        GENESIS_TOKENS * WINSTON_PER_AR / 5 * LN2_FIXED / FIXED_SCALE / BLOCKS_PER_YEAR as u128;
    let halvings = height / BLOCKS_PER_YEAR;
    if halvings >= 128 {
        return 0;
    }
    let halved = base >> halvings;
    halved * pow_fixed(PER_BLOCK_INFLATION_DECAY_FIXED, height % BLOCKS_PER_YEAR) / FIXED_SCALE
}

// -----------------------------------------------------------------------------
// Storage cost curve
// -----------------------------------------------------------------------------

fn usd_per_gby_legacy(timestamp: u64) -> f64 {
    let (anchor, anchor_ts) = if timestamp < USD_PER_GBY_ANCHOR_TIMESTAMP {
        (USD_PER_GBY_2018, ANCHOR_2018_TIMESTAMP)
    } else {
        (USD_PER_GBY_2019, USD_PER_GBY_ANCHOR_TIMESTAMP)
    };
    let years = timestamp.saturating_sub(anchor_ts) as f64 / SECONDS_PER_YEAR as f64;
    anchor * USD_PER_GBY_DECAY_ANNUAL.powf(years)
}

fn usd_per_gby_exact(timestamp: u64) -> u128 {
    let (anchor, anchor_ts) = if timestamp < USD_PER_GBY_ANCHOR_TIMESTAMP {
        (USD_PER_GBY_2018_FIXED, ANCHOR_2018_TIMESTAMP)
    } else {
        (USD_PER_GBY_2019_FIXED, USD_PER_GBY_ANCHOR_TIMESTAMP)
    };
    let years = timestamp.saturating_sub(anchor_ts) / SECONDS_PER_YEAR;
    anchor * pow_fixed(DECAY_ANNUAL_FIXED, years) / FIXED_SCALE
}

fn perpetual_gb_cost_legacy(timestamp: u64) -> f64 {
    usd_per_gby_legacy(timestamp) / -USD_PER_GBY_DECAY_ANNUAL.ln()
}

fn perpetual_gb_cost_exact(timestamp: u64) -> u128 {
    usd_per_gby_exact(timestamp) * PERPETUAL_YEARS_EXACT
}

// -----------------------------------------------------------------------------
// USD -> winston
// -----------------------------------------------------------------------------

fn usd_to_winston_legacy(usd: f64, diff: U512, height: u64) -> u128 {
    let initial_diff = switch_to_linear_diff(INITIAL_USD_TO_AR_DIFF_LEADING_ZEROS);
    let delta_p = u512_to_f64(max_diff() - initial_diff) / u512_to_f64(max_diff() - diff);
    let delta_inflation =
        inflation_legacy(height) / inflation_legacy(INITIAL_USD_TO_AR_HEIGHT);
    ((usd * WINSTON_PER_AR as f64 * delta_inflation) / (INITIAL_USD_PER_AR * delta_p)).floor()
        as u128
}

fn usd_to_winston_exact(usd_fixed: u128, diff: U512, height: u64) -> u128 {
    let initial_diff = switch_to_linear_diff(INITIAL_USD_TO_AR_DIFF_LEADING_ZEROS);
    let numerator = U512::from(usd_fixed)
        * U512::from(WINSTON_PER_AR)
        * U512::from(inflation_exact(height))
        * (max_diff() - diff);
    let denominator = U512::from(inflation_exact(INITIAL_USD_TO_AR_HEIGHT))
        * U512::from(INITIAL_USD_PER_AR_FIXED)
        * (max_diff() - initial_diff);
    u512_to_u128_saturating(numerator / denominator.max(U512::one()))
}

// -----------------------------------------------------------------------------
// Fees and the reward pool
// -----------------------------------------------------------------------------

/// Minimum fee for a transaction of `data_size` payload bytes.
///
/// `creates_wallet` adds the wallet-generation fee charged when a transfer
/// targets an address absent from the ledger.
pub fn tx_fee(
    data_size: u64,
    diff: U512,
    height: u64,
    timestamp: u64,
    creates_wallet: bool,
    mode: NumericMode,
) -> u128 {
    let bytes = (data_size + TX_SIZE_BASE) as u128;
    let storage = match mode {
        NumericMode::LegacyFloat => {
            let usd = perpetual_gb_cost_legacy(timestamp) * bytes as f64 / GIB as f64;
            usd_to_winston_legacy(usd, diff, height)
        }
        NumericMode::Exact => {
            let usd_fixed = perpetual_gb_cost_exact(timestamp) * bytes / GIB;
            usd_to_winston_exact(usd_fixed, diff, height)
        }
    };
    let wallet_fee = if creates_wallet { WALLET_GEN_FEE } else { 0 };
    storage + wallet_fee
}

/// Winston cost of storing the whole weave for one block interval; the
/// target the endowment pool tops miners up towards.
pub fn weave_storage_burden(
    weave_size: u64,
    diff: U512,
    height: u64,
    timestamp: u64,
    mode: NumericMode,
) -> u128 {
    match mode {
        NumericMode::LegacyFloat => {
            let usd = usd_per_gby_legacy(timestamp) * weave_size as f64
                / GIB as f64
                / BLOCKS_PER_YEAR as f64;
            usd_to_winston_legacy(usd, diff, height)
        }
        NumericMode::Exact => {
            let usd_fixed =
                usd_per_gby_exact(timestamp) * weave_size as u128 / GIB / BLOCKS_PER_YEAR as u128;
            usd_to_winston_exact(usd_fixed, diff, height)
        }
    }
}

/// The reward-pool transition for one block.
///
/// Each transaction fee splits between the miner and the pool; the miner
/// additionally collects inflation, and when that total falls short of the
/// storage burden, the difference is drawn down from the pool (never below
/// zero).
pub fn reward_pool_transition(
    prev_pool: u128,
    txs: &[Transaction],
    weave_size: u64,
    height: u64,
    diff: U512,
    timestamp: u64,
    mode: NumericMode,
) -> RewardPoolTransition {
    let inflation = inflation_reward(height, mode);

    let mut pool = prev_pool;
    let mut miner_fee_share = 0u128;
    for tx in txs {
        let share = tx.reward / MINER_FEE_SHARE_DIVISOR;
        miner_fee_share += share;
        pool += tx.reward - share;
    }

    let base_reward = inflation + miner_fee_share;
    let burden = weave_storage_burden(weave_size, diff, height, timestamp, mode);

    let finder_reward = if burden > base_reward {
        let take = (burden - base_reward).min(pool);
        pool -= take;
        base_reward + take
    } else {
        base_reward
    };

    RewardPoolTransition {
        finder_reward,
        new_pool: pool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: [NumericMode; 2] = [NumericMode::Exact, NumericMode::LegacyFloat];

    fn test_diff() -> U512 {
        switch_to_linear_diff(30)
    }

    // 2019-06-01, a timestamp inside the decaying fee era.
    const TS: u64 = 1_559_347_200;

    fn relative_gap(a: u128, b: u128) -> f64 {
        let (a, b) = (a as f64, b as f64);
        (a - b).abs() / a.max(b).max(1.0)
    }

    #[test]
    fn test_inflation_at_genesis() {
        for mode in MODES {
            let reward = inflation_reward(0, mode);
            // 0.2 * 55M AR * ln2 / blocks-per-year, in winston.
            assert!(
                (29_000_000_000_000..29_030_000_000_000).contains(&reward),
                "mode {:?} gave {}",
                mode,
                reward
            );
        }
    }

    #[test]
    fn test_inflation_halves_yearly() {
        for mode in MODES {
            let start = inflation_reward(0, mode);
            let after_year = inflation_reward(BLOCKS_PER_YEAR, mode);
            assert!(relative_gap(start / 2, after_year) < 0.001, "mode {:?}", mode);
        }
    }

    #[test]
    fn test_inflation_modes_agree_closely() {
        for height in [0, 1000, BLOCKS_PER_YEAR / 2, BLOCKS_PER_YEAR * 3 + 17] {
            let exact = inflation_reward(height, NumericMode::Exact);
            let legacy = inflation_reward(height, NumericMode::LegacyFloat);
            assert!(
                relative_gap(exact, legacy) < 0.001,
                "height {}: exact {} legacy {}",
                height,
                exact,
                legacy
            );
        }
    }

    #[test]
    fn test_fee_grows_with_data_size() {
        for mode in MODES {
            let small = tx_fee(0, test_diff(), 10, TS, false, mode);
            let large = tx_fee(10 * 1024 * 1024, test_diff(), 10, TS, false, mode);
            assert!(large > small, "mode {:?}", mode);
            assert!(small > 0, "mode {:?}: base fee must be positive", mode);
        }
    }

    #[test]
    fn test_wallet_generation_fee_added() {
        for mode in MODES {
            let without = tx_fee(1024, test_diff(), 10, TS, false, mode);
            let with = tx_fee(1024, test_diff(), 10, TS, true, mode);
            assert_eq!(with - without, WALLET_GEN_FEE, "mode {:?}", mode);
        }
    }

    #[test]
    fn test_storage_cost_decays_over_time() {
        for mode in MODES {
            let now = tx_fee(1 << 20, test_diff(), 10, TS, false, mode);
            let later = tx_fee(1 << 20, test_diff(), 10, TS + 4 * SECONDS_PER_YEAR, false, mode);
            assert!(later < now, "mode {:?}", mode);
        }
    }

    #[test]
    fn test_empty_block_pool_unchanged_when_burden_zero() {
        for mode in MODES {
            let transition = reward_pool_transition(500, &[], 0, 5, test_diff(), TS, mode);
            assert_eq!(transition.new_pool, 500, "mode {:?}", mode);
            assert_eq!(
                transition.finder_reward,
                inflation_reward(5, mode),
                "mode {:?}",
                mode
            );
        }
    }

    #[test]
    fn test_fees_split_between_miner_and_pool() {
        let tx = Transaction {
            reward: 1_000,
            ..Transaction::default()
        };
        for mode in MODES {
            let transition = reward_pool_transition(0, &[tx.clone()], 0, 5, test_diff(), TS, mode);
            // 1/5 to the miner on top of inflation, 4/5 into the pool.
            assert_eq!(transition.new_pool, 800, "mode {:?}", mode);
            assert_eq!(
                transition.finder_reward,
                inflation_reward(5, mode) + 200,
                "mode {:?}",
                mode
            );
        }
    }

    #[test]
    fn test_burden_draws_down_pool() {
        // An enormous weave at minimum difficulty (cheap AR against the
        // rate anchor) forces the burden above inflation, tapping the pool.
        let weave_size = u64::MAX / 2;
        let diff = switch_to_linear_diff(21);
        for mode in MODES {
            let rich =
                reward_pool_transition(u128::MAX / 4, &[], weave_size, 5, diff, TS, mode);
            let burden = weave_storage_burden(weave_size, diff, 5, TS, mode);
            assert!(burden > inflation_reward(5, mode), "mode {:?}", mode);
            assert_eq!(rich.finder_reward, burden, "mode {:?}", mode);
            assert_eq!(
                rich.new_pool,
                u128::MAX / 4 - (burden - inflation_reward(5, mode)),
                "mode {:?}",
                mode
            );

            // An empty pool caps the draw-down at zero.
            let poor = reward_pool_transition(0, &[], weave_size, 5, diff, TS, mode);
            assert_eq!(poor.finder_reward, inflation_reward(5, mode), "mode {:?}", mode);
            assert_eq!(poor.new_pool, 0, "mode {:?}", mode);
        }
    }

    #[test]
    fn test_burden_zero_for_empty_weave() {
        for mode in MODES {
            assert_eq!(weave_storage_burden(0, test_diff(), 5, TS, mode), 0);
        }
    }
}
