//! # Protocol Constants
//!
//! The numeric contract of the weave. Independent nodes only converge on
//! identical accept/reject decisions if every value here matches the
//! historical chain exactly, so these are configuration data, not tunables.

use primitive_types::U512;

// =============================================================================
// DIFFICULTY & RETARGETING
// =============================================================================

/// Blocks between difficulty retargets.
pub const RETARGET_INTERVAL: u64 = 10;

/// Target seconds per block.
pub const TARGET_TIME: u64 = 120;

/// Retarget tolerance band as an exact fraction: the difficulty is left
/// unchanged when `|1 - actual/target| < 1/10`.
pub const RETARGET_TOLERANCE_NUM: u64 = 1;
/// Denominator of the retarget tolerance fraction.
pub const RETARGET_TOLERANCE_DEN: u64 = 10;

/// Upper clamp on how much faster than schedule a retarget window may look:
/// the time ratio is floored at `1 / DIFF_ADJUSTMENT_UP_LIMIT`.
pub const DIFF_ADJUSTMENT_UP_LIMIT: u64 = 4;

/// Lower clamp on how much slower than schedule a retarget window may look:
/// the time ratio is capped at `DIFF_ADJUSTMENT_DOWN_LIMIT`.
pub const DIFF_ADJUSTMENT_DOWN_LIMIT: u64 = 2;

/// Minimum difficulty, in the legacy leading-zero representation.
pub const MIN_DIFF_LEADING_ZEROS: u32 = 21;

/// `2^256`: the exclusive ceiling of the linear difficulty space. A PoW
/// digest read as a big-endian integer must exceed the block difficulty,
/// which asymptotically approaches this value.
pub fn max_diff() -> U512 {
    U512::one() << 256
}

/// Minimum linear difficulty: `2^256 - 2^(256 - MIN_DIFF_LEADING_ZEROS)`.
pub fn min_diff() -> U512 {
    max_diff() - (U512::one() << (256 - MIN_DIFF_LEADING_ZEROS as usize))
}

// =============================================================================
// BLOCK & TRANSACTION LIMITS
// =============================================================================

/// Maximum transactions per block.
pub const BLOCK_TX_COUNT_LIMIT: usize = 1000;

/// Maximum cumulative format-1 data bytes per block.
pub const BLOCK_TX_DATA_SIZE_LIMIT: u64 = 10 * 1024 * 1024;

/// Maximum inline data bytes of a single format-1 transaction.
pub const TX_DATA_SIZE_LIMIT: u64 = 10 * 1024 * 1024;

/// Validation window around the previous height for incoming blocks.
pub const STORE_BLOCKS_BEHIND_CURRENT: u64 = 50;

/// Maximum transaction id length in bytes.
pub const MAX_TX_ID_SIZE: usize = 32;
/// Maximum replay-anchor length in bytes (a block id is 48 bytes).
pub const MAX_TX_ANCHOR_SIZE: usize = 48;
/// Maximum owner modulus length in bytes (4096-bit RSA).
pub const MAX_OWNER_SIZE: usize = 512;
/// Maximum total tag bytes per transaction.
pub const MAX_TAGS_SIZE: usize = 2048;
/// Maximum target field length in bytes.
pub const MAX_TARGET_SIZE: usize = 43;
/// Maximum decimal-string length of quantity and reward.
pub const MAX_AMOUNT_STRING_LEN: usize = 21;
/// Maximum signature length in bytes (4096-bit RSA).
pub const MAX_SIG_SIZE: usize = 512;
/// Maximum data-root length in bytes.
pub const MAX_DATA_ROOT_SIZE: usize = 32;
/// Maximum mining-nonce length in bytes.
pub const MAX_NONCE_SIZE: usize = 512;
/// Maximum decimal-string length of the linear difficulty (`2^256` has 78
/// digits).
pub const MAX_DIFF_STRING_LEN: usize = 78;

// =============================================================================
// PROOF OF ACCESS
// =============================================================================

/// Maximum allowed PoA recall option.
pub const MAX_POA_OPTION_DEPTH: u64 = 32;

/// Difficulty multiplier applied per recall option beyond the first.
pub const POA_ALTERNATIVE_DIFF_MULTIPLIER: u64 = 2;

/// Chunk size the weave is divided into, in bytes.
pub const CHUNK_SIZE: usize = 256 * 1024;

/// Maximum Merkle path length in bytes.
pub const MAX_PATH_SIZE: usize = 64 * 1024;

// =============================================================================
// ECONOMY
// =============================================================================

/// Winston per AR token.
pub const WINSTON_PER_AR: u128 = 1_000_000_000_000;

/// Tokens minted at genesis, in AR.
pub const GENESIS_TOKENS: u128 = 55_000_000;

/// Blocks per year at the target block time; also the inflation half-life.
pub const BLOCKS_PER_YEAR: u64 = 262_800;

/// Fee charged when a transfer creates a previously unseen wallet, in
/// winston.
pub const WALLET_GEN_FEE: u128 = 250_000_000_000;

/// The miner keeps `reward / MINER_FEE_SHARE_DIVISOR` of each transaction
/// fee; the remainder accrues to the endowment pool.
pub const MINER_FEE_SHARE_DIVISOR: u128 = 5;

/// Historical USD cost of storing one gigabyte for one year, 2018 anchor.
pub const USD_PER_GBY_2018: f64 = 0.001_045;

/// Historical USD cost of storing one gigabyte for one year, 2019 anchor.
pub const USD_PER_GBY_2019: f64 = 0.000_925;

/// Annual decay of the USD/GB-year storage cost.
pub const USD_PER_GBY_DECAY_ANNUAL: f64 = 0.995;

/// Unix timestamp of the 2019 storage-cost anchor (2019-01-01T00:00:00Z).
pub const USD_PER_GBY_ANCHOR_TIMESTAMP: u64 = 1_546_300_800;

/// Seconds per (non-leap) year, used by the storage-cost decay curve.
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// USD per AR at the difficulty the exchange-rate curve is anchored to.
pub const INITIAL_USD_PER_AR: f64 = 1.5;

/// Leading-zero difficulty the USD/AR exchange rate is anchored to.
pub const INITIAL_USD_TO_AR_DIFF_LEADING_ZEROS: u32 = 28;

/// Height the USD/AR exchange rate is anchored to.
pub const INITIAL_USD_TO_AR_HEIGHT: u64 = 0;

/// Fixed byte overhead charged per transaction on top of its data size.
pub const TX_SIZE_BASE: u64 = 3210;
