//! # Domain Module
//!
//! Pure validation logic: no I/O, no async, no shared mutable state.

pub mod block_hash;
pub mod block_index;
pub mod block_validation;
pub mod difficulty;
pub mod errors;
mod numeric;
pub mod poa;
pub mod pricing;
pub mod replay_pool;
pub mod tx_validation;
pub mod wallets;

pub use block_hash::{block_data_segment, block_data_segment_base, compute_tx_root, indep_hash};
pub use block_index::{compute_hash_list_merkle, find_recall_entry};
pub use block_validation::{BlockValidationOutcome, BlockValidator};
pub use difficulty::{
    calculate_difficulty, multiply_diff, next_cumulative_diff, poa_modified_diff,
    switch_to_linear_diff, validate_difficulty,
};
pub use errors::{BlockValidationError, ReplayPoolError, TxValidationError};
pub use poa::validate_poa;
pub use pricing::{inflation_reward, reward_pool_transition, tx_fee, RewardPoolTransition};
pub use replay_pool::validate_block_txs;
pub use tx_validation::{signature_data, verify_tx};
pub use wallets::WalletLedger;
