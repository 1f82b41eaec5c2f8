//! Consensus configuration.
//!
//! Everything here parameterizes *how* the kernel computes, never *what* the
//! protocol means: the consensus constants themselves live in
//! `shared_types::constants`.

use serde::{Deserialize, Serialize};
use shared_types::constants::STORE_BLOCKS_BEHIND_CURRENT;

/// Arithmetic mode for consensus-critical numeric formulas.
///
/// The historical chain computed difficulty retargets, storage fees and the
/// inflation curve with finite-precision floating arithmetic. Validating
/// that history bit-for-bit requires reproducing those roundings, so the
/// legacy behavior is a first-class mode rather than an accident. The two
/// modes are never mixed within one validation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericMode {
    /// Exact integer/fixed-point arithmetic.
    Exact,
    /// IEEE-754 double arithmetic matching the historical chain.
    LegacyFloat,
}

/// Configuration for block validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusConfig {
    /// Numeric mode for retarget, fee and inflation formulas.
    pub numeric_mode: NumericMode,
    /// How far a candidate height may sit from the previous height before
    /// it is rejected outright as stale or premature.
    pub height_validation_window: u64,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            numeric_mode: NumericMode::LegacyFloat,
            height_validation_window: STORE_BLOCKS_BEHIND_CURRENT,
        }
    }
}
