//! # weave-consensus
//!
//! Block-validation kernel for Weave-Chain.
//!
//! ## Architecture
//!
//! This crate decides whether a candidate block extends the canonical chain.
//! Validation is fully deterministic: independent nodes reach identical
//! accept/reject decisions from identical inputs.
//!
//! ```text
//! BlockValidator ──→ ProofOfAccess ──→ MerkleEngine
//!        │──→ DifficultyRetarget
//!        │──→ WalletLedger ←── ReplayPool ──→ TxValidator
//!        │──→ MerkleEngine (tx root, block-index root)
//!        └──→ PowHasher (external oracle, last gate)
//! ```
//!
//! All domain logic is pure and synchronous. The single external seam is
//! the proof-of-work hash primitive, consumed through [`ports::PowHasher`];
//! everything expensive is gated behind the cheap structural checks.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use weave_consensus::{BlockValidator, ConsensusConfig};
//!
//! let validator = BlockValidator::new(ConsensusConfig::default());
//! let outcome = validator.validate_block(
//!     &block,
//!     &prev_block,
//!     &block_index,
//!     &wallets,
//!     &block_txs_pairs,
//!     &pow,
//! );
//! ```
//!
//! ## Contract
//!
//! Caller-supplied snapshots (wallet ledger, block index, anchor window) are
//! never mutated in place; the kernel clones before simulating. Rejections
//! are values, not errors: every gate failure maps to a tagged reason.

#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod config;
pub mod domain;
pub mod ports;

// Re-export main types
pub use config::{ConsensusConfig, NumericMode};
pub use domain::{
    BlockValidationError, BlockValidationOutcome, BlockValidator, ReplayPoolError,
    TxValidationError, WalletLedger,
};
pub use ports::PowHasher;
