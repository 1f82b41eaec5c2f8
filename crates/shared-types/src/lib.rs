//! # Shared Types Crate
//!
//! This crate contains the weave domain entities and the protocol constants
//! every other crate validates against.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Logically immutable inputs**: entities arriving at the validation
//!   kernel are caller-owned snapshots; nothing in this crate mutates them.
//! - **Consensus constants are a contract**: the values in [`constants`]
//!   must match the historical chain exactly and are never derived.

pub mod constants;
pub mod entities;

pub use entities::*;
