//! # Integration Scenarios
//!
//! Cross-crate walks of the validation kernel: whole blocks built from
//! signed transactions, validated against materialized weave history.

pub mod fixtures;

mod chain_extension;
