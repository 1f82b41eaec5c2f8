//! # Weave-Chain Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Cross-crate validation scenarios
//!     ├── chain_extension.rs   # Multi-block accept/reject walks
//!     └── fixtures.rs          # Shared weave builders
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p weave-tests
//!
//! # By category
//! cargo test -p weave-tests integration::
//! ```

#[cfg(test)]
pub mod integration;
