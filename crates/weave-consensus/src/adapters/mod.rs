//! # Adapters Module
//!
//! Reference implementations of the kernel's ports.

use shared_crypto::hashing::sha256_many;
use shared_types::H256;

use crate::ports::PowHasher;

/// Reference PoW adapter: a plain SHA-256 over the height and input.
///
/// Stands in for the production memory-hard primitive in tests and
/// simulations; it exercises the full digest-versus-difficulty comparison
/// path without the native dependency.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256PowHasher;

impl PowHasher for Sha256PowHasher {
    fn hash(&self, height: u64, input: &[u8]) -> H256 {
        sha256_many(&[&height.to_be_bytes(), input])
    }
}
