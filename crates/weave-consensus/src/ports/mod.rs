//! # Ports Module
//!
//! The kernel's single external seam: the proof-of-work hash primitive.

use shared_types::H256;

/// The external proof-of-work hash oracle.
///
/// Implementations wrap whatever (possibly native, memory-hard) primitive
/// the network runs; the kernel treats it as an opaque pure function of
/// `(height, input)`. Retries, timeouts and backoff for flaky native
/// bindings belong to the adapter, never to validation.
pub trait PowHasher: Send + Sync {
    /// Hash `input` under the rules active at `height`.
    fn hash(&self, height: u64, input: &[u8]) -> H256;
}
