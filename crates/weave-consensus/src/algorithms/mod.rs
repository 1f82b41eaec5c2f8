//! # Algorithms Module
//!
//! Deterministic hashing primitives the domain layer is built on: the
//! tagged recursive deep hash, the unbalanced size-tagged Merkle engine,
//! and the format-1 chunk tree.

pub mod chunks;
pub mod deep_hash;
pub mod merkle;

pub use chunks::v1_data_root;
pub use deep_hash::{deep_hash, DeepHashChunk};
pub use merkle::{generate_path, generate_tree, validate_path, MerkleNode, PathResult};
