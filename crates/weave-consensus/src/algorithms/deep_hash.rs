//! # Deep Hash
//!
//! Tagged recursive SHA-384 over nested blob-or-list structures. Every
//! composite hash in the protocol (block data segments, independent hashes,
//! block-index entries, format-2 signing payloads) goes through this one
//! construction, so its byte layout is consensus-critical:
//!
//! - blob `b`: `H(H("blob" ++ decimal(len(b))) ++ H(b))`
//! - list of N children: start from `acc = H("list" ++ decimal(N))`, then
//!   fold left `acc = H(acc ++ deep_hash(child))`
//!
//! The tag makes the digest structure-sensitive: a blob can never collide
//! with a list, and lists of different arity never share a prefix state.
//!
//! The tree walk uses an explicit frame stack rather than call recursion,
//! so arbitrarily long transaction or tag lists cannot exhaust the call
//! stack.

use shared_crypto::hashing::{sha384, sha384_many, Hash384};

/// A node of the structure being hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepHashChunk {
    /// A binary leaf.
    Blob(Vec<u8>),
    /// An ordered list of children.
    List(Vec<DeepHashChunk>),
}

impl DeepHashChunk {
    /// Blob from any byte source.
    pub fn blob(data: impl Into<Vec<u8>>) -> Self {
        Self::Blob(data.into())
    }

    /// Blob holding the decimal rendering of an integer.
    pub fn decimal(n: u128) -> Self {
        Self::Blob(n.to_string().into_bytes())
    }

    /// List of children.
    pub fn list(children: Vec<DeepHashChunk>) -> Self {
        Self::List(children)
    }
}

fn hash_blob(data: &[u8]) -> Hash384 {
    let tag = [b"blob" as &[u8], data.len().to_string().as_bytes()].concat();
    sha384_many(&[&sha384(&tag), &sha384(data)])
}

fn list_accumulator(len: usize) -> Hash384 {
    let tag = [b"list" as &[u8], len.to_string().as_bytes()].concat();
    sha384(&tag)
}

struct Frame<'a> {
    children: &'a [DeepHashChunk],
    next: usize,
    acc: Hash384,
}

/// Compute the deep hash of `chunk`.
///
/// Purely functional; the only failure mode is the hash primitive itself,
/// which is infallible here.
pub fn deep_hash(chunk: &DeepHashChunk) -> Hash384 {
    let children = match chunk {
        DeepHashChunk::Blob(data) => return hash_blob(data),
        DeepHashChunk::List(children) => children,
    };

    let mut stack = vec![Frame {
        children,
        next: 0,
        acc: list_accumulator(children.len()),
    }];

    loop {
        let frame = stack.last_mut().expect("stack never drains mid-walk");
        if frame.next >= frame.children.len() {
            let done = stack.pop().expect("loop entered with one frame");
            match stack.last_mut() {
                Some(parent) => parent.acc = sha384_many(&[&parent.acc, &done.acc]),
                None => return done.acc,
            }
            continue;
        }

        // Copy the slice reference out: the child borrows the input
        // structure, not the frame stack, so pushing below stays legal.
        let siblings = frame.children;
        let child = &siblings[frame.next];
        frame.next += 1;

        match child {
            DeepHashChunk::Blob(data) => {
                let digest = hash_blob(data);
                let frame = stack.last_mut().expect("frame pushed above");
                frame.acc = sha384_many(&[&frame.acc, &digest]);
            }
            DeepHashChunk::List(grandchildren) => {
                stack.push(Frame {
                    children: grandchildren,
                    next: 0,
                    acc: list_accumulator(grandchildren.len()),
                });
            }
        }
    }
}
