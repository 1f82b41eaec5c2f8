//! # Core Domain Entities
//!
//! Defines the weave entities exchanged between the validation kernel and
//! its callers.
//!
//! ## Clusters
//!
//! - **Chain**: `Block`, `Transaction`, `Tag`
//! - **Proof of Access**: `Poa`, `BlockIndexEntry`
//! - **Ledger**: `WalletEntry`, `BlockTxsPairs`
//!
//! All entities are logically immutable inputs to a validation call. The
//! kernel clones what it needs to mutate and never writes through a caller's
//! reference.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};

// Re-export the big unsigned integers used for difficulty arithmetic.
pub use primitive_types::{U256, U512};

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// A 32-byte SHA-256 digest (transaction ids, Merkle node ids, PoW hashes).
pub type H256 = [u8; 32];

/// A 48-byte SHA-384 digest (independent hashes, deep hashes, wallet lists).
pub type H384 = [u8; 48];

/// A wallet address: the SHA-256 digest of the owner public modulus.
pub type Address = [u8; 32];

/// A name/value metadata pair attached to a transaction or block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Tag {
    /// Tag name bytes.
    pub name: Vec<u8>,
    /// Tag value bytes.
    pub value: Vec<u8>,
}

impl Tag {
    /// Create a tag from string slices.
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.as_bytes().to_vec(),
            value: value.as_bytes().to_vec(),
        }
    }

    /// Total byte length counted against the per-transaction tag budget.
    pub fn byte_len(&self) -> usize {
        self.name.len() + self.value.len()
    }
}

/// A weave transaction.
///
/// Two wire formats coexist: format 1 carries its payload inline in `data`;
/// format 2 commits to an externally-stored payload through `data_root`.
/// Either format may additionally transfer `quantity` winston to `target`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Transaction {
    /// Transaction format (1 or 2).
    pub format: u32,
    /// Transaction id: the SHA-256 digest of `signature`.
    pub id: H256,
    /// Replay anchor: the sender's previous transaction id, or the
    /// independent hash of a recent block. Empty = no anchor yet.
    pub last_tx: Vec<u8>,
    /// Owner public key, as the raw big-endian RSA modulus.
    pub owner: Vec<u8>,
    /// Metadata tags.
    pub tags: Vec<Tag>,
    /// Transfer target address bytes; empty = no transfer.
    pub target: Vec<u8>,
    /// Transferred amount in winston.
    pub quantity: u128,
    /// Inline payload (format 1 only; empty for format 2).
    pub data: Vec<u8>,
    /// Payload size in bytes (both formats).
    pub data_size: u64,
    /// Merkle root of the payload chunk tree (format 2; empty when
    /// `data_size == 0`).
    pub data_root: Vec<u8>,
    /// RSA-PSS signature over the format-specific signing payload.
    pub signature: Vec<u8>,
    /// Transaction fee in winston.
    pub reward: u128,
}

impl Transaction {
    /// True when this transaction moves winston to a target wallet.
    pub fn is_transfer(&self) -> bool {
        !self.target.is_empty() && self.quantity > 0
    }
}

/// A candidate block, immutable once constructed.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Block height; the genesis block is height 0.
    pub height: u64,
    /// Independent hash of the previous block.
    #[serde_as(as = "Bytes")]
    pub previous_block: H384,
    /// Unix timestamp (seconds) when the block was produced.
    pub timestamp: u64,
    /// Unix timestamp of the most recent difficulty retarget.
    pub last_retarget: u64,
    /// Difficulty as a linear threshold: a PoW digest, read as a big-endian
    /// unsigned integer, must exceed this value.
    pub diff: U512,
    /// The canonical decimal rendering of `diff`. Hashing uses this string
    /// verbatim, so it is carried alongside the numeric form.
    pub diff_string: String,
    /// Independent hash: the deep hash identifying this block.
    #[serde_as(as = "Bytes")]
    pub indep_hash: H384,
    /// Proof-of-work digest of the nonce and block data segment.
    pub hash: H256,
    /// Mining nonce.
    pub nonce: Vec<u8>,
    /// Resolved transactions, in block order.
    pub txs: Vec<Transaction>,
    /// Merkle root over the size-tagged transaction list.
    pub tx_root: H256,
    /// Hash of the wallet list this block commits to.
    #[serde_as(as = "Bytes")]
    pub wallet_list: H384,
    /// Address collecting the mining reward; `None` leaves it unclaimed.
    pub reward_addr: Option<Address>,
    /// Block-level metadata tags.
    pub tags: Vec<Tag>,
    /// Endowment pool balance after this block, in winston.
    pub reward_pool: u128,
    /// Total weave size in bytes after this block.
    pub weave_size: u64,
    /// Bytes this block appends to the weave.
    pub block_size: u64,
    /// Cumulative chain difficulty including this block.
    pub cumulative_diff: U512,
    /// Unbalanced Merkle root over the block index up to the previous block.
    #[serde_as(as = "Bytes")]
    pub hash_list_merkle: H384,
    /// Proof of access to a recall byte of weave history.
    pub poa: Poa,
}

impl Block {
    /// Transaction ids in block order.
    pub fn tx_ids(&self) -> Vec<H256> {
        self.txs.iter().map(|tx| tx.id).collect()
    }
}

impl Default for Block {
    fn default() -> Self {
        Self {
            height: 0,
            previous_block: [0u8; 48],
            timestamp: 0,
            last_retarget: 0,
            diff: U512::zero(),
            diff_string: "0".to_string(),
            indep_hash: [0u8; 48],
            hash: [0u8; 32],
            nonce: Vec::new(),
            txs: Vec::new(),
            tx_root: [0u8; 32],
            wallet_list: [0u8; 48],
            reward_addr: None,
            tags: Vec::new(),
            reward_pool: 0,
            weave_size: 0,
            block_size: 0,
            cumulative_diff: U512::zero(),
            hash_list_merkle: [0u8; 48],
            poa: Poa::default(),
        }
    }
}

// =============================================================================
// CLUSTER B: PROOF OF ACCESS
// =============================================================================

/// Proof of access to one pseudo-randomly chosen byte of weave history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poa {
    /// Recall-byte option. Option 1 is the canonical recall byte; higher
    /// options re-hash the seed and carry a difficulty penalty.
    pub option: u64,
    /// Merkle path from the challenge block's transaction root down to one
    /// transaction's data root.
    pub tx_path: Vec<u8>,
    /// Merkle path from that data root down to the chunk owning the recall
    /// byte.
    pub data_path: Vec<u8>,
    /// The chunk itself.
    pub chunk: Vec<u8>,
}

impl Default for Poa {
    fn default() -> Self {
        Self {
            option: 1,
            tx_path: Vec::new(),
            data_path: Vec::new(),
            chunk: Vec::new(),
        }
    }
}

/// One entry of the append-only chain summary, newest first.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockIndexEntry {
    /// Transaction root of the summarized block.
    pub tx_root: H256,
    /// Cumulative weave size up to and including the summarized block.
    pub weave_size: u64,
    /// Independent hash of the summarized block.
    #[serde_as(as = "Bytes")]
    pub block_hash: H384,
}

/// The block index: newest-first chain summary used for PoA challenge-block
/// lookup and the block-index Merkle root.
pub type BlockIndex = Vec<BlockIndexEntry>;

// =============================================================================
// CLUSTER C: LEDGER
// =============================================================================

/// Balance and replay anchor of one wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WalletEntry {
    /// Balance in winston.
    pub balance: u128,
    /// Id of the wallet's most recent outgoing transaction; empty = the
    /// wallet has never spent.
    pub last_tx: Vec<u8>,
}

impl WalletEntry {
    /// True when this wallet has never signed an outgoing transaction.
    pub fn never_spent(&self) -> bool {
        self.last_tx.is_empty()
    }
}

/// Sliding anchor window: recent block id -> ids of the transactions that
/// block contains. Supplied fresh by the caller on every validation call.
pub type BlockTxsPairs = HashMap<Vec<u8>, Vec<H256>>;
