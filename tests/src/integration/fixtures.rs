//! # Shared Weave Builders
//!
//! Materialized weave history (blocks, chunk trees, proofs) and a
//! next-block builder, so scenarios construct honestly-mined blocks and
//! then break exactly one thing.

use std::sync::OnceLock;

use shared_crypto::{sha256, RsaKeyPair};
use shared_types::constants::CHUNK_SIZE;
use shared_types::{
    Address, Block, BlockIndex, BlockIndexEntry, Poa, Transaction, H256, H384,
};
use weave_consensus::algorithms::merkle::{generate_path, generate_tree, MerkleNode};
use weave_consensus::domain::block_hash::{
    block_data_segment, compute_tx_root, indep_hash_from_segment,
};
use weave_consensus::domain::block_index::compute_hash_list_merkle;
use weave_consensus::domain::difficulty::{
    calculate_difficulty, next_cumulative_diff, switch_to_linear_diff,
};
use weave_consensus::domain::poa::recall_byte;
use weave_consensus::domain::pricing::reward_pool_transition;
use weave_consensus::domain::tx_validation::signature_data;
use weave_consensus::ports::PowHasher;
use weave_consensus::NumericMode;

/// Digest every fixture block claims as its PoW hash.
pub const MAX_DIGEST: H256 = [0xFF; 32];

/// Retarget interval mirrored from the protocol constants.
pub const RETARGET_INTERVAL: u64 = shared_types::constants::RETARGET_INTERVAL;

/// PoW stub yielding the fixed maximal digest: fixtures "mine" at real
/// difficulty without grinding nonces.
pub struct MaxPowHasher;

impl PowHasher for MaxPowHasher {
    fn hash(&self, _height: u64, _input: &[u8]) -> H256 {
        MAX_DIGEST
    }
}

/// First funded identity, generated once per test process.
pub fn alice() -> &'static RsaKeyPair {
    static KEYPAIR: OnceLock<RsaKeyPair> = OnceLock::new();
    KEYPAIR.get_or_init(|| RsaKeyPair::generate().unwrap())
}

/// Second funded identity.
pub fn bob() -> &'static RsaKeyPair {
    static KEYPAIR: OnceLock<RsaKeyPair> = OnceLock::new();
    KEYPAIR.get_or_init(|| RsaKeyPair::generate().unwrap())
}

/// Install the test log subscriber, once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Sign and id-stamp a transaction.
pub fn seal(keypair: &RsaKeyPair, mut tx: Transaction) -> Transaction {
    tx.owner = keypair.public_modulus();
    tx.signature = keypair.sign(&signature_data(&tx));
    tx.id = sha256(&tx.signature);
    tx
}

/// The working difficulty of every fixture chain.
pub fn fixture_diff() -> shared_types::U512 {
    switch_to_linear_diff(30)
}

/// One materialized block of weave history: enough to prove access to any
/// byte it owns.
struct HistoryBlock {
    entry_tx_root: H256,
    block_hash: H384,
    /// Cumulative weave size through this block.
    cumulative: u64,
    /// Weave offset where this block's data begins.
    base: u64,
    tx_tree: Option<MerkleNode>,
    chunk_tree: Option<MerkleNode>,
    data: Vec<u8>,
}

/// Materialized weave history, oldest first.
#[derive(Default)]
pub struct WeaveHistory {
    blocks: Vec<HistoryBlock>,
}

impl WeaveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total weave size.
    pub fn weave_size(&self) -> u64 {
        self.blocks.last().map(|block| block.cumulative).unwrap_or(0)
    }

    /// Append a block holding one inline-data transaction.
    pub fn push_data_block(&mut self, data: Vec<u8>, block_hash: H384) {
        let base = self.weave_size();
        let size = data.len() as u64;

        let mut chunk_leaves = Vec::new();
        let mut offset = 0u64;
        for chunk in data.chunks(CHUNK_SIZE) {
            offset += chunk.len() as u64;
            chunk_leaves.push((sha256(chunk).to_vec(), offset));
        }
        let chunk_tree = generate_tree(&chunk_leaves).expect("data block holds bytes");
        let tx_tree =
            generate_tree(&[(chunk_tree.id().to_vec(), size)]).expect("one tx leaf");

        self.blocks.push(HistoryBlock {
            entry_tx_root: tx_tree.id(),
            block_hash,
            cumulative: base + size,
            base,
            tx_tree: Some(tx_tree),
            chunk_tree: Some(chunk_tree),
            data,
        });
    }

    /// Append a block that added no weave data.
    pub fn push_empty_block(&mut self, tx_root: H256, block_hash: H384) {
        let base = self.weave_size();
        self.blocks.push(HistoryBlock {
            entry_tx_root: tx_root,
            block_hash,
            cumulative: base,
            base,
            tx_tree: None,
            chunk_tree: None,
            data: Vec::new(),
        });
    }

    /// The newest-first block index over this history.
    pub fn block_index(&self) -> BlockIndex {
        self.blocks
            .iter()
            .rev()
            .map(|block| BlockIndexEntry {
                tx_root: block.entry_tx_root,
                weave_size: block.cumulative,
                block_hash: block.block_hash,
            })
            .collect()
    }

    /// An honest proof of access for the recall byte seeded by
    /// `prev_indep_hash`.
    pub fn build_poa(&self, prev_indep_hash: &H384, option: u64) -> Poa {
        let weave_size = self.weave_size();
        if weave_size == 0 {
            return Poa::default();
        }
        let recall = recall_byte(prev_indep_hash, option, weave_size);
        let owner = self
            .blocks
            .iter()
            .find(|block| recall >= block.base && recall < block.cumulative)
            .expect("recall byte owned by some data block");
        let tx_tree = owner.tx_tree.as_ref().expect("owning block has data");
        let chunk_tree = owner.chunk_tree.as_ref().expect("owning block has data");

        let block_offset = recall - owner.base;
        let chunk_index = block_offset as usize / CHUNK_SIZE;
        let chunk_start = chunk_index * CHUNK_SIZE;
        let chunk_end = (chunk_start + CHUNK_SIZE).min(owner.data.len());

        Poa {
            option,
            tx_path: generate_path(tx_tree, block_offset),
            data_path: generate_path(chunk_tree, block_offset),
            chunk: owner.data[chunk_start..chunk_end].to_vec(),
        }
    }
}

/// Build an honestly-assembled next block: every derived field computed
/// the way the validator recomputes it.
pub fn build_next_block(
    prev: &Block,
    history: &WeaveHistory,
    txs: Vec<Transaction>,
    reward_addr: Option<Address>,
    timestamp: u64,
    mode: NumericMode,
) -> Block {
    assert_eq!(
        history.weave_size(),
        prev.weave_size,
        "history must be consistent with the previous block"
    );
    let height = prev.height + 1;

    let (diff, last_retarget) = if height % RETARGET_INTERVAL == 0 {
        (
            calculate_difficulty(prev.diff, timestamp, prev.last_retarget, height, mode),
            timestamp,
        )
    } else {
        (prev.diff, prev.last_retarget)
    };

    let appended: u64 = txs.iter().map(|tx| tx.data_size).sum();
    let weave_size = prev.weave_size + appended;

    let transition = reward_pool_transition(
        prev.reward_pool,
        &txs,
        weave_size,
        height,
        diff,
        timestamp,
        mode,
    );

    let mut block = Block {
        height,
        previous_block: prev.indep_hash,
        timestamp,
        last_retarget,
        diff,
        diff_string: diff.to_string(),
        hash: MAX_DIGEST,
        nonce: b"fixture-nonce".to_vec(),
        tx_root: compute_tx_root(&txs),
        txs,
        wallet_list: [4u8; 48],
        reward_addr,
        reward_pool: transition.new_pool,
        weave_size,
        block_size: appended,
        cumulative_diff: next_cumulative_diff(prev.cumulative_diff, diff),
        hash_list_merkle: compute_hash_list_merkle(prev),
        poa: history.build_poa(&prev.indep_hash, 1),
        ..Block::default()
    };
    let bds = block_data_segment(&block);
    block.indep_hash = indep_hash_from_segment(&bds, &block);
    block
}
