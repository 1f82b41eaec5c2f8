//! # Wallet Ledger
//!
//! The address-keyed balance/anchor map and its transition rules. The
//! caller's snapshot is frozen for the duration of a validation call;
//! every mutation path starts from [`WalletLedger::clone_for_mutation`].

use std::collections::HashMap;

use shared_crypto::owner_address;
use shared_types::{Address, Block, Transaction, WalletEntry};

use super::pricing::{reward_pool_transition, RewardPoolTransition};
use crate::config::NumericMode;

/// An address-keyed map of wallet balances and replay anchors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletLedger {
    entries: HashMap<Address, WalletEntry>,
}

impl WalletLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from `(address, balance, last_tx)` rows.
    pub fn from_entries(rows: impl IntoIterator<Item = (Address, u128, Vec<u8>)>) -> Self {
        let entries = rows
            .into_iter()
            .map(|(address, balance, last_tx)| (address, WalletEntry { balance, last_tx }))
            .collect();
        Self { entries }
    }

    /// Look up a wallet.
    pub fn get(&self, address: &Address) -> Option<&WalletEntry> {
        self.entries.get(address)
    }

    /// True when `address` has an entry.
    pub fn contains(&self, address: &Address) -> bool {
        self.entries.contains_key(address)
    }

    /// Number of wallets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no wallets exist.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace a wallet entry.
    pub fn insert(&mut self, address: Address, entry: WalletEntry) {
        self.entries.insert(address, entry);
    }

    /// The explicit clone-before-mutate contract: callers hand the kernel a
    /// frozen snapshot, and simulation always runs on a clone obtained
    /// here, never on the snapshot itself.
    pub fn clone_for_mutation(&self) -> Self {
        self.clone()
    }

    /// A wallet is invalid when it is absent, or sits at zero balance
    /// without ever having spent (economically nonexistent).
    pub fn is_wallet_invalid(&self, address: &Address) -> bool {
        match self.entries.get(address) {
            Some(entry) => entry.balance == 0 && entry.never_spent(),
            None => true,
        }
    }

    /// Apply one transaction's effects.
    ///
    /// The effect is applied only when the sender address already exists;
    /// unknown senders are silently skipped here, their validity having
    /// been enforced upstream by transaction validation and the replay
    /// pass. On application the sender is debited the transferred quantity
    /// (the fee is accounted through the reward-pool transition, not the
    /// wallet debit) and its anchor advances to the transaction id; a
    /// positive quantity credits the target, creating it with an empty
    /// anchor if absent.
    pub fn apply_tx(&mut self, tx: &Transaction) {
        let sender = owner_address(&tx.owner);
        let Some(entry) = self.entries.get_mut(&sender) else {
            return;
        };
        entry.balance = entry.balance.saturating_sub(tx.quantity);
        entry.last_tx = tx.id.to_vec();

        if tx.quantity > 0 {
            if let Ok(target) = Address::try_from(tx.target.as_slice()) {
                self.entries.entry(target).or_default().balance += tx.quantity;
            }
        }
    }

    /// Credit the mining reward, creating the wallet if needed. A block
    /// with no reward address burns the reward.
    pub fn apply_mining_reward(&mut self, reward_addr: Option<Address>, amount: u128) {
        if let Some(address) = reward_addr {
            self.entries.entry(address).or_default().balance += amount;
        }
    }

    /// The full per-block ledger transition: compute the reward-pool
    /// transition, apply every transaction in block order, then credit the
    /// mining reward. Returns the transition so the caller can check the
    /// block's claimed pool.
    pub fn update_wallets_with_block_txs(
        &mut self,
        block: &Block,
        prev_reward_pool: u128,
        mode: NumericMode,
    ) -> RewardPoolTransition {
        let transition = reward_pool_transition(
            prev_reward_pool,
            &block.txs,
            block.weave_size,
            block.height,
            block.diff,
            block.timestamp,
            mode,
        );
        for tx in &block.txs {
            self.apply_tx(tx);
        }
        self.apply_mining_reward(block.reward_addr, transition.finder_reward);
        transition
    }
}
