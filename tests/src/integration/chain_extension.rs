//! # Chain-Extension Scenarios
//!
//! Full blocks of signed transactions validated against materialized weave
//! history, across multiple heights: the accept path, the retarget
//! boundary, cross-block replay, and wallet creation.

#[cfg(test)]
mod tests {
    use shared_types::{Block, BlockTxsPairs, Transaction, U512};
    use weave_consensus::domain::block_hash::{block_data_segment, indep_hash_from_segment};
    use weave_consensus::domain::pricing::tx_fee;
    use weave_consensus::domain::tx_validation::verify_tx;
    use weave_consensus::domain::wallets::WalletLedger;
    use weave_consensus::{BlockValidationError, BlockValidator, NumericMode};

    use crate::integration::fixtures::{
        alice, bob, build_next_block, fixture_diff, init_tracing, seal, MaxPowHasher,
        WeaveHistory,
    };

    const TS: u64 = 1_559_347_200;
    const MODE: NumericMode = NumericMode::LegacyFloat;

    /// A height-14 chain tip over a single 4000-byte data block.
    fn bootstrap(height: u64) -> (Block, WeaveHistory, WalletLedger) {
        init_tracing();
        let mut history = WeaveHistory::new();
        let genesis_data: Vec<u8> = (0..4000u32).map(|i| (i % 241) as u8).collect();
        history.push_data_block(genesis_data, [1u8; 48]);

        let prev = Block {
            height,
            indep_hash: [7u8; 48],
            weave_size: history.weave_size(),
            tx_root: history.block_index()[0].tx_root,
            diff: fixture_diff(),
            diff_string: fixture_diff().to_string(),
            last_retarget: TS - 600,
            cumulative_diff: U512::from(1_000u64),
            hash_list_merkle: [3u8; 48],
            reward_pool: 1_000_000,
            ..Block::default()
        };

        let wallets = WalletLedger::from_entries([
            (
                alice().address(),
                10_000_000_000_000_000,
                b"ALICE-ANCHOR".to_vec(),
            ),
            (
                bob().address(),
                10_000_000_000_000_000,
                b"BOB-ANCHOR".to_vec(),
            ),
        ]);
        (prev, history, wallets)
    }

    fn fee(data_size: u64, height: u64, creates_wallet: bool) -> u128 {
        tx_fee(data_size, fixture_diff(), height, TS, creates_wallet, MODE)
    }

    #[test]
    fn test_two_block_extension_accepted() {
        let (prev, mut history, wallets) = bootstrap(14);
        let validator = BlockValidator::with_defaults();

        // Block A: alice appends 3000 bytes of inline data.
        let data: Vec<u8> = (0..3000u32).map(|i| (i % 199) as u8).collect();
        let tx_a = seal(
            alice(),
            Transaction {
                format: 1,
                data_size: data.len() as u64,
                data: data.clone(),
                last_tx: b"ALICE-ANCHOR".to_vec(),
                reward: fee(3000, 15, false),
                ..Transaction::default()
            },
        );
        let block_a = build_next_block(
            &prev,
            &history,
            vec![tx_a.clone()],
            Some([9u8; 32]),
            TS,
            MODE,
        );
        assert_eq!(
            validator.validate_block(
                &block_a,
                &prev,
                &history.block_index(),
                &wallets,
                &BlockTxsPairs::new(),
                &MaxPowHasher,
            ),
            Ok(())
        );

        // Advance: ledger transition plus weave growth.
        let mut wallets_after = wallets.clone_for_mutation();
        wallets_after.update_wallets_with_block_txs(&block_a, prev.reward_pool, MODE);
        history.push_data_block(data, block_a.indep_hash);
        assert_eq!(history.block_index()[0].tx_root, block_a.tx_root);
        assert_eq!(history.weave_size(), block_a.weave_size);

        // Block B: bob anchors on block A itself.
        let tx_b = seal(
            bob(),
            Transaction {
                format: 2,
                last_tx: block_a.indep_hash.to_vec(),
                reward: fee(0, 16, false),
                ..Transaction::default()
            },
        );
        let block_b = build_next_block(&block_a, &history, vec![tx_b], None, TS + 120, MODE);

        let mut pairs = BlockTxsPairs::new();
        pairs.insert(block_a.indep_hash.to_vec(), vec![tx_a.id]);

        assert_eq!(
            validator.validate_block(
                &block_b,
                &block_a,
                &history.block_index(),
                &wallets_after,
                &pairs,
                &MaxPowHasher,
            ),
            Ok(())
        );
    }

    #[test]
    fn test_replay_across_blocks_rejected() {
        let (prev, history, wallets) = bootstrap(14);
        let validator = BlockValidator::with_defaults();

        let recent_block_id = b"RECENT-BLOCK-ID".to_vec();
        let tx = seal(
            alice(),
            Transaction {
                format: 2,
                last_tx: recent_block_id.clone(),
                reward: fee(0, 15, false),
                ..Transaction::default()
            },
        );
        let block = build_next_block(&prev, &history, vec![tx.clone()], None, TS, MODE);

        // The anchor window already lists this id as mined.
        let mut pairs = BlockTxsPairs::new();
        pairs.insert(recent_block_id, vec![tx.id]);

        let result = validator.validate_block(
            &block,
            &prev,
            &history.block_index(),
            &wallets,
            &pairs,
            &MaxPowHasher,
        );
        assert!(matches!(
            result,
            Err(BlockValidationError::Replay(
                weave_consensus::ReplayPoolError::TxAlreadyMined(_)
            ))
        ));
    }

    #[test]
    fn test_retarget_boundary_block() {
        let (prev, history, wallets) = bootstrap(19);
        let validator = BlockValidator::with_defaults();

        // Height 20 is a retarget height; 600 seconds for 10 blocks is
        // fast, so the recomputed difficulty rises.
        let block = build_next_block(&prev, &history, Vec::new(), None, TS, MODE);
        assert_eq!(block.height, 20);
        assert!(block.diff > prev.diff);
        assert_eq!(block.last_retarget, block.timestamp);

        assert_eq!(
            validator.validate_block(
                &block,
                &prev,
                &history.block_index(),
                &wallets,
                &BlockTxsPairs::new(),
                &MaxPowHasher,
            ),
            Ok(())
        );

        // Carrying the old difficulty across the boundary is rejected.
        let mut stale = block.clone();
        stale.diff = prev.diff;
        stale.diff_string = prev.diff_string.clone();
        let result = validator.validate_block(
            &stale,
            &prev,
            &history.block_index(),
            &wallets,
            &BlockTxsPairs::new(),
            &MaxPowHasher,
        );
        assert_eq!(result, Err(BlockValidationError::InvalidDifficulty));
    }

    #[test]
    fn test_transfer_block_creates_wallet() {
        let (prev, history, wallets) = bootstrap(14);
        let validator = BlockValidator::with_defaults();

        let fresh_address = [0xEEu8; 32];
        let quantity = 2_000_000_000_000u128;
        let tx = seal(
            alice(),
            Transaction {
                format: 2,
                last_tx: b"ALICE-ANCHOR".to_vec(),
                target: fresh_address.to_vec(),
                quantity,
                reward: fee(0, 15, true),
                ..Transaction::default()
            },
        );
        let block = build_next_block(&prev, &history, vec![tx], None, TS, MODE);

        assert_eq!(
            validator.validate_block(
                &block,
                &prev,
                &history.block_index(),
                &wallets,
                &BlockTxsPairs::new(),
                &MaxPowHasher,
            ),
            Ok(())
        );

        // The snapshot stayed frozen through validation.
        assert!(!wallets.contains(&fresh_address));

        // Committing the block materializes the transfer.
        let mut committed = wallets.clone_for_mutation();
        committed.update_wallets_with_block_txs(&block, prev.reward_pool, MODE);
        assert_eq!(committed.get(&fresh_address).unwrap().balance, quantity);
        assert!(committed.get(&fresh_address).unwrap().never_spent());
    }

    #[test]
    fn test_sequential_ledger_scenario() {
        // Balance 1000 units, transfer 300: the sender keeps 700 and the
        // anchor advances to the new transaction id.
        init_tracing();
        let unit = 1_000_000_000_000u128;
        let target = [0xDDu8; 32];
        let tx = seal(
            alice(),
            Transaction {
                format: 2,
                last_tx: b"X".to_vec(),
                target: target.to_vec(),
                quantity: 300 * unit,
                reward: fee(0, 15, true),
                ..Transaction::default()
            },
        );
        let wallets =
            WalletLedger::from_entries([(alice().address(), 1_000 * unit, b"X".to_vec())]);

        verify_tx(&tx, fixture_diff(), 15, TS, &wallets, MODE).unwrap();

        let mut ledger = wallets.clone_for_mutation();
        ledger.apply_tx(&tx);

        let sender = ledger.get(&alice().address()).unwrap();
        assert_eq!(sender.balance, 700 * unit);
        assert_eq!(sender.last_tx, tx.id.to_vec());
        let receiver = ledger.get(&target).unwrap();
        assert_eq!(receiver.balance, 300 * unit);
        assert!(receiver.never_spent());
    }

    #[test]
    fn test_tampered_history_rejects_poa() {
        let (prev, history, wallets) = bootstrap(14);
        let validator = BlockValidator::with_defaults();

        let mut block = build_next_block(&prev, &history, Vec::new(), None, TS, MODE);
        block.poa.chunk[0] ^= 0x01;
        // The PoA gate fires before the independent hash is recomputed, so
        // no resealing is needed for the tampered proof to be observable.
        let result = validator.validate_block(
            &block,
            &prev,
            &history.block_index(),
            &wallets,
            &BlockTxsPairs::new(),
            &MaxPowHasher,
        );
        assert_eq!(result, Err(BlockValidationError::InvalidPoa));
    }

    #[test]
    fn test_resealed_block_field_tamper_caught_by_indep_hash() {
        let (prev, history, wallets) = bootstrap(14);
        let validator = BlockValidator::with_defaults();

        let mut block = build_next_block(&prev, &history, Vec::new(), None, TS, MODE);
        // Claiming a different reward pool without recomputing the
        // independent hash trips the hash gate first.
        block.reward_pool += 1;
        let result = validator.validate_block(
            &block,
            &prev,
            &history.block_index(),
            &wallets,
            &BlockTxsPairs::new(),
            &MaxPowHasher,
        );
        assert_eq!(result, Err(BlockValidationError::InvalidIndepHash));

        // Resealing moves the failure to the pool gate itself.
        let bds = block_data_segment(&block);
        block.indep_hash = indep_hash_from_segment(&bds, &block);
        let result = validator.validate_block(
            &block,
            &prev,
            &history.block_index(),
            &wallets,
            &BlockTxsPairs::new(),
            &MaxPowHasher,
        );
        assert!(matches!(
            result,
            Err(BlockValidationError::RewardPoolMismatch { .. })
        ));
    }
}
