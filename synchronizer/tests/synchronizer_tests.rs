use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use quorum_consensus::GateObject;
use quorum_network::BlockLoader;
use quorum_nullables::{keypairs, peers_for, signed_chain, NullBlockLoader, NullStorage};
use quorum_synchronizer::{
    ChainValidatorImpl, SyncConfig, SynchronizationOutcomeType, Synchronizer, SynchronizerService,
};
use quorum_types::{Block, Hash, KeyPair, PublicKey, Round};

struct Fixture {
    keys: Vec<KeyPair>,
    chain: Vec<Arc<Block>>,
    storage: Arc<NullStorage>,
    loader: Arc<NullBlockLoader>,
}

impl Fixture {
    /// Four peers, a known chain of eight blocks, the local ledger at `height`.
    fn at_height(height: usize) -> Self {
        let keys = keypairs(4);
        let chain = signed_chain(0, Hash::ZERO, 8, &keys);
        let storage = Arc::new(NullStorage::with_blocks(
            peers_for(&keys),
            chain[..height].to_vec(),
        ));
        Self {
            keys,
            chain,
            storage,
            loader: Arc::new(NullBlockLoader::new()),
        }
    }

    fn synchronizer(&self, config: SyncConfig) -> Synchronizer<NullStorage> {
        Synchronizer::new(
            Arc::clone(&self.storage),
            Arc::clone(&self.loader) as Arc<dyn BlockLoader>,
            Arc::new(ChainValidatorImpl::default()),
            config,
        )
    }

    fn peer(&self, i: usize) -> PublicKey {
        self.keys[i].public
    }

    /// Blocks at heights `from..=to`.
    fn blocks(&self, from: usize, to: usize) -> Vec<Arc<Block>> {
        self.chain[from - 1..to].to_vec()
    }
}

#[tokio::test]
async fn pair_valid_is_applied_and_committed() {
    let fx = Fixture::at_height(4);
    let sync = fx.synchronizer(SyncConfig::default());

    let event = sync
        .process_outcome(GateObject::PairValid {
            round: Round::new(5, 1),
            ledger_state: fx.storage.ledger_state(),
            block: Arc::clone(&fx.chain[4]),
        })
        .await
        .expect("commit event");

    assert_eq!(event.sync_outcome, SynchronizationOutcomeType::Commit);
    assert_eq!(event.round, Round::new(5, 1));
    assert_eq!(event.ledger_state.height(), 5);
    assert_eq!(fx.storage.commits(), 1);
}

#[tokio::test]
async fn prepared_block_skips_generic_commit() {
    let fx = Fixture::at_height(4);
    fx.storage.prepare(&fx.chain[4]);
    let sync = fx.synchronizer(SyncConfig::default());

    let event = sync
        .process_outcome(GateObject::PairValid {
            round: Round::new(5, 1),
            ledger_state: fx.storage.ledger_state(),
            block: Arc::clone(&fx.chain[4]),
        })
        .await
        .expect("commit event");

    assert_eq!(event.ledger_state.height(), 5);
    assert_eq!(fx.storage.prepared_commits(), 1);
    assert_eq!(fx.storage.commits(), 0);
    assert_eq!(fx.storage.storages_created(), 0);
}

#[tokio::test]
async fn mismatched_prepared_block_falls_back_to_apply() {
    let fx = Fixture::at_height(4);
    let other = signed_chain(4, Hash::new([9; 32]), 1, &fx.keys);
    fx.storage.prepare(&other[0]);
    let sync = fx.synchronizer(SyncConfig::default());

    let event = sync
        .process_outcome(GateObject::PairValid {
            round: Round::new(5, 1),
            ledger_state: fx.storage.ledger_state(),
            block: Arc::clone(&fx.chain[4]),
        })
        .await
        .expect("commit event");

    assert_eq!(event.ledger_state.top_hash(), fx.chain[4].hash);
    assert_eq!(fx.storage.prepared_commits(), 0);
    assert_eq!(fx.storage.commits(), 1);
}

#[tokio::test]
async fn failed_commit_emits_nothing() {
    let fx = Fixture::at_height(4);
    fx.storage.fail_next_commit();
    let sync = fx.synchronizer(SyncConfig::default());

    let event = sync
        .process_outcome(GateObject::PairValid {
            round: Round::new(5, 1),
            ledger_state: fx.storage.ledger_state(),
            block: Arc::clone(&fx.chain[4]),
        })
        .await;

    assert!(event.is_none());
    assert_eq!(fx.storage.height(), 4);
}

#[tokio::test]
async fn failed_apply_emits_nothing() {
    let fx = Fixture::at_height(4);
    fx.storage.fail_apply_at(5);
    let sync = fx.synchronizer(SyncConfig::default());

    let event = sync
        .process_outcome(GateObject::PairValid {
            round: Round::new(5, 1),
            ledger_state: fx.storage.ledger_state(),
            block: Arc::clone(&fx.chain[4]),
        })
        .await;

    assert!(event.is_none());
    assert_eq!(fx.storage.height(), 4);
}

#[tokio::test]
async fn future_downloads_from_next_peer_when_first_is_empty() {
    let fx = Fixture::at_height(4);
    fx.loader.push_response(fx.peer(1), fx.blocks(5, 5));
    let sync = fx.synchronizer(SyncConfig::default());

    let event = sync
        .process_outcome(GateObject::Future {
            round: Round::new(6, 1),
            ledger_state: fx.storage.ledger_state(),
            signers: vec![fx.peer(0), fx.peer(1)],
        })
        .await
        .expect("commit event");

    assert_eq!(event.sync_outcome, SynchronizationOutcomeType::Commit);
    assert_eq!(event.round, Round::new(6, 1));
    assert_eq!(event.ledger_state.height(), 5);
    assert_eq!(fx.loader.requests(), vec![(fx.peer(0), 4), (fx.peer(1), 4)]);
}

#[tokio::test]
async fn exhausted_peers_emit_nothing_and_later_future_retries() {
    let fx = Fixture::at_height(5);
    let sync = fx.synchronizer(SyncConfig::default());

    let event = sync
        .process_outcome(GateObject::VoteOther {
            round: Round::new(6, 1),
            ledger_state: fx.storage.ledger_state(),
            signers: vec![fx.peer(0), fx.peer(1), fx.peer(2)],
            block_hash: fx.chain[5].hash,
        })
        .await;
    assert!(event.is_none());
    assert_eq!(fx.storage.height(), 5);
    assert_eq!(fx.loader.requests().len(), 3);

    fx.loader.serve_chain(fx.peer(3), fx.chain.clone());
    let event = sync
        .process_outcome(GateObject::Future {
            round: Round::new(7, 0),
            ledger_state: fx.storage.ledger_state(),
            signers: vec![fx.peer(2), fx.peer(3)],
        })
        .await
        .expect("commit event");
    assert!(event.ledger_state.height() >= 6);
    assert_eq!(fx.storage.height(), event.ledger_state.height());
}

#[tokio::test]
async fn partial_progress_is_kept_across_peers() {
    let fx = Fixture::at_height(4);
    fx.loader.push_response(fx.peer(0), fx.blocks(5, 5));
    fx.loader.push_response(fx.peer(1), fx.blocks(6, 7));
    let sync = fx.synchronizer(SyncConfig::default());

    let event = sync
        .process_outcome(GateObject::VoteOther {
            round: Round::new(7, 0),
            ledger_state: fx.storage.ledger_state(),
            signers: vec![fx.peer(0), fx.peer(1)],
            block_hash: fx.chain[6].hash,
        })
        .await
        .expect("commit event");

    assert_eq!(event.ledger_state.height(), 7);
    assert_eq!(
        fx.loader.requests(),
        vec![(fx.peer(0), 4), (fx.peer(0), 5), (fx.peer(1), 5)]
    );
    assert_eq!(fx.storage.storages_created(), 1);
}

#[tokio::test]
async fn invalid_chain_moves_to_next_peer_from_valid_prefix() {
    let fx = Fixture::at_height(4);
    let mut forged = (*fx.chain[5]).clone();
    forged.payload.push(0xFF);
    fx.loader
        .push_response(fx.peer(0), vec![Arc::clone(&fx.chain[4]), Arc::new(forged)]);
    fx.loader.push_response(fx.peer(1), fx.blocks(6, 6));
    let sync = fx.synchronizer(SyncConfig::default());

    let event = sync
        .process_outcome(GateObject::VoteOther {
            round: Round::new(6, 0),
            ledger_state: fx.storage.ledger_state(),
            signers: vec![fx.peer(0), fx.peer(1)],
            block_hash: fx.chain[5].hash,
        })
        .await
        .expect("commit event");

    assert_eq!(event.ledger_state.top_hash(), fx.chain[5].hash);
    assert_eq!(fx.loader.requests(), vec![(fx.peer(0), 4), (fx.peer(1), 5)]);
}

#[tokio::test]
async fn requests_per_peer_are_bounded() {
    let fx = Fixture::at_height(4);
    for height in 5..=7 {
        fx.loader.push_response(fx.peer(0), fx.blocks(height, height));
    }
    fx.loader.push_response(fx.peer(1), fx.blocks(7, 8));
    let sync = fx.synchronizer(SyncConfig {
        max_requests_per_peer: 2,
    });

    let event = sync
        .process_outcome(GateObject::VoteOther {
            round: Round::new(8, 0),
            ledger_state: fx.storage.ledger_state(),
            signers: vec![fx.peer(0), fx.peer(1)],
            block_hash: fx.chain[7].hash,
        })
        .await
        .expect("commit event");

    assert_eq!(event.ledger_state.height(), 8);
    assert_eq!(
        fx.loader.requests(),
        vec![(fx.peer(0), 4), (fx.peer(0), 5), (fx.peer(1), 6)]
    );
}

#[tokio::test]
async fn ledger_already_at_target_emits_nothing() {
    let fx = Fixture::at_height(5);
    let sync = fx.synchronizer(SyncConfig::default());

    let event = sync
        .process_outcome(GateObject::Future {
            round: Round::new(6, 0),
            ledger_state: fx.storage.ledger_state(),
            signers: vec![fx.peer(0)],
        })
        .await;

    assert!(event.is_none());
    assert!(fx.loader.requests().is_empty());
}

#[tokio::test]
async fn rejects_resolve_without_storage_or_network() {
    let fx = Fixture::at_height(4);
    let sync = fx.synchronizer(SyncConfig::default());
    let ledger_state = fx.storage.ledger_state();

    let nothing = sync
        .process_outcome(GateObject::AgreementOnNone {
            round: Round::new(5, 1),
            ledger_state: Arc::clone(&ledger_state),
            signers: vec![fx.peer(0)],
        })
        .await
        .expect("nothing event");
    assert_eq!(nothing.sync_outcome, SynchronizationOutcomeType::Nothing);
    assert_eq!(nothing.ledger_state, ledger_state);

    for object in [
        GateObject::BlockReject {
            round: Round::new(5, 1),
            ledger_state: Arc::clone(&ledger_state),
            signers: vec![fx.peer(0)],
        },
        GateObject::ProposalReject {
            round: Round::new(5, 1),
            ledger_state: Arc::clone(&ledger_state),
            signers: vec![fx.peer(0)],
        },
    ] {
        let event = sync.process_outcome(object).await.expect("reject event");
        assert_eq!(event.sync_outcome, SynchronizationOutcomeType::Reject);
        assert_eq!(event.round, Round::new(5, 1));
    }

    assert_eq!(fx.storage.storages_created(), 0);
    assert!(fx.loader.requests().is_empty());
}

#[tokio::test]
async fn service_publishes_events_in_order() {
    let fx = Fixture::at_height(4);
    let (decisions_tx, decisions_rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let service = SynchronizerService::new(
        fx.synchronizer(SyncConfig::default()),
        decisions_rx,
        16,
        shutdown_rx,
    );
    let mut events = service.subscribe();
    let task = service.spawn();

    decisions_tx
        .send(GateObject::PairValid {
            round: Round::new(5, 1),
            ledger_state: fx.storage.ledger_state(),
            block: Arc::clone(&fx.chain[4]),
        })
        .await
        .unwrap();
    decisions_tx
        .send(GateObject::ProposalReject {
            round: Round::new(6, 1),
            ledger_state: fx.storage.ledger_state(),
            signers: vec![fx.peer(0)],
        })
        .await
        .unwrap();

    let first = events.recv().await.unwrap();
    assert_eq!(first.sync_outcome, SynchronizationOutcomeType::Commit);
    let second = events.recv().await.unwrap();
    assert_eq!(second.sync_outcome, SynchronizationOutcomeType::Reject);

    shutdown_tx.send(()).unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn every_queued_decision_is_resolved() {
    let fx = Fixture::at_height(4);
    let (decisions_tx, decisions_rx) = mpsc::channel(2);
    let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let service = SynchronizerService::new(
        fx.synchronizer(SyncConfig::default()),
        decisions_rx,
        16,
        shutdown_rx,
    );
    let mut events = service.subscribe();

    // More decisions than the queue holds: the producer waits for room.
    let ledger_state = fx.storage.ledger_state();
    let producer = tokio::spawn(async move {
        for reject_round in 1..=5 {
            decisions_tx
                .send(GateObject::ProposalReject {
                    round: Round::new(5, reject_round),
                    ledger_state: Arc::clone(&ledger_state),
                    signers: Vec::new(),
                })
                .await
                .unwrap();
        }
    });
    let task = service.spawn();

    let mut seen = Vec::new();
    for _ in 0..5 {
        seen.push(events.recv().await.unwrap().round);
    }
    producer.await.unwrap();
    assert_eq!(seen, (1..=5).map(|r| Round::new(5, r)).collect::<Vec<_>>());

    // The queue closing with the producer ends the service.
    task.await.unwrap();
}
