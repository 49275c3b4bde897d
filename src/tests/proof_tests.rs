// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::event::LedgerEvent;
use crate::replay::{replay_and_prove, replay_events, EventLogFile};
use crate::snapshot::encode_state;
use crate::state::command::Command;
use crate::tests::fixtures::*;
use crate::types::{PointId, TransferType};
use crate::verify::{event_log_hash, ledger_state_hash, snapshot_hash};

fn history() -> Vec<LedgerEvent> {
    let mut ledger = ledger();
    let cmds = vec![
        Command::CreatePoint {
            caller: ADMIN,
            name: "Factory".into(),
            country: "KR".into(),
            city: "Suwon".into(),
            address: "129 Samsung-ro".into(),
            owner: OLEG,
        },
        Command::CreateProductTransfer {
            caller: OLEG,
            point_id: PointId(0),
            link: IPFS_LINK[0].into(),
            transfer_type: TransferType::Manufacture,
            batch_number: BATCH_NUM[0].into(),
        },
        Command::TransferPointOwnership { caller: ADMIN, point_id: PointId(0), new_owner: IVAN },
        Command::CreateProductTransfer {
            caller: IVAN,
            point_id: PointId(0),
            link: IPFS_LINK[1].into(),
            transfer_type: TransferType::Transport,
            batch_number: BATCH_NUM[0].into(),
        },
    ];
    cmds.iter().map(|c| ledger.apply(c).unwrap()).collect()
}

#[test]
fn test_proof_from_genesis() {
    let events = history();
    let (state, proof) = replay_and_prove(&genesis(), &[], &events).unwrap();

    assert_eq!(proof.snapshot_hash, None);
    assert_eq!(proof.event_count, 4);
    assert_eq!(proof.final_state_hash, ledger_state_hash(&state));
    assert_eq!(state.product_transfers_total(), 2);
}

#[test]
fn test_proof_from_snapshot_matches_full_replay() {
    let events = history();
    let (split_a, split_b) = events.split_at(2);

    let base = replay_events(&genesis(), split_a).unwrap();
    let snap = encode_state(&base).unwrap();

    let (_, from_snapshot) = replay_and_prove(&genesis(), &snap, split_b).unwrap();
    let (_, from_genesis) = replay_and_prove(&genesis(), &[], &events).unwrap();

    assert_eq!(from_snapshot.final_state_hash, from_genesis.final_state_hash);
    assert_eq!(from_snapshot.snapshot_hash, Some(snapshot_hash(&snap)));
    assert_ne!(from_snapshot.event_log_hash, from_genesis.event_log_hash);
}

#[test]
fn test_event_log_file_replay() {
    let events = history();
    let file = EventLogFile::new(genesis(), events.clone());
    let state = file.replay().unwrap();
    assert_eq!(state, replay_events(&genesis(), &events).unwrap());
}

#[test]
fn test_event_log_hash_covers_every_event() {
    let events = history();

    let mut hasher = blake3::Hasher::new();
    for event in &events {
        hasher.update(&event.canonical_bytes().unwrap());
    }
    assert_eq!(event_log_hash(&events).unwrap(), *hasher.finalize().as_bytes());

    // Dropping any single event changes the hash.
    for skip in 0..events.len() {
        let partial: Vec<_> = events.iter().enumerate().filter(|(i, _)| *i != skip).map(|(_, e)| e.clone()).collect();
        assert_ne!(event_log_hash(&partial).unwrap(), event_log_hash(&events).unwrap());
    }

    let (_, proof) = replay_and_prove(&genesis(), &[], &events).unwrap();
    assert_eq!(proof.event_count, events.len() as u64);
    assert_eq!(proof.event_log_hash, event_log_hash(&events).unwrap());
}
