// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::error::LedgerError;
use crate::index::BatchIndex;
use crate::tests::fixtures::*;
use crate::types::{TransferId, TransferType};

#[test]
fn test_batch_number_mapping() {
    let mut ledger = ledger();
    let p0 = add_point(&mut ledger, OLEG);
    let p1 = add_point(&mut ledger, IVAN);

    ledger.create_product_transfer(OLEG, p0, IPFS_LINK[0], TransferType::Manufacture, BATCH_NUM[0]).unwrap();
    ledger.create_product_transfer(OLEG, p0, IPFS_LINK[1], TransferType::Transport, BATCH_NUM[0]).unwrap();
    ledger.create_product_transfer(IVAN, p1, IPFS_LINK[1], TransferType::Realization, BATCH_NUM[1]).unwrap();

    assert_eq!(ledger.batch_number_to_product_transfers(BATCH_NUM[0], 0).unwrap(), TransferId(0));
    assert_eq!(ledger.batch_number_to_product_transfers(BATCH_NUM[0], 1).unwrap(), TransferId(1));
    assert_eq!(ledger.batch_number_to_product_transfers(BATCH_NUM[1], 0).unwrap(), TransferId(2));
    assert_eq!(ledger.transfers_for_batch(BATCH_NUM[0]), &[TransferId(0), TransferId(1)]);
}

#[test]
fn test_unknown_batch_is_empty() {
    let ledger = ledger();
    assert!(ledger.transfers_for_batch("never-used").is_empty());

    let err = ledger.batch_number_to_product_transfers("never-used", 0).unwrap_err();
    assert_eq!(
        err,
        LedgerError::IndexOutOfBounds { batch_number: "never-used".into(), position: 0, len: 0 }
    );
}

#[test]
fn test_position_past_end() {
    let mut ledger = ledger();
    let p0 = add_point(&mut ledger, OLEG);
    ledger.create_product_transfer(OLEG, p0, IPFS_LINK[0], TransferType::Manufacture, BATCH_NUM[0]).unwrap();

    assert!(ledger.batch_number_to_product_transfers(BATCH_NUM[0], 0).is_ok());
    assert!(matches!(
        ledger.batch_number_to_product_transfers(BATCH_NUM[0], 1),
        Err(LedgerError::IndexOutOfBounds { len: 1, .. })
    ));
    assert!(ledger.batch_number_to_product_transfers(BATCH_NUM[0], u64::MAX).is_err());
}

#[test]
fn test_interleaved_batches_keep_acceptance_order() {
    let mut ledger = ledger();
    let p0 = add_point(&mut ledger, OLEG);
    let p1 = add_point(&mut ledger, IVAN);

    let mut expected_a = Vec::new();
    let mut expected_b = Vec::new();
    for i in 0..20 {
        if i % 3 == 0 {
            expected_b.push(
                ledger.create_product_transfer(IVAN, p1, "link", TransferType::Transport, "B").unwrap(),
            );
        } else {
            expected_a.push(
                ledger.create_product_transfer(OLEG, p0, "link", TransferType::Manufacture, "A").unwrap(),
            );
        }
    }

    assert_eq!(ledger.transfers_for_batch("A"), expected_a.as_slice());
    assert_eq!(ledger.transfers_for_batch("B"), expected_b.as_slice());
}

#[test]
fn test_rebuild_matches_live_index() {
    let mut ledger = ledger();
    let p0 = add_point(&mut ledger, OLEG);
    for (i, batch) in ["x", "y", "x", "z", "y", "x"].iter().enumerate() {
        let kind = TransferType::from_u8((i % 3) as u8).unwrap();
        ledger.create_product_transfer(OLEG, p0, "link", kind, batch).unwrap();
    }

    let rebuilt = BatchIndex::rebuild(ledger.transfer_registry().iter());
    assert_eq!(&rebuilt, ledger.batch_index());
    assert_eq!(rebuilt.batch_count(), 3);
}

#[test]
fn test_empty_batch_number_is_a_key() {
    let mut ledger = ledger();
    let p0 = add_point(&mut ledger, OLEG);
    let id = ledger.create_product_transfer(OLEG, p0, "", TransferType::Manufacture, "").unwrap();
    assert_eq!(ledger.batch_number_to_product_transfers("", 0).unwrap(), id);
}
