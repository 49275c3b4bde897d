// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Deterministic Hashing and Verification.

use crate::error::Result;
use crate::event::LedgerEvent;
use crate::state::ledger::LedgerState;

fn update_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

/// Computes the BLAKE3 hash of the ledger state.
///
/// Covers version, administrator, profile, every point, every transfer and
/// the batch index, each in canonical order (ids ascending, batches by key).
/// Strings are length-prefixed so field boundaries cannot shift.
pub fn ledger_state_hash(state: &LedgerState) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();

    // 1. Header
    hasher.update(&state.version.0.to_le_bytes());
    hasher.update(state.admin.current().as_bytes());
    update_str(&mut hasher, &state.profile.company_name);
    update_str(&mut hasher, &state.profile.location);
    update_str(&mut hasher, &state.profile.description);

    // 2. Points
    hasher.update(&state.points.total().to_le_bytes());
    for point in state.points.iter() {
        hasher.update(&point.id.0.to_le_bytes());
        update_str(&mut hasher, &point.name);
        update_str(&mut hasher, &point.country);
        update_str(&mut hasher, &point.city);
        update_str(&mut hasher, &point.address);
        hasher.update(point.owner.as_bytes());
    }

    // 3. Transfers
    hasher.update(&state.transfers.total().to_le_bytes());
    for transfer in state.transfers.iter() {
        hasher.update(&transfer.id.0.to_le_bytes());
        hasher.update(&transfer.point_id.0.to_le_bytes());
        update_str(&mut hasher, &transfer.link);
        hasher.update(&[transfer.transfer_type as u8]);
        update_str(&mut hasher, &transfer.batch_number);
    }

    // 4. Batch index
    hasher.update(&(state.batches.batch_count() as u64).to_le_bytes());
    for (batch, ids) in state.batches.iter() {
        update_str(&mut hasher, batch);
        hasher.update(&(ids.len() as u64).to_le_bytes());
        for id in ids {
            hasher.update(&id.0.to_le_bytes());
        }
    }

    *hasher.finalize().as_bytes()
}

pub fn snapshot_hash(snapshot_bytes: &[u8]) -> [u8; 32] {
    blake3::hash(snapshot_bytes).into()
}

/// Hash of an event sequence, independent of the on-disk framing.
pub fn event_log_hash(events: &[LedgerEvent]) -> Result<[u8; 32]> {
    let mut hasher = blake3::Hasher::new();
    for event in events {
        hasher.update(&event.canonical_bytes()?);
    }
    Ok(*hasher.finalize().as_bytes())
}
