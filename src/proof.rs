// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Deterministic Proof Structures.

use serde::{Serialize, Deserialize};

/// A receipt that a specific event history, applied on top of a specific
/// starting point, yields a specific ledger state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeterministicProof {
    /// Event/snapshot protocol version.
    pub protocol_version: u32,

    /// BLAKE3 hash of the starting snapshot, if replay started from one.
    pub snapshot_hash: Option<[u8; 32]>,

    /// BLAKE3 hash of the replayed events.
    pub event_log_hash: [u8; 32],

    /// BLAKE3 hash of the final ledger state.
    pub final_state_hash: [u8; 32],

    pub event_count: u64,
}
