// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Deterministic Replay Logic.
//!
//! # Guarantees
//! - Same genesis + same events => same state and same hash
//! - No partial application: a failing event aborts the whole replay

use serde::{Serialize, Deserialize};
use crate::config::{Genesis, PROTOCOL_VERSION};
use crate::error::{Result, LedgerError};
use crate::event::LedgerEvent;
use crate::proof::DeterministicProof;
use crate::snapshot::decode::decode_state;
use crate::state::ledger::LedgerState;
use crate::verify::{event_log_hash, ledger_state_hash, snapshot_hash};

/// EventJournal separates buffered (pending) from committed history.
///
/// Only committed events define state.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventJournal {
    pub committed: Vec<LedgerEvent>,
    pub buffer: Vec<LedgerEvent>,
}

impl EventJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event to the buffer (not yet committed)
    pub fn append(&mut self, event: LedgerEvent) {
        self.buffer.push(event);
    }

    pub fn commit(&mut self) {
        self.committed.append(&mut self.buffer);
    }

    /// Discard all buffered events
    pub fn discard_buffer(&mut self) {
        self.buffer.clear();
    }

    pub fn committed_len(&self) -> usize {
        self.committed.len()
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }
}

/// Portable export of a full ledger history.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventLogFile {
    pub version: u32,
    pub genesis: Genesis,
    pub events: Vec<LedgerEvent>,
}

impl EventLogFile {
    pub fn new(genesis: Genesis, events: Vec<LedgerEvent>) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            genesis,
            events,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != PROTOCOL_VERSION {
            return Err(LedgerError::MalformedInput(format!(
                "unsupported event log version {}",
                self.version
            )));
        }
        Ok(())
    }

    pub fn replay(&self) -> Result<LedgerState> {
        self.validate()?;
        replay_events(&self.genesis, &self.events)
    }
}

/// Rebuilds ledger state from genesis by applying `events` in order.
pub fn replay_events(genesis: &Genesis, events: &[LedgerEvent]) -> Result<LedgerState> {
    let mut state = LedgerState::new(genesis);
    replay_onto(&mut state, events)?;
    Ok(state)
}

/// Applies `events` on top of an existing state.
pub fn replay_onto(state: &mut LedgerState, events: &[LedgerEvent]) -> Result<()> {
    for evt in events {
        state.apply_event(evt)?;
    }
    Ok(())
}

/// Replays `events` on top of a snapshot (or genesis when `snapshot_bytes`
/// is empty) and returns a proof of the result.
pub fn replay_and_prove(
    genesis: &Genesis,
    snapshot_bytes: &[u8],
    events: &[LedgerEvent],
) -> Result<(LedgerState, DeterministicProof)> {
    let (mut state, snap_hash) = if snapshot_bytes.is_empty() {
        (LedgerState::new(genesis), None)
    } else {
        (decode_state(snapshot_bytes)?, Some(snapshot_hash(snapshot_bytes)))
    };

    replay_onto(&mut state, events)?;

    let proof = DeterministicProof {
        protocol_version: PROTOCOL_VERSION,
        snapshot_hash: snap_hash,
        event_log_hash: event_log_hash(events)?,
        final_state_hash: ledger_state_hash(&state),
        event_count: events.len() as u64,
    };
    Ok((state, proof))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Account;

    #[test]
    fn test_journal_commit_semantics() {
        let mut journal = EventJournal::new();

        journal.append(LedgerEvent::AdministratorTransferred {
            previous: Account::from_low_u8(1),
            new: Account::from_low_u8(2),
        });

        assert_eq!(journal.buffer_len(), 1);
        assert_eq!(journal.committed_len(), 0);

        journal.commit();

        assert_eq!(journal.buffer_len(), 0);
        assert_eq!(journal.committed_len(), 1);
    }

    #[test]
    fn test_journal_discard() {
        let mut journal = EventJournal::new();

        journal.append(LedgerEvent::AdministratorTransferred {
            previous: Account::from_low_u8(1),
            new: Account::from_low_u8(2),
        });
        journal.discard_buffer();

        assert_eq!(journal.buffer_len(), 0);
        assert_eq!(journal.committed_len(), 0);
    }

    #[test]
    fn test_event_log_file_version() {
        let genesis = Genesis::new(Account::from_low_u8(1));
        let log = EventLogFile::new(genesis.clone(), vec![]);
        assert!(log.validate().is_ok());

        let bad = EventLogFile { version: 99, genesis, events: vec![] };
        assert!(bad.validate().is_err());
    }
}
