// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event Commit - The Safety Wall
//!
//! 1. Command validated against live state (no mutation)
//! 2. Resulting event persisted to disk (fsync)
//! 3. Event applied to live state
//!
//! If step 1 or 2 fails the live state is untouched.

use provenance_ledger::error::LedgerError;
use provenance_ledger::event::LedgerEvent;
use provenance_ledger::state::{Command, LedgerState};
use crate::events::event_log::{EventLogError, EventLogWriter};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Command rejected: {0}")]
    Rejected(LedgerError),

    #[error("Event log error: {0}")]
    EventLog(#[from] EventLogError),

    #[error("Ledger error during live apply: {0}")]
    LiveApply(LedgerError),
}

pub type Result<T> = std::result::Result<T, CommitError>;

/// Enforces the commit barrier between a command and live state.
pub struct EventCommitter {
    log: EventLogWriter,
}

impl EventCommitter {
    pub fn new(log: EventLogWriter) -> Self {
        Self { log }
    }

    pub fn commit(&mut self, state: &mut LedgerState, cmd: &Command) -> Result<LedgerEvent> {
        let event = state.validate(cmd).map_err(CommitError::Rejected)?;
        self.append_and_apply(state, &event)?;
        Ok(event)
    }

    /// Steps 2 and 3 for an event already validated against `state`.
    pub fn append_and_apply(&mut self, state: &mut LedgerState, event: &LedgerEvent) -> Result<()> {
        self.log.append(event)?;
        state.apply_event(event).map_err(CommitError::LiveApply)
    }

    pub fn committed_height(&self) -> u64 {
        self.log.event_count()
    }

    pub fn event_log(&self) -> &EventLogWriter {
        &self.log
    }
}
