// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event-Sourced Persistence Layer
//!
//! - Event Log = primary truth (append-only, durable)
//! - Snapshots = disposable cache
//! - Crash-symmetric recovery via replay

pub mod event_log;
pub mod event_replay;
pub mod event_commit;

pub use event_log::EventLogWriter;
pub use event_replay::{read_event_log, recover_from_event_log};
pub use event_commit::{CommitError, EventCommitter};
