// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! provenance-ledger: a deterministic, append-only supply-chain provenance ledger.

pub mod config;
pub mod error;
pub mod types;
pub mod admin;
pub mod registry;
pub mod index;
pub mod state;
pub mod event;
pub mod snapshot;
pub mod verify;
pub mod proof;
pub mod replay;

pub use config::{Genesis, LedgerProfile};
pub use error::{LedgerError, LedgerResult};
pub use event::LedgerEvent;
pub use state::{Command, LedgerState};

#[cfg(test)]
pub mod tests;
