// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event Log as Primary Truth
//!
//! Every accepted command is recorded as exactly one `LedgerEvent`. Events
//! carry the complete resulting record, so replay needs neither the caller nor
//! any access check.
//!
//! # Invariants
//! - Same genesis + same event log => same final state
//! - Events are immutable once committed
//! - The batch index is never logged; it is rebuilt from `ProductTransferCreated`

use serde::{Serialize, Deserialize};
use crate::error::{Result, LedgerError};
use crate::registry::{Point, ProductTransfer};
use crate::types::{Account, PointId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum LedgerEvent {
    PointCreated {
        point: Point,
    },
    PointOwnershipTransferred {
        point_id: PointId,
        previous_owner: Account,
        new_owner: Account,
    },
    ProductTransferCreated {
        transfer: ProductTransfer,
    },
    AdministratorTransferred {
        previous: Account,
        new: Account,
    },
}

impl LedgerEvent {
    /// Returns a human-readable description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::PointCreated { .. } => "PointCreated",
            LedgerEvent::PointOwnershipTransferred { .. } => "PointOwnershipTransferred",
            LedgerEvent::ProductTransferCreated { .. } => "ProductTransferCreated",
            LedgerEvent::AdministratorTransferred { .. } => "AdministratorTransferred",
        }
    }

    /// Canonical bincode encoding. Used for log frames and event log hashes.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| LedgerError::Encoding(e.to_string()))
    }
}
