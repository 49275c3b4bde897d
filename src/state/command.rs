// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Ledger Command definitions.

use serde::{Serialize, Deserialize};
use crate::types::{Account, PointId, TransferType};

/// A caller-attributed request to mutate the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    CreatePoint {
        caller: Account,
        name: String,
        country: String,
        city: String,
        address: String,
        owner: Account,
    },
    TransferPointOwnership {
        caller: Account,
        point_id: PointId,
        new_owner: Account,
    },
    CreateProductTransfer {
        caller: Account,
        point_id: PointId,
        link: String,
        transfer_type: TransferType,
        batch_number: String,
    },
    TransferAdministrator {
        caller: Account,
        new_administrator: Account,
    },
}

impl Command {
    pub fn caller(&self) -> Account {
        match self {
            Command::CreatePoint { caller, .. }
            | Command::TransferPointOwnership { caller, .. }
            | Command::CreateProductTransfer { caller, .. }
            | Command::TransferAdministrator { caller, .. } => *caller,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::CreatePoint { .. } => "createPoint",
            Command::TransferPointOwnership { .. } => "transferPointOwnership",
            Command::CreateProductTransfer { .. } => "createProductTransfer",
            Command::TransferAdministrator { .. } => "transferAdministrator",
        }
    }
}
