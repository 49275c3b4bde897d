// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Protocol constants and genesis configuration.

use serde::{Serialize, Deserialize};
use crate::types::Account;

/// Version of the event/snapshot protocol.
pub const PROTOCOL_VERSION: u32 = 1;

/// Descriptive metadata of the operating company, fixed at genesis.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerProfile {
    pub company_name: String,
    pub location: String,
    pub description: String,
}

/// Everything needed to construct an empty ledger.
///
/// The administrator capability starts with `administrator`; replaying the same
/// event log on top of the same genesis always produces the same state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    pub administrator: Account,
    pub profile: LedgerProfile,
}

impl Genesis {
    pub fn new(administrator: Account) -> Self {
        Self {
            administrator,
            profile: LedgerProfile::default(),
        }
    }

    pub fn with_profile(mut self, profile: LedgerProfile) -> Self {
        self.profile = profile;
        self
    }
}
