// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::config::{Genesis, LedgerProfile};
use crate::state::ledger::LedgerState;
use crate::types::{Account, PointId};

pub const ADMIN: Account = Account([0xAA; 20]);
pub const OLEG: Account = Account([0x01; 20]);
pub const IVAN: Account = Account([0x02; 20]);

pub const IPFS_LINK: [&str; 2] = [
    "https://ipfs.io/ipfs/QmS4ustL54uo8F",
    "https://ipfs.io/ipfs/yvMcX9Ba8nUH4uVv",
];
pub const BATCH_NUM: [&str; 2] = ["0000101", "0000102"];

pub fn genesis() -> Genesis {
    Genesis::new(ADMIN).with_profile(LedgerProfile {
        company_name: "Samsung".into(),
        location: "Seoul, South Korea".into(),
        description: "Samsung Group is a South Korean group of companies.".into(),
    })
}

pub fn ledger() -> LedgerState {
    LedgerState::new(&genesis())
}

pub fn add_point(ledger: &mut LedgerState, owner: Account) -> PointId {
    ledger
        .create_point(ADMIN, "Some name1", "Some country1", "Some city2", "Some address2", owner)
        .unwrap()
}
