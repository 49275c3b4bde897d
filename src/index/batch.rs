// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Batch number -> transfer id index.
//!
//! Purely derived from the transfer table: `rebuild` over the transfers in id
//! order always reproduces the live index. Appending never fails.

use std::collections::BTreeMap;
use crate::error::{Result, LedgerError};
use crate::registry::transfers::ProductTransfer;
use crate::types::TransferId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchIndex {
    // BTreeMap keeps iteration (and therefore hashing) order canonical.
    batches: BTreeMap<String, Vec<TransferId>>,
}

impl BatchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_insert(&mut self, batch_number: &str, id: TransferId) {
        match self.batches.get_mut(batch_number) {
            Some(ids) => ids.push(id),
            None => {
                self.batches.insert(batch_number.to_owned(), vec![id]);
            }
        }
    }

    pub fn rebuild<'a>(transfers: impl IntoIterator<Item = &'a ProductTransfer>) -> Self {
        let mut index = Self::new();
        for t in transfers {
            index.on_insert(&t.batch_number, t.id);
        }
        index
    }

    /// Transfers recorded under `batch_number`, in acceptance order.
    pub fn transfers_for(&self, batch_number: &str) -> &[TransferId] {
        self.batches.get(batch_number).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Position lookup. Out-of-range positions are an error, never a default.
    pub fn get(&self, batch_number: &str, position: u64) -> Result<TransferId> {
        let ids = self.transfers_for(batch_number);
        usize::try_from(position)
            .ok()
            .and_then(|p| ids.get(p))
            .copied()
            .ok_or_else(|| LedgerError::IndexOutOfBounds {
                batch_number: batch_number.to_owned(),
                position,
                len: ids.len() as u64,
            })
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TransferId])> {
        self.batches.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}
