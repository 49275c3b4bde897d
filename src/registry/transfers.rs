// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Product transfer registry.

use serde::{Serialize, Deserialize};
use crate::error::{Result, LedgerError, E_TRANSFER_POINT_NOT_FOUND};
use crate::registry::points::PointRegistry;
use crate::types::{Account, PointId, TransferId, TransferType};

/// One movement of a batch through a point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTransfer {
    pub id: TransferId,
    pub point_id: PointId,
    pub link: String,
    pub transfer_type: TransferType,
    pub batch_number: String,
}

/// Append-only table of transfers, numbered globally across all points.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransferRegistry {
    transfers: Vec<ProductTransfer>,
    total: u64,
}

impl TransferRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: TransferId) -> Option<&ProductTransfer> {
        usize::try_from(id.0).ok().and_then(|idx| self.transfers.get(idx))
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn next_id(&self) -> TransferId {
        TransferId(self.total)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductTransfer> {
        self.transfers.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.transfers.len()
    }

    /// Point-owner-gated: existence first (`E-87`), then ownership (`E-88`).
    ///
    /// Holding the administrator capability does not help here.
    pub fn authorize_create(
        &self,
        points: &PointRegistry,
        caller: Account,
        point_id: PointId,
    ) -> Result<TransferId> {
        let point = points
            .get(point_id)
            .ok_or(LedgerError::not_found(E_TRANSFER_POINT_NOT_FOUND))?;
        if point.owner != caller {
            return Err(LedgerError::not_point_owner());
        }
        Ok(self.next_id())
    }

    pub(crate) fn append(&mut self, transfer: ProductTransfer) -> Result<TransferId> {
        if transfer.id != self.next_id() {
            return Err(LedgerError::InvalidOperation);
        }
        let id = transfer.id;
        self.transfers.push(transfer);
        self.total += 1;
        Ok(id)
    }
}
