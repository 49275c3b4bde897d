// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Point registry.

use serde::{Serialize, Deserialize};
use crate::admin::AdminCapability;
use crate::error::{Result, LedgerError, E_POINT_NOT_FOUND};
use crate::types::{Account, PointId};

/// A registered handling location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    pub name: String,
    pub country: String,
    pub city: String,
    pub address: String,
    pub owner: Account,
}

/// Append-only table of points. `points[i].id == PointId(i)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PointRegistry {
    points: Vec<Point>,
    total: u64,
}

impl PointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: PointId) -> Option<&Point> {
        usize::try_from(id.0).ok().and_then(|idx| self.points.get(idx))
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn next_id(&self) -> PointId {
        PointId(self.total)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.points.len()
    }

    /// Administrator-gated: returns the id a new point would receive.
    pub fn authorize_create(&self, admin: &AdminCapability, caller: Account) -> Result<PointId> {
        admin.ensure_administrator(caller)?;
        Ok(self.next_id())
    }

    /// Existence first (`E-84`), then the administrator check.
    pub fn authorize_ownership_transfer(
        &self,
        admin: &AdminCapability,
        caller: Account,
        id: PointId,
    ) -> Result<&Point> {
        let point = self.get(id).ok_or(LedgerError::not_found(E_POINT_NOT_FOUND))?;
        admin.ensure_administrator(caller)?;
        Ok(point)
    }

    pub(crate) fn append(&mut self, point: Point) -> Result<PointId> {
        if point.id != self.next_id() {
            return Err(LedgerError::InvalidOperation);
        }
        let id = point.id;
        self.points.push(point);
        self.total += 1;
        Ok(id)
    }

    pub(crate) fn set_owner(&mut self, id: PointId, previous: Account, new_owner: Account) -> Result<()> {
        let point = usize::try_from(id.0)
            .ok()
            .and_then(|idx| self.points.get_mut(idx))
            .ok_or(LedgerError::InvalidOperation)?;
        if point.owner != previous {
            return Err(LedgerError::InvalidOperation);
        }
        point.owner = new_owner;
        Ok(())
    }
}
