// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Ledger State definition.
//!
//! Every mutation goes through two phases: `validate` checks all preconditions
//! against `&self` and produces the event, then `apply_event` performs the
//! writes. A rejected command therefore never leaves a partial update behind.

use crate::admin::AdminCapability;
use crate::config::{Genesis, LedgerProfile};
use crate::error::{Result, LedgerError, E_RECORD_NOT_FOUND};
use crate::event::LedgerEvent;
use crate::index::BatchIndex;
use crate::registry::{Point, PointRegistry, ProductTransfer, TransferRegistry};
use crate::state::command::Command;
use crate::types::{Account, PointId, TransferId, TransferType, Version};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerState {
    pub(crate) version: Version,
    pub(crate) admin: AdminCapability,
    pub(crate) profile: LedgerProfile,
    pub(crate) points: PointRegistry,
    pub(crate) transfers: TransferRegistry,
    pub(crate) batches: BatchIndex,
}

impl LedgerState {
    pub fn new(genesis: &Genesis) -> Self {
        Self {
            version: Version(0),
            admin: AdminCapability::new(genesis.administrator),
            profile: genesis.profile.clone(),
            points: PointRegistry::new(),
            transfers: TransferRegistry::new(),
            batches: BatchIndex::new(),
        }
    }

    // --- Read APIs ---

    pub fn version(&self) -> u64 {
        self.version.0
    }

    pub fn current_administrator(&self) -> Account {
        self.admin.current()
    }

    pub fn profile(&self) -> &LedgerProfile {
        &self.profile
    }

    pub fn points(&self, id: PointId) -> Result<&Point> {
        self.points.get(id).ok_or(LedgerError::not_found(E_RECORD_NOT_FOUND))
    }

    pub fn product_transfers(&self, id: TransferId) -> Result<&ProductTransfer> {
        self.transfers.get(id).ok_or(LedgerError::not_found(E_RECORD_NOT_FOUND))
    }

    pub fn batch_number_to_product_transfers(&self, batch_number: &str, position: u64) -> Result<TransferId> {
        self.batches.get(batch_number, position)
    }

    pub fn transfers_for_batch(&self, batch_number: &str) -> &[TransferId] {
        self.batches.transfers_for(batch_number)
    }

    pub fn points_total(&self) -> u64 {
        self.points.total()
    }

    pub fn product_transfers_total(&self) -> u64 {
        self.transfers.total()
    }

    pub fn point_registry(&self) -> &PointRegistry {
        &self.points
    }

    pub fn transfer_registry(&self) -> &TransferRegistry {
        &self.transfers
    }

    pub fn batch_index(&self) -> &BatchIndex {
        &self.batches
    }

    // --- Write Logic ---

    /// Checks every precondition of `cmd` and returns the event it would emit.
    pub fn validate(&self, cmd: &Command) -> Result<LedgerEvent> {
        match cmd {
            Command::CreatePoint { caller, name, country, city, address, owner } => {
                let id = self.points.authorize_create(&self.admin, *caller)?;
                Ok(LedgerEvent::PointCreated {
                    point: Point {
                        id,
                        name: name.clone(),
                        country: country.clone(),
                        city: city.clone(),
                        address: address.clone(),
                        owner: *owner,
                    },
                })
            }
            Command::TransferPointOwnership { caller, point_id, new_owner } => {
                let point = self.points.authorize_ownership_transfer(&self.admin, *caller, *point_id)?;
                Ok(LedgerEvent::PointOwnershipTransferred {
                    point_id: point.id,
                    previous_owner: point.owner,
                    new_owner: *new_owner,
                })
            }
            Command::CreateProductTransfer { caller, point_id, link, transfer_type, batch_number } => {
                let id = self.transfers.authorize_create(&self.points, *caller, *point_id)?;
                Ok(LedgerEvent::ProductTransferCreated {
                    transfer: ProductTransfer {
                        id,
                        point_id: *point_id,
                        link: link.clone(),
                        transfer_type: *transfer_type,
                        batch_number: batch_number.clone(),
                    },
                })
            }
            Command::TransferAdministrator { caller, new_administrator } => {
                self.admin.authorize_transfer(*caller, *new_administrator)?;
                Ok(LedgerEvent::AdministratorTransferred {
                    previous: self.admin.current(),
                    new: *new_administrator,
                })
            }
        }
    }

    /// Validates and applies `cmd`, returning the emitted event.
    pub fn apply(&mut self, cmd: &Command) -> Result<LedgerEvent> {
        let event = self.validate(cmd)?;
        self.apply_event(&event)?;
        Ok(event)
    }

    /// Applies a committed event. Ids in the event must match the next
    /// allocation; no access checks are repeated.
    pub fn apply_event(&mut self, event: &LedgerEvent) -> Result<()> {
        match event {
            LedgerEvent::PointCreated { point } => {
                self.points.append(point.clone())?;
            }
            LedgerEvent::PointOwnershipTransferred { point_id, previous_owner, new_owner } => {
                self.points.set_owner(*point_id, *previous_owner, *new_owner)?;
            }
            LedgerEvent::ProductTransferCreated { transfer } => {
                if self.points.get(transfer.point_id).is_none() {
                    return Err(LedgerError::InvalidOperation);
                }
                self.transfers.append(transfer.clone())?;
                self.batches.on_insert(&transfer.batch_number, transfer.id);
            }
            LedgerEvent::AdministratorTransferred { previous, new } => {
                if self.admin.current() != *previous || new.is_zero() {
                    return Err(LedgerError::InvalidOperation);
                }
                self.admin.replace(*new);
            }
        }

        self.version = self.version.next();
        Ok(())
    }

    // --- Operations ---

    pub fn create_point(
        &mut self,
        caller: Account,
        name: &str,
        country: &str,
        city: &str,
        address: &str,
        owner: Account,
    ) -> Result<PointId> {
        let cmd = Command::CreatePoint {
            caller,
            name: name.to_owned(),
            country: country.to_owned(),
            city: city.to_owned(),
            address: address.to_owned(),
            owner,
        };
        match self.apply(&cmd)? {
            LedgerEvent::PointCreated { point } => Ok(point.id),
            _ => Err(LedgerError::InvalidOperation),
        }
    }

    pub fn transfer_point_ownership(&mut self, caller: Account, point_id: PointId, new_owner: Account) -> Result<()> {
        self.apply(&Command::TransferPointOwnership { caller, point_id, new_owner })?;
        Ok(())
    }

    pub fn create_product_transfer(
        &mut self,
        caller: Account,
        point_id: PointId,
        link: &str,
        transfer_type: TransferType,
        batch_number: &str,
    ) -> Result<TransferId> {
        let cmd = Command::CreateProductTransfer {
            caller,
            point_id,
            link: link.to_owned(),
            transfer_type,
            batch_number: batch_number.to_owned(),
        };
        match self.apply(&cmd)? {
            LedgerEvent::ProductTransferCreated { transfer } => Ok(transfer.id),
            _ => Err(LedgerError::InvalidOperation),
        }
    }

    pub fn transfer_administrator(&mut self, caller: Account, new_administrator: Account) -> Result<()> {
        self.apply(&Command::TransferAdministrator { caller, new_administrator })?;
        Ok(())
    }

    // --- Invariant Checker ---

    /// Checks the internal consistency of the ledger state.
    pub fn check_invariants(&self) -> Result<()> {
        // 1. Points: dense ids, counter agrees with table
        if self.points.total() != self.points.len() as u64 {
            return Err(LedgerError::InvalidOperation);
        }
        for (i, point) in self.points.iter().enumerate() {
            if point.id.0 != i as u64 {
                return Err(LedgerError::InvalidOperation);
            }
        }

        // 2. Transfers: dense ids, valid point references
        if self.transfers.total() != self.transfers.len() as u64 {
            return Err(LedgerError::InvalidOperation);
        }
        for (i, transfer) in self.transfers.iter().enumerate() {
            if transfer.id.0 != i as u64 {
                return Err(LedgerError::InvalidOperation);
            }
            if self.points.get(transfer.point_id).is_none() {
                return Err(LedgerError::InvalidOperation);
            }
        }

        // 3. Batch index is exactly the derived one
        if self.batches != BatchIndex::rebuild(self.transfers.iter()) {
            return Err(LedgerError::InvalidOperation);
        }

        // 4. Version counts applied events, which is at least one per record
        if self.version.0 < self.points.total() + self.transfers.total() {
            return Err(LedgerError::InvalidOperation);
        }

        Ok(())
    }
}
