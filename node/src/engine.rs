// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use provenance_ledger::config::{Genesis, LedgerProfile, PROTOCOL_VERSION};
use provenance_ledger::event::LedgerEvent;
use provenance_ledger::proof::DeterministicProof;
use provenance_ledger::registry::{Point, ProductTransfer};
use provenance_ledger::snapshot::{decode_state, encode_state};
use provenance_ledger::state::{Command, LedgerState};
use provenance_ledger::types::{Account, PointId, TransferId, TransferType};
use provenance_ledger::verify::{ledger_state_hash, snapshot_hash};

use crate::config::NodeConfig;
use crate::errors::EngineError;
use crate::events::{recover_from_event_log, EventCommitter, EventLogWriter};
use crate::persistence::SnapshotManager;

use std::path::PathBuf;
use std::time::Instant;

/// Host for a single ledger instance. Not thread-safe on its own; the server
/// wraps it in one mutex so commands are applied strictly one at a time.
pub struct Engine {
    state: LedgerState,
    genesis: Genesis,
    committer: Option<EventCommitter>,

    pub snapshot_path: Option<PathBuf>,
    pub current_snapshot_hash: Option<[u8; 32]>,

    // Snapshot the live history starts from, if it was restored from one.
    base_snapshot_hash: Option<[u8; 32]>,
    // Running hash of every event committed on top of genesis / base snapshot.
    event_hasher: blake3::Hasher,
    event_count: u64,
}

impl Engine {
    /// In-memory engine, no durability.
    pub fn new(cfg: &NodeConfig) -> Self {
        Self {
            state: LedgerState::new(&cfg.genesis),
            genesis: cfg.genesis.clone(),
            committer: None,
            snapshot_path: cfg.snapshot_path.clone(),
            current_snapshot_hash: None,
            base_snapshot_hash: None,
            event_hasher: blake3::Hasher::new(),
            event_count: 0,
        }
    }

    /// Builds an engine and recovers state.
    ///
    /// With an event log configured the log is replayed from genesis and any
    /// snapshot is ignored. Without one, an existing snapshot is restored.
    pub fn open(cfg: &NodeConfig) -> Result<Self, EngineError> {
        let mut engine = Self::new(cfg);

        if let Some(log_path) = &cfg.event_log_path {
            let writer = if log_path.exists() {
                let (state, events) = recover_from_event_log(&cfg.genesis, log_path)?;
                engine.state = state;
                for event in &events {
                    engine.record_event_hash(&event.canonical_bytes()?);
                }
                EventLogWriter::open_existing(log_path, events.len() as u64)?
            } else {
                tracing::info!("Creating event log at {:?}", log_path);
                EventLogWriter::create(log_path)?
            };
            engine.committer = Some(EventCommitter::new(writer));
        } else if let Some(path) = cfg.snapshot_path.as_deref().filter(|p| p.exists()) {
            tracing::info!("Found snapshot at {:?}. Loading...", path);
            let data = SnapshotManager::load(path)?;
            engine.restore(&data)?;
            tracing::info!("Snapshot restored successfully.");
        }

        Ok(engine)
    }

    fn record_event_hash(&mut self, canonical: &[u8]) {
        self.event_hasher.update(canonical);
        self.event_count += 1;
    }

    /// Validates, logs and applies one event. Nothing changes unless every
    /// step succeeds.
    fn commit(&mut self, cmd: &Command) -> Result<LedgerEvent, EngineError> {
        let event = self.state.validate(cmd)?;
        let canonical = event.canonical_bytes()?;

        match self.committer.as_mut() {
            Some(committer) => committer.append_and_apply(&mut self.state, &event)?,
            None => self.state.apply_event(&event)?,
        }

        self.record_event_hash(&canonical);
        Ok(event)
    }

    /// Applies one command atomically. The single entry point for mutation.
    pub fn execute(&mut self, cmd: Command) -> Result<LedgerEvent, EngineError> {
        let started = Instant::now();
        let name = cmd.name();

        let result = self.commit(&cmd);

        match &result {
            Ok(event) => {
                metrics::increment_counter!("provenance_commands_total", "command" => name);
                metrics::histogram!(
                    "provenance_command_duration_seconds",
                    started.elapsed().as_secs_f64(),
                    "command" => name
                );
                tracing::debug!(command = name, event = event.event_type(), version = self.state.version(), "Committed");
            }
            Err(e) => {
                metrics::increment_counter!("provenance_commands_rejected_total", "command" => name, "code" => e.code());
                tracing::debug!(command = name, caller = %cmd.caller(), error = %e, "Rejected");
            }
        }

        result
    }

    // --- Operations ---

    pub fn create_point(
        &mut self,
        caller: Account,
        name: String,
        country: String,
        city: String,
        address: String,
        owner: Account,
    ) -> Result<PointId, EngineError> {
        match self.execute(Command::CreatePoint { caller, name, country, city, address, owner })? {
            LedgerEvent::PointCreated { point } => Ok(point.id),
            other => Err(unexpected(&other)),
        }
    }

    pub fn transfer_point_ownership(
        &mut self,
        caller: Account,
        point_id: PointId,
        new_owner: Account,
    ) -> Result<(), EngineError> {
        self.execute(Command::TransferPointOwnership { caller, point_id, new_owner })?;
        Ok(())
    }

    pub fn create_product_transfer(
        &mut self,
        caller: Account,
        point_id: PointId,
        link: String,
        transfer_type: TransferType,
        batch_number: String,
    ) -> Result<TransferId, EngineError> {
        let cmd = Command::CreateProductTransfer { caller, point_id, link, transfer_type, batch_number };
        match self.execute(cmd)? {
            LedgerEvent::ProductTransferCreated { transfer } => Ok(transfer.id),
            other => Err(unexpected(&other)),
        }
    }

    pub fn transfer_administrator(&mut self, caller: Account, new_administrator: Account) -> Result<(), EngineError> {
        self.execute(Command::TransferAdministrator { caller, new_administrator })?;
        Ok(())
    }

    // --- Reads ---

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn point(&self, id: PointId) -> Result<&Point, EngineError> {
        Ok(self.state.points(id)?)
    }

    pub fn product_transfer(&self, id: TransferId) -> Result<&ProductTransfer, EngineError> {
        Ok(self.state.product_transfers(id)?)
    }

    pub fn batch_entry(&self, batch_number: &str, position: u64) -> Result<TransferId, EngineError> {
        Ok(self.state.batch_number_to_product_transfers(batch_number, position)?)
    }

    pub fn batch(&self, batch_number: &str) -> &[TransferId] {
        self.state.transfers_for_batch(batch_number)
    }

    pub fn administrator(&self) -> Account {
        self.state.current_administrator()
    }

    pub fn profile(&self) -> &LedgerProfile {
        self.state.profile()
    }

    pub fn genesis(&self) -> &Genesis {
        &self.genesis
    }

    pub fn event_log_enabled(&self) -> bool {
        self.committer.is_some()
    }

    // --- Snapshots & Proofs ---

    pub fn snapshot(&self) -> Result<Vec<u8>, EngineError> {
        Ok(encode_state(&self.state)?)
    }

    /// Replaces live state with a snapshot. Refused while an event log is the
    /// source of truth, since the log could no longer be replayed onto it.
    pub fn restore(&mut self, data: &[u8]) -> Result<(), EngineError> {
        if self.committer.is_some() {
            return Err(EngineError::InvalidInput(
                "Restore is disabled while the event log is enabled".to_string(),
            ));
        }
        self.state = decode_state(data)?;
        let hash = snapshot_hash(data);
        self.current_snapshot_hash = Some(hash);
        self.base_snapshot_hash = Some(hash);
        self.event_hasher = blake3::Hasher::new();
        self.event_count = 0;
        Ok(())
    }

    /// Writes a snapshot to the configured snapshot path. The destination is
    /// never taken from a request.
    pub fn save_snapshot(&mut self) -> Result<PathBuf, EngineError> {
        let path = self
            .snapshot_path
            .clone()
            .ok_or_else(|| EngineError::InvalidInput("No snapshot path configured".to_string()))?;

        let bytes = self.snapshot()?;
        SnapshotManager::save(&path, &bytes)?;

        self.current_snapshot_hash = Some(snapshot_hash(&bytes));
        metrics::gauge!("provenance_snapshot_size_bytes", bytes.len() as f64);
        Ok(path)
    }

    /// Proof over the history since genesis, or since the restored snapshot.
    pub fn get_proof(&self) -> DeterministicProof {
        DeterministicProof {
            protocol_version: PROTOCOL_VERSION,
            snapshot_hash: self.base_snapshot_hash,
            event_log_hash: *self.event_hasher.finalize().as_bytes(),
            final_state_hash: ledger_state_hash(&self.state),
            event_count: self.event_count,
        }
    }
}

fn unexpected(event: &LedgerEvent) -> EngineError {
    tracing::error!("Unexpected event {} for command", event.event_type());
    EngineError::InvalidInput(format!("unexpected event {}", event.event_type()))
}
