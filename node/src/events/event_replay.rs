// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event Replay - Authoritative Recovery
//!
//! **Event Log ALWAYS wins. Snapshot is just a cache.**
//!
//! # Invariants
//! - If event log corrupt or truncated → fail closed
//! - replay(events) = original state, batch index included

use provenance_ledger::config::Genesis;
use provenance_ledger::error::LedgerError;
use provenance_ledger::event::LedgerEvent;
use provenance_ledger::replay::replay_events;
use provenance_ledger::state::LedgerState;
use crate::events::event_log::{EventLogHeader, FRAME_HEADER_LEN, HEADER_LEN};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Event log header invalid")]
    InvalidHeader,

    #[error("Event log truncated at offset {offset}")]
    Truncated { offset: usize },

    #[error("Event log corrupted at offset {offset}")]
    Corrupted { offset: usize },

    #[error("Event deserialization failed at offset {offset}: {reason}")]
    Deserialization { offset: usize, reason: String },

    #[error("Event application failed: {0}")]
    EventApplication(#[from] LedgerError),
}

pub type Result<T> = std::result::Result<T, ReplayError>;

/// Decodes every frame after the header. Offsets in errors are file offsets.
pub fn decode_frames(body: &[u8]) -> Result<Vec<LedgerEvent>> {
    let mut events = Vec::new();
    let mut offset = 0;

    while offset < body.len() {
        let file_offset = HEADER_LEN + offset;
        if body.len() - offset < FRAME_HEADER_LEN {
            return Err(ReplayError::Truncated { offset: file_offset });
        }

        let mut len_bytes = [0u8; 4];
        let mut crc_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&body[offset..offset + 4]);
        crc_bytes.copy_from_slice(&body[offset + 4..offset + 8]);
        let len = u32::from_le_bytes(len_bytes) as usize;
        let crc = u32::from_le_bytes(crc_bytes);

        let start = offset + FRAME_HEADER_LEN;
        if body.len() - start < len {
            return Err(ReplayError::Truncated { offset: file_offset });
        }
        let payload = &body[start..start + len];
        if crc32fast::hash(payload) != crc {
            return Err(ReplayError::Corrupted { offset: file_offset });
        }

        let (event, read) = bincode::serde::decode_from_slice::<LedgerEvent, _>(payload, bincode::config::standard())
            .map_err(|e| ReplayError::Deserialization { offset: file_offset, reason: e.to_string() })?;
        if read != len {
            return Err(ReplayError::Corrupted { offset: file_offset });
        }

        events.push(event);
        offset = start + len;
    }

    Ok(events)
}

/// Reads and validates a complete event log.
pub fn read_event_log(path: impl AsRef<Path>) -> Result<Vec<LedgerEvent>> {
    let file = File::open(path.as_ref())?;
    let mut reader = BufReader::new(file);

    let mut header_bytes = [0u8; HEADER_LEN];
    reader.read_exact(&mut header_bytes).map_err(|_| ReplayError::InvalidHeader)?;
    if !EventLogHeader::from_bytes(&header_bytes).is_valid() {
        return Err(ReplayError::InvalidHeader);
    }

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    decode_frames(&buffer)
}

/// Rebuilds ledger state from `genesis` and the log at `path`.
pub fn recover_from_event_log(
    genesis: &Genesis,
    path: impl AsRef<Path>,
) -> Result<(LedgerState, Vec<LedgerEvent>)> {
    let events = read_event_log(path)?;
    let state = replay_events(genesis, &events)?;
    state.check_invariants()?;
    tracing::info!("Recovered {} events, {} points, {} transfers",
        events.len(), state.points_total(), state.product_transfers_total());
    Ok((state, events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event_log::EventLogWriter;
    use provenance_ledger::types::{Account, TransferType};
    use tempfile::tempdir;

    const ADMIN: Account = Account([0xAA; 20]);
    const OWNER: Account = Account([0x01; 20]);

    fn write_history(path: &Path) -> LedgerState {
        let mut state = LedgerState::new(&Genesis::new(ADMIN));
        let mut writer = EventLogWriter::create(path).unwrap();

        let p0 = state.validate(&provenance_ledger::Command::CreatePoint {
            caller: ADMIN,
            name: "Dock".into(),
            country: "NL".into(),
            city: "Rotterdam".into(),
            address: "Pier 2".into(),
            owner: OWNER,
        }).unwrap();
        writer.append(&p0).unwrap();
        state.apply_event(&p0).unwrap();

        let t0 = state.validate(&provenance_ledger::Command::CreateProductTransfer {
            caller: OWNER,
            point_id: provenance_ledger::types::PointId(0),
            link: "ipfs://a".into(),
            transfer_type: TransferType::Transport,
            batch_number: "B1".into(),
        }).unwrap();
        writer.append(&t0).unwrap();
        state.apply_event(&t0).unwrap();

        state
    }

    #[test]
    fn test_recover_matches_live_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.log");
        let live = write_history(&path);

        let (recovered, events) = recover_from_event_log(&Genesis::new(ADMIN), &path).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(recovered, live);
    }

    #[test]
    fn test_truncated_log_fails_closed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.log");
        write_history(&path);

        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 2]).unwrap();

        assert!(matches!(read_event_log(&path), Err(ReplayError::Truncated { .. })));
    }

    #[test]
    fn test_corrupted_log_fails_closed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.log");
        write_history(&path);

        let mut bytes = std::fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x55;
        std::fs::write(&path, &bytes).unwrap();

        assert!(matches!(read_event_log(&path), Err(ReplayError::Corrupted { .. })));
    }

    #[test]
    fn test_wrong_genesis_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.log");

        let mut writer = EventLogWriter::create(&path).unwrap();
        writer.append(&LedgerEvent::AdministratorTransferred { previous: ADMIN, new: OWNER }).unwrap();

        assert!(recover_from_event_log(&Genesis::new(ADMIN), &path).is_ok());

        let other = Genesis::new(Account([0xBB; 20]));
        assert!(matches!(
            recover_from_event_log(&other, &path),
            Err(ReplayError::EventApplication(LedgerError::InvalidOperation))
        ));
    }
}
