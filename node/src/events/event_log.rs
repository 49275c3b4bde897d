// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Append-Only Event Log Writer
//!
//! - Events are written to disk BEFORE they are applied to live state
//! - Every append is fsync'd before it is acknowledged
//! - A failed append is truncated away; if that fails too the writer refuses
//!   further appends until the log is reopened
//!
//! # File Format
//! ```text
//! [Header: 16 bytes][Frame][Frame][Frame]...
//! ```
//!
//! Header: version u32 (1), magic u32 ("PVEV"), reserved u64 (0).
//! Frame: len u32, crc32 u32 of the payload, bincode-encoded `LedgerEvent`.

use provenance_ledger::event::LedgerEvent;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const LOG_VERSION: u32 = 1;
pub const LOG_MAGIC: u32 = u32::from_le_bytes(*b"PVEV");
pub const HEADER_LEN: usize = 16;
pub const FRAME_HEADER_LEN: usize = 8;

#[derive(Error, Debug)]
pub enum EventLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid header")]
    InvalidHeader,

    #[error("Event log is poisoned after a failed rollback; reopen required")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, EventLogError>;

pub(crate) struct EventLogHeader {
    pub version: u32,
    pub magic: u32,
    pub reserved: u64,
}

impl EventLogHeader {
    fn new() -> Self {
        Self {
            version: LOG_VERSION,
            magic: LOG_MAGIC,
            reserved: 0,
        }
    }

    fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&self.version.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.magic.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.reserved.to_le_bytes());
        bytes
    }

    pub(crate) fn from_bytes(bytes: &[u8; HEADER_LEN]) -> Self {
        let mut version = [0u8; 4];
        let mut magic = [0u8; 4];
        let mut reserved = [0u8; 8];
        version.copy_from_slice(&bytes[0..4]);
        magic.copy_from_slice(&bytes[4..8]);
        reserved.copy_from_slice(&bytes[8..16]);
        Self {
            version: u32::from_le_bytes(version),
            magic: u32::from_le_bytes(magic),
            reserved: u64::from_le_bytes(reserved),
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.version == LOG_VERSION && self.magic == LOG_MAGIC
    }
}

/// Encodes one event as a checksummed frame.
pub fn encode_frame(event: &LedgerEvent) -> Result<Vec<u8>> {
    let payload = event
        .canonical_bytes()
        .map_err(|e| EventLogError::Serialization(e.to_string()))?;
    let len = u32::try_from(payload.len())
        .map_err(|_| EventLogError::Serialization(format!("event of {} bytes too large", payload.len())))?;

    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Append-Only Event Log Writer
pub struct EventLogWriter {
    path: PathBuf,
    file: File,
    // File length up to and including the last acknowledged frame.
    durable_len: u64,
    event_count: u64,
    poisoned: bool,
}

impl EventLogWriter {
    /// Creates a new log. Fails if `path` already exists.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .create_new(true)
            .append(true)
            .open(&path)?;

        file.write_all(&EventLogHeader::new().to_bytes())?;
        file.sync_all()?; // fsync header

        Ok(Self {
            path,
            file,
            durable_len: HEADER_LEN as u64,
            event_count: 0,
            poisoned: false,
        })
    }

    /// Reopens an existing log for appending after `event_count` events were
    /// recovered from it.
    pub fn open_existing(path: impl AsRef<Path>, event_count: u64) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new().read(true).append(true).open(&path)?;

        let mut header_bytes = [0u8; HEADER_LEN];
        file.read_exact(&mut header_bytes)?;
        if !EventLogHeader::from_bytes(&header_bytes).is_valid() {
            return Err(EventLogError::InvalidHeader);
        }

        let durable_len = file.metadata()?.len();
        Ok(Self {
            path,
            file,
            durable_len,
            event_count,
            poisoned: false,
        })
    }

    /// Appends an event. Only returns Ok() after a durable write.
    ///
    /// On failure the file is cut back to the last acknowledged frame, so the
    /// rejected event can never resurface on replay.
    pub fn append(&mut self, event: &LedgerEvent) -> Result<()> {
        if self.poisoned {
            return Err(EventLogError::Poisoned);
        }
        let frame = encode_frame(event)?;

        if let Err(e) = self.write_frame(&frame) {
            self.rollback();
            return Err(e);
        }

        self.durable_len += frame.len() as u64;
        self.event_count += 1;
        Ok(())
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.file.write_all(frame)?;
        self.file.sync_all()?;
        Ok(())
    }

    /// Drops any bytes past the last acknowledged frame.
    pub(crate) fn rollback(&mut self) {
        let restored = self
            .file
            .set_len(self.durable_len)
            .and_then(|_| self.file.sync_all());

        match restored {
            Ok(()) => tracing::warn!("Event log rolled back to {} bytes", self.durable_len),
            Err(e) => {
                tracing::error!("Event log rollback failed, refusing further appends: {}", e);
                self.poisoned = true;
            }
        }
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    #[cfg(test)]
    pub(crate) fn poison(&mut self) {
        self.poisoned = true;
    }

    /// Get the number of events in the log
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provenance_ledger::types::Account;
    use tempfile::tempdir;

    fn admin_event(n: u8) -> LedgerEvent {
        LedgerEvent::AdministratorTransferred {
            previous: Account::from_low_u8(n),
            new: Account::from_low_u8(n + 1),
        }
    }

    #[test]
    fn test_event_log_create_and_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.log");

        let mut writer = EventLogWriter::create(&path).unwrap();
        writer.append(&admin_event(1)).unwrap();

        assert_eq!(writer.event_count(), 1);
        let len = std::fs::metadata(&path).unwrap().len() as usize;
        assert_eq!(len, HEADER_LEN + encode_frame(&admin_event(1)).unwrap().len());
    }

    #[test]
    fn test_create_refuses_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.log");

        EventLogWriter::create(&path).unwrap();
        assert!(EventLogWriter::create(&path).is_err());
    }

    #[test]
    fn test_rollback_discards_torn_frame() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.log");

        let mut writer = EventLogWriter::create(&path).unwrap();
        writer.append(&admin_event(1)).unwrap();
        let good_len = std::fs::metadata(&path).unwrap().len();

        // Half a frame lands on disk before the write fails.
        let frame = encode_frame(&admin_event(2)).unwrap();
        let mut raw = OpenOptions::new().append(true).open(&path).unwrap();
        raw.write_all(&frame[..frame.len() / 2]).unwrap();
        drop(raw);

        writer.rollback();
        assert!(!writer.is_poisoned());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), good_len);

        writer.append(&admin_event(2)).unwrap();
        let events = crate::events::event_replay::read_event_log(&path).unwrap();
        assert_eq!(events, vec![admin_event(1), admin_event(2)]);
    }

    #[test]
    fn test_poisoned_writer_refuses_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.log");

        let mut writer = EventLogWriter::create(&path).unwrap();
        writer.poisoned = true;

        assert!(matches!(writer.append(&admin_event(1)), Err(EventLogError::Poisoned)));
        assert_eq!(writer.event_count(), 0);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), HEADER_LEN as u64);
    }

    #[test]
    fn test_open_existing_tracks_durable_length() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.log");

        EventLogWriter::create(&path).unwrap().append(&admin_event(1)).unwrap();
        let len = std::fs::metadata(&path).unwrap().len();

        let mut writer = EventLogWriter::open_existing(&path, 1).unwrap();
        assert_eq!(writer.durable_len, len);
        writer.rollback();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), len);
    }

    #[test]
    fn test_open_existing_rejects_foreign_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.log");
        std::fs::write(&path, [0xFFu8; 32]).unwrap();

        assert!(matches!(
            EventLogWriter::open_existing(&path, 0),
            Err(EventLogError::InvalidHeader)
        ));
    }
}
