// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Snapshot decoding.

use std::io::{Cursor, Read};
use byteorder::{LittleEndian, ReadBytesExt};
use crate::admin::AdminCapability;
use crate::config::LedgerProfile;
use crate::error::{Result, LedgerError};
use crate::index::BatchIndex;
use crate::registry::{Point, PointRegistry, ProductTransfer, TransferRegistry};
use crate::snapshot::encode::{MAGIC, SCHEMA_VERSION};
use crate::state::ledger::LedgerState;
use crate::types::{Account, PointId, TransferId, TransferType, Version};
use crate::types::account::ACCOUNT_LEN;

fn truncated(_: std::io::Error) -> LedgerError {
    LedgerError::Snapshot("truncated snapshot".into())
}

fn read_str(cur: &mut Cursor<&[u8]>) -> Result<String> {
    let len = cur.read_u32::<LittleEndian>().map_err(truncated)? as usize;
    let remaining = cur.get_ref().len() - cur.position() as usize;
    if len > remaining {
        return Err(LedgerError::Snapshot("truncated snapshot".into()));
    }
    let mut bytes = vec![0u8; len];
    cur.read_exact(&mut bytes).map_err(truncated)?;
    String::from_utf8(bytes).map_err(|e| LedgerError::Snapshot(e.to_string()))
}

fn read_account(cur: &mut Cursor<&[u8]>) -> Result<Account> {
    let mut bytes = [0u8; ACCOUNT_LEN];
    cur.read_exact(&mut bytes).map_err(truncated)?;
    Ok(Account(bytes))
}

pub fn decode_state(buf: &[u8]) -> Result<LedgerState> {
    if buf.len() < MAGIC.len() + 8 {
        return Err(LedgerError::Snapshot("truncated snapshot".into()));
    }

    // Trailer first: nothing is trusted until the checksum matches.
    let (body, trailer) = buf.split_at(buf.len() - 8);
    let expected = u64::from_le_bytes(
        trailer.try_into().map_err(|_| LedgerError::Snapshot("truncated snapshot".into()))?,
    );
    let mut digest = crc64fast::Digest::new();
    digest.write(body);
    if digest.sum64() != expected {
        return Err(LedgerError::Snapshot("checksum mismatch".into()));
    }

    let mut cur = Cursor::new(body);

    let mut magic = [0u8; 4];
    cur.read_exact(&mut magic).map_err(truncated)?;
    if &magic != MAGIC {
        return Err(LedgerError::Snapshot("bad magic".into()));
    }

    let schema = cur.read_u32::<LittleEndian>().map_err(truncated)?;
    if schema != SCHEMA_VERSION {
        return Err(LedgerError::Snapshot(format!("unsupported schema version {}", schema)));
    }

    let version = Version(cur.read_u64::<LittleEndian>().map_err(truncated)?);
    let admin = AdminCapability::new(read_account(&mut cur)?);

    let profile = LedgerProfile {
        company_name: read_str(&mut cur)?,
        location: read_str(&mut cur)?,
        description: read_str(&mut cur)?,
    };

    // Points
    let mut points = PointRegistry::new();
    let point_count = cur.read_u64::<LittleEndian>().map_err(truncated)?;
    for _ in 0..point_count {
        let id = PointId(cur.read_u64::<LittleEndian>().map_err(truncated)?);
        let point = Point {
            id,
            name: read_str(&mut cur)?,
            country: read_str(&mut cur)?,
            city: read_str(&mut cur)?,
            address: read_str(&mut cur)?,
            owner: read_account(&mut cur)?,
        };
        points
            .append(point)
            .map_err(|_| LedgerError::Snapshot(format!("point id {} out of sequence", id)))?;
    }

    // Transfers
    let mut transfers = TransferRegistry::new();
    let transfer_count = cur.read_u64::<LittleEndian>().map_err(truncated)?;
    for _ in 0..transfer_count {
        let id = TransferId(cur.read_u64::<LittleEndian>().map_err(truncated)?);
        let point_id = PointId(cur.read_u64::<LittleEndian>().map_err(truncated)?);
        let link = read_str(&mut cur)?;
        let type_val = cur.read_u8().map_err(truncated)?;
        let transfer_type = TransferType::from_u8(type_val)
            .ok_or_else(|| LedgerError::Snapshot(format!("unknown transfer type {}", type_val)))?;
        let batch_number = read_str(&mut cur)?;

        if points.get(point_id).is_none() {
            return Err(LedgerError::Snapshot(format!("transfer {} references missing point {}", id, point_id)));
        }
        transfers
            .append(ProductTransfer { id, point_id, link, transfer_type, batch_number })
            .map_err(|_| LedgerError::Snapshot(format!("transfer id {} out of sequence", id)))?;
    }

    if cur.position() as usize != body.len() {
        return Err(LedgerError::Snapshot("trailing bytes".into()));
    }

    let batches = BatchIndex::rebuild(transfers.iter());
    let state = LedgerState { version, admin, profile, points, transfers, batches };
    state.check_invariants()?;
    Ok(state)
}
