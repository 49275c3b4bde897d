// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Snapshot encoding.
//!
//! ```text
//! MAGIC "PVLG" | schema u32 | version u64 | administrator [20]
//! profile: company_name, location, description
//! point_count u64 | { id u64, name, country, city, address, owner [20] }*
//! transfer_count u64 | { id u64, point_id u64, link, type u8, batch_number }*
//! crc64 u64 over everything above
//! ```
//! Integers are little-endian; strings are `len u32` followed by UTF-8 bytes.
//! The batch index is not stored; decoding rebuilds it.

use std::io::Write;
use byteorder::{LittleEndian, WriteBytesExt};
use crate::error::{Result, LedgerError};
use crate::state::ledger::LedgerState;

pub const MAGIC: &[u8; 4] = b"PVLG";
pub const SCHEMA_VERSION: u32 = 1;

fn io_err(e: std::io::Error) -> LedgerError {
    LedgerError::Snapshot(e.to_string())
}

fn write_str(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    let len = u32::try_from(s.len())
        .map_err(|_| LedgerError::Snapshot(format!("string of {} bytes too long", s.len())))?;
    buf.write_u32::<LittleEndian>(len).map_err(io_err)?;
    buf.write_all(s.as_bytes()).map_err(io_err)
}

pub fn encode_state(state: &LedgerState) -> Result<Vec<u8>> {
    let mut buf = Vec::new();

    // Header
    buf.write_all(MAGIC).map_err(io_err)?;
    buf.write_u32::<LittleEndian>(SCHEMA_VERSION).map_err(io_err)?;
    buf.write_u64::<LittleEndian>(state.version.0).map_err(io_err)?;
    buf.write_all(state.admin.current().as_bytes()).map_err(io_err)?;

    write_str(&mut buf, &state.profile.company_name)?;
    write_str(&mut buf, &state.profile.location)?;
    write_str(&mut buf, &state.profile.description)?;

    // Points
    buf.write_u64::<LittleEndian>(state.points.total()).map_err(io_err)?;
    for point in state.points.iter() {
        buf.write_u64::<LittleEndian>(point.id.0).map_err(io_err)?;
        write_str(&mut buf, &point.name)?;
        write_str(&mut buf, &point.country)?;
        write_str(&mut buf, &point.city)?;
        write_str(&mut buf, &point.address)?;
        buf.write_all(point.owner.as_bytes()).map_err(io_err)?;
    }

    // Transfers
    buf.write_u64::<LittleEndian>(state.transfers.total()).map_err(io_err)?;
    for transfer in state.transfers.iter() {
        buf.write_u64::<LittleEndian>(transfer.id.0).map_err(io_err)?;
        buf.write_u64::<LittleEndian>(transfer.point_id.0).map_err(io_err)?;
        write_str(&mut buf, &transfer.link)?;
        buf.write_u8(transfer.transfer_type as u8).map_err(io_err)?;
        write_str(&mut buf, &transfer.batch_number)?;
    }

    // Trailer
    let mut digest = crc64fast::Digest::new();
    digest.write(&buf);
    let crc = digest.sum64();
    buf.write_u64::<LittleEndian>(crc).map_err(io_err)?;

    Ok(buf)
}
