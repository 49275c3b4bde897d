// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::{Deserialize, Serialize};
use provenance_ledger::types::Account;

/// Header carrying the calling account on every mutating request.
pub const CALLER_HEADER: &str = "x-caller";

#[derive(Deserialize, Serialize, Debug)]
pub struct CreatePointRequest {
    pub name: String,
    pub country: String,
    pub city: String,
    pub address: String,
    pub owner: Account,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreatePointResponse {
    pub point_id: u64,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct TransferPointOwnershipRequest {
    pub new_owner: Account,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CreateProductTransferRequest {
    pub point_id: u64,
    pub link: String,
    /// 0 = Manufacture, 1 = Transport, 2 = Realization.
    pub transfer_type: u8,
    pub batch_number: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateProductTransferResponse {
    pub transfer_id: u64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BatchResponse {
    pub batch_number: String,
    pub transfers: Vec<u64>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BatchEntryResponse {
    pub batch_number: String,
    pub position: u64,
    pub transfer_id: u64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TotalsResponse {
    pub points_total: u64,
    pub product_transfers_total: u64,
    pub version: u64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AdministratorResponse {
    pub administrator: Account,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct TransferAdministratorRequest {
    pub new_administrator: Account,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Serialize, Debug)]
pub struct SnapshotSaveResponse {
    pub success: bool,
    pub path: String,
    pub snapshot_hash: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ProofResponse {
    pub protocol_version: u32,
    pub snapshot_hash: Option<String>, // hex-encoded BLAKE3
    pub event_log_hash: String,        // hex-encoded BLAKE3
    pub final_state_hash: String,      // hex-encoded BLAKE3
    pub event_count: u64,
}
