// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use thiserror::Error;

/// Point does not exist (ownership transfer).
pub const E_POINT_NOT_FOUND: &str = "E-84";
/// Point does not exist (product transfer creation).
pub const E_TRANSFER_POINT_NOT_FOUND: &str = "E-87";
/// Caller is not the point owner.
pub const E_NOT_POINT_OWNER: &str = "E-88";
/// Caller does not hold the administrator capability.
pub const E_NOT_ADMINISTRATOR: &str = "Ownable: caller is not the owner";
/// Administrator capability handed to the zero account.
pub const E_ZERO_ADMINISTRATOR: &str = "Ownable: new owner is the zero address";
/// Plain record lookup miss.
pub const E_RECORD_NOT_FOUND: &str = "E-404";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Caller lacks the required capability.
    #[error("access denied: {code}")]
    AccessDenied { code: &'static str },

    /// Referenced record does not exist.
    #[error("record not found: {code}")]
    RecordNotFound { code: &'static str },

    /// Structurally invalid input.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("batch {batch_number:?} has {len} transfers, position {position} is out of bounds")]
    IndexOutOfBounds {
        batch_number: String,
        position: u64,
        len: u64,
    },

    /// History does not line up with state (replay, restore).
    #[error("invalid operation")]
    InvalidOperation,

    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// Canonical event encoding failed.
    #[error("encoding error: {0}")]
    Encoding(String),
}

impl LedgerError {
    pub const fn not_administrator() -> Self {
        LedgerError::AccessDenied { code: E_NOT_ADMINISTRATOR }
    }

    pub const fn not_point_owner() -> Self {
        LedgerError::AccessDenied { code: E_NOT_POINT_OWNER }
    }

    pub const fn not_found(code: &'static str) -> Self {
        LedgerError::RecordNotFound { code }
    }

    /// Observable reason string, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::AccessDenied { code } | LedgerError::RecordNotFound { code } => code,
            LedgerError::MalformedInput(_) => "E-400",
            LedgerError::IndexOutOfBounds { .. } => "E-416",
            LedgerError::InvalidOperation => "E-409",
            LedgerError::Snapshot(_) => "E-422",
            LedgerError::Encoding(_) => "E-500",
        }
    }
}

pub type LedgerResult<T> = core::result::Result<T, LedgerError>;
pub type Result<T> = LedgerResult<T>;
