// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use provenance_ledger::error::LedgerError;
use crate::events::event_commit::CommitError;
use crate::events::event_log::EventLogError;
use crate::events::event_replay::ReplayError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Event log error: {0}")]
    EventLog(#[from] EventLogError),
    #[error("Recovery failed: {0}")]
    Replay(#[from] ReplayError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CommitError> for EngineError {
    fn from(e: CommitError) -> Self {
        match e {
            CommitError::Rejected(err) => EngineError::Ledger(err),
            CommitError::EventLog(err) => EngineError::EventLog(err),
            CommitError::LiveApply(err) => {
                tracing::error!("Committed event failed to apply: {}", err);
                EngineError::Ledger(err)
            }
        }
    }
}

impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Ledger(e) => e.code(),
            EngineError::InvalidInput(_) => "E-400",
            _ => "E-500",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            EngineError::Ledger(e) => match e {
                LedgerError::AccessDenied { .. } => StatusCode::FORBIDDEN,
                LedgerError::RecordNotFound { .. } => StatusCode::NOT_FOUND,
                LedgerError::IndexOutOfBounds { .. } => StatusCode::NOT_FOUND,
                LedgerError::MalformedInput(_) => StatusCode::BAD_REQUEST,
                LedgerError::InvalidOperation => StatusCode::CONFLICT,
                LedgerError::Snapshot(_) => StatusCode::UNPROCESSABLE_ENTITY,
                LedgerError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            EngineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            EngineError::EventLog(_) | EngineError::Replay(_) | EngineError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}
