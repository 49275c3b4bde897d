// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request as AxumRequest, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::{from_fn_with_state, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio::sync::Mutex;

use provenance_ledger::config::LedgerProfile;
use provenance_ledger::error::LedgerError;
use provenance_ledger::registry::{Point, ProductTransfer};
use provenance_ledger::types::{Account, PointId, TransferId, TransferType};

use crate::api::*;
use crate::engine::Engine;
use crate::errors::EngineError;

pub type SharedEngine = Arc<Mutex<Engine>>;

/// Account issuing the request, taken from the `x-caller` header.
pub struct Caller(pub Account);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = EngineError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or_else(|| EngineError::InvalidInput(format!("missing {} header", CALLER_HEADER)))?
            .to_str()
            .map_err(|_| EngineError::InvalidInput(format!("{} header is not ascii", CALLER_HEADER)))?;

        let account = raw
            .trim()
            .parse::<Account>()
            .map_err(|e| EngineError::InvalidInput(format!("bad {} header: {}", CALLER_HEADER, e)))?;
        Ok(Caller(account))
    }
}

/// `Json` whose rejections use the ledger's error body (400, `E-400`).
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = EngineError;

    async fn from_request(req: AxumRequest, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| EngineError::InvalidInput(e.body_text()))?;
        Ok(JsonBody(value))
    }
}

async fn auth_guard(
    State(token): State<Arc<String>>,
    req: AxumRequest,
    next: Next,
) -> Result<Response, StatusCode> {
    let provided = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|val| val.to_str().ok())
        .and_then(|val| val.strip_prefix("Bearer "));

    match provided {
        Some(p) if p == token.as_str() => Ok(next.run(req).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

pub fn build_router(state: SharedEngine, auth_token: Option<String>) -> Router {
    let mut app = Router::new()
        // Points
        .route("/v1/points", post(create_point))
        .route("/v1/points/:id", get(get_point))
        .route("/v1/points/:id/owner", post(transfer_point_ownership))
        // Product transfers
        .route("/v1/transfers", post(create_product_transfer))
        .route("/v1/transfers/:id", get(get_product_transfer))
        .route("/v1/batches/:batch", get(get_batch))
        .route("/v1/batches/:batch/:position", get(get_batch_entry))
        .route("/v1/totals", get(get_totals))
        // Administration
        .route("/v1/admin", get(get_administrator))
        .route("/v1/admin/transfer", post(transfer_administrator))
        .route("/v1/profile", get(get_profile))
        // Snapshots & proofs
        .route("/v1/snapshot/save", post(snapshot_save))
        .route("/v1/proof/state", get(get_proof))
        .with_state(state);

    if let Some(token) = auth_token {
        tracing::info!("Auth Enabled: Bearer token required");
        app = app.layer(from_fn_with_state(Arc::new(token), auth_guard));
    } else {
        tracing::warn!("Auth Disabled: No token configured");
    }

    // Scrapers are not expected to carry the bearer token.
    app.route("/metrics", get(metrics_handler))
}

async fn create_point(
    State(state): State<SharedEngine>,
    Caller(caller): Caller,
    JsonBody(req): JsonBody<CreatePointRequest>,
) -> Result<Json<CreatePointResponse>, EngineError> {
    let mut engine = state.lock().await;
    let id = engine.create_point(caller, req.name, req.country, req.city, req.address, req.owner)?;
    Ok(Json(CreatePointResponse { point_id: id.0 }))
}

async fn get_point(
    State(state): State<SharedEngine>,
    Path(id): Path<u64>,
) -> Result<Json<Point>, EngineError> {
    let engine = state.lock().await;
    Ok(Json(engine.point(PointId(id))?.clone()))
}

async fn transfer_point_ownership(
    State(state): State<SharedEngine>,
    Caller(caller): Caller,
    Path(id): Path<u64>,
    JsonBody(req): JsonBody<TransferPointOwnershipRequest>,
) -> Result<Json<SuccessResponse>, EngineError> {
    let mut engine = state.lock().await;
    engine.transfer_point_ownership(caller, PointId(id), req.new_owner)?;
    Ok(Json(SuccessResponse { success: true }))
}

async fn create_product_transfer(
    State(state): State<SharedEngine>,
    Caller(caller): Caller,
    JsonBody(req): JsonBody<CreateProductTransferRequest>,
) -> Result<Json<CreateProductTransferResponse>, EngineError> {
    let transfer_type = TransferType::try_from(req.transfer_type)?;
    let mut engine = state.lock().await;
    let id = engine.create_product_transfer(
        caller,
        PointId(req.point_id),
        req.link,
        transfer_type,
        req.batch_number,
    )?;
    Ok(Json(CreateProductTransferResponse { transfer_id: id.0 }))
}

async fn get_product_transfer(
    State(state): State<SharedEngine>,
    Path(id): Path<u64>,
) -> Result<Json<ProductTransfer>, EngineError> {
    let engine = state.lock().await;
    Ok(Json(engine.product_transfer(TransferId(id))?.clone()))
}

async fn get_batch(
    State(state): State<SharedEngine>,
    Path(batch): Path<String>,
) -> Json<BatchResponse> {
    let engine = state.lock().await;
    let transfers = engine.batch(&batch).iter().map(|id| id.0).collect();
    Json(BatchResponse { batch_number: batch, transfers })
}

async fn get_batch_entry(
    State(state): State<SharedEngine>,
    Path((batch, position)): Path<(String, u64)>,
) -> Result<Json<BatchEntryResponse>, EngineError> {
    let engine = state.lock().await;
    let id = engine.batch_entry(&batch, position)?;
    Ok(Json(BatchEntryResponse { batch_number: batch, position, transfer_id: id.0 }))
}

async fn get_totals(State(state): State<SharedEngine>) -> Json<TotalsResponse> {
    let engine = state.lock().await;
    let ledger = engine.state();
    Json(TotalsResponse {
        points_total: ledger.points_total(),
        product_transfers_total: ledger.product_transfers_total(),
        version: ledger.version(),
    })
}

async fn get_administrator(State(state): State<SharedEngine>) -> Json<AdministratorResponse> {
    let engine = state.lock().await;
    Json(AdministratorResponse { administrator: engine.administrator() })
}

async fn transfer_administrator(
    State(state): State<SharedEngine>,
    Caller(caller): Caller,
    JsonBody(req): JsonBody<TransferAdministratorRequest>,
) -> Result<Json<SuccessResponse>, EngineError> {
    let mut engine = state.lock().await;
    engine.transfer_administrator(caller, req.new_administrator)?;
    Ok(Json(SuccessResponse { success: true }))
}

async fn get_profile(State(state): State<SharedEngine>) -> Json<LedgerProfile> {
    let engine = state.lock().await;
    Json(engine.profile().clone())
}

async fn snapshot_save(
    State(state): State<SharedEngine>,
    Caller(caller): Caller,
) -> Result<Json<SnapshotSaveResponse>, EngineError> {
    let mut engine = state.lock().await;
    if caller != engine.administrator() {
        return Err(LedgerError::not_administrator().into());
    }
    let used_path = engine.save_snapshot()?;

    Ok(Json(SnapshotSaveResponse {
        success: true,
        path: used_path.to_string_lossy().to_string(),
        snapshot_hash: engine.current_snapshot_hash.map(hex::encode).unwrap_or_default(),
    }))
}

async fn get_proof(State(state): State<SharedEngine>) -> Json<ProofResponse> {
    let engine = state.lock().await;
    let proof = engine.get_proof();
    Json(ProofResponse {
        protocol_version: proof.protocol_version,
        snapshot_hash: proof.snapshot_hash.map(hex::encode),
        event_log_hash: hex::encode(proof.event_log_hash),
        final_state_hash: hex::encode(proof.final_state_hash),
        event_count: proof.event_count,
    })
}

async fn metrics_handler() -> String {
    crate::telemetry::get_metrics()
}
