use axum::{Json, extract::State};
use jc_api_types::{
    ApproveResponse, ConnectResponse, RunJobRequest, RunJobResponse, SessionSnapshot,
};
use jc_session::{LogEntry, OpError};
use serde::Serialize;
use std::sync::Arc;

use crate::{ApiResult, AppState, ErrorResponse, bad_request, internal_error};

#[derive(Debug, Serialize)]
pub(crate) struct ActivityLogResponse {
    pub(crate) entries: Vec<LogEntry>,
}

/// POST /connect — select the wallet account and resolve the job-creator
/// parameters. Holds the session lock for the whole operation, so the
/// three operations are serialized with respect to each other.
pub(crate) async fn connect(State(state): State<Arc<AppState>>) -> ApiResult<ConnectResponse> {
    let mut session = state.session.lock().await;
    let outcome = jc_session::connect(
        state.provider.as_ref(),
        state.config.controller_address,
        &mut session,
        &state.log,
    )
    .await
    .map_err(op_error)?;

    Ok(Json(ConnectResponse {
        account: outcome.account.to_string(),
        job_creator_address: outcome.job_creator.to_string(),
        token_address: outcome.token.map(|value| value.to_string()),
        required_deposit: outcome.required_deposit.map(|value| value.to_string()),
        controller_address: outcome.solver.map(|value| value.to_string()),
        ready: outcome.ready,
    }))
}

/// POST /approve — authorize the required deposit for the solver.
pub(crate) async fn approve(State(state): State<Arc<AppState>>) -> ApiResult<ApproveResponse> {
    let session = state.session.lock().await;
    let outcome = jc_session::approve(state.provider.as_ref(), &session, &state.log)
        .await
        .map_err(op_error)?;

    Ok(Json(ApproveResponse {
        controller_address: outcome.solver.to_string(),
        tx_hash: outcome.tx_hash.to_string(),
    }))
}

/// POST /run-job — submit a job with the given message.
pub(crate) async fn run_job(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RunJobRequest>,
) -> ApiResult<RunJobResponse> {
    let session = state.session.lock().await;
    let outcome = jc_session::run_job(
        state.provider.as_ref(),
        &session,
        &request.message,
        request.module.as_deref(),
        &state.log,
    )
    .await
    .map_err(op_error)?;

    Ok(Json(RunJobResponse {
        tx_hash: outcome.tx_hash.to_string(),
        job_id: outcome.job_id.map(|id| id.to_string()),
    }))
}

/// GET /session — current session values and readiness.
pub(crate) async fn session_snapshot(
    State(state): State<Arc<AppState>>,
) -> Json<SessionSnapshot> {
    let session = state.session.lock().await;
    Json(session.snapshot())
}

/// GET /log — the full activity log in arrival order.
pub(crate) async fn activity_log(State(state): State<Arc<AppState>>) -> Json<ActivityLogResponse> {
    Json(ActivityLogResponse {
        entries: state.log.snapshot().await,
    })
}

fn op_error(err: OpError) -> (axum::http::StatusCode, Json<ErrorResponse>) {
    match err {
        OpError::UserInput(message) => bad_request(&message),
        other => internal_error(other),
    }
}
