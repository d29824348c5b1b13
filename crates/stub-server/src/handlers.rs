//! Route handlers.
//!
//! Every prescription route checks the credential first, then the request body.

use crate::auth::{reject, require_token, Rejection};
use crate::state::StubState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use rx_core::constants::DEFAULT_PAGE_LIMIT;
use rx_core::{
    ApiResponse, IssueRequest, LoginData, LoginRequest, MedicinesPage, Patient, Prescription,
    PrescriptionReceipt,
};
use serde::Deserialize;

type Reply<T> = Result<Json<ApiResponse<T>>, Rejection>;

#[axum::debug_handler]
pub async fn health() -> Json<ApiResponse<()>> {
    Json(ApiResponse {
        success: true,
        data: None,
        message: "Prescription stub backend is alive".into(),
    })
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<StubState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Reply<LoginData> {
    let Json(request) = body.map_err(|e| reject(StatusCode::BAD_REQUEST, e.body_text()))?;
    match state.login(&request) {
        Some(data) => {
            tracing::info!("login for {}", request.email);
            Ok(Json(ApiResponse::ok(data, "Login successful")))
        }
        None => {
            tracing::warn!("failed login for {}", request.email);
            Err(reject(StatusCode::UNAUTHORIZED, "Invalid email or password"))
        }
    }
}

#[axum::debug_handler]
pub async fn medicines(State(state): State<StubState>, headers: HeaderMap) -> Reply<MedicinesPage> {
    require_token(&state, &headers)?;
    Ok(Json(ApiResponse::ok(state.medicines(), "")))
}

#[axum::debug_handler]
pub async fn mock_patient(State(state): State<StubState>, headers: HeaderMap) -> Reply<Patient> {
    require_token(&state, &headers)?;
    Ok(Json(ApiResponse::ok(state.mock_patient(), "")))
}

#[axum::debug_handler]
pub async fn issue_prescription(
    State(state): State<StubState>,
    headers: HeaderMap,
    body: Result<Json<IssueRequest>, JsonRejection>,
) -> Reply<PrescriptionReceipt> {
    require_token(&state, &headers)?;
    let Json(request) = body.map_err(|e| {
        tracing::warn!("rejected issue request: {}", e.body_text());
        reject(StatusCode::UNPROCESSABLE_ENTITY, e.body_text())
    })?;

    let receipt = state.issue(&request);
    Ok(Json(ApiResponse::ok(
        receipt,
        "Prescription issued successfully",
    )))
}

#[axum::debug_handler]
pub async fn prescription_status(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply<PrescriptionReceipt> {
    require_token(&state, &headers)?;
    state
        .status(&id)
        .map(|receipt| Json(ApiResponse::ok(receipt, "")))
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Prescription not found"))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    limit: Option<u32>,
    skip: Option<u32>,
}

#[axum::debug_handler]
pub async fn list_prescriptions(
    State(state): State<StubState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Reply<Vec<Prescription>> {
    require_token(&state, &headers)?;
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_LIMIT) as usize;
    let skip = params.skip.unwrap_or(0) as usize;
    Ok(Json(ApiResponse::ok(state.list(limit, skip), "")))
}
