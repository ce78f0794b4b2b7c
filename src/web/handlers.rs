//! HTTP request handlers for the web layer.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{FormRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::types::{format_balance, Account, AccountId, TransferRequest};

use super::{AppState, WebError};

/// Multipart field carrying the uploaded file
pub const UPLOAD_FIELD: &str = "file";

/// Where a successful upload redirects to
pub const LIST_PATH: &str = "/accounts/list";

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search_query: Option<String>,
}

impl SearchParams {
    fn query(&self) -> &str {
        self.search_query.as_deref().map(str::trim).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TransferFormResponse {
    pub account: Account,
    pub candidates: Vec<Account>,
}

#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub message: &'static str,
    pub from_balance: String,
    pub to_balance: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Accept a multipart upload and persist its accounts
///
/// The content type is taken from the `file` part; a part without one is
/// treated as `application/octet-stream` and rejected as unsupported.
/// Parsing and persisting run on the blocking pool.
pub async fn upload_accounts(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, WebError> {
    let mut multipart = multipart?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebError::bad_request(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| WebError::bad_request(e.body_text()))?;

        let ingestor = state.ingestor.clone();
        tokio::task::spawn_blocking(move || ingestor.upload(&bytes, &content_type))
            .await
            .map_err(|e| WebError::internal(format!("Upload task failed: {}", e)))??;
        return Ok(Redirect::to(LIST_PATH).into_response());
    }

    Err(WebError::bad_request("No file uploaded"))
}

pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Account>>, WebError> {
    let Query(params) = query?;
    Ok(Json(state.store.find_by_name_contains(params.query())?))
}

pub async fn search_accounts(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Account>>, WebError> {
    let Query(params) = query?;
    debug!(query = params.query(), "Searching accounts");
    Ok(Json(state.store.find_by_name_contains(params.query())?))
}

pub async fn account_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Account>, WebError> {
    find_account(&state, &id).map(Json)
}

/// Data for a transfer form: the source account and every other account
pub async fn transfer_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TransferFormResponse>, WebError> {
    let account = find_account(&state, &id)?;
    let candidates = state
        .store
        .find_by_name_contains("")?
        .into_iter()
        .filter(|candidate| candidate.id != account.id)
        .collect();

    Ok(Json(TransferFormResponse {
        account,
        candidates,
    }))
}

pub async fn transfer_query(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TransferRequest>, QueryRejection>,
) -> Result<Json<TransferResponse>, WebError> {
    let Query(request) = query?;
    execute_transfer(&state, &request)
}

pub async fn transfer_form_submit(
    State(state): State<Arc<AppState>>,
    form: Result<Form<TransferRequest>, FormRejection>,
) -> Result<Json<TransferResponse>, WebError> {
    let Form(request) = form?;
    execute_transfer(&state, &request)
}

fn execute_transfer(
    state: &AppState,
    request: &TransferRequest,
) -> Result<Json<TransferResponse>, WebError> {
    let outcome = state.engine.transfer(request)?;

    Ok(Json(TransferResponse {
        message: "Transfer successful",
        from_balance: format_balance(outcome.new_from_balance()),
        to_balance: format_balance(outcome.new_to_balance()),
    }))
}

fn find_account(state: &AppState, raw_id: &str) -> Result<Account, WebError> {
    let id = AccountId::parse_str(raw_id.trim()).map_err(|_| WebError::account_not_found())?;
    state
        .store
        .get(&id)?
        .ok_or_else(WebError::account_not_found)
}
