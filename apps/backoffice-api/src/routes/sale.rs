//! Sale endpoints.
//!
//! Create and update take the bare item list as the body:
//! `[{"productId": "...", "quantity": 2}, ...]`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use backoffice_core::{Sale, SaleLineRequest};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Vec<SaleLineRequest>>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Sale>)> {
    let Json(lines) = body?;
    let sale = state.sales().create(lines).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<Vec<SaleLineRequest>>, JsonRejection>,
) -> ApiResult<Json<Sale>> {
    let Path(id) = id?;
    let Json(lines) = body?;
    Ok(Json(state.sales().update(&id, lines).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    state.sales().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Sale>> {
    let Path(id) = id?;
    Ok(Json(state.sales().get(&id).await?))
}

pub async fn list_all(State(state): State<AppState>) -> ApiResult<Json<Vec<Sale>>> {
    Ok(Json(state.sales().list_all().await?))
}
