//! Product endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use backoffice_core::{Product, ProductInput};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(input) = body?;
    let product = state.catalog().create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let Path(id) = id?;
    let Json(input) = body?;
    Ok(Json(state.catalog().update(&id, input).await?))
}

pub async fn deactivate(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    state.catalog().deactivate(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Product>> {
    let Path(id) = id?;
    Ok(Json(state.catalog().get(&id).await?))
}

pub async fn list_all(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.catalog().list_all().await?))
}

pub async fn list_active(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.catalog().list_active().await?))
}
