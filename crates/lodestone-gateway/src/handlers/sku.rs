use crate::error::Result;
use crate::model::{CheckSkuRequest, CheckSkuResponse, NextSkuResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use lodestone_core::{BackfillReport, SkuStatus};

pub async fn next_sku_handler(State(state): State<AppState>) -> Result<Json<NextSkuResponse>> {
    let sku = state.allocator().next_available().await?;
    Ok(Json(NextSkuResponse { sku }))
}

pub async fn check_sku_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CheckSkuRequest>, JsonRejection>,
) -> Result<Json<CheckSkuResponse>> {
    let Json(request) = payload?;
    let check = state.allocator().check(&request.sku).await?;

    Ok(Json(CheckSkuResponse {
        sku: request.sku,
        valid: check.valid,
        available: check.available,
    }))
}

pub async fn status_handler(State(state): State<AppState>) -> Result<Json<SkuStatus>> {
    Ok(Json(state.allocator().status().await?))
}

pub async fn backfill_handler(State(state): State<AppState>) -> Result<Json<BackfillReport>> {
    Ok(Json(state.allocator().backfill().await?))
}
