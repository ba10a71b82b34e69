use super::parse_sku;
use crate::error::Result;
use crate::model::{CreateProductRequest, ProductResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lodestone_core::{InventoryError, RegisterProduct};

pub async fn create_product_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    let Json(request) = payload?;
    let sku = parse_sku(&request.sku)?;

    let record = state
        .allocator()
        .register(RegisterProduct {
            sku,
            name: request.name,
            description: request.description,
            category: request.category,
            stock: request.stock,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

pub async fn get_product_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>> {
    let sku = parse_sku(&code)?;

    match state.allocator().lookup(&sku).await? {
        Some(record) => Ok(Json(record.into())),
        None => Err(InventoryError::NotFound(format!("no product at {sku}")).into()),
    }
}

pub async fn delete_product_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    let sku = parse_sku(&code)?;

    if state.allocator().retire(&sku).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(InventoryError::NotFound(format!("no product at {sku}")).into())
    }
}
