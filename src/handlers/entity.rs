//! Entity handlers: create, list, read, update, delete, search. Each delegates to the entity's controller.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::response::{created, deleted, ok};
use crate::service::ResourceController;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

pub async fn create(
    State(controller): State<ResourceController>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let record = controller.create(body).await?;
    Ok(created(record))
}

pub async fn list(State(controller): State<ResourceController>) -> Result<impl IntoResponse, AppError> {
    let records = controller.list().await?;
    Ok(ok(records))
}

pub async fn read(
    State(controller): State<ResourceController>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = controller.get(&id).await?;
    Ok(ok(record))
}

pub async fn update(
    State(controller): State<ResourceController>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let record = controller.update(&id, body).await?;
    Ok(ok(record))
}

pub async fn delete(
    State(controller): State<ResourceController>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    controller.delete(&id).await?;
    Ok(deleted())
}

pub async fn search(
    State(controller): State<ResourceController>,
    Path(query): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let records = controller.search(&query).await?;
    Ok(ok(records))
}
