//! Response helpers. Records go out bare (no envelope); the client reads them directly.

use axum::{http::StatusCode, Json};
use serde::Serialize;

pub const DELETED_MESSAGE: &str = "Item deleted successfully";

#[derive(Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn deleted() -> (StatusCode, Json<MessageBody>) {
    (
        StatusCode::OK,
        Json(MessageBody {
            message: DELETED_MESSAGE,
        }),
    )
}
