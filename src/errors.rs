use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use serde_json::{Map, Value, json};
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Task not found")]
    NotFound,

    #[error("Validation Error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Bad Request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
            AppError::Migration(e) => {
                tracing::error!("Migration error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": "Task not found" })),
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Validation failed", "fields": field_messages(errors) }),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg })),
        };

        (status, Json(body)).into_response()
    }
}

/// Flattens validator output into `{ "field": ["message", ...] }`.
fn field_messages(errors: &ValidationErrors) -> Value {
    let mut fields = Map::new();

    for (field, failures) in errors.field_errors() {
        let messages = failures
            .iter()
            .map(|failure| match &failure.message {
                Some(message) => Value::String(message.to_string()),
                None => Value::String(format!("{field} is invalid ({})", failure.code)),
            })
            .collect();

        fields.insert(field.to_string(), Value::Array(messages));
    }

    Value::Object(fields)
}
