//! HTTP error mapping for the pedidos API.
//!
//! All handlers return `Result<_, ApiError>` and this module is the single
//! place where outcomes become status codes and wire messages. Not-found
//! conditions carry a fixed message per entity; persistence failures are
//! logged server-side and surface only the operation's generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pedidos_core::CoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Generic message payload used by error responses and the delete
/// confirmation.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message, Portuguese on the wire.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message payload.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Error type returned by all API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The referenced customer does not exist.
    #[error("cliente not found")]
    ClienteNotFound,

    /// The referenced order does not exist.
    #[error("pedido not found")]
    PedidoNotFound,

    /// A persistence call failed. `context` is the operation's wire
    /// message; the underlying error never reaches the caller.
    #[error("{context}: {source}")]
    Database {
        /// Wire message for the failing operation.
        context: &'static str,
        /// Underlying repository error, logged server-side only.
        source: CoreError,
    },
}

impl ApiError {
    /// Returns a closure wrapping a repository error with the operation's
    /// wire message, for use with `map_err`.
    pub fn database(context: &'static str) -> impl FnOnce(CoreError) -> Self {
        move |source| Self::Database { context, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::ClienteNotFound => (StatusCode::NOT_FOUND, "Cliente não encontrado".to_string()),
            Self::PedidoNotFound => (StatusCode::NOT_FOUND, "Pedido não encontrado".to_string()),
            Self::Database { context, source } => {
                error!(error = %source, context, "persistence call failed");
                (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
            },
        };

        (status, Json(MessageResponse::new(message))).into_response()
    }
}
