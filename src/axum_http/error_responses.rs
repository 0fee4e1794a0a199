use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::usecases::{entitlements::EntitlementError, subscriptions::SubscriptionError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

fn render(status: StatusCode, message: String) -> Response {
    let body = Json(ErrorResponse {
        code: status.as_u16(),
        message,
    });

    (status, body).into_response()
}

impl IntoResponse for SubscriptionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            // Don't leak internal error detail to clients.
            SubscriptionError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        render(status, message)
    }
}

impl IntoResponse for EntitlementError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            EntitlementError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        render(status, message)
    }
}
