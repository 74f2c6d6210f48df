use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use moonwallet_core::HandlerError;
use serde_json::json;

/// Transport-layer wrapper: maps the handler taxonomy onto HTTP statuses and
/// the `{"error": {"code", "message"}}` wire shape.
#[derive(Debug)]
pub struct ApiError(pub HandlerError);

impl From<HandlerError> for ApiError {
    fn from(e: HandlerError) -> Self {
        ApiError(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            HandlerError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            HandlerError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            HandlerError::Provider(_) => StatusCode::BAD_GATEWAY,
            HandlerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HandlerError::SyncOverflow(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.0.code(), error = %self.0, "request failed");
        } else {
            tracing::warn!(code = self.0.code(), error = %self.0, "request rejected");
        }
        let body = json!({
            "error": {
                "code": self.0.code(),
                "message": self.0.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            ApiError(HandlerError::AuthenticationRequired).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError(HandlerError::MissingParameter("public_token")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(HandlerError::Provider("x".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError(HandlerError::SyncOverflow(50)).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }
}
