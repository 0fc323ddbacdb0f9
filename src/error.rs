use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The similarity store (or the store behind a tier query) could not be reached.
    /// Retryable, unlike an empty result.
    #[error("Lookup unavailable: {0}")]
    LookupUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::LookupUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Cache(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ExternalApi(_) | AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::NotFound(msg) | AppError::InvalidInput(msg) | AppError::Unauthorized(msg) => {
                msg
            }
            AppError::LookupUnavailable(ref detail) => {
                tracing::warn!(detail = %detail, "Responding with lookup unavailable");
                "Recommendations are temporarily unavailable, please try again".to_string()
            }
            AppError::ExternalApi(msg) => msg,
            AppError::HttpClient(ref e) => {
                tracing::error!(error = %e, "Upstream request failed");
                "Upstream service request failed".to_string()
            }
            other => {
                tracing::error!(error = %other, "Request failed");
                other.to_string()
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::NotFound("video".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidInput("videoId".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::LookupUnavailable("timeout".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Unauthorized("no user".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::ExternalApi("youtube".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_lookup_unavailable_response_hides_detail() {
        let response =
            AppError::LookupUnavailable("connection refused to 10.0.0.4".into()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_http_client_response_is_generic() {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:1/videos?key=SECRETKEY123")
            .send()
            .await
            .unwrap_err();

        let response = AppError::HttpClient(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!body.contains("SECRETKEY123"));
        assert!(body.contains("Upstream service request failed"));
    }
}
