use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Failure to acquire the route feed. Callers normally collapse this into an
/// absent feed via `FeedClient::acquire`.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Feed responded with status {0}")]
    Status(u16),
    #[error("Invalid feed JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("SVG generation failed: {0}")]
    SvgError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("PNG rendering failed: {0}")]
    RenderFailed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Render(_) | AppError::Raster(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
