use crate::catalog::CatalogError;
use crate::explorer::ExplorerError;
use axum::http::StatusCode;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_loaded(view: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: format!("{view} data is not loaded"),
        }
    }
}

impl From<ExplorerError> for AppError {
    fn from(err: ExplorerError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
