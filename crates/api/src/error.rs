use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dlmm_lp_execution::error::ExecutionError;
use dlmm_lp_optimization::error::RecommendError;
use thiserror::Error;
use tracing::error;

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Execution(e) => match e {
                ExecutionError::InsufficientBalance { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ExecutionError::ActiveBinOutOfRange { .. }
                | ExecutionError::StaleBinArrays { .. }
                | ExecutionError::Recommend(RecommendError::NoExistingRange { .. }) => {
                    StatusCode::CONFLICT
                }
                ExecutionError::Recommend(RecommendError::InvalidRange(_)) => {
                    StatusCode::BAD_REQUEST
                }
                ExecutionError::Recommend(RecommendError::ActiveBinUnavailable { .. })
                | ExecutionError::ActiveBinUnavailable { .. }
                | ExecutionError::BalanceUnavailable(_)
                | ExecutionError::BinArrayCheck(_) => StatusCode::SERVICE_UNAVAILABLE,
                ExecutionError::Upstream(_) | ExecutionError::Chat(_) => StatusCode::BAD_GATEWAY,
                ExecutionError::Transaction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            },
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::Execution(e) => match e {
                ExecutionError::InsufficientBalance { .. } => "insufficient_balance",
                ExecutionError::BalanceUnavailable(_) => "balance_unavailable",
                ExecutionError::ActiveBinUnavailable { .. }
                | ExecutionError::Recommend(RecommendError::ActiveBinUnavailable { .. }) => {
                    "active_bin_unavailable"
                }
                ExecutionError::Recommend(RecommendError::InvalidRange(_)) => "invalid_range",
                ExecutionError::Recommend(RecommendError::NoExistingRange { .. }) => {
                    "no_existing_range"
                }
                ExecutionError::ActiveBinOutOfRange { .. } => "active_bin_out_of_range",
                ExecutionError::BinArrayCheck(_) => "bin_array_check_failed",
                ExecutionError::StaleBinArrays { .. } => "stale_bin_arrays",
                ExecutionError::Upstream(_) => "upstream_unavailable",
                ExecutionError::Chat(_) => "chat_unavailable",
                ExecutionError::Transaction(_) => "transaction_failed",
            },
        }
    }

    fn message(&self) -> String {
        match self {
            Self::NotFound(m) | Self::BadRequest(m) => m.clone(),
            Self::Execution(e) => e.user_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        let body = serde_json::json!({
            "error": self.code(),
            "message": self.message(),
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
