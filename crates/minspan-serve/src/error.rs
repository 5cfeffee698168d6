//! Request errors and their HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Everything a request can fail with.
///
/// The `Display` text is what clients see in the `error` field.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The body is missing or is not JSON.
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    /// The JSON body has no `points` key.
    #[error("points not found")]
    PointsNotFound,

    /// `points` is not a JSON array.
    #[error("data is not a list")]
    NotAList,

    /// An element of `points` is not a JSON array.
    #[error("found non-list point")]
    NonListPoint,

    /// A point does not have exactly two coordinates.
    #[error("found non-2d point")]
    NonTwoDimensionalPoint,

    /// A coordinate is not a JSON number.
    #[error("found non-numeric point")]
    NonNumericPoint,

    /// More points than the server is configured to accept.
    #[error("too many points: {count} exceeds the limit of {max}")]
    TooManyPoints {
        /// Points received.
        count: usize,
        /// Configured limit.
        max: usize,
    },

    /// The computation task failed to complete.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Self::PointsNotFound
            | Self::NotAList
            | Self::NonListPoint
            | Self::NonTwoDimensionalPoint
            | Self::NonNumericPoint
            | Self::TooManyPoints { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_unprocessable() {
        for err in [
            ApiError::PointsNotFound,
            ApiError::NotAList,
            ApiError::NonListPoint,
            ApiError::NonTwoDimensionalPoint,
            ApiError::NonNumericPoint,
            ApiError::TooManyPoints { count: 3, max: 2 },
        ] {
            assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY, "{err}");
        }
    }

    #[test]
    fn bad_json_is_a_bad_request() {
        let err = ApiError::InvalidJson("EOF while parsing".to_owned());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "invalid JSON body: EOF while parsing");
    }

    #[test]
    fn messages_match_the_wire_contract() {
        assert_eq!(ApiError::PointsNotFound.to_string(), "points not found");
        assert_eq!(ApiError::NotAList.to_string(), "data is not a list");
        assert_eq!(ApiError::NonListPoint.to_string(), "found non-list point");
        assert_eq!(ApiError::NonTwoDimensionalPoint.to_string(), "found non-2d point");
        assert_eq!(ApiError::NonNumericPoint.to_string(), "found non-numeric point");
    }

    #[test]
    fn internal_errors_map_to_500() {
        let response = ApiError::Internal("task panicked".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
