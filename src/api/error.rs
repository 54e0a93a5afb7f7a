use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use snafu::{Location, Snafu};

use crate::media::MediaError;
use crate::store::StoreError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ApiError {
    #[snafu(display("rating must be between 1 and 5, got {value}"))]
    InvalidRating { value: u8 },

    #[snafu(display("`{link}` is not a recognized share link"))]
    UnrecognizedLink { link: String },

    /// the persistence layer rejected the operation
    Store {
        source: StoreError,
        #[snafu(implicit)]
        location: Location,
    },

    /// the thumbnail could not be processed
    Media {
        source: MediaError,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRating { .. } | ApiError::UnrecognizedLink { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Store { source, .. } => match source {
                StoreError::OversizedThumbnail { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                StoreError::EmptyResponse { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_GATEWAY,
            },
            ApiError::Media { source, .. } => match source {
                MediaError::CorruptImage { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                MediaError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                MediaError::Encode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
