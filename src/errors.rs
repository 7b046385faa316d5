//! # Error Handling for Search
//!
//! Two outcomes besides success, kept distinguishable:
//! - **Validation** (400): the caller sent something uninterpretable; the
//!   response names the parameter so the request can be corrected
//! - **Execution** (500): the store failed; details are logged server-side
//!   and the caller sees a generic message
//!
//! An unmatched filter is neither: it is an empty page.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use searchcrate::{ListingSearch, SearchError};
//!
//! async fn handler(search: &ListingSearch<MyStore>, params: SearchParams)
//!     -> Result<Json<PaginationEnvelope>, SearchError>
//! {
//!     Ok(Json(search.search(&params).await?))
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use crate::store::StoreError;
use crate::validation::ValidationError;

const EXECUTION_MESSAGE: &str = "Internal Server Error";

#[derive(Debug)]
pub enum SearchError {
    /// 400 Bad Request - a parameter could not be interpreted
    Validation(ValidationError),
    /// 500 Internal Server Error - the store call failed (details logged, not exposed)
    Execution(StoreError),
}

impl SearchError {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Execution(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the user-facing error message (sanitized)
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Execution(_) => EXECUTION_MESSAGE.to_string(),
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse {
    /// Error message
    error: String,
    /// Offending query parameter, for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::debug!(status = %status, error = %self.user_message(), "Search request failed");

        let response = ErrorResponse {
            error: self.user_message(),
            field: match &self {
                Self::Validation(err) => Some(err.field.clone()),
                Self::Execution(_) => None,
            },
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Execution(err) => Some(err),
        }
    }
}

impl From<ValidationError> for SearchError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<StoreError> for SearchError {
    fn from(err: StoreError) -> Self {
        Self::Execution(err)
    }
}
