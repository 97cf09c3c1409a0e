//! Error taxonomy shared by every operation. Callers always receive an
//! explicit success flag; failures carry a field map when one exists.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::schema::FieldErrors;
use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    /// One or more fields failed schema constraints; the collection was not
    /// touched.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// No stored record matched the identifier.
    #[error("{what} not found")]
    NotFound { what: &'static str },

    /// The backing store or an external service is not initialized or not
    /// reachable.
    #[error("{0}")]
    Unavailable(String),

    /// Data read back from a durable store or returned by an upstream
    /// service failed validation.
    #[error("upstream data failed validation: {0}")]
    UpstreamData(FieldErrors),
}

impl ActionError {
    pub fn not_found(what: &'static str) -> Self {
        ActionError::NotFound { what }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        ActionError::Unavailable(reason.into())
    }

    pub fn from_store(err: StoreError, what: &'static str) -> Self {
        match err {
            StoreError::NotFound => ActionError::NotFound { what },
            StoreError::Unavailable(reason) => ActionError::Unavailable(reason),
            StoreError::Corrupt(fields) => ActionError::UpstreamData(fields),
        }
    }

    fn fields(&self) -> Option<&FieldErrors> {
        match self {
            ActionError::Validation(fields) | ActionError::UpstreamData(fields) => Some(fields),
            _ => None,
        }
    }
}

impl From<FieldErrors> for ActionError {
    fn from(fields: FieldErrors) -> Self {
        ActionError::Validation(fields)
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a FieldErrors>,
}

impl actix_web::ResponseError for ActionError {
    fn status_code(&self) -> StatusCode {
        match self {
            ActionError::Validation(_) => StatusCode::BAD_REQUEST,
            ActionError::NotFound { .. } => StatusCode::NOT_FOUND,
            ActionError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ActionError::UpstreamData(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("request failed: {self}");
        }
        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            error: self.to_string(),
            fields: self.fields(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_into_the_taxonomy() {
        let err = ActionError::from_store(StoreError::NotFound, "service");
        assert_eq!(err, ActionError::not_found("service"));
        assert_eq!(err.to_string(), "service not found");

        let err = ActionError::from_store(StoreError::Unavailable("db down".to_string()), "salon");
        assert_eq!(err, ActionError::unavailable("db down"));
    }

    #[test]
    fn validation_errors_render_every_field() {
        let mut fields = FieldErrors::new();
        fields.insert("name", "is required");
        fields.insert("time", "must be a valid 24-hour time (HH:MM)");
        let err = ActionError::from(fields);
        let text = err.to_string();
        assert!(text.contains("name is required"));
        assert!(text.contains("time must be a valid 24-hour time"));
    }
}
