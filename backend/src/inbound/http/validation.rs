//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies carry raw strings; handlers lift them into domain newtypes
//! here so every failure surfaces as `INVALID_REQUEST` with
//! `details: {field, code}`.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use serde_json::json;
use tracing::debug;

use crate::domain::{Error, IdentifierValidationError, TeamValidationError};

/// Validation error codes produced by the HTTP layer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DetailCode {
    MalformedBody,
    MalformedQuery,
    DuplicateMember,
}

impl DetailCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MalformedBody => "malformed_body",
            Self::MalformedQuery => "malformed_query",
            Self::DuplicateMember => "duplicate_member",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code,
        }))
    }

    fn with_index(self, code: &str, index: usize) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "code": code,
        }))
    }
}

fn identifier_message(field: &str, err: &IdentifierValidationError) -> String {
    match err {
        IdentifierValidationError::Empty { .. } => format!("{field} must not be empty"),
        IdentifierValidationError::SurroundingWhitespace { .. } => {
            format!("{field} must not contain leading or trailing whitespace")
        }
        IdentifierValidationError::TooLong { max, .. } => {
            format!("{field} must be at most {max} characters")
        }
    }
}

/// Lift `value` into a domain newtype, reporting failures against `field`.
///
/// The wire field name may differ from the newtype's own field, as with
/// `old_user_id` wrapping a [`crate::domain::UserId`].
pub(crate) fn parse_identifier<T, F>(value: String, field: FieldName, parse: F) -> Result<T, Error>
where
    F: FnOnce(String) -> Result<T, IdentifierValidationError>,
{
    parse(value).map_err(|err| {
        let field = field.as_str();
        ValidationError::new(field, identifier_message(field, &err)).with_code(err.code())
    })
}

/// Like [`parse_identifier`] for an element of a JSON array.
pub(crate) fn parse_indexed_identifier<T, F>(
    value: String,
    field: FieldName,
    index: usize,
    parse: F,
) -> Result<T, Error>
where
    F: FnOnce(String) -> Result<T, IdentifierValidationError>,
{
    parse(value).map_err(|err| {
        let field = field.as_str();
        ValidationError::new(field, identifier_message(field, &err))
            .with_index(err.code(), index)
    })
}

pub(crate) fn team_validation_error(err: TeamValidationError) -> Error {
    match err {
        TeamValidationError::DuplicateMember { user_id } => ValidationError::new(
            "members",
            format!("user {user_id} appears more than once in members"),
        )
        .with_code(DetailCode::DuplicateMember.as_str()),
    }
}

/// Error handler for [`web::JsonConfig`] turning extractor failures into
/// `INVALID_REQUEST` envelopes.
pub(crate) fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected malformed JSON body");
    let error = Error::invalid_request(format!("invalid JSON body: {err}"))
        .with_details(json!({ "code": DetailCode::MalformedBody.as_str() }));
    actix_web::error::InternalError::from_response(err, actix_web::ResponseError::error_response(&error))
        .into()
}

/// Error handler for [`web::QueryConfig`].
pub(crate) fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected malformed query string");
    let error = Error::invalid_request(format!("invalid query string: {err}"))
        .with_details(json!({ "code": DetailCode::MalformedQuery.as_str() }));
    actix_web::error::InternalError::from_response(err, actix_web::ResponseError::error_response(&error))
        .into()
}

/// Extractor configuration shared by the server and handler tests.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Query extractor configuration shared by the server and handler tests.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}
