use std::result;

use serde::Deserialize;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::response::ErrorCode;
use crate::tls::IdentityError;

pub type Result<T> = result::Result<T, Error>;

/// Error raised while driving an order against the RP API.
///
/// The four areas are kept distinct so callers can react to each one
/// differently: fix the payload, retry the call, investigate the
/// deployment, or read the error code the service returned.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Integrity(#[from] IntegrityError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<IdentityError> for Error {
    fn from(error: IdentityError) -> Self {
        Error::Transport(TransportError::Identity(error))
    }
}

/// A payload was rejected before any network activity took place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("payload validation failed: {}", summarize(.violations))]
pub struct ValidationFailure {
    pub violations: Vec<FieldViolation>,
}

/// A single violated rule, named by the payload struct field it
/// applies to (`end_user_ip`, `requirement.personal_number`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldViolation {
    pub field: String,
    pub code: String,
}

impl From<ValidationErrors> for ValidationFailure {
    fn from(errors: ValidationErrors) -> Self {
        let mut violations = Vec::new();
        collect_violations(&errors, None, &mut violations);
        // HashMap iteration order is arbitrary
        violations.sort();
        Self { violations }
    }
}

fn collect_violations(
    errors: &ValidationErrors,
    prefix: Option<&str>,
    out: &mut Vec<FieldViolation>,
) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    out.push(FieldViolation {
                        field: path.clone(),
                        code: error.code.to_string(),
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_violations(nested, Some(&path), out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_violations(nested, Some(&format!("{path}[{index}]")), out);
                }
            }
        }
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|violation| format!("{} ({})", violation.field, violation.code))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The request never produced a usable HTTP response.
///
/// All variants are free of domain semantics; retrying is the caller's call.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("failed to construct the http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} timed out")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// The exchange violated the documented wire contract.
#[derive(Error, Debug)]
pub enum IntegrityError {
    /// The service answered with a status code outside the documented set.
    #[error("invalid http response. http code: {code}. body: {body}")]
    UnexpectedStatus { code: u16, body: String },
    /// A body that should match a documented shape did not decode.
    #[error("unable to decode response: {source}. body: {body}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },
    #[error("unable to encode payload: {0}")]
    Encode(#[source] serde_json::Error),
    /// A body that decoded cleanly but breaks a documented invariant.
    #[error("response breaks the protocol contract: {detail}")]
    Contract { detail: String },
}

/// Domain error reported by the RP API itself.
#[derive(Error, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[error("{error_code}: {details}")]
pub struct ApiError {
    /// HTTP status the error arrived with. Not part of the wire body.
    #[serde(skip)]
    pub http_status: u16,
    pub error_code: ErrorCode,
    #[serde(default)]
    pub details: String,
}
