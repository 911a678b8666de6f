use std::net::IpAddr;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use crate::payload::UserData;

/// A Swedish personal identification number: exactly twelve digits.
pub(crate) static PERSONAL_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{12}$").unwrap());

const AUTH_VISIBLE_MAX: usize = 1_500;
const AUTH_NON_VISIBLE_MAX: usize = 1_500;
const SIGN_VISIBLE_MAX: usize = 40_000;
const SIGN_NON_VISIBLE_MAX: usize = 200_000;

/// The user IP as seen by the RP. IPv4 and IPv6 literals are allowed.
pub(crate) fn ip_literal(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<IpAddr>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("ip"))
}

pub(crate) fn auth_visible_data(value: &UserData) -> Result<(), ValidationError> {
    base64_length(value, AUTH_VISIBLE_MAX)
}

pub(crate) fn auth_non_visible_data(value: &UserData) -> Result<(), ValidationError> {
    base64_length(value, AUTH_NON_VISIBLE_MAX)
}

pub(crate) fn sign_visible_data(value: &UserData) -> Result<(), ValidationError> {
    if value.as_str().is_empty() {
        return Err(ValidationError::new("required"));
    }

    base64_length(value, SIGN_VISIBLE_MAX)
}

pub(crate) fn sign_non_visible_data(value: &UserData) -> Result<(), ValidationError> {
    base64_length(value, SIGN_NON_VISIBLE_MAX)
}

/// Limits apply to the base64 encoding that goes over the wire, not to
/// the raw text held in memory.
fn base64_length(value: &UserData, max: usize) -> Result<(), ValidationError> {
    if value.encoded_len() > max {
        return Err(ValidationError::new("base64Length"));
    }

    Ok(())
}
