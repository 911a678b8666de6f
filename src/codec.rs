//! Classification and decoding of raw service responses.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ApiError, Error, IntegrityError, Result};

/// HTTP status codes the API documents for its endpoints.
///
/// A response with any other status is treated as a breach of the wire
/// contract rather than a domain error, even when the status would
/// normally signal a client or server problem.
pub const DOCUMENTED_STATUS_CODES: [u16; 9] = [200, 400, 401, 403, 404, 408, 415, 500, 503];

/// Turns a raw status and body into a typed response.
///
/// Documented success statuses decode the expected shape strictly, so a
/// body with unknown or missing fields is rejected. Documented error
/// statuses decode the API error shape and surface as [`Error::Api`].
pub fn decode<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T> {
    if !DOCUMENTED_STATUS_CODES.contains(&status) {
        warn!(status, "response status is outside the documented set");
        return Err(IntegrityError::UnexpectedStatus {
            code: status,
            body: String::from_utf8_lossy(body).into_owned(),
        }
        .into());
    }

    if (200..300).contains(&status) {
        return serde_json::from_slice(body).map_err(|source| decode_failure(source, body));
    }

    let mut api_error: ApiError =
        serde_json::from_slice(body).map_err(|source| decode_failure(source, body))?;
    api_error.http_status = status;
    debug!(status, error_code = %api_error.error_code, "api reported a domain error");
    Err(Error::Api(api_error))
}

fn decode_failure(source: serde_json::Error, body: &[u8]) -> Error {
    warn!(%source, "response body did not match the documented shape");
    IntegrityError::Decode {
        source,
        body: String::from_utf8_lossy(body).into_owned(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{CollectResponse, ErrorCode, OrderResponse};

    #[test]
    fn test_documented_success_status_decodes_the_body() {
        let body = include_str!("../test_data/auth_response.json");
        let response: OrderResponse = decode(200, body.as_bytes()).unwrap();
        assert_eq!(response.order_ref, "131daac9-16c6-4618-beb0-365768f37288");
    }

    #[test]
    fn test_undocumented_status_fails_integrity_before_body_inspection() {
        let err = decode::<OrderResponse>(504, b"Gateway Timeout").unwrap_err();
        assert!(err.to_string().contains("invalid http response. http code: 504"));
        match err {
            Error::Integrity(IntegrityError::UnexpectedStatus { code, body }) => {
                assert_eq!(code, 504);
                assert_eq!(body, "Gateway Timeout");
            }
            other => panic!("expected integrity error, got {other:?}"),
        }
    }

    #[test]
    fn test_undocumented_4xx_status_is_not_a_domain_error() {
        let err = decode::<CollectResponse>(429, b"slow down").unwrap_err();
        assert!(matches!(
            err,
            Error::Integrity(IntegrityError::UnexpectedStatus { code: 429, .. })
        ));
    }

    #[test]
    fn test_documented_error_status_decodes_the_api_error() {
        let body = br#"{"errorCode":"invalidParameters","details":"Invalid userVisibleData"}"#;
        let err = decode::<OrderResponse>(400, body).unwrap_err();
        match err {
            Error::Api(api) => {
                assert_eq!(api.http_status, 400);
                assert_eq!(api.error_code, ErrorCode::InvalidParameters);
                assert_eq!(api.details, "Invalid userVisibleData");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn test_maintenance_error_is_a_domain_error() {
        let body = br#"{"errorCode":"maintenance","details":"The service is temporarily out of service"}"#;
        let err = decode::<CollectResponse>(503, body).unwrap_err();
        assert!(matches!(err, Error::Api(api) if api.error_code == ErrorCode::Maintenance));
    }

    #[test]
    fn test_malformed_success_body_preserves_the_body_for_diagnosis() {
        let err = decode::<OrderResponse>(200, b"<html>login page</html>").unwrap_err();
        match err {
            Error::Integrity(IntegrityError::Decode { body, .. }) => {
                assert_eq!(body, "<html>login page</html>");
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_body_with_unknown_fields_fails_integrity() {
        let body = br#"{"errorCode":"internalError","details":"x","traceId":"abc"}"#;
        let err = decode::<OrderResponse>(500, body).unwrap_err();
        assert!(matches!(err, Error::Integrity(IntegrityError::Decode { .. })));
    }
}
