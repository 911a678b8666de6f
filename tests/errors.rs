mod utils;

use std::time::Duration;

use bankid_client::client::BankIdClient;
use bankid_client::error::{Error, IntegrityError, TransportError};
use bankid_client::payload::AuthenticationPayload;
use bankid_client::response::ErrorCode;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_documented_error_status_surfaces_the_api_error() {
    let (server, client) = utils::spawn_api().await;

    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(400).set_body_raw(
            r#"{"errorCode":"invalidParameters","details":"Invalid endUserIp"}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let err = client
        .authenticate(&AuthenticationPayload {
            end_user_ip: "192.168.1.1".to_owned(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    match err {
        Error::Api(api) => {
            assert_eq!(api.error_code, ErrorCode::InvalidParameters);
            assert_eq!(api.http_status, 400);
            assert_eq!(api.details, "Invalid endUserIp");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_undocumented_status_carries_code_and_raw_body() {
    let (server, client) = utils::spawn_api().await;

    Mock::given(method("POST"))
        .and(path("/collect"))
        .respond_with(ResponseTemplate::new(504).set_body_string("upstream gave up"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.collect("any-order").await.unwrap_err();

    match err {
        Error::Integrity(IntegrityError::UnexpectedStatus { code, body }) => {
            assert_eq!(code, 504);
            assert_eq!(body, "upstream gave up");
        }
        other => panic!("expected integrity failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_response_field_fails_the_strict_decode() {
    let (server, client) = utils::spawn_api().await;

    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{
                "autoStartToken": "t1",
                "orderRef": "r1",
                "qrStartToken": "q1",
                "qrStartSecret": "s1",
                "newField": "from a future api version"
            }"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let err = client
        .authenticate(&AuthenticationPayload {
            end_user_ip: "192.168.1.1".to_owned(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Integrity(IntegrityError::Decode { .. })
    ));
}

#[tokio::test]
async fn test_rejected_payload_never_reaches_the_server() {
    let (server, client) = utils::spawn_api().await;

    // Any request arriving here fails the test when the server drops.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client
        .authenticate(&AuthenticationPayload {
            end_user_ip: "999.999.999.999".to_owned(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    match err {
        Error::Validation(failure) => {
            assert_eq!(failure.violations[0].field, "end_user_ip");
            assert_eq!(failure.violations[0].code, "ip");
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_response_is_reported_as_a_timeout() {
    let server = MockServer::start().await;
    let client = BankIdClient::new(server.uri(), utils::test_identity())
        .with_timeout(Duration::from_millis(100));

    Mock::given(method("POST"))
        .and(path("/collect"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let err = client.collect("any-order").await.unwrap_err();

    assert!(matches!(
        err,
        Error::Transport(TransportError::Timeout { .. })
    ));
}
