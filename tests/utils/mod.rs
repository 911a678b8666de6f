use bankid_client::client::BankIdClient;
use bankid_client::telemetry;
use bankid_client::tls::{TestCredentials, TlsIdentity, generate_test_credentials};
use wiremock::MockServer;

/// Starts a mock API server and a client pointed at it.
pub async fn spawn_api() -> (MockServer, BankIdClient) {
    telemetry::init_tracing();

    let server = MockServer::start().await;
    let client = BankIdClient::new(server.uri(), test_identity());

    (server, client)
}

#[allow(dead_code)]
pub fn test_identity() -> TlsIdentity {
    let TestCredentials {
        client_cert,
        client_key,
        ca_cert,
    } = generate_test_credentials();

    TlsIdentity::from_pem(client_cert, client_key, ca_cert)
}
