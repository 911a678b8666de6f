//! HTTP transport used to reach the API.
//!
//! The transport carries no protocol knowledge beyond HTTP: it posts
//! JSON bytes and reports whatever status and body came back. Any HTTP
//! status is a success at this layer; errors here mean the exchange
//! itself failed. Cancelling the future of an in-flight call aborts
//! the request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument};

use crate::error::TransportError;
use crate::tls::TlsIdentity;

/// End-to-end time limit for one API call unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Raw HTTP response handed back to the decoding layer.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Performs one POST of a JSON body against an absolute URL.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &str, body: Vec<u8>) -> Result<RawResponse, TransportError>;
}

/// [`Transport`] backed by a reqwest client configured for mutual TLS.
///
/// Server certificates are verified against the CA bundle of the
/// [`TlsIdentity`] only; the system trust store is disabled.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds the HTTP client from the RP's TLS identity, with the
    /// default timeout.
    pub fn new(identity: &TlsIdentity) -> Result<Self, TransportError> {
        Self::with_timeout(identity, DEFAULT_TIMEOUT)
    }

    /// Builds the HTTP client with an explicit end-to-end timeout.
    pub fn with_timeout(
        identity: &TlsIdentity,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client_identity =
            reqwest::Identity::from_pem(identity.identity_pem()).map_err(TransportError::Build)?;
        let roots =
            reqwest::Certificate::from_pem_bundle(identity.ca_pem()).map_err(TransportError::Build)?;

        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .identity(client_identity)
            .tls_built_in_root_certs(false)
            .timeout(timeout);
        for root in roots {
            builder = builder.add_root_certificate(root);
        }

        let client = builder.build().map_err(TransportError::Build)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, body))]
    async fn post(&self, url: &str, body: Vec<u8>) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|source| classify(url, source))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|source| classify(url, source))?
            .to_vec();
        debug!(status, bytes = body.len(), "api call returned");

        Ok(RawResponse { status, body })
    }
}

fn classify(url: &str, source: reqwest::Error) -> TransportError {
    let url = url.to_owned();
    if source.is_timeout() {
        TransportError::Timeout { url, source }
    } else if source.is_connect() {
        TransportError::Connect { url, source }
    } else {
        TransportError::Request { url, source }
    }
}
