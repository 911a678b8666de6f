//! The API client.
//!
//! One [`BankIdClient`] serves one API environment. Calls are
//! independent of each other; the only shared state is the HTTP
//! transport, which is built on first use and reused afterwards.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::instrument;

use crate::codec;
use crate::config::Config;
use crate::error::{IntegrityError, Result, TransportError, ValidationFailure};
use crate::operation::ApiRequest;
use crate::payload::{
    AuthenticationPayload, CancelPayload, CollectPayload, PhoneAuthenticationPayload,
    PhoneSignPayload, SignPayload,
};
use crate::response::{CancelResponse, CollectResponse, OrderResponse, PhoneOrderResponse};
use crate::tls::TlsIdentity;
use crate::transport::{DEFAULT_TIMEOUT, HttpTransport, Transport};

/// Client for the BankID RP API.
///
/// Every payload is validated locally, posted over mutual TLS and
/// decoded strictly. The client never polls and never retries; pacing
/// a collect loop and reacting to errors stay with the caller.
///
/// # Examples
///
/// ```no_run
/// use bankid_client::client::BankIdClient;
/// use bankid_client::config::TEST_API_URL;
/// use bankid_client::payload::AuthenticationPayload;
/// use bankid_client::tls::TlsIdentity;
///
/// # async fn run() -> bankid_client::error::Result<()> {
/// let identity = TlsIdentity::from_pkcs12_file("rp.p12", "qwerty123", "ca.pem")?;
/// let client = BankIdClient::new(TEST_API_URL, identity);
///
/// let order = client
///     .authenticate(&AuthenticationPayload {
///         end_user_ip: "192.168.1.1".into(),
///         ..Default::default()
///     })
///     .await?;
/// println!("started order {}", order.order_ref);
/// # Ok(())
/// # }
/// ```
pub struct BankIdClient {
    base_url: String,
    identity: TlsIdentity,
    timeout: Duration,
    transport: OnceCell<Arc<dyn Transport>>,
}

impl BankIdClient {
    /// Creates a client for the API at `base_url`.
    ///
    /// No connection is made here; the transport is built by the first
    /// call that needs it.
    pub fn new(base_url: impl Into<String>, identity: TlsIdentity) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            base_url,
            identity,
            timeout: DEFAULT_TIMEOUT,
            transport: OnceCell::new(),
        }
    }

    /// Creates a client from loaded configuration, reading the
    /// certificate material it points at.
    pub fn from_config(config: &Config) -> Result<Self> {
        let identity = config.certificate.load_identity()?;
        Ok(Self::new(&config.api.url, identity).with_timeout(config.api.timeout()))
    }

    /// Overrides the end-to-end timeout of one API call.
    ///
    /// Takes effect only before the transport is built.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the HTTP transport, bypassing the lazy build.
    ///
    /// Intended for tests that substitute the network.
    pub fn with_transport(self, transport: impl Transport + 'static) -> Self {
        Self {
            transport: OnceCell::new_with(Some(Arc::new(transport) as Arc<dyn Transport>)),
            ..self
        }
    }

    /// Starts an authentication order.
    pub async fn authenticate(&self, payload: &AuthenticationPayload) -> Result<OrderResponse> {
        self.send(payload).await
    }

    /// Starts a signing order.
    pub async fn sign(&self, payload: &SignPayload) -> Result<OrderResponse> {
        self.send(payload).await
    }

    /// Starts an authentication order for a user on a phone call.
    pub async fn phone_authenticate(
        &self,
        payload: &PhoneAuthenticationPayload,
    ) -> Result<PhoneOrderResponse> {
        self.send(payload).await
    }

    /// Starts a signing order for a user on a phone call.
    pub async fn phone_sign(&self, payload: &PhoneSignPayload) -> Result<PhoneOrderResponse> {
        self.send(payload).await
    }

    /// Fetches the current state of an order.
    ///
    /// The service recommends calling this every other second until a
    /// terminal status comes back; see
    /// [`RECOMMENDED_COLLECT_INTERVAL`](crate::order::RECOMMENDED_COLLECT_INTERVAL).
    pub async fn collect(&self, order_ref: &str) -> Result<CollectResponse> {
        self.send(&CollectPayload {
            order_ref: order_ref.to_owned(),
        })
        .await
    }

    /// Aborts an order in progress.
    pub async fn cancel(&self, order_ref: &str) -> Result<CancelResponse> {
        self.send(&CancelPayload {
            order_ref: order_ref.to_owned(),
        })
        .await
    }

    #[instrument(skip_all, fields(operation = %T::OPERATION))]
    async fn send<T: ApiRequest>(&self, payload: &T) -> Result<T::Response> {
        payload.validate().map_err(ValidationFailure::from)?;

        let body = serde_json::to_vec(payload).map_err(IntegrityError::Encode)?;
        let url = format!("{}/{}", self.base_url, T::OPERATION.path());

        let transport = self.transport().await?;
        let raw = transport.post(&url, body).await?;

        codec::decode(raw.status, &raw.body)
    }

    /// Builds the HTTP transport on first use.
    ///
    /// Concurrent first calls race to run the build, but all of them
    /// observe the same single instance.
    async fn transport(&self) -> Result<Arc<dyn Transport>> {
        let transport = self
            .transport
            .get_or_try_init(|| async {
                let transport = HttpTransport::with_timeout(&self.identity, self.timeout)?;
                Ok::<_, TransportError>(Arc::new(transport) as Arc<dyn Transport>)
            })
            .await?;
        Ok(transport.clone())
    }
}

impl fmt::Debug for BankIdClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BankIdClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
