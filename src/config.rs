use std::{collections::HashMap, time::Duration};

use config::{Config as ConfigLib, ConfigError, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::tls::{IdentityError, TlsIdentity};

/// Base URL of the customer test environment.
pub const TEST_API_URL: &str = "https://appapi2.test.bankid.com/rp/v6.0";

/// Base URL of the production environment.
pub const PRODUCTION_API_URL: &str = "https://appapi2.bankid.com/rp/v6.0";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub certificate: CertificateConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API, without a trailing slash.
    pub url: String,
    pub timeout_seconds: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Where the RP's certificate material lives on disk.
///
/// Either a PKCS#12 archive or a PEM certificate/key pair must be
/// configured, together with the root CA bundle used to verify the
/// server. The archive takes precedence when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CertificateConfig {
    pub pkcs12_path: Option<String>,
    pub passphrase: Option<SecretString>,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
    pub ca_path: Option<String>,
}

impl CertificateConfig {
    /// Loads the TLS identity this configuration points at.
    pub fn load_identity(&self) -> Result<TlsIdentity, IdentityError> {
        enum Source<'a> {
            Pkcs12(&'a str),
            Pem(&'a str, &'a str),
        }

        let source = if let Some(path) = self.pkcs12_path.as_deref() {
            Source::Pkcs12(path)
        } else {
            match (self.cert_path.as_deref(), self.key_path.as_deref()) {
                (Some(cert), Some(key)) => Source::Pem(cert, key),
                _ => return Err(IdentityError::NotConfigured),
            }
        };
        let ca_path = self.ca_path.as_deref().ok_or(IdentityError::MissingCaBundle)?;

        match source {
            Source::Pkcs12(path) => {
                let passphrase = self
                    .passphrase
                    .as_ref()
                    .map(|secret| secret.expose_secret().to_owned())
                    .unwrap_or_default();
                TlsIdentity::from_pkcs12_file(path, &passphrase, ca_path)
            }
            Source::Pem(cert_path, key_path) => {
                TlsIdentity::from_pem_files(cert_path, key_path, ca_path)
            }
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_sources(None)
    }

    pub fn load_with_sources(
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigLib::builder()
            .set_default("api.url", TEST_API_URL)?
            .set_default("api.timeout_seconds", 60)?
            .add_source(File::with_name("config/settings").required(false));

        // If env_vars is provided, we use it instead of system environment
        // This is to avoid systems variables pollution across tests
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // Use system environment variables
            // Should be in the format BANKID_API__URL or BANKID_CERTIFICATE__PKCS12_PATH
            builder = builder.add_source(
                Environment::with_prefix("BANKID")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        builder.build()?.try_deserialize()
    }
}
