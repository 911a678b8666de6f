mod cert_utils;
mod errors;

pub use cert_utils::*;
pub use errors::IdentityError;

use std::fmt;
use std::fs;
use std::path::Path;

use openssl::pkcs12::Pkcs12;

/// Client-side material for mutual TLS against the API.
///
/// The API authenticates the RP through a client certificate, and its
/// server certificate chains to a dedicated root that is not in the
/// system trust store. Both halves are therefore mandatory: the
/// identity presented to the server and the CA bundle used to verify
/// it.
///
/// The identity is usually issued as a PKCS#12 archive; PEM pairs are
/// accepted as well.
#[derive(Clone)]
pub struct TlsIdentity {
    /// Private key followed by the client certificate chain, PEM.
    identity_pem: Vec<u8>,
    /// Root CA bundle the server certificate must chain to, PEM.
    ca_pem: Vec<u8>,
}

impl TlsIdentity {
    /// Creates an identity from PEM encoded data.
    ///
    /// # Arguments
    ///
    /// * `cert_chain` - Client certificate chain in PEM format.
    /// * `key` - Client private key in PEM format.
    /// * `ca_cert` - Root CA bundle for server verification, in PEM format.
    pub fn from_pem(
        cert_chain: impl Into<Vec<u8>>,
        key: impl Into<Vec<u8>>,
        ca_cert: impl Into<Vec<u8>>,
    ) -> Self {
        let mut identity_pem = key.into();
        if !identity_pem.ends_with(b"\n") {
            identity_pem.push(b'\n');
        }
        identity_pem.extend(cert_chain.into());

        Self {
            identity_pem,
            ca_pem: ca_cert.into(),
        }
    }

    /// Creates an identity from a PKCS#12 archive.
    ///
    /// The archive must hold the client certificate and its private
    /// key; intermediate certificates bundled with it are kept in the
    /// presented chain. The root CA for server verification is never
    /// part of the archive and is supplied separately.
    pub fn from_pkcs12(
        der: &[u8],
        passphrase: &str,
        ca_cert: impl Into<Vec<u8>>,
    ) -> Result<Self, IdentityError> {
        let parsed = Pkcs12::from_der(der)?.parse2(passphrase)?;
        let cert = parsed.cert.ok_or(IdentityError::MissingCertificate)?;
        let key = parsed.pkey.ok_or(IdentityError::MissingKey)?;

        let mut identity_pem = key.private_key_to_pem_pkcs8()?;
        identity_pem.extend(cert.to_pem()?);
        if let Some(chain) = parsed.ca {
            for link in &chain {
                identity_pem.extend(link.to_pem()?);
            }
        }

        Ok(Self {
            identity_pem,
            ca_pem: ca_cert.into(),
        })
    }

    /// Reads a PKCS#12 archive and a PEM CA bundle from disk.
    pub fn from_pkcs12_file(
        path: impl AsRef<Path>,
        passphrase: &str,
        ca_path: impl AsRef<Path>,
    ) -> Result<Self, IdentityError> {
        let bundle = read_file(path.as_ref())?;
        let ca_cert = read_file(ca_path.as_ref())?;
        Self::from_pkcs12(&bundle, passphrase, ca_cert)
    }

    /// Reads PEM encoded certificate, key and CA bundle from disk.
    pub fn from_pem_files(
        cert_path: impl AsRef<Path>,
        key_path: impl AsRef<Path>,
        ca_path: impl AsRef<Path>,
    ) -> Result<Self, IdentityError> {
        Ok(Self::from_pem(
            read_file(cert_path.as_ref())?,
            read_file(key_path.as_ref())?,
            read_file(ca_path.as_ref())?,
        ))
    }

    pub(crate) fn identity_pem(&self) -> &[u8] {
        &self.identity_pem
    }

    pub(crate) fn ca_pem(&self) -> &[u8] {
        &self.ca_pem
    }
}

// The identity buffer contains the private key; keep it out of logs.
impl fmt::Debug for TlsIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsIdentity").finish_non_exhaustive()
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, IdentityError> {
    fs::read(path).map_err(|source| IdentityError::Read {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pem_identity_holds_key_and_chain() {
        let credentials = generate_test_credentials();
        let identity = TlsIdentity::from_pem(
            credentials.client_cert.clone(),
            credentials.client_key.clone(),
            credentials.ca_cert.clone(),
        );

        let pem = String::from_utf8(identity.identity_pem().to_vec()).unwrap();
        assert!(pem.contains("BEGIN PRIVATE KEY"));
        assert!(pem.contains("BEGIN CERTIFICATE"));

        assert!(reqwest::Identity::from_pem(identity.identity_pem()).is_ok());
        assert!(reqwest::Certificate::from_pem(identity.ca_pem()).is_ok());
    }

    #[test]
    fn test_pkcs12_identity_carries_the_bundled_chain() {
        let credentials = generate_test_credentials();
        let bundle = credentials.to_pkcs12("qwerty123");

        let identity =
            TlsIdentity::from_pkcs12(&bundle, "qwerty123", credentials.ca_cert.clone()).unwrap();

        let pem = String::from_utf8(identity.identity_pem().to_vec()).unwrap();
        assert!(pem.contains("BEGIN PRIVATE KEY"));
        // Client certificate plus the bundled CA link.
        assert_eq!(pem.matches("BEGIN CERTIFICATE").count(), 2);

        assert!(reqwest::Identity::from_pem(identity.identity_pem()).is_ok());
    }

    #[test]
    fn test_wrong_passphrase_is_rejected() {
        let credentials = generate_test_credentials();
        let bundle = credentials.to_pkcs12("right");

        assert!(TlsIdentity::from_pkcs12(&bundle, "wrong", credentials.ca_cert.clone()).is_err());
    }

    #[test]
    fn test_missing_file_reports_its_path() {
        let err = TlsIdentity::from_pkcs12_file("/does/not/exist.p12", "pw", "/does/not/exist.pem")
            .unwrap_err();

        assert!(matches!(err, IdentityError::Read { ref path, .. } if path.contains("exist.p12")));
    }

    #[test]
    fn test_debug_never_prints_key_material() {
        let credentials = generate_test_credentials();
        let identity = TlsIdentity::from_pem(
            credentials.client_cert,
            credentials.client_key,
            credentials.ca_cert,
        );

        let rendered = format!("{identity:?}");
        assert!(!rendered.contains("PRIVATE KEY"));
    }
}
