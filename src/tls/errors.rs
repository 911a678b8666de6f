use std::io;

use openssl::error::ErrorStack;
use thiserror::Error;

/// Errors that can occur while assembling the RP's TLS identity.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error(transparent)]
    OpenSsl(#[from] ErrorStack),

    #[error("PKCS#12 bundle holds no client certificate")]
    MissingCertificate,

    #[error("PKCS#12 bundle holds no private key")]
    MissingKey,

    #[error("no client certificate material configured")]
    NotConfigured,

    #[error("no root CA bundle configured for server verification")]
    MissingCaBundle,

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
}
