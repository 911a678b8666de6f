//! Status and code vocabularies used in collect responses and API errors.
//!
//! Hint and error codes are open sets: the service may introduce new
//! codes at any time, so unrecognized values are preserved verbatim
//! instead of failing the decode.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Overall state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// The order is being processed.
    Pending,
    /// The order is complete and holds completion data.
    Complete,
    /// Something went wrong with the order.
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Complete => "complete",
            OrderStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress detail for pending orders and failure cause for failed ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HintCode {
    /// The order is pending, no client has yet received the order.
    OutstandingTransaction,
    /// The order is pending, but no client with a usable BankID started
    /// within a reasonable time.
    NoClient,
    /// The order is pending and a client has received it.
    Started,
    /// The client is reading a machine readable travel document.
    UserMrtd,
    /// The user is asked to confirm the phone call origin.
    UserCallConfirm,
    /// The order is pending, waiting for the user to identify with
    /// their security code or biometrics.
    UserSign,
    /// The order is being processed after user identification.
    Processing,
    /// The order has expired.
    ExpiredTransaction,
    /// The BankID on the user's device is invalid.
    CertificateErr,
    /// The user declined the order.
    UserCancel,
    /// The order was cancelled by a cancel request.
    Cancelled,
    /// The client could not be started with the automatic start token.
    StartFailed,
    /// The user indicated the phone call was not expected.
    UserDeclinedCall,
    /// The order was not supported by the user's client app version.
    NotSupportedByUserApp,
    /// The risk for the transaction was too high.
    TransactionRiskBlocked,
    /// A code this library does not recognize, preserved verbatim.
    Unknown(String),
}

impl HintCode {
    pub fn as_str(&self) -> &str {
        match self {
            HintCode::OutstandingTransaction => "outstandingTransaction",
            HintCode::NoClient => "noClient",
            HintCode::Started => "started",
            HintCode::UserMrtd => "userMrtd",
            HintCode::UserCallConfirm => "userCallConfirm",
            HintCode::UserSign => "userSign",
            HintCode::Processing => "processing",
            HintCode::ExpiredTransaction => "expiredTransaction",
            HintCode::CertificateErr => "certificateErr",
            HintCode::UserCancel => "userCancel",
            HintCode::Cancelled => "cancelled",
            HintCode::StartFailed => "startFailed",
            HintCode::UserDeclinedCall => "userDeclinedCall",
            HintCode::NotSupportedByUserApp => "notSupportedByUserApp",
            HintCode::TransactionRiskBlocked => "transactionRiskBlocked",
            HintCode::Unknown(code) => code,
        }
    }
}

impl From<String> for HintCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "outstandingTransaction" => HintCode::OutstandingTransaction,
            "noClient" => HintCode::NoClient,
            "started" => HintCode::Started,
            "userMrtd" => HintCode::UserMrtd,
            "userCallConfirm" => HintCode::UserCallConfirm,
            "userSign" => HintCode::UserSign,
            "processing" => HintCode::Processing,
            "expiredTransaction" => HintCode::ExpiredTransaction,
            "certificateErr" => HintCode::CertificateErr,
            "userCancel" => HintCode::UserCancel,
            "cancelled" => HintCode::Cancelled,
            "startFailed" => HintCode::StartFailed,
            "userDeclinedCall" => HintCode::UserDeclinedCall,
            "notSupportedByUserApp" => HintCode::NotSupportedByUserApp,
            "transactionRiskBlocked" => HintCode::TransactionRiskBlocked,
            _ => HintCode::Unknown(code),
        }
    }
}

impl From<HintCode> for String {
    fn from(code: HintCode) -> Self {
        code.as_str().to_owned()
    }
}

impl fmt::Display for HintCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine readable error code carried in API error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    /// An order for the same user is already in progress.
    AlreadyInProgress,
    /// The request payload was rejected by the service.
    InvalidParameters,
    /// The relying party certificate was rejected.
    Unauthorized,
    /// The endpoint does not exist.
    NotFound,
    /// Only HTTP POST is allowed.
    MethodNotAllowed,
    /// The request took too long to deliver.
    RequestTimeout,
    /// The request body had the wrong media type.
    UnsupportedMediaType,
    /// Internal error in the service.
    InternalError,
    /// The service is temporarily unavailable.
    Maintenance,
    /// A code this library does not recognize, preserved verbatim.
    Unknown(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::AlreadyInProgress => "alreadyInProgress",
            ErrorCode::InvalidParameters => "invalidParameters",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::NotFound => "notFound",
            ErrorCode::MethodNotAllowed => "methodNotAllowed",
            ErrorCode::RequestTimeout => "requestTimeout",
            ErrorCode::UnsupportedMediaType => "unsupportedMediaType",
            ErrorCode::InternalError => "internalError",
            ErrorCode::Maintenance => "maintenance",
            ErrorCode::Unknown(code) => code,
        }
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "alreadyInProgress" => ErrorCode::AlreadyInProgress,
            "invalidParameters" => ErrorCode::InvalidParameters,
            "unauthorized" => ErrorCode::Unauthorized,
            "notFound" => ErrorCode::NotFound,
            "methodNotAllowed" => ErrorCode::MethodNotAllowed,
            "requestTimeout" => ErrorCode::RequestTimeout,
            "unsupportedMediaType" => ErrorCode::UnsupportedMediaType,
            "internalError" => ErrorCode::InternalError,
            "maintenance" => ErrorCode::Maintenance,
            _ => ErrorCode::Unknown(code),
        }
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        code.as_str().to_owned()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
