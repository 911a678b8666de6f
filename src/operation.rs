//! Registry of API operations.
//!
//! Every operation the API exposes is a POST of a JSON payload to a
//! fixed path. [`ApiRequest`] ties a payload type to its path and to
//! the shape of a successful response, so the client can drive any
//! operation through one generic send path. Adding an operation means
//! adding an [`Operation`] variant and implementing [`ApiRequest`] for
//! its payload.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::payload::{
    AuthenticationPayload, CancelPayload, CollectPayload, PhoneAuthenticationPayload,
    PhoneSignPayload, SignPayload,
};
use crate::response::{CancelResponse, CollectResponse, OrderResponse, PhoneOrderResponse};

/// The operations the API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Start an authentication order.
    Auth,
    /// Start a signing order.
    Sign,
    /// Start an authentication order for a user on a phone call.
    PhoneAuth,
    /// Start a signing order for a user on a phone call.
    PhoneSign,
    /// Fetch the current state of an order.
    Collect,
    /// Abort an order in progress.
    Cancel,
}

impl Operation {
    /// Endpoint path relative to the API base URL.
    pub const fn path(&self) -> &'static str {
        match self {
            Operation::Auth => "auth",
            Operation::Sign => "sign",
            Operation::PhoneAuth => "phone/auth",
            Operation::PhoneSign => "phone/sign",
            Operation::Collect => "collect",
            Operation::Cancel => "cancel",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A payload that can be posted to the API.
///
/// The payload's serialization is its wire shape; its validation rules
/// run before any bytes leave the process.
pub trait ApiRequest: Serialize + Validate + Send + Sync {
    /// Shape of a successful response to this payload.
    type Response: DeserializeOwned;

    /// Endpoint this payload is posted to.
    const OPERATION: Operation;
}

impl ApiRequest for AuthenticationPayload {
    type Response = OrderResponse;
    const OPERATION: Operation = Operation::Auth;
}

impl ApiRequest for SignPayload {
    type Response = OrderResponse;
    const OPERATION: Operation = Operation::Sign;
}

impl ApiRequest for PhoneAuthenticationPayload {
    type Response = PhoneOrderResponse;
    const OPERATION: Operation = Operation::PhoneAuth;
}

impl ApiRequest for PhoneSignPayload {
    type Response = PhoneOrderResponse;
    const OPERATION: Operation = Operation::PhoneSign;
}

impl ApiRequest for CollectPayload {
    type Response = CollectResponse;
    const OPERATION: Operation = Operation::Collect;
}

impl ApiRequest for CancelPayload {
    type Response = CancelResponse;
    const OPERATION: Operation = Operation::Cancel;
}
