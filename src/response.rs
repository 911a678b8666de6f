mod codes;
mod issue_date;

pub use codes::{ErrorCode, HintCode, OrderStatus};
pub use issue_date::IssueDate;

use serde::Deserialize;

/// Response to an authentication or sign request.
///
/// All four tokens are minted by the service; `order_ref` keys every
/// later collect and cancel call, while the two QR values feed the
/// animated QR code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderResponse {
    /// Used as reference to this order when the client is started
    /// automatically.
    pub auto_start_token: String,
    /// Used to collect the status of the order.
    pub order_ref: String,
    /// Used to compute the animated QR code.
    pub qr_start_token: String,
    /// Used to compute the animated QR code.
    pub qr_start_secret: String,
}

/// Response to a phone authentication or phone sign request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhoneOrderResponse {
    /// Used to collect the status of the order.
    pub order_ref: String,
}

/// One snapshot of an order, as returned by the collect endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CollectResponse {
    pub order_ref: String,
    pub status: OrderStatus,
    /// Describes a pending order's progress or a failed order's cause.
    #[serde(default)]
    pub hint_code: Option<HintCode>,
    /// Present once the order is complete.
    #[serde(default)]
    pub completion_data: Option<CompletionData>,
}

impl CollectResponse {
    /// The order is being processed; `hint_code` describes its progress.
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    /// Something went wrong with the order; `hint_code` describes the error.
    pub fn is_failed(&self) -> bool {
        self.status == OrderStatus::Failed
    }

    /// The order is complete; `completion_data` holds the user identity.
    pub fn is_complete(&self) -> bool {
        self.status == OrderStatus::Complete
    }
}

/// Final state of a completed order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompletionData {
    pub user: User,
    pub device: Device,
    /// When the user's BankID was issued. The service encodes this in
    /// several date and timestamp forms; all are normalized to UTC.
    #[serde(default)]
    pub bank_id_issue_date: Option<IssueDate>,
    /// Whether extra verifications were part of the transaction.
    #[serde(default)]
    pub step_up: bool,
    /// The signature, base64-encoded, as described in the BankID
    /// Signature Profile specification.
    #[serde(default)]
    pub signature: String,
    /// The OCSP response, base64-encoded, signed by a certificate with
    /// the same issuer as the certificate being verified.
    #[serde(default)]
    pub ocsp_response: String,
}

/// Identity of the user who completed the order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct User {
    pub personal_number: String,
    /// The given name and surname of the user.
    pub name: String,
    pub given_name: String,
    pub surname: String,
}

/// The device the order was completed on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Device {
    /// The IP address of the user agent as the service discovered it.
    pub ip_address: String,
    /// Unique hardware identifier of the user's device.
    #[serde(default)]
    pub uhi: String,
}

/// Response to a cancel request. The service returns an empty object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CancelResponse {}
