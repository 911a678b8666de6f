use std::fmt;

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize, de, ser};
use validator::Validate;

use crate::validate::PERSONAL_NUMBER;

/// Text carried alongside an order, such as the message shown in the
/// BankID app while signing.
///
/// The raw text is kept in memory; the wire form is standard base64.
/// Length limits apply to the encoded form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserData(String);

impl UserData {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw, un-encoded text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the standard base64 encoding, without encoding.
    pub(crate) fn encoded_len(&self) -> usize {
        self.0.len().div_ceil(3) * 4
    }
}

impl From<&str> for UserData {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

impl From<String> for UserData {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for UserData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for UserData {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&general_purpose::STANDARD.encode(self.0.as_bytes()))
    }
}

impl<'de> Deserialize<'de> for UserData {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let raw = general_purpose::STANDARD
            .decode(&encoded)
            .map_err(de::Error::custom)?;

        String::from_utf8(raw).map(Self).map_err(de::Error::custom)
    }
}

/// Marker for payloads whose visible data holds formatting characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataFormat {
    #[serde(rename = "simpleMarkdownV1")]
    SimpleMarkdownV1,
}

/// Who placed the phone call the order is tied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallInitiator {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "RP")]
    RelyingParty,
}

/// Requirements on how an auth or sign order must be performed.
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(equal = 10))]
    pub card_reader: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(equal = 10))]
    pub certificate_policies: Option<String>,
    /// A personal identification number required to complete the order.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *PERSONAL_NUMBER, code = "personal_number"))]
    pub personal_number: Option<String>,
    /// If true, the client must provide MRTD (machine readable travel
    /// document) information to complete the order.
    #[serde(skip_serializing_if = "is_false")]
    pub mrtd: bool,
    /// If true, the user must confirm the order with their PIN code.
    #[serde(skip_serializing_if = "is_false")]
    pub pin_code: bool,
}

/// Requirements on how a phone-initiated order must be performed.
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PhoneRequirement {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(equal = 10))]
    pub card_reader: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(equal = 10))]
    pub certificate_policies: Option<String>,
    /// If true, the user must confirm the order with their PIN code.
    #[serde(skip_serializing_if = "is_false")]
    pub pin_code: bool,
}

/// Fields of an authentication order request.
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationPayload {
    /// The user IP address as seen by the RP.
    #[validate(custom(function = crate::validate::ip_literal))]
    pub end_user_ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub requirement: Option<Requirement>,
    /// Text displayed to the user during authentication. At most 1 500
    /// characters after base64 encoding.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = crate::validate::auth_visible_data))]
    pub user_visible_data: Option<UserData>,
    /// Data not displayed to the user. At most 1 500 characters after
    /// base64 encoding.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = crate::validate::auth_non_visible_data))]
    pub user_non_visible_data: Option<UserData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_visible_data_format: Option<DataFormat>,
}

/// Fields of a sign order request.
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignPayload {
    /// The user IP address as seen by the RP.
    #[validate(custom(function = crate::validate::ip_literal))]
    pub end_user_ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub requirement: Option<Requirement>,
    /// Text displayed to and signed by the user. Required; at most
    /// 40 000 characters after base64 encoding.
    #[validate(custom(function = crate::validate::sign_visible_data))]
    pub user_visible_data: UserData,
    /// Data not displayed to the user. At most 200 000 characters after
    /// base64 encoding.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = crate::validate::sign_non_visible_data))]
    pub user_non_visible_data: Option<UserData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_visible_data_format: Option<DataFormat>,
}

/// Fields of a phone authentication order request.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PhoneAuthenticationPayload {
    /// A personal identification number required to complete the order.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *PERSONAL_NUMBER, code = "personal_number"))]
    pub personal_number: Option<String>,
    pub call_initiator: CallInitiator,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub requirement: Option<PhoneRequirement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = crate::validate::auth_visible_data))]
    pub user_visible_data: Option<UserData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = crate::validate::auth_non_visible_data))]
    pub user_non_visible_data: Option<UserData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_visible_data_format: Option<DataFormat>,
}

/// Fields of a phone sign order request.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PhoneSignPayload {
    /// A personal identification number required to complete the order.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *PERSONAL_NUMBER, code = "personal_number"))]
    pub personal_number: Option<String>,
    pub call_initiator: CallInitiator,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub requirement: Option<PhoneRequirement>,
    /// Text displayed to and signed by the user. Required; at most
    /// 40 000 characters after base64 encoding.
    #[validate(custom(function = crate::validate::sign_visible_data))]
    pub user_visible_data: UserData,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = crate::validate::sign_non_visible_data))]
    pub user_non_visible_data: Option<UserData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_visible_data_format: Option<DataFormat>,
}

/// References the order to collect, using the orderRef returned when the
/// order was created.
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CollectPayload {
    pub order_ref: String,
}

/// References the order to cancel, using the orderRef returned when the
/// order was created.
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CancelPayload {
    pub order_ref: String,
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_data_encodes_to_base64_on_the_wire() {
        let value = serde_json::to_value(UserData::new("Test")).unwrap();
        assert_eq!(value, json!("VGVzdA=="));

        let decoded: UserData = serde_json::from_value(json!("VGVzdA==")).unwrap();
        assert_eq!(decoded.as_str(), "Test");
    }

    #[test]
    fn test_user_data_rejects_invalid_base64() {
        assert!(serde_json::from_value::<UserData>(json!("not base64!")).is_err());
    }

    #[test]
    fn test_encoded_len_matches_the_actual_encoding() {
        for raw in ["", "a", "ab", "abc", "abcd", "åäö", "x"] {
            let data = UserData::new(raw);
            let encoded = general_purpose::STANDARD.encode(raw.as_bytes());
            assert_eq!(data.encoded_len(), encoded.len(), "raw: {raw:?}");
        }
    }

    #[test]
    fn test_authentication_payload_omits_absent_fields() {
        let payload = AuthenticationPayload {
            end_user_ip: "192.168.1.1".to_string(),
            ..Default::default()
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value, json!({"endUserIp": "192.168.1.1"}));
    }

    #[test]
    fn test_sign_payload_wire_form() {
        let payload = SignPayload {
            end_user_ip: "192.168.1.1".to_string(),
            user_visible_data: UserData::new("Test"),
            user_visible_data_format: Some(DataFormat::SimpleMarkdownV1),
            requirement: Some(Requirement {
                personal_number: Some("190000000000".to_string()),
                pin_code: true,
                ..Default::default()
            }),
            ..Default::default()
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "endUserIp": "192.168.1.1",
                "requirement": {"personalNumber": "190000000000", "pinCode": true},
                "userVisibleData": "VGVzdA==",
                "userVisibleDataFormat": "simpleMarkdownV1",
            })
        );
    }

    #[test]
    fn test_phone_payload_wire_form() {
        let payload = PhoneAuthenticationPayload {
            personal_number: Some("190000000000".to_string()),
            call_initiator: CallInitiator::RelyingParty,
            requirement: None,
            user_visible_data: Some(UserData::new("Test")),
            user_non_visible_data: None,
            user_visible_data_format: None,
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "personalNumber": "190000000000",
                "callInitiator": "RP",
                "userVisibleData": "VGVzdA==",
            })
        );
    }

    #[test]
    fn test_requirement_rules() {
        let valid = Requirement {
            personal_number: Some("190000000000".to_string()),
            ..Default::default()
        };
        assert!(valid.validate().is_ok());

        let invalid = Requirement {
            personal_number: Some("INVALID-PERSONAL-NUMBER".to_string()),
            ..Default::default()
        };
        assert!(invalid.validate().is_err());

        let bad_reader = Requirement {
            card_reader: Some("short".to_string()),
            ..Default::default()
        };
        assert!(bad_reader.validate().is_err());
    }

    #[test]
    fn test_authentication_payload_rules() {
        let valid = AuthenticationPayload {
            end_user_ip: "2001:db8::1".to_string(),
            ..Default::default()
        };
        assert!(valid.validate().is_ok());

        let invalid = AuthenticationPayload {
            end_user_ip: "not-an-ip".to_string(),
            ..Default::default()
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_sign_payload_requires_visible_data() {
        let payload = SignPayload {
            end_user_ip: "192.168.1.1".to_string(),
            ..Default::default()
        };

        assert!(payload.validate().is_err());
    }
}
