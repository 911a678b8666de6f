use ring::hmac;

/// Computes the animated QR code content for an order.
///
/// A fresh code is produced every second from the pattern
/// `bankid.qrStartToken.time.qrAuthCode`, where `qrAuthCode` is the
/// HMAC-SHA256 of the elapsed seconds (as a decimal string) keyed by
/// `qr_start_secret`, in lowercase hex.
pub fn qr_code_content(qr_start_token: &str, qr_start_secret: &str, seconds: u64) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, qr_start_secret.as_bytes());
    let tag = hmac::sign(&key, seconds.to_string().as_bytes());

    format!("bankid.{qr_start_token}.{seconds}.{}", hex::encode(tag.as_ref()))
}
