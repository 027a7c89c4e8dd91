//! Payment-request and payment-return link building and parsing.
//!
//! Two separate URI schemes are involved: `twint://pay?...` is handed to
//! the wallet app (or replaced by a web fallback), and
//! `bierlounge-tracker://payment-return?...` is the deep link this app
//! listens for to learn the settlement status out-of-band.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;
use url::form_urlencoded;

/// Scheme of the outbound payment request, handled by the wallet app.
pub const TWINT_SCHEME: &str = "twint";
/// Scheme of the inbound return deep link, handled by this app.
pub const APP_SCHEME: &str = "bierlounge-tracker";
/// Host of the inbound return deep link.
pub const PAYMENT_RETURN_HOST: &str = "payment-return";
/// Browser fallback when no app handles the `twint` scheme.
pub const TWINT_WEB_BASE: &str = "https://www.twint.ch/pay";

/// Settlement status carried by a payment-return link.
///
/// Closed set: any status string outside the three known literals parses to
/// [`PaymentStatus::Unknown`] instead of passing through uncoerced.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    /// The wire literal used in return links.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }

    /// Maps a wire literal to a status; anything unrecognized is `Unknown`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "pending" => Self::Pending,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a caller needs to present one payment request to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPaymentRequest {
    /// The `twint://pay` URI to hand to the wallet app.
    pub payment_url: String,
    /// Payload for a locally rendered QR code (same URI).
    pub qr_code_data: String,
    /// Human-readable summary for display.
    pub message: String,
    /// Advisory return deep link, always stamped `status=pending`. Composed
    /// here but dispatched (if ever) by the host application.
    pub deep_link_url: String,
    /// Display name of the payee.
    pub admin_info: String,
}

/// Fields decoded from a payment-return deep link. Each field is absent
/// when the corresponding query parameter is missing; `amount` is also
/// absent when its text does not parse as a number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentReturn {
    pub user_id: Option<String>,
    pub amount: Option<f64>,
    pub status: Option<PaymentStatus>,
}

/// Builds `twint://pay?amount=<2-decimal>&message=<encoded>[&iban=<encoded>]`.
///
/// The `iban` query parameter is omitted entirely when none is supplied.
pub(crate) fn build_payment_request(amount: f64, message: &str, iban: Option<&str>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("amount", &format!("{amount:.2}"));
    query.append_pair("message", message);
    if let Some(iban) = iban {
        query.append_pair("iban", iban);
    }
    format!("{TWINT_SCHEME}://pay?{}", query.finish())
}

/// Builds the browser fallback URL for when no wallet app is installed.
pub(crate) fn build_web_fallback_url(amount: f64, message: &str) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("amount", &format!("{amount:.2}"));
    query.append_pair("message", message);
    format!("{TWINT_WEB_BASE}?{}", query.finish())
}

/// Canonical construction of the payment-return deep link.
#[must_use]
pub fn generate_payment_return_link(user_id: &str, amount: f64, status: PaymentStatus) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("userId", user_id);
    query.append_pair("amount", &amount.to_string());
    query.append_pair("status", status.as_str());
    format!("{APP_SCHEME}://{PAYMENT_RETURN_HOST}?{}", query.finish())
}

/// Decodes a payment-return deep link.
///
/// Returns `None` unless scheme and host exactly match the
/// `bierlounge-tracker`/`payment-return` pair; foreign or malformed URIs
/// are silently rejected, never an error.
#[must_use]
pub fn parse_payment_return_link(link: &str) -> Option<PaymentReturn> {
    let parsed = Url::parse(link).ok()?;
    if parsed.scheme() != APP_SCHEME || parsed.host_str() != Some(PAYMENT_RETURN_HOST) {
        return None;
    }

    let mut result = PaymentReturn::default();
    for (key, value) in parsed.query_pairs() {
        match key.as_ref() {
            "userId" => result.user_id = Some(value.into_owned()),
            "amount" => result.amount = value.parse().ok(),
            "status" => result.status = Some(PaymentStatus::parse(&value)),
            _ => {}
        }
    }
    Some(result)
}
