//! Pure payment-field validators.
//!
//! All validators are synchronous, side-effect free boolean gates the
//! caller checks before building a payment request. The IBAN check is a
//! shallow format gate (Swiss shape only, no mod-97 checksum) - that is the
//! accepted contract, not an oversight.

/// TWINT accepts amounts strictly above zero up to this limit.
pub const MAX_AMOUNT: f64 = 999_999.99;
/// TWINT message length limit.
pub const MAX_MESSAGE_CHARS: usize = 140;

/// `true` for `0 < amount <= 999999.99`. Non-finite amounts fail.
#[must_use]
pub fn validate_amount(amount: f64) -> bool {
    amount > 0.0 && amount <= MAX_AMOUNT
}

/// `true` for messages of at most 140 characters.
#[must_use]
pub fn validate_message(message: &str) -> bool {
    message.chars().count() <= MAX_MESSAGE_CHARS
}

/// Swiss IBAN shape check after stripping whitespace: `CH`, 2 check
/// digits, 5 digits, 12 alphanumerics.
#[must_use]
pub fn validate_iban(iban: &str) -> bool {
    let chars: Vec<char> = iban.chars().filter(|c| !c.is_whitespace()).collect();
    chars.len() == 21
        && chars[0] == 'C'
        && chars[1] == 'H'
        && chars[2..9].iter().all(|c| c.is_ascii_digit())
        && chars[9..]
            .iter()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
}

/// Swiss phone number check after stripping whitespace: `+41` or `0`
/// prefix followed by exactly 9 digits.
#[must_use]
pub fn validate_phone_number(phone: &str) -> bool {
    let cleaned: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = if let Some(rest) = cleaned.strip_prefix("+41") {
        rest
    } else if let Some(rest) = cleaned.strip_prefix('0') {
        rest
    } else {
        return false;
    };
    digits.len() == 9 && digits.chars().all(|c| c.is_ascii_digit())
}
