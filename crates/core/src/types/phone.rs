//! WhatsApp address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`WhatsAppAddress`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The number does not start with a `+` country code.
    #[error("phone number must start with '+' and a country code")]
    MissingCountryCode,
    /// The number contains something other than digits after the `+`.
    #[error("phone number may only contain digits after '+'")]
    InvalidCharacter,
    /// The number has too few or too many digits for E.164.
    #[error("phone number must have between {min} and {max} digits")]
    InvalidLength {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
    },
}

/// A WhatsApp-enabled phone number in E.164 form.
///
/// Parsing accepts an optional `whatsapp:` prefix and ignores spaces, dashes
/// and parentheses, so values copied from a phone's contact card work.
///
/// ## Examples
///
/// ```
/// use fusion_core::WhatsAppAddress;
///
/// let addr = WhatsAppAddress::parse("+1 (415) 523-8886").unwrap();
/// assert_eq!(addr.as_str(), "+14155238886");
/// assert_eq!(addr.channel_address(), "whatsapp:+14155238886");
///
/// assert!(WhatsAppAddress::parse("whatsapp:+14155238886").is_ok());
/// assert!(WhatsAppAddress::parse("4155238886").is_err()); // no country code
/// assert!(WhatsAppAddress::parse("").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct WhatsAppAddress(String);

impl WhatsAppAddress {
    /// Channel prefix used by the messaging transport.
    pub const CHANNEL_PREFIX: &'static str = "whatsapp:";
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 7;
    /// Maximum number of digits (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `WhatsAppAddress` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Does not start with `+`
    /// - Contains non-digit characters after the `+`
    /// - Has fewer than 7 or more than 15 digits
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let raw = s.trim();
        let raw = raw.strip_prefix(Self::CHANNEL_PREFIX).unwrap_or(raw);

        let compact: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();

        if compact.is_empty() {
            return Err(PhoneError::Empty);
        }

        let digits = compact
            .strip_prefix('+')
            .ok_or(PhoneError::MissingCountryCode)?;

        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneError::InvalidCharacter);
        }

        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len()) {
            return Err(PhoneError::InvalidLength {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(compact))
    }

    /// Returns the E.164 number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the address in the transport's channel form (`whatsapp:+...`).
    #[must_use]
    pub fn channel_address(&self) -> String {
        format!("{}{}", Self::CHANNEL_PREFIX, self.0)
    }
}

impl fmt::Display for WhatsAppAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for WhatsAppAddress {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for WhatsAppAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_numbers() {
        assert!(WhatsAppAddress::parse("+14155238886").is_ok());
        assert!(WhatsAppAddress::parse("+91 98765 43210").is_ok());
        assert!(WhatsAppAddress::parse("whatsapp:+447700900123").is_ok());
        assert!(WhatsAppAddress::parse("  +1-415-523-8886  ").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(WhatsAppAddress::parse(""), Err(PhoneError::Empty));
        assert_eq!(WhatsAppAddress::parse("whatsapp:"), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_missing_country_code() {
        assert_eq!(
            WhatsAppAddress::parse("4155238886"),
            Err(PhoneError::MissingCountryCode)
        );
    }

    #[test]
    fn test_parse_invalid_character() {
        assert_eq!(
            WhatsAppAddress::parse("+1415CALLNOW"),
            Err(PhoneError::InvalidCharacter)
        );
    }

    #[test]
    fn test_parse_length_limits() {
        assert!(matches!(
            WhatsAppAddress::parse("+12345"),
            Err(PhoneError::InvalidLength { .. })
        ));
        assert!(matches!(
            WhatsAppAddress::parse("+1234567890123456"),
            Err(PhoneError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_channel_address_is_not_double_prefixed() {
        let addr = WhatsAppAddress::parse("whatsapp:+14155238886").unwrap();
        assert_eq!(addr.channel_address(), "whatsapp:+14155238886");
    }

    #[test]
    fn test_from_str() {
        let addr: WhatsAppAddress = "+14155238886".parse().unwrap();
        assert_eq!(addr.as_str(), "+14155238886");
        assert_eq!(format!("{addr}"), "+14155238886");
    }
}
