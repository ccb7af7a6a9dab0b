//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional. Missing integrations degrade the site instead
//! of stopping it: without a Gemini key the waiter chat is disabled, and
//! without all four Twilio values orders are logged rather than sent.
//!
//! - `FUSION_HOST` - Bind address (default: 127.0.0.1)
//! - `FUSION_PORT` - Listen port (default: 3000)
//! - `FUSION_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `RESTAURANT_NAME` - Shown in the UI and in order messages
//! - `RESTAURANT_TAGLINE` - UI subtitle
//! - `PAYMENT_HANDLE` - Payment link appended to order messages
//! - `GEMINI_API_KEY` - Gemini API key (enables the waiter chat)
//! - `GEMINI_MODEL` - Gemini model id (default: gemini-1.5-flash)
//! - `TWILIO_ACCOUNT_SID` - Twilio account SID
//! - `TWILIO_AUTH_TOKEN` - Twilio auth token
//! - `TWILIO_WHATSAPP_NUMBER` - Sender number (E.164)
//! - `RESTAURANT_WHATSAPP_NUMBER` - Restaurant number orders are sent to (E.164)
//! - `HTTP_TIMEOUT_SECS` - Outbound request timeout (default: 20)
//! - `SESSION_IDLE_MINUTES` - Session inactivity expiry (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use fusion_core::WhatsAppAddress;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const DEFAULT_RESTAURANT_NAME: &str = "Fusion Food Lab";
const DEFAULT_TAGLINE: &str = "Quantum-Infused Dining";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;
const DEFAULT_SESSION_IDLE_MINUTES: i64 = 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct FusionConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    pub restaurant: RestaurantConfig,
    /// `None` disables the waiter chat
    pub gemini: Option<GeminiConfig>,
    pub messaging: MessagingConfig,
    /// Timeout applied to every outbound HTTP request
    pub http_timeout: Duration,
    /// Session inactivity expiry in minutes
    pub session_idle_minutes: i64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
}

/// Restaurant branding.
#[derive(Debug, Clone)]
pub struct RestaurantConfig {
    pub name: String,
    pub tagline: String,
    /// Payment link or UPI handle included in order messages
    pub payment_handle: Option<String>,
}

/// Gemini API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: SecretString,
    pub model: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

/// Twilio WhatsApp credentials.
///
/// Each value may be absent. Messaging is only attempted when all four are
/// present; see [`MessagingConfig::is_configured`].
#[derive(Clone, Default)]
pub struct MessagingConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<SecretString>,
    /// Sender number registered with Twilio
    pub from_number: Option<WhatsAppAddress>,
    /// Restaurant number that receives orders
    pub to_number: Option<WhatsAppAddress>,
}

impl std::fmt::Debug for MessagingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagingConfig")
            .field("account_sid", &self.account_sid)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("from_number", &self.from_number)
            .field("to_number", &self.to_number)
            .finish()
    }
}

impl MessagingConfig {
    /// Whether every credential needed to send an order is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.account_sid.is_some()
            && self.auth_token.is_some()
            && self.from_number.is_some()
            && self.to_number.is_some()
    }

    /// Account SID and auth token, when both are present.
    #[must_use]
    pub fn api_credentials(&self) -> Option<(&str, &str)> {
        match (&self.account_sid, &self.auth_token) {
            (Some(sid), Some(token)) => Some((sid.as_str(), token.expose_secret())),
            _ => None,
        }
    }

    fn from_source(source: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            account_sid: get_optional(source, "TWILIO_ACCOUNT_SID"),
            auth_token: get_optional(source, "TWILIO_AUTH_TOKEN").map(SecretString::from),
            from_number: get_optional_address(source, "TWILIO_WHATSAPP_NUMBER")?,
            to_number: get_optional_address(source, "RESTAURANT_WHATSAPP_NUMBER")?,
        })
    }
}

impl FusionConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Empty or whitespace-only values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_source(source: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_or_default(&source, "FUSION_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?;
        let port = parse_or_default(&source, "FUSION_PORT", 3000_u16)?;
        let base_url = get_optional(&source, "FUSION_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"));
        url::Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("FUSION_BASE_URL".to_string(), e.to_string()))?;

        let restaurant = RestaurantConfig {
            name: get_optional(&source, "RESTAURANT_NAME")
                .unwrap_or_else(|| DEFAULT_RESTAURANT_NAME.to_string()),
            tagline: get_optional(&source, "RESTAURANT_TAGLINE")
                .unwrap_or_else(|| DEFAULT_TAGLINE.to_string()),
            payment_handle: get_optional(&source, "PAYMENT_HANDLE"),
        };

        let gemini = get_optional(&source, "GEMINI_API_KEY").map(|key| GeminiConfig {
            api_key: SecretString::from(key),
            model: get_optional(&source, "GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        });

        let messaging = MessagingConfig::from_source(&source)?;

        let timeout_secs =
            parse_or_default(&source, "HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "HTTP_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let session_idle_minutes =
            parse_or_default(&source, "SESSION_IDLE_MINUTES", DEFAULT_SESSION_IDLE_MINUTES)?;
        if session_idle_minutes <= 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SESSION_IDLE_MINUTES".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            base_url,
            restaurant,
            gemini,
            messaging,
            http_timeout: Duration::from_secs(timeout_secs),
            session_idle_minutes,
            sentry_dsn: get_optional(&source, "SENTRY_DSN"),
            sentry_environment: get_optional(&source, "SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Session inactivity lifetime.
    #[must_use]
    pub const fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_minutes.unsigned_abs() * 60)
    }
}

impl Default for FusionConfig {
    /// Local defaults with no integrations configured.
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            restaurant: RestaurantConfig {
                name: DEFAULT_RESTAURANT_NAME.to_string(),
                tagline: DEFAULT_TAGLINE.to_string(),
                payment_handle: None,
            },
            gemini: None,
            messaging: MessagingConfig::default(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            session_idle_minutes: DEFAULT_SESSION_IDLE_MINUTES,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating blank values as unset.
fn get_optional(source: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    source(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse a variable, falling back to `default` when unset.
fn parse_or_default<T>(
    source: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional(source, key).map_or(Ok(default), |value| {
        value
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse an optional WhatsApp number.
fn get_optional_address(
    source: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<WhatsAppAddress>, ConfigError> {
    get_optional(source, key)
        .map(|value| {
            WhatsAppAddress::parse(&value)
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<FusionConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        FusionConfig::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.restaurant.name, "Fusion Food Lab");
        assert_eq!(config.restaurant.tagline, "Quantum-Infused Dining");
        assert!(config.gemini.is_none());
        assert!(!config.messaging.is_configured());
        assert_eq!(config.http_timeout, Duration::from_secs(20));
        assert_eq!(config.session_idle_minutes, 60);
        assert_eq!(config.session_idle(), Duration::from_secs(3600));
        assert!(!config.is_secure());
    }

    #[test]
    fn test_gemini_enabled_by_key() {
        let config = load(&[("GEMINI_API_KEY", "AIzaTestKey")]).unwrap();
        let gemini = config.gemini.unwrap();
        assert_eq!(gemini.api_key.expose_secret(), "AIzaTestKey");
        assert_eq!(gemini.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = load(&[
            ("GEMINI_API_KEY", "   "),
            ("TWILIO_ACCOUNT_SID", ""),
            ("FUSION_PORT", ""),
        ])
        .unwrap();
        assert!(config.gemini.is_none());
        assert!(config.messaging.account_sid.is_none());
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_messaging_requires_all_four_values() {
        let partial = load(&[
            ("TWILIO_ACCOUNT_SID", "AC123"),
            ("TWILIO_AUTH_TOKEN", "token"),
            ("TWILIO_WHATSAPP_NUMBER", "+14155238886"),
        ])
        .unwrap();
        assert!(!partial.messaging.is_configured());

        let full = load(&[
            ("TWILIO_ACCOUNT_SID", "AC123"),
            ("TWILIO_AUTH_TOKEN", "token"),
            ("TWILIO_WHATSAPP_NUMBER", "whatsapp:+14155238886"),
            ("RESTAURANT_WHATSAPP_NUMBER", "+91 98765 43210"),
        ])
        .unwrap();
        assert!(full.messaging.is_configured());
        assert_eq!(
            full.messaging.to_number.as_ref().unwrap().as_str(),
            "+919876543210"
        );
        assert_eq!(full.messaging.api_credentials(), Some(("AC123", "token")));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = load(&[("FUSION_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "FUSION_PORT"));

        let err = load(&[("HTTP_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "HTTP_TIMEOUT_SECS"));

        let err = load(&[("RESTAURANT_WHATSAPP_NUMBER", "9876543210")]).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "RESTAURANT_WHATSAPP_NUMBER")
        );

        let err = load(&[("FUSION_BASE_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "FUSION_BASE_URL"));
    }

    #[test]
    fn test_https_base_url_is_secure() {
        let config = load(&[("FUSION_BASE_URL", "https://order.fusionfoodlab.example")]).unwrap();
        assert!(config.is_secure());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = load(&[
            ("GEMINI_API_KEY", "super_secret_gemini_key"),
            ("TWILIO_ACCOUNT_SID", "AC123"),
            ("TWILIO_AUTH_TOKEN", "super_secret_auth_token"),
        ])
        .unwrap();

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("AC123"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_gemini_key"));
        assert!(!debug_output.contains("super_secret_auth_token"));
    }
}
