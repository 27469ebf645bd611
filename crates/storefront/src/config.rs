//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FITPLAN_BASE_URL` - Public URL for the storefront
//! - `PAYMENT_UPI_ID` - UPI address encoded into the payment QR code
//! - `CONTACT_PHONE` - Trainer's phone number for the messaging hand-off
//!
//! ## Optional
//! - `FITPLAN_HOST` - Bind address (default: 127.0.0.1)
//! - `FITPLAN_PORT` - Listen port (default: 3000)
//! - `PAYMENT_PAYEE_NAME` - Payee shown in payment apps (default: Gym Trainer)
//! - `ORDERS_REMOTE_URL` - Document store base URL; unset means local only
//! - `ORDERS_REMOTE_COLLECTION` - Collection orders are written to (default: orders)
//! - `ORDERS_REMOTE_API_KEY` - Bearer token for the document store (high entropy)
//! - `ORDERS_REMOTE_TIMEOUT_SECS` - Remote write timeout (default: 10)
//! - `ORDERS_LOCAL_PATH` - Local fallback file (default: data/orders.json)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const MIN_PHONE_DIGITS: usize = 8;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Payment and contact hand-off details
    pub payment: PaymentConfig,
    /// Where orders are written
    pub orders: OrderStoreConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors reported to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Payment QR and contact link configuration.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// UPI virtual payment address (e.g. `trainer@upi`)
    pub upi_id: String,
    /// Payee name encoded into the UPI link
    pub payee_name: String,
    /// Contact phone, digits only with country code
    pub contact_phone: String,
}

/// Order persistence configuration.
#[derive(Debug, Clone)]
pub struct OrderStoreConfig {
    /// Remote document store; `None` sends every order to the local file
    pub remote: Option<RemoteStoreConfig>,
    /// Local fallback file
    pub local_path: PathBuf,
}

/// Remote document store configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct RemoteStoreConfig {
    /// Base URL of the document store
    pub url: Url,
    /// Collection new orders are added to
    pub collection: String,
    /// Bearer token, if the store requires one
    pub api_key: Option<SecretString>,
    /// Upper bound on a single write
    pub timeout: Duration,
}

impl std::fmt::Debug for RemoteStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStoreConfig")
            .field("url", &self.url.as_str())
            .field("collection", &self.collection)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("FITPLAN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("FITPLAN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("FITPLAN_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("FITPLAN_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("FITPLAN_BASE_URL")?;

        let payment = PaymentConfig::from_env()?;
        let orders = OrderStoreConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            payment,
            orders,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_parsed_or_default("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_parsed_or_default("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl PaymentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let upi_id = get_required_env("PAYMENT_UPI_ID")?;
        validate_upi_id(&upi_id, "PAYMENT_UPI_ID")?;
        let contact_phone = normalize_phone(&get_required_env("CONTACT_PHONE")?, "CONTACT_PHONE")?;

        Ok(Self {
            upi_id,
            payee_name: get_env_or_default("PAYMENT_PAYEE_NAME", "Gym Trainer"),
            contact_phone,
        })
    }
}

impl OrderStoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let remote = match get_optional_env("ORDERS_REMOTE_URL") {
            Some(raw) => {
                let url = Url::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("ORDERS_REMOTE_URL".to_string(), e.to_string())
                })?;
                let api_key = get_optional_env("ORDERS_REMOTE_API_KEY")
                    .map(|key| {
                        validate_secret_strength(&key, "ORDERS_REMOTE_API_KEY")?;
                        Ok::<_, ConfigError>(SecretString::from(key))
                    })
                    .transpose()?;
                Some(RemoteStoreConfig {
                    url,
                    collection: get_env_or_default("ORDERS_REMOTE_COLLECTION", "orders"),
                    api_key,
                    timeout: Duration::from_secs(get_parsed_or_default(
                        "ORDERS_REMOTE_TIMEOUT_SECS",
                        10,
                    )?),
                })
            }
            None => None,
        };

        Ok(Self {
            remote,
            local_path: PathBuf::from(get_env_or_default("ORDERS_LOCAL_PATH", "data/orders.json")),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional environment variable, falling back to a default.
fn get_parsed_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// A UPI address is `handle@provider` with no whitespace.
fn validate_upi_id(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let valid = value
        .split_once('@')
        .is_some_and(|(handle, provider)| !handle.is_empty() && !provider.is_empty())
        && !value.chars().any(char::is_whitespace);
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "expected a UPI address like name@bank".to_string(),
        ))
    }
}

/// Strip formatting from a phone number, keeping only digits.
fn normalize_phone(value: &str, var_name: &str) -> Result<String, ConfigError> {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < MIN_PHONE_DIGITS {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("expected at least {MIN_PHONE_DIGITS} digits"),
        ));
    }
    Ok(digits)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated key."
            ),
        ));
    }

    Ok(())
}
