//! Configuration for the election ledger
//!
//! Loads sensitive configuration from environment variables with validation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Security configuration for credential handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Pepper for sign-in secret hashing (base64 encoded, minimum 32 bytes)
    pub credential_pepper: String,

    /// Length of generated UVC codes (default: 8)
    pub uvc_length: usize,
}

impl SecurityConfig {
    /// Load security configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let credential_pepper = std::env::var("GEVS_CREDENTIAL_PEPPER")
            .map_err(|_| Error::config("GEVS_CREDENTIAL_PEPPER environment variable required"))?;

        Self::validate_pepper(&credential_pepper)?;

        let uvc_length = std::env::var("GEVS_UVC_LENGTH")
            .unwrap_or_else(|_| crate::crypto::DEFAULT_UVC_LENGTH.to_string())
            .parse()
            .map_err(|_| Error::config("Invalid GEVS_UVC_LENGTH"))?;

        if uvc_length < 6 {
            return Err(Error::config("GEVS_UVC_LENGTH must be at least 6"));
        }

        Ok(Self {
            credential_pepper,
            uvc_length,
        })
    }

    /// Create configuration for testing with a random pepper
    pub fn for_testing() -> Self {
        use base64::Engine;
        let credential_pepper =
            base64::engine::general_purpose::STANDARD.encode(rand::random::<[u8; 32]>());

        Self {
            credential_pepper,
            uvc_length: crate::crypto::DEFAULT_UVC_LENGTH,
        }
    }

    /// Validate a base64-encoded pepper
    fn validate_pepper(pepper: &str) -> Result<()> {
        use base64::Engine;
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(pepper)
            .map_err(|_| Error::config("GEVS_CREDENTIAL_PEPPER must be valid base64"))?;

        if decoded.len() < 32 {
            return Err(Error::config(
                "GEVS_CREDENTIAL_PEPPER must be at least 32 bytes when decoded",
            ));
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment
    pub fn from_env() -> Result<Self> {
        let security = SecurityConfig::from_env()?;

        let logging = LoggingConfig {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
        };

        Ok(Self { security, logging })
    }

    /// Create configuration for testing
    pub fn for_testing() -> Self {
        let security = SecurityConfig::for_testing();

        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        };

        Self { security, logging }
    }
}
