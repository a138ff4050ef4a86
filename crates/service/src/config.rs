//! Configuration loading and validation for the field encryption service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is invalid. The key secret
//! itself is never printed: it is held as a [`Secret`].

use anyhow::{Context, Result};
use fieldseal::{Algorithm, KeyConfig};
use secrecy::Secret;
use serde::Deserialize;

/// Deployment postures recognised in `APP_ENV`.
const APP_ENVS: &[&str] = &["development", "test", "staging", "production"];

/// Validated service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Deployment posture: `development`, `test`, `staging` or `production`.
    #[serde(default = "default_app_env")]
    pub app_env: String,

    /// Secret key string. Only its first 32 bytes are used.
    #[serde(default)]
    pub encryption_key: Option<Secret<String>>,

    /// AEAD used for new envelopes.
    #[serde(default = "default_encryption_algorithm")]
    pub encryption_algorithm: String,

    /// Refuse the development default key. Defaults to `true` in production.
    #[serde(default)]
    pub require_configured_key: Option<bool>,

    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP/gRPC endpoint for trace export. Export is disabled when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,
}

fn default_app_env() -> String {
    "development".into()
}
fn default_encryption_algorithm() -> String {
    Algorithm::DEFAULT.identifier().into()
}
fn default_listen_port() -> u16 {
    3100
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// Whether the development default key is forbidden.
    pub fn requires_configured_key(&self) -> bool {
        self.require_configured_key
            .unwrap_or_else(|| self.is_production())
    }

    /// Key settings handed to [`fieldseal::KeyMaterial::resolve`].
    pub fn key_config(&self) -> KeyConfig {
        KeyConfig {
            secret: self.encryption_key.clone(),
            require_configured_key: self.requires_configured_key(),
        }
    }

    /// The parsed algorithm for new envelopes.
    pub fn algorithm(&self) -> Result<Algorithm> {
        Algorithm::from_identifier(&self.encryption_algorithm)
            .context("ENCRYPTION_ALGORITHM is invalid")
    }

    /// OTLP endpoint, if export is enabled.
    pub fn otlp_endpoint(&self) -> Option<&str> {
        self.otel_exporter_otlp_endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if !APP_ENVS.contains(&self.app_env.as_str()) {
            anyhow::bail!(
                "APP_ENV must be one of {}, got {:?}",
                APP_ENVS.join(", "),
                self.app_env
            );
        }
        if self.is_production() && self.require_configured_key == Some(false) {
            anyhow::bail!("REQUIRE_CONFIGURED_KEY cannot be disabled in production");
        }
        ensure_non_empty(&self.log_level, "LOG_LEVEL")?;
        if self.listen_port == 0 {
            anyhow::bail!("LISTEN_PORT must be > 0");
        }
        self.algorithm()?;
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
