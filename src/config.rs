//! Configuration loading
//!
//! Settings come from `$XDG_CONFIG_HOME/stockwatch/config.toml` (missing file
//! means defaults), then environment variables override individual keys.
//! Secrets are gathered into [`Credentials`] once and handed to adapters at
//! construction time.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const CONFIG_DIR: &str = "stockwatch";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_AI_MODEL: &str = "gemini-1.5-flash";

/// API keys and sender login. Never printed.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Credentials {
    pub alpha_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn mask(v: &Option<String>) -> &'static str {
            if v.is_some() {
                "<set>"
            } else {
                "<unset>"
            }
        }
        f.debug_struct("Credentials")
            .field("alpha_key", &mask(&self.alpha_key))
            .field("gemini_api_key", &mask(&self.gemini_api_key))
            .field("sender_email", &self.sender_email)
            .field("sender_password", &mask(&self.sender_password))
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AiSettings {
    pub model: String,
    /// SEC form type under review (e.g. "8-K"); prompts say "Standard Review" when unset
    pub filing_form: Option<String>,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_AI_MODEL.to_string(),
            filing_form: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Upper bound for every outbound HTTP call
    pub http_timeout_secs: u64,
    /// Watch list database; `~/.stockwatch/watchlist.db` when unset
    pub db_path: Option<PathBuf>,
    pub smtp: SmtpSettings,
    pub ai: AiSettings,
    pub credentials: Credentials,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            db_path: None,
            smtp: SmtpSettings::default(),
            ai: AiSettings::default(),
            credentials: Credentials::default(),
        }
    }
}

impl Config {
    /// Load from the default location, then apply process environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match default_config_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML file. A missing file yields defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml_str(&text).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Override keys from an environment lookup. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("ALPHA_KEY") {
            self.credentials.alpha_key = Some(v);
        }
        if let Some(v) = get("GEMINI_API_KEY") {
            self.credentials.gemini_api_key = Some(v);
        }
        if let Some(v) = get("SENDER_EMAIL") {
            self.credentials.sender_email = Some(v);
        }
        if let Some(v) = get("SENDER_PASSWORD") {
            self.credentials.sender_password = Some(v);
        }
        if let Some(v) = get("STOCKWATCH_DB") {
            self.db_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get("STOCKWATCH_HTTP_TIMEOUT_SECS") {
            match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.http_timeout_secs = secs,
                _ => tracing::warn!("Ignoring invalid STOCKWATCH_HTTP_TIMEOUT_SECS={}", v),
            }
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dir_spec::config_home().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.http_timeout_secs, 10);
        assert_eq!(config.smtp.host, "smtp.gmail.com");
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.ai.model, "gemini-1.5-flash");
        assert!(config.ai.filing_form.is_none());
        assert!(config.credentials.alpha_key.is_none());
    }

    #[test]
    fn test_ai_section_sets_filing_form() {
        let config = Config::from_toml_str(
            r#"
            [ai]
            filing_form = "10-Q"
            "#,
        )
        .unwrap();
        assert_eq!(config.ai.filing_form.as_deref(), Some("10-Q"));
        assert_eq!(config.ai.model, DEFAULT_AI_MODEL);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            http_timeout_secs = 5

            [credentials]
            alpha_key = "av-123"
            "#,
        )
        .unwrap();
        assert_eq!(config.http_timeout_secs, 5);
        assert_eq!(config.credentials.alpha_key.as_deref(), Some("av-123"));
        assert_eq!(config.smtp, SmtpSettings::default());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::from_toml_str(
            r#"
            [credentials]
            sender_email = "file@example.com"
            "#,
        )
        .unwrap();

        let env: HashMap<&str, &str> = HashMap::from([
            ("SENDER_EMAIL", "env@example.com"),
            ("GEMINI_API_KEY", "g-key"),
            ("ALPHA_KEY", "  "),
            ("STOCKWATCH_HTTP_TIMEOUT_SECS", "3"),
        ]);
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(
            config.credentials.sender_email.as_deref(),
            Some("env@example.com")
        );
        assert_eq!(config.credentials.gemini_api_key.as_deref(), Some("g-key"));
        assert!(config.credentials.alpha_key.is_none());
        assert_eq!(config.http_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_timeout_env_is_ignored() {
        let mut config = Config::default();
        config.apply_env(|k| (k == "STOCKWATCH_HTTP_TIMEOUT_SECS").then(|| "0".to_string()));
        assert_eq!(config.http_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::from_file(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_debug_masks_secrets() {
        let creds = Credentials {
            alpha_key: Some("secret-av".to_string()),
            gemini_api_key: None,
            sender_email: Some("me@example.com".to_string()),
            sender_password: Some("hunter2".to_string()),
        };
        let shown = format!("{:?}", creds);
        assert!(!shown.contains("secret-av"));
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("me@example.com"));
    }
}
