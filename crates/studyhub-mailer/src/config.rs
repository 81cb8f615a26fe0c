//! Mail configuration loading.
//!
//! Note: Custom Debug impl masks the password to prevent accidental
//! exposure in logs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// SMTP-shaped mail settings. An empty `server` means mail is disabled and
/// every send reports failure.
#[derive(Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Mail server hostname; empty disables sending.
    #[serde(default)]
    pub server: String,
    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Optional login username.
    #[serde(default)]
    pub username: String,
    /// Optional login password. May reference an env var as `${VAR}`.
    #[serde(default)]
    pub password: String,
    /// Whether to negotiate TLS.
    #[serde(default = "default_true")]
    pub use_tls: bool,
    /// From address on outgoing mail.
    #[serde(default = "default_from")]
    pub from_email: String,
}

fn default_port() -> u16 {
    587
}
fn default_true() -> bool {
    true
}
fn default_from() -> String {
    "no-reply@studyhub.local".to_string()
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            port: default_port(),
            username: String::new(),
            password: String::new(),
            use_tls: true,
            from_email: default_from(),
        }
    }
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("use_tls", &self.use_tls)
            .field("from_email", &self.from_email)
            .finish()
    }
}

/// Top-level config file: `[mail]` table plus room to grow.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    mail: MailConfig,
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load mail configuration from well-known paths.
///
/// Search order:
/// 1. `studyhub.toml` in the current directory
/// 2. `~/.config/studyhub/config.toml`
///
/// Environment variable overrides: `STUDYHUB_MAIL_SERVER`,
/// `STUDYHUB_MAIL_USERNAME`, `STUDYHUB_MAIL_PASSWORD`.
pub fn load_config() -> Result<MailConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<MailConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("studyhub.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ConfigFile>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
                .mail
        }
        None => MailConfig::default(),
    };

    // Apply env var overrides
    if let Ok(server) = std::env::var("STUDYHUB_MAIL_SERVER") {
        config.server = server;
    }
    if let Ok(username) = std::env::var("STUDYHUB_MAIL_USERNAME") {
        config.username = username;
    }
    if let Ok(password) = std::env::var("STUDYHUB_MAIL_PASSWORD") {
        config.password = password;
    }

    // Resolve env var references in credential fields
    config.username = resolve_env_vars(&config.username);
    config.password = resolve_env_vars(&config.password);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("studyhub"))
}
