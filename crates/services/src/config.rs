use crate::SignInProvider;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const GEMINI_KEY_ENV: &str = "API_KEY";
pub const STRIPE_KEY_ENV: &str = "STRIPE_PUBLISHABLE_KEY";

/// Keys and settings for the external collaborators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default)]
    pub stripe_publishable_key: Option<String>,
    /// Where the durable key/value store lives. Defaults to the platform
    /// data dir.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
    #[serde(default)]
    pub firebase: FirebaseConfig,
    /// Accounts the local identity provider signs in as.
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
}

impl FirebaseConfig {
    /// Placeholder values (`YOUR_...`) count as missing.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.api_key.starts_with("YOUR_")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub provider: SignInProvider,
    pub uid: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl ServiceConfig {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mobile-studio").join("config.toml"))
    }

    /// Read the user config file, falling back to defaults, then apply
    /// environment overrides.
    pub fn load() -> Self {
        let config = match Self::config_path() {
            Some(path) => match fs::read_to_string(&path) {
                Ok(contents) => Self::from_toml_str(&contents).unwrap_or_else(|e| {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed config");
                    Self::default()
                }),
                Err(_) => Self::default(),
            },
            None => Self::default(),
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Override keys from `lookup` (normally the process environment).
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = non_empty(lookup(GEMINI_KEY_ENV)) {
            self.gemini_api_key = Some(key);
        }
        if let Some(key) = non_empty(lookup(STRIPE_KEY_ENV)) {
            self.stripe_publishable_key = Some(key);
        }
        self
    }

    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini_api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn stripe_publishable_key(&self) -> Option<&str> {
        self.stripe_publishable_key.as_deref().filter(|k| !k.is_empty())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
