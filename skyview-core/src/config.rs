use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::PathBuf, time::Duration};

/// Environment variable that overrides the key stored on disk.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Values shipped in sample configs that mean "not configured yet".
const PLACEHOLDER_KEYS: &[&str] = &[
    "YOUR_API_KEY",
    "<YOUR_API_KEY>",
    "YOUR_OPENWEATHERMAP_API_KEY",
];

/// OpenWeatherMap API key.
///
/// Opaque to the rest of the crate; the only question asked of it is whether
/// it is usable. Debug output never shows the key.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// False for blank keys and known placeholders.
    pub fn is_configured(&self) -> bool {
        let key = self.0.trim();
        !key.is_empty()
            && !PLACEHOLDER_KEYS
                .iter()
                .any(|placeholder| placeholder.eq_ignore_ascii_case(key))
    }

    pub fn as_str(&self) -> &str {
        self.0.trim()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_configured() { "<redacted>" } else { "<unset>" };
        f.debug_tuple("Credential").field(&state).finish()
    }
}

/// The `[openweather]` table.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OpenWeatherConfig {
    pub api_key: Option<String>,

    /// Current-weather endpoint; only overridden for testing or proxies.
    pub base_url: Option<String>,

    pub timeout_secs: Option<u64>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// [openweather]
/// api_key = "..."
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub openweather: OpenWeatherConfig,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skyview", "skyview")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openweather.api_key = Some(api_key);
    }

    /// Credential from `OPENWEATHER_API_KEY` if set, else from the file.
    pub fn credential(&self) -> Credential {
        self.credential_with_override(std::env::var(API_KEY_ENV).ok())
    }

    /// A non-blank override wins over the stored key.
    pub fn credential_with_override(&self, env_key: Option<String>) -> Credential {
        env_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.openweather.api_key.clone())
            .map(Credential::new)
            .unwrap_or_default()
    }

    pub fn base_url(&self) -> &str {
        self.openweather.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.openweather.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}
