//! Configuration management for creatorscope.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. Command-line flags are applied on top by
//! the binary.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Environment variable holding the listing-site account email.
pub const EMAIL_ENV: &str = "CREATORSCOPE_EMAIL";
/// Environment variable holding the listing-site account password.
pub const PASSWORD_ENV: &str = "CREATORSCOPE_PASSWORD";

/// Main application configuration.
///
/// This is loaded from `~/.config/creatorscope/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Page budgets, delays and output location
    pub scraping: ScrapingConfig,
    /// Listing site endpoints and session storage
    pub site: SiteConfig,
    /// Social bio site endpoints
    pub social: SocialConfig,
    /// Browser automation settings
    pub browser: BrowserConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if
    /// the file does not exist.
    pub fn load_from(config_path: &Path) -> ConfigResult<Self> {
        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `CREATORSCOPE_HEADLESS`: Override browser headless mode (true/false)
    /// - `CREATORSCOPE_DELAY_MS`: Override the inter-request delay
    /// - `CREATORSCOPE_MAX_PROFILES`: Override the per-category row budget
    pub fn load_with_env(config_path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production).
    ///
    /// Values that fail to parse are ignored and the configured value is kept.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(headless) = lookup("CREATORSCOPE_HEADLESS").and_then(|v| v.parse().ok()) {
            self.browser.headless = headless;
            tracing::debug!("Override browser.headless from env: {}", headless);
        }

        if let Some(delay) = lookup("CREATORSCOPE_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.scraping.delay_ms = delay;
            tracing::debug!("Override scraping.delay_ms from env: {}", delay);
        }

        if let Some(max) = lookup("CREATORSCOPE_MAX_PROFILES").and_then(|v| v.parse().ok()) {
            self.scraping.max_profiles_per_category = max;
            tracing::debug!("Override scraping.max_profiles_per_category from env: {}", max);
        }
    }

    /// Check values that would make a run meaningless or unplannable.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scraping.pages_per_category == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scraping.pages_per_category".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        for (field, value) in [
            ("site.base_url", &self.site.base_url),
            ("site.ugc_url", &self.site.ugc_url),
            ("site.video_url", &self.site.video_url),
            ("site.login_url", &self.site.login_url),
            ("social.base_url", &self.social.base_url),
        ] {
            url::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
                field: field.to_string(),
                reason: format!("not an absolute URL: {e}"),
            })?;
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/creatorscope/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Get the data directory path, where session cookies are kept.
    ///
    /// Uses XDG base directories: `~/.local/share/creatorscope`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    /// Resolve the cookie jar location. Relative paths live under the data directory.
    pub fn cookies_path(&self) -> ConfigResult<PathBuf> {
        if self.site.cookies_file.is_absolute() {
            Ok(self.site.cookies_file.clone())
        } else {
            Ok(Self::data_dir()?.join(&self.site.cookies_file))
        }
    }

    fn project_dirs() -> ConfigResult<ProjectDirs> {
        ProjectDirs::from("com", "creatorscope", "creatorscope").ok_or(ConfigError::NoConfigDir)
    }
}

/// Page budgets, pacing and output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapingConfig {
    /// Listing pages visited per category
    pub pages_per_category: u32,
    /// Accepted rows kept per category
    pub max_profiles_per_category: usize,
    /// Minimum delay between navigations to the same site, in milliseconds
    pub delay_ms: u64,
    /// How long to wait for listing cards to render, in seconds
    pub listing_timeout_secs: u64,
    /// How long to wait for a profile or bio page body, in seconds
    pub profile_timeout_secs: u64,
    /// Directory the per-category CSV files are written to
    pub output_dir: PathBuf,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            pages_per_category: 3,
            max_profiles_per_category: 400,
            delay_ms: 1000,
            listing_timeout_secs: 10,
            profile_timeout_secs: 10,
            output_dir: PathBuf::from("."),
        }
    }
}

/// Listing site endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Origin that relative profile links are resolved against
    pub base_url: String,
    /// Seed listing URL for the `ugc` category
    pub ugc_url: String,
    /// Seed listing URL for the `video_editor` category
    pub video_url: String,
    /// Login form URL
    pub login_url: String,
    /// The site's own social account, never taken as a creator handle
    pub brand_account: String,
    /// Cookie jar file, relative to the data directory unless absolute
    pub cookies_file: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://collabstr.com".to_string(),
            ugc_url: "https://collabstr.com/influencers?c=ugc".to_string(),
            video_url: "https://collabstr.com/influencers?c=video".to_string(),
            login_url: "https://collabstr.com/login".to_string(),
            brand_account: "collabstr".to_string(),
            cookies_file: PathBuf::from("listing_cookies.json"),
        }
    }
}

/// Social bio site endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    /// Origin that account handles are appended to
    pub base_url: String,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.instagram.com".to_string(),
        }
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run the listing-site browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Navigation timeout in seconds
    pub navigation_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            navigation_timeout_secs: 30,
        }
    }
}

/// Listing-site login credentials. Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Resolve credentials from explicit values, falling back to the
    /// `CREATORSCOPE_EMAIL` / `CREATORSCOPE_PASSWORD` environment variables.
    pub fn resolve(email: Option<String>, password: Option<String>) -> ConfigResult<Self> {
        Self::resolve_with(email, password, |key| std::env::var(key).ok())
    }

    /// Same as [`Credentials::resolve`] with an injectable lookup.
    pub fn resolve_with<F>(
        email: Option<String>,
        password: Option<String>,
        lookup: F,
    ) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let email = email.or_else(|| lookup(EMAIL_ENV)).filter(|v| !v.is_empty());
        let password = password
            .or_else(|| lookup(PASSWORD_ENV))
            .filter(|v| !v.is_empty());

        match (email, password) {
            (Some(email), Some(password)) => Ok(Self { email, password }),
            _ => Err(ConfigError::MissingCredentials {
                email_var: EMAIL_ENV,
                password_var: PASSWORD_ENV,
            }),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
