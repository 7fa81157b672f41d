//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! The config file is optional; without one, credentials must come from the
//! command line or `PLAYLIST_ANNOTATOR_CREDENTIALS`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
const DEFAULT_CONFIG_FILE: &str = "playlist-annotator.toml";

/// Token caches live under `~/<PROFILE_DIR_NAME>/<credential-file-name>`.
const PROFILE_DIR_NAME: &str = ".credentials";

/// Root configuration
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Credential sources and token cache settings
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// Client-secret files in rotation order
    #[serde(default)]
    pub credentials: Vec<PathBuf>,
    #[serde(default)]
    pub profile_dir: Option<PathBuf>,
    #[serde(default = "default_consent_timeout")]
    pub consent_timeout_secs: u64,
}

/// Remote API settings
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_consent_timeout() -> u64 {
    300
}

fn default_base_url() -> String {
    youtube_api::DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credentials: Vec::new(),
            profile_dir: None,
            consent_timeout_secs: default_consent_timeout(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load the file named by the CLI or `CONFIG_PATH`, or the default file
    /// if present. An explicitly named file must exist.
    pub fn resolve(cli_path: Option<&Path>) -> common::Result<Self> {
        match Self::explicit_path(cli_path) {
            Some(path) => Self::load(&path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Config path from CLI arg or CONFIG_PATH env var.
    fn explicit_path(cli_path: Option<&Path>) -> Option<PathBuf> {
        if let Some(p) = cli_path {
            return Some(p.to_path_buf());
        }
        std::env::var_os("CONFIG_PATH").map(PathBuf::from)
    }

    /// Overlay `PLAYLIST_ANNOTATOR_CREDENTIALS` (comma-separated) and
    /// `PLAYLIST_ANNOTATOR_PROFILE_DIR`.
    pub fn apply_env(&mut self) {
        if let Ok(list) = std::env::var("PLAYLIST_ANNOTATOR_CREDENTIALS") {
            let credentials: Vec<PathBuf> = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect();
            if !credentials.is_empty() {
                self.auth.credentials = credentials;
            }
        }
        if let Some(dir) = std::env::var_os("PLAYLIST_ANNOTATOR_PROFILE_DIR") {
            self.auth.profile_dir = Some(PathBuf::from(dir));
        }
    }

    /// Overlay command line values. A non-empty credential list replaces
    /// whatever the file or environment configured.
    pub fn apply_cli(&mut self, credentials: Vec<PathBuf>, profile_dir: Option<PathBuf>) {
        if !credentials.is_empty() {
            self.auth.credentials = credentials;
        }
        if profile_dir.is_some() {
            self.auth.profile_dir = profile_dir;
        }
    }

    pub fn validate(&self) -> common::Result<()> {
        if self.auth.credentials.is_empty() {
            return Err(common::Error::Config(
                "at least one credential file is required".into(),
            ));
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(common::Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.auth.consent_timeout_secs == 0 {
            return Err(common::Error::Config(
                "consent_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Directory holding per-credential token caches.
    pub fn profile_dir(&self) -> common::Result<PathBuf> {
        if let Some(dir) = &self.auth.profile_dir {
            return Ok(dir.clone());
        }
        dirs::home_dir()
            .map(|home| home.join(PROFILE_DIR_NAME))
            .ok_or(common::Error::NoHomeDir)
    }
}
