//! Client-secret files as downloaded from the Google Cloud console

use std::path::Path;

use common::Secret;
use serde::Deserialize;

use crate::constants::{GOOGLE_AUTH_URI, GOOGLE_TOKEN_URI};
use crate::error::{Error, Result};

#[derive(Deserialize)]
struct SecretsFile {
    installed: Option<RawSecrets>,
    web: Option<RawSecrets>,
}

#[derive(Deserialize)]
struct RawSecrets {
    client_id: String,
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default)]
    auth_uri: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
}

/// OAuth client configuration for one credential set.
#[derive(Debug, Clone)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: Option<Secret<String>>,
    pub auth_uri: String,
    pub token_uri: String,
}

impl ClientSecrets {
    /// Read and parse a client-secret file.
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::InvalidClientSecrets(format!("reading {}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
            .map_err(|e| Error::InvalidClientSecrets(format!("{}: {e}", path.display())))
    }

    /// Parse the `{"installed": {...}}` or `{"web": {...}}` layout.
    pub fn from_json(contents: &str) -> Result<Self> {
        let file: SecretsFile = serde_json::from_str(contents)
            .map_err(|e| Error::InvalidClientSecrets(e.to_string()))?;
        let raw = file.installed.or(file.web).ok_or_else(|| {
            Error::InvalidClientSecrets("expected an \"installed\" or \"web\" section".into())
        })?;
        if raw.client_id.trim().is_empty() {
            return Err(Error::InvalidClientSecrets("client_id is empty".into()));
        }

        Ok(Self {
            client_id: raw.client_id,
            client_secret: raw.client_secret.filter(|s| !s.is_empty()).map(Secret::new),
            auth_uri: raw.auth_uri.unwrap_or_else(|| GOOGLE_AUTH_URI.to_string()),
            token_uri: raw.token_uri.unwrap_or_else(|| GOOGLE_TOKEN_URI.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_installed_section() {
        let json = r#"{"installed":{
            "client_id":"123.apps.googleusercontent.com",
            "project_id":"demo",
            "auth_uri":"https://accounts.google.com/o/oauth2/auth",
            "token_uri":"https://oauth2.googleapis.com/token",
            "client_secret":"GOCSPX-abc",
            "redirect_uris":["http://localhost"]
        }}"#;
        let secrets = ClientSecrets::from_json(json).unwrap();
        assert_eq!(secrets.client_id, "123.apps.googleusercontent.com");
        assert_eq!(secrets.client_secret.unwrap().expose(), "GOCSPX-abc");
        assert_eq!(secrets.token_uri, GOOGLE_TOKEN_URI);
    }

    #[test]
    fn web_section_with_defaults() {
        let secrets = ClientSecrets::from_json(r#"{"web":{"client_id":"abc"}}"#).unwrap();
        assert!(secrets.client_secret.is_none());
        assert_eq!(secrets.auth_uri, GOOGLE_AUTH_URI);
        assert_eq!(secrets.token_uri, GOOGLE_TOKEN_URI);
    }

    #[test]
    fn missing_section_is_rejected() {
        let err = ClientSecrets::from_json(r#"{"other":{}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidClientSecrets(_)));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(ClientSecrets::from_json("{not json").is_err());
    }

    #[tokio::test]
    async fn missing_file_is_invalid_client_secrets() {
        let err = ClientSecrets::load(Path::new("/nonexistent/client_secret.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/client_secret.json"));
    }
}
