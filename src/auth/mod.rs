pub mod token;

use std::fmt::{Debug, Formatter};
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::ReportError;
pub use crate::auth::token::authorize;

pub const WEBMASTERS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/webmasters.readonly";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            ReportError::Auth(format!(
                "failed reading service account file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ReportError> {
        let key: Self = serde_json::from_str(raw)
            .map_err(|e| ReportError::Auth(format!("invalid service account JSON: {e}")))?;
        key.validate()?;
        Ok(key)
    }

    fn validate(&self) -> Result<(), ReportError> {
        if self.key_type != "service_account" {
            return Err(ReportError::Auth(format!(
                "expected key type \"service_account\", found \"{}\"",
                self.key_type
            )));
        }
        if self.client_email.trim().is_empty() {
            return Err(ReportError::Auth("client_email is empty".to_string()));
        }
        if !self.private_key.contains("PRIVATE KEY") {
            return Err(ReportError::Auth(
                "private_key is not a PEM encoded key".to_string(),
            ));
        }
        Ok(())
    }
}

impl Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct AccessToken {
    value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    pub fn secret(&self) -> &str {
        &self.value
    }
}

impl Debug for AccessToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}
