//! Service-account credentials supplied through the environment.

use std::fmt;

use serde::Deserialize;

use crate::error::{ModkitError, Result};

/// Environment variable holding the JSON service-account key.
pub const DEFAULT_CREDENTIALS_ENV: &str = "APPS_CDN_SERVICE_ACCOUNT_CREDENTIALS";

/// OAuth token endpoint used when the key does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// A Google service-account key as downloaded from the cloud console.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("key_type", &self.key_type)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    pub fn from_json(raw: &str) -> Result<Self> {
        let key: Self = serde_json::from_str(raw).map_err(|err| {
            ModkitError::Config(format!("invalid service account credentials: {err}"))
        })?;
        if key.key_type != "service_account" {
            return Err(ModkitError::Config(format!(
                "credentials must be a service_account key, got '{}'",
                key.key_type
            )));
        }
        if key.client_email.trim().is_empty() {
            return Err(ModkitError::Config(
                "service account client_email must be non-empty".to_string(),
            ));
        }
        Ok(key)
    }

    /// Read the key from the environment variable `var`.
    pub fn from_env(var: &str) -> Result<Self> {
        Self::from_env_value(var, std::env::var(var).ok())
    }

    /// Same as [`Self::from_env`] with the variable's value already looked up.
    pub fn from_env_value(var: &str, value: Option<String>) -> Result<Self> {
        match value {
            Some(raw) if !raw.trim().is_empty() => Self::from_json(&raw),
            _ => Err(ModkitError::MissingConfig(format!(
                "{var} not set in the environment"
            ))),
        }
    }
}
