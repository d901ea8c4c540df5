//! OAuth2 service-account flow: sign a JWT assertion and trade it for a
//! bearer token.

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cdn::credentials::ServiceAccountKey;
use crate::error::{ModkitError, Result};

/// Read/write access to Cloud Storage objects.
pub const STORAGE_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_write";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JwtClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl JwtClaims {
    pub fn new(key: &ServiceAccountKey, scope: &str, issued_at: i64) -> Self {
        Self {
            iss: key.client_email.clone(),
            scope: scope.to_string(),
            aud: key.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Build the RS256-signed JWT assertion for `key`.
pub fn signed_assertion(key: &ServiceAccountKey, issued_at: i64) -> Result<String> {
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|err| {
        ModkitError::Auth(format!("invalid service account private key: {err}"))
    })?;

    let header = Header {
        alg: Algorithm::RS256,
        kid: key.private_key_id.clone(),
        ..Header::default()
    };
    let claims = JwtClaims::new(key, STORAGE_SCOPE, issued_at);

    encode(&header, &claims, &encoding_key)
        .map_err(|err| ModkitError::Auth(format!("failed to sign token assertion: {err}")))
}

/// Exchange a fresh assertion for an access token at the key's token URI.
pub fn fetch_access_token(
    http: &reqwest::blocking::Client,
    key: &ServiceAccountKey,
) -> Result<AccessToken> {
    let assertion = signed_assertion(key, Utc::now().timestamp())?;
    let body = format!(
        "grant_type={}&assertion={}",
        urlencoding::encode(JWT_BEARER_GRANT),
        urlencoding::encode(&assertion)
    );

    debug!(token_uri = %key.token_uri, "requesting access token");
    let response = http
        .post(&key.token_uri)
        .header(
            reqwest::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(body)
        .send()?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().unwrap_or_default();
        return Err(ModkitError::Auth(format!(
            "token exchange failed: HTTP {status}: {}",
            detail.trim()
        )));
    }

    let token = response.json::<AccessToken>().map_err(|err| {
        ModkitError::Auth(format!("parse token response: {err}"))
    })?;
    if token.access_token.is_empty() {
        return Err(ModkitError::Auth(
            "token response did not include an access token".to_string(),
        ));
    }
    Ok(token)
}
