//! Service account credentials and OAuth2 access tokens
//!
//! Access tokens are obtained with the JWT-bearer grant: a short-lived RS256
//! assertion signed with the service account's private key is exchanged at
//! the key's `token_uri`. Tokens are reused until shortly before expiry.

use crate::error::{AgentAssistError, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// OAuth scope required by the Dialogflow API
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Token endpoint used when the key does not name one
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime accepted by Google (max one hour)
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens closer than this to expiry are refreshed
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Deserialize)]
struct RawServiceAccountKey {
    #[serde(rename = "type")]
    key_type: Option<String>,
    project_id: Option<String>,
    private_key_id: Option<String>,
    private_key: Option<String>,
    client_email: Option<String>,
    token_uri: Option<String>,
}

/// Parsed service account key
#[derive(Debug)]
pub struct ServiceAccountKey {
    pub project_id: Option<String>,
    pub client_email: String,
    pub private_key_id: Option<String>,
    pub token_uri: String,
    private_key: SecretString,
}

impl ServiceAccountKey {
    /// Parse a service account JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawServiceAccountKey = serde_json::from_str(json).map_err(|e| {
            AgentAssistError::Credentials(format!("service account JSON is not valid: {}", e))
        })?;

        match raw.key_type.as_deref() {
            Some("service_account") => {}
            Some(other) => {
                return Err(AgentAssistError::Credentials(format!(
                    "expected credentials of type 'service_account', got '{}'",
                    other
                )))
            }
            None => {
                return Err(AgentAssistError::Credentials(
                    "service account JSON is missing 'type'".to_string(),
                ))
            }
        }

        let client_email = raw
            .client_email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| {
                AgentAssistError::Credentials(
                    "service account JSON is missing 'client_email'".to_string(),
                )
            })?;

        let private_key = raw
            .private_key
            .filter(|k| k.contains("-----BEGIN") && k.contains("PRIVATE KEY-----"))
            .ok_or_else(|| {
                AgentAssistError::Credentials(
                    "service account JSON is missing a PEM 'private_key'".to_string(),
                )
            })?;

        Ok(Self {
            project_id: raw.project_id,
            client_email,
            private_key_id: raw.private_key_id,
            token_uri: raw
                .token_uri
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            private_key: SecretString::from(private_key),
        })
    }

    /// Read and parse a service account JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            AgentAssistError::Credentials(format!(
                "failed to read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }

    fn encoding_key(&self) -> Result<EncodingKey> {
        EncodingKey::from_rsa_pem(self.private_key.expose_secret().as_bytes()).map_err(|e| {
            AgentAssistError::Credentials(format!("private key is not a valid RSA PEM: {}", e))
        })
    }
}

/// JWT claims for the token exchange assertion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl AssertionClaims {
    pub fn new(key: &ServiceAccountKey, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iss: key.client_email.clone(),
            scope: CLOUD_PLATFORM_SCOPE.to_string(),
            aud: key.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

struct CachedToken {
    token: SecretString,
    expires_at: DateTime<Utc>,
}

fn is_fresh(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now + Duration::seconds(REFRESH_MARGIN_SECS) < expires_at
}

/// Issues access tokens for one service account
pub struct TokenProvider {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    /// Create a provider; fails if the private key cannot be loaded
    pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Result<Self> {
        let encoding_key = key.encoding_key()?;
        Ok(Self {
            key,
            encoding_key,
            http,
            cached: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Current access token, exchanging a fresh assertion when needed
    pub async fn access_token(&self) -> Result<SecretString> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref() {
            if is_fresh(token.expires_at, now) {
                return Ok(SecretString::from(token.token.expose_secret().to_string()));
            }
        }

        debug!("Requesting access token for {}", self.key.client_email);
        let fresh = self.exchange(now).await?;
        let token = SecretString::from(fresh.token.expose_secret().to_string());
        *cached = Some(fresh);
        Ok(token)
    }

    async fn exchange(&self, now: DateTime<Utc>) -> Result<CachedToken> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let claims = AssertionClaims::new(&self.key, now);
        let assertion = jsonwebtoken::encode(&header, &claims, &self.encoding_key)?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AgentAssistError::Auth(format!(
                "token endpoint returned {}: {}",
                status, error_text
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AgentAssistError::Auth(format!("invalid token response: {}", e)))?;

        let lifetime = token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
        info!("Obtained access token (expires in {}s)", lifetime);

        Ok(CachedToken {
            token: SecretString::from(token.access_token),
            expires_at: now + Duration::seconds(lifetime),
        })
    }
}
