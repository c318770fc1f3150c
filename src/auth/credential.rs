//! Credential strategy: one POST to the remote verification service per
//! attempt, interpreted into an [`Outcome`]. The service response body is
//! authoritative; transport errors and unparseable bodies collapse into the
//! locally synthesized "connection error" reason.

use crate::{
    auth::{Credentials, FailureReason, Outcome},
    APP_USER_AGENT,
};
use anyhow::{anyhow, Result};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const LOGIN_PATH: &str = "/v1/auth/login";

/// Default request timeout; expiry maps to the "connection error" reason.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct VerifyRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Build the verification URL from the configured base endpoint.
pub fn verify_url(base: &str) -> Result<Url> {
    let url = Url::parse(base)?;

    let scheme = url.scheme();
    if !matches!(scheme, "http" | "https") {
        return Err(anyhow!("Error parsing URL: unsupported scheme {}", scheme));
    }

    let host = url
        .host()
        .ok_or_else(|| anyhow!("Error parsing URL: no host specified"))?
        .to_owned();

    let port = match url.port() {
        Some(p) => p,
        None => match scheme {
            "https" => 443,
            _ => 80,
        },
    };

    let verify_url = Url::parse(&format!("{scheme}://{host}:{port}{LOGIN_PATH}"))?;

    debug!("verification URL: {}", verify_url);

    Ok(verify_url)
}

/// Sends a username/password pair to the remote verification endpoint and
/// interprets the structured response.
pub struct CredentialAuthenticator {
    client: Client,
    endpoint: Url,
}

impl CredentialAuthenticator {
    /// Create an authenticator against `base` (scheme + host + optional
    /// port), with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is not a usable http(s) URL or the HTTP
    /// client cannot be constructed.
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        let endpoint = verify_url(base)?;

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, endpoint })
    }

    /// Run one verification attempt. Exactly one network call, no retries;
    /// callers may re-invoke. Never returns an error: every failure mode is
    /// folded into `Outcome::Failure`.
    #[instrument(skip_all, fields(username = %credentials.username))]
    pub async fn authenticate(&self, credentials: &Credentials) -> Outcome {
        if !credentials.is_complete() {
            debug!("empty username or password, skipping verification call");
            return Outcome::failure(FailureReason::MissingCredentials);
        }

        match self.verify(credentials).await {
            Ok(response) if response.success => Outcome::Success,
            Ok(response) => Outcome::failure(FailureReason::Rejected(
                response
                    .message
                    .unwrap_or_else(|| "authentication rejected".to_string()),
            )),
            Err(err) => {
                debug!("verification request failed: {err:#}");
                Outcome::failure(FailureReason::Connection)
            }
        }
    }

    // The HTTP status is not consulted: the service reports denial through
    // the body's success flag, so only an unparseable body or a transport
    // failure counts as a connection error.
    async fn verify(&self, credentials: &Credentials) -> Result<VerifyResponse> {
        let payload = VerifyRequest {
            username: &credentials.username,
            password: credentials.password.expose_secret(),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await?;

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_url_with_port() {
        let url = verify_url("http://127.0.0.1:3000").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:3000/v1/auth/login");
    }

    #[test]
    fn test_verify_url_default_ports() {
        let http = verify_url("http://auth.example.com").unwrap();
        assert_eq!(http.as_str(), "http://auth.example.com:80/v1/auth/login");

        let https = verify_url("https://auth.example.com").unwrap();
        assert_eq!(https.as_str(), "https://auth.example.com:443/v1/auth/login");
    }

    #[test]
    fn test_verify_url_rejects_unsupported_scheme() {
        assert!(verify_url("ftp://auth.example.com").is_err());
        assert!(verify_url("not a url").is_err());
    }

    #[test]
    fn test_verify_response_parsing() {
        let ok: VerifyResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(ok.success);
        assert!(ok.message.is_none());

        let denied: VerifyResponse =
            serde_json::from_str(r#"{"success": false, "message": "invalid password"}"#).unwrap();
        assert!(!denied.success);
        assert_eq!(denied.message.as_deref(), Some("invalid password"));
    }

    #[test]
    fn test_request_serializes_both_fields() {
        let payload = VerifyRequest {
            username: "alice",
            password: "correct-pw",
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["password"], "correct-pw");
    }
}
