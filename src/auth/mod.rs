//! Authentication outcome modeling shared by both strategies.

pub mod biometric;
pub mod credential;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Result of one authentication attempt. Produced by exactly one
/// authenticator per attempt; never partially successful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure { reason: FailureReason },
}

impl Outcome {
    #[must_use]
    pub fn failure(reason: FailureReason) -> Self {
        Self::Failure { reason }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Why an attempt did not produce a session. The `Display` text is the
/// user-visible reason surfaced through the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    /// Username or password empty; rejected before any network call.
    #[error("missing credentials")]
    MissingCredentials,

    /// The verification service denied the credentials; its message is
    /// passed through verbatim.
    #[error("{0}")]
    Rejected(String),

    /// The verification request could not complete. Locally synthesized;
    /// raw transport detail stays in the logs.
    #[error("connection error")]
    Connection,

    #[error("no biometric hardware")]
    NoHardware,

    #[error("no biometric modality available")]
    NoModality,

    /// The device challenge failed, was cancelled, or fell back.
    #[error("biometric authentication failed")]
    ChallengeFailed,
}

/// Username and password pair as collected by the caller. Transient: held in
/// memory only for the duration of an attempt, with the password behind
/// [`SecretString`] so it never shows up in `Debug` output or logs.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// Both fields non-empty. No format validation beyond presence; the
    /// verification service is authoritative on correctness.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.expose_secret().is_empty()
    }
}
