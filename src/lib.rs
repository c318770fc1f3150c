//! # Porteiro (Login Gatekeeper)
//!
//! `porteiro` authenticates a user before granting access to a protected
//! application surface. Two independent strategies are supported:
//!
//! - **Credential login** — a username/password pair is sent to a remote
//!   verification service; the service is authoritative on correctness and
//!   owns credential storage. Credentials travel in a JSON request body over
//!   POST, never as query parameters.
//! - **Biometric login** — the local device is probed for biometric hardware
//!   and supported modalities, then asked to run a verification challenge.
//!
//! Both strategies produce a single [`auth::Outcome`] which the
//! [`session::SessionController`] folds into the session state machine
//! (`Unauthenticated` / `Authenticated`). Presentation is an external
//! collaborator behind the [`session::Presenter`] trait: the core never
//! touches a screen, it only emits navigation signals.
//!
//! No failure escapes an authenticator: network errors, device limitations
//! and server rejections all collapse into `Outcome::Failure` with a
//! human-readable reason, and the user may simply retry.

pub mod auth;
pub mod cli;
pub mod session;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
