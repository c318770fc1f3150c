use crate::{
    auth::{credential::CredentialAuthenticator, Credentials, Outcome},
    cli::actions::Action,
    session::{Presenter, SessionController},
};
use anyhow::{anyhow, Result};
use std::time::Duration;
use tracing::debug;

/// Presenter backed by the terminal: "navigation" is a line of output, and
/// the failure notice is printed before the process exits non-zero.
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn on_authenticated(&self) {
        println!("access granted");
    }

    fn on_auth_failed(&self, reason: &str) {
        eprintln!("access denied: {reason}");
    }

    fn on_signed_out(&self) {
        println!("signed out");
    }
}

/// Handle the login action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Login {
            endpoint,
            username,
            password,
            timeout,
        } => {
            debug!("verifying credentials for {username} against {endpoint}");

            let authenticator =
                CredentialAuthenticator::new(&endpoint, Duration::from_secs(timeout))?;
            let credentials = Credentials::new(username, password);
            let controller = SessionController::new(ConsolePresenter);

            match controller
                .sign_in(authenticator.authenticate(&credentials))
                .await?
            {
                Outcome::Success => Ok(()),
                Outcome::Failure { reason } => Err(anyhow!("authentication failed: {reason}")),
            }
        }
    }
}
