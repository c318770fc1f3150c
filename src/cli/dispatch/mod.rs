use crate::auth::credential::DEFAULT_TIMEOUT;
use crate::cli::actions::Action;
use anyhow::Result;
use secrecy::SecretString;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Login {
        endpoint: matches
            .get_one("endpoint")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --endpoint"))?,
        username: matches
            .get_one("username")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --username"))?,
        password: matches
            .get_one("password")
            .map(|s: &String| SecretString::from(s.to_string()))
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --password"))?,
        timeout: matches
            .get_one::<u64>("timeout")
            .copied()
            .unwrap_or(DEFAULT_TIMEOUT.as_secs()),
    })
}
