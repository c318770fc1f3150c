pub mod login;

use secrecy::SecretString;

/// Actions the CLI can dispatch
#[derive(Debug)]
pub enum Action {
    Login {
        endpoint: String,
        username: String,
        password: SecretString,
        timeout: u64,
    },
}
