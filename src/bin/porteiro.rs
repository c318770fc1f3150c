use anyhow::Result;
use porteiro::cli::{actions, actions::Action, start};

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    // Start the program
    let action = start()?;

    // Handle the action
    match action {
        Action::Login { .. } => actions::login::handle(action).await?,
    }

    Ok(())
}
