//! Command handlers, one module per top-level subcommand.

pub mod config_cmd;
pub mod liquity;
pub mod tasks;
pub mod tokens;
mod util;

use rotki_core::Session;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a backend-bound command to its handler.
pub async fn dispatch(cmd: Command, session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Liquity(args) => liquity::handle(session, args, global).await,
        Command::Tokens(args) => tokens::handle(session, args, global).await,
        Command::Tasks(args) => tasks::handle(session, args, global).await,
        // Handled in main without a session.
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
