//! Command dispatch: bridges CLI args -> API / core calls -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod inventory;
pub mod networks;
pub mod sensors;
pub mod util;
pub mod watch;

use gwnly_api::GwnClient;

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: GwnClient,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Auth => auth::handle(&client, global).await,
        Command::Networks => networks::handle(&client, global).await,
        Command::Aps(args) => inventory::handle_aps(&client, args, global).await,
        Command::Clients(args) => inventory::handle_clients(&client, args, global).await,
        Command::Snapshot(scope) => inventory::handle_snapshot(&client, scope, global).await,
        Command::Sensors(args) => sensors::handle(&client, args, global).await,
        Command::Watch(args) => watch::handle(client, args, cfg, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
