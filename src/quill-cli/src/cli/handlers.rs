//! Subcommand dispatch.

use anyhow::Result;

use super::args::{Cli, Commands};
use crate::ui::Ui;

/// Route a parsed CLI invocation to its handler.
///
/// The `Ui` is built once here and passed down explicitly; handlers never
/// reach for global terminal state.
pub async fn dispatch_command(cli: Cli) -> Result<()> {
    let ui = Ui::new(cli.color);
    match cli.command {
        Commands::Chat(args) => crate::chat_cmd::run(args, &ui).await,
        Commands::Code(code_cli) => code_cli.run(&ui).await,
        Commands::Files(files_cli) => files_cli.run(&ui).await,
        Commands::Config(config_cli) => config_cli.run(&ui).await,
        Commands::History(history_cli) => history_cli.run(&ui).await,
        Commands::Index(index_cli) => index_cli.run(&ui).await,
    }
}
