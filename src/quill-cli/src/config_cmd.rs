//! Configuration display and mutation.

use anyhow::Result;
use clap::{Args, Subcommand};
use quill_storage::{Config, QuillPaths};

use crate::ui::Ui;

/// `quill config` subcommands. With no subcommand, shows current settings.
#[derive(Args, Debug)]
pub struct ConfigCli {
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Show current settings
    Show,
    /// Set a configuration value
    Set { key: String, value: String },
    /// Reset configuration to defaults
    Reset,
}

impl ConfigCli {
    pub async fn run(self, ui: &Ui) -> Result<()> {
        let paths = QuillPaths::new()?;
        match self.command.unwrap_or(ConfigCommand::Show) {
            ConfigCommand::Show => {
                let config = Config::load(&paths)?;
                ui.header("Configuration");
                show_table(ui, &config);
                ui.info("Use 'quill config set <key> <value>' to modify settings");
                ui.info("Keys: model, api_key, base_url, max_history, max_tokens, temperature");
            }
            ConfigCommand::Set { key, value } => {
                let mut config = Config::load(&paths)?;
                config.set(&key, &value)?;
                config.save(&paths)?;
                ui.success(&format!("Set {key}"));
                show_table(ui, &config);
            }
            ConfigCommand::Reset => {
                let config = Config::default();
                config.save(&paths)?;
                ui.success("Configuration reset to defaults");
                show_table(ui, &config);
            }
        }
        Ok(())
    }
}

fn show_table(ui: &Ui, config: &Config) {
    let rows: Vec<Vec<String>> = config
        .entries()
        .into_iter()
        .map(|(key, value)| vec![key.to_string(), value])
        .collect();
    ui.table(&["Setting", "Value"], &rows);
}
