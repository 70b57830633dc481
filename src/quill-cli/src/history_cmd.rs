//! Saved-session management.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use quill_storage::SessionStorage;

use crate::ui::Ui;

/// `quill history` subcommands. With no subcommand, lists sessions.
#[derive(Args, Debug)]
pub struct HistoryCli {
    #[command(subcommand)]
    command: Option<HistoryCommand>,
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// List saved sessions, newest first
    List,
    /// Print one session's messages
    Show { id: String },
    /// Delete one session
    Delete { id: String },
    /// Delete all saved sessions
    Clear,
}

impl HistoryCli {
    pub async fn run(self, ui: &Ui) -> Result<()> {
        let storage = SessionStorage::new()?;
        match self.command.unwrap_or(HistoryCommand::List) {
            HistoryCommand::List => list(&storage, ui),
            HistoryCommand::Show { id } => show(&storage, &id, ui),
            HistoryCommand::Delete { id } => {
                let id = resolve_id(&storage, &id)?;
                storage.delete_session(&id)?;
                ui.success(&format!("Deleted session {id}"));
                Ok(())
            }
            HistoryCommand::Clear => {
                let removed = storage.clear_sessions()?;
                ui.success(&format!("Removed {removed} sessions"));
                Ok(())
            }
        }
    }
}

fn list(storage: &SessionStorage, ui: &Ui) -> Result<()> {
    let sessions = storage.list_sessions()?;
    if sessions.is_empty() {
        ui.info("No saved sessions");
        return Ok(());
    }

    ui.header("Chat history");
    let rows: Vec<Vec<String>> = sessions
        .iter()
        .map(|s| {
            vec![
                short_id(&s.id),
                s.title.clone().unwrap_or_else(|| "-".to_string()),
                s.model.clone(),
                s.message_count.to_string(),
                format_timestamp(s.updated_at),
            ]
        })
        .collect();
    ui.table(&["ID", "Title", "Model", "Messages", "Updated"], &rows);
    Ok(())
}

fn show(storage: &SessionStorage, id: &str, ui: &Ui) -> Result<()> {
    let id = resolve_id(storage, id)?;
    let session = storage.get_session(&id)?;

    let title = session.title.clone().unwrap_or_else(|| session.id.clone());
    ui.header(&title);
    ui.dim(&format!(
        "{} - {}",
        session.model,
        format_timestamp(session.updated_at)
    ));

    for message in &session.messages {
        println!();
        let label = if message.role == "user" { "You: " } else { "AI: " };
        ui.prompt(label);
        println!("{}", message.content);
    }
    Ok(())
}

/// Accept full ids or unique prefixes.
fn resolve_id(storage: &SessionStorage, id: &str) -> Result<String> {
    if storage.get_session(id).is_ok() {
        return Ok(id.to_string());
    }
    let matches: Vec<String> = storage
        .list_sessions()?
        .into_iter()
        .filter(|s| s.id.starts_with(id))
        .map(|s| s.id)
        .collect();
    match matches.len() {
        1 => Ok(matches.into_iter().next().unwrap()),
        0 => bail!("no session matches '{id}'"),
        _ => bail!("'{id}' is ambiguous ({} matches)", matches.len()),
    }
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

fn format_timestamp(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
