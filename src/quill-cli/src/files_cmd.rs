//! Basic file and directory operations.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use quill_common::format_bytes;

use crate::ui::Ui;

/// `quill files` subcommands.
#[derive(Args, Debug)]
pub struct FilesCli {
    #[command(subcommand)]
    command: FilesCommand,
}

#[derive(Subcommand, Debug)]
enum FilesCommand {
    /// Print a file's contents
    Read { file: PathBuf },
    /// Write content to a file (overwrites)
    Write {
        file: PathBuf,
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,
    },
    /// Create an empty file, parent directories included
    Create { file: PathBuf },
    /// List a directory
    List {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// Find files matching a glob pattern
    Search { dir: PathBuf, pattern: String },
}

impl FilesCli {
    pub async fn run(self, ui: &Ui) -> Result<()> {
        match self.command {
            FilesCommand::Read { file } => {
                let content = std::fs::read_to_string(&file)?;
                ui.section(&file.display().to_string());
                println!("{content}");
            }
            FilesCommand::Write { file, content } => {
                std::fs::write(&file, content.join(" "))?;
                ui.success(&format!("Wrote {}", file.display()));
            }
            FilesCommand::Create { file } => {
                if let Some(parent) = file.parent()
                    && !parent.as_os_str().is_empty()
                {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::File::create(&file)?;
                ui.success(&format!("Created {}", file.display()));
            }
            FilesCommand::List { dir } => {
                ui.header(&format!("Listing {}", dir.display()));
                let mut rows = Vec::new();
                for entry in std::fs::read_dir(&dir)? {
                    let entry = entry?;
                    let kind = if entry.file_type()?.is_dir() { "dir" } else { "file" };
                    let size = entry
                        .metadata()
                        .map(|m| format_bytes(m.len()))
                        .unwrap_or_else(|_| "-".to_string());
                    rows.push(vec![
                        kind.to_string(),
                        entry.file_name().to_string_lossy().to_string(),
                        size,
                    ]);
                }
                rows.sort_by(|a, b| a[1].cmp(&b[1]));
                ui.table(&["Type", "Name", "Size"], &rows);
            }
            FilesCommand::Search { dir, pattern } => {
                ui.header("File search");
                ui.info(&format!("Searching {} for {pattern}", dir.display()));
                let full_pattern = dir.join(&pattern);
                let mut matches = Vec::new();
                for entry in glob::glob(&full_pattern.to_string_lossy())? {
                    matches.push(entry?.display().to_string());
                }
                if matches.is_empty() {
                    ui.warning(&format!("No files match {pattern}"));
                } else {
                    ui.section("Matches");
                    ui.list(&matches);
                }
            }
        }
        Ok(())
    }
}
