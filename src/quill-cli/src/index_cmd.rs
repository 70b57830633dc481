//! Codebase indexing and context-augmented queries.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use quill_common::format_bytes;
use quill_index::{CodebaseIndex, IndexError, IndexStore};
use quill_index::report::{format_file_structure, format_key_files, format_overview};
use quill_storage::{Config, QuillPaths};

use crate::code_cmd::{ask, load_client};
use crate::ui::Ui;

/// `quill index` subcommands.
#[derive(Args, Debug)]
pub struct IndexCli {
    #[command(subcommand)]
    command: IndexCommand,
}

#[derive(Subcommand, Debug)]
enum IndexCommand {
    /// Walk a codebase and persist its summary
    Build {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Ask a question with the indexed codebase as context
    Query { query: String },
    /// Show statistics about the current index
    Stats,
    /// Delete the persisted index
    Clear,
    /// Full architectural analysis of the indexed codebase
    Analyze {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

impl IndexCli {
    pub async fn run(self, ui: &Ui) -> Result<()> {
        let paths = QuillPaths::new()?;
        let store = IndexStore::new(paths.index_file());
        match self.command {
            IndexCommand::Build { path } => {
                build(&store, &paths, &path, ui)?;
                Ok(())
            }
            IndexCommand::Query { query } => run_query(&store, &query, ui).await,
            IndexCommand::Stats => stats(&store, ui),
            IndexCommand::Clear => {
                match store.clear() {
                    Ok(()) => ui.success("Index cleared"),
                    Err(IndexError::IndexNotBuilt) => ui.info("No index to clear"),
                    Err(err) => return Err(err.into()),
                }
                Ok(())
            }
            IndexCommand::Analyze { path } => analyze(&store, &paths, &path, ui).await,
        }
    }
}

fn build(store: &IndexStore, paths: &QuillPaths, path: &PathBuf, ui: &Ui) -> Result<CodebaseIndex> {
    let config = Config::load(paths)?;
    ui.info(&format!("Indexing {}", path.display()));
    ui.dim("Large codebases can take a moment");

    let index = store.build(path, &config.model)?;

    ui.success(&format!("Indexed {} files", index.file_count()));
    ui.info(&format!("Total lines: {}", index.total_lines));
    ui.info(&format!("Directories: {}", index.directories));
    ui.info(&format!("Size: {}", format_bytes(index.total_bytes)));
    Ok(index)
}

async fn run_query(store: &IndexStore, query: &str, ui: &Ui) -> Result<()> {
    let Some((config, client)) = load_client(ui)? else {
        return Ok(());
    };
    let index = match store.load() {
        Ok(index) => index,
        Err(IndexError::IndexNotBuilt) => {
            ui.error("No codebase index found");
            ui.info("Run: quill index build <path>");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let prompt = format!(
        "You have access to an indexed codebase. Answer the following query based on it.\n\n\
         Query: {query}\n\n\
         Codebase information:\n{}\n\
         File structure:\n{}\n\
         Key files and their purposes:\n{}\n\
         Provide a concrete answer grounded in the files above. If the query is about\n\
         specific functionality, explain how it is implemented in this codebase.",
        format_overview(&index),
        format_file_structure(&index.files),
        format_key_files(&index.files),
    );

    let answer = ask(&client, &config, prompt, ui).await?;
    ui.section("Answer");
    println!("{answer}");
    Ok(())
}

fn stats(store: &IndexStore, ui: &Ui) -> Result<()> {
    let index = match store.load() {
        Ok(index) => index,
        Err(IndexError::IndexNotBuilt) => {
            ui.info("No codebase index found");
            ui.info("Run: quill index build <path>");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    ui.header("Codebase index");
    let rows = vec![
        vec!["Root".to_string(), index.root_path.clone()],
        vec!["Files".to_string(), index.file_count().to_string()],
        vec!["Lines".to_string(), index.total_lines.to_string()],
        vec!["Directories".to_string(), index.directories.to_string()],
        vec!["Languages".to_string(), index.languages.join(", ")],
        vec!["Size".to_string(), format_bytes(index.total_bytes)],
        vec!["Model".to_string(), index.model.clone()],
    ];
    ui.table(&["Field", "Value"], &rows);

    ui.section("Top-level entries");
    let top: Vec<String> = index
        .files
        .iter()
        .filter(|f| !f.path.contains('/'))
        .map(|f| {
            if f.is_dir {
                format!("{}/", f.name)
            } else {
                f.name.clone()
            }
        })
        .collect();
    ui.list(&top);
    Ok(())
}

async fn analyze(store: &IndexStore, paths: &QuillPaths, path: &PathBuf, ui: &Ui) -> Result<()> {
    let Some((config, client)) = load_client(ui)? else {
        return Ok(());
    };
    let index = match store.load() {
        Ok(index) => index,
        Err(IndexError::IndexNotBuilt) => {
            ui.info("No existing index; building one first");
            build(store, paths, path, ui)?
        }
        Err(err) => return Err(err.into()),
    };

    let prompt = format!(
        "Please provide a comprehensive analysis of this codebase based on the indexed information:\n\n\
         Codebase overview:\n{}\n\
         File structure:\n{}\n\
         Key files:\n{}\n\
         Please provide:\n\
         1. Architecture overview: overall structure and design patterns\n\
         2. Technology stack: languages, frameworks, tooling\n\
         3. Code organization assessment\n\
         4. Potential issues\n\
         5. Improvement suggestions\n\
         6. Maintainability score (1-10)\n\n\
         Format your response with clear sections and actionable insights.",
        format_overview(&index),
        format_file_structure(&index.files),
        format_key_files(&index.files),
    );

    ui.info(&format!("Analyzing codebase at {}", index.root_path));
    let answer = ask(&client, &config, prompt, ui).await?;
    ui.section("Codebase analysis");
    println!("{answer}");
    Ok(())
}
