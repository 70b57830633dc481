//! One-shot code analysis, fixing and review.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};
use quill_client::{ChatClient, ChatMessage, ChatRequest};
use quill_common::clean_response;
use quill_storage::{Config, QuillPaths};

use crate::spinner::Spinner;
use crate::ui::Ui;

/// `quill code` subcommands.
#[derive(Args, Debug)]
pub struct CodeCli {
    #[command(subcommand)]
    command: CodeCommand,
}

#[derive(Subcommand, Debug)]
enum CodeCommand {
    /// Point out bugs, risks and improvements in a file
    Analyze { file: PathBuf },
    /// Propose fixes and optionally write them back
    Fix { file: PathBuf },
    /// Full review of a file
    Review { file: PathBuf },
}

impl CodeCli {
    pub async fn run(self, ui: &Ui) -> Result<()> {
        match self.command {
            CodeCommand::Analyze { file } => analyze(&file, ui).await,
            CodeCommand::Fix { file } => fix(&file, ui).await,
            CodeCommand::Review { file } => review(&file, ui).await,
        }
    }
}

/// Load config and build a client, or explain what is missing.
pub(crate) fn load_client(ui: &Ui) -> Result<Option<(Config, ChatClient)>> {
    let paths = QuillPaths::new()?;
    let config = Config::load(&paths)?;
    if config.api_key.is_empty() {
        ui.error("API key not configured");
        ui.info("Run: quill config set api_key <YOUR_API_KEY>");
        return Ok(None);
    }
    let client = ChatClient::new(&config.api_key, &config.base_url);
    Ok(Some((config, client)))
}

/// Single-prompt request with a spinner; returns the cleaned reply text.
pub(crate) async fn ask(
    client: &ChatClient,
    config: &Config,
    prompt: String,
    ui: &Ui,
) -> Result<String> {
    let request = ChatRequest::new(&config.model, vec![ChatMessage::user(prompt)])
        .with_max_tokens(config.max_tokens)
        .with_temperature(config.temperature);

    let spinner = Spinner::start("Thinking...", ui.animations_enabled());
    let result = client.send_chat(request).await;
    spinner.stop().await;

    let response = result?;
    match response.into_message() {
        Some(message) => Ok(clean_response(&message.content)),
        None => anyhow::bail!("no response received"),
    }
}

async fn analyze(file: &Path, ui: &Ui) -> Result<()> {
    let Some((config, client)) = load_client(ui)? else {
        return Ok(());
    };
    let content = std::fs::read_to_string(file)?;

    ui.header("Code analysis");
    ui.info(&format!("Analyzing: {}", file.display()));

    let prompt = format!(
        "Please analyze this code file and identify any issues, bugs, or areas for improvement:\n\n\
         File: {}\nContent:\n{}\n\n\
         Please provide:\n\
         1. Potential bugs or errors\n\
         2. Code quality issues\n\
         3. Security concerns\n\
         4. Performance improvements\n\
         5. Best practices violations\n\n\
         Format your response clearly with sections.",
        file.display(),
        content
    );

    let answer = ask(&client, &config, prompt, ui).await?;
    ui.section("Analysis results");
    println!("{answer}");
    Ok(())
}

async fn fix(file: &Path, ui: &Ui) -> Result<()> {
    let Some((config, client)) = load_client(ui)? else {
        return Ok(());
    };
    let content = std::fs::read_to_string(file)?;

    ui.header("Code fix");
    ui.info(&format!("Fixing issues in: {}", file.display()));

    let prompt = format!(
        "Please analyze and fix any issues in this code file. Return the corrected code:\n\n\
         File: {}\nContent:\n{}\n\n\
         Please:\n\
         1. Identify any bugs, errors, or issues\n\
         2. Provide the corrected code\n\
         3. Explain what was fixed\n\n\
         Return the corrected code in a code block.",
        file.display(),
        content
    );

    let answer = ask(&client, &config, prompt, ui).await?;
    ui.section("Proposed fix");
    println!("{answer}");

    ui.prompt("Apply these changes? (y/n): ");
    let mut reply = String::new();
    std::io::stdin().read_line(&mut reply)?;
    if matches!(reply.trim().to_lowercase().as_str(), "y" | "yes") {
        match extract_code_block(&answer) {
            Some(code) => {
                std::fs::write(file, code)?;
                ui.success(&format!("Applied fixes to {}", file.display()));
            }
            None => ui.warning("No code block found in the response; nothing was written"),
        }
    }
    Ok(())
}

async fn review(file: &Path, ui: &Ui) -> Result<()> {
    let Some((config, client)) = load_client(ui)? else {
        return Ok(());
    };
    let content = std::fs::read_to_string(file)?;

    ui.header("Code review");
    ui.info(&format!("Reviewing: {}", file.display()));

    let prompt = format!(
        "Please perform a comprehensive code review of this file:\n\n\
         File: {}\nContent:\n{}\n\n\
         Please provide a detailed review covering:\n\
         1. Code quality and readability\n\
         2. Architecture and design patterns\n\
         3. Performance considerations\n\
         4. Security implications\n\
         5. Maintainability\n\
         6. Suggestions for improvement\n\
         7. Overall rating (1-10)\n\n\
         Format your response as a professional code review.",
        file.display(),
        content
    );

    let answer = ask(&client, &config, prompt, ui).await?;
    ui.section("Review report");
    println!("{answer}");
    Ok(())
}

/// Extract the body of the first fenced code block: from the line after the
/// opening fence up to the last fence in the response.
fn extract_code_block(response: &str) -> Option<&str> {
    let start = response.find("```")?;
    let body_start = start + response[start..].find('\n')? + 1;
    let end = response.rfind("```")?;
    if end <= body_start {
        return None;
    }
    Some(&response[body_start..end])
}
