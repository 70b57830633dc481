//! Interactive chat session.

use std::time::Instant;

use anyhow::Result;
use clap::Args;
use quill_client::{ChatClient, ClientError, Conversation, MessageRole};
use quill_common::session_title;
use quill_storage::{Config, QuillPaths, SessionStorage, StoredMessage, StoredSession};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::session::ChatSession;
use crate::spinner::Spinner;
use crate::stream::StreamPresenter;
use crate::ui::Ui;

/// Arguments for `quill chat`.
#[derive(Args, Debug, Default)]
pub struct ChatArgs {
    /// Model to use (defaults to the configured model)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Stream the response token-by-token as it is generated
    #[arg(short, long)]
    pub stream: bool,

    /// Hide the elapsed-time line after responses
    #[arg(long = "no-timer")]
    pub no_timer: bool,
}

/// Run the interactive chat loop.
pub async fn run(args: ChatArgs, ui: &Ui) -> Result<()> {
    let paths = QuillPaths::new()?;
    let config = Config::load(&paths)?;
    if config.api_key.is_empty() {
        ui.error("API key not configured");
        ui.info("Run: quill config set api_key <YOUR_API_KEY>");
        return Ok(());
    }

    let model = args.model.clone().unwrap_or_else(|| config.model.clone());
    let show_timer = !args.no_timer;
    let client = ChatClient::new(&config.api_key, &config.base_url);
    tracing::debug!(model = %model, streaming = args.stream, "starting chat session");

    ui.header("Chat session");
    ui.info(&format!("Model: {model}"));
    if args.stream {
        ui.success("Streaming enabled - responses appear as they are generated");
    }
    ui.info("Type 'quit' or 'exit' to leave");
    ui.dim("Ctrl+C cancels an in-flight response");

    let mut session = ChatSession::new(client, &model, config.max_tokens, config.temperature);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!();
        ui.prompt("You: ");
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim().to_string();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "exit" {
            ui.success("Goodbye!");
            break;
        }

        let turn = if args.stream {
            stream_turn(&mut session, &input, ui, show_timer).await
        } else {
            buffered_turn(&mut session, &input, ui, show_timer).await
        };

        if let Err(err) = turn {
            match err.downcast_ref::<ClientError>() {
                // The presenter already told the user; keep the session going.
                Some(client_err) if client_err.is_cancelled() => {}
                _ => ui.error(&format!("{err}")),
            }
        }
    }

    save_history(&paths, &config, &model, session.conversation(), ui);
    Ok(())
}

async fn stream_turn(
    session: &mut ChatSession,
    input: &str,
    ui: &Ui,
    show_timer: bool,
) -> Result<()> {
    let presenter = StreamPresenter::new(ui, show_timer);
    let cancel = presenter.cancel_token();

    // Watch for Ctrl+C for the lifetime of this turn only; the guard cancels
    // the token when the turn ends, which also reaps the watcher.
    let _guard = cancel.clone().drop_guard();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => cancel.cancel(),
                _ = cancel.cancelled() => {}
            }
        }
    });

    session.send_streaming(input, presenter).await?;
    Ok(())
}

async fn buffered_turn(
    session: &mut ChatSession,
    input: &str,
    ui: &Ui,
    show_timer: bool,
) -> Result<()> {
    let started = Instant::now();
    let spinner = Spinner::start("Thinking...", ui.animations_enabled());
    let result = session.send_buffered(input).await;
    spinner.stop().await;

    let reply = result?;
    ui.prompt("AI: ");
    println!("{}", reply.content);
    if show_timer {
        ui.elapsed(started.elapsed());
    }
    Ok(())
}

/// Persist a finished session, provided it saw at least one full exchange.
fn save_history(
    paths: &QuillPaths,
    config: &Config,
    model: &str,
    conversation: &Conversation,
    ui: &Ui,
) {
    if conversation.len() < 2 {
        return;
    }

    let storage = SessionStorage::with_paths(paths.clone());
    let saved = (|| -> quill_storage::Result<String> {
        storage.init()?;
        let mut stored = StoredSession::new(model);
        stored.title = conversation.first().map(|m| session_title(&m.content));
        for message in conversation.messages() {
            let stored_message = match message.role {
                MessageRole::User => StoredMessage::user(message.content.as_str()),
                MessageRole::Assistant => StoredMessage::assistant(message.content.as_str()),
            };
            stored.messages.push(stored_message);
        }
        storage.save_session(&stored)?;
        storage.enforce_history_limit(config.max_history)?;
        Ok(stored.id)
    })();

    match saved {
        Ok(id) => ui.dim(&format!("Session saved ({id})")),
        Err(err) => ui.warning(&format!("Could not save session: {err}")),
    }
}
