//! Aggregation and presentation of streamed responses.

use std::time::Instant;

use quill_client::ClientError;
use quill_common::clean_response;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::spinner::Spinner;
use crate::ui::Ui;

/// What a streaming call resolved to: the accumulated text plus an optional
/// terminal error. On cancellation the text is whatever had arrived so far,
/// recoverable by the caller even if it usually gets discarded.
#[derive(Debug)]
pub struct StreamOutcome {
    pub text: String,
    pub error: Option<ClientError>,
}

/// Consumes one streamed response: drives the busy indicator until the first
/// fragment, renders fragments as they arrive, and resolves to the full text.
///
/// Owns a fresh cancellation token per call; cancellation takes effect at
/// the next loop wake-up, never mid-fragment. The background network reader
/// is not killed on cancel, just no longer listened to; the HTTP body close
/// or the request timeout reaps it.
pub struct StreamPresenter<'a> {
    ui: &'a Ui,
    cancel: CancellationToken,
    show_timer: bool,
}

impl<'a> StreamPresenter<'a> {
    pub fn new(ui: &'a Ui, show_timer: bool) -> Self {
        Self {
            ui,
            cancel: CancellationToken::new(),
            show_timer,
        }
    }

    /// Token that cancels this presenter. Fresh per call, never reused.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the consumption loop until the stream ends, errors out, or is
    /// cancelled. Exactly one of the three resolves the call.
    pub async fn consume(
        self,
        mut fragments: mpsc::Receiver<String>,
        error_slot: oneshot::Receiver<ClientError>,
    ) -> StreamOutcome {
        let started = Instant::now();
        let mut spinner = Some(Spinner::start("Thinking...", self.ui.animations_enabled()));
        let mut error_slot = Some(error_slot);
        let mut accumulated = String::new();

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    if let Some(spinner) = spinner.take() {
                        spinner.stop().await;
                    }
                    println!();
                    self.ui.warning("Response cancelled");
                    return StreamOutcome {
                        text: accumulated,
                        error: Some(ClientError::Cancelled),
                    };
                }
                fragment = fragments.recv() => match fragment {
                    Some(text) => {
                        if let Some(spinner) = spinner.take() {
                            spinner.stop().await;
                            self.ui.prompt("AI: ");
                        }
                        accumulated.push_str(&text);
                        self.ui.stream_chunk(&text);
                    }
                    // Queue closure is the normal end-of-stream signal.
                    None => {
                        if let Some(spinner) = spinner.take() {
                            spinner.stop().await;
                        }
                        println!();
                        if self.show_timer {
                            self.ui.elapsed(started.elapsed());
                        }
                        return StreamOutcome {
                            text: clean_response(&accumulated),
                            error: None,
                        };
                    }
                },
                error = async { error_slot.as_mut().unwrap().await }, if error_slot.is_some() => {
                    match error {
                        // Terminal even if content already arrived; the caller
                        // decides whether a partial answer is worth keeping.
                        Ok(err) => {
                            if let Some(spinner) = spinner.take() {
                                spinner.stop().await;
                            }
                            println!();
                            return StreamOutcome {
                                text: clean_response(&accumulated),
                                error: Some(err),
                            };
                        }
                        // Sender dropped without publishing: no error happened.
                        Err(_) => error_slot = None,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ColorMode;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn test_ui() -> Ui {
        Ui::new(ColorMode::Never)
    }

    #[tokio::test]
    async fn test_cancel_before_first_fragment() {
        let ui = test_ui();
        let presenter = StreamPresenter::new(&ui, false);
        let (_tx, rx) = mpsc::channel::<String>(8);
        let (_err_tx, err_rx) = oneshot::channel::<ClientError>();

        presenter.cancel_token().cancel();
        let outcome = presenter.consume(rx, err_rx).await;

        assert_eq!(outcome.text, "");
        assert!(matches!(outcome.error, Some(ClientError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_after_fragments_keeps_accumulated_text() {
        let ui = test_ui();
        let presenter = StreamPresenter::new(&ui, false);
        let cancel = presenter.cancel_token();
        let (tx, rx) = mpsc::channel::<String>(8);
        let (_err_tx, err_rx) = oneshot::channel::<ClientError>();

        tx.send("ab".to_string()).await.unwrap();
        tx.send("cd".to_string()).await.unwrap();

        let (outcome, _) = tokio::join!(presenter.consume(rx, err_rx), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel.cancel();
        });

        assert_eq!(outcome.text, "abcd");
        assert!(matches!(outcome.error, Some(ClientError::Cancelled)));
        drop(tx);
    }

    #[tokio::test]
    async fn test_error_is_terminal_but_text_recoverable() {
        let ui = test_ui();
        let presenter = StreamPresenter::new(&ui, false);
        let (tx, rx) = mpsc::channel::<String>(8);
        let (err_tx, err_rx) = oneshot::channel::<ClientError>();

        tx.send("partial".to_string()).await.unwrap();

        let (outcome, _) = tokio::join!(presenter.consume(rx, err_rx), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = err_tx.send(ClientError::Api {
                status: 500,
                body: "boom".to_string(),
            });
        });

        assert_eq!(outcome.text, "partial");
        assert!(matches!(
            outcome.error,
            Some(ClientError::Api { status: 500, .. })
        ));
        drop(tx);
    }

    #[tokio::test]
    async fn test_clean_completion_postprocesses_text() {
        let ui = test_ui();
        let presenter = StreamPresenter::new(&ui, false);
        let (tx, rx) = mpsc::channel::<String>(8);
        let (err_tx, err_rx) = oneshot::channel::<ClientError>();

        tx.send("<think>mull it over</think>".to_string()).await.unwrap();
        tx.send("Hi there".to_string()).await.unwrap();
        drop(tx);
        drop(err_tx);

        let outcome = presenter.consume(rx, err_rx).await;
        assert_eq!(outcome.text, "Hi there");
        assert!(outcome.error.is_none());
    }

    #[tokio::test]
    async fn test_empty_stream_completes_with_empty_text() {
        let ui = test_ui();
        let presenter = StreamPresenter::new(&ui, false);
        let (tx, rx) = mpsc::channel::<String>(8);
        let (err_tx, err_rx) = oneshot::channel::<ClientError>();
        drop(tx);
        drop(err_tx);

        let outcome = presenter.consume(rx, err_rx).await;
        assert_eq!(outcome.text, "");
        assert!(outcome.error.is_none());
    }
}
