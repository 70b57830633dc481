//! Busy indicator for in-flight requests.

use std::io::Write;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const TICK: Duration = Duration::from_millis(100);

/// Spinner drawn to stderr while a request is in flight.
///
/// A disabled spinner still hands back a handle so call sites never branch;
/// it just draws nothing.
pub struct Spinner {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Spinner {
    /// Start the spinner task.
    pub fn start(message: &str, enabled: bool) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let message = message.to_string();

        let handle = tokio::spawn(async move {
            if !enabled {
                token.cancelled().await;
                return;
            }
            let mut interval = tokio::time::interval(TICK);
            let mut index = 0usize;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        let frame = FRAMES[index % FRAMES.len()];
                        index += 1;
                        let mut stderr = std::io::stderr();
                        let _ = write!(stderr, "\r{frame} {message}");
                        let _ = stderr.flush();
                    }
                }
            }
            // Erase the spinner line before handing the terminal back.
            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "\r{}\r", " ".repeat(message.chars().count() + 2));
            let _ = stderr.flush();
        });

        Self { cancel, handle }
    }

    /// Stop the spinner and wait until its line has been erased.
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}
