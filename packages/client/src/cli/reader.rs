//! Line input on a dedicated thread.

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Reads lines with rustyline without blocking the async runtime.
///
/// Each [`read_line`](Self::read_line) hands a prompt to the input thread and
/// waits for the line typed in response.
pub struct LineReader {
    prompts: UnboundedSender<String>,
    lines: UnboundedReceiver<Option<String>>,
}

impl LineReader {
    pub fn spawn() -> Self {
        let (prompts, mut prompt_rx) = mpsc::unbounded_channel::<String>();
        let (line_tx, lines) = mpsc::unbounded_channel::<Option<String>>();

        std::thread::spawn(move || {
            let mut editor = match DefaultEditor::new() {
                Ok(editor) => editor,
                Err(e) => {
                    tracing::error!("Failed to open the terminal: {}", e);
                    let _ = line_tx.send(None);
                    return;
                }
            };

            while let Some(prompt) = prompt_rx.blocking_recv() {
                let line = match editor.readline(&prompt) {
                    Ok(line) => {
                        let _ = editor.add_history_entry(line.as_str());
                        Some(line.trim().to_string())
                    }
                    // Ctrl-C or Ctrl-D
                    Err(ReadlineError::Interrupted | ReadlineError::Eof) => None,
                    Err(e) => {
                        tracing::error!("Failed to read input: {}", e);
                        None
                    }
                };
                let done = line.is_none();
                if line_tx.send(line).is_err() || done {
                    break;
                }
            }
        });

        Self { prompts, lines }
    }

    /// The next line, trimmed. `None` once input has ended.
    pub async fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.prompts.send(prompt.to_string()).ok()?;
        self.lines.recv().await.flatten()
    }
}
