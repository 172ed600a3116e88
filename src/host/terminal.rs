use super::UserInterface;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// User interface on stdin/stderr
///
/// Messages go to stderr so stdout stays clean for command output; callers
/// already log them through `tracing`. A preset answer short-circuits the
/// prompt for non-interactive use.
#[derive(Debug, Clone, Default)]
pub struct TerminalUi {
    preset_answer: Option<String>,
}

impl TerminalUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer(answer: Option<String>) -> Self {
        Self {
            preset_answer: answer,
        }
    }
}

#[async_trait]
impl UserInterface for TerminalUi {
    async fn prompt(&self, message: &str, placeholder: &str) -> Option<String> {
        if let Some(answer) = &self.preset_answer {
            return Some(answer.clone());
        }

        let mut stderr = tokio::io::stderr();
        let question = format!("{} [{}]: ", message, placeholder);
        stderr.write_all(question.as_bytes()).await.ok()?;
        stderr.flush().await.ok()?;

        let mut line = String::new();
        let read = BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .ok()?;

        // EOF (Ctrl-D) is a dismissed prompt
        if read == 0 {
            return None;
        }
        Some(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn show_info(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn show_warning(&self, message: &str) {
        eprintln!("warning: {}", message);
    }

    fn show_error(&self, message: &str) {
        eprintln!("error: {}", message);
    }
}
