use super::types::Message;
use crate::{Error, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{ChildStdin, ChildStdout};
use tracing::{debug, trace};

/// Anything that carries whole DAP messages in both directions
///
/// The client only talks to this, so tests can script the adapter side.
#[async_trait]
pub trait MessageChannel: Send {
    async fn recv(&mut self) -> Result<Message>;

    async fn send(&mut self, msg: &Message) -> Result<()>;
}

/// `Content-Length` framed DAP messages over a byte stream pair
pub struct DapTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
}

impl DapTransport<ChildStdout, ChildStdin> {
    /// Transport over a spawned adapter's stdio
    pub fn from_child(stdin: ChildStdin, stdout: ChildStdout) -> Self {
        Self::new(stdout, stdin)
    }
}

impl<R, W> DapTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    pub async fn read_message(&mut self) -> Result<Message> {
        let mut headers = String::new();
        loop {
            let mut line = String::new();
            let read = self.reader.read_line(&mut line).await?;

            if read == 0 {
                return Err(Error::Disconnected);
            }

            if line == "\r\n" || line == "\n" {
                break;
            }

            headers.push_str(&line);
        }

        let content_length = headers
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.trim()
                    .eq_ignore_ascii_case("Content-Length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .ok_or_else(|| Error::Dap("Missing Content-Length header".to_string()))?;

        trace!("DAP: Reading message with Content-Length: {}", content_length);

        let mut buffer = vec![0u8; content_length];
        self.reader.read_exact(&mut buffer).await?;

        let content =
            String::from_utf8(buffer).map_err(|e| Error::Dap(format!("Invalid UTF-8: {}", e)))?;

        debug!("DAP received: {}", content);

        serde_json::from_str(&content)
            .map_err(|e| Error::Dap(format!("Failed to parse DAP message: {}", e)))
    }

    pub async fn write_message(&mut self, msg: &Message) -> Result<()> {
        let content = serde_json::to_string(msg)
            .map_err(|e| Error::Dap(format!("Failed to serialize DAP message: {}", e)))?;

        debug!("DAP sending: {}", content);

        let headers = format!("Content-Length: {}\r\n\r\n", content.len());
        self.writer.write_all(headers.as_bytes()).await?;
        self.writer.write_all(content.as_bytes()).await?;
        self.writer.flush().await?;

        Ok(())
    }
}

#[async_trait]
impl<R, W> MessageChannel for DapTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn recv(&mut self) -> Result<Message> {
        self.read_message().await
    }

    async fn send(&mut self, msg: &Message) -> Result<()> {
        self.write_message(msg).await
    }
}
