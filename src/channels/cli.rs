use anyhow::Context;
use async_trait::async_trait;
use std::io::BufRead;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};

use super::traits::{Channel, ChannelMessage, SendMessage};

/// Console transport: stdin lines in, replies on stdout.
///
/// A line `@<sender> <text>` is delivered as coming from `<sender>`; any
/// other line comes from the default sender.
///
/// Stdin is read on a detached OS thread. A blocked read never holds up
/// runtime shutdown; the thread dies with the process.
#[derive(Clone)]
pub struct CliChannel {
    default_sender: String,
}

impl CliChannel {
    pub fn new(default_sender: impl Into<String>) -> Self {
        Self {
            default_sender: default_sender.into(),
        }
    }

    pub fn parse_line(&self, line: &str) -> ChannelMessage {
        if let Some(rest) = line.strip_prefix('@') {
            let (sender, body) = rest.split_once(' ').unwrap_or((rest, ""));
            if !sender.is_empty() {
                return ChannelMessage::new(self.name(), sender, body);
            }
        }
        ChannelMessage::new(self.name(), self.default_sender.as_str(), line)
    }

    /// Blocking: forward every line of `reader` until EOF or the queue closes.
    fn forward_lines<R: BufRead>(
        &self,
        reader: R,
        tx: &mpsc::Sender<ChannelMessage>,
    ) -> anyhow::Result<()> {
        for line in reader.lines() {
            let line = line.context("Failed to read stdin")?;
            if tx.blocking_send(self.parse_line(&line)).is_err() {
                break;
            }
        }
        Ok(())
    }

    /// Read lines from `open()` on a detached thread; the receiver yields the
    /// reader's final result.
    fn spawn_reader<R, F>(
        &self,
        open: F,
        tx: mpsc::Sender<ChannelMessage>,
    ) -> anyhow::Result<oneshot::Receiver<anyhow::Result<()>>>
    where
        R: BufRead,
        F: FnOnce() -> R + Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();
        let reader = self.clone();
        std::thread::Builder::new()
            .name("cli-stdin".into())
            .spawn(move || {
                let result = reader.forward_lines(open(), &tx);
                let _ = done_tx.send(result);
            })
            .context("Failed to spawn stdin reader thread")?;
        Ok(done_rx)
    }
}

async fn write_reply<W>(writer: &mut W, message: &SendMessage) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let rendered = format!("[{}]\n{}\n\n", message.recipient, message.content);
    writer.write_all(rendered.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    async fn send(&self, message: &SendMessage) -> anyhow::Result<()> {
        write_reply(&mut tokio::io::stdout(), message).await
    }

    async fn listen(&self, tx: mpsc::Sender<ChannelMessage>) -> anyhow::Result<()> {
        self.spawn_reader(|| std::io::stdin().lock(), tx)?
            .await
            .context("stdin reader thread exited without reporting")?
    }
}
