//! Line-based player input.
//!
//! Blocking reads from a terminal cannot be cancelled, so [`TerminalInput`]
//! does them on its own OS thread and hands lines over a channel. Waiting
//! on the channel can be abandoned at any time, and the reader thread never
//! holds up runtime shutdown.

use async_trait::async_trait;
use std::io::{self, BufRead};
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

/// Lines buffered between the reader thread and the game.
const LINE_BUFFER: usize = 16;

/// Source of lines typed by the player.
///
/// Showing a prompt and waiting for the answer are separate steps so the
/// driver can keep one prompt on screen while it handles server messages.
#[async_trait]
pub trait LineInput: Send {
    /// Shows `prompt`. Does nothing by default.
    async fn show_prompt(&mut self, _prompt: &str) -> io::Result<()> {
        Ok(())
    }

    /// Waits for one line. `None` means input closed.
    ///
    /// Must be cancel safe: the driver races this against the network and
    /// drops the future when a server message wins.
    async fn next_line(&mut self) -> io::Result<Option<String>>;

    /// Shows `prompt` and waits for the answer.
    async fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.show_prompt(prompt).await?;
        self.next_line().await
    }
}

/// Lines read on a background thread, prompts echoed to a writer.
pub struct TerminalInput<W> {
    lines: mpsc::Receiver<io::Result<String>>,
    echo: W,
}

impl<W> TerminalInput<W> {
    /// Starts a reader thread over whatever `open` returns.
    ///
    /// The reader is opened on the new thread, so it need not be `Send`.
    /// The thread stops at end of input, on a read error, or once this
    /// value is dropped and the next line has been read.
    #[instrument(skip_all)]
    pub fn spawn<F, R>(open: F, echo: W) -> io::Result<Self>
    where
        F: FnOnce() -> R + Send + 'static,
        R: BufRead,
    {
        let (tx, rx) = mpsc::channel(LINE_BUFFER);
        std::thread::Builder::new()
            .name("line-input".to_string())
            .spawn(move || {
                for line in open().lines() {
                    let failed = line.is_err();
                    if let Err(e) = &line {
                        warn!(error = %e, "Input read failed");
                    }
                    if tx.blocking_send(line).is_err() || failed {
                        break;
                    }
                }
                debug!("Input reader finished");
            })?;
        Ok(Self::from_channel(rx, echo))
    }

    /// Uses lines delivered by some other producer.
    pub fn from_channel(lines: mpsc::Receiver<io::Result<String>>, echo: W) -> Self {
        Self { lines, echo }
    }
}

impl TerminalInput<Stdout> {
    /// Standard input, prompts on standard output.
    pub fn stdio() -> io::Result<Self> {
        Self::spawn(|| io::stdin().lock(), tokio::io::stdout())
    }
}

#[async_trait]
impl<W> LineInput for TerminalInput<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn show_prompt(&mut self, prompt: &str) -> io::Result<()> {
        self.echo.write_all(prompt.as_bytes()).await?;
        self.echo.flush().await
    }

    async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.lines.recv().await.transpose()
    }
}
