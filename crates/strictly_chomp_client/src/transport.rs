//! Newline-delimited connection to the relay server.

use crate::error::ClientError;
use crate::protocol::ClientMessage;
use std::io;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tracing::{debug, info, instrument, trace, warn};

/// Longest inbound line kept, terminator included. Anything longer is
/// skipped up to its newline.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// One inbound line as framed by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A line without its terminator.
    Line(String),
    /// A line over [`MAX_LINE_BYTES`]; its bytes were discarded.
    TooLong {
        /// Full length of the line, terminator included.
        length: usize,
    },
}

/// One connection, opened once and closed once.
pub struct Transport<R, W> {
    reader: BufReader<R>,
    writer: W,
    /// Bytes of a line not yet terminated; kept across cancelled reads.
    pending: Vec<u8>,
    /// Bytes of the current line dropped past the length limit.
    overflow: usize,
    closed: bool,
}

impl Transport<OwnedReadHalf, OwnedWriteHalf> {
    /// Connects over TCP.
    #[instrument]
    pub async fn connect(host: &str, port: u16) -> io::Result<Self> {
        let stream = TcpStream::connect((host, port)).await?;
        info!(peer = ?stream.peer_addr().ok(), "Connected to server");
        let (reader, writer) = stream.into_split();
        Ok(Self::new(reader, writer))
    }
}

impl<R, W> Transport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Wraps an already-open byte stream.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
            pending: Vec::new(),
            overflow: 0,
            closed: false,
        }
    }

    /// Sends one message as a line.
    #[instrument(skip(self))]
    pub async fn send(&mut self, message: &ClientMessage) -> Result<(), ClientError> {
        let line = message.encode()?;
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;
        debug!(line = line.trim_end(), "Sent");
        Ok(())
    }

    /// Reads the next line. `None` at end of stream.
    ///
    /// Cancel safe: a partly read line stays buffered for the next call.
    /// Invalid UTF-8 is replaced rather than rejected so the decoder can
    /// report it as a malformed message.
    pub async fn next_line(&mut self) -> io::Result<Option<Frame>> {
        loop {
            let available = self.reader.fill_buf().await?;
            if available.is_empty() {
                if self.pending.is_empty() && self.overflow == 0 {
                    debug!("End of stream");
                    return Ok(None);
                }
                return Ok(Some(self.take_frame()));
            }

            let (chunk, complete) = match available.iter().position(|b| *b == b'\n') {
                Some(end) => (&available[..=end], true),
                None => (available, false),
            };
            let used = chunk.len();
            let room = MAX_LINE_BYTES.saturating_sub(self.pending.len());
            if used <= room {
                self.pending.extend_from_slice(chunk);
            } else {
                self.pending.extend_from_slice(&chunk[..room]);
                self.overflow += used - room;
            }
            self.reader.consume(used);

            if complete {
                return Ok(Some(self.take_frame()));
            }
        }
    }

    fn take_frame(&mut self) -> Frame {
        if self.overflow > 0 {
            let length = self.pending.len() + self.overflow;
            self.pending.clear();
            self.overflow = 0;
            warn!(length, limit = MAX_LINE_BYTES, "Dropped over-long line");
            return Frame::TooLong { length };
        }
        let line = String::from_utf8_lossy(&self.pending)
            .trim_end_matches(['\n', '\r'])
            .to_string();
        self.pending.clear();
        trace!(%line, "Received");
        Frame::Line(line)
    }

    /// Shuts down the write side. Later calls do nothing.
    #[instrument(skip(self), fields(closed = self.closed))]
    pub async fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.writer.shutdown().await?;
        info!("Connection closed");
        Ok(())
    }

    /// Returns true once [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
