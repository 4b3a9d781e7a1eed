//! Line-delimited message transport.
//!
//! One JSON-RPC message per line in each direction. Generic over the reader and
//! writer so the server loop can run against stdio or in-memory pipes.

use std::io;

use tokio::io::{
    stdin, stdout, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin,
    Stdout,
};

/// Reads raw lines and writes serialized messages.
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
}

/// Transport over the process's stdin/stdout.
pub type StdioTransport = LineTransport<BufReader<Stdin>, Stdout>;

impl StdioTransport {
    pub fn stdio() -> Self {
        LineTransport::new(BufReader::new(stdin()), stdout())
    }
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Read the next non-blank line. Returns `Ok(None)` on EOF.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        loop {
            let mut line = String::new();
            let bytes = self.reader.read_line(&mut line).await?;
            if bytes == 0 {
                return Ok(None);
            }
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
        }
    }

    /// Write one message followed by a newline and flush.
    pub async fn write_line(&mut self, message: &str) -> io::Result<()> {
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }
}

/// Whether a write failed because the client went away.
pub fn is_disconnect(error: &io::Error) -> bool {
    error.kind() == io::ErrorKind::BrokenPipe
}
