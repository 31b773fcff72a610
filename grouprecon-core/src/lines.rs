// Newline-delimited stream plumbing shared by every stage

use crate::error::{PipelineError, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Reads input one line at a time.
///
/// Bytes that are not UTF-8 are replaced rather than failing the read, so a
/// stray binary line in an archive dump is dropped by the stage instead of
/// aborting the run.
pub struct LineReader<R> {
    input: R,
    buf: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            buf: Vec::new(),
        }
    }

    /// Next line without its terminator, or `None` at end of input.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        let read = self
            .input
            .read_until(b'\n', &mut self.buf)
            .await
            .map_err(PipelineError::Input)?;
        if read == 0 {
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

/// Writes one line and flushes so downstream stages see it immediately.
pub async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> Result<()> {
    output
        .write_all(line.as_bytes())
        .await
        .map_err(PipelineError::Output)?;
    output.write_all(b"\n").await.map_err(PipelineError::Output)?;
    output.flush().await.map_err(PipelineError::Output)
}
