use crate::error::Result;
use crate::lines::{LineReader, write_line};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::info;

/// A stage that maps one input line to at most one output line.
pub trait LineStage {
    fn accept(&mut self, line: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub lines_read: usize,
    pub lines_emitted: usize,
}

/// Drives `stage` over every line of `input`, writing what it emits.
pub async fn run_line_filter<R, W, S>(input: R, mut output: W, stage: &mut S) -> Result<FilterSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: LineStage + ?Sized,
{
    let mut reader = LineReader::new(input);
    let mut summary = FilterSummary::default();

    while let Some(line) = reader.next_line().await? {
        summary.lines_read += 1;
        if let Some(emitted) = stage.accept(&line) {
            write_line(&mut output, &emitted).await?;
            summary.lines_emitted += 1;
        }
    }

    info!(
        "Filter complete: {} lines read, {} emitted",
        summary.lines_read, summary.lines_emitted
    );
    Ok(summary)
}
