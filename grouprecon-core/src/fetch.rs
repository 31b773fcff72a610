use crate::error::Result;
use crate::lines::write_line;
use futures::{Stream, TryStreamExt};
use grouprecon_scanner::{ArchiveFetcher, ScanError};
use tokio::io::AsyncWrite;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub urls: usize,
}

/// Streams every archived URL for the fetcher's domain to `output`.
///
/// Any archive failure aborts the run; URLs already written stay written.
pub async fn execute_fetch<W>(fetcher: ArchiveFetcher, output: W) -> Result<FetchSummary>
where
    W: AsyncWrite + Unpin,
{
    let domain = fetcher.domain().to_string();
    let summary = drain_urls(fetcher.into_url_stream(), output).await?;
    info!("Completed fetching {} URLs for domain: {}", summary.urls, domain);
    Ok(summary)
}

/// Writes each URL from `urls` as its own line until the stream ends or fails.
pub async fn drain_urls<S, W>(urls: S, mut output: W) -> Result<FetchSummary>
where
    S: Stream<Item = std::result::Result<String, ScanError>>,
    W: AsyncWrite + Unpin,
{
    let mut urls = std::pin::pin!(urls);
    let mut summary = FetchSummary::default();

    while let Some(url) = urls.try_next().await? {
        write_line(&mut output, &url).await?;
        summary.urls += 1;
    }

    Ok(summary)
}
