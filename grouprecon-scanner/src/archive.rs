//! Client for the historical URL archive (AlienVault OTX `url_list`).
//!
//! Pages are requested in order with a cursor starting at 1. A page cannot be
//! skipped without losing the cursor, so every failure ends the sequence.

use crate::error::{Result, ScanError};
use crate::quota::HourlyQuota;
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_ARCHIVE_URL: &str =
    "https://otx.alienvault.com/otxapi/indicators/hostname/url_list";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
/// Kept below the provider's documented 10,000 requests per hour.
pub const DEFAULT_HOURLY_CEILING: u32 = 9500;

#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    pub base_url: String,
    pub page_size: u32,
    pub hourly_ceiling: u32,
    pub window: Duration,
    pub timeout: Duration,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ARCHIVE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            hourly_ceiling: DEFAULT_HOURLY_CEILING,
            window: Duration::from_secs(3600),
            timeout: Duration::from_secs(30),
        }
    }
}

/// One page of archive results.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchivePage {
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub actual_size: u64,
    #[serde(default)]
    pub url_list: Vec<ArchiveRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveRecord {
    pub url: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default, rename = "httpcode")]
    pub http_code: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
}

pub struct ArchiveClient {
    client: Client,
    base_url: String,
    page_size: u32,
}

impl ArchiveClient {
    pub fn new(config: &ArchiveConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("grouprecon/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .connect_timeout(config.timeout / 2)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        })
    }

    pub fn endpoint(&self, domain: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), domain)
    }

    pub async fn fetch_page(&self, domain: &str, page: u32) -> Result<ArchivePage> {
        let url = self.endpoint(domain);
        debug!("Fetching archive page {} for {}", page, domain);

        let response = self
            .client
            .get(&url)
            .query(&[("limit", self.page_size), ("page", page)])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ScanError::QuotaExceeded {
                service: self.base_url.clone(),
            });
        }
        if status != StatusCode::OK {
            return Err(ScanError::UnexpectedStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ScanError::MalformedResponse {
            url,
            reason: e.to_string(),
        })
    }
}

/// Walks every archive page for one domain under an hourly request budget.
pub struct ArchiveFetcher {
    client: ArchiveClient,
    quota: HourlyQuota,
    domain: String,
    cursor: Option<u32>,
    pages_fetched: u32,
}

impl ArchiveFetcher {
    pub fn new(domain: impl Into<String>, config: &ArchiveConfig) -> Result<Self> {
        let client = ArchiveClient::new(config)?;
        let quota = HourlyQuota::new(config.hourly_ceiling, config.window);
        Ok(Self::with_client(domain, client, quota))
    }

    pub fn with_client(domain: impl Into<String>, client: ArchiveClient, quota: HourlyQuota) -> Self {
        Self {
            client,
            quota,
            domain: domain.into(),
            cursor: Some(1),
            pages_fetched: 0,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Fetches the page under the cursor. `None` once the archive has
    /// reported its last page or a previous fetch failed.
    pub async fn next_page(&mut self) -> Result<Option<ArchivePage>> {
        let Some(page) = self.cursor else {
            return Ok(None);
        };

        self.quota.admit().await;
        let archive_page = match self.client.fetch_page(&self.domain, page).await {
            Ok(archive_page) => archive_page,
            Err(e) => {
                self.cursor = None;
                return Err(e);
            }
        };
        self.pages_fetched += 1;

        if archive_page.has_next {
            self.cursor = Some(page + 1);
        } else {
            self.cursor = None;
            info!(
                "Archive reported last page for {} ({} pages fetched)",
                self.domain, self.pages_fetched
            );
        }

        Ok(Some(archive_page))
    }

    /// Lazily yields every archived URL, in page order.
    pub fn into_url_stream(self) -> impl Stream<Item = Result<String>> {
        stream::try_unfold(self, |mut fetcher| async move {
            let page = fetcher.next_page().await?;
            Ok::<_, ScanError>(page.map(|page| {
                let urls = page
                    .url_list
                    .into_iter()
                    .map(|record| Ok::<_, ScanError>(record.url));
                (stream::iter(urls), fetcher)
            }))
        })
        .try_flatten()
    }
}
