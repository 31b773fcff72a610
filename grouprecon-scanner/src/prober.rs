use crate::classify::{PhraseMatcher, PhraseSet};
use crate::error::{Result, ScanError};
use crate::group_url::{DEFAULT_GROUPS_BASE, GroupUrl};
use crate::result::PermissionProfile;
use reqwest::header::LOCATION;
use reqwest::{Client, StatusCode, redirect};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";
pub const DEFAULT_LOGIN_HOST: &str = "accounts.google.com";
pub const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone)]
pub struct ProberConfig {
    pub groups_base: String,
    pub login_host: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub phrases: PhraseSet,
}

impl Default for ProberConfig {
    fn default() -> Self {
        Self {
            groups_base: DEFAULT_GROUPS_BASE.to_string(),
            login_host: DEFAULT_LOGIN_HOST.to_string(),
            timeout: Duration::from_secs(10),
            user_agent: BROWSER_USER_AGENT.to_string(),
            phrases: PhraseSet::default(),
        }
    }
}

/// Fetches a group's about page and classifies what anonymous visitors can do.
pub struct GroupProber {
    client: Client,
    groups_base: Url,
    login_host: String,
    matcher: PhraseMatcher,
}

impl GroupProber {
    pub fn new(config: ProberConfig) -> Result<Self> {
        let groups_base = Url::parse(&config.groups_base)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", config.groups_base, e)))?;
        let matcher = config.phrases.compile()?;
        let login_host = config.login_host.to_ascii_lowercase();

        let policy_host = login_host.clone();
        let policy = redirect::Policy::custom(move |attempt| {
            if attempt
                .url()
                .host_str()
                .is_some_and(|host| is_login_host(host, &policy_host))
            {
                attempt.stop()
            } else if attempt.previous().len() >= MAX_REDIRECTS {
                attempt.error("too many redirects")
            } else {
                attempt.follow()
            }
        });

        let client = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .connect_timeout(config.timeout / 2)
            .redirect(policy)
            .build()?;

        Ok(Self {
            client,
            groups_base,
            login_host,
            matcher,
        })
    }

    pub async fn probe(&self, group: &GroupUrl) -> Result<PermissionProfile> {
        let about = group
            .about_url(&self.groups_base)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", group, e)))?;
        debug!("Probing {}", about);

        let response = self.client.get(about.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!("{} answered {} - login required", about, status);
            return Ok(PermissionProfile::requires_auth());
        }

        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            if self.points_to_login(response.url(), location) {
                debug!("{} redirected to login at {}", about, location);
                return Ok(PermissionProfile::requires_auth());
            }
        }

        if status != StatusCode::OK {
            return Err(ScanError::UnexpectedStatus {
                url: about.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(self.matcher.classify_public(&body))
    }

    /// `Location` may be relative or scheme-relative; resolve it the way the
    /// redirect policy saw it before checking the host.
    fn points_to_login(&self, current: &Url, location: &str) -> bool {
        current
            .join(location)
            .ok()
            .and_then(|url| url.host_str().map(|host| is_login_host(host, &self.login_host)))
            .unwrap_or(false)
    }
}

fn is_login_host(host: &str, login_host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == login_host || host.ends_with(&format!(".{}", login_host))
}
