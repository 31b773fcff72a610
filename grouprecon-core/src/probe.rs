//! Exposure probing: for each candidate line, identify the group, wait for
//! the throttle, fetch and classify its about page, then accept or reject it
//! under an [`ExposurePolicy`].
//!
//! Per-candidate failures never stop the run. Only losing the input or output
//! stream does.

use crate::error::Result;
use crate::lines::{LineReader, write_line};
use crate::throttle::Throttle;
use grouprecon_scanner::{GroupIdentity, GroupProber, GroupUrl, GroupUrlError, PermissionProfile};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{debug, info, warn};

/// Rule deciding whether a classified group counts as exposed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExposurePolicy {
    /// Additionally require that anyone can post.
    pub require_post: bool,
}

impl ExposurePolicy {
    pub fn strict() -> Self {
        Self { require_post: true }
    }

    pub fn admits(&self, profile: &PermissionProfile) -> bool {
        let open = profile.is_public && (profile.can_view || profile.can_join);
        open && (!self.require_post || profile.can_post)
    }
}

/// Terminal state of one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Accepted(PermissionProfile),
    Rejected(PermissionProfile),
    /// Not a group URL; no request was made.
    Skipped(GroupUrlError),
    /// Network failure or a status that cannot be classified.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub url: String,
    pub identity: Option<GroupIdentity>,
    pub outcome: ProbeOutcome,
}

impl ProbeReport {
    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Accepted(_))
    }

    pub fn profile(&self) -> Option<&PermissionProfile> {
        match &self.outcome {
            ProbeOutcome::Accepted(profile) | ProbeOutcome::Rejected(profile) => Some(profile),
            _ => None,
        }
    }

    /// `group@domain` when the line was a group URL.
    pub fn email(&self) -> Option<String> {
        self.identity.as_ref().map(GroupIdentity::email)
    }
}

/// Callback for reporting each candidate as soon as it is decided
pub type ProbeReportCallback = Arc<dyn Fn(ProbeReport) + Send + Sync>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeSummary {
    pub candidates: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Probes every candidate line of `input` and writes accepted URLs to `output`.
///
/// Every line is a candidate; blank or malformed ones are reported as skipped
/// without a request. Accepted URLs are written and flushed as soon as they
/// are decided.
pub async fn execute_probe<R, W, T>(
    input: R,
    mut output: W,
    prober: &GroupProber,
    throttle: &mut T,
    policy: ExposurePolicy,
    report_callback: Option<ProbeReportCallback>,
) -> Result<ProbeSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    T: Throttle,
{
    let mut reader = LineReader::new(input);
    let mut summary = ProbeSummary::default();

    while let Some(line) = reader.next_line().await? {
        let candidate = line.trim();
        summary.candidates += 1;

        let report = probe_candidate(candidate, prober, throttle, policy).await;
        match &report.outcome {
            ProbeOutcome::Accepted(_) => {
                summary.accepted += 1;
                write_line(&mut output, &report.url).await?;
            }
            ProbeOutcome::Rejected(_) => summary.rejected += 1,
            ProbeOutcome::Skipped(_) => summary.skipped += 1,
            ProbeOutcome::Failed(_) => summary.failed += 1,
        }

        if let Some(ref callback) = report_callback {
            callback(report);
        }
    }

    info!(
        "Probe complete: {} candidates, {} accepted, {} rejected, {} skipped, {} failed",
        summary.candidates, summary.accepted, summary.rejected, summary.skipped, summary.failed
    );
    Ok(summary)
}

async fn probe_candidate<T>(
    line: &str,
    prober: &GroupProber,
    throttle: &mut T,
    policy: ExposurePolicy,
) -> ProbeReport
where
    T: Throttle,
{
    let group = match GroupUrl::parse(line) {
        Ok(group) => group,
        Err(e) => {
            debug!("Could not extract group from {}: {}", line, e);
            return ProbeReport {
                url: line.to_string(),
                identity: None,
                outcome: ProbeOutcome::Skipped(e),
            };
        }
    };

    throttle.acquire().await;

    let outcome = match prober.probe(&group).await {
        Ok(profile) if policy.admits(&profile) => ProbeOutcome::Accepted(profile),
        Ok(profile) => ProbeOutcome::Rejected(profile),
        Err(e) => {
            warn!("Error checking {}: {}", line, e);
            ProbeOutcome::Failed(e.to_string())
        }
    };

    ProbeReport {
        url: line.to_string(),
        identity: Some(group.identity().clone()),
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(can_view: bool, can_join: bool, can_post: bool) -> PermissionProfile {
        PermissionProfile::public().with_capabilities(can_view, can_join, can_post)
    }

    #[test]
    fn test_default_policy_requires_view_or_join() {
        let policy = ExposurePolicy::default();

        assert!(policy.admits(&profile(true, false, false)));
        assert!(policy.admits(&profile(false, true, false)));
        assert!(!policy.admits(&profile(false, false, true)));
        assert!(!policy.admits(&profile(false, false, false)));
    }

    #[test]
    fn test_strict_policy_requires_post() {
        let view_only = profile(true, false, false);
        assert!(ExposurePolicy::default().admits(&view_only));
        assert!(!ExposurePolicy::strict().admits(&view_only));

        assert!(ExposurePolicy::strict().admits(&profile(true, false, true)));
        assert!(ExposurePolicy::strict().admits(&profile(false, true, true)));
    }

    #[test]
    fn test_login_walled_groups_are_never_admitted() {
        let walled = PermissionProfile::requires_auth();
        assert!(!ExposurePolicy::default().admits(&walled));
        assert!(!ExposurePolicy::strict().admits(&walled));
    }

    #[test]
    fn test_flags_without_public_are_not_admitted() {
        let odd = PermissionProfile {
            is_public: false,
            can_view: true,
            can_join: true,
            can_post: true,
            requires_auth: false,
        };
        assert!(!ExposurePolicy::default().admits(&odd));
    }
}
