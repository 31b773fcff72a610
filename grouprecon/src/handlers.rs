use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use grouprecon_core::{
    DomainExtractor, ExposurePolicy, IntervalThrottle, NormalizeMode, PipelineError,
    ProbeOutcome, ProbeReport, ProbeReportCallback, UrlNormalizer, execute_fetch, execute_probe,
    run_line_filter,
};
use grouprecon_scanner::{ArchiveConfig, ArchiveFetcher, GroupProber, PhraseSet, ProberConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{self, BufReader};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Route logs to stderr so stdout stays a clean pipe. `RUST_LOG` overrides the
/// default `warn` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when handlers run inside tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// Argument helpers

pub fn archive_config_from_args(args: &ArgMatches) -> ArchiveConfig {
    let mut config = ArchiveConfig::default();
    if let Some(limit) = args.get_one::<u32>("hourly-limit") {
        config.hourly_ceiling = *limit;
    }
    if let Some(base) = args.get_one::<Url>("archive-url") {
        config.base_url = base.as_str().to_string();
    }
    config
}

pub fn normalize_mode_from_args(args: &ArgMatches) -> NormalizeMode {
    if args.get_flag("trim") {
        NormalizeMode::Canonical
    } else {
        NormalizeMode::Full
    }
}

/// Everything the probe stage needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub prober: ProberConfig,
    pub interval: Duration,
    pub policy: ExposurePolicy,
    pub verbose: bool,
}

pub fn probe_settings_from_args(args: &ArgMatches) -> Result<ProbeSettings> {
    let mut prober = ProberConfig::default();
    if let Some(seconds) = args.get_one::<u64>("timeout") {
        prober.timeout = Duration::from_secs(*seconds);
    }
    if let Some(path) = args.get_one::<PathBuf>("phrases") {
        prober.phrases = load_phrase_set(path)?;
    }

    let interval = args
        .get_one::<u64>("interval-ms")
        .map(|ms| Duration::from_millis(*ms))
        .unwrap_or(grouprecon_core::DEFAULT_PROBE_INTERVAL);

    Ok(ProbeSettings {
        prober,
        interval,
        policy: ExposurePolicy {
            require_post: args.get_flag("require-post"),
        },
        verbose: args.get_flag("verbose"),
    })
}

/// Load classification phrases from a JSON file. Missing keys keep their defaults.
pub fn load_phrase_set(path: &Path) -> Result<PhraseSet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read phrase file {}", path.display()))?;
    let phrases: PhraseSet = serde_json::from_str(&content)
        .with_context(|| format!("Invalid phrase file {}", path.display()))?;
    Ok(phrases)
}

// Reporting

/// Diagnostic line for a decided candidate, or `None` when nothing should be said.
/// Accepted groups are silent unless verbose; their URL already went to stdout.
pub fn format_report(report: &ProbeReport, verbose: bool) -> Option<String> {
    let email = report.email().unwrap_or_else(|| report.url.clone());

    match &report.outcome {
        ProbeOutcome::Skipped(_) => Some(format!(
            "Could not extract group email from {}",
            report.url
        )),
        ProbeOutcome::Failed(reason) => Some(format!("Error checking {}: {}", email, reason)),
        ProbeOutcome::Accepted(profile) | ProbeOutcome::Rejected(profile) if verbose => {
            Some(format!(
                "Group: {} | Public: {} | View: {} | Post: {} | Join: {} | RequireAuth: {}",
                email,
                profile.is_public,
                profile.can_view,
                profile.can_post,
                profile.can_join,
                profile.requires_auth
            ))
        }
        ProbeOutcome::Rejected(_) => Some(format!("Rejected {} (not publicly accessible)", email)),
        ProbeOutcome::Accepted(_) => None,
    }
}

fn report_printer(verbose: bool) -> ProbeReportCallback {
    Arc::new(move |report: ProbeReport| {
        let Some(line) = format_report(&report, verbose) else {
            return;
        };
        let marker = match report.outcome {
            ProbeOutcome::Accepted(_) => "✓".green().bold(),
            ProbeOutcome::Rejected(_) => "✗".yellow(),
            ProbeOutcome::Skipped(_) => "⚠".yellow(),
            ProbeOutcome::Failed(_) => "✗".red().bold(),
        };
        eprintln!("{} {}", marker, line);
    })
}

// Stage handlers

pub async fn handle_fetch(args: &ArgMatches) -> Result<()> {
    let domain = args
        .get_one::<String>("domain")
        .context("--domain is required")?;
    let config = archive_config_from_args(args);

    eprintln!(
        "{} Fetching archived URLs for {}",
        "→".blue(),
        domain.bright_white()
    );

    let fetcher = ArchiveFetcher::new(domain.clone(), &config)
        .context("Failed to build archive client")?;

    match execute_fetch(fetcher, io::stdout()).await {
        Ok(summary) => {
            eprintln!(
                "{} Completed fetching {} URLs for domain: {}",
                "✓".green().bold(),
                summary.urls,
                domain
            );
            Ok(())
        }
        Err(PipelineError::Fetch(err)) if err.is_quota() => Err(err).context(
            "The archive rejected further requests. URLs already printed are complete; \
             wait for the quota to reset and run again",
        ),
        Err(err) => Err(err).with_context(|| format!("Fetching archive for {} failed", domain)),
    }
}

pub async fn handle_domains(_args: &ArgMatches) -> Result<()> {
    let mut stage = DomainExtractor::new();
    run_line_filter(BufReader::new(io::stdin()), io::stdout(), &mut stage)
        .await
        .context("Domain extraction failed")?;
    Ok(())
}

pub async fn handle_urls(args: &ArgMatches) -> Result<()> {
    let mut stage = UrlNormalizer::new(normalize_mode_from_args(args));
    run_line_filter(BufReader::new(io::stdin()), io::stdout(), &mut stage)
        .await
        .context("URL deduplication failed")?;
    Ok(())
}

pub async fn handle_probe(args: &ArgMatches) -> Result<()> {
    let settings = probe_settings_from_args(args)?;
    let prober = GroupProber::new(settings.prober).context("Failed to build prober")?;
    let mut throttle = IntervalThrottle::new(settings.interval);

    let summary = execute_probe(
        BufReader::new(io::stdin()),
        io::stdout(),
        &prober,
        &mut throttle,
        settings.policy,
        Some(report_printer(settings.verbose)),
    )
    .await
    .context("Probing aborted")?;

    tracing::info!(
        "Probed {} candidates: {} exposed, {} rejected, {} skipped, {} failed",
        summary.candidates,
        summary.accepted,
        summary.rejected,
        summary.skipped,
        summary.failed
    );
    Ok(())
}
