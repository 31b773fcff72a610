use grouprecon::commands::command_argument_builder;
use grouprecon::handlers::*;
use grouprecon_core::{NormalizeMode, ProbeOutcome, ProbeReport};
use grouprecon_scanner::{GroupUrl, GroupUrlError, PermissionProfile, PhraseSet};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn sub_matches(argv: &[&str]) -> clap::ArgMatches {
    let matches = command_argument_builder()
        .try_get_matches_from(argv)
        .expect("arguments should parse");
    let (_, sub) = matches.subcommand().expect("subcommand");
    sub.clone()
}

fn report_for(url: &str, outcome: ProbeOutcome) -> ProbeReport {
    ProbeReport {
        url: url.to_string(),
        identity: GroupUrl::parse(url).ok().map(|g| g.identity().clone()),
        outcome,
    }
}

// ============================================================================
// Command Line Tests
// ============================================================================

#[test]
fn test_subcommand_is_required() {
    assert!(
        command_argument_builder()
            .try_get_matches_from(["grouprecon"])
            .is_err()
    );
}

#[test]
fn test_fetch_requires_domain() {
    assert!(
        command_argument_builder()
            .try_get_matches_from(["grouprecon", "fetch"])
            .is_err()
    );
}

#[test]
fn test_fetch_rejects_empty_domain() {
    let err = command_argument_builder()
        .try_get_matches_from(["grouprecon", "fetch", "-d", ""])
        .unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
}

#[test]
fn test_fetch_defaults() {
    let args = sub_matches(&["grouprecon", "fetch", "-d", "groups.google.com"]);
    let config = archive_config_from_args(&args);

    assert_eq!(
        args.get_one::<String>("domain").map(String::as_str),
        Some("groups.google.com")
    );
    assert_eq!(config.hourly_ceiling, 9500);
    assert!(config.base_url.starts_with("https://otx.alienvault.com/"));
}

#[test]
fn test_fetch_overrides() {
    let args = sub_matches(&[
        "grouprecon",
        "fetch",
        "--domain",
        "groups.google.com",
        "--hourly-limit",
        "100",
        "--archive-url",
        "http://127.0.0.1:8080/api/",
    ]);
    let config = archive_config_from_args(&args);

    assert_eq!(config.hourly_ceiling, 100);
    assert_eq!(config.base_url, "http://127.0.0.1:8080/api/");
}

#[test]
fn test_fetch_rejects_zero_limit() {
    assert!(
        command_argument_builder()
            .try_get_matches_from(["grouprecon", "fetch", "-d", "x.com", "--hourly-limit", "0"])
            .is_err()
    );
}

#[test]
fn test_urls_trim_flag_selects_mode() {
    let full = sub_matches(&["grouprecon", "urls"]);
    let trimmed = sub_matches(&["grouprecon", "urls", "--trim"]);

    assert_eq!(normalize_mode_from_args(&full), NormalizeMode::Full);
    assert_eq!(normalize_mode_from_args(&trimmed), NormalizeMode::Canonical);
}

#[test]
fn test_probe_defaults() {
    let args = sub_matches(&["grouprecon", "probe"]);
    let settings = probe_settings_from_args(&args).unwrap();

    assert_eq!(settings.interval, Duration::from_millis(200));
    assert_eq!(settings.prober.timeout, Duration::from_secs(10));
    assert_eq!(settings.prober.phrases, PhraseSet::default());
    assert!(!settings.policy.require_post);
    assert!(!settings.verbose);
}

#[test]
fn test_probe_flags() {
    let args = sub_matches(&[
        "grouprecon",
        "probe",
        "-v",
        "--require-post",
        "--interval-ms",
        "1000",
        "--timeout",
        "3",
    ]);
    let settings = probe_settings_from_args(&args).unwrap();

    assert!(settings.verbose);
    assert!(settings.policy.require_post);
    assert_eq!(settings.interval, Duration::from_secs(1));
    assert_eq!(settings.prober.timeout, Duration::from_secs(3));
}

// ============================================================================
// Phrase File Tests
// ============================================================================

#[test]
fn test_load_phrase_set_partial_override() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    write!(
        temp_file,
        r#"{{"audience": "Cualquier usuario de la web", "window": 80}}"#
    )?;

    let phrases = load_phrase_set(temp_file.path())?;

    assert_eq!(phrases.audience, "Cualquier usuario de la web");
    assert_eq!(phrases.window, 80);
    assert_eq!(phrases.view, PhraseSet::default().view);

    Ok(())
}

#[test]
fn test_load_phrase_set_invalid_json() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "not json").unwrap();

    let err = load_phrase_set(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("Invalid phrase file"));
}

#[test]
fn test_load_phrase_set_missing_file() {
    let err = load_phrase_set(std::path::Path::new("/nonexistent/phrases.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read phrase file"));
}

#[test]
fn test_probe_settings_with_phrase_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, r#"{{"post": "can publish"}}"#).unwrap();
    let path = temp_file.path().to_str().unwrap().to_string();

    let args = sub_matches(&["grouprecon", "probe", "--phrases", &path]);
    let settings = probe_settings_from_args(&args).unwrap();

    assert_eq!(settings.prober.phrases.post, "can publish");
}

// ============================================================================
// Report Formatting Tests
// ============================================================================

#[test]
fn test_format_accepted_is_quiet_unless_verbose() {
    let report = report_for(
        "https://groups.google.com/a/example.com/g/team",
        ProbeOutcome::Accepted(PermissionProfile::public().with_capabilities(true, false, true)),
    );

    assert_eq!(format_report(&report, false), None);
    assert_eq!(
        format_report(&report, true).as_deref(),
        Some(
            "Group: team@example.com | Public: true | View: true | Post: true | Join: false | RequireAuth: false"
        )
    );
}

#[test]
fn test_format_rejected() {
    let report = report_for(
        "https://groups.google.com/a/example.com/g/walled",
        ProbeOutcome::Rejected(PermissionProfile::requires_auth()),
    );

    assert_eq!(
        format_report(&report, false).as_deref(),
        Some("Rejected walled@example.com (not publicly accessible)")
    );
    assert!(format_report(&report, true).unwrap().contains("RequireAuth: true"));
}

#[test]
fn test_format_skipped_and_failed() {
    let skipped = report_for(
        "https://example.com/nope",
        ProbeOutcome::Skipped(GroupUrlError::WrongHost("example.com".to_string())),
    );
    assert_eq!(
        format_report(&skipped, false).as_deref(),
        Some("Could not extract group email from https://example.com/nope")
    );

    let failed = report_for(
        "https://groups.google.com/a/example.com/g/broken",
        ProbeOutcome::Failed("unexpected status code 500".to_string()),
    );
    assert_eq!(
        format_report(&failed, true).as_deref(),
        Some("Error checking broken@example.com: unexpected status code 500")
    );
}
