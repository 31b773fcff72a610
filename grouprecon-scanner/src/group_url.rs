//! Grammar for hosted group URLs:
//! `scheme://groups.google.com/a/{domain}/g/{group}[suffix]`.
//!
//! Parsing is structural rather than regex based so each way a line can fail
//! to be a group URL is a distinct [`GroupUrlError`].

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Host serving custom-domain groups.
pub const GROUPS_HOST: &str = "groups.google.com";

/// Base used to build about-page URLs.
pub const DEFAULT_GROUPS_BASE: &str = "https://groups.google.com";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupUrlError {
    #[error("missing scheme")]
    MissingScheme,

    #[error("unsupported scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("host '{0}' is not groups.google.com")]
    WrongHost(String),

    #[error("path is not of the form /a/{{domain}}/g/{{group}}")]
    NotAGroupPath,

    #[error("empty domain segment")]
    EmptyDomain,

    #[error("empty group segment")]
    EmptyGroup,

    #[error("whitespace in {0} segment")]
    Whitespace(&'static str),

    #[error("encoded path separator in {0} segment")]
    EncodedSeparator(&'static str),

    #[error("dot segment in place of {0}")]
    DotSegment(&'static str),
}

/// The `(domain, group)` pair two URLs must share to name the same group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupIdentity {
    pub domain: String,
    pub group: String,
}

impl GroupIdentity {
    /// Synthetic address of the group, `group@domain`.
    pub fn email(&self) -> String {
        format!("{}@{}", self.group, self.domain)
    }
}

impl fmt::Display for GroupIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.group, self.domain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupUrl {
    scheme: String,
    host: String,
    identity: GroupIdentity,
    suffix: String,
}

impl GroupUrl {
    pub fn parse(input: &str) -> Result<Self, GroupUrlError> {
        let input = input.trim();

        let (scheme, rest) = input
            .split_once("://")
            .ok_or(GroupUrlError::MissingScheme)?;
        let scheme = scheme.to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(GroupUrlError::UnsupportedScheme(scheme));
        }

        let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        let (authority, path) = rest.split_at(authority_end);
        if !authority.eq_ignore_ascii_case(GROUPS_HOST) {
            return Err(GroupUrlError::WrongHost(authority.to_string()));
        }

        let after_prefix = path
            .strip_prefix("/a/")
            .ok_or(GroupUrlError::NotAGroupPath)?;
        let (domain, tail) = after_prefix
            .split_once('/')
            .ok_or(GroupUrlError::NotAGroupPath)?;
        if domain.contains(['?', '#']) {
            return Err(GroupUrlError::NotAGroupPath);
        }
        let after_marker = tail.strip_prefix("g/").ok_or(GroupUrlError::NotAGroupPath)?;

        let group_end = after_marker
            .find(['/', '?', '#'])
            .unwrap_or(after_marker.len());
        let (group, suffix) = after_marker.split_at(group_end);

        if domain.is_empty() {
            return Err(GroupUrlError::EmptyDomain);
        }
        if group.is_empty() {
            return Err(GroupUrlError::EmptyGroup);
        }
        check_segment("domain", domain)?;
        check_segment("group", group)?;

        Ok(Self {
            scheme,
            host: authority.to_ascii_lowercase(),
            identity: GroupIdentity {
                domain: domain.to_string(),
                group: group.to_string(),
            },
            suffix: suffix.to_string(),
        })
    }

    pub fn identity(&self) -> &GroupIdentity {
        &self.identity
    }

    pub fn domain(&self) -> &str {
        &self.identity.domain
    }

    pub fn group_name(&self) -> &str {
        &self.identity.group
    }

    /// Query, fragment or sub-path following the group slug. Empty when none.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn is_canonical(&self) -> bool {
        self.suffix.is_empty()
    }

    /// `scheme://host/a/{domain}/g/{group}` with the suffix dropped.
    pub fn canonical(&self) -> String {
        format!(
            "{}://{}/a/{}/g/{}",
            self.scheme, self.host, self.identity.domain, self.identity.group
        )
    }

    /// The group's about page, resolved against `base`.
    pub fn about_url(&self, base: &Url) -> Result<Url, url::ParseError> {
        base.join(&format!(
            "/a/{}/g/{}/about",
            self.identity.domain, self.identity.group
        ))
    }
}

impl FromStr for GroupUrl {
    type Err = GroupUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for GroupUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.canonical(), self.suffix)
    }
}

fn check_segment(name: &'static str, segment: &str) -> Result<(), GroupUrlError> {
    if segment.chars().any(char::is_whitespace) {
        return Err(GroupUrlError::Whitespace(name));
    }
    let lowered = segment.to_ascii_lowercase();
    if lowered.contains("%2f") {
        return Err(GroupUrlError::EncodedSeparator(name));
    }
    // URL resolution collapses `.` and `..`, plain or percent-encoded.
    if matches!(lowered.replace("%2e", ".").as_str(), "." | "..") {
        return Err(GroupUrlError::DotSegment(name));
    }
    Ok(())
}
