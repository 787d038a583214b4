//! Security settings and trusted host checking.

use regex::{Regex, RegexBuilder};
use secrecy::SecretString;
use serde::Deserialize;
use std::fmt;
use std::sync::LazyLock;
use tracing::warn;

use super::ConfigError;

const MAX_HOST_LEN: usize = 1000;
const MAX_HOST_SEPARATORS: usize = 100;

static HOST_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[?(?:[a-zA-Z0-9\-:\]_]+\.?)+$").expect("host charset pattern is valid")
});

static TRAILING_PORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\d+$").expect("port pattern is valid"));

/// Security-related site settings.
#[derive(Debug, Clone)]
pub struct SecuritySettings {
    /// Salt for one-time links and form tokens. Empty means the runtime
    /// derives one from the database credentials.
    pub hash_salt: SecretString,
    pub trusted_hosts: TrustedHostPolicy,
    /// Bypass the access check on the update script.
    pub update_free_access: bool,
}

/// A compiled trusted host pattern, matched case-insensitively.
#[derive(Clone)]
pub struct HostPattern {
    source: String,
    regex: Regex,
}

impl HostPattern {
    pub fn new(source: &str) -> Result<Self, ConfigError> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                ConfigError::Configuration(format!(
                    "invalid trusted host pattern {:?}: {}",
                    source, e
                ))
            })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, host: &str) -> bool {
        self.regex.is_match(host)
    }
}

impl fmt::Debug for HostPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.source)
    }
}

impl PartialEq for HostPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Which request hosts the site accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum TrustedHostPolicy {
    /// Nothing configured: every host is accepted and a warning is reported.
    NotConfigured,
    /// Checking explicitly switched off.
    Disabled,
    /// Ordered, non-empty list of patterns.
    Patterns(Vec<HostPattern>),
}

/// Outcome of checking a request host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCheck {
    Allowed,
    Rejected,
    /// Not a syntactically valid HTTP host.
    Invalid,
}

impl TrustedHostPolicy {
    /// Compiles a pattern list. An empty list would reject every host.
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        if patterns.is_empty() {
            return Err(ConfigError::Configuration(
                "trusted_host_patterns must not be empty; use false to disable".into(),
            ));
        }
        let compiled = patterns
            .iter()
            .map(|p| HostPattern::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::Patterns(compiled))
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::NotConfigured)
    }

    /// Checks a raw `Host` header value.
    pub fn check(&self, host: &str) -> HostCheck {
        let host = normalize_host(host);
        if !is_valid_http_host(&host) {
            return HostCheck::Invalid;
        }

        match self {
            Self::NotConfigured => {
                warn!(host = %host, "trusted host patterns are not configured");
                HostCheck::Allowed
            }
            Self::Disabled => HostCheck::Allowed,
            Self::Patterns(patterns) => {
                if patterns.iter().any(|p| p.is_match(&host)) {
                    HostCheck::Allowed
                } else {
                    HostCheck::Rejected
                }
            }
        }
    }
}

/// Lower-cases the host and strips a trailing `:port`.
pub(crate) fn normalize_host(host: &str) -> String {
    let host = host.trim().to_lowercase();
    TRAILING_PORT.replace(&host, "").into_owned()
}

/// Rejects hosts that could not appear in a well-formed request.
pub fn is_valid_http_host(host: &str) -> bool {
    !host.is_empty()
        && host.len() <= MAX_HOST_LEN
        && host.matches('.').count() <= MAX_HOST_SEPARATORS
        && host.matches(':').count() <= MAX_HOST_SEPARATORS
        && HOST_CHARSET.is_match(host)
}

/// `trusted_host_patterns` as written in the overrides file: a list, or `false`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TrustedHostsSetting {
    Enabled(bool),
    Patterns(Vec<String>),
}

/// Optional security settings from the overrides file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityOverrides {
    pub hash_salt: Option<String>,
    /// Read the salt from a file outside the docroot.
    pub hash_salt_file: Option<String>,
    pub trusted_host_patterns: Option<TrustedHostsSetting>,
    pub update_free_access: Option<bool>,
}
