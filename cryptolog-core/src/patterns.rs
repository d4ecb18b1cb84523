//! Address pattern definitions and matchers

use crate::{CryptologError, Result};
use regex::Regex;
use std::fmt;
use std::ops::Range;

/// Dotted quad, one to three digits per octet. Octet values are not range
/// checked, so `999.999.999.999` matches.
pub const IPV4_PATTERN: &str = r"([0-9][0-9]?[0-9]?\.[0-9][0-9]?[0-9]?\.[0-9][0-9]?[0-9]?\.[0-9][0-9]?[0-9]?)";

/// Full, compressed, link-local with zone index, IPv4-mapped and
/// IPv4-embedded IPv6 forms. Alternation order matters: the first
/// alternative that matches at a position wins.
pub const IPV6_PATTERN: &str = concat!(
    r"(",
    r"([0-9a-fA-F]{1,4}:){7,7}[0-9a-fA-F]{1,4}|",
    r"([0-9a-fA-F]{1,4}:){1,7}:|",
    r"([0-9a-fA-F]{1,4}:){1,6}:[0-9a-fA-F]{1,4}|",
    r"([0-9a-fA-F]{1,4}:){1,5}(:[0-9a-fA-F]{1,4}){1,2}|",
    r"([0-9a-fA-F]{1,4}:){1,4}(:[0-9a-fA-F]{1,4}){1,3}|",
    r"([0-9a-fA-F]{1,4}:){1,3}(:[0-9a-fA-F]{1,4}){1,4}|",
    r"([0-9a-fA-F]{1,4}:){1,2}(:[0-9a-fA-F]{1,4}){1,5}|",
    r"[0-9a-fA-F]{1,4}:((:[0-9a-fA-F]{1,4}){1,6})|",
    r":((:[0-9a-fA-F]{1,4}){1,7}|:)|",
    r"fe80:(:[0-9a-fA-F]{0,4}){0,4}%[0-9a-zA-Z]{1,}|",
    r"::(ffff(:0{1,4}){0,1}:){0,1}((25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9])\.){3,3}(25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9])|",
    r"([0-9a-fA-F]{1,4}:){1,4}:((25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9])\.){3,3}(25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9])",
    r")",
);

/// IPv4 alternatives are tried before IPv6 ones
pub fn address_pattern() -> String {
    format!("{}|{}", IPV4_PATTERN, IPV6_PATTERN)
}

/// How many matches per line get replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// Every non-overlapping occurrence
    All,
    /// Only the leftmost occurrence; the rest of the line is left alone
    FirstOnly,
}

impl MatchMode {
    pub fn from_replace_all(replace_all: bool) -> Self {
        if replace_all {
            MatchMode::All
        } else {
            MatchMode::FirstOnly
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::All => write!(f, "all"),
            MatchMode::FirstOnly => write!(f, "first-only"),
        }
    }
}

/// Locates address-shaped substrings.
///
/// Implementations return byte ranges into `text`, ordered by start and
/// non-overlapping.
pub trait AddressMatcher: Send + Sync {
    fn find_spans(&self, text: &str) -> Vec<Range<usize>>;
}

/// Regex-backed matcher
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    regex: Regex,
    mode: MatchMode,
}

impl RegexMatcher {
    /// Compile the built-in IPv4/IPv6 pattern
    pub fn new(mode: MatchMode) -> Result<Self> {
        Self::with_pattern(&address_pattern(), mode)
    }

    /// Compile a custom pattern
    pub fn with_pattern(pattern: &str, mode: MatchMode) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| CryptologError::InvalidPattern(e.to_string()))?;
        Ok(Self { regex, mode })
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }
}

impl AddressMatcher for RegexMatcher {
    fn find_spans(&self, text: &str) -> Vec<Range<usize>> {
        match self.mode {
            MatchMode::All => self.regex.find_iter(text).map(|m| m.range()).collect(),
            MatchMode::FirstOnly => self.regex.find(text).map(|m| m.range()).into_iter().collect(),
        }
    }
}

/// Build the address matcher for the `replace-all-matches` setting
pub fn build_matcher(replace_all: bool) -> Result<RegexMatcher> {
    RegexMatcher::new(MatchMode::from_replace_all(replace_all))
}
