//! Cryptolog: rotating-salt IP address pseudonymization for log streams

pub mod errors;
pub mod patterns;
pub mod pseudonymizer;
pub mod salt;
pub mod streaming;

// Re-exports
pub use errors::{CryptologError, Result};
pub use patterns::{build_matcher, AddressMatcher, MatchMode, RegexMatcher};
pub use pseudonymizer::{pseudonym, transform, Pseudonymizer, PSEUDONYM_LEN};
pub use salt::{EntropySource, OsEntropy, Salt, SaltClock, SaltRotation, SALT_SIZE};
pub use streaming::{StreamConfig, StreamProcessor, StreamStats};

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Default salt lifetime: one day
pub const DEFAULT_SALT_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Main configuration for Cryptolog
#[derive(Debug, Clone)]
pub struct CryptologConfig {
    /// Period between salt regenerations
    pub salt_lifetime: Duration,
    /// Replace every address in a line, or only the first
    pub replace_all_matches: bool,
    /// Stream processing configuration
    pub stream_config: StreamConfig,
}

impl Default for CryptologConfig {
    fn default() -> Self {
        Self {
            salt_lifetime: DEFAULT_SALT_LIFETIME,
            replace_all_matches: true,
            stream_config: StreamConfig::default(),
        }
    }
}

/// Assembled pipeline: salt clock, matcher and stream processor.
///
/// Construction performs every fallible startup step (salt generation,
/// pattern compilation) so that no output is produced before a startup
/// failure is reported.
pub struct Cryptolog {
    clock: Arc<SaltClock>,
    processor: StreamProcessor,
    config: CryptologConfig,
}

impl Cryptolog {
    pub fn new(config: CryptologConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SaltClock::new()?))
    }

    /// Build around an existing clock (fixed salts in tests)
    pub fn with_clock(config: CryptologConfig, clock: Arc<SaltClock>) -> Result<Self> {
        if config.salt_lifetime.is_zero() {
            return Err(CryptologError::InvalidSaltLifetime(
                "salt lifetime must be greater than zero".into(),
            ));
        }

        let matcher = build_matcher(config.replace_all_matches)?;
        info!(
            "Address matcher compiled: replacing {} matches",
            matcher.mode()
        );

        let pseudonymizer = Arc::new(Pseudonymizer::new(clock.clone(), matcher));
        let processor = StreamProcessor::new(pseudonymizer, config.stream_config.clone());

        Ok(Self {
            clock,
            processor,
            config,
        })
    }

    /// Start the background salt rotation on the current tokio runtime
    pub fn start_rotation(&self) -> Result<SaltRotation> {
        self.clock.start(self.config.salt_lifetime)
    }

    pub fn processor(&self) -> &StreamProcessor {
        &self.processor
    }

    pub fn clock(&self) -> &Arc<SaltClock> {
        &self.clock
    }
}
