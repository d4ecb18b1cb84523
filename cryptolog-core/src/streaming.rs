//! Line-by-line stream anonymization

use crate::{Pseudonymizer, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

const PROGRESS_INTERVAL: u64 = 10_000;

/// Configuration for the stream processor
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Flush the writer after every line instead of only at end of input
    pub flush_each_line: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            flush_each_line: true,
        }
    }
}

/// Counters for one processed stream
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    pub lines: u64,
    pub addresses: u64,
}

/// Reads lines, anonymizes them and writes them back out
#[derive(Clone)]
pub struct StreamProcessor {
    pseudonymizer: Arc<Pseudonymizer>,
    config: StreamConfig,
}

impl StreamProcessor {
    pub fn new(pseudonymizer: Arc<Pseudonymizer>, config: StreamConfig) -> Self {
        Self {
            pseudonymizer,
            config,
        }
    }

    /// Process `reader` until end of input.
    ///
    /// Line endings (`\n` or `\r\n`) are stripped on input and every output
    /// line is terminated with `\n`.
    pub async fn process<R, W>(&self, reader: R, mut writer: W) -> Result<StreamStats>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut stats = StreamStats::default();
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            let (anonymized, replaced) = self.pseudonymizer.anonymize_line_counted(&line);
            writer.write_all(anonymized.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            if self.config.flush_each_line {
                writer.flush().await?;
            }

            stats.lines += 1;
            stats.addresses += replaced as u64;
            if stats.lines % PROGRESS_INTERVAL == 0 {
                debug!(
                    "Processed {} lines, {} addresses replaced",
                    stats.lines, stats.addresses
                );
            }
        }
        writer.flush().await?;

        info!(
            "Stream processing complete: {} lines, {} addresses replaced, {} salt rotations",
            stats.lines,
            stats.addresses,
            self.pseudonymizer.clock().rotations()
        );

        Ok(stats)
    }
}
