use std::path::PathBuf;
use std::time::Duration;
use serde::Deserialize;
use config as config_rs;
use cryptolog_core::{CryptologConfig, StreamConfig};
use thiserror::Error;
use crate::cli::Cli;

pub const DEFAULT_SALT_LIFETIME: &str = "24h";

#[derive(Debug, Deserialize)]
struct RawConfig {
    salt_lifetime: String,
    replace_all_matches: bool,
    #[serde(default)]
    outfile: Option<String>,
    flush_each_line: bool,
}

/// Resolved settings after layering defaults, file, environment and flags
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub salt_lifetime: Duration,
    pub replace_all_matches: bool,
    pub outfile: Option<PathBuf>,
    pub flush_each_line: bool,
}

impl AppConfig {
    pub fn to_core_config(&self) -> CryptologConfig {
        CryptologConfig {
            salt_lifetime: self.salt_lifetime,
            replace_all_matches: self.replace_all_matches,
            stream_config: StreamConfig {
                flush_each_line: self.flush_each_line,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Config(#[from] config_rs::ConfigError),
    #[error("invalid duration {input:?}: {reason}")]
    InvalidDuration { input: String, reason: String },
}

/// Layer, lowest precedence first: built-in defaults, the optional TOML file,
/// `CRYPTOLOG_*` environment variables, explicit command-line flags.
pub fn load_config(cli: &Cli) -> Result<AppConfig, ConfigError> {
    let mut builder = config_rs::Config::builder()
        .set_default("salt_lifetime", DEFAULT_SALT_LIFETIME)?
        .set_default("replace_all_matches", true)?
        .set_default("flush_each_line", true)?;

    if let Some(ref path) = cli.config {
        builder = builder.add_source(
            config_rs::File::from(path.as_path()).format(config_rs::FileFormat::Toml),
        );
    }

    builder = builder.add_source(config_rs::Environment::with_prefix("CRYPTOLOG"));

    // CLI flags take precedence
    if let Some(ref lifetime) = cli.salt_lifetime {
        builder = builder.set_override("salt_lifetime", lifetime.clone())?;
    }
    if let Some(replace_all) = cli.replace_all_matches {
        builder = builder.set_override("replace_all_matches", replace_all)?;
    }
    if let Some(ref outfile) = cli.outfile {
        builder = builder.set_override("outfile", outfile.display().to_string())?;
    }
    if cli.buffered {
        builder = builder.set_override("flush_each_line", false)?;
    }

    let raw: RawConfig = builder.build()?.try_deserialize()?;

    Ok(AppConfig {
        salt_lifetime: parse_duration(&raw.salt_lifetime)?,
        replace_all_matches: raw.replace_all_matches,
        outfile: raw.outfile.filter(|p| !p.is_empty()).map(PathBuf::from),
        flush_each_line: raw.flush_each_line,
    })
}

/// Parse a duration in the `72h3m0.5s` style: a sequence of decimal numbers,
/// each followed by one of `ns`, `us`, `µs`, `ms`, `s`, `m`, `h`.
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidDuration {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let text = input.trim();
    if text.is_empty() {
        return Err(invalid("empty duration"));
    }
    if text == "0" {
        return Ok(Duration::ZERO);
    }

    let mut nanos = 0f64;
    let mut rest = text;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_end == 0 {
            return Err(invalid("expected a number"));
        }
        let value: f64 = rest[..number_end]
            .parse()
            .map_err(|_| invalid("malformed number"))?;
        rest = &rest[number_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_end] {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(invalid("missing unit")),
            _ => return Err(invalid("unknown unit")),
        };
        nanos += value * scale;
        rest = &rest[unit_end..];
    }

    if !nanos.is_finite() || nanos > u64::MAX as f64 {
        return Err(invalid("duration out of range"));
    }
    Ok(Duration::from_nanos(nanos.round() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_units() {
        assert_eq!(parse_duration("24h").unwrap(), Duration::from_secs(86_400));
        assert_eq!(parse_duration("90m").unwrap(), Duration::from_secs(5_400));
        assert_eq!(parse_duration("15s").unwrap(), Duration::from_secs(15));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("3us").unwrap(), Duration::from_micros(3));
        assert_eq!(parse_duration("7ns").unwrap(), Duration::from_nanos(7));
    }

    #[test]
    fn parses_compound_and_fractional() {
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5_400));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5_400));
        assert_eq!(parse_duration("2h45m30s").unwrap(), Duration::from_secs(9_930));
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "h", "10", "10x", "-5m", "1..5s", "5m3"] {
            assert!(
                matches!(parse_duration(bad), Err(ConfigError::InvalidDuration { .. })),
                "{:?} should be rejected",
                bad
            );
        }
    }
}
