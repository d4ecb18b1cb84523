use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cryptolog", version)]
#[command(about = "Anonymize IP addresses in log lines read from standard input")]
pub struct Cli {
    /// Destination for the anonymized log; standard output when omitted
    #[arg(short, long)]
    pub outfile: Option<PathBuf>,

    /// How long a salt stays valid, e.g. `24h`, `90m`, `1h30m`.
    /// Within one salt lifetime the same address always maps to the same pseudonym.
    #[arg(short, long)]
    pub salt_lifetime: Option<String>,

    /// Replace every address in a line (`true`) or only the first (`false`).
    /// A bare flag means `true`.
    #[arg(
        short,
        long,
        action = ArgAction::Set,
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub replace_all_matches: Option<bool>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Flush output at end of input only, instead of after every line
    #[arg(long)]
    pub buffered: bool,
}
