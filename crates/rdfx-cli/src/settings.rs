//! Resolved command-line configuration.

use anyhow::{Context, Result};
use rdfx_core::RdfFormat;
use std::path::PathBuf;

use crate::Cli;

/// Everything a run needs, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub format: RdfFormat,
    pub comments: Vec<String>,
    /// Default `tracing` level when `RUST_LOG` is unset.
    pub log_level: &'static str,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let output_dir = match &cli.output {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("resolving current directory")?,
        };
        let format = cli
            .format
            .parse::<RdfFormat>()
            .with_context(|| format!("invalid --format `{}`", cli.format))?;

        Ok(Self {
            output_dir,
            format,
            comments: cli.comments.clone(),
            log_level: log_level(cli.verbose, cli.quiet),
        })
    }
}

pub fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "warn";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["rdfx", "convert", "data.ttl"]).unwrap();
        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.format, RdfFormat::Turtle);
        assert_eq!(settings.output_dir, std::env::current_dir().unwrap());
        assert!(settings.comments.is_empty());
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn explicit_values() {
        let cli = Cli::try_parse_from([
            "rdfx",
            "merge",
            "a.ttl",
            "b.rdf",
            "-f",
            "nt",
            "-o",
            "out",
            "--comments",
            "one",
            "--comments",
            "two",
            "-vv",
        ])
        .unwrap();
        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.format, RdfFormat::NTriples);
        assert_eq!(settings.output_dir, PathBuf::from("out"));
        assert_eq!(settings.comments, vec!["one", "two"]);
        assert_eq!(settings.log_level, "trace");
    }

    #[test]
    fn unknown_format_is_rejected() {
        let cli = Cli::try_parse_from(["rdfx", "convert", "a.ttl", "-f", "csv"]).unwrap();
        assert!(Settings::from_cli(&cli).is_err());
    }

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(log_level(2, true), "warn");
        assert_eq!(log_level(1, false), "debug");
    }
}
