//! rdfx CLI
//!
//! Command-line interface for:
//! - Converting RDF files (or directories of them) between syntaxes
//! - Merging several RDF files into one graph
//! - Cleaning Turtle files: unused prefixes dropped, the rest sorted

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use rdfx_core::FileSink;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod settings;

use settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "rdfx")]
#[command(author, version, about = "Convert, merge and clean RDF files")]
pub struct Cli {
    /// Operation to perform.
    #[arg(value_enum)]
    method: Method,

    /// RDF files or directories. Directories contribute their RDF files
    /// (one level deep).
    #[arg(required = true, num_args = 1..)]
    data: Vec<PathBuf>,

    /// Output format: turtle, xml, json-ld, nt or n3. Any known file
    /// ending (ttl, rdf, owl, jsonld, ...) is accepted too.
    #[arg(short, long, default_value = "turtle")]
    format: String,

    /// Output directory (default: current directory).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Comment to write at the top of the output. Repeat for more lines.
    #[arg(long)]
    comments: Vec<String>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Convert,
    Merge,
    Clean,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let settings = Settings::from_cli(cli)?;
    init_logging(settings.log_level);
    tracing::debug!(?settings, method = ?cli.method, "starting");

    match cli.method {
        Method::Convert => cmd_convert(&cli.data, &settings),
        Method::Merge => cmd_merge(&cli.data, &settings),
        Method::Clean => cmd_clean(&cli.data),
    }
}

fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_convert(data: &[PathBuf], settings: &Settings) -> Result<()> {
    let files = rdfx_core::prepare_files_list(data)?;
    let sink = FileSink::new(&settings.output_dir);

    let written = rdfx_core::convert_all(&files, &sink, settings.format, &settings.comments)
        .context("converting")?;
    for path in &written {
        println!("  {} {}", "→".cyan(), path.display());
    }
    Ok(())
}

fn cmd_merge(data: &[PathBuf], settings: &Settings) -> Result<()> {
    let files = rdfx_core::prepare_files_list(data)?;
    let sink = FileSink::new(&settings.output_dir);

    let written = rdfx_core::merge(
        &files,
        &sink,
        settings.format,
        "merged",
        &settings.comments,
    )
    .context("merging")?;
    println!(
        "  {} {} ({} inputs)",
        "→".cyan(),
        written.display(),
        files.len()
    );
    Ok(())
}

fn cmd_clean(data: &[PathBuf]) -> Result<()> {
    let files = rdfx_core::prepare_files_list(data)?;

    for file in &files {
        let written =
            rdfx_core::clean(file).with_context(|| format!("cleaning {}", file.display()))?;
        println!("  {} {}", "→".cyan(), written.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdfx_core::RdfFormat;

    #[test]
    fn parses_method_and_data() {
        let cli = Cli::try_parse_from(["rdfx", "clean", "a.ttl", "dir"]).unwrap();
        assert_eq!(cli.method, Method::Clean);
        assert_eq!(cli.data, vec![PathBuf::from("a.ttl"), PathBuf::from("dir")]);
    }

    #[test]
    fn data_is_required() {
        let err = Cli::try_parse_from(["rdfx", "convert"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn unknown_method_is_rejected() {
        let err = Cli::try_parse_from(["rdfx", "explode", "a.ttl"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn every_format_name_is_accepted() {
        for format in RdfFormat::ALL {
            let cli =
                Cli::try_parse_from(["rdfx", "convert", "a.ttl", "-f", format.token()]).unwrap();
            assert_eq!(Settings::from_cli(&cli).unwrap().format, format);
        }
    }
}
