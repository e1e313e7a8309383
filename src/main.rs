//! vparcheck CLI - scan Verilog sources for unbound instantiation parameters

use clap::Parser;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vparcheck::analyze::{analyze, AnalyzeOptions};
use vparcheck::config::load_config;
use vparcheck::filelist::{expand_inputs, FileSelector};

#[derive(Parser)]
#[command(name = "vparcheck")]
#[command(version)]
#[command(about = "Find Verilog module instantiations with unbound parameters")]
#[command(long_about = r#"
vparcheck scans Verilog/SystemVerilog sources in two passes: first it
collects every module definition's parameter list, then it checks every
instantiation against those lists and reports parameters left unbound.

It works on a token stream, not a full parse, so it stays fast across large
trees at the cost of some precision (defparam overrides are invisible to it).

Example usage:
  vparcheck rtl/
  vparcheck -f sources.f --exclude '_tb\.v$'
  vparcheck top.v fifo.v --aggressive
"#)]
struct Cli {
    /// Source files or directories to scan (directories are walked for
    /// .v/.sv/.vh/.svh files)
    files: Vec<PathBuf>,

    /// File list with one source path per line ('#' and '//' comments
    /// allowed)
    #[arg(short = 'f', long = "filelist")]
    filelist: Vec<PathBuf>,

    /// Skip files whose path matches this regex (repeatable)
    #[arg(long)]
    exclude: Vec<String>,

    /// Skip files whose path matches this glob (repeatable)
    #[arg(long)]
    exclude_glob: Vec<String>,

    /// Check every identifier naming a known module, even outside statement
    /// context (more findings, more false positives)
    #[arg(short, long)]
    aggressive: bool,

    /// Suppress too-many-parameter and unknown-parameter warnings
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: String,

    /// Path to a vparcheck.toml config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; level comes from RUST_LOG (the --verbose flag is a
    // lint-volume knob, not a logging one).
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = load_config(cli.config.as_deref())?.unwrap_or_default();

    let mut exclude = cli.exclude;
    exclude.extend(config.exclude.unwrap_or_default());
    let mut exclude_glob = cli.exclude_glob;
    exclude_glob.extend(config.exclude_glob.unwrap_or_default());

    let options = AnalyzeOptions {
        aggressive: cli.aggressive || config.aggressive.unwrap_or(false),
        verbose: cli.verbose || config.verbose.unwrap_or(false),
    };

    let selector = FileSelector::new(&exclude, &exclude_glob)?;
    let files = expand_inputs(&cli.files, &cli.filelist, &selector)?;
    if files.is_empty() {
        anyhow::bail!("no input files (pass source files, directories, or -f <list>)");
    }
    tracing::debug!(count = files.len(), "input set resolved");

    let report = analyze(&files, options)?;

    match cli.format.as_str() {
        "json" => {
            let out = serde_json::json!({
                "diagnostics": report.diagnostics(),
                "findings": report.findings(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        _ => {
            let color = std::io::stderr().is_terminal();
            for diagnostic in report.diagnostics() {
                if color {
                    eprintln!(
                        "{} {}:{}: {}",
                        "warning:".yellow().bold(),
                        diagnostic.file.display(),
                        diagnostic.line,
                        diagnostic.message
                    );
                } else {
                    eprintln!("{}", diagnostic);
                }
            }
            for finding in report.findings() {
                println!("{}", finding);
            }
        }
    }

    if !report.findings().is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
