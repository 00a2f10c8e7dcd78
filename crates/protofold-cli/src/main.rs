//! protofold CLI - Schema analysis driver
//!
//! Commands:
//! - `protofold analyze` - Write the JSON analysis of schema files
//! - `protofold report` - Write a plain-text classification report
//! - `protofold check` - Validate a protofold.toml config

use clap::{Args, Parser, Subcommand};
use protofold_cli::{OutputKind, check, config, load_schemas, run};
use protofold_core::SchemaError;
use protofold_logging::{LogLevel, ReloadHandle, init_logging};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "protofold")]
#[command(
    author,
    version,
    about = "Schema analysis and code generation front end",
    long_about = None
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error, off); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OutputArgs {
    /// Schema description files (JSON)
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Path to protofold.toml (default: ./protofold.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the JSON analysis (entities, classifications) of each schema file
    Analyze(OutputArgs),

    /// Write a plain-text classification report for each schema file
    Report(OutputArgs),

    /// Validate a protofold.toml config
    Check {
        /// Path to protofold.toml (default: ./protofold.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.unwrap_or_default());

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err
                .downcast_ref::<SchemaError>()
                .map_or(1, SchemaError::error_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    let cwd = Path::new(".");

    match cli.command {
        Commands::Analyze(args) => output(OutputKind::Analysis, args, cli.log_level, cwd),
        Commands::Report(args) => output(OutputKind::Report, args, cli.log_level, cwd),
        Commands::Check { config } => check(config.as_deref(), cwd, &mut std::io::stdout()),
    }
}

fn output(
    kind: OutputKind,
    args: OutputArgs,
    flag_level: Option<LogLevel>,
    cwd: &Path,
) -> anyhow::Result<()> {
    let (generator_config, _) = config::load(args.config.as_deref(), cwd)?;
    if flag_level.is_none() {
        let level = config::log_level(&generator_config)?;
        if let Err(err) = ReloadHandle::global().set_level(level) {
            tracing::debug!(error = %err, "config log level not applied");
        }
    }

    let files = load_schemas(&args.input)?;
    let summary = run(
        kind,
        &files,
        generator_config,
        args.output.as_deref(),
        &mut std::io::stdout().lock(),
    )?;

    tracing::info!(
        succeeded = summary.succeeded,
        failed = summary.failed.len(),
        written = summary.written.len(),
        "done"
    );
    if !summary.failed.is_empty() {
        let names: Vec<_> = summary.failed.iter().map(|(name, _)| name.as_str()).collect();
        anyhow::bail!(
            "{} of {} schema files failed: {}",
            summary.failed.len(),
            files.len(),
            names.join(", ")
        );
    }
    Ok(())
}
