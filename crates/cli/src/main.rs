// # -----------------------------
// # crates/cli/src/main.rs
// # -----------------------------
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

use seen_cli::report::{render_check, render_listing, render_settings};
use seen_cli::{MigrationReport, NewRecord, RecordStore, DEFAULT_RETENTION_DAYS};
use seen_common::{RuntimePaths, Settings, DEFAULT_SKILL_NAME};

#[derive(Parser, Debug)]
#[command(
    name = "seen-tools",
    version,
    about = "Dedup log of tools that were already recommended",
    long_about = None
)]
struct Cli {
    /// Project root holding `.skills-data/` (defaults to the current directory)
    #[arg(long = "project-root", global = true, value_name = "PATH")]
    project_root: Option<PathBuf>,
    /// Skill whose data directory is used
    #[arg(long, global = true, default_value = DEFAULT_SKILL_NAME)]
    skill: String,
    /// Log level (trace, debug, info, warn, error, off). Overrides RUST_LOG if set.
    #[arg(long = "log-level", global = true, value_name = "LEVEL")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List recently recommended tools (expired entries are pruned)
    Read {
        /// Retention window in days
        #[arg(long, default_value_t = DEFAULT_RETENTION_DAYS)]
        days: u32,
    },

    /// Append tool records
    Add {
        /// Tools as "Name|one-line description"
        #[arg(long, num_args = 1.., value_name = "NAME|DESC")]
        tools: Vec<String>,
        /// JSON array: '[{"name":"X","desc":"Y"}]'
        #[arg(long = "json", value_name = "JSON")]
        json: Option<String>,
    },

    /// Report whether tools were already recommended
    Check {
        /// Tool names to look up (case-insensitive)
        #[arg(required = true)]
        names: Vec<String>,
        /// Retention window in days
        #[arg(long, default_value_t = DEFAULT_RETENTION_DAYS)]
        days: u32,
    },

    /// Create the data directories and the config template
    Init,

    /// Show resolved configuration (secrets masked)
    Config,
}

/// Initialize logging based on CLI arguments and environment
fn init_logging(log_level: Option<&str>) {
    // CLI arg overrides RUST_LOG
    let filter = match log_level {
        Some(level) => match level.to_lowercase().as_str() {
            "off" => EnvFilter::new("off"),
            "error" => EnvFilter::new("error"),
            "warn" | "warning" => EnvFilter::new("warn"),
            "info" => EnvFilter::new("info"),
            "debug" => EnvFilter::new("debug"),
            "trace" => EnvFilter::new("trace"),
            _ => {
                eprintln!("Warning: Invalid log level '{}', using 'info'", level);
                EnvFilter::new("info")
            }
        },
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    // stdout is reserved for listings
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());
    tracing::debug!("CLI arguments: {:?}", cli);

    let paths = match &cli.project_root {
        Some(root) => RuntimePaths::for_project(root, &cli.skill),
        None => RuntimePaths::from_current_dir(&cli.skill)?,
    };

    match cli.command {
        Commands::Read { days } => handle_read(&paths, days),
        Commands::Add { tools, json } => handle_add(&paths, tools, json),
        Commands::Check { names, days } => handle_check(&paths, &names, days),
        Commands::Init => handle_init(&paths),
        Commands::Config => handle_config(&paths),
    }
}

/// Store with the legacy markdown log already imported.
fn open_migrated(paths: &RuntimePaths) -> Result<(RecordStore, MigrationReport)> {
    let store = RecordStore::new(paths);
    let report = store.migrate().context("migrate legacy seen-tools.md")?;
    Ok((store, report))
}

fn handle_read(paths: &RuntimePaths, days: u32) -> Result<()> {
    let (store, report) = open_migrated(paths)?;
    if report.performed {
        println!(
            "migrated {} entries from seen-tools.md to seen-tools.jsonl",
            report.migrated
        );
    }

    let records = store.read(days).context("read seen tools")?;
    print!("{}", render_listing(&records, days));
    Ok(())
}

fn handle_add(paths: &RuntimePaths, tools: Vec<String>, json: Option<String>) -> Result<()> {
    let mut batch: Vec<NewRecord> = tools.iter().map(|t| NewRecord::from_token(t)).collect();
    if let Some(json) = json.as_deref() {
        batch.extend(NewRecord::batch_from_json(json)?);
    }
    if batch.is_empty() {
        bail!("provide --tools or --json");
    }

    let count = RecordStore::new(paths)
        .append(&batch)
        .context("append seen tools")?;
    println!("appended {count} records");
    Ok(())
}

fn handle_check(paths: &RuntimePaths, names: &[String], days: u32) -> Result<()> {
    // stdout stays machine-readable; the migration notice goes to the log
    let (store, _) = open_migrated(paths)?;
    let records = store.read(days).context("read seen tools")?;
    print!("{}", render_check(&records, names));
    Ok(())
}

fn handle_init(paths: &RuntimePaths) -> Result<()> {
    paths.ensure_dirs()?;
    let created = paths.ensure_env_file()?;
    println!("skill dir: {}", paths.skill_dir().display());
    println!("data dir:  {}", paths.data_dir().display());
    println!("cache dir: {}", paths.cache_dir().display());
    println!("logs dir:  {}", paths.logs_dir().display());
    if created {
        println!(
            "created config file {}; fill in the tokens / API keys you need",
            paths.env_file().display()
        );
    } else {
        println!("config:    {}", paths.env_file().display());
    }
    Ok(())
}

fn handle_config(paths: &RuntimePaths) -> Result<()> {
    let settings = Settings::load(paths)?;
    print!("{}", render_settings(&settings));
    if let Err(err) = settings.email() {
        tracing::warn!("mail settings unusable: {err:#}");
    }
    Ok(())
}
