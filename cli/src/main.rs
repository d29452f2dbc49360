use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rusqlite::{Connection, OpenFlags};
use schema_sync_core::{Schema, SchemaFormat, SyncConfig};
use schema_sync_sqlite::Synchronizer;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

impl From<CliOutputFormat> for SchemaFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Json => Self::Json,
            CliOutputFormat::Yaml => Self::Yaml,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "schema-sync")]
#[command(about = "Sync a SQLite database with a declarative table schema, or extract one")]
#[command(version, arg_required_else_help = true)]
struct Cli {
    /// YAML settings file (system table prefix, attached schema, dry run).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create missing tables and add missing columns from a schema file.
    Sync(SyncArgs),
    /// Print the schema of an existing database.
    Extract(ExtractArgs),
    /// Print the statements `sync` would run, without running them.
    Plan(PlanArgs),
}

#[derive(Debug, Args)]
struct SyncArgs {
    /// Database file path (created if missing).
    database: PathBuf,
    /// Schema file (.json, or .yaml/.yml).
    schema: PathBuf,
    /// Log the statements instead of executing them.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Database file path.
    database: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct PlanArgs {
    /// Database file path.
    database: PathBuf,
    /// Schema file (.json, or .yaml/.yml).
    schema: PathBuf,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help, version, and usage mistakes all print and exit cleanly.
            let _ = err.print();
            return;
        }
    };

    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Sync(args) => run_sync(cli.config.as_deref(), args),
        Command::Extract(args) => run_extract(cli.config.as_deref(), args),
        Command::Plan(args) => run_plan(cli.config.as_deref(), args),
    };

    if let Err(err) = result {
        error!("{err}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so `extract` output on stdout stays a clean document.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_sync(config_path: Option<&Path>, args: SyncArgs) -> Result<(), String> {
    let mut config = load_config(config_path)?;
    config.dry_run |= args.dry_run;

    let schema = load_schema(&args.schema)?;
    let conn = Connection::open(&args.database)
        .map_err(|e| format!("Failed to open database '{}': {e}", args.database.display()))?;

    info!(
        database = %args.database.display(),
        schema = %args.schema.display(),
        tables = schema.len(),
        "syncing"
    );
    let report = Synchronizer::new(&conn, config).sync(&schema);
    if !report.failed.is_empty() {
        warn!(
            failed = report.failed.len(),
            "some statements failed; rerun sync to retry them"
        );
    }
    Ok(())
}

fn run_extract(config_path: Option<&Path>, args: ExtractArgs) -> Result<(), String> {
    let config = load_config(config_path)?;
    let conn = open_read_only(&args.database)?;

    let schema = Synchronizer::new(&conn, config)
        .extract()
        .map_err(|e| format!("Failed to extract schema: {e}"))?;
    let raw = schema
        .render(args.format.into())
        .map_err(|e| format!("Failed to serialize schema: {e}"))?;
    println!("{}", raw.trim_end());
    Ok(())
}

fn run_plan(config_path: Option<&Path>, args: PlanArgs) -> Result<(), String> {
    let config = load_config(config_path)?;
    let schema = load_schema(&args.schema)?;
    let conn = open_read_only(&args.database)?;

    let sync = Synchronizer::new(&conn, config);
    let actions = sync.plan(&schema);
    for action in &actions {
        println!("{};", sync.render(action));
    }
    info!(statements = actions.len(), "planned");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_config(path: Option<&Path>) -> Result<SyncConfig, String> {
    match path {
        Some(path) => SyncConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display())),
        None => Ok(SyncConfig::default()),
    }
}

fn load_schema(path: &Path) -> Result<Schema, String> {
    Schema::load(path).map_err(|e| format!("Failed to load schema '{}': {e}", path.display()))
}

fn open_read_only(path: &Path) -> Result<Connection, String> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| format!("Failed to open database '{}': {e}", path.display()))
}
