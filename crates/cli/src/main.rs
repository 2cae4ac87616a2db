mod document;
mod migrate;
mod pack;
mod setup;
mod upgrade;
mod validate;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::pack::DocumentKind;
use crate::setup::Toolkit;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Document kind accepted by migrate-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Power,
    Origin,
}

impl From<KindArg> for DocumentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Power => DocumentKind::Power,
            KindArg::Origin => DocumentKind::Origin,
        }
    }
}

/// Origins datapack upgrader.
#[derive(Parser)]
#[command(
    name = "originport",
    version,
    about = "Upgrade Origins datapacks to the Minecraft 1.21 format"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Schema catalogue to use instead of the built-in one
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Remap tables (TOML) to use instead of the built-in ones
    #[arg(long, global = true)]
    remaps: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate every power and origin of a datapack in place
    Upgrade {
        /// Path to the datapack folder (containing pack.mcmeta)
        pack: PathBuf,
    },

    /// Migrate a single document and print the result
    MigrateFile {
        /// Path to the power or origin JSON file
        file: PathBuf,
        /// What the document describes
        #[arg(long, value_enum, default_value = "power")]
        kind: KindArg,
        /// Namespace used for generated ids (default: taken from a data/<ns>/ path)
        #[arg(long)]
        namespace: Option<String>,
    },

    /// Validate a schema catalogue against the catalogue meta-schema
    CheckSchema {
        /// Path to the schema catalogue JSON file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    match &cli.command {
        Commands::Upgrade { pack } => {
            let toolkit = load_toolkit(&cli);
            upgrade::cmd_upgrade(pack, &toolkit, cli.output, cli.quiet);
        }
        Commands::MigrateFile {
            file,
            kind,
            namespace,
        } => {
            let toolkit = load_toolkit(&cli);
            migrate::cmd_migrate_file(
                file,
                (*kind).into(),
                namespace.as_deref(),
                &toolkit,
                cli.output,
                cli.quiet,
            );
        }
        Commands::CheckSchema { file } => {
            validate::cmd_check_schema(file, cli.output, cli.quiet);
        }
    }
}

/// Log to stderr. `RUST_LOG` wins unless `--quiet` is given.
///
/// Both output formats already carry every diagnostic on stdout, so the
/// default mirror only shows warnings and errors.
fn init_tracing(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_toolkit(cli: &Cli) -> Toolkit {
    match Toolkit::load(cli.schema.as_deref(), cli.remaps.as_deref()) {
        Ok(t) => t,
        Err(msg) => {
            report_error(&msg, cli.output, cli.quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
