//! charmkit CLI - inspect, stamp and package charms

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod exit_codes;
mod util;

#[derive(Parser)]
#[command(name = "charmkit")]
#[command(author = "charmkit Contributors")]
#[command(version)]
#[command(about = "Load, inspect, stamp and package charms", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Log line format
    #[arg(
        long,
        global = true,
        value_enum,
        env = "CHARMKIT_LOG_FORMAT",
        default_value = "text"
    )]
    log_format: LogFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show charm information
    Show {
        /// Charm directory or archive
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the series a deployment of the charm would use
    Series {
        /// Charm directory or archive
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Requested series (empty means the charm's default)
        #[arg(short, long, env = "CHARMKIT_SERIES", default_value = "")]
        series: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the charm's version file from its revision control metadata
    Version {
        /// Charm directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Package a charm directory into an archive
    Package {
        /// Charm directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output file (default: <name>-<revision>.charm in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not refresh the version file before packaging
        #[arg(long)]
        no_version: bool,
    },

    /// Expand a charm archive into a directory
    Unpack {
        /// Charm archive
        archive: PathBuf,

        /// Destination directory
        dest: PathBuf,
    },
}

fn init_logging(debug: bool, format: LogFormat) {
    let default = if debug {
        "charmkit=debug,charmkit_core=debug"
    } else {
        "charmkit=info,charmkit_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_env("CHARMKIT_LOG")
        .unwrap_or_else(|_| default.into());

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: Cli) -> error::Result<()> {
    match cli.command {
        Commands::Show { path, json } => commands::show::run(&path, json),

        Commands::Series { path, series, json } => commands::series::run(&path, &series, json),

        Commands::Version { path } => commands::version::run(&path),

        Commands::Package {
            path,
            output,
            no_version,
        } => commands::package::run(&path, output.as_deref(), no_version),

        Commands::Unpack { archive, dest } => commands::unpack::run(&archive, &dest),
    }
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_logging(cli.debug, cli.log_format);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
