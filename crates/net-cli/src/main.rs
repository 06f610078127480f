//! dpcfg - dataplane interface configuration checker

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dpcfg_cli::commands::{OutputFormat, ShowCommand, ValidateCommand};
use dpcfg_cli::PolicyOverrides;

#[derive(Parser)]
#[command(name = "dpcfg")]
#[command(about = "Dataplane interface configuration checker")]
#[command(version)]
#[command(long_about = "
Dataplane interface configuration checker

Checks a declarative interface configuration (physical interfaces, sub-interfaces,
loopbacks) for semantic consistency before it is applied to the dataplane.

Validation settings are read from an optional settings file, then from DPCFG_*
environment variables, then from the flags below.

Examples:
  dpcfg validate router.yaml                  # Validate one file
  dpcfg validate a.yaml b.yaml c.json         # Validate several files
  dpcfg show router.yaml                      # Show resolved attributes
  dpcfg show router.yaml --format json        # Same, as JSON
")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Validation settings file
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// MTU used when no interface in a hierarchy sets one
    #[arg(long, global = true)]
    default_mtu: Option<u32>,

    /// Reject exact-match on encapsulations without an inner tag
    #[arg(long, global = true)]
    exact_match_requires_inner: bool,

    /// Accept mutual cross-connect pairs
    #[arg(long, global = true)]
    allow_reciprocal_l2xc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration files
    Validate {
        /// Configuration files to validate
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show resolved interface attributes
    Show {
        /// Configuration file
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let overrides = PolicyOverrides {
        default_mtu: cli.default_mtu,
        exact_match_requires_inner: cli.exact_match_requires_inner,
        allow_reciprocal_l2xc: cli.allow_reciprocal_l2xc,
    };
    let result = dpcfg_config::load_policy(cli.settings.as_deref())
        .context("Failed to load validation settings")
        .map(|policy| overrides.apply(policy));

    let result = match (result, cli.command) {
        (Err(e), _) => Err(e),
        (Ok(policy), Commands::Validate { files }) => {
            ValidateCommand::new(policy).execute(&files).await
        }
        (Ok(policy), Commands::Show { file, format }) => ShowCommand::new(policy)
            .execute(&file, format)
            .await
            .map(|()| true),
    };

    // Handle errors with appropriate exit codes
    match result {
        Ok(true) => {
            if !cli.quiet {
                log::info!("Command completed successfully");
            }
            std::process::exit(0);
        }
        Ok(false) => std::process::exit(1),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);

                // Print error chain if in verbose mode
                if cli.verbose || cli.debug {
                    for cause in e.chain().skip(1) {
                        eprintln!("  Caused by: {}", cause);
                    }
                }
            }
            std::process::exit(1);
        }
    }
}
