// Operator CLI for a file-backed ownership timelock

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use warden_cli::commands::{history, principal, timelock};
use warden_cli::config::DEFAULT_CONFIG_PATH;
use warden_cli::{CliConfig, HostClock, Workspace};
use warden_core::PrincipalId;
use warden_timelock::TimelockError;

#[derive(Parser)]
#[command(name = "warden")]
#[command(about = "Warden - timelocked ownership transfer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Pin the clock to this Unix time (seconds) instead of reading the system clock
    #[arg(long, global = true)]
    at: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the controller with an initial owner
    Init {
        /// Initial owner
        #[arg(long)]
        owner: PrincipalId,
    },

    /// Print the current owner
    Owner,

    /// Print owner, timelock configuration and request status
    Show,

    /// Name a candidate and delay (owner only)
    SetTimelock {
        #[arg(long)]
        caller: PrincipalId,

        #[arg(long)]
        candidate: PrincipalId,

        /// Minimum wait between initiating and completing, in seconds
        #[arg(long)]
        delay_secs: u64,
    },

    /// Start the unlock clock (candidate only)
    InitUnlock {
        #[arg(long)]
        caller: PrincipalId,
    },

    /// Claim ownership once the delay has elapsed (candidate only)
    CompleteUnlock {
        #[arg(long)]
        caller: PrincipalId,
    },

    /// Clear any pending request (owner only)
    CancelUnlock {
        #[arg(long)]
        caller: PrincipalId,
    },

    /// Replay the audit log
    History {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Generate a principal id
    NewPrincipal {
        /// Derive deterministically from a label
        #[arg(long)]
        label: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = CliConfig::load(&cli.config)?;

    let log_level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let ws = Workspace::open(config, HostClock::from_override(cli.at));
    let result = match cli.command {
        Commands::Init { owner } => timelock::init(&ws, owner).await,
        Commands::Owner => timelock::owner(&ws).await,
        Commands::Show => timelock::show(&ws).await,
        Commands::SetTimelock {
            caller,
            candidate,
            delay_secs,
        } => timelock::set_timelock(&ws, caller, candidate, delay_secs).await,
        Commands::InitUnlock { caller } => timelock::init_unlock(&ws, caller).await,
        Commands::CompleteUnlock { caller } => timelock::complete_unlock(&ws, caller).await,
        Commands::CancelUnlock { caller } => timelock::cancel_unlock(&ws, caller).await,
        Commands::History { json } => history::history(&ws, json).await,
        Commands::NewPrincipal { label } => Ok(principal::new_principal(label.as_deref())),
    };

    match result {
        Ok(output) => {
            print!("{output}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => match err.downcast_ref::<TimelockError>() {
            Some(rejection) => {
                eprintln!("error[{}]: {}", rejection.code(), rejection);
                Ok(ExitCode::FAILURE)
            }
            None => Err(err),
        },
    }
}
