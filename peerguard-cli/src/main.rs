//! Peerguard CLI: evaluate addresses against a rule list, or run a guarded listener.
//!
//! ```bash
//! peerguard check --allow 10.0.0.0/8 --deny 10.1.*.* 10.1.2.3 10.9.9.9
//! peerguard serve --listen 0.0.0.0:8080 --allow 192.168.*.*
//! ```
//!
//! See `peerguard --help` for all available commands and options.

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use commands::RuleArgs;

#[derive(Parser)]
#[command(
    name = "peerguard",
    about = "Ordered allow/deny access control for peer addresses",
    version,
    after_help = "Rules are evaluated in order; the first matching rule decides."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the verdict for each address
    Check {
        #[command(flatten)]
        rules: RuleArgs,

        /// Addresses to evaluate (IPv4 or IPv6)
        #[arg(required = true)]
        addresses: Vec<String>,
    },
    /// Run an HTTP listener that answers "ok" to allowed peers and 403 to the rest
    Serve {
        #[command(flatten)]
        rules: RuleArgs,

        /// Address to listen on (overrides PG_LISTEN)
        #[arg(long)]
        listen: Option<String>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { rules, addresses } => {
            let stdout = std::io::stdout();
            match commands::check::run(&rules, &addresses, &mut stdout.lock()) {
                Ok(true) => ExitCode::SUCCESS,
                Ok(false) => ExitCode::from(1),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::from(2)
                }
            }
        }
        Commands::Serve { rules, listen } => match commands::serve::run(&rules, listen.as_deref()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                ExitCode::from(2)
            }
        },
    }
}
