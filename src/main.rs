//! sitepush CLI - stage a site snapshot and deploy it
//!
//! Usage: sitepush <COMMAND>
//!
//! Commands:
//!   publish    Stage the requested items and deploy them to a server
//!   servers    List configured servers
//!   deployers  List registered deployers

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use commands::PublishArgs;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Publish {
            server,
            config,
            manifest,
            items,
            descendants,
            session,
            files,
            clean,
        } => commands::cmd_publish(
            PublishArgs {
                server,
                config,
                manifest,
                items,
                descendants,
                session,
                files,
                clean,
            },
            cli.json,
            cli.verbose,
        ),
        Commands::Servers { config } => commands::cmd_servers(&config, cli.json),
        Commands::Deployers => commands::cmd_deployers(cli.json),
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sitepush={}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
