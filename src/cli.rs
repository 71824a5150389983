use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sitepush::SessionId;

/// sitepush - stage a site snapshot and deploy it
#[derive(Parser, Debug)]
#[command(name = "sitepush")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON events on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stage the requested items and deploy them to a server
    Publish {
        /// Server alias from the config file
        #[arg(short, long)]
        server: String,

        /// Path to the publisher config
        #[arg(short, long, default_value = "sitepush.toml")]
        config: PathBuf,

        /// Path to the content manifest
        #[arg(short, long, default_value = "site.toml")]
        manifest: PathBuf,

        /// Item ids to publish (defaults to every top-level item)
        #[arg(short, long = "item")]
        items: Vec<String>,

        /// Include the descendants of each requested item
        #[arg(long)]
        descendants: bool,

        /// Session id to reuse (a new one is generated otherwise)
        #[arg(long)]
        session: Option<SessionId>,

        /// Also stage the server's folders and extension files
        #[arg(long)]
        files: bool,

        /// Remove the staging tree after a successful upload
        #[arg(long)]
        clean: bool,
    },

    /// List configured servers
    Servers {
        /// Path to the publisher config
        #[arg(short, long, default_value = "sitepush.toml")]
        config: PathBuf,
    },

    /// List registered deployers
    Deployers,
}
