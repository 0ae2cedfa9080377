//! CLI definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stackforge_core::config::env_keys;

#[derive(Parser)]
#[command(
    name = "stackforge",
    about = "Generate ready-to-run dockerized Laravel project skeletons",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Bind address, e.g. 127.0.0.1:8080
        #[arg(long, env = env_keys::gateway::STACKFORGE_BIND)]
        bind: Option<String>,
    },
    /// Assemble one project archive locally and print its path
    Assemble {
        /// Project name; becomes the archive's root directory
        name: String,
        /// PHP runtime version pin, passed to the builder verbatim
        #[arg(long)]
        php: String,
        /// Node runtime version pin, passed to the builder verbatim
        #[arg(long)]
        node: String,
        /// Scaffold with React
        #[arg(long)]
        react: bool,
        /// Include PHPUnit setup
        #[arg(long)]
        phpunit: bool,
        /// Run npm install during generation
        #[arg(long)]
        npm: bool,
        /// Move the finished archive into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
