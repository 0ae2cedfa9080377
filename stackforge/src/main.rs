mod cli;
mod gateway;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    stackforge_core::observability::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind } => gateway::serve(bind),
        Commands::Assemble {
            name,
            php,
            node,
            react,
            phpunit,
            npm,
            output,
        } => cmd_assemble(&name, &php, &node, react, phpunit, npm, output),
    }
}

fn cmd_assemble(
    name: &str,
    php: &str,
    node: &str,
    react: bool,
    phpunit: bool,
    npm: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let request = gateway::make_request(name, php, node, react, phpunit, npm)?;
    let artifact = gateway::assembler_from_env().assemble(&request)?;

    let final_path = match output {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("cannot create output directory {}", dir.display()))?;
            let dest = dir.join(format!("{}.zip", artifact.project_name));
            // Copy-then-remove: the temp dir and the destination may sit on
            // different filesystems, where a rename would fail.
            std::fs::copy(&artifact.path, &dest)
                .with_context(|| format!("cannot write archive to {}", dest.display()))?;
            std::fs::remove_file(&artifact.path)?;
            dest
        }
        None => artifact.path,
    };

    println!("{}", final_path.display());
    Ok(())
}
