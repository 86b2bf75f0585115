//! pagebase CLI — deployment descriptor manager for static sites.
//!
//! Owns the project's `pagebase.toml`: initializes it, validates it,
//! resolves fully-qualified URLs from it, and emits the config shape the
//! external static-site build tool consumes.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
