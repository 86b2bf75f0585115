//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use pagebase_core::release::{
    ReleaseOptions, VersionStatus, check_latest_release, detect_package_manager, run_upgrade,
};
use pagebase_core::{emit, resolve};
use pagebase_shared::{
    AssetsDir, BasePath, DeployDescriptor, SiteUrl, expand_path, init_descriptor, load_descriptor,
    load_descriptor_from,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// pagebase — manage the deployment descriptor of a statically generated site.
#[derive(Parser)]
#[command(
    name = "pagebase",
    version,
    about = "Initialize, validate, and resolve static-site deployment descriptors.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Write a fresh descriptor file into a project directory.
    Init {
        /// Project directory (defaults to the current directory).
        dir: Option<PathBuf>,

        /// Absolute origin the site will be served from.
        #[arg(long)]
        site: String,

        /// Root-relative prefix all output is served under.
        #[arg(long, default_value = "/")]
        base_path: String,

        /// Directory name for built static assets.
        #[arg(long, default_value = "assets")]
        assets: String,
    },

    /// Print the resolved descriptor as TOML.
    Show {
        /// Descriptor file (defaults to walking up from the current directory).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Load the descriptor and report whether it satisfies all invariants.
    Check {
        /// Descriptor file (defaults to walking up from the current directory).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the fully-qualified URL for a page or asset path.
    Resolve {
        /// Path relative to the site root, e.g. `guide/installation`.
        path: String,

        /// Resolve under the assets directory instead of the page root.
        #[arg(long)]
        asset: bool,

        /// Descriptor file (defaults to walking up from the current directory).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Emit the config in the shape the external build tool consumes.
    Emit {
        /// Output format.
        #[arg(long, default_value = "json")]
        format: EmitFormat,

        /// Write to a file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Descriptor file (defaults to walking up from the current directory).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check for a newer release and optionally install it.
    Upgrade {
        /// Only report whether an update exists; do not install.
        #[arg(long)]
        check_only: bool,
    },
}

/// Emission format for the external build tool config.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum EmitFormat {
    Json,
    Toml,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "pagebase=info",
        1 => "pagebase=debug",
        _ => "pagebase=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Init {
            dir,
            site,
            base_path,
            assets,
        } => cmd_init(dir.as_deref(), &site, &base_path, &assets).await,
        Command::Show { config } => cmd_show(config.as_deref()).await,
        Command::Check { config } => cmd_check(config.as_deref()).await,
        Command::Resolve {
            path,
            asset,
            config,
        } => cmd_resolve(&path, asset, config.as_deref()).await,
        Command::Emit {
            format,
            out,
            config,
        } => cmd_emit(&format, out.as_deref(), config.as_deref()).await,
        Command::Upgrade { check_only } => cmd_upgrade(check_only).await,
    }
}

/// Load the descriptor from an explicit path or by project discovery.
fn load(config: Option<&Path>) -> Result<DeployDescriptor> {
    let descriptor = match config {
        Some(path) => load_descriptor_from(&expand_path(path))?,
        None => load_descriptor()?,
    };
    Ok(descriptor)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_init(dir: Option<&Path>, site: &str, base_path: &str, assets: &str) -> Result<()> {
    let descriptor = DeployDescriptor::new(
        SiteUrl::parse(site)?,
        BasePath::parse(base_path)?,
        AssetsDir::parse(assets)?,
    );

    let target = match dir {
        Some(d) => expand_path(d),
        None => std::env::current_dir()?,
    };

    let path = init_descriptor(&target, &descriptor)?;
    info!(site, base_path, "descriptor initialized");
    println!("Descriptor written to: {}", path.display());
    Ok(())
}

async fn cmd_show(config: Option<&Path>) -> Result<()> {
    let descriptor = load(config)?;
    print!("{}", toml::to_string_pretty(&descriptor)?);
    Ok(())
}

async fn cmd_check(config: Option<&Path>) -> Result<()> {
    // Loading already enforces every field invariant.
    let descriptor = load(config)?;
    let root = resolve::site_root(&descriptor);

    println!("Descriptor OK");
    println!("  Site:      {}", descriptor.site);
    println!("  Base path: {}", descriptor.base_path);
    println!("  Assets:    {}", descriptor.assets_dir());
    println!("  Served at: {root}");
    Ok(())
}

async fn cmd_resolve(path: &str, asset: bool, config: Option<&Path>) -> Result<()> {
    let descriptor = load(config)?;
    let url = if asset {
        resolve::asset_url(&descriptor, path)?
    } else {
        resolve::page_url(&descriptor, path)?
    };
    println!("{url}");
    Ok(())
}

async fn cmd_emit(format: &EmitFormat, out: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let descriptor = load(config)?;
    let rendered = match format {
        EmitFormat::Json => emit::emit_json(&descriptor)?,
        EmitFormat::Toml => emit::emit_toml(&descriptor)?,
    };

    match out {
        Some(path) => {
            let path = expand_path(path);
            std::fs::write(&path, &rendered)
                .map_err(|e| eyre!("cannot write {}: {e}", path.display()))?;
            info!(path = %path.display(), "build tool config written");
            println!("Config written to: {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

async fn cmd_upgrade(check_only: bool) -> Result<()> {
    let current = env!("CARGO_PKG_VERSION");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner.set_message("Checking for updates...");

    let status = check_latest_release(current, &ReleaseOptions::default()).await;
    spinner.finish_and_clear();

    match status {
        VersionStatus::UpToDate => {
            println!("pagebase {current} is up to date.");
        }
        VersionStatus::UpdateAvailable {
            latest,
            current,
            published_at,
        } => {
            match published_at {
                Some(date) => {
                    println!("Update available: {current} -> {latest} (released {})",
                        date.format("%Y-%m-%d"));
                }
                None => println!("Update available: {current} -> {latest}"),
            }

            let pm = detect_package_manager();
            if check_only {
                println!("Run `{}` to upgrade.", pm.upgrade_command());
            } else {
                info!(manager = pm.name(), "running upgrade");
                run_upgrade(pm)?;
                println!("Upgraded to {latest}.");
            }
        }
        VersionStatus::CheckFailed(message) => {
            return Err(eyre!("could not check for updates: {message}"));
        }
    }
    Ok(())
}
