//! sitesmith CLI - bootstrap branded sites from HTML shells.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod settings;

#[derive(Parser)]
#[command(name = "sitesmith")]
#[command(about = "Bootstrap branded marketing and blog sites from HTML shells")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Personalize a site: pages, palette, assets and policy pages
    Bootstrap(BootstrapArgs),

    /// Write a starter site.toml, shell templates and switcher script
    Init {
        /// Site root directory
        #[arg(short, long, default_value = ".")]
        site: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// List placeholders left unresolved in generated HTML
    Check {
        /// Site root directory
        #[arg(short, long, default_value = ".")]
        site: PathBuf,
    },

    /// Print the palette for a topic as JSON
    Palette {
        /// Site topic
        #[arg(short, long)]
        topic: String,

        /// Override the background glow preset
        #[arg(short, long)]
        animation: Option<String>,
    },

    /// Preview the published tree of a site locally
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct BootstrapArgs {
    /// Site domain, e.g. example.com
    #[arg(long)]
    pub domain: String,

    /// Brand name shown on every page
    #[arg(long)]
    pub brand: String,

    /// Site topic; drives the palette and generated assets
    #[arg(long)]
    pub topic: String,

    /// Background animation period in seconds (clamped to 8-60)
    #[arg(long, allow_negative_numbers = true)]
    pub speed: Option<i64>,

    /// Newsletter address (defaults to info@<domain>)
    #[arg(long)]
    pub subscribe_email: Option<String>,

    /// Background glow preset: wine, aurora, sunset or minimal
    #[arg(long)]
    pub animation: Option<String>,

    /// Site root directory
    #[arg(long, default_value = ".")]
    pub site: PathBuf,

    /// Do not call the generative service
    #[arg(long)]
    pub no_ai: bool,

    /// Skip minification of the theme stylesheet
    #[arg(long)]
    pub no_minify: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Bootstrap(args) => {
            commands::bootstrap::run(args).await?;
        }
        Commands::Init { site, yes } => {
            commands::init::run(site, yes)?;
        }
        Commands::Check { site } => {
            commands::check::run(site)?;
        }
        Commands::Palette { topic, animation } => {
            commands::palette::run(&topic, animation.as_deref())?;
        }
        Commands::Serve { port, dir } => {
            commands::serve::run(port, dir).await?;
        }
    }

    Ok(())
}
