//! Penna CLI - markdown blog static-site generator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "penna")]
#[command(about = "Markdown blog static-site generator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to blog.toml config file
    #[arg(short, long, default_value = "blog.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a blog in the current directory
    Init {
        /// Skip interactive prompts, overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Build the static site
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,

        /// Include draft posts
        #[arg(long)]
        drafts: bool,
    },

    /// Start development server with live reload
    Dev {
        /// Port to listen on (defaults to config or 4000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind (defaults to config or 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,

        /// Include draft posts
        #[arg(long)]
        drafts: bool,
    },

    /// Serve the built site
    Serve {
        /// Port to listen on (defaults to config or 4000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind (defaults to config or 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Directory to serve (defaults to config output)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Build {
            output,
            no_minify,
            drafts,
        } => {
            let minify = if no_minify { Some(false) } else { None };
            commands::build::run(&cli.config, output, minify, drafts).await?;
        }
        Commands::Dev {
            port,
            host,
            no_open,
            drafts,
        } => {
            commands::dev::run(&cli.config, port, host, !no_open, drafts).await?;
        }
        Commands::Serve { port, host, dir } => {
            commands::serve::run(&cli.config, port, host, dir).await?;
        }
    }

    Ok(())
}
