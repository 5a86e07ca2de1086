// CLI module - command-line argument parsing and handlers
//
// With no subcommand the relay server runs. The `config` subcommand
// inspects or initializes configuration:
// - config --show: Display effective configuration
// - config --path: Print the config file path
// - config --init: Write the default config file if none exists

use crate::config::{Config, API_KEY_ENV, VERSION};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

/// Editor Relay - streams an editor persona's replies to the browser as SSE
#[derive(Parser)]
#[command(name = "editor-relay")]
#[command(version = VERSION)]
#[command(about = "SSE relay for the editor chat persona", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,

        /// Write the default config file (never overwrites)
        #[arg(long)]
        init: bool,
    },
}

/// Handle CLI commands. Returns true if a command was handled (exit after).
pub fn handle_cli() -> Result<bool> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { show, path, init }) => {
            if path {
                handle_config_path()?;
            } else if show {
                handle_config_show()?;
            } else if init {
                handle_config_init()?;
            } else {
                // No flag provided, show help
                println!("Usage: editor-relay config [--show|--path|--init]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --path    Show config file path");
                println!("  --init    Write the default config file if none exists");
            }
            Ok(true)
        }
        None => Ok(false), // No subcommand, run the relay
    }
}

fn handle_config_path() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show() -> Result<()> {
    let config = Config::from_env()?;

    println!("# Effective configuration (env > file > defaults)");
    println!(
        "# {}: {}",
        API_KEY_ENV,
        if config.has_api_key() { "set" } else { "NOT SET" }
    );
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
    Ok(())
}

fn handle_config_init() -> Result<()> {
    match Config::write_default_config()? {
        Some(path) => println!("Wrote default config to {}", path.display()),
        None => println!("Config file already exists, leaving it untouched"),
    }
    Ok(())
}
