//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// Shortener - deterministic URL shortener backed by Redis
#[derive(Parser, Debug)]
#[command(name = "shortener")]
#[command(version)]
#[command(about = "A small URL shortener service", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML); environment variables prefixed with
    /// SHORTENER__ override its values
    #[arg(long, short = 'c', global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Print the short code for a URL without touching the store
    Generate {
        /// Long URL to shorten
        long_url: String,
        /// Owner identifier mixed into the hash
        user_id: String,
    },

    /// Write a sample configuration file
    ConfigGen {
        /// Output path
        #[arg(default_value = "config.example.toml")]
        path: String,
    },
}
