//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::{models::Network, state::Visibility};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "wallet-shell")]
#[command(about = "Screen-lock state machine and settings service for a wallet shell")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20553")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// JSON settings file; settings are kept in memory when omitted
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Network of the open wallet
    #[arg(short, long, value_enum, default_value_t = Network::Mainnet)]
    pub network: Network,

    /// Launch as if the app started in the background
    #[arg(long)]
    pub start_inactive: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Visibility the locker starts from
    pub fn initial_visibility(&self) -> Visibility {
        if self.start_inactive {
            Visibility::Background
        } else {
            Visibility::Active
        }
    }
}
