use std::path::PathBuf;

use clap::{value_parser, Parser, Subcommand};
use domain_panel_core::types::ViewMode;

/// domain-panel - domain expiry status panel
#[derive(Parser, Debug)]
#[command(author, version, about = "domain-panel - domain expiry status panel", long_about = None)]
pub struct Cli {
    /// Configuration file (default: <config dir>/domain-panel/config.json)
    #[arg(long, value_name = "FILE", value_parser = value_parser!(PathBuf))]
    pub config: Option<PathBuf>,

    /// API base URL, overrides the configuration and DOMAIN_PANEL_API_BASE
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Subcommands (default: watch)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Poll the API and print the panel whenever it changes
    Watch,

    /// Fetch once and print the panel (exit status 1 and a hidden panel if the fetch fails)
    Show {
        /// Print the panel model as JSON
        #[arg(long)]
        json: bool,
    },

    /// Persist the preferred layout
    SetView {
        /// inline | grid
        mode: ViewMode,
    },
}
