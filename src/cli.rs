use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 📊 BEI Listing Dashboard
///
/// Browse, filter and chart the Indonesian stock-exchange listings table.
#[derive(Debug, Parser)]
#[command(name = "bei-dashboard", version, about = "Dashboard for BEI stock listings")]
pub struct Cli {
    /// Tab-separated listings file (overrides BEI_DATA_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive terminal dashboard (default)
    Ui,

    /// Print the summary metrics for a selection
    Summary {
        /// Listing board to include; repeat for several. Defaults to every board.
        #[arg(long = "board", value_name = "BOARD")]
        boards: Vec<String>,

        /// Case-insensitive substring of issuer name or code
        #[arg(long)]
        search: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}
