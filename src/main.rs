// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;
mod cli;

use anyhow::Result;
use bei_dashboard::{aggregate, logging, Config, DashboardError, ListingRepository, Selection};
use clap::Parser;
use cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("❌ {:#}", err);
        std::process::exit(exit_code(&err));
    }
}

/// 2 = data could not be loaded, 3 = nothing matched the filters
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<DashboardError>() {
        Some(DashboardError::DataLoad { .. }) => 2,
        Some(DashboardError::EmptySelection) => 3,
        None => 1,
    }
}

fn run(cli: Cli) -> Result<()> {
    logging::init("info");

    let config = Config::from_env()?.with_overrides(cli.data, None);
    let repo = ListingRepository::load(&config.data_path)?;

    match cli.command.unwrap_or(Command::Ui) {
        Command::Ui => run_ui_mode(&repo, &config),
        Command::Summary { boards, search, json } => run_summary(&repo, boards, search, json),
    }
}

fn run_summary(repo: &ListingRepository, boards: Vec<String>, search: Option<String>, json: bool) -> Result<()> {
    let mut selection = if boards.is_empty() {
        repo.default_selection()
    } else {
        Selection::new(boards, None)
    };
    if let Some(keyword) = search {
        selection.set_keyword(&keyword);
    }

    let filtered = repo.filter(&selection);
    let summary = aggregate(&filtered)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("📊 {}", bei_dashboard::TITLE);
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("📈 Total issuers:        {}", summary.formatted_count());
        println!("🏆 Most shares:          {}", summary.top_by_shares);
        println!("📅 Earliest listing:     {}", summary.earliest_year);
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(repo: &ListingRepository, config: &Config) -> Result<()> {
    println!("🖥️  Loading BEI Listing Dashboard...\n");
    println!("✓ Loaded {} listings from {}", repo.len(), repo.source().display());
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(repo, config.shares_bins);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_repo: &ListingRepository, _config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin bei-server --features server");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&anyhow::Error::new(DashboardError::EmptySelection)), 3);

        let load = DashboardError::DataLoad {
            path: "saham.txt".into(),
            line: None,
            reason: "missing".to_string(),
        };
        assert_eq!(exit_code(&anyhow::Error::new(load)), 2);

        assert_eq!(exit_code(&anyhow::anyhow!("other")), 1);
    }
}
