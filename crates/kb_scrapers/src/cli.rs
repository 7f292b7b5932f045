use clap::{Args, Subcommand};
use kb_core::Result;

use crate::ScraperManager;

#[derive(Args, Debug, Clone)]
pub struct ScraperArgs {
    #[command(subcommand)]
    pub command: ScraperCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScraperCommands {
    /// List supported news portals
    List,
    /// Scrape a single article and print it as JSON
    Url {
        /// Article URL on detik.com, kompas.com or suara.com
        url: String,
    },
}

pub async fn handle_command(args: ScraperArgs, manager: &ScraperManager) -> Result<()> {
    match args.command {
        ScraperCommands::List => {
            println!("Available scrapers:");
            for scraper in manager.scrapers() {
                let meta = scraper.source_metadata();
                println!(
                    "  {} {} ({}) [{}]",
                    meta.emoji,
                    meta.name,
                    meta.host_pattern,
                    scraper.cli_names().join(", ")
                );
            }
        }
        ScraperCommands::Url { url } => {
            let article = manager.scrape_url(&url).await?;
            println!("{}", serde_json::to_string_pretty(&article)?);
        }
    }
    Ok(())
}
