pub mod cli;
pub mod manager;
pub mod scrapers;
mod logging;

pub use manager::{ScraperConfig, ScraperManager};

pub use cli::{handle_command, ScraperArgs, ScraperCommands};
pub use scrapers::{Scraper, ScraperType, SourceMetadata};

pub mod prelude {
    pub use super::scrapers::Scraper;
    pub use super::ScraperManager;
    pub use kb_core::{Article, Error, Result};
}
