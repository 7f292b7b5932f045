use std::time::Duration;

use kb_core::{Article, Error, Result};
use reqwest::Client;

use crate::logging::Logger;
use crate::scrapers::{utils, ScraperType, SourceMetadata};

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("Mozilla/5.0 (compatible; kb/{})", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Dispatch table from URL host to portal extractor.
pub struct ScraperManager {
    client: Client,
    scrapers: Vec<ScraperType>,
}

impl ScraperManager {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            scrapers: ScraperType::all(),
        }
    }

    pub fn scrapers(&self) -> &[ScraperType] {
        &self.scrapers
    }

    pub fn list_scrapers(&self) -> Vec<SourceMetadata> {
        self.scrapers.iter().map(|s| s.source_metadata()).collect()
    }

    pub fn get_scraper_for_url(&self, url: &str) -> Result<&ScraperType> {
        let parsed = utils::parse_url(url)?;
        self.scrapers
            .iter()
            .find(|s| s.can_handle(url))
            .ok_or_else(|| Error::UnsupportedSource(parsed.host_str().unwrap_or(url).to_string()))
    }

    pub async fn scrape_url(&self, url: &str) -> Result<Article> {
        let url = url.trim();
        let scraper = self.get_scraper_for_url(url)?;
        let meta = scraper.source_metadata();
        let logger = Logger::new().with_prefix(format!("{} [{}]", meta.emoji, meta.name));

        logger.info(&format!("Scraping {}", url));
        let article = scraper.scrape_article(&self.client, url).await?;
        logger.debug(&format!(
            "Extracted title ({} chars) and content ({} chars)",
            article.title.len(),
            article.content.len()
        ));
        Ok(article)
    }

    /// Like `scrape_url`, with every failure collapsed into `None`.
    pub async fn try_scrape(&self, url: &str) -> Option<Article> {
        match self.scrape_url(url).await {
            Ok(article) => Some(article),
            Err(e) => {
                Logger::new().with_prefix("⚠️").warn(&format!("Failed to scrape {}: {}", url, e));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_core::Source;

    fn manager() -> ScraperManager {
        ScraperManager::with_client(Client::new())
    }

    #[test]
    fn test_dispatch_by_host() {
        let manager = manager();
        let cases = [
            ("https://www.suara.com/news/2024/05/12/x", Source::Suara),
            ("https://news.detik.com/berita/d-1/x", Source::Detik),
            ("https://nasional.kompas.com/read/2024/05/12/x", Source::Kompas),
        ];
        for (url, source) in cases {
            let scraper = manager.get_scraper_for_url(url).unwrap();
            assert_eq!(scraper.source_metadata().source, source);
        }
    }

    #[test]
    fn test_unsupported_domain_is_an_error() {
        let manager = manager();
        let result = manager.get_scraper_for_url("https://www.kapanlagi.com/news/x");
        assert!(matches!(result, Err(Error::UnsupportedSource(host)) if host == "www.kapanlagi.com"));
    }

    #[test]
    fn test_invalid_url_is_an_error() {
        let manager = manager();
        let result = manager.get_scraper_for_url("bukan url");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_try_scrape_collapses_failures() {
        assert!(manager().try_scrape("https://example.com/berita").await.is_none());
        assert!(manager().try_scrape("").await.is_none());
    }

    #[test]
    fn test_list_scrapers() {
        let names: Vec<_> = manager().list_scrapers().iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["Suara", "Detik", "Kompas"]);
    }
}
