use async_trait::async_trait;
use kb_core::{Article, Error, Result, Source};
use reqwest::Client;
use url::Url;

pub mod indonesia;
pub mod text;

use indonesia::{DetikScraper, KompasScraper, SuaraScraper};

/// Static description of a supported news portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMetadata {
    pub name: &'static str,
    pub emoji: &'static str,
    pub source: Source,
    /// Substring matched against the URL host
    pub host_pattern: &'static str,
}

#[async_trait]
pub trait Scraper: Send + Sync {
    /// Returns the metadata of the news portal
    fn source_metadata(&self) -> SourceMetadata;

    /// Returns true if this scraper can handle the given URL
    fn can_handle(&self, url: &str) -> bool {
        utils::host_of(url)
            .map(|host| host.contains(self.source_metadata().host_pattern))
            .unwrap_or(false)
    }

    /// Builds an article out of a downloaded page
    fn extract(&self, html: &str, url: &str) -> Result<Article>;

    /// Downloads the single-page version of `url` and extracts the article
    async fn scrape_article(&self, client: &Client, url: &str) -> Result<Article> {
        let html = utils::fetch_html(client, &utils::with_page_all(url)).await?;
        self.extract(&html, url)
    }

    /// Returns a list of CLI shorthand names for this scraper
    fn cli_names(&self) -> Vec<&str> {
        vec![]
    }
}

/// Closed set of supported portals.
#[derive(Debug, Clone)]
pub enum ScraperType {
    Suara(SuaraScraper),
    Detik(DetikScraper),
    Kompas(KompasScraper),
}

impl ScraperType {
    /// Every portal, in dispatch order.
    pub fn all() -> Vec<ScraperType> {
        vec![
            ScraperType::Suara(SuaraScraper::new()),
            ScraperType::Detik(DetikScraper::new()),
            ScraperType::Kompas(KompasScraper::new()),
        ]
    }

    fn inner(&self) -> &dyn Scraper {
        match self {
            ScraperType::Suara(s) => s,
            ScraperType::Detik(s) => s,
            ScraperType::Kompas(s) => s,
        }
    }

    pub fn source_metadata(&self) -> SourceMetadata {
        self.inner().source_metadata()
    }

    pub fn can_handle(&self, url: &str) -> bool {
        self.inner().can_handle(url)
    }

    pub fn extract(&self, html: &str, url: &str) -> Result<Article> {
        self.inner().extract(html, url)
    }

    pub async fn scrape_article(&self, client: &Client, url: &str) -> Result<Article> {
        self.inner().scrape_article(client, url).await
    }

    pub fn cli_names(&self) -> Vec<&str> {
        self.inner().cli_names()
    }
}

/// Common utilities for scrapers
pub mod utils {
    use super::*;

    pub fn parse_url(url: &str) -> Result<Url> {
        Url::parse(url.trim()).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))
    }

    /// Host part of the URL, or None when it does not parse.
    pub fn host_of(url: &str) -> Option<String> {
        parse_url(url).ok()?.host_str().map(str::to_lowercase)
    }

    /// Asks the portal for the whole article on one page.
    pub fn with_page_all(url: &str) -> String {
        if url.contains("page=all") {
            url.to_string()
        } else if url.contains('?') {
            format!("{}&page=all", url)
        } else {
            format!("{}?page=all", url)
        }
    }

    pub async fn fetch_html(client: &Client, url: &str) -> Result<String> {
        let response = client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_url() {
        assert!(utils::parse_url("https://example.com").is_ok());
        assert!(utils::parse_url("invalid-url").is_err());
    }

    #[test]
    fn test_host_of() {
        assert_eq!(
            utils::host_of("https://News.Detik.com/berita/d-1/judul").as_deref(),
            Some("news.detik.com")
        );
        assert_eq!(utils::host_of("detik.com/berita"), None);
    }

    #[test]
    fn test_with_page_all() {
        assert_eq!(utils::with_page_all("https://a.com/x"), "https://a.com/x?page=all");
        assert_eq!(utils::with_page_all("https://a.com/x?y=1"), "https://a.com/x?y=1&page=all");
        assert_eq!(utils::with_page_all("https://a.com/x?page=all"), "https://a.com/x?page=all");
    }

    #[test]
    fn test_every_portal_handles_its_own_host() {
        let urls = [
            ("https://www.suara.com/news/2024/05/12/judul", Source::Suara),
            ("https://news.detik.com/berita/d-7000000/judul", Source::Detik),
            ("https://nasional.kompas.com/read/2024/05/12/judul", Source::Kompas),
        ];
        let scrapers = ScraperType::all();
        for (url, source) in urls {
            let matching: Vec<_> = scrapers.iter().filter(|s| s.can_handle(url)).collect();
            assert_eq!(matching.len(), 1, "{}", url);
            assert_eq!(matching[0].source_metadata().source, source);
        }
        assert!(!scrapers.iter().any(|s| s.can_handle("https://www.kapanlagi.com/x")));
    }

    #[test]
    fn test_host_pattern_ignores_path() {
        let scrapers = ScraperType::all();
        assert!(!scrapers
            .iter()
            .any(|s| s.can_handle("https://example.org/detik.com/kompas.com")));
    }

    #[tokio::test]
    async fn test_fetch_html_rejects_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = Client::new();
        let result = utils::fetch_html(&client, &format!("{}/gone", server.uri())).await;
        assert!(matches!(result, Err(Error::Http(_))));
    }

    #[tokio::test]
    async fn test_scrape_article_requests_single_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/berita/d-1/judul"))
            .and(query_param("page", "all"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body>
                    <h1 class="detail__title"> Judul Uji </h1>
                    <div class="detail__body-text itp_bodycontent"><p>Isi berita.</p></div>
                </body></html>"#,
            ))
            .mount(&server)
            .await;

        let url = format!("{}/berita/d-1/judul", server.uri());
        let scraper = ScraperType::Detik(DetikScraper::new());
        let article = scraper.scrape_article(&Client::new(), &url).await.unwrap();
        assert_eq!(article.title, "Judul Uji");
        assert_eq!(article.content, "Isi berita.");
        assert_eq!(article.url.as_deref(), Some(url.as_str()));
    }
}
