use async_trait::async_trait;
use kb_core::{Article, Error, Result, Source};
use scraper::Html;

use crate::scrapers::text::{contains, first, selector, stripped_text};
use crate::scrapers::{Scraper, SourceMetadata};

#[derive(Debug, Clone, Default)]
pub struct DetikScraper;

impl DetikScraper {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Scraper for DetikScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "Detik",
            emoji: "🔵",
            source: Source::Detik,
            host_pattern: "detik.com",
        }
    }

    fn cli_names(&self) -> Vec<&str> {
        vec!["detik"]
    }

    fn extract(&self, html: &str, url: &str) -> Result<Article> {
        let document = Html::parse_document(html);

        // Detik has no fallback title: a page without one is not an article.
        let title = first(&document, "h1.detail__title")?
            .map(|el| stripped_text(el, "", &[]))
            .ok_or_else(|| Error::Scraping(format!("No detail__title found at {}", url)))?;

        let italic = selector("i")?;
        let content = document
            .select(&selector("div.detail__body-text.itp_bodycontent > p")?)
            .filter(|p| !contains(*p, &italic))
            .map(|p| stripped_text(p, " ", &[]))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Article::new(title, content, Source::Detik).with_url(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <h1 class="detail__title">
             Harga Beras Naik  di Pasar Induk
          </h1>
          <div class="detail__body-text itp_bodycontent">
            <p><strong>Jakarta</strong> - Harga beras  naik pada (12/5/2024).</p>
            <p>Pedagang mengeluh. <i>Baca juga: Harga cabai</i></p>
            <div><p>Paragraf bersarang diabaikan.</p></div>
            <p>Pemerintah akan <b>menggelar</b> operasi pasar.</p>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_can_handle() {
        let scraper = DetikScraper::new();
        assert!(scraper.can_handle("https://news.detik.com/berita/d-7000000/judul"));
        assert!(scraper.can_handle("https://finance.detik.com/x?y=1"));
        assert!(!scraper.can_handle("https://www.kompas.com/read/x"));
    }

    #[test]
    fn test_extract() {
        let article = DetikScraper::new()
            .extract(PAGE, "https://news.detik.com/berita/d-1/harga")
            .unwrap();
        assert_eq!(article.title, "Harga Beras Naik  di Pasar Induk");
        assert_eq!(
            article.content,
            "Jakarta - Harga beras  naik pada (12/5/2024).\nPemerintah akan menggelar operasi pasar."
        );
        assert_eq!(article.source, Source::Detik);
    }

    #[test]
    fn test_missing_title_is_a_failure() {
        let result = DetikScraper::new().extract("<html><body><p>x</p></body></html>", "https://detik.com/x");
        assert!(matches!(result, Err(Error::Scraping(_))));
    }
}
