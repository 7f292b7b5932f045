use async_trait::async_trait;
use kb_core::{Article, Result, Source};
use scraper::Html;

use super::{MISSING_CONTENT, MISSING_TITLE};
use crate::scrapers::text::{first, is_within, selector, stripped_text};
use crate::scrapers::{Scraper, SourceMetadata};

#[derive(Debug, Clone, Default)]
pub struct KompasScraper;

impl KompasScraper {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Scraper for KompasScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "Kompas",
            emoji: "🟠",
            source: Source::Kompas,
            host_pattern: "kompas.com",
        }
    }

    fn cli_names(&self) -> Vec<&str> {
        vec!["kompas"]
    }

    fn extract(&self, html: &str, url: &str) -> Result<Article> {
        let document = Html::parse_document(html);

        let title = first(&document, "h1.read__title")?
            .map(|el| stripped_text(el, "", &[]))
            .unwrap_or_else(|| MISSING_TITLE.to_string());

        let content = match first(&document, "div.read__content")? {
            Some(body) => {
                // The last italic block holds the related-article teaser.
                let teaser: Vec<_> = body.select(&selector("i")?).last().into_iter().collect();
                body.select(&selector("p")?)
                    .filter(|p| !is_within(*p, &teaser))
                    .map(|p| stripped_text(p, "", &teaser))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            None => MISSING_CONTENT.to_string(),
        };

        Ok(Article::new(title, content, Source::Kompas).with_url(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_handle() {
        let scraper = KompasScraper::new();
        assert!(scraper.can_handle("https://nasional.kompas.com/read/2024/05/12/judul"));
        assert!(!scraper.can_handle("https://www.suara.com/news/x"));
    }

    #[test]
    fn test_extract_drops_last_italic() {
        let page = r#"<html><body>
            <h1 class="read__title">Harga BBM Turun</h1>
            <div class="read__content">
              <p>JAKARTA, KOMPAS.com - Harga BBM turun.</p>
              <p>Kata <i>menteri</i> energi.</p>
              <p><i>Baca juga: Berita lain</i></p>
            </div>
        </body></html>"#;

        let article = KompasScraper::new().extract(page, "https://kompas.com/read/1").unwrap();
        assert_eq!(article.title, "Harga BBM Turun");
        assert_eq!(
            article.content,
            "JAKARTA, KOMPAS.com - Harga BBM turun.\nKatamenterienergi.\n"
        );
        assert_eq!(article.source, Source::Kompas);
    }

    #[test]
    fn test_extract_falls_back_to_placeholders() {
        let article = KompasScraper::new()
            .extract("<html><body><p>kosong</p></body></html>", "https://kompas.com/read/2")
            .unwrap();
        assert_eq!(article.title, MISSING_TITLE);
        assert_eq!(article.content, MISSING_CONTENT);
    }
}
