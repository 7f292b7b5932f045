use async_trait::async_trait;
use kb_core::{Article, Result, Source};
use scraper::{ElementRef, Html};

use super::{MISSING_CONTENT, MISSING_TITLE};
use crate::scrapers::text::{contains, first, selector, stripped_text};
use crate::scrapers::{Scraper, SourceMetadata};

#[derive(Debug, Clone, Default)]
pub struct SuaraScraper;

impl SuaraScraper {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Scraper for SuaraScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "Suara",
            emoji: "🔴",
            source: Source::Suara,
            host_pattern: "suara.com",
        }
    }

    fn cli_names(&self) -> Vec<&str> {
        vec!["suara"]
    }

    fn extract(&self, html: &str, url: &str) -> Result<Article> {
        let document = Html::parse_document(html);

        let title = match first(&document, "div.info")? {
            Some(info) => info
                .select(&selector("h1")?)
                .next()
                .map(|h1| stripped_text(h1, "", &[])),
            None => None,
        }
        .unwrap_or_else(|| MISSING_TITLE.to_string());

        let content = match first(&document, "article.detail-content.detail-berita.live-report2")? {
            Some(body) => {
                let paragraph = selector("p")?;

                // A leading <strong> carries the dateline.
                let dateline: Vec<ElementRef> = body
                    .select(&paragraph)
                    .next()
                    .and_then(|p| p.first_child())
                    .and_then(ElementRef::wrap)
                    .filter(|el| el.value().name() == "strong")
                    .into_iter()
                    .collect();

                let mut paragraphs: Vec<ElementRef> = body.select(&paragraph).collect();
                let italic = selector("i")?;
                if paragraphs.last().map_or(false, |p| contains(*p, &italic)) {
                    paragraphs.pop();
                }

                paragraphs
                    .into_iter()
                    .map(|p| stripped_text(p, "", &dateline))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            None => MISSING_CONTENT.to_string(),
        };

        Ok(Article::new(title, content, Source::Suara).with_url(url))
    }
}
