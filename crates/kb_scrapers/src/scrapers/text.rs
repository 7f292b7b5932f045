use kb_core::{Error, Result};
use scraper::{ElementRef, Html, Selector};

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Scraping(format!("Invalid selector {}: {}", css, e)))
}

/// Stripped text nodes under `element`, empties dropped, joined with
/// `separator`. Nodes inside any of `skip` (and script/style bodies) are left
/// out, which stands in for removing those subtrees from the document.
pub fn stripped_text(element: ElementRef<'_>, separator: &str, skip: &[ElementRef<'_>]) -> String {
    element
        .descendants()
        .filter(|node| {
            !std::iter::once(*node).chain(node.ancestors()).any(|n| {
                skip.iter().any(|s| s.id() == n.id())
                    || n
                        .value()
                        .as_element()
                        .map_or(false, |e| matches!(e.name(), "script" | "style"))
            })
        })
        .filter_map(|node| node.value().as_text().map(|t| t.trim().to_string()))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// True when `element` lies inside one of `skip` (or is one of them).
pub fn is_within(element: ElementRef<'_>, skip: &[ElementRef<'_>]) -> bool {
    std::iter::once(*element)
        .chain(element.ancestors())
        .any(|n| skip.iter().any(|s| s.id() == n.id()))
}

pub fn contains(element: ElementRef<'_>, child: &Selector) -> bool {
    element.select(child).next().is_some()
}

pub fn first<'a>(document: &'a Html, css: &str) -> Result<Option<ElementRef<'a>>> {
    Ok(document.select(&selector(css)?).next())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stripped_text_joins_nodes() {
        let document = Html::parse_fragment("<p>  Satu <b> dua </b>\n tiga <script>x()</script></p>");
        let p = document.select(&selector("p").unwrap()).next().unwrap();
        assert_eq!(stripped_text(p, " ", &[]), "Satu dua tiga");
        assert_eq!(stripped_text(p, "", &[]), "Satuduatiga");
    }

    #[test]
    fn test_stripped_text_skips_subtrees() {
        let document = Html::parse_fragment("<p><strong>JAKARTA</strong> Isi berita <i>foto</i></p>");
        let p = document.select(&selector("p").unwrap()).next().unwrap();
        let strong = p.select(&selector("strong").unwrap()).next().unwrap();
        let i = p.select(&selector("i").unwrap()).next().unwrap();
        assert_eq!(stripped_text(p, " ", &[strong, i]), "Isi berita");
        assert!(is_within(i, &[p]));
        assert!(!is_within(p, &[i]));
    }

    #[test]
    fn test_invalid_selector() {
        assert!(selector("p[").is_err());
    }
}
