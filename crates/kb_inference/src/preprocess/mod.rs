//! Source-aware cleanup applied to titles and contents before summarizing.

use kb_core::Source;
use lazy_static::lazy_static;
use regex::Regex;

mod dates;

pub use dates::{format_dates, month_name};

lazy_static! {
    static ref KOMPAS_DATELINE: Regex = Regex::new(r"^[A-Z\s]+,\s*KOMPAS\.com\s*[-–]?\s*").unwrap();
    static ref KOMPAS_LEAD_IN: Regex = Regex::new(r"KOMPAS\.com\s*[-–]?\s*").unwrap();
    static ref SUARA_LEAD_IN: Regex = Regex::new(r"Suara\.com\s*[-–]?\s*").unwrap();
    static ref READ_ALSO: Regex = Regex::new(r"Baca juga:[^\n]*").unwrap();
    static ref READ_ALSO_LINE: Regex = Regex::new(r"\nBaca Juga:[^\n]*\n?").unwrap();
    static ref ADVERTISEMENT: Regex =
        Regex::new(r"(?s)ADVERTISEMENT\s+.*?SCROLL TO CONTINUE WITH CONTENT").unwrap();
    static ref VIDEO_EMBED: Regex = Regex::new(r"\[Gambas:.*?\]").unwrap();
    static ref SEE_ALSO_VIDEO: Regex = Regex::new(r"(?s)Lihat juga Video.*?:\s*.*?(\n|$)").unwrap();
    static ref OUTSIDE_WHITELIST: Regex = Regex::new(r#"[^a-zA-Z0-9\s.,"'/?!]"#).unwrap();
}

/// Full cleanup of one field, repeated until the text is stable.
///
/// Only the first pass can grow the text (date rewriting needs parentheses,
/// which the whitelist removes), so every later pass either shortens it or
/// leaves it unchanged and the loop terminates.
pub fn normalize(text: &str, source: Source) -> String {
    let mut current = normalize_once(text, source);
    loop {
        let next = normalize_once(&current, source);
        if next == current {
            return current;
        }
        current = next;
    }
}

pub fn normalize_once(text: &str, source: Source) -> String {
    clean_text(&format_dates(&remove_opening_sentences(text, source)))
}

/// Strips the portal's dateline/lead-in phrases.
pub fn remove_opening_sentences(text: &str, source: Source) -> String {
    match source {
        Source::Kompas => strip_kompas(text),
        Source::Suara => strip_suara(text),
        Source::Manual => strip_suara(&strip_kompas(text)),
        Source::Detik => text.to_string(),
    }
}

fn strip_kompas(text: &str) -> String {
    let text = KOMPAS_DATELINE.replace(text, "");
    KOMPAS_LEAD_IN.replace_all(&text, "").into_owned()
}

fn strip_suara(text: &str) -> String {
    SUARA_LEAD_IN.replace_all(text, "").into_owned()
}

/// Removes boilerplate blocks, then every character outside the whitelist,
/// then folds line breaks into spaces.
pub fn clean_text(text: &str) -> String {
    let text = READ_ALSO.replace_all(text, "");
    let text = READ_ALSO_LINE.replace_all(&text, "");
    let text = ADVERTISEMENT.replace_all(&text, "");
    let text = VIDEO_EMBED.replace_all(&text, "");
    let text = SEE_ALSO_VIDEO.replace_all(&text, "");
    let text = OUTSIDE_WHITELIST.replace_all(&text, "");
    text.replace('\n', " ")
}
