pub mod detik;
pub mod kompas;
pub mod suara;

pub use detik::DetikScraper;
pub use kompas::KompasScraper;
pub use suara::SuaraScraper;

/// Shown when a portal page lacks the title node.
pub const MISSING_TITLE: &str = "Judul tidak ditemukan";
/// Shown when a portal page lacks the article body node.
pub const MISSING_CONTENT: &str = "Konten tidak ditemukan";
