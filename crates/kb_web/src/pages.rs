//! Server-rendered HTML for the four pages of the UI.

use std::f64::consts::PI;
use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};
use kb_core::Analysis;

use crate::datasets::LabelDistribution;

pub const APP_TITLE: &str = "Klasifikasi Berita";
pub const PAGE_HEADING: &str = "KLASIFIKASI<br>JUDUL DAN BERITA ONLINE";

pub const MSG_NO_DATA: &str = "Data belum tersedia untuk diproses";
pub const MSG_NO_URL: &str = "Data belum tersedia untuk diproses.";
pub const MSG_SCRAPE_FAILED: &str = "Gagal melakukan scraping. Pastikan URL valid dan didukung.";

/// Outer and inner radius of a donut chart; the hole is 30% of the radius.
const CHART_RADIUS: f64 = 50.0;
const CHART_HOLE: f64 = 0.3;

const STYLE: &str = "\
body{font-family:sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem;color:#222}\
h1,h4,h5{text-align:center}\
.charts{display:grid;grid-template-columns:repeat(auto-fit,minmax(200px,1fr));gap:1rem}\
.chart{text-align:center}.chart ul{list-style:none;padding:0;font-size:.9rem}\
.swatch{display:inline-block;width:.8em;height:.8em;margin-right:.4em}\
.nav{display:flex;flex-direction:column;align-items:center;gap:.5rem;margin-top:2rem}\
.nav a,.nav button{min-width:240px;padding:.5rem;text-align:center}\
form{display:flex;flex-direction:column;gap:.5rem}\
input,textarea{padding:.5rem}textarea{min-height:12rem}\
.error{color:red}.summary{text-align:justify}";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"id\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        encode_text(title),
        STYLE,
        body
    )
}

fn error_line(message: Option<&str>) -> String {
    message
        .map(|m| format!("<p class=\"error\">{}</p>", encode_text(m)))
        .unwrap_or_default()
}

/// Donut chart of one dataset as inline SVG, one dashed circle per label.
pub fn donut_chart(distribution: &LabelDistribution) -> String {
    let total = distribution.total();
    let ring = CHART_RADIUS * (1.0 - CHART_HOLE);
    let mid = CHART_RADIUS - ring / 2.0;
    let circumference = 2.0 * PI * mid;

    let mut svg = format!(
        "<svg viewBox=\"-60 -60 120 120\" width=\"200\" height=\"200\" role=\"img\" \
         aria-label=\"Distribusi Label - Portal {}\"><g transform=\"rotate(-90)\">",
        encode_double_quoted_attribute(&distribution.portal)
    );
    let mut legend = String::from("<ul>");
    let mut offset = 0.0;
    for (label, count) in &distribution.counts {
        let share = if total == 0 {
            0.0
        } else {
            *count as f64 / total as f64
        };
        let length = share * circumference;
        let _ = write!(
            svg,
            "<circle r=\"{:.3}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.3}\" \
             stroke-dasharray=\"{:.3} {:.3}\" stroke-dashoffset=\"{:.3}\"/>",
            mid,
            label.color(),
            ring,
            length,
            circumference - length,
            -offset
        );
        offset += length;
        let _ = write!(
            legend,
            "<li><span class=\"swatch\" style=\"background:{}\"></span>{} {} ({:.1}%)</li>",
            label.color(),
            label,
            count,
            share * 100.0
        );
    }
    svg.push_str("</g></svg>");
    legend.push_str("</ul>");

    format!(
        "<div class=\"chart\"><p>Distribusi Label - Portal {}</p>{}{}</div>",
        encode_text(&distribution.portal),
        svg,
        legend
    )
}

pub fn landing_page(datasets: &[LabelDistribution]) -> String {
    let charts: String = datasets.iter().map(donut_chart).collect();
    let body = format!(
        "<h1>{} 📰</h1>\n\
         <p>Selamat datang di aplikasi Klasifikasi Berita! \
         Aplikasi ini dirancang untuk membantu Anda menganalisis dan mengklasifikasikan \
         berita berdasarkan kategori tertentu.</p>\n\
         <div class=\"charts\">{}</div>\n\
         <div class=\"nav\"><a href=\"/link\">Input dengan Link</a>\
         <a href=\"/content\">Input dengan Konten</a></div>",
        APP_TITLE, charts
    );
    layout(&format!("Landing Page - {}", APP_TITLE), &body)
}

pub fn link_page(url: &str, message: Option<&str>) -> String {
    let body = format!(
        "<h1>{}</h1>\n<h4>Link:</h4>\n\
         <form method=\"post\" action=\"/link\">\
         <label for=\"url\">Masukkan URL berita dari Detik/Kompas/Suara:</label>\
         <input id=\"url\" name=\"url\" type=\"text\" value=\"{}\" \
         placeholder=\"Link support portal berita detik.com, kompas.com dan suara.com\">\
         {}<button type=\"submit\">Proses</button></form>\n\
         <div class=\"nav\"><a href=\"/content\">Input Using Judul dan Konten</a></div>",
        PAGE_HEADING,
        encode_double_quoted_attribute(url),
        error_line(message)
    );
    layout("Klasifikasi Judul dan Berita Online", &body)
}

pub fn content_page(title: &str, content: &str, message: Option<&str>) -> String {
    let body = format!(
        "<h1>{}</h1>\n<form method=\"post\" action=\"/content\">\
         <h4>Judul:</h4><input name=\"title\" type=\"text\" placeholder=\"Judul\" value=\"{}\">\
         <h4>Konten:</h4><textarea name=\"content\" placeholder=\"Konten\">{}</textarea>\
         {}<button type=\"submit\">Proses</button></form>\n\
         <div class=\"nav\"><a href=\"/link\">Input Using Link</a></div>",
        PAGE_HEADING,
        encode_double_quoted_attribute(title),
        encode_text(content),
        error_line(message)
    );
    layout("Klasifikasi Judul dan Berita Online", &body)
}

const RESULT_NAV: &str = "<div class=\"nav\"><a href=\"/link\">🔗 Input dengan Link</a>\
                          <a href=\"/content\">✍️ Input dengan Konten</a></div>";

pub fn result_page(analysis: &Analysis) -> String {
    let body = format!(
        "<h1>{}</h1>\n\
         <h4>Hasil Klasifikasi</h4><h5>{}</h5>\n\
         <h4>Tingkat Confidence</h4><h5>{:.3}</h5>\n\
         <h4>Judul Berita</h4><div class=\"summary\">{}</div>\n\
         <h4>Isi Ringkasan</h4><div class=\"summary\">{}</div>\n{}",
        PAGE_HEADING,
        analysis.classification.label,
        analysis.classification.confidence,
        encode_text(&analysis.summary.title),
        encode_text(&analysis.summary.content),
        RESULT_NAV
    );
    layout("Klasifikasi Judul dan Berita Online", &body)
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        "<h1>{}</h1>\n<p class=\"error\">Klasifikasi gagal: {}</p>\n{}",
        PAGE_HEADING,
        encode_text(message),
        RESULT_NAV
    );
    layout("Klasifikasi Judul dan Berita Online", &body)
}
