use lazy_static::lazy_static;
use regex::{Captures, Regex};

const MONTHS: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus", "September",
    "Oktober", "November", "Desember",
];

lazy_static! {
    static ref FULL_DATE: Regex = Regex::new(r"\((\d{1,2})/(\d{1,2})/(\d{4})\)").unwrap();
    static ref SHORT_DATE: Regex = Regex::new(r"\((\d{1,2})/(\d{1,2})\)").unwrap();
}

/// Indonesian name of a 1-based month number.
pub fn month_name(month: &str) -> Option<&'static str> {
    let index: usize = month.parse().ok()?;
    index.checked_sub(1).and_then(|i| MONTHS.get(i)).copied()
}

/// Rewrites `(d/m/yyyy)` and `(d/m)` into long form. Matches with an
/// impossible month are kept as written.
pub fn format_dates(text: &str) -> String {
    let text = FULL_DATE.replace_all(text, |caps: &Captures| match month_name(&caps[2]) {
        Some(month) => format!("{} {} {}", &caps[1], month, &caps[3]),
        None => caps[0].to_string(),
    });
    SHORT_DATE
        .replace_all(&text, |caps: &Captures| match month_name(&caps[2]) {
            Some(month) => format!("{} {}", &caps[1], month),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_name() {
        assert_eq!(month_name("1"), Some("Januari"));
        assert_eq!(month_name("05"), Some("Mei"));
        assert_eq!(month_name("12"), Some("Desember"));
        assert_eq!(month_name("0"), None);
        assert_eq!(month_name("13"), None);
    }

    #[test]
    fn test_format_dates() {
        assert_eq!(format_dates("(12/5/2024)"), "12 Mei 2024");
        assert_eq!(format_dates("(3/11)"), "3 November");
        assert_eq!(format_dates("(03/01/2023) dan (7/8)"), "03 Januari 2023 dan 7 Agustus");
    }

    #[test]
    fn test_impossible_month_is_untouched() {
        assert_eq!(format_dates("(12/13/2024) (1/0)"), "(12/13/2024) (1/0)");
    }
}
