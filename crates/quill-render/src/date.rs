//! Date formatting for rendered pages.

use chrono::{DateTime, Utc};

/// `March 05, 2025`
#[must_use]
pub fn long_date(date: DateTime<Utc>) -> String {
    date.format("%B %d, %Y").to_string()
}

/// `Mar 05, 2025`, used on blog cards.
#[must_use]
pub fn short_date(date: DateTime<Utc>) -> String {
    date.format("%b %d, %Y").to_string()
}

/// `2025-03-05`, used in `<time datetime>` attributes, JSON-LD and the sitemap.
#[must_use]
pub fn iso_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn formats() {
        let date = Utc.with_ymd_and_hms(2025, 3, 5, 14, 30, 0).unwrap();

        assert_eq!(long_date(date), "March 05, 2025");
        assert_eq!(short_date(date), "Mar 05, 2025");
        assert_eq!(iso_date(date), "2025-03-05");
    }
}
