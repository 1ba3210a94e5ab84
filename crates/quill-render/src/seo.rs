//! `sitemap.xml` and `robots.txt`.

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::date::iso_date;
use crate::error::RenderResult;

const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl ChangeFrequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

/// Public pages that always appear in the sitemap: path, priority, change frequency.
pub const STATIC_PAGES: &[(&str, &str, ChangeFrequency)] = &[
    ("/", "1.0", ChangeFrequency::Weekly),
    ("/about", "0.8", ChangeFrequency::Monthly),
    ("/contact", "0.8", ChangeFrequency::Monthly),
    ("/case-studies", "0.8", ChangeFrequency::Weekly),
    ("/blogs", "0.9", ChangeFrequency::Daily),
    ("/ghostwriting", "0.7", ChangeFrequency::Monthly),
    ("/linkedin-branding", "0.7", ChangeFrequency::Monthly),
    ("/content-writing", "0.7", ChangeFrequency::Monthly),
    ("/performance-marketing", "0.7", ChangeFrequency::Monthly),
    ("/website-development", "0.7", ChangeFrequency::Monthly),
    ("/seo", "0.7", ChangeFrequency::Monthly),
    ("/cancellation-and-refund-policy", "0.3", ChangeFrequency::Yearly),
    ("/terms-of-service", "0.3", ChangeFrequency::Yearly),
    ("/privacy-policy", "0.3", ChangeFrequency::Yearly),
];

/// Paths kept out of crawlers' reach.
const DISALLOWED_PATHS: &[&str] = &[
    "/admin/",
    "/admin-homepage",
    "/admin-users",
    "/admin-blogs",
    "/admin-case-studies",
    "/admin-pdf-downloads",
    "/api/",
    "/login",
    "/ghostwriting-landing",
    "/lp/book-v1",
    "/lp/linkedin-v1",
];

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    /// Path below the site origin, starting with `/`.
    pub path: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: &'static str,
}

impl SitemapEntry {
    #[must_use]
    pub fn new(
        path: impl Into<String>,
        last_modified: DateTime<Utc>,
        change_frequency: ChangeFrequency,
        priority: &'static str,
    ) -> Self {
        Self {
            path: path.into(),
            last_modified,
            change_frequency,
            priority,
        }
    }
}

/// Entries for [`STATIC_PAGES`], all last modified `now`.
#[must_use]
pub fn static_entries(now: DateTime<Utc>) -> Vec<SitemapEntry> {
    STATIC_PAGES
        .iter()
        .map(|(path, priority, frequency)| SitemapEntry::new(*path, now, *frequency, *priority))
        .collect()
}

/// Serializes a sitemap.
///
/// ## Summary
/// Writes a `urlset` document with one `url` element per entry, each `loc`
/// being `origin` followed by the entry path.
///
/// ## Errors
/// Returns an error if XML writing fails or the output is not valid UTF-8.
pub fn render_sitemap(origin: &str, entries: &[SitemapEntry]) -> RenderResult<String> {
    let origin = origin.trim_end_matches('/');
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NAMESPACE));
    writer.write_event(Event::Start(urlset))?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        write_text_element(&mut writer, "loc", &format!("{origin}{}", entry.path))?;
        write_text_element(&mut writer, "lastmod", &iso_date(entry.last_modified))?;
        write_text_element(&mut writer, "changefreq", entry.change_frequency.as_str())?;
        write_text_element(&mut writer, "priority", entry.priority)?;
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    Ok(String::from_utf8(writer.into_inner())?)
}

/// Writes a simple text element.
fn write_text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Renders `robots.txt`, pointing crawlers at the sitemap under `origin`.
#[must_use]
pub fn render_robots(origin: &str) -> String {
    let origin = origin.trim_end_matches('/');
    let mut robots = String::from("User-agent: *\nAllow: /\n\n");
    for path in DISALLOWED_PATHS {
        robots.push_str("Disallow: ");
        robots.push_str(path);
        robots.push('\n');
    }
    robots.push_str("\nSitemap: ");
    robots.push_str(origin);
    robots.push_str("/sitemap.xml\n");
    robots
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn sitemap_shape() {
        let mut entries = static_entries(now());
        entries.push(SitemapEntry::new(
            "/blog/tips-&-tricks",
            now(),
            ChangeFrequency::Weekly,
            "0.6",
        ));

        let xml = render_sitemap("https://example.com/", &entries).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(xml.contains(
            "<url><loc>https://example.com/</loc><lastmod>2025-06-01</lastmod><changefreq>weekly</changefreq><priority>1.0</priority></url>"
        ));
        assert!(xml.contains("<loc>https://example.com/blog/tips-&amp;-tricks</loc>"));
        assert_eq!(xml.matches("<url>").count(), STATIC_PAGES.len() + 1);
        assert!(xml.ends_with("</urlset>"));
    }

    #[test]
    fn empty_sitemap_is_valid() {
        let xml = render_sitemap("https://example.com", &[]).unwrap();
        assert!(xml.contains("<urlset"));
        assert!(!xml.contains("<url>"));
    }

    #[test]
    fn robots_points_to_sitemap() {
        let robots = render_robots("https://example.com/");

        assert!(robots.starts_with("User-agent: *\nAllow: /\n"));
        assert!(robots.contains("Disallow: /api/\n"));
        assert!(robots.contains("Disallow: /admin/\n"));
        assert!(robots.ends_with("Sitemap: https://example.com/sitemap.xml\n"));
    }
}
