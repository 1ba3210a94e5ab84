//! Home page: the featured case study and the editor's choice blogs.

use quill_core::types::ContentKind;

use crate::blog::{BlogView, render_cards};
use crate::doc;
use crate::escape::{escape_attr, escape_html, escape_js_string};
use crate::portfolio::CaseStudyCard;
use crate::sanitize::sanitize_rich_text;
use crate::template::{PageKind, PageTemplates, fill, placeholder};

const DEFAULT_IMAGE: &str = "/images/Man-with-bulb.svg";
const DEFAULT_TITLE: &str = "Discover Our Latest Success Story";

/// ## Summary
/// Renders the home page. Without a featured case study the case study
/// placeholders are cleared and the default image is used.
#[must_use]
pub fn render_home_page(
    templates: &PageTemplates,
    featured: Option<&CaseStudyCard<'_>>,
    blogs: &[BlogView<'_>],
) -> String {
    let (title, summary, read_more, image_url) = featured.map_or_else(
        || {
            (
                String::new(),
                String::new(),
                String::new(),
                DEFAULT_IMAGE.to_string(),
            )
        },
        render_featured,
    );
    let insights = render_cards(blogs);

    fill(
        templates.get(PageKind::Home),
        &[
            (placeholder::HOME_BLOGS, &insights),
            (placeholder::HOME_CASE_STUDY_TITLE, &title),
            (placeholder::HOME_CASE_STUDY_SUMMARY, &summary),
            (placeholder::HOME_READ_MORE, &read_more),
            (placeholder::HOME_IMAGE_URL, &image_url),
        ],
    )
}

/// Title, snapshot list, read-more button and image URL of the featured case study.
fn render_featured(card: &CaseStudyCard<'_>) -> (String, String, String, String) {
    let title = doc::text_or(card.preview, "blogTitle", DEFAULT_TITLE);
    let image_url = doc::text_or(card.preview, "imageUrl", DEFAULT_IMAGE);

    let points = doc::text_list(card.preview, "projectSnapshots")
        .into_iter()
        .map(sanitize_rich_text)
        .filter(|point| !point.is_empty())
        .map(|point| format!("<li>{point}</li>"))
        .collect::<String>();

    let href = ContentKind::CaseStudy.public_path(card.slug);
    let read_more = format!(
        r#"<button class="read-more-btn" onclick="{}">Read more</button>"#,
        escape_attr(&format!("window.location.href='{}'", escape_js_string(&href)))
    );

    (
        format!("<h2>{}</h2>", escape_html(title)),
        format!("<ul>{points}</ul>"),
        read_more,
        escape_attr(image_url),
    )
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;

    #[test]
    fn featured_case_study() {
        let preview = json!({
            "blogTitle": "Acme",
            "imageUrl": "https://cdn.example.com/acme.png",
            "projectSnapshots": ["<b>3x</b> reach", "Launched in 6 weeks"]
        });
        let card = CaseStudyCard {
            slug: "acme",
            preview: &preview,
            category: None,
        };
        let html = render_home_page(&PageTemplates::default(), Some(&card), &[]);

        assert!(html.contains("<h2>Acme</h2>"));
        assert!(html.contains("<ul><li><strong>3x</strong> reach</li><li>Launched in 6 weeks</li></ul>"));
        assert!(html.contains(r#"onclick="window.location.href=&#39;/case-study/acme&#39;""#));
        assert!(html.contains(r#"src="https://cdn.example.com/acme.png""#));
        assert!(!html.contains(placeholder::HOME_READ_MORE));
    }

    #[test]
    fn no_featured_case_study() {
        let blog = json!({"blogTitle": "Insight"});
        let blogs = [BlogView {
            slug: "insight",
            content: &blog,
            date: Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
        }];
        let html = render_home_page(&PageTemplates::default(), None, &blogs);

        assert!(html.contains(DEFAULT_IMAGE));
        assert!(!html.contains(placeholder::HOME_CASE_STUDY_TITLE));
        assert!(!html.contains("read-more-btn"));
        assert!(html.contains(r#"href="/blog/insight""#));
    }
}
