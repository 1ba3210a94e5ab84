//! Portfolio listing: case study cards and the `/case-studies` page.

use quill_core::categories::CategoryTable;
use quill_core::types::ContentKind;
use serde_json::Value;

use crate::doc;
use crate::escape::{escape_attr, escape_html};
use crate::sanitize::clean_text;
use crate::template::{PageKind, PageTemplates, fill, placeholder};

const DEFAULT_IMAGE: &str = "/images/Frame1.jpg";

/// A published case study as shown in a listing.
#[derive(Debug, Clone, Copy)]
pub struct CaseStudyCard<'a> {
    pub slug: &'a str,
    pub preview: &'a Value,
    pub category: Option<&'a str>,
}

/// ## Summary
/// Renders one card. Cards alternate between the light and dark styles by
/// position, starting light at even indexes.
#[must_use]
pub fn render_card(categories: &CategoryTable, card: &CaseStudyCard<'_>, index: usize) -> String {
    let image_url = doc::text_or(card.preview, "imageUrl", DEFAULT_IMAGE);
    let image_alt = doc::text_or(card.preview, "imageAlt", "Case Study");
    let title = doc::text_or(card.preview, "blogTitle", "Untitled Case Study");
    let text = doc::text(card.preview, "text").map(clean_text).unwrap_or_default();

    let badge = card
        .category
        .filter(|c| !c.trim().is_empty())
        .map(|c| {
            format!(
                r#"<span class="case-study-badge">{}</span>"#,
                escape_html(&categories.display_name(c))
            )
        })
        .unwrap_or_default();

    let snapshots = doc::text_list(card.preview, "projectSnapshots")
        .into_iter()
        .map(clean_text)
        .filter(|s| !s.is_empty())
        .map(|s| format!("<li style='margin: 5px 0;'>{s}</li>"))
        .collect::<String>();
    let snapshots = if snapshots.is_empty() {
        String::new()
    } else {
        format!(
            r#"
                        <div class="case-study-description">
                            <ul style='margin: 10px 0; padding-left: 20px;'>{snapshots}</ul>
                        </div>"#
        )
    };

    let card_class = if index % 2 == 0 {
        "case-study-card-light"
    } else {
        "dark"
    };

    format!(
        r#"
                <div class="case-study-card {card_class}">
                    <div class="case-study-image">
                        <img src="{image_url}" alt="{image_alt}">
                    </div>
                    <div class="case-study-content">
                        {badge}
                        <h3 class="case-study-title">{title}</h3>
                        <p class="case-study-description">
                            {text}
                        </p>{snapshots}
                        <a href="{href}" class="read-more-link">Read More</a>
                    </div>
                </div>
"#,
        image_url = escape_attr(image_url),
        image_alt = escape_attr(image_alt),
        title = escape_html(title),
        href = escape_attr(&ContentKind::CaseStudy.public_path(card.slug)),
    )
}

/// Renders consecutive cards, numbering them from `start_index` so paging
/// keeps the alternation.
#[must_use]
pub fn render_cards(categories: &CategoryTable, cards: &[CaseStudyCard<'_>], start_index: usize) -> String {
    cards
        .iter()
        .enumerate()
        .map(|(offset, card)| render_card(categories, card, start_index + offset))
        .collect()
}

/// Number of pages needed for `total_count` items.
#[must_use]
pub const fn total_pages(total_count: i64, per_page: i64) -> i64 {
    if per_page <= 0 || total_count <= 0 {
        return 0;
    }
    (total_count + per_page - 1) / per_page
}

/// ## Summary
/// Renders the `/case-studies` page with its first page of cards. The page
/// count and active category are written as hidden spans for the client-side
/// pager.
#[must_use]
pub fn render_portfolio_page(
    templates: &PageTemplates,
    categories: &CategoryTable,
    cards: &[CaseStudyCard<'_>],
    total_pages: i64,
    current_category: Option<&str>,
) -> String {
    let cards = render_cards(categories, cards, 0);
    let pagination = format!(r#"<span style="display:none" id="totalPages">{total_pages}</span>"#);
    let category = format!(
        r#"<span style="display:none" id="currentCategory">{}</span>"#,
        escape_html(current_category.unwrap_or_default())
    );

    fill(
        templates.get(PageKind::Portfolio),
        &[
            (placeholder::CASE_STUDIES, &cards),
            (placeholder::PAGINATION, &pagination),
            (placeholder::CATEGORY_FILTER, &category),
        ],
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn cards_alternate_light_and_dark() {
        let preview = json!({"blogTitle": "Card"});
        let cards = [
            CaseStudyCard { slug: "a", preview: &preview, category: None },
            CaseStudyCard { slug: "b", preview: &preview, category: None },
            CaseStudyCard { slug: "c", preview: &preview, category: None },
        ];

        let html = render_cards(&CategoryTable::default(), &cards, 0);
        assert_eq!(html.matches("case-study-card case-study-card-light").count(), 2);
        assert_eq!(html.matches("case-study-card dark").count(), 1);

        let shifted = render_cards(&CategoryTable::default(), &cards, 1);
        assert_eq!(shifted.matches("case-study-card dark").count(), 2);
    }

    #[test]
    fn card_content() {
        let preview = json!({
            "blogTitle": "Acme & Co",
            "text": "<p>We <b>grew</b> reach</p>",
            "imageUrl": "https://cdn.example.com/a.jpg",
            "projectSnapshots": ["<b>3x</b> followers", "", "12 posts"]
        });
        let card = CaseStudyCard {
            slug: "acme-co",
            preview: &preview,
            category: Some("performance marketing"),
        };
        let html = render_card(&CategoryTable::default(), &card, 0);

        assert!(html.contains(r#"<h3 class="case-study-title">Acme &amp; Co</h3>"#));
        assert!(html.contains("We grew reach"));
        assert!(html.contains(r#"<span class="case-study-badge">Performance Marketing</span>"#));
        assert!(html.contains("<li style='margin: 5px 0;'>3x followers</li>"));
        assert_eq!(html.matches("<li").count(), 2);
        assert!(html.contains(r#"href="/case-study/acme-co""#));
        assert!(html.contains(r#"src="https://cdn.example.com/a.jpg""#));
    }

    #[test]
    fn card_defaults() {
        let preview = json!({});
        let card = CaseStudyCard { slug: "x", preview: &preview, category: Some("") };
        let html = render_card(&CategoryTable::default(), &card, 1);

        assert!(html.contains("Untitled Case Study"));
        assert!(html.contains(DEFAULT_IMAGE));
        assert!(!html.contains("case-study-badge"));
        assert!(!html.contains("<ul"));
    }

    #[test]
    fn page_counts() {
        assert_eq!(total_pages(0, 4), 0);
        assert_eq!(total_pages(4, 4), 1);
        assert_eq!(total_pages(5, 4), 2);
        assert_eq!(total_pages(9, 0), 0);
    }

    #[test]
    fn page_hidden_spans() {
        let html = render_portfolio_page(
            &PageTemplates::default(),
            &CategoryTable::default(),
            &[],
            3,
            Some("ghostwriting\"><script>"),
        );

        assert!(html.contains(r#"<span style="display:none" id="totalPages">3</span>"#));
        assert!(html.contains(r#"id="currentCategory">ghostwriting&quot;&gt;&lt;script&gt;</span>"#));
        assert!(!html.contains(placeholder::CASE_STUDIES));
    }
}
