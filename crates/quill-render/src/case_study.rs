//! Case study page.
//!
//! The page is assembled from fixed sections in reading order: article
//! header, summary, PDF viewer, vision, process, story, result and impact.
//! Sections whose content is empty are omitted.

use chrono::{DateTime, Utc};
use quill_core::categories::CategoryTable;
use quill_core::constants::CASE_STUDY_CONTENT_TYPE;
use serde_json::Value;

use crate::date::{iso_date, long_date};
use crate::doc;
use crate::escape::{escape_attr, escape_html, json_ld_string};
use crate::flipbook::render_flipbook;
use crate::sanitize::sanitize_rich_text;
use crate::template::{PageKind, PageTemplates, fill, placeholder};

const DEFAULT_IMAGE: &str = "/images/case-study-default.jpg";

const BREADCRUMB_ARROW: &str = r#"<svg class="breadcrumb-arrow" width="16" height="16" fill="none" stroke="currentColor" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M9 5l7 7-7 7"></path></svg>"#;

/// A stored case study as seen by the renderer.
#[derive(Debug, Clone, Copy)]
pub struct CaseStudyView<'a> {
    pub content: &'a Value,
    pub preview: &'a Value,
    pub category: Option<&'a str>,
    pub pdf_url: Option<&'a str>,
    pub date: DateTime<Utc>,
}

impl CaseStudyView<'_> {
    fn structured(&self) -> &Value {
        self.content.get("structuredContent").unwrap_or(&Value::Null)
    }
}

/// ## Summary
/// Renders the full case study page into the `case_study.html` shell.
#[must_use]
pub fn render_case_study_page(
    templates: &PageTemplates,
    categories: &CategoryTable,
    view: &CaseStudyView<'_>,
) -> String {
    let head = render_head(view);
    let body = render_case_study_body(categories, view);

    fill(
        templates.get(PageKind::CaseStudy),
        &[(placeholder::HEAD, &head), (placeholder::BODY, &body)],
    )
}

/// Title, description and social tags plus the `Article` JSON-LD block.
#[must_use]
pub fn render_head(view: &CaseStudyView<'_>) -> String {
    let title = doc::text(view.content, "seoTitle")
        .or_else(|| doc::text(view.content, "blogTitle"))
        .unwrap_or("Case Study");
    let description = doc::text(view.content, "seoMetaDescription")
        .or_else(|| doc::text(view.content, "seoTitle"))
        .unwrap_or_default();
    let image_url = doc::text_or(view.content, "mainImageUrl", DEFAULT_IMAGE);

    let title_attr = escape_attr(title);
    let description_attr = escape_attr(description);
    let image_attr = escape_attr(image_url);

    format!(
        r#"<title>{title}</title>
    <meta name="description" content="{description_attr}" />
    <meta property="og:title" content="{title_attr}" />
    <meta property="og:description" content="{description_attr}" />
    <meta property="og:type" content="article" />
    <meta property="og:image" content="{image_attr}" />
    <meta property="twitter:card" content="summary_large_image" />
    <meta property="twitter:title" content="{title_attr}" />
    <meta property="twitter:description" content="{description_attr}" />
    <meta property="twitter:image" content="{image_attr}" />
    <link rel="stylesheet" href="/css/case_study.css" />
    <script type="application/ld+json">
        {{
            "@context": "https://schema.org",
            "@type": "Article",
            "headline": {headline},
            "datePublished": "{iso}",
            "description": {ld_description},
            "image": [{ld_image}],
            "articleSection": "{CASE_STUDY_CONTENT_TYPE}"
        }}
    </script>"#,
        title = escape_html(title),
        headline = json_ld_string(title),
        iso = iso_date(view.date),
        ld_description = json_ld_string(description),
        ld_image = json_ld_string(image_url),
    )
}

/// Renders the article sections, without the page shell.
#[must_use]
pub fn render_case_study_body(categories: &CategoryTable, view: &CaseStudyView<'_>) -> String {
    [
        render_article_header(categories, view),
        render_summary(view.preview),
        view.pdf_url
            .filter(|url| !url.trim().is_empty())
            .map(render_pdf_viewer)
            .unwrap_or_default(),
        render_prose_section(view.structured(), "theVision", "Vision", "The Vision", "prose"),
        render_process(view.structured()),
        render_story(view.structured()),
        render_prose_section(view.structured(), "theResult", "Result", "The Result", "result"),
        render_impact(view.structured()),
    ]
    .concat()
}

fn render_article_header(categories: &CategoryTable, view: &CaseStudyView<'_>) -> String {
    let title = doc::text_or(view.content, "blogTitle", "Case Study");
    let breadcrumb = match view.category.filter(|c| !c.trim().is_empty()) {
        Some(category) => format!(
            "Case Study {BREADCRUMB_ARROW} {} {BREADCRUMB_ARROW}",
            escape_html(&categories.display_name(category))
        ),
        None => "Case Study".to_string(),
    };

    format!(
        r#"
        <header class="article-header">
            <span class="kicker" aria-label="Content type">
                {breadcrumb}
            </span>
            <h1 id="title" class="title">{title}</h1>
            <div class="meta">
                <span>Published: <time datetime="{iso}">{date}</time></span>
            </div>
        </header>"#,
        title = escape_html(title),
        iso = iso_date(view.date),
        date = long_date(view.date),
    )
}

fn render_summary(preview: &Value) -> String {
    let summary = doc::text(preview, "summary").map(sanitize_rich_text).unwrap_or_default();
    if summary.is_empty() {
        return String::new();
    }

    format!(
        r#"
        <section aria-label="Summary">
            <div class="lead">
                {summary}
            </div>
        </section>"#
    )
}

fn render_pdf_viewer(pdf_url: &str) -> String {
    format!(
        r#"
        <section class="section pdf-viewer-section" aria-label="PDF Viewer">
            <div class="pdf-container" style="width: 100%; height: 550px; display: flex; justify-content: center; align-items: center; background: #1a1a1a; border-radius: 8px; overflow: hidden;">
                {}
            </div>
        </section>"#,
        render_flipbook(pdf_url)
    )
}

/// A heading plus one sanitized rich-text field.
fn render_prose_section(
    structured: &Value,
    key: &str,
    label: &str,
    heading: &str,
    class: &str,
) -> String {
    let body = doc::text(structured, key).map(sanitize_rich_text).unwrap_or_default();
    if body.is_empty() {
        return String::new();
    }

    format!(
        r#"
        <section class="section" aria-label="{label}">
            <h2>{heading}</h2>
            <div class="{class}">
                {body}
            </div>
        </section>"#
    )
}

fn render_process(structured: &Value) -> String {
    let Some(process) = structured.get("ourProcess").filter(|p| p.is_object()) else {
        return String::new();
    };

    let intro = doc::text(process, "intro").map(sanitize_rich_text).unwrap_or_default();
    let steps = doc::text_list(process, "steps")
        .into_iter()
        .map(sanitize_rich_text)
        .filter(|step| !step.is_empty())
        .map(|step| format!("                    <li>{step}</li>\n"))
        .collect::<String>();
    let conclusion = doc::text(process, "conclusion").map(sanitize_rich_text).unwrap_or_default();

    if intro.is_empty() && steps.is_empty() && conclusion.is_empty() {
        return String::new();
    }

    let mut section = String::from(
        r#"
        <section class="section" aria-label="Our process">
            <h2>Our Process</h2>
            <div class="process">"#,
    );
    if !intro.is_empty() {
        section.push_str("\n                ");
        section.push_str(&intro);
    }
    if !steps.is_empty() {
        section.push_str("\n                <ol class=\"steps\">\n");
        section.push_str(&steps);
        section.push_str("                </ol>");
    }
    if !conclusion.is_empty() {
        section.push_str("\n                ");
        section.push_str(&conclusion);
    }
    section.push_str("\n            </div>\n        </section>");
    section
}

fn render_story(structured: &Value) -> String {
    let items = structured
        .get("theStory")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter(|item| item.get("type").and_then(Value::as_str) == Some("h3"))
                .filter_map(|item| {
                    let title = doc::text(item, "title")?;
                    let body = doc::text(item, "content").map(sanitize_rich_text)?;
                    (!body.is_empty()).then(|| {
                        format!(
                            "\n                <h3>{}</h3>\n                {body}\n",
                            escape_html(title)
                        )
                    })
                })
                .collect::<String>()
        })
        .unwrap_or_default();

    if items.is_empty() {
        return String::new();
    }

    format!(
        r#"
        <section class="section" aria-label="The story we told">
            <h2>The Story We Told</h2>
            <div class="prose">{items}            </div>
        </section>"#
    )
}

fn render_impact(structured: &Value) -> String {
    let items = doc::text_list(structured, "theImpact")
        .into_iter()
        .map(sanitize_rich_text)
        .filter(|item| !item.is_empty())
        .map(|item| {
            format!(
                r#"
                <li class="impact-item">
                    <span>{item}</span>
                </li>"#
            )
        })
        .collect::<String>();

    if items.is_empty() {
        return String::new();
    }

    format!(
        r#"
        <section class="section" aria-label="Impact">
            <h2>The Impact</h2>
            <ul class="impact-list">{items}
            </ul>
        </section>"#
    )
}
