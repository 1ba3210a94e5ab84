//! Blog post page, "more blogs" cards and the blog listing page.

use chrono::{DateTime, Utc};
use quill_core::categories::CategoryTable;
use quill_core::types::ContentKind;
use quill_core::util::toc::{ContentBlock, blocks_from_json, build_toc};
use serde_json::Value;

use crate::date::{iso_date, long_date, short_date};
use crate::doc;
use crate::escape::{escape_attr, escape_html};
use crate::sanitize::{clean_text, sanitize_rich_text};
use crate::template::{PageKind, PageTemplates, fill, placeholder};
use crate::toc;

const DEFAULT_IMAGE: &str = "/images/blog-default.jpg";
const AUTHOR: &str = "Suflex Media";

/// A stored blog post as seen by the renderer.
#[derive(Debug, Clone, Copy)]
pub struct BlogView<'a> {
    pub slug: &'a str,
    pub content: &'a Value,
    pub date: DateTime<Utc>,
}

/// ## Summary
/// Renders the full blog page: the `blog.html` shell with the hero, both
/// tables of contents, the article body and the "more blogs" cards.
#[must_use]
pub fn render_blog_page(
    templates: &PageTemplates,
    categories: &CategoryTable,
    post: &BlogView<'_>,
    more: &[BlogView<'_>],
) -> String {
    let title = escape_html(doc::text_or(post.content, "blogTitle", "Blog Post"));
    let body = render_blog_body(categories, post, more);

    fill(
        templates.get(PageKind::Blog),
        &[(placeholder::PAGE_TITLE, &title), (placeholder::BODY, &body)],
    )
}

/// Renders everything between the page header and footer.
#[must_use]
pub fn render_blog_body(
    categories: &CategoryTable,
    post: &BlogView<'_>,
    more: &[BlogView<'_>],
) -> String {
    let sections = build_toc(&blocks_from_json(post.content.get("dynamicSections")));

    let hero = render_hero(categories, post);
    let mobile_toc = toc::render_mobile(&sections);
    let desktop_toc = toc::render_desktop(&sections);
    let content = render_content_blocks(post.content.get("dynamicSections"));
    let more_blogs = render_more_blogs(more);

    format!(
        r#"{hero}
        {mobile_toc}
        <div class="blog-grid grid grid-cols-1 lg:grid-cols-[300px_minmax(0,1fr)] gap-8 mt-4 md:mt-8 max-w-[80rem] mx-auto">
        {desktop_toc}
        {content}
        </div>
        {more_blogs}"#
    )
}

fn render_hero(categories: &CategoryTable, post: &BlogView<'_>) -> String {
    let title = doc::text_or(post.content, "blogTitle", "Untitled Blog");
    let category = doc::text(post.content, "blogCategory")
        .map_or_else(|| "General".to_string(), |c| categories.display_name(c));
    let image_url = doc::text_or(post.content, "mainImageUrl", DEFAULT_IMAGE);
    let image_alt = doc::text_or(post.content, "mainImageAlt", title);
    let summary = doc::text(post.content, "blogSummary").map(sanitize_rich_text);

    format!(
        r#"<nav class="blog-breadcrumb mb-2 text-left" aria-label="Breadcrumb">
        <span class="text-sm text-gray-600"><a href="/blogs" class="font-bold">Blog</a> &rsaquo; {category}</span>
    </nav>
    <article class="blog-hero relative">
        <div class="relative w-full h-[300px] md:h-[478px]">
            <img src="{image_url}" alt="{image_alt}" class="w-full h-full object-cover" />
        </div>
        <div class="blog-hero-content relative bg-white max-w-[1175px] mx-auto p-4 md:p-8">
            <h1 class="hero-text text-center">{title}</h1>
            <p class="text-center"><time datetime="{iso}">{date}</time></p>
        </div>
        <div class="blog-summary text-center max-w-[1175px] mx-auto">{summary}</div>
        <hr class="border-t border-black my-8 md:my-12" />
    </article>"#,
        category = escape_html(&category),
        image_url = escape_attr(image_url),
        image_alt = escape_attr(image_alt),
        title = escape_html(title),
        iso = iso_date(post.date),
        date = long_date(post.date),
        summary = summary.unwrap_or_default(),
    )
}

/// ## Summary
/// Renders the `dynamicSections` blocks in order. `h1` and `h2` carry their
/// anchor ids so the table of contents can link to them; `h3` to `h6` are
/// plain headings. Unknown block types are skipped.
#[must_use]
pub fn render_content_blocks(sections: Option<&Value>) -> String {
    let blocks = sections
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(render_block).collect::<Vec<_>>())
        .unwrap_or_default();

    format!(
        r#"<section class="blog-content space-y-6 text-left order-1 lg:order-2">{}</section>"#,
        blocks.join("\n")
    )
}

fn render_block(block: &Value) -> Option<String> {
    let kind = block.get("type").and_then(Value::as_str)?;

    match kind {
        "text" => {
            let body = sanitize_rich_text(block.get("content").and_then(Value::as_str)?);
            let wrapper = if ["<p>", "<ul>", "<ol>"].iter().any(|tag| body.contains(tag)) {
                "div"
            } else {
                "p"
            };
            Some(format!(r#"<{wrapper} class="blog-text">{body}</{wrapper}>"#))
        }
        "h1" | "h2" => {
            let text = escape_html(block.get("content").and_then(Value::as_str)?);
            Some(match ContentBlock::from_json(block).identifier {
                Some(id) => format!(
                    r#"<{kind} id="{}" class="blog-heading scroll-mt-20">{text}</{kind}>"#,
                    escape_attr(&id)
                ),
                None => format!(r#"<{kind} class="blog-heading scroll-mt-20">{text}</{kind}>"#),
            })
        }
        "h3" | "h4" | "h5" | "h6" => {
            let text = escape_html(block.get("content").and_then(Value::as_str)?);
            Some(format!(r#"<{kind} class="blog-heading scroll-mt-20">{text}</{kind}>"#))
        }
        "image" => {
            let image = block.get("content")?;
            let url = doc::text(image, "url")?;
            let alt = doc::text_or(image, "alt", "image");
            Some(format!(
                r#"<div class="blog-image my-8 md:my-12"><img src="{}" alt="{}" class="w-full h-full object-cover"/></div>"#,
                escape_attr(url),
                escape_attr(alt)
            ))
        }
        _ => None,
    }
}

/// ## Summary
/// Renders one blog card linking to `/blog/{slug}`.
#[must_use]
pub fn render_card(post: &BlogView<'_>) -> String {
    let image_url = doc::text_or(post.content, "mainImageUrl", DEFAULT_IMAGE);
    let image_alt = doc::text_or(post.content, "mainImageAlt", "Blog Image");
    let title = doc::text_or(post.content, "blogTitle", "Untitled");
    let summary = doc::text(post.content, "blogSummary").map(clean_text);

    format!(
        r#"<a href="{href}" class="flex related-blog-card">
                <div class="card bg-white rounded-xl shadow-md overflow-hidden flex flex-col flex-1">
                    <div class="h-48 overflow-hidden flex-shrink-0">
                        <img src="{image_url}" alt="{image_alt}" class="w-full h-full object-cover">
                    </div>
                    <div class="p-6 flex flex-col flex-grow">
                        <h3 class="text-xl font-bold text-gray-800 mb-2">{title}</h3>
                        <p class="text-gray-600 mb-4 flex-grow">{summary}</p>
                        <div class="flex items-center text-sm text-gray-500 mt-auto">
                            <span>{AUTHOR}</span>
                            <span class="mx-2">&bull;</span>
                            <span>{date}</span>
                        </div>
                    </div>
                </div>
            </a>"#,
        href = escape_attr(&ContentKind::BlogPost.public_path(post.slug)),
        image_url = escape_attr(image_url),
        image_alt = escape_attr(image_alt),
        title = escape_html(title),
        summary = summary.unwrap_or_default(),
        date = short_date(post.date),
    )
}

/// Renders the cards in order, one per line.
#[must_use]
pub fn render_cards(posts: &[BlogView<'_>]) -> String {
    posts.iter().map(render_card).collect::<Vec<_>>().join("\n")
}

/// The "more blogs" block under an article. Empty when there is nothing to show.
#[must_use]
pub fn render_more_blogs(posts: &[BlogView<'_>]) -> String {
    if posts.is_empty() {
        return String::new();
    }

    format!(
        r#"<section class="more_blogs max-w-[80rem] mx-auto mt-16">
            <h2 class="text-3xl font-bold mb-8">More Blogs</h2>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-8">
            {}
            </div>
            <div class="text-center mt-10"><a href="/blogs" class="see-more-btn">See More</a></div>
        </section>"#,
        render_cards(posts)
    )
}

/// ## Summary
/// Renders the `/blogs` listing page.
#[must_use]
pub fn render_blog_list_page(templates: &PageTemplates, posts: &[BlogView<'_>]) -> String {
    fill(
        templates.get(PageKind::BlogList),
        &[(placeholder::BLOG_CARDS, &render_cards(posts))],
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap()
    }

    fn document() -> Value {
        json!({
            "blogTitle": "Ghostwriting <101>",
            "blogSummary": "<b>Why</b> it matters",
            "blogCategory": "ghostwriting",
            "mainImageUrl": "https://cdn.example.com/hero.jpg",
            "dynamicSections": [
                {"type": "h2", "id": "orphan", "content": "Before anything"},
                {"type": "h1", "id": "intro", "content": "Intro"},
                {"type": "text", "content": "Hello <i>there</i><script>alert(1)</script>"},
                {"type": "h2", "id": "setup", "content": "Setup"},
                {"type": "h3", "id": "ignored", "content": "Detail"},
                {"type": "image", "content": {"url": "https://cdn.example.com/a.png", "alt": "Diagram"}},
                {"type": "h1", "id": "details", "content": "Details"},
                {"type": "quote", "content": "skipped"}
            ]
        })
    }

    #[test_log::test]
    fn content_blocks_in_order() {
        let doc = document();
        let html = render_content_blocks(doc.get("dynamicSections"));

        assert!(html.contains(r#"<h1 id="intro" class="blog-heading scroll-mt-20">Intro</h1>"#));
        assert!(html.contains(r#"<h2 id="setup""#));
        assert!(html.contains(r#"<h3 class="blog-heading scroll-mt-20">Detail</h3>"#));
        assert!(!html.contains("id=\"ignored\""));
        assert!(html.contains(r#"<p class="blog-text">Hello <em>there</em></p>"#));
        assert!(html.contains(r#"<img src="https://cdn.example.com/a.png" alt="Diagram""#));
        assert!(!html.contains("skipped"));
        assert!(!html.contains("<script>"));
        assert!(html.find("Intro").unwrap() < html.find("Details").unwrap());
    }

    #[test_log::test]
    fn page_has_toc_and_escaped_title() {
        let doc = document();
        let post = BlogView {
            slug: "ghostwriting-101",
            content: &doc,
            date: date(),
        };
        let html = render_blog_page(&PageTemplates::default(), &CategoryTable::default(), &post, &[]);

        assert!(html.contains("<title>Ghostwriting &lt;101&gt;</title>"));
        assert!(html.contains(r#"data-section-id="intro""#));
        assert!(html.contains(r#"data-section-id="details""#));
        assert!(!html.contains(r#"data-section-id="orphan""#));
        assert_eq!(html.matches(r#"data-section-id="intro""#).count(), 2);
        assert!(html.contains("&rsaquo; Ghostwriting"));
        assert!(html.contains("January 15, 2025"));
        assert!(html.contains("<strong>Why</strong> it matters"));
        assert!(!html.contains("More Blogs"));
    }

    #[test_log::test]
    fn title_with_placeholder_text_is_not_expanded() {
        let mut doc = document();
        doc["blogTitle"] = json!("Notes on [[total_body]]");
        let post = BlogView {
            slug: "notes",
            content: &doc,
            date: date(),
        };
        let html = render_blog_page(&PageTemplates::default(), &CategoryTable::default(), &post, &[]);

        assert!(html.contains("<title>Notes on [[total_body]]</title>"));
        assert_eq!(html.matches(r#"data-section-id="intro""#).count(), 2);
    }

    #[test]
    fn cards_link_to_blog_paths() {
        let doc = json!({"blogTitle": "Other", "blogSummary": "<p>Short</p>"});
        let posts = [BlogView {
            slug: "other-post",
            content: &doc,
            date: date(),
        }];

        let html = render_more_blogs(&posts);
        assert!(html.contains(r#"href="/blog/other-post""#));
        assert!(html.contains("Jan 15, 2025"));
        assert!(html.contains(">Short</p>"));
        assert!(html.contains(DEFAULT_IMAGE));

        let list = render_blog_list_page(&PageTemplates::default(), &posts);
        assert!(list.contains(r#"href="/blog/other-post""#));
        assert!(!list.contains(placeholder::BLOG_CARDS));
    }
}
