//! Table-of-contents construction for blog posts.
//!
//! ## Summary
//! Blog content is a flat, ordered list of blocks. Top-level headings open a
//! section, sub-headings are grouped under the most recent section. Anything
//! else is ignored.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    TopLevelHeading,
    SubHeading,
    Paragraph,
    Image,
    Other,
}

impl BlockKind {
    /// Maps the stored `type` tag of a content block. `h3` to `h6` are not
    /// part of the outline and map to `Other`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "h1" => Self::TopLevelHeading,
            "h2" => Self::SubHeading,
            "text" => Self::Paragraph,
            "image" => Self::Image,
            _ => Self::Other,
        }
    }
}

/// A single block of stored blog content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub kind: BlockKind,
    pub identifier: Option<String>,
    pub text: Option<String>,
}

impl ContentBlock {
    #[must_use]
    pub fn new(kind: BlockKind, identifier: &str, text: &str) -> Self {
        Self {
            kind,
            identifier: Some(identifier.to_string()),
            text: Some(text.to_string()),
        }
    }

    /// ## Summary
    /// Reads a block from its stored JSON form `{"type", "id", "content"}`.
    ///
    /// Non-string `content` (images carry `{url, alt}`) yields no text label.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .map_or(BlockKind::Other, BlockKind::from_tag);
        let identifier = value.get("id").and_then(json_label);
        let text = value.get("content").and_then(Value::as_str).map(str::to_string);

        Self {
            kind,
            identifier,
            text,
        }
    }
}

/// Block ids are usually strings but older documents store numbers.
fn json_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// ## Summary
/// Reads the `dynamicSections` array of a blog document. Anything that is not
/// an array yields no blocks.
#[must_use]
pub fn blocks_from_json(sections: Option<&Value>) -> Vec<ContentBlock> {
    sections
        .and_then(Value::as_array)
        .map(|items| items.iter().map(ContentBlock::from_json).collect())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub anchor_id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocSection {
    pub anchor_id: String,
    pub label: String,
    pub subsections: Vec<TocEntry>,
}

/// What to do with sub-headings that appear before any top-level heading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OrphanPolicy {
    /// Leave them out of the outline.
    #[default]
    Drop,
    /// Group them under an implicit section with the given label. The
    /// section takes the anchor of the first orphan.
    Synthesize { label: String },
}

#[derive(Debug, Clone, Default)]
pub struct TocOptions {
    pub orphans: OrphanPolicy,
}

/// ## Summary
/// Builds the outline with the default options.
#[must_use]
pub fn build_toc(blocks: &[ContentBlock]) -> Vec<TocSection> {
    build_toc_with(blocks, &TocOptions::default())
}

/// ## Summary
/// Builds a two-level outline from `blocks` in a single forward pass.
///
/// Only headings with a non-blank identifier and label take part. Output
/// order follows input order and every top-level heading yields exactly one
/// section.
#[must_use]
pub fn build_toc_with(blocks: &[ContentBlock], options: &TocOptions) -> Vec<TocSection> {
    let mut sections = Vec::new();
    let mut current: Option<TocSection> = None;
    let mut orphans: Vec<TocEntry> = Vec::new();

    for block in blocks {
        let (Some(anchor_id), Some(label)) = (
            non_blank(block.identifier.as_deref()),
            non_blank(block.text.as_deref()),
        ) else {
            continue;
        };

        match block.kind {
            BlockKind::TopLevelHeading => {
                if let Some(section) = current.take() {
                    sections.push(section);
                }
                current = Some(TocSection {
                    anchor_id: anchor_id.to_string(),
                    label: label.to_string(),
                    subsections: Vec::new(),
                });
            }
            BlockKind::SubHeading => {
                let entry = TocEntry {
                    anchor_id: anchor_id.to_string(),
                    label: label.to_string(),
                };
                match current.as_mut() {
                    Some(section) => section.subsections.push(entry),
                    None => orphans.push(entry),
                }
            }
            BlockKind::Paragraph | BlockKind::Image | BlockKind::Other => {}
        }
    }

    if let Some(section) = current {
        sections.push(section);
    }

    if !orphans.is_empty() {
        match &options.orphans {
            OrphanPolicy::Drop => {
                tracing::warn!(
                    dropped = orphans.len(),
                    "Sub-headings before the first top-level heading left out of the outline"
                );
            }
            OrphanPolicy::Synthesize { label } => {
                let anchor_id = orphans[0].anchor_id.clone();
                sections.insert(
                    0,
                    TocSection {
                        anchor_id,
                        label: label.clone(),
                        subsections: orphans,
                    },
                );
            }
        }
    }

    sections
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn h1(id: &str, text: &str) -> ContentBlock {
        ContentBlock::new(BlockKind::TopLevelHeading, id, text)
    }

    fn h2(id: &str, text: &str) -> ContentBlock {
        ContentBlock::new(BlockKind::SubHeading, id, text)
    }

    fn entry(id: &str, label: &str) -> TocEntry {
        TocEntry {
            anchor_id: id.to_string(),
            label: label.to_string(),
        }
    }

    #[test_log::test]
    fn test_groups_sub_headings_under_previous_heading() {
        let blocks = vec![h1("a", "Intro"), h2("c", "Setup"), h1("b", "Details")];

        let toc = build_toc(&blocks);

        assert_eq!(
            toc,
            vec![
                TocSection {
                    anchor_id: "a".to_string(),
                    label: "Intro".to_string(),
                    subsections: vec![entry("c", "Setup")],
                },
                TocSection {
                    anchor_id: "b".to_string(),
                    label: "Details".to_string(),
                    subsections: vec![],
                },
            ]
        );
    }

    #[test_log::test]
    fn test_is_deterministic() {
        let blocks = vec![h1("a", "Intro"), h2("b", "One"), h2("c", "Two")];
        assert_eq!(build_toc(&blocks), build_toc(&blocks));
    }

    #[test_log::test]
    fn test_leading_sub_heading_is_dropped_by_default() {
        let blocks = vec![h2("x", "Orphan"), h1("a", "Intro")];

        let toc = build_toc(&blocks);

        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].anchor_id, "a");
        assert!(toc[0].subsections.is_empty());
    }

    #[test_log::test]
    fn test_leading_sub_headings_can_be_synthesized() {
        let blocks = vec![h2("x", "First"), h2("y", "Second"), h1("a", "Intro")];
        let options = TocOptions {
            orphans: OrphanPolicy::Synthesize {
                label: "Overview".to_string(),
            },
        };

        let toc = build_toc_with(&blocks, &options);

        assert_eq!(toc.len(), 2);
        assert_eq!(toc[0].anchor_id, "x");
        assert_eq!(toc[0].label, "Overview");
        assert_eq!(toc[0].subsections, vec![entry("x", "First"), entry("y", "Second")]);
        assert_eq!(toc[1].anchor_id, "a");
    }

    #[test_log::test]
    fn test_non_heading_blocks_never_appear() {
        let blocks = vec![
            h1("a", "Intro"),
            ContentBlock::new(BlockKind::Paragraph, "p", "Some text"),
            ContentBlock::new(BlockKind::Image, "i", "img"),
            ContentBlock::new(BlockKind::Other, "h3", "Minor"),
        ];

        let toc = build_toc(&blocks);

        assert_eq!(toc.len(), 1);
        assert!(toc[0].subsections.is_empty());
    }

    #[test_log::test]
    fn test_blank_identifier_or_label_is_skipped() {
        let blocks = vec![
            h1("", "No anchor"),
            h1("a", "   "),
            ContentBlock {
                kind: BlockKind::TopLevelHeading,
                identifier: None,
                text: Some("Missing".to_string()),
            },
            h1("b", "Kept"),
        ];

        let toc = build_toc(&blocks);

        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].anchor_id, "b");
    }

    #[test_log::test]
    fn test_empty_input() {
        assert!(build_toc(&[]).is_empty());
    }

    #[test_log::test]
    fn test_blocks_from_json() {
        let sections = json!([
            {"type": "h1", "id": "intro", "content": "Intro"},
            {"type": "image", "id": 7, "content": {"url": "/a.png", "alt": "A"}},
            {"type": "h4", "id": "minor", "content": "Minor"},
            {"type": "h2", "id": "setup", "content": "Setup"}
        ]);

        let blocks = blocks_from_json(Some(&sections));

        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[1].kind, BlockKind::Image);
        assert_eq!(blocks[1].identifier.as_deref(), Some("7"));
        assert_eq!(blocks[1].text, None);
        assert_eq!(blocks[2].kind, BlockKind::Other);

        let toc = build_toc(&blocks);
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].subsections, vec![entry("setup", "Setup")]);
    }

    #[test]
    fn test_blocks_from_non_array() {
        assert!(blocks_from_json(Some(&json!({"type": "h1"}))).is_empty());
        assert!(blocks_from_json(None).is_empty());
    }
}
