//! Allow-list sanitizer for the rich-text fields written in the admin editor.
//!
//! The editor produces small HTML fragments. Only inline emphasis, paragraphs,
//! line breaks and lists survive; every attribute is dropped and all text is
//! re-escaped, so the output can be interpolated into a page as-is.

use crate::escape::escape_html;

/// ## Summary
/// Sanitizes an HTML fragment, keeping `strong`, `em`, `u`, `br`, `p`, `ul`,
/// `ol` and `li` without attributes. `b` becomes `strong` and `i` becomes
/// `em`. Comments and the bodies of `script` and `style` are removed, other
/// tags are dropped with their text kept. Unclosed elements are closed at the
/// end of the fragment and whitespace runs are collapsed.
#[must_use]
pub fn sanitize_rich_text(input: &str) -> String {
    Sanitizer::new(Mode::RichText).run(input)
}

/// ## Summary
/// Reduces an HTML fragment to escaped plain text with collapsed whitespace.
#[must_use]
pub fn clean_text(input: &str) -> String {
    Sanitizer::new(Mode::PlainText).run(input)
}

/// Decodes named and numeric character references. Unknown references are
/// kept verbatim.
#[must_use]
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi)));

        if let Some((c, semi)) = decoded {
            out.push(c);
            rest = &tail[semi + 1..];
        } else {
            out.push('&');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        "ndash" => Some('\u{2013}'),
        "mdash" => Some('\u{2014}'),
        "lsquo" => Some('\u{2018}'),
        "rsquo" => Some('\u{2019}'),
        "ldquo" => Some('\u{201C}'),
        "rdquo" => Some('\u{201D}'),
        "hellip" => Some('\u{2026}'),
        "copy" => Some('\u{00A9}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code).filter(|c| *c != '\0')
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    RichText,
    PlainText,
}

/// Maps an input tag name to the element emitted for it, if it is allowed.
fn canonical_tag(name: &str) -> Option<&'static str> {
    match name {
        "strong" | "b" => Some("strong"),
        "em" | "i" => Some("em"),
        "u" => Some("u"),
        "br" => Some("br"),
        "p" => Some("p"),
        "ul" => Some("ul"),
        "ol" => Some("ol"),
        "li" => Some("li"),
        _ => None,
    }
}

/// Tags that separate words when they are removed.
fn is_block(name: &str) -> bool {
    matches!(
        name,
        "p" | "br"
            | "div"
            | "li"
            | "ul"
            | "ol"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "tr"
            | "td"
            | "blockquote"
    )
}

#[derive(Debug)]
struct Tag {
    name: String,
    closing: bool,
    len: usize,
}

impl Tag {
    /// Parses the tag at the start of `s`. Returns `None` when the `<` does
    /// not open a tag and must be treated as text.
    fn parse(s: &str) -> Option<Self> {
        let end = find_tag_end(s)?;
        let inner = &s[1..end];

        if inner.starts_with(['!', '?']) {
            return Some(Self {
                name: String::new(),
                closing: false,
                len: end + 1,
            });
        }

        let (closing, body) = match inner.strip_prefix('/') {
            Some(body) => (true, body),
            None => (false, inner),
        };

        if !body.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return None;
        }

        let name = body
            .chars()
            .take_while(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_ascii_lowercase();

        Some(Self {
            name,
            closing,
            len: end + 1,
        })
    }
}

/// Byte index of the `>` closing the tag at the start of `s`, ignoring any
/// `>` inside quoted attribute values.
fn find_tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, c) in s.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(idx),
            (None, '<') => return None,
            (None, _) => {}
        }
    }
    None
}

/// Skips everything up to and including the closing tag of a raw-text element.
fn skip_element_body<'a>(rest: &'a str, name: &str) -> &'a str {
    let lower = rest.to_ascii_lowercase();
    let Some(close) = lower.find(&format!("</{name}")) else {
        return "";
    };
    match rest[close..].find('>') {
        Some(gt) => &rest[close + gt + 1..],
        None => "",
    }
}

fn push_close(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct Sanitizer {
    mode: Mode,
    out: String,
    open: Vec<&'static str>,
}

impl Sanitizer {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            out: String::new(),
            open: Vec::new(),
        }
    }

    fn run(mut self, input: &str) -> String {
        let mut rest = input;

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix("<!--") {
                rest = after.find("-->").map_or("", |end| &after[end + 3..]);
                continue;
            }

            if rest.starts_with('<') {
                if let Some(tag) = Tag::parse(rest) {
                    rest = self.handle_tag(&tag, &rest[tag.len..]);
                } else {
                    self.out.push_str("&lt;");
                    rest = &rest[1..];
                }
                continue;
            }

            let end = rest.find('<').unwrap_or(rest.len());
            self.out.push_str(&escape_html(&decode_entities(&rest[..end])));
            rest = &rest[end..];
        }

        while let Some(name) = self.open.pop() {
            push_close(&mut self.out, name);
        }

        collapse_whitespace(&self.out)
    }

    fn handle_tag<'a>(&mut self, tag: &Tag, rest: &'a str) -> &'a str {
        if !tag.closing && matches!(tag.name.as_str(), "script" | "style") {
            return skip_element_body(rest, &tag.name);
        }

        match (self.mode, canonical_tag(&tag.name)) {
            (Mode::RichText, Some(name)) => self.emit(name, tag.closing),
            _ => {
                if is_block(&tag.name) {
                    self.out.push(' ');
                }
            }
        }

        rest
    }

    fn emit(&mut self, name: &'static str, closing: bool) {
        if name == "br" {
            if !closing {
                self.out.push_str("<br>");
            }
            return;
        }

        if closing {
            if let Some(pos) = self.open.iter().rposition(|open| *open == name) {
                for open in self.open.drain(pos..).rev() {
                    push_close(&mut self.out, open);
                }
            }
        } else {
            self.out.push('<');
            self.out.push_str(name);
            self.out.push('>');
            self.open.push(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_allowed_tags_without_attributes() {
        assert_eq!(
            sanitize_rich_text(r#"<p class="x" onclick="alert(1)">Hello <strong style="color:red">world</strong></p>"#),
            "<p>Hello <strong>world</strong></p>"
        );
        assert_eq!(
            sanitize_rich_text("<ul><li>One</li><li>Two</li></ul>"),
            "<ul><li>One</li><li>Two</li></ul>"
        );
    }

    #[test]
    fn maps_b_and_i() {
        assert_eq!(
            sanitize_rich_text("<b>bold</b> and <i>italic</i>"),
            "<strong>bold</strong> and <em>italic</em>"
        );
    }

    #[test]
    fn drops_disallowed_tags_but_keeps_text() {
        assert_eq!(
            sanitize_rich_text(r#"<div><a href="javascript:alert(1)">link</a> <span>text</span></div>"#),
            "link text"
        );
        assert_eq!(sanitize_rich_text(r#"<img src=x onerror="alert(1)">"#), "");
    }

    #[test]
    fn removes_script_style_and_comments() {
        assert_eq!(
            sanitize_rich_text("before<script>alert('x')</script>after"),
            "beforeafter"
        );
        assert_eq!(
            sanitize_rich_text("<STYLE>p { color: red }</STYLE><p>ok</p>"),
            "<p>ok</p>"
        );
        assert_eq!(sanitize_rich_text("a<!-- hidden <b>x</b> -->b"), "ab");
        assert_eq!(sanitize_rich_text("<script>never closed"), "");
    }

    #[test]
    fn decodes_then_re_escapes() {
        assert_eq!(
            sanitize_rich_text("&lt;script&gt;alert(1)&lt;/script&gt;"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
        assert_eq!(sanitize_rich_text("Tom &amp; Jerry&#39;s"), "Tom &amp; Jerry&#39;s");
        assert_eq!(sanitize_rich_text("a&nbsp;b"), "a b");
        assert_eq!(sanitize_rich_text("1 < 2"), "1 &lt; 2");
    }

    #[test]
    fn closes_unbalanced_elements() {
        assert_eq!(sanitize_rich_text("<p><strong>open"), "<p><strong>open</strong></p>");
        assert_eq!(sanitize_rich_text("stray</em> close"), "stray close");
        assert_eq!(
            sanitize_rich_text("<ul><li>a</ul>"),
            "<ul><li>a</li></ul>"
        );
    }

    #[test]
    fn attribute_with_angle_bracket() {
        assert_eq!(sanitize_rich_text(r#"<p title="a>b">x</p>"#), "<p>x</p>");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(
            sanitize_rich_text("  <p>\n  many   spaces\t here </p>  "),
            "<p> many spaces here </p>"
        );
    }

    #[test]
    fn clean_text_drops_all_tags() {
        assert_eq!(
            clean_text("<p>First <b>point</b></p><p>Second&amp;third</p>"),
            "First point Second&amp;third"
        );
        assert_eq!(clean_text("<meta charset=utf-8>Plain"), "Plain");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn decode_entities_numeric() {
        assert_eq!(decode_entities("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_entities("&unknown; & &#0;"), "&unknown; & &#0;");
    }
}
