//! HTML and JavaScript escaping for values interpolated into page shells.

/// Escapes text for an HTML text node.
///
/// Escapes: ampersand, angle brackets, and both quote characters, so the
/// result is also safe inside a quoted attribute.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 10);
    for c in s.chars() {
        push_escaped(&mut result, c);
    }
    result
}

/// Escapes a value for a quoted attribute.
///
/// Same rules as [`escape_html`], plus newlines and tabs as character
/// references so multi-line values survive attribute normalization.
#[must_use]
pub fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 10);
    for c in s.chars() {
        match c {
            '\n' => result.push_str("&#10;"),
            '\r' => result.push_str("&#13;"),
            '\t' => result.push_str("&#9;"),
            _ => push_escaped(&mut result, c),
        }
    }
    result
}

/// Escapes a value for a single- or double-quoted JavaScript string literal
/// embedded in a `<script>` element.
///
/// Angle brackets are written as unicode escapes so the value can never close
/// the surrounding script element.
#[must_use]
pub fn escape_js_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 10);
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '<' => result.push_str("\\u003c"),
            '>' => result.push_str("\\u003e"),
            '&' => result.push_str("\\u0026"),
            '\u{2028}' => result.push_str("\\u2028"),
            '\u{2029}' => result.push_str("\\u2029"),
            _ => result.push(c),
        }
    }
    result
}

/// Escapes a value for a JSON string inside a `<script type="application/ld+json">`
/// block. Produces the quoted literal.
#[must_use]
pub fn json_ld_string(s: &str) -> String {
    let quoted = serde_json::Value::String(s.to_string()).to_string();
    quoted
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

fn push_escaped(result: &mut String, c: char) {
    match c {
        '&' => result.push_str("&amp;"),
        '<' => result.push_str("&lt;"),
        '>' => result.push_str("&gt;"),
        '"' => result.push_str("&quot;"),
        '\'' => result.push_str("&#39;"),
        _ => result.push(c),
    }
}
