//! HTML escaping for free-text columns.
//!
//! Text is escaped on its way into storage and unescaped on its way out, so
//! stored rows never carry raw markup regardless of which UI renders them.

/// Escapes `&`, `<`, `>`, `"`, and `'`.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&#34;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

/// Reverses [`escape_html`].
///
/// Also understands `&quot;` and `&apos;`. Unrecognized entities are left
/// as they are.
#[must_use]
pub fn unescape_html(s: &str) -> String {
    const ENTITIES: &[(&str, char)] = &[
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&#34;", '"'),
        ("&quot;", '"'),
        ("&#39;", '\''),
        ("&apos;", '\''),
    ];

    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        result.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, c)) => {
                result.push(*c);
                rest = &rest[entity.len()..];
            },
            None => {
                result.push('&');
                rest = &rest[1..];
            },
        }
    }
    result.push_str(rest);
    result
}
