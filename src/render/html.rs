use std::sync::LazyLock;

use pulldown_cmark::{html, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;

static ABSOLUTE_URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^https?://").unwrap());

/// Resolve a backend media URL against the configured base. Absolute
/// `http(s)://` URLs pass through untouched.
pub fn resolve_url(base: &str, url: &str) -> String {
    if ABSOLUTE_URL_RE.is_match(url) {
        return url.to_string();
    }
    let sep = if url.starts_with('/') { "" } else { "/" };
    format!("{}{}{}", base, sep, url)
}

/// Markdown body to HTML. Outside the hero a level-1 heading is demoted to
/// h2 so the document keeps a single h1.
pub fn markdown_to_html(markdown: &str, demote_h1: bool) -> String {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut out = String::new();

    if demote_h1 {
        let events = parser.map(|event| match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                id,
                classes,
                attrs,
            }) => Event::Start(Tag::Heading {
                level: HeadingLevel::H2,
                id,
                classes,
                attrs,
            }),
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                Event::End(TagEnd::Heading(HeadingLevel::H2))
            }
            other => other,
        });
        html::push_html(&mut out, events);
    } else {
        html::push_html(&mut out, parser);
    }

    out
}

/// Minimal escaping for text nodes and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ── Tests ──
