//! Markup rendering for entry bodies.
//!
//! Journal bodies are CommonMark plus the extensions long-form journals
//! accumulated over the years. [`render`] is a pure function (same input,
//! byte-identical output) and it never fails: broken markup degrades per
//! dialect rules instead of erroring.
//!
//! The dialect on top of CommonMark:
//!
//! - tables, footnotes, strikethrough, smart punctuation (parser options)
//! - fraction glyphs for standalone `1/2`, `1/4`, `3/4`
//! - bare `http(s)://` URLs in plain text become links
//! - `#Heading` opens a heading even without a space after the hashes
//! - `<script>` elements in raw HTML are dropped from the output; all other
//!   raw HTML passes through
//! - underscores inside words never trigger emphasis (the CommonMark rule,
//!   so `snake_case_name` stays literal)
//!
//! Everything beyond the parser options is either a source pass before
//! [`Parser`] or an event pass between it and the HTML writer, so the
//! extensions compose without touching the parser itself.

use linkify::{LinkFinder, LinkKind};
use pulldown_cmark::{CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, html};

/// Render body markup to an HTML fragment.
pub fn render(text: &str) -> String {
    let source = relax_atx_headings(text);

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);

    let events: Vec<Event> = Parser::new_ext(&source, options).collect();
    let events = suppress_scripts(events);
    let events = decorate_text(events);

    let mut out = String::with_capacity(source.len() * 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// Insert the space CommonMark requires between ATX hashes and heading
/// text, so `#Heading` still opens a heading. Lines inside fenced code
/// blocks and indented code are left untouched.
fn relax_atx_headings(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut in_fence = false;
    for line in text.split_inclusive('\n') {
        let stripped = line.trim_start_matches(' ');
        let indent = line.len() - stripped.len();
        if stripped.starts_with("```") || stripped.starts_with("~~~") {
            in_fence = !in_fence;
            out.push_str(line);
            continue;
        }
        if !in_fence && indent <= 3 {
            let hashes = stripped.bytes().take_while(|b| *b == b'#').count();
            let rest = &stripped[hashes..];
            if (1..=6).contains(&hashes)
                && !rest.is_empty()
                && !rest.starts_with([' ', '\t', '\r', '\n'])
            {
                out.push_str(&line[..indent + hashes]);
                out.push(' ');
                out.push_str(rest);
                continue;
            }
        }
        out.push_str(line);
    }
    out
}

/// Drop `<script>` elements from raw HTML, block or inline. Everything from
/// the opening tag through the matching close (or the end of input when the
/// element is never closed) is removed.
fn suppress_scripts(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut in_script = false;
    for event in events {
        let raw = match &event {
            Event::Html(html) | Event::InlineHtml(html) => Some(html.to_ascii_lowercase()),
            _ => None,
        };
        if in_script {
            if raw.as_deref().is_some_and(|h| h.contains("</script")) {
                in_script = false;
            }
            continue;
        }
        if let Some(raw) = &raw
            && let Some(open) = raw.find("<script")
        {
            if !raw[open..].contains("</script") {
                in_script = true;
            }
            continue;
        }
        out.push(event);
    }
    out
}

/// Linkify bare URLs and substitute fraction glyphs in plain text. Text
/// inside code, existing links, and images stays literal.
fn decorate_text(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut finder = LinkFinder::new();
    finder.kinds(&[LinkKind::Url]);

    let mut out = Vec::with_capacity(events.len());
    let mut literal = 0usize;
    for event in events {
        match event {
            Event::Start(tag @ (Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_))) => {
                literal += 1;
                out.push(Event::Start(tag));
            }
            Event::End(end @ (TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock)) => {
                literal = literal.saturating_sub(1);
                out.push(Event::End(end));
            }
            Event::Text(text) if literal == 0 => decorate(&text, &finder, &mut out),
            other => out.push(other),
        }
    }
    out
}

fn decorate<'a>(text: &str, finder: &LinkFinder, out: &mut Vec<Event<'a>>) {
    for span in finder.spans(text) {
        match span.kind() {
            Some(LinkKind::Url) => {
                let url = span.as_str().to_owned();
                out.push(Event::Start(Tag::Link {
                    link_type: LinkType::Autolink,
                    dest_url: CowStr::from(url.clone()),
                    title: CowStr::Borrowed(""),
                    id: CowStr::Borrowed(""),
                }));
                out.push(Event::Text(CowStr::from(url)));
                out.push(Event::End(TagEnd::Link));
            }
            _ => out.push(Event::Text(CowStr::from(smart_fractions(span.as_str())))),
        }
    }
}

/// Replace standalone `1/2`, `1/4`, `3/4` with their single glyphs. A
/// candidate flanked by another digit (or a further slash) is not a
/// fraction: `11/22` and `1/25` stay as written.
fn smart_fractions(text: &str) -> String {
    const FRACTIONS: [(&str, &str); 3] = [("1/2", "½"), ("1/4", "¼"), ("3/4", "¾")];
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    'scan: while i < bytes.len() {
        for (plain, glyph) in FRACTIONS {
            if text[i..].starts_with(plain) {
                let before_ok = i == 0 || !bytes[i - 1].is_ascii_digit();
                let after = i + plain.len();
                let after_ok =
                    after >= bytes.len() || !(bytes[after].is_ascii_digit() || bytes[after] == b'/');
                if before_ok && after_ok {
                    out.push_str(glyph);
                    i = after;
                    continue 'scan;
                }
            }
        }
        let ch = text[i..].chars().next().unwrap();
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}
