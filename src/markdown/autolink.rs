//! Turns bare URLs in running text into links.

use super::{RenderContext, Transform};
use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::Regex;
use std::sync::LazyLock;

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b(?:https?://|www\.)[^\s<>"]+"#).unwrap());

/// Characters that end a sentence rather than a URL.
const TRAILING_PUNCTUATION: [char; 8] = ['.', ',', ':', ';', '!', '?', '\'', '*'];

/// Links `https://…`, `http://…` and `www.…` runs found in text events.
/// Text inside links, images, code blocks, HTML blocks and inline `<a>`
/// elements is left alone.
pub struct Autolink;

impl Transform for Autolink {
    fn process<'a>(&self, events: Vec<Event<'a>>, _: &mut RenderContext<'_>) -> Vec<Event<'a>> {
        let mut out = Vec::with_capacity(events.len());
        let mut opaque = 0usize;
        for event in events {
            match &event {
                Event::Start(
                    Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_) | Tag::HtmlBlock,
                ) => opaque += 1,
                Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock | TagEnd::HtmlBlock) => {
                    opaque = opaque.saturating_sub(1)
                }
                Event::InlineHtml(html) if is_tag(html, "<a") => opaque += 1,
                Event::InlineHtml(html) if is_tag(html, "</a") => opaque = opaque.saturating_sub(1),
                Event::Text(text) if opaque == 0 && URL.is_match(text) => {
                    linkify(text, &mut out);
                    continue;
                }
                _ => {}
            }
            out.push(event);
        }
        out
    }
}

/// Reports whether `html` opens with the tag `name`, so `<a` matches
/// `<a href="...">` but not `<abbr>`.
fn is_tag(html: &str, name: &str) -> bool {
    match html.get(..name.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(name) => html[name.len()..]
            .starts_with(|c: char| c == '>' || c.is_ascii_whitespace()),
        _ => false,
    }
}

fn linkify<'a>(text: &str, out: &mut Vec<Event<'a>>) {
    let mut last = 0;
    for found in URL.find_iter(text) {
        let url = trim_url(found.as_str());
        if url.is_empty() {
            continue;
        }
        let start = found.start();
        if start > last {
            out.push(Event::Text(CowStr::from(text[last..start].to_owned())));
        }

        let href = match url.starts_with("www.") {
            true => format!("http://{}", url),
            false => url.to_owned(),
        };
        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(href),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        out.push(Event::Text(CowStr::from(url.to_owned())));
        out.push(Event::End(TagEnd::Link));
        last = start + url.len();
    }
    if last < text.len() {
        out.push(Event::Text(CowStr::from(text[last..].to_owned())));
    }
}

/// Drops trailing punctuation, and closing parentheses that have no
/// opening partner inside the URL, e.g. `(see https://x.org/a).`.
fn trim_url(url: &str) -> &str {
    let mut url = url;
    loop {
        let mut trimmed = url.trim_end_matches(TRAILING_PUNCTUATION);
        if trimmed.ends_with(')') && trimmed.matches(')').count() > trimmed.matches('(').count() {
            trimmed = &trimmed[..trimmed.len() - 1];
        }
        if trimmed.len() == url.len() {
            return url;
        }
        url = trimmed;
    }
}
