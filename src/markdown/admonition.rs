//! Renders GitHub-style alert blockquotes as callout blocks:
//!
//! ```markdown
//! > [!WARNING]
//! > Back up your data first.
//! ```
//!
//! becomes `<div class="admonition warning">` with a title paragraph.

use super::{RenderContext, Transform};
use pulldown_cmark::{BlockQuoteKind, CowStr, Event, Tag, TagEnd};

pub struct Admonitions;

impl Transform for Admonitions {
    fn process<'a>(&self, events: Vec<Event<'a>>, _: &mut RenderContext<'_>) -> Vec<Event<'a>> {
        events
            .into_iter()
            .map(|event| match event {
                Event::Start(Tag::BlockQuote(Some(kind))) => Event::Html(CowStr::from(open(kind))),
                Event::End(TagEnd::BlockQuote(Some(_))) => Event::Html(CowStr::Borrowed("</div>\n")),
                event => event,
            })
            .collect()
    }
}

fn open(kind: BlockQuoteKind) -> String {
    let (class, title) = match kind {
        BlockQuoteKind::Note => ("note", "Note"),
        BlockQuoteKind::Tip => ("tip", "Tip"),
        BlockQuoteKind::Important => ("important", "Important"),
        BlockQuoteKind::Warning => ("warning", "Warning"),
        BlockQuoteKind::Caution => ("caution", "Caution"),
    };
    format!(
        "<div class=\"admonition {}\">\n<p class=\"admonition-title\">{}</p>\n",
        class, title
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::markdown::Markdown;
    use pretty_assertions::assert_eq;

    fn admonitions(markdown: &str) -> String {
        let site = crate::markdown::test::site();
        let mut context = RenderContext::new(&site, "index.md");
        Markdown::with_transforms(vec![Box::new(Admonitions)]).convert(markdown, &mut context)
    }

    #[test]
    fn test_note() {
        assert_eq!(
            "<div class=\"admonition note\">\n<p class=\"admonition-title\">Note</p>\n\
             <p>Heads up.</p>\n</div>\n",
            admonitions("> [!NOTE]\n> Heads up.")
        );
    }

    #[test]
    fn test_every_kind() {
        for (marker, class) in [
            ("NOTE", "note"),
            ("TIP", "tip"),
            ("IMPORTANT", "important"),
            ("WARNING", "warning"),
            ("CAUTION", "caution"),
        ] {
            let html = admonitions(&format!("> [!{}]\n> text", marker));
            assert!(
                html.starts_with(&format!("<div class=\"admonition {}\">", class)),
                "{}",
                html
            );
        }
    }

    #[test]
    fn test_plain_blockquote_is_untouched() {
        assert_eq!(
            "<blockquote><p>Quoted.</p>\n</blockquote>\n",
            admonitions("> Quoted.")
        );
    }
}
