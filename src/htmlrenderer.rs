//! Implements a custom [`push_html`] over [`pulldown_cmark`] events. Unlike
//! the stock renderer it writes the `id` attribute assigned to headings by
//! [`crate::markdown::SectionExtractor`], and it emits admonition markup as raw HTML
//! events produced upstream, so the transform passes stay independent of the
//! output format.

use pulldown_cmark::{Alignment, CodeBlockKind, Event, LinkType, Tag, TagEnd};
use std::fmt::{self, Write};

/// Escapes text for use in HTML element content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Escapes a URL for use in an `href`/`src` attribute. Characters that are
/// already valid in URLs are left alone so existing percent-escapes survive.
pub fn escape_href(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("%22"),
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            '\'' => out.push_str("&#x27;"),
            ' ' => out.push_str("%20"),
            c => out.push(c),
        }
    }
    out
}

enum TableState {
    Head,
    Body,
}

/// Renders markdown [`Event`]s into HTML. This is largely modeled after
/// [`pulldown_cmark`]'s private `HtmlWriter`.
struct HtmlRenderer {
    table_alignments: Vec<Alignment>,
    table_state: TableState,
    table_cell_index: usize,

    /// Alt text being collected for an open image, with its `src` and
    /// `title`. Images are written on [`TagEnd::Image`].
    image: Option<(String, String, String)>,
}

impl HtmlRenderer {
    fn new() -> Self {
        HtmlRenderer {
            table_alignments: Vec::default(),
            table_state: TableState::Head,
            table_cell_index: usize::default(),
            image: None,
        }
    }

    fn on_event<W: Write>(&mut self, w: &mut W, event: Event) -> fmt::Result {
        if let Some((_, alt, _)) = &mut self.image {
            match event {
                Event::Text(text) | Event::Code(text) => {
                    alt.push_str(&text);
                    return Ok(());
                }
                Event::End(TagEnd::Image) => {}
                _ => return Ok(()),
            }
        }

        match event {
            Event::Start(tag) => self.on_start(w, tag),
            Event::End(tag) => self.on_end(w, tag),
            Event::Code(code) => write!(w, "<code>{}</code>", escape_html(&code)),
            Event::FootnoteReference(name) => {
                let name = escape_html(&name);
                write!(
                    w,
                    r##"<sup class="footnote-reference"><a href="#fn-{}">{}</a></sup>"##,
                    name, name,
                )
            }
            Event::HardBreak => w.write_str("<br />"),
            Event::Html(html) | Event::InlineHtml(html) => w.write_str(&html),
            Event::Rule => w.write_str("<hr />"),
            Event::SoftBreak => w.write_str("\n"),
            Event::TaskListMarker(checked) => write!(
                w,
                r#"<input disabled="" type="checkbox" {}/>"#,
                match checked {
                    true => r#"checked="" "#,
                    false => "",
                }
            ),
            Event::Text(text) => w.write_str(&escape_html(&text)),
            Event::InlineMath(math) => {
                write!(w, r#"<span class="math inline">{}</span>"#, escape_html(&math))
            }
            Event::DisplayMath(math) => {
                write!(w, r#"<span class="math display">{}</span>"#, escape_html(&math))
            }
        }
    }

    fn on_start<W: Write>(&mut self, w: &mut W, tag: Tag) -> fmt::Result {
        match tag {
            Tag::Paragraph => w.write_str("<p>"),
            Tag::Heading { level, id, .. } => match id {
                Some(id) => write!(w, r#"<{} id="{}">"#, level, escape_html(&id)),
                None => write!(w, "<{}>", level),
            },
            Tag::BlockQuote(_) => w.write_str("<blockquote>"),
            Tag::CodeBlock(kind) => match kind {
                CodeBlockKind::Fenced(info) => {
                    match info.split(' ').next().unwrap_or_default() {
                        "" => w.write_str("<pre><code>"),
                        lang => write!(
                            w,
                            r#"<pre><code class="language-{}">"#,
                            escape_html(lang)
                        ),
                    }
                }
                CodeBlockKind::Indented => w.write_str("<pre><code>"),
            },
            Tag::HtmlBlock | Tag::MetadataBlock(_) => Ok(()),
            Tag::List(None) => w.write_str("<ul>"),
            Tag::List(Some(1)) => w.write_str("<ol>"),
            Tag::List(Some(start)) => write!(w, r#"<ol start="{}">"#, start),
            Tag::Item => w.write_str("<li>"),
            Tag::FootnoteDefinition(name) => {
                let name = escape_html(&name);
                write!(
                    w,
                    r#"<div class="footnote-definition" id="fn-{}">{}. &nbsp;"#,
                    name, name,
                )
            }
            Tag::DefinitionList => w.write_str("<dl>"),
            Tag::DefinitionListTitle => w.write_str("<dt>"),
            Tag::DefinitionListDefinition => w.write_str("<dd>"),
            Tag::Table(alignments) => {
                self.table_alignments = alignments;
                w.write_str("<table>")
            }
            Tag::TableHead => {
                self.table_state = TableState::Head;
                self.table_cell_index = 0;
                w.write_str("<thead><tr>")
            }
            Tag::TableRow => {
                self.table_cell_index = 0;
                w.write_str("<tr>")
            }
            Tag::TableCell => write!(
                w,
                "<{}{}>",
                match self.table_state {
                    TableState::Head => "th",
                    TableState::Body => "td",
                },
                match self.table_alignments.get(self.table_cell_index) {
                    Some(Alignment::Left) => r#" style="text-align: left""#,
                    Some(Alignment::Right) => r#" style="text-align: right""#,
                    Some(Alignment::Center) => r#" style="text-align: center""#,
                    _ => "",
                }
            ),
            Tag::Emphasis => w.write_str("<em>"),
            Tag::Strong => w.write_str("<strong>"),
            Tag::Strikethrough => w.write_str("<del>"),
            Tag::Superscript => w.write_str("<sup>"),
            Tag::Subscript => w.write_str("<sub>"),
            Tag::Link {
                link_type: LinkType::Email,
                dest_url,
                title,
                ..
            } => write!(
                w,
                r#"<a href="mailto:{}"{}>"#,
                escape_href(&dest_url),
                title_attribute(&title),
            ),
            Tag::Link {
                dest_url, title, ..
            } => write!(
                w,
                r#"<a href="{}"{}>"#,
                escape_href(&dest_url),
                title_attribute(&title),
            ),
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image = Some((dest_url.to_string(), String::new(), title.to_string()));
                Ok(())
            }
        }
    }

    fn on_end<W: Write>(&mut self, w: &mut W, tag: TagEnd) -> fmt::Result {
        match tag {
            TagEnd::Paragraph => w.write_str("</p>\n"),
            TagEnd::Heading(level) => write!(w, "</{}>\n", level),
            TagEnd::BlockQuote(_) => w.write_str("</blockquote>\n"),
            TagEnd::CodeBlock => w.write_str("</code></pre>\n"),
            TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => Ok(()),
            TagEnd::List(true) => w.write_str("</ol>\n"),
            TagEnd::List(false) => w.write_str("</ul>\n"),
            TagEnd::Item => w.write_str("</li>\n"),
            TagEnd::FootnoteDefinition => w.write_str("</div>\n"),
            TagEnd::DefinitionList => w.write_str("</dl>\n"),
            TagEnd::DefinitionListTitle => w.write_str("</dt>\n"),
            TagEnd::DefinitionListDefinition => w.write_str("</dd>\n"),
            TagEnd::Table => w.write_str("</tbody></table>\n"),
            TagEnd::TableHead => {
                self.table_state = TableState::Body;
                w.write_str("</tr></thead><tbody>\n")
            }
            TagEnd::TableRow => w.write_str("</tr>\n"),
            TagEnd::TableCell => {
                self.table_cell_index += 1;
                w.write_str(match self.table_state {
                    TableState::Head => "</th>",
                    TableState::Body => "</td>",
                })
            }
            TagEnd::Emphasis => w.write_str("</em>"),
            TagEnd::Strong => w.write_str("</strong>"),
            TagEnd::Strikethrough => w.write_str("</del>"),
            TagEnd::Superscript => w.write_str("</sup>"),
            TagEnd::Subscript => w.write_str("</sub>"),
            TagEnd::Link => w.write_str("</a>"),
            TagEnd::Image => match self.image.take() {
                Some((src, alt, title)) => write!(
                    w,
                    r#"<img src="{}" alt="{}"{} />"#,
                    escape_href(&src),
                    escape_html(&alt),
                    title_attribute(&title),
                ),
                None => Ok(()),
            },
        }
    }
}

fn title_attribute(title: &str) -> String {
    match title.is_empty() {
        true => String::new(),
        false => format!(r#" title="{}""#, escape_html(title)),
    }
}

/// Converts [`Event`]s into an HTML string, appending to `out`.
pub fn push_html<'a, I>(out: &mut String, events: I)
where
    I: Iterator<Item = Event<'a>>,
{
    let mut renderer = HtmlRenderer::new();
    for event in events {
        // Writing into a `String` never fails.
        let _ = renderer.on_event(out, event);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pulldown_cmark::{CowStr, HeadingLevel, Options, Parser};

    fn render(events: Vec<Event>) -> String {
        let mut out = String::new();
        push_html(&mut out, events.into_iter());
        out
    }

    fn markdown(input: &str) -> String {
        let mut out = String::new();
        push_html(&mut out, Parser::new_ext(input, Options::ENABLE_TABLES));
        out
    }

    #[test]
    fn test_paragraph() {
        assert_eq!("<p>Hello, <em>world</em>!</p>\n", markdown("Hello, *world*!"));
    }

    #[test]
    fn test_heading_with_id() {
        let html = render(vec![
            Event::Start(Tag::Heading {
                level: HeadingLevel::H2,
                id: Some(CowStr::from("setup")),
                classes: Vec::new(),
                attrs: Vec::new(),
            }),
            Event::Text(CowStr::from("Setup")),
            Event::End(TagEnd::Heading(HeadingLevel::H2)),
        ]);
        assert_eq!("<h2 id=\"setup\">Setup</h2>\n", html);
    }

    #[test]
    fn test_fenced_code_block() {
        let html = markdown("```rust\nfn main() {}\n```");
        assert_eq!(
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n",
            html
        );
    }

    #[test]
    fn test_table() {
        let html = markdown("| A | B |\n|:--|--:|\n| 1 | 2 |");
        assert!(html.contains("<thead><tr><th style=\"text-align: left\">A</th>"));
        assert!(html.contains("<td style=\"text-align: right\">2</td>"));
        assert!(html.ends_with("</tbody></table>\n"));
    }

    #[test]
    fn test_image_alt_text() {
        let html = markdown("![A *fine* logo](logo.png \"Logo\")");
        assert_eq!(
            "<p><img src=\"logo.png\" alt=\"A fine logo\" title=\"Logo\" /></p>\n",
            html
        );
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!("<p>a &lt;b&gt; &amp; c</p>\n", markdown("a \\<b\\> & c"));
    }

    #[test]
    fn test_link() {
        assert_eq!(
            "<p><a href=\"/about/\">About</a></p>\n",
            markdown("[About](/about/)")
        );
    }
}
