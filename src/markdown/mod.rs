//! Converts a document's markdown into HTML. The text is parsed into a flat
//! list of [`pulldown_cmark`] events which is handed through an ordered list
//! of [`Transform`] passes (auto-linking, admonitions, link rewriting and
//! section extraction) before [`crate::htmlrenderer`] writes it out.
//!
//! Passes that need to know which document is being rendered read it from
//! the [`RenderContext`] they are given, and record what they find
//! ([`Section`]s, dead links) back onto it. A context lives for exactly one
//! conversion.

mod admonition;
mod autolink;
mod links;
mod sections;

pub use admonition::Admonitions;
pub use autolink::Autolink;
pub use links::LinkRewriter;
pub use sections::{SectionExtractor, UniqueSlugs};

use crate::htmlrenderer::push_html;
use crate::site::{Assets, Documents, Section, Site, Warning};
use pulldown_cmark::{Event, Options, Parser, TextMergeStream};

/// State scoped to the conversion of a single document.
pub struct RenderContext<'s> {
    pub documents: &'s Documents,
    pub assets: &'s Assets,

    /// The docs-relative path of the document being converted. Relative
    /// link targets are resolved against its directory.
    pub source_path: &'s str,

    /// Filled in by [`SectionExtractor`].
    pub sections: Vec<Section>,

    /// Dead links found by [`LinkRewriter`].
    pub warnings: Vec<Warning>,
}

impl<'s> RenderContext<'s> {
    pub fn new(site: &'s Site, source_path: &'s str) -> RenderContext<'s> {
        RenderContext {
            documents: &site.documents,
            assets: &site.assets,
            source_path,
            sections: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// One pass over the parsed event stream.
pub trait Transform {
    fn process<'a>(&self, events: Vec<Event<'a>>, context: &mut RenderContext<'_>) -> Vec<Event<'a>>;
}

/// A markdown-to-HTML converter made of ordered [`Transform`] passes.
pub struct Markdown {
    options: Options,
    transforms: Vec<Box<dyn Transform>>,
}

impl Markdown {
    /// Creates a converter running the standard passes.
    pub fn new() -> Markdown {
        Markdown::with_transforms(vec![
            Box::new(Autolink),
            Box::new(Admonitions),
            Box::new(LinkRewriter),
            Box::new(SectionExtractor),
        ])
    }

    /// Creates a converter running `transforms` in order.
    pub fn with_transforms(transforms: Vec<Box<dyn Transform>>) -> Markdown {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_GFM);
        Markdown {
            options,
            transforms,
        }
    }

    /// Converts `markdown` to HTML. Sections and warnings end up in
    /// `context`.
    pub fn convert(&self, markdown: &str, context: &mut RenderContext<'_>) -> String {
        // Merging adjacent text events keeps bare URLs in one piece.
        let mut events: Vec<Event> =
            TextMergeStream::new(Parser::new_ext(markdown, self.options)).collect();
        for transform in &self.transforms {
            events = transform.process(events, context);
        }

        let mut html = String::with_capacity(markdown.len() * 3 / 2);
        push_html(&mut html, events.into_iter());
        html
    }
}

impl Default for Markdown {
    fn default() -> Markdown {
        Markdown::new()
    }
}
