//! Rewrites link and image targets that refer to other source files into
//! the public URL of whatever was built from them.

use super::{RenderContext, Transform};
use crate::site::{Warning, WarningKind};
use crate::url::{Conversion, Converter};
use pulldown_cmark::{CowStr, Event, LinkType, Tag};
use tracing::warn;

/// Resolves `guide/setup.md`-style targets against the documents, then the
/// assets, of the site. Targets that resolve to nothing become `#` and are
/// recorded as [`WarningKind::DeadLink`].
pub struct LinkRewriter;

impl Transform for LinkRewriter {
    fn process<'a>(&self, events: Vec<Event<'a>>, context: &mut RenderContext<'_>) -> Vec<Event<'a>> {
        events
            .into_iter()
            .map(|event| match event {
                // `<docs@example.com>` has no path to resolve.
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) if link_type != LinkType::Email => Event::Start(Tag::Link {
                    link_type,
                    dest_url: rewrite(dest_url, context),
                    title,
                    id,
                }),
                Event::Start(Tag::Image {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => Event::Start(Tag::Image {
                    link_type,
                    dest_url: rewrite(dest_url, context),
                    title,
                    id,
                }),
                event => event,
            })
            .collect()
    }
}

fn rewrite<'a>(target: CowStr<'a>, context: &mut RenderContext<'_>) -> CowStr<'a> {
    let documents = context.documents;
    let assets = context.assets;
    let conversion = Converter::new(context.source_path).convert(&target, |path| {
        match documents.lookup_path(path) {
            Some(id) => Some(documents.get(id).url.clone()),
            None => assets.lookup_path(path).map(|asset| asset.url.clone()),
        }
    });

    match conversion {
        Conversion::Unchanged => target,
        Conversion::Resolved(url) => CowStr::from(url),
        Conversion::Missing(path) => {
            warn!(
                "Document '{}' links to '{}' but '{}' doesn't exist",
                context.source_path, target, path
            );
            context.warnings.push(Warning {
                kind: WarningKind::DeadLink,
                origin: context.source_path.to_owned(),
                target: target.to_string(),
            });
            CowStr::Borrowed("#")
        }
    }
}
