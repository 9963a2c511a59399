//! Assigns every heading a unique anchor id and records it as a [`Section`].

use super::{RenderContext, Transform};
use crate::site::Section;
use pulldown_cmark::{CowStr, Event, HeadingLevel, Tag, TagEnd};
use std::collections::HashSet;

/// Hands out slugs that are unique within one document: the first
/// `Overview` gets `overview`, the next `overview-1`, then `overview-2`.
#[derive(Default)]
pub struct UniqueSlugs {
    used: HashSet<String>,
}

impl UniqueSlugs {
    pub fn make(&mut self, title: &str) -> String {
        let mut base = slug::slugify(title);
        if base.is_empty() {
            base = "section".to_owned();
        }

        let mut candidate = base.clone();
        let mut suffix = 0;
        while self.used.contains(&candidate) {
            suffix += 1;
            candidate = format!("{}-{}", base, suffix);
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

/// Collects each heading's text, gives the heading an `id` and stores the
/// resulting sections on the [`RenderContext`], replacing any from an
/// earlier render.
pub struct SectionExtractor;

impl Transform for SectionExtractor {
    fn process<'a>(&self, mut events: Vec<Event<'a>>, context: &mut RenderContext<'_>) -> Vec<Event<'a>> {
        let mut slugs = UniqueSlugs::default();
        let mut sections = Vec::new();

        // The index of the open heading's start event and its text so far.
        let mut open: Option<(usize, String)> = None;
        // Image alt text is not part of a heading's title.
        let mut images = 0usize;
        for i in 0..events.len() {
            let closed = match &events[i] {
                Event::Start(Tag::Heading { .. }) => {
                    open = Some((i, String::new()));
                    None
                }
                Event::Start(Tag::Image { .. }) => {
                    images += 1;
                    None
                }
                Event::End(TagEnd::Image) => {
                    images = images.saturating_sub(1);
                    None
                }
                Event::Text(text) | Event::Code(text) if images == 0 => {
                    if let Some((_, title)) = open.as_mut() {
                        title.push_str(text);
                    }
                    None
                }
                Event::End(TagEnd::Heading(level)) => Some(*level),
                _ => None,
            };

            let Some(level) = closed else { continue };
            let Some((start, title)) = open.take() else { continue };
            let title = title.trim().to_owned();
            let id = slugs.make(&title);
            if let Event::Start(Tag::Heading { id: slot, .. }) = &mut events[start] {
                *slot = Some(CowStr::from(id.clone()));
            }
            sections.push(Section {
                title,
                id,
                level: heading_level(level),
            });
        }

        context.sections = sections;
        events
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
