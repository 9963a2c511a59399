//! Converts the site model into [`gtmpl`] [`Value`]s. A page is rendered
//! against an object with two fields:
//!
//! * `site`: `name`, `url`, `context`, `nav` (nested items with `title`,
//!   `url`, `level`, `is_active`, `is_header`, `children`) and `pages` (each
//!   with `url` and `path`).
//! * `page`: `url`, `path`, `title`, `content`, `text`, `is_homepage`,
//!   `sections` (`title`, `id`, `level`), `breadcrumbs` (`title`, `url`) and
//!   `previous`/`next` (`title`, `url`, or nil at either end).

use crate::nav::{NavId, NavNode, Navigation};
use crate::site::{DocId, Document, Section, Site};
use gtmpl_value::Value;
use std::collections::HashMap;

/// Builds the context for rendering `document`.
pub fn render_context(site: &Site, document: DocId) -> Value {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("site".to_owned(), site_value(site));
    m.insert("page".to_owned(), page_value(site, document));
    Value::Object(m)
}

pub fn site_value(site: &Site) -> Value {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("name".to_owned(), (&site.name).into());
    m.insert("url".to_owned(), (&site.url).into());
    m.insert(
        "context".to_owned(),
        yaml_value(&serde_yaml::Value::Mapping(site.context.clone())),
    );
    m.insert(
        "nav".to_owned(),
        Value::Array(
            site.navigation
                .roots()
                .iter()
                .map(|id| nav_value(&site.navigation, *id))
                .collect(),
        ),
    );
    m.insert(
        "pages".to_owned(),
        Value::Array(
            site.documents
                .iter()
                .map(|document| {
                    let mut page: HashMap<String, Value> = HashMap::new();
                    page.insert("url".to_owned(), (&document.url).into());
                    page.insert("path".to_owned(), (&document.path).into());
                    Value::Object(page)
                })
                .collect(),
        ),
    );
    Value::Object(m)
}

fn nav_value(navigation: &Navigation, id: NavId) -> Value {
    let node = navigation.get(id);
    let mut m = link(node);
    m.insert("level".to_owned(), Value::from(node.level as u64));
    m.insert("is_active".to_owned(), Value::Bool(node.is_active));
    m.insert("is_header".to_owned(), Value::Bool(node.is_header));
    m.insert(
        "children".to_owned(),
        Value::Array(
            node.children
                .iter()
                .map(|child| nav_value(navigation, *child))
                .collect(),
        ),
    );
    Value::Object(m)
}

fn link(node: &NavNode) -> HashMap<String, Value> {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("title".to_owned(), (&node.title).into());
    m.insert("url".to_owned(), (&node.url).into());
    m
}

pub fn page_value(site: &Site, id: DocId) -> Value {
    let document = site.documents.get(id);
    let navigation = &site.navigation;
    let node = document.navigation.map(|nav| navigation.get(nav));
    let neighbour = |pick: fn(&NavNode) -> Option<NavId>| match node.and_then(pick) {
        Some(nav) => Value::Object(link(navigation.get(nav))),
        None => Value::Nil,
    };

    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("url".to_owned(), (&document.url).into());
    m.insert("path".to_owned(), (&document.path).into());
    m.insert("title".to_owned(), page_title(document, node).into());
    m.insert("content".to_owned(), (&document.html).into());
    m.insert("text".to_owned(), (&document.text).into());
    m.insert("is_homepage".to_owned(), Value::Bool(document.is_homepage()));
    m.insert(
        "sections".to_owned(),
        Value::Array(document.sections.iter().map(section_value).collect()),
    );
    m.insert(
        "breadcrumbs".to_owned(),
        Value::Array(match document.navigation {
            Some(nav) => navigation
                .breadcrumbs(nav)
                .into_iter()
                .map(|crumb| Value::Object(link(navigation.get(crumb))))
                .collect(),
            None => Vec::new(),
        }),
    );
    m.insert("previous".to_owned(), neighbour(|node| node.previous));
    m.insert("next".to_owned(), neighbour(|node| node.next));
    Value::Object(m)
}

/// The navigation title, else the first heading, else the source path.
fn page_title(document: &Document, node: Option<&NavNode>) -> String {
    if let Some(node) = node {
        return node.title.clone();
    }
    match document.sections.first() {
        Some(section) => section.title.clone(),
        None => document.path.clone(),
    }
}

fn section_value(section: &Section) -> Value {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("title".to_owned(), (&section.title).into());
    m.insert("id".to_owned(), (&section.id).into());
    m.insert("level".to_owned(), Value::from(section.level as u64));
    Value::Object(m)
}

/// Converts free-form configuration values. Mapping keys that aren't
/// scalars are dropped.
pub fn yaml_value(value: &serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;
    match value {
        Yaml::Null => Value::Nil,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Value::from(i),
            (None, Some(f)) => Value::from(f),
            (None, None) => Value::String(n.to_string()),
        },
        Yaml::String(s) => s.into(),
        Yaml::Sequence(items) => Value::Array(items.iter().map(yaml_value).collect()),
        Yaml::Mapping(mapping) => {
            let mut m: HashMap<String, Value> = HashMap::new();
            for (key, value) in mapping {
                let key = match key {
                    Yaml::String(s) => s.clone(),
                    Yaml::Number(n) => n.to_string(),
                    Yaml::Bool(b) => b.to_string(),
                    _ => continue,
                };
                m.insert(key, yaml_value(value));
            }
            Value::Object(m)
        }
        Yaml::Tagged(tagged) => yaml_value(&tagged.value),
    }
}
