//! The navigation tree. A declarative description ([`NavEntry`], parsed from
//! the `nav` configuration key) is linked against the site's [`Documents`]
//! into a [`Navigation`]: an arena of [`NavNode`]s owned top-down through
//! `children`, with `parent`, `previous`, `next` and `document` held as plain
//! indices.
//!
//! ```yaml
//! nav:
//!   - Home: index.md
//!   - Guide:
//!       - Setup: guide/setup.md
//!       - Usage: guide/usage.md
//! ```

use crate::site::{DocId, Documents, Warning, WarningKind};
use serde_yaml::Value;
use tracing::warn;

/// Stable index of a [`NavNode`] inside its [`Navigation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NavId(usize);

/// One entry of the navigation declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavEntry {
    /// A header grouping nested entries.
    Group {
        title: String,
        children: Vec<NavEntry>,
    },

    /// A link to the document at `path` (relative to the docs directory).
    Page { title: String, path: String },
}

impl NavEntry {
    /// Parses the value of the `nav` key: a sequence of single-key mappings
    /// whose values are either a nested sequence or a document path. A
    /// missing (`null`) declaration is an empty navigation.
    pub fn parse_all(value: &Value) -> Result<Vec<NavEntry>> {
        match value {
            Value::Null => Ok(Vec::new()),
            value => Self::parse_sequence(value, "nav"),
        }
    }

    fn parse_sequence(value: &Value, location: &str) -> Result<Vec<NavEntry>> {
        match value {
            Value::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| Self::parse(item, &format!("{}[{}]", location, i)))
                .collect(),
            _ => Err(Error::NotASequence {
                location: location.to_owned(),
            }),
        }
    }

    fn parse(value: &Value, location: &str) -> Result<NavEntry> {
        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            _ => {
                return Err(Error::NotAMapping {
                    location: location.to_owned(),
                })
            }
        };
        if mapping.len() != 1 {
            return Err(Error::KeyCount {
                location: location.to_owned(),
                count: mapping.len(),
            });
        }

        // Exactly one entry, checked above.
        let (key, value) = match mapping.iter().next() {
            Some(entry) => entry,
            None => {
                return Err(Error::KeyCount {
                    location: location.to_owned(),
                    count: 0,
                })
            }
        };
        let title = match key {
            Value::String(title) => title.clone(),
            _ => {
                return Err(Error::TitleNotAString {
                    location: location.to_owned(),
                })
            }
        };

        match value {
            Value::Sequence(_) => Ok(NavEntry::Group {
                children: Self::parse_sequence(value, &format!("{}.{}", location, title))?,
                title,
            }),
            Value::String(path) => Ok(NavEntry::Page {
                title,
                path: path.clone(),
            }),
            _ => Err(Error::InvalidValue {
                location: location.to_owned(),
                title,
            }),
        }
    }
}

/// One entry in the navigation tree: a header or a page link.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavNode {
    pub title: String,

    /// Nesting depth, starting at 1 for top-level entries.
    pub level: usize,

    /// The linked document's URL. Empty for headers and for links whose
    /// document doesn't exist.
    pub url: String,

    /// Whether this entry groups children rather than linking a page.
    pub is_header: bool,

    pub document: Option<DocId>,
    pub parent: Option<NavId>,
    pub previous: Option<NavId>,
    pub next: Option<NavId>,
    pub children: Vec<NavId>,

    /// Set while the linked document, or one of its descendants in the
    /// tree, is being rendered.
    pub is_active: bool,
}

/// The navigation tree as an arena of [`NavNode`]s.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Navigation {
    nodes: Vec<NavNode>,
    roots: Vec<NavId>,
}

impl Navigation {
    pub fn get(&self, id: NavId) -> &NavNode {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NavId) -> &mut NavNode {
        &mut self.nodes[id.0]
    }

    /// The top-level entries in declaration order.
    pub fn roots(&self) -> &[NavId] {
        &self.roots
    }

    /// Every node in creation (document) order.
    pub fn iter(&self) -> impl Iterator<Item = (NavId, &NavNode)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NavId(i), node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `id` and all of its ancestors, root first. `parent` links
    /// always point at nodes created earlier, so the walk terminates.
    pub fn breadcrumbs(&self, id: NavId) -> Vec<NavId> {
        let mut breadcrumbs = vec![id];
        let mut current = id;
        while let Some(parent) = self.get(current).parent {
            breadcrumbs.push(parent);
            current = parent;
        }
        breadcrumbs.reverse();
        breadcrumbs
    }

    fn push(&mut self, node: NavNode) -> NavId {
        let id = NavId(self.nodes.len());
        if let Some(parent) = node.parent {
            self.nodes[parent.0].children.push(id);
        }
        self.nodes.push(node);
        id
    }
}

/// Links `entries` into a [`Navigation`], pointing each resolved document
/// back at its entry. Entries naming missing documents get an empty URL and
/// are reported as [`Warning`]s rather than failing the build.
pub fn load_navigation(entries: &[NavEntry], documents: &mut Documents) -> (Navigation, Vec<Warning>) {
    let mut builder = Builder {
        navigation: Navigation::default(),
        documents,
        warnings: Vec::new(),
    };
    let (roots, _) = builder.load(entries, 1, None, None);
    builder.navigation.roots = roots;
    (builder.navigation, builder.warnings)
}

struct Builder<'a> {
    navigation: Navigation,
    documents: &'a mut Documents,
    warnings: Vec<Warning>,
}

impl Builder<'_> {
    /// Loads one nesting level. `current` is the most recently created page
    /// link across the whole traversal so far, which lets previous/next
    /// links cross group boundaries. Returns the ids created at this level
    /// and the new `current`.
    fn load(
        &mut self,
        entries: &[NavEntry],
        level: usize,
        parent: Option<NavId>,
        mut current: Option<NavId>,
    ) -> (Vec<NavId>, Option<NavId>) {
        let mut ids = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                NavEntry::Group { title, children } => {
                    let header = self.navigation.push(NavNode {
                        title: title.clone(),
                        level,
                        is_header: true,
                        parent,
                        ..NavNode::default()
                    });
                    ids.push(header);
                    let (_, last) = self.load(children, level + 1, Some(header), current);
                    current = last;
                }
                NavEntry::Page { title, path } => {
                    let referenced = self.documents.lookup_path(path);
                    let url = match referenced {
                        Some(id) => self.documents.get(id).url.clone(),
                        None => {
                            warn!("Navigation entry '{}' references missing document '{}'", title, path);
                            self.warnings.push(Warning {
                                kind: WarningKind::UnresolvedNavigation,
                                origin: title.clone(),
                                target: path.clone(),
                            });
                            String::new()
                        }
                    };

                    let nav = self.navigation.push(NavNode {
                        title: title.clone(),
                        level,
                        url,
                        document: referenced,
                        parent,
                        previous: current,
                        ..NavNode::default()
                    });
                    ids.push(nav);
                    if let Some(previous) = current {
                        self.navigation.get_mut(previous).next = Some(nav);
                    }
                    if let Some(id) = referenced {
                        self.documents.get_mut(id).navigation = Some(nav);
                    }
                    current = Some(nav);
                }
            }
        }
        (ids, current)
    }
}

/// The result of parsing a navigation declaration.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a malformed navigation declaration. `location` is a path into
/// the declaration such as `nav[1].Guide[0]`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{location}: expected a sequence of entries")]
    NotASequence { location: String },

    #[error("{location}: expected a mapping of title to page or entries")]
    NotAMapping { location: String },

    #[error("{location}: expected exactly one title per entry, found {count}")]
    KeyCount { location: String, count: usize },

    #[error("{location}: entry title must be a string")]
    TitleNotAString { location: String },

    #[error("{location}: '{title}' must map to a document path or a sequence of entries")]
    InvalidValue { location: String, title: String },
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::site::Document;

    fn documents(paths: &[(&str, &str)]) -> Documents {
        Documents::new(
            paths
                .iter()
                .map(|(path, url)| Document::new(url.to_string(), path.to_string()))
                .collect(),
        )
        .unwrap()
    }

    fn entries(yaml: &str) -> Vec<NavEntry> {
        NavEntry::parse_all(&serde_yaml::from_str(yaml).unwrap()).unwrap()
    }

    fn find(navigation: &Navigation, title: &str) -> NavId {
        navigation
            .iter()
            .find(|(_, node)| node.title == title)
            .map(|(id, _)| id)
            .unwrap()
    }

    #[test]
    fn test_parse_entries() -> Result<()> {
        let value: Value = serde_yaml::from_str(
            "- Home: index.md\n- Guide:\n    - Setup: guide/setup.md\n",
        )
        .unwrap();
        assert_eq!(
            vec![
                NavEntry::Page {
                    title: "Home".to_owned(),
                    path: "index.md".to_owned()
                },
                NavEntry::Group {
                    title: "Guide".to_owned(),
                    children: vec![NavEntry::Page {
                        title: "Setup".to_owned(),
                        path: "guide/setup.md".to_owned()
                    }],
                },
            ],
            NavEntry::parse_all(&value)?
        );
        Ok(())
    }

    #[test]
    fn test_parse_rejects_multiple_keys() {
        let value: Value = serde_yaml::from_str("- {Home: index.md, About: about.md}").unwrap();
        assert!(matches!(
            NavEntry::parse_all(&value),
            Err(Error::KeyCount { count: 2, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_invalid_value() {
        let value: Value = serde_yaml::from_str("- Guide:\n    - Setup: 3\n").unwrap();
        match NavEntry::parse_all(&value) {
            Err(Error::InvalidValue { location, title }) => {
                assert_eq!("nav[0].Guide[0]", location);
                assert_eq!("Setup", title);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_non_sequence() {
        let value: Value = serde_yaml::from_str("Home: index.md").unwrap();
        assert!(matches!(
            NavEntry::parse_all(&value),
            Err(Error::NotASequence { .. })
        ));
    }

    #[test]
    fn test_parse_null_is_empty() -> Result<()> {
        assert!(NavEntry::parse_all(&Value::Null)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_links_tree_and_documents() {
        let mut docs = documents(&[("index.md", "/"), ("guide/setup.md", "/guide/setup/")]);
        let (navigation, warnings) = load_navigation(
            &entries("- Home: index.md\n- Guide:\n    - Setup: guide/setup.md\n"),
            &mut docs,
        );
        assert!(warnings.is_empty());

        let roots: Vec<&str> = navigation
            .roots()
            .iter()
            .map(|id| navigation.get(*id).title.as_str())
            .collect();
        assert_eq!(vec!["Home", "Guide"], roots);

        let guide = navigation.get(find(&navigation, "Guide"));
        assert!(guide.is_header);
        assert_eq!(1, guide.level);
        assert_eq!(1, guide.children.len());

        let setup_id = find(&navigation, "Setup");
        let setup = navigation.get(setup_id);
        assert_eq!("/guide/setup/", setup.url);
        assert_eq!(2, setup.level);
        assert_eq!(guide.children[0], setup_id);

        let doc = docs.lookup_path("guide/setup.md").unwrap();
        assert_eq!(Some(setup_id), docs.get(doc).navigation);
        assert_eq!(Some(doc), setup.document);
    }

    #[test]
    fn test_previous_next_chain_spans_groups() {
        let mut docs = documents(&[
            ("index.md", "/"),
            ("a.md", "/a/"),
            ("b/c.md", "/b/c/"),
            ("d.md", "/d/"),
        ]);
        let (navigation, _) = load_navigation(
            &entries("- Home: index.md\n- A: a.md\n- B:\n    - C: b/c.md\n- D: d.md\n"),
            &mut docs,
        );

        let leaves: Vec<NavId> = navigation
            .iter()
            .filter(|(_, node)| !node.is_header)
            .map(|(id, _)| id)
            .collect();
        assert_eq!(4, leaves.len());
        assert_eq!(None, navigation.get(leaves[0]).previous);
        assert_eq!(None, navigation.get(leaves[3]).next);
        for pair in leaves.windows(2) {
            assert_eq!(Some(pair[1]), navigation.get(pair[0]).next);
            assert_eq!(Some(pair[0]), navigation.get(pair[1]).previous);
        }

        let header = navigation.get(find(&navigation, "B"));
        assert_eq!(None, header.previous);
        assert_eq!(None, header.next);
    }

    #[test]
    fn test_missing_document_is_a_warning() {
        let mut docs = documents(&[("index.md", "/")]);
        let (navigation, warnings) =
            load_navigation(&entries("- Home: index.md\n- Gone: gone.md\n"), &mut docs);

        let gone = navigation.get(find(&navigation, "Gone"));
        assert_eq!("", gone.url);
        assert_eq!(None, gone.document);
        assert_eq!(
            vec![Warning {
                kind: WarningKind::UnresolvedNavigation,
                origin: "Gone".to_owned(),
                target: "gone.md".to_owned(),
            }],
            warnings
        );
    }

    #[test]
    fn test_breadcrumbs_are_root_first() {
        let mut docs = documents(&[("a/b/c.md", "/a/b/c/")]);
        let (navigation, _) = load_navigation(
            &entries("- A:\n    - B:\n        - C: a/b/c.md\n"),
            &mut docs,
        );
        let c = find(&navigation, "C");
        let titles: Vec<&str> = navigation
            .breadcrumbs(c)
            .into_iter()
            .map(|id| navigation.get(id).title.as_str())
            .collect();
        assert_eq!(vec!["A", "B", "C"], titles);
        assert_eq!(3, navigation.get(c).level);
    }
}
