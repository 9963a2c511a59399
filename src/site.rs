//! Defines the in-memory model of one build or serve session: the [`Site`]
//! aggregate, its [`Documents`] and [`Assets`] collections, and the
//! [`Section`]s extracted from each document while it renders. The
//! navigation tree lives in [`crate::nav`] and is linked to documents by
//! [`DocId`]/[`NavId`] indices rather than references.

use crate::nav::{NavId, Navigation};
use serde_yaml::Mapping;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Stable index of a [`Document`] inside its [`Documents`] collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DocId(usize);

/// Stable index of an [`Asset`] inside its [`Assets`] collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AssetId(usize);

/// A static file that is copied or served verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Asset {
    /// The public URL, e.g. `/css/base.css`.
    pub url: String,

    /// The `/`-separated path relative to the directory the asset was found
    /// in. Doubles as the output path relative to the build directory.
    pub path: String,

    /// The file to read the asset's bytes from.
    pub source: PathBuf,
}

/// One markdown source file producing one HTML page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    /// The public URL, e.g. `/guide/setup/`.
    pub url: String,

    /// The `/`-separated path relative to the docs directory, e.g.
    /// `guide/setup.md`.
    pub path: String,

    /// The raw markdown as of the most recent render.
    pub text: String,

    /// The rendered HTML body as of the most recent render.
    pub html: String,

    /// Heading sections, replaced on every render.
    pub sections: Vec<Section>,

    /// The navigation entry pointing at this document, if any.
    pub navigation: Option<NavId>,
}

impl Document {
    pub fn new(url: String, path: String) -> Document {
        Document {
            url,
            path,
            ..Document::default()
        }
    }

    pub fn is_homepage(&self) -> bool {
        self.url == "/"
    }
}

/// A heading-derived table-of-contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub title: String,

    /// The anchor id, unique among the sections of one document.
    pub id: String,

    /// Heading level, 1 through 6.
    pub level: u8,
}

/// The documents of a site sorted by URL, indexed by URL and by source path.
#[derive(Debug, Default)]
pub struct Documents {
    all: Vec<Document>,
    by_url: HashMap<String, DocId>,
    by_path: HashMap<String, DocId>,
}

impl Documents {
    /// Sorts `documents` by URL and indexes them. Fails if two documents
    /// share a URL (e.g. `about.md` and `about/index.md`).
    pub fn new(mut documents: Vec<Document>) -> Result<Documents> {
        documents.sort_by(|a, b| a.url.cmp(&b.url));
        let mut by_url = HashMap::with_capacity(documents.len());
        let mut by_path = HashMap::with_capacity(documents.len());
        for (i, document) in documents.iter().enumerate() {
            if let Some(DocId(first)) = by_url.insert(document.url.clone(), DocId(i)) {
                return Err(Error::DuplicateUrl {
                    url: document.url.clone(),
                    first: documents[first].path.clone(),
                    second: document.path.clone(),
                });
            }
            by_path.insert(document.path.clone(), DocId(i));
        }
        Ok(Documents {
            all: documents,
            by_url,
            by_path,
        })
    }

    pub fn lookup_url(&self, url: &str) -> Option<DocId> {
        self.by_url.get(url).copied()
    }

    pub fn lookup_path(&self, path: &str) -> Option<DocId> {
        self.by_path.get(path).copied()
    }

    pub fn get(&self, id: DocId) -> &Document {
        &self.all[id.0]
    }

    pub fn get_mut(&mut self, id: DocId) -> &mut Document {
        &mut self.all[id.0]
    }

    /// Iterates over document ids in URL order.
    pub fn ids(&self) -> impl Iterator<Item = DocId> {
        (0..self.all.len()).map(DocId)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.all.iter()
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// The assets of a site sorted by URL, indexed by URL and by source path.
#[derive(Debug, Default)]
pub struct Assets {
    all: Vec<Asset>,
    by_url: HashMap<String, AssetId>,
    by_path: HashMap<String, AssetId>,
}

impl Assets {
    /// Sorts `assets` by URL and indexes them. Fails if two assets share a
    /// URL, which happens when the docs and statics directories both
    /// contain the same relative path.
    pub fn new(mut assets: Vec<Asset>) -> Result<Assets> {
        assets.sort_by(|a, b| a.url.cmp(&b.url));
        let mut by_url = HashMap::with_capacity(assets.len());
        let mut by_path = HashMap::with_capacity(assets.len());
        for (i, asset) in assets.iter().enumerate() {
            if let Some(AssetId(first)) = by_url.insert(asset.url.clone(), AssetId(i)) {
                return Err(Error::DuplicateUrl {
                    url: asset.url.clone(),
                    first: assets[first].source.display().to_string(),
                    second: asset.source.display().to_string(),
                });
            }
            by_path.insert(asset.path.clone(), AssetId(i));
        }
        Ok(Assets {
            all: assets,
            by_url,
            by_path,
        })
    }

    pub fn lookup_url(&self, url: &str) -> Option<&Asset> {
        self.by_url.get(url).map(|id| &self.all[id.0])
    }

    pub fn lookup_path(&self, path: &str) -> Option<&Asset> {
        self.by_path.get(path).map(|id| &self.all[id.0])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.all.iter()
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// What kind of reference failed to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarningKind {
    /// A navigation leaf names a document that doesn't exist.
    UnresolvedNavigation,

    /// A link or image inside a document points at nothing.
    DeadLink,
}

/// A non-fatal resolution miss. Collected so callers (and strict mode) can
/// act on them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,

    /// Where the reference was found: a document path, or the navigation
    /// title for navigation warnings.
    pub origin: String,

    /// The reference as written.
    pub target: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            WarningKind::UnresolvedNavigation => write!(
                f,
                "navigation entry '{}' references missing document '{}'",
                self.origin, self.target
            ),
            WarningKind::DeadLink => write!(
                f,
                "document '{}' links to missing target '{}'",
                self.origin, self.target
            ),
        }
    }
}

/// The aggregate root of one build or serve session. Each pipeline stage
/// fills in its part before the next stage reads it.
#[derive(Debug, Default)]
pub struct Site {
    /// The base URL every document and asset URL starts with.
    pub url: String,

    pub name: String,

    /// Free-form values from the configuration, passed to templates.
    pub context: Mapping,

    pub documents: Documents,
    pub assets: Assets,
    pub navigation: Navigation,

    /// Resolution misses found while initializing (navigation).
    pub warnings: Vec<Warning>,

    /// The document currently being rendered, if any.
    active: Option<DocId>,
}

impl Site {
    pub fn new(url: &str, name: &str, context: Mapping) -> Site {
        Site {
            url: url.to_owned(),
            name: name.to_owned(),
            context,
            ..Site::default()
        }
    }

    /// The document currently being rendered, if any.
    pub fn active_document(&self) -> Option<DocId> {
        self.active
    }

    /// Marks (or unmarks) `document` as the one being rendered, together with
    /// every navigation entry on its breadcrumb trail. Use
    /// [`crate::handlers::ActivePage`] rather than calling this
    /// directly so the marks are always cleared.
    pub(crate) fn set_active(&mut self, document: DocId, active: bool) {
        self.active = if active { Some(document) } else { None };
        if let Some(nav) = self.documents.get(document).navigation {
            for id in self.navigation.breadcrumbs(nav) {
                self.navigation.get_mut(id).is_active = active;
            }
        }
    }
}

/// The result of building a document or asset collection.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error assembling the site model.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when two sources map to the same public URL.
    #[error("'{first}' and '{second}' both map to url '{url}'")]
    DuplicateUrl {
        url: String,
        first: String,
        second: String,
    },
}

#[cfg(test)]
mod test {
    use super::*;

    fn document(url: &str, path: &str) -> Document {
        Document::new(url.to_owned(), path.to_owned())
    }

    #[test]
    fn test_documents_are_sorted_and_indexed() -> Result<()> {
        let documents = Documents::new(vec![
            document("/guide/setup/", "guide/setup.md"),
            document("/", "index.md"),
            document("/about/", "about.md"),
        ])?;

        let urls: Vec<&str> = documents.iter().map(|d| d.url.as_str()).collect();
        assert_eq!(vec!["/", "/about/", "/guide/setup/"], urls);

        let id = documents.lookup_path("guide/setup.md").unwrap();
        assert_eq!(Some(id), documents.lookup_url("/guide/setup/"));
        assert_eq!("guide/setup.md", documents.get(id).path);
        assert!(documents.lookup_url("/missing/").is_none());
        Ok(())
    }

    #[test]
    fn test_documents_reject_duplicate_urls() {
        let result = Documents::new(vec![
            document("/about/", "about.md"),
            document("/about/", "about/index.md"),
        ]);
        assert!(matches!(result, Err(Error::DuplicateUrl { url, .. }) if url == "/about/"));
    }

    #[test]
    fn test_homepage() {
        assert!(document("/", "index.md").is_homepage());
        assert!(!document("/about/", "about.md").is_homepage());
    }

    #[test]
    fn test_assets_lookup() -> Result<()> {
        let assets = Assets::new(vec![Asset {
            url: "/css/base.css".to_owned(),
            path: "css/base.css".to_owned(),
            source: PathBuf::from("statics/css/base.css"),
        }])?;
        assert_eq!(
            Some("css/base.css"),
            assets.lookup_url("/css/base.css").map(|a| a.path.as_str())
        );
        assert!(assets.lookup_path("css/base.css").is_some());
        assert!(assets.lookup_url("/css/other.css").is_none());
        Ok(())
    }
}
