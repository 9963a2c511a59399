//! Loads the project configuration from an `mkdocs.yml`-shaped file:
//!
//! ```yaml
//! site_name: My Docs
//! build:
//!   url: https://example.org/docs/
//!   strict: false
//! directories:
//!   docs: docs
//!   statics: statics
//!   templates: templates
//!   build: site
//! context:
//!   repo: https://github.com/example/docs
//! nav:
//!   - Home: index.md
//!   - Guide:
//!       - Setup: guide/setup.md
//! ```
//!
//! Every key is optional. Relative directories are resolved against the
//! directory that contains the file.

use crate::nav::{self, NavEntry};
use serde::Deserialize;
use serde_yaml::Mapping;
use std::path::{Path, PathBuf};

/// The file [`Config::from_directory`] looks for.
pub const CONFIG_FILE_NAME: &str = "mkdocs.yml";

#[derive(Deserialize, Default)]
#[serde(default)]
struct Project {
    site_name: String,
    build: Build,
    directories: Directories,
    context: Mapping,
    nav: serde_yaml::Value,
}

#[derive(Deserialize)]
#[serde(default)]
struct Build {
    url: String,
    strict: bool,
}

impl Default for Build {
    fn default() -> Self {
        Build {
            url: "/".to_owned(),
            strict: false,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct Directories {
    docs: PathBuf,
    statics: PathBuf,
    templates: PathBuf,
    build: PathBuf,
}

impl Default for Directories {
    fn default() -> Self {
        Directories {
            docs: PathBuf::from("docs"),
            statics: PathBuf::from("statics"),
            templates: PathBuf::from("templates"),
            build: PathBuf::from("site"),
        }
    }
}

/// The resolved configuration for one build or serve session.
#[derive(Debug)]
pub struct Config {
    pub site_name: String,

    /// The base URL prefixed onto every document and asset URL.
    pub url: String,

    /// Whether resolution misses fail the build.
    pub strict: bool,

    pub docs_directory: PathBuf,
    pub statics_directory: PathBuf,
    pub templates_directory: PathBuf,
    pub build_directory: PathBuf,

    /// Free-form values handed to templates as `site.context`.
    pub context: Mapping,

    pub nav: Vec<NavEntry>,
}

impl Config {
    /// Searches `dir` and its ancestors for [`CONFIG_FILE_NAME`] and loads
    /// the first one found.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        for ancestor in dir.ancestors() {
            let path = ancestor.join(CONFIG_FILE_NAME);
            if path.is_file() {
                return Config::from_file(&path);
            }
        }
        Err(Error::NotFound {
            directory: dir.to_owned(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        let text = std::fs::read_to_string(path).map_err(|err| Error::Read {
            path: path.to_owned(),
            err,
        })?;
        let root = match path.parent() {
            Some(parent) => parent,
            None => Path::new("."),
        };
        Config::parse(&text, root).map_err(|err| match err {
            Error::Yaml { err, .. } => Error::Yaml {
                path: path.to_owned(),
                err,
            },
            err => err,
        })
    }

    /// Parses configuration text, resolving relative directories against
    /// `root`.
    pub fn parse(text: &str, root: &Path) -> Result<Config> {
        let project: Project = match text.trim().is_empty() {
            true => Project::default(),
            false => serde_yaml::from_str(text).map_err(|err| Error::Yaml {
                path: PathBuf::new(),
                err,
            })?,
        };
        Ok(Config {
            site_name: project.site_name,
            url: project.build.url,
            strict: project.build.strict,
            docs_directory: root.join(project.directories.docs),
            statics_directory: root.join(project.directories.statics),
            templates_directory: root.join(project.directories.templates),
            build_directory: root.join(project.directories.build),
            context: project.context,
            nav: NavEntry::parse_all(&project.nav)?,
        })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not find `mkdocs.yml` in '{}' or any parent directory", directory.display())]
    NotFound { directory: PathBuf },

    #[error("Reading configuration '{}': {err}", path.display())]
    Read { path: PathBuf, err: std::io::Error },

    #[error("Parsing configuration '{}': {err}", path.display())]
    Yaml {
        path: PathBuf,
        err: serde_yaml::Error,
    },

    #[error("Invalid navigation: {0}")]
    Nav(#[from] nav::Error),
}
