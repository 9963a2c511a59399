//! The boundary to the templating engine. Pages are rendered through the
//! [`TemplateRenderer`] trait; [`GtmplRenderer`] implements it with Go-style
//! [`gtmpl`] templates loaded from the templates directory:
//!
//! ```text
//! templates/
//!   base.html          <- the template named `base`
//!   partials/
//!     nav.html         <- {{define "nav"}}...{{end}}, usable from every template
//! ```

use crate::url::join_url;
use gtmpl::{Context, Template, Value};
use gtmpl_value::FuncError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The template every document is rendered with.
pub const BASE_TEMPLATE: &str = "base";

const TEMPLATE_EXTENSION: &str = "html";
const PARTIALS_DIRECTORY: &str = "partials";

/// Renders a named template against a context value.
pub trait TemplateRenderer {
    fn render(&self, name: &str, context: Value) -> Result<String>;
}

/// A [`TemplateRenderer`] backed by [`gtmpl`].
pub struct GtmplRenderer {
    templates: HashMap<String, Template>,
}

impl GtmplRenderer {
    /// Parses every `*.html` file directly inside `directory` into a template
    /// named after its file stem. The contents of `partials/*.html` are
    /// appended to each so `{{template "name" .}}` finds their definitions.
    pub fn from_directory(directory: &Path) -> Result<GtmplRenderer> {
        let mut partials = String::new();
        for path in html_files(&directory.join(PARTIALS_DIRECTORY))? {
            partials.push_str(&read(&path)?);
            partials.push('\n');
        }

        let mut sources = Vec::new();
        for path in html_files(directory)? {
            let name = match path.file_stem() {
                Some(stem) => stem.to_string_lossy().into_owned(),
                None => continue,
            };
            debug!("Loading template '{}' from {}", name, path.display());
            sources.push((name, read(&path)?));
        }
        GtmplRenderer::from_sources(sources, &partials)
    }

    /// Parses each `(name, text)` pair with `partials` appended.
    pub fn from_sources<I>(sources: I, partials: &str) -> Result<GtmplRenderer>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut templates = HashMap::new();
        for (name, text) in sources {
            let mut template = Template::default();
            template.add_func("url", url_func);
            template
                .parse(format!("{}\n{}", text, partials))
                .map_err(|err| Error::Parse {
                    name: name.clone(),
                    message: err.to_string(),
                })?;
            templates.insert(name, template);
        }
        Ok(GtmplRenderer { templates })
    }
}

impl TemplateRenderer for GtmplRenderer {
    fn render(&self, name: &str, context: Value) -> Result<String> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| Error::UnknownTemplate(name.to_owned()))?;
        template
            .render(&Context::from(context))
            .map_err(|err| Error::Render {
                name: name.to_owned(),
                message: err.to_string(),
            })
    }
}

/// `{{ url .site.url "css/base.css" }}` joins a base URL and a relative path
/// with exactly one `/`.
fn url_func(args: &[Value]) -> std::result::Result<Value, FuncError> {
    match args {
        [Value::String(base), Value::String(path)] => Ok(Value::String(join_url(base, path))),
        _ => Err(FuncError::Generic(
            "url expects a base url and a path".to_owned(),
        )),
    }
}

/// Lists the `*.html` files directly inside `directory`, sorted. A missing
/// directory has no files.
fn html_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(Error::Io {
                path: directory.to_owned(),
                err,
            })
        }
    };

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|err| Error::Io {
                path: directory.to_owned(),
                err,
            })?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|err| Error::Io {
        path: path.to_owned(),
        err,
    })
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading or rendering templates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Reading template '{}': {err}", path.display())]
    Io { path: PathBuf, err: std::io::Error },

    #[error("Parsing template '{name}': {message}")]
    Parse { name: String, message: String },

    #[error("Rendering template '{name}': {message}")]
    Render { name: String, message: String },

    #[error("No template named '{0}'")]
    UnknownTemplate(String),
}
