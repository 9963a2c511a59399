//! Pure path and URL arithmetic: mapping source documents to output paths and
//! public URLs, and converting link targets found inside a document into
//! source-relative paths that can be looked up in the [`crate::site::Site`].

use std::string::FromUtf8Error;
use url::Url;

/// The extension (without the dot) of files treated as documents.
pub const MARKDOWN_EXTENSION: &str = "md";

const INDEX_FILE: &str = "index.html";
const INDEX_STEM: &str = "index";

/// Converts a source-relative document path into its output path.
///
/// ```text
/// source           | output                   | url
/// -----------------+--------------------------+----------------
/// index.md         | index.html               | /
/// about.md         | about/index.html         | /about/
/// example/index.md | example/index.html       | /example/
/// example/topic.md | example/topic/index.html | /example/topic/
/// ```
pub fn build_path(source: &str) -> String {
    let (dir, file_name) = match source.rsplit_once('/') {
        Some((dir, file_name)) => (dir, file_name),
        None => ("", source),
    };

    // `.hidden` has no extension, just like Python's `splitext`.
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    };

    let relative = if stem == INDEX_STEM {
        INDEX_FILE.to_owned()
    } else {
        format!("{}/{}", stem, INDEX_FILE)
    };

    if dir.is_empty() {
        relative
    } else {
        format!("{}/{}", dir, relative)
    }
}

/// Derives the public URL for an output path. A trailing `index.html`
/// component is dropped so that directories are addressed by their slash
/// form, and `base_url` is joined with exactly one separating `/`.
pub fn url_for_path(path: &str, base_url: &str) -> String {
    let mut components: Vec<&str> = path.split('/').collect();
    if let Some(last) = components.last_mut() {
        if *last == INDEX_FILE {
            *last = "";
        }
    }

    let mut url = base_url.to_owned();
    if !url.ends_with('/') {
        url.push('/');
    }
    url.push_str(&components.join("/"));
    url
}

/// Maps the target of an HTTP request line (`/guide/my%20page/?v=1`) to the
/// public URL it addresses. The query and fragment are dropped and the path
/// is percent-decoded. Fails if the decoded bytes are not UTF-8.
pub fn url_for_request(target: &str, base_url: &str) -> Result<String, FromUtf8Error> {
    let path = target.split(['?', '#']).next().unwrap_or_default();
    let path = urlencoding::decode(path)?;
    Ok(url_for_path(path.trim_start_matches('/'), base_url))
}

/// Joins `path` onto `base_url` with exactly one separating `/`. This backs
/// the `url` template helper.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Lexically normalizes a `/`-separated path: empty and `.` components are
/// dropped and `..` consumes the preceding component. Leading `..`
/// components that cannot be consumed are kept so that the result never
/// aliases a path inside the root.
pub fn normalize_path(path: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => match out.last() {
                Some(&last) if last != ".." => {
                    out.pop();
                }
                _ => out.push(".."),
            },
            component => out.push(component),
        }
    }
    out.join("/")
}

/// Returns the directory portion of a `/`-separated source path.
pub fn parent_directory(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => "",
    }
}

/// The outcome of converting one link target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Conversion {
    /// The target points outside of the site (it has a scheme), within the
    /// current page (a bare fragment) or nowhere at all, and is kept as-is.
    Unchanged,

    /// The target resolved to a URL inside the site.
    Resolved(String),

    /// The target looked like a site path but nothing lives there. Carries
    /// the normalized source path that was looked up.
    Missing(String),
}

/// Converts link targets relative to the document at `base`.
pub struct Converter<'a> {
    base: &'a str,
}

impl<'a> Converter<'a> {
    /// Constructs a new `Converter`
    ///
    /// # Arguments
    ///
    /// * `base` - the source-relative path of the document whose links are
    ///   being converted, e.g. `guide/setup.md`.
    pub fn new(base: &'a str) -> Converter<'a> {
        Converter { base }
    }

    /// Converts `target`. `resolve` maps a normalized source-relative path
    /// to the URL of whatever lives there.
    pub fn convert<F>(&self, target: &str, resolve: F) -> Conversion
    where
        F: FnOnce(&str) -> Option<String>,
    {
        if target.is_empty() || target.starts_with('#') || is_external(target) {
            return Conversion::Unchanged;
        }

        let (path, fragment) = match target.split_once('#') {
            Some((path, fragment)) => (path, Some(fragment)),
            None => (target, None),
        };

        // `/guide/setup.md` is rooted at the docs directory.
        let referenced = match path.strip_prefix('/') {
            Some(rooted) => normalize_path(rooted),
            None => normalize_path(&format!("{}/{}", parent_directory(self.base), path)),
        };
        match resolve(&referenced) {
            Some(url) => Conversion::Resolved(match fragment {
                Some(fragment) => format!("{}#{}", url, fragment),
                None => url,
            }),
            None => Conversion::Missing(referenced),
        }
    }
}

/// Reports whether `target` carries a URL scheme (`https:`, `mailto:`, ...)
/// or is scheme-relative (`//host/path`).
fn is_external(target: &str) -> bool {
    target.starts_with("//") || Url::parse(target).is_ok()
}
