use super::{Error, Handler, Result};
use crate::markdown::{Markdown, RenderContext};
use crate::site::{DocId, Document, Documents, Site};
use crate::template::{TemplateRenderer, BASE_TEMPLATE};
use crate::url::{build_path, url_for_path, MARKDOWN_EXTENSION};
use crate::util::{create_file, list_files_within_directory};
use crate::value::render_context;
use std::io::Write;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Discovers the markdown documents under the docs directory and renders
/// each through the markdown pipeline and the `base` template.
pub struct PagesHandler {
    docs_directory: PathBuf,
    build_directory: PathBuf,
    renderer: Box<dyn TemplateRenderer>,
    markdown: Markdown,
    strict: bool,
}

impl PagesHandler {
    pub fn new(
        docs_directory: PathBuf,
        build_directory: PathBuf,
        renderer: Box<dyn TemplateRenderer>,
        strict: bool,
    ) -> PagesHandler {
        PagesHandler {
            docs_directory,
            build_directory,
            renderer,
            markdown: Markdown::new(),
            strict,
        }
    }

    /// Renders one document to its final HTML. Errors are annotated with the
    /// document's source path.
    pub fn render(&self, site: &mut Site, id: DocId) -> Result<String> {
        let path = site.documents.get(id).path.clone();
        self.render_document(site, id).map_err(|err| Error::Annotated {
            path,
            err: Box::new(err),
        })
    }

    fn render_document(&self, site: &mut Site, id: DocId) -> Result<String> {
        let mut site = ActivePage::new(site, id);

        let source = self.docs_directory.join(&site.documents.get(id).path);
        let text = std::fs::read_to_string(&source).map_err(|err| Error::Read {
            path: source.clone(),
            err,
        })?;

        let mut context = RenderContext::new(&site, &site.documents.get(id).path);
        let html = self.markdown.convert(&text, &mut context);
        let RenderContext {
            sections, warnings, ..
        } = context;
        for warning in warnings {
            if self.strict {
                return Err(Error::Strict(warning));
            }
            // Served documents render more than once.
            if !site.warnings.contains(&warning) {
                site.warnings.push(warning);
            }
        }

        let document = site.documents.get_mut(id);
        document.text = text;
        document.html = html;
        document.sections = sections;

        Ok(self
            .renderer
            .render(BASE_TEMPLATE, render_context(&site, id))?)
    }
}

impl Handler for PagesHandler {
    fn initialize(&self, site: &mut Site) -> Result<()> {
        let mut documents = Vec::new();
        for path in list_files_within_directory(&self.docs_directory)? {
            if !is_markdown(&path) {
                continue;
            }
            let url = url_for_path(&build_path(&path), &site.url);
            debug!("Found document '{}' at '{}'", path, url);
            documents.push(Document::new(url, path));
        }
        site.documents = Documents::new(documents)?;
        info!(
            "Discovered {} documents in {}",
            site.documents.len(),
            self.docs_directory.display()
        );
        Ok(())
    }

    fn build(&self, site: &mut Site) -> Result<()> {
        let ids: Vec<DocId> = site.documents.ids().collect();
        for id in ids {
            let html = self.render(site, id)?;
            let output = self.build_directory.join(build_path(&site.documents.get(id).path));
            write(&output, html.as_bytes())?;
        }
        info!("Rendered {} documents", site.documents.len());
        Ok(())
    }

    fn serve(&self, site: &mut Site, url: &str) -> Result<Option<Vec<u8>>> {
        match site.documents.lookup_url(url) {
            Some(id) => Ok(Some(self.render(site, id)?.into_bytes())),
            None => Ok(None),
        }
    }
}

fn is_markdown(path: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|extension| extension == MARKDOWN_EXTENSION)
}

fn write(path: &Path, contents: &[u8]) -> Result<()> {
    create_file(path)
        .and_then(|mut file| file.write_all(contents))
        .map_err(|err| Error::Write {
            path: path.to_owned(),
            err,
        })
}

/// Marks a document and its navigation breadcrumbs as active for as long as
/// the guard lives. The marks are cleared on drop, so an early return or a
/// failed render never leaves them behind.
pub struct ActivePage<'a> {
    site: &'a mut Site,
    document: DocId,
}

impl<'a> ActivePage<'a> {
    pub fn new(site: &'a mut Site, document: DocId) -> ActivePage<'a> {
        site.set_active(document, true);
        ActivePage { site, document }
    }
}

impl Deref for ActivePage<'_> {
    type Target = Site;

    fn deref(&self) -> &Site {
        self.site
    }
}

impl DerefMut for ActivePage<'_> {
    fn deref_mut(&mut self) -> &mut Site {
        self.site
    }
}

impl Drop for ActivePage<'_> {
    fn drop(&mut self) {
        self.site.set_active(self.document, false);
    }
}
