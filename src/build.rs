//! Exports the [`Docs`] orchestrator, which stitches together the high-level
//! steps of producing the site: discovering documents and static files,
//! linking the navigation ([`crate::handlers`]), then rendering everything
//! either to the build directory or, one url at a time, for the dev server.

use crate::config::Config;
use crate::handlers::{
    Error as HandlerError, Handler, NavigationHandler, PagesHandler, StaticFilesHandler,
};
use crate::site::{Site, Warning};
use crate::template::{Error as TemplateError, GtmplRenderer, TemplateRenderer};
use tracing::{info, warn};

/// A documentation project: the resolved [`Config`], the [`Site`] model it
/// produces and the [`Handler`]s that fill it in, in order.
pub struct Docs {
    site: Site,
    strict: bool,
    handlers: Vec<Box<dyn Handler>>,
}

impl Docs {
    /// Creates a project rendering pages with the templates found in the
    /// configured templates directory.
    pub fn new(config: Config) -> Result<Docs> {
        let renderer = GtmplRenderer::from_directory(&config.templates_directory)?;
        Ok(Docs::with_renderer(config, Box::new(renderer)))
    }

    /// Creates a project rendering pages with `renderer`.
    pub fn with_renderer(config: Config, renderer: Box<dyn TemplateRenderer>) -> Docs {
        let handlers: Vec<Box<dyn Handler>> = vec![
            Box::new(PagesHandler::new(
                config.docs_directory.clone(),
                config.build_directory.clone(),
                renderer,
                config.strict,
            )),
            Box::new(StaticFilesHandler::new(
                config.statics_directory,
                config.docs_directory,
                config.build_directory,
            )),
            Box::new(NavigationHandler::new(config.nav)),
        ];
        Docs {
            site: Site::new(&config.url, &config.site_name, config.context),
            strict: config.strict,
            handlers,
        }
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Discovers documents and assets and links the navigation. Must run
    /// before [`Docs::build`] or [`Docs::serve`].
    pub fn initialize(&mut self) -> Result<()> {
        for handler in &self.handlers {
            handler.initialize(&mut self.site)?;
        }
        for warning in &self.site.warnings {
            warn!("{}", warning);
        }
        if self.strict {
            if let Some(warning) = self.site.warnings.first() {
                return Err(Error::Strict(warning.clone()));
            }
        }
        Ok(())
    }

    /// Renders every document and copies every asset into the build
    /// directory.
    pub fn build(&mut self) -> Result<()> {
        for handler in &self.handlers {
            handler.build(&mut self.site)?;
        }
        info!(
            "Built {} documents and {} static files ({} warnings)",
            self.site.documents.len(),
            self.site.assets.len(),
            self.site.warnings.len()
        );
        Ok(())
    }

    /// Returns the bytes for `url`: a freshly rendered document, else an
    /// asset's contents, else `None`.
    pub fn serve(&mut self, url: &str) -> Result<Option<Vec<u8>>> {
        for handler in &self.handlers {
            if let Some(bytes) = handler.serve(&mut self.site, url)? {
                return Ok(Some(bytes));
            }
        }
        Ok(None)
    }
}

/// Builds the site described by `config` into its build directory and
/// returns the populated [`Site`].
pub fn build_site(config: Config) -> Result<Site> {
    let mut docs = Docs::new(config)?;
    docs.initialize()?;
    docs.build()?;
    Ok(docs.site)
}

pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building or serving a site.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Handler(#[from] HandlerError),

    /// A resolution miss found while initializing in strict mode.
    #[error("{0}")]
    Strict(Warning),
}
