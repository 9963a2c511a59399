//! The components that make up a build. Each [`Handler`] owns one kind of
//! output: [`PagesHandler`] discovers and renders documents,
//! [`StaticFilesHandler`] discovers and copies assets, and
//! [`NavigationHandler`] links the navigation tree. The orchestrator in
//! [`crate::build`] runs them in that fixed order.

mod files;
mod navigation;
mod pages;

pub use files::StaticFilesHandler;
pub use navigation::NavigationHandler;
pub use pages::{ActivePage, PagesHandler};

use crate::site::{Site, Warning};
use std::path::PathBuf;

/// One stage of the site pipeline. Every method defaults to doing nothing.
pub trait Handler {
    /// Fills in this handler's part of the [`Site`] model.
    fn initialize(&self, _site: &mut Site) -> Result<()> {
        Ok(())
    }

    /// Writes this handler's output files.
    fn build(&self, _site: &mut Site) -> Result<()> {
        Ok(())
    }

    /// Returns the bytes for `url` if this handler produces it.
    fn serve(&self, _site: &mut Site, _url: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error discovering, rendering or writing part of the site.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Reading '{}': {err}", path.display())]
    Read { path: PathBuf, err: std::io::Error },

    #[error("Writing '{}': {err}", path.display())]
    Write { path: PathBuf, err: std::io::Error },

    #[error("Listing files: {0}")]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Site(#[from] crate::site::Error),

    #[error(transparent)]
    Template(#[from] crate::template::Error),

    /// A resolution miss while running in strict mode.
    #[error("{0}")]
    Strict(Warning),

    /// Attributes an error to the document it occurred in.
    #[error("{path}: {err}")]
    Annotated { path: String, err: Box<Error> },
}
