use super::{Error, Handler, Result};
use crate::site::{Asset, Assets, Site};
use crate::url::{url_for_path, MARKDOWN_EXTENSION};
use crate::util::{create_file, list_files_within_directory};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Discovers the files under the statics directory, and the non-markdown
/// files under the docs directory, and copies or serves them verbatim.
pub struct StaticFilesHandler {
    statics_directory: PathBuf,
    docs_directory: PathBuf,
    build_directory: PathBuf,
}

impl StaticFilesHandler {
    pub fn new(
        statics_directory: PathBuf,
        docs_directory: PathBuf,
        build_directory: PathBuf,
    ) -> StaticFilesHandler {
        StaticFilesHandler {
            statics_directory,
            docs_directory,
            build_directory,
        }
    }
}

impl Handler for StaticFilesHandler {
    fn initialize(&self, site: &mut Site) -> Result<()> {
        let mut assets = Vec::new();
        if self.statics_directory.is_dir() {
            for path in list_files_within_directory(&self.statics_directory)? {
                assets.push(asset(&self.statics_directory, path, &site.url));
            }
        } else {
            debug!(
                "No statics directory at {}",
                self.statics_directory.display()
            );
        }

        for path in list_files_within_directory(&self.docs_directory)? {
            if !path.ends_with(&format!(".{}", MARKDOWN_EXTENSION)) {
                assets.push(asset(&self.docs_directory, path, &site.url));
            }
        }

        site.assets = Assets::new(assets)?;
        info!("Discovered {} static files", site.assets.len());
        Ok(())
    }

    fn build(&self, site: &mut Site) -> Result<()> {
        for asset in site.assets.iter() {
            let output = self.build_directory.join(&asset.path);
            let mut source = std::fs::File::open(&asset.source).map_err(|err| Error::Read {
                path: asset.source.clone(),
                err,
            })?;
            create_file(&output)
                .and_then(|mut file| std::io::copy(&mut source, &mut file))
                .map_err(|err| Error::Write { path: output, err })?;
        }
        info!("Copied {} static files", site.assets.len());
        Ok(())
    }

    fn serve(&self, site: &mut Site, url: &str) -> Result<Option<Vec<u8>>> {
        match site.assets.lookup_url(url) {
            Some(asset) => std::fs::read(&asset.source)
                .map(Some)
                .map_err(|err| Error::Read {
                    path: asset.source.clone(),
                    err,
                }),
            None => Ok(None),
        }
    }
}

fn asset(directory: &Path, path: String, base_url: &str) -> Asset {
    Asset {
        url: url_for_path(&path, base_url),
        source: directory.join(&path),
        path,
    }
}
