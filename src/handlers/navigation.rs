use super::{Handler, Result};
use crate::nav::{load_navigation, NavEntry};
use crate::site::Site;
use tracing::info;

/// Links the declared navigation against the discovered documents. Runs
/// after [`super::PagesHandler`] has filled in the documents.
pub struct NavigationHandler {
    entries: Vec<NavEntry>,
}

impl NavigationHandler {
    pub fn new(entries: Vec<NavEntry>) -> NavigationHandler {
        NavigationHandler { entries }
    }
}

impl Handler for NavigationHandler {
    fn initialize(&self, site: &mut Site) -> Result<()> {
        let (navigation, warnings) = load_navigation(&self.entries, &mut site.documents);
        info!(
            "Linked {} navigation entries ({} unresolved)",
            navigation.len(),
            warnings.len()
        );
        site.navigation = navigation;
        site.warnings.extend(warnings);
        Ok(())
    }
}
