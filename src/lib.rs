//! The library code for the `docsmith` static site generator. A build can be
//! broken down into a handful of steps:
//!
//! 1. Discovering the markdown documents and static files on disk and
//!    assigning each a URL ([`crate::url`], [`crate::handlers`])
//! 2. Linking the declared navigation against the documents ([`crate::nav`])
//! 3. Converting each document's markdown into HTML ([`crate::markdown`])
//! 4. Rendering each document through the `base` template
//!    ([`crate::template`], [`crate::value`]) and writing the result to disk
//!
//! The third step is the most involved. The markdown is parsed into an event
//! stream which is passed through an ordered list of transforms: bare URLs
//! become links, GitHub-style alerts become admonition blocks, links between
//! source files are rewritten to their public URLs and every heading gets a
//! unique anchor id that is recorded as a section of the document.
//!
//! Everything lives in one [`crate::site::Site`] per session. The navigation
//! tree and the documents refer to each other by index, and rendering a
//! document marks its navigation breadcrumbs active only for the duration of
//! that render ([`crate::handlers::ActivePage`]).

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod handlers;
pub mod htmlrenderer;
pub mod markdown;
pub mod nav;
pub mod site;
pub mod template;
pub mod url;
pub mod util;
pub mod value;
