//! Track references, metadata extraction and local file discovery.
//!
//! Everything in here is side-effect free apart from reading the filesystem:
//! metadata extraction never fails and falls back to fixed values.

mod metadata;
mod model;
mod scan;

pub use metadata::{extract, extract_cover_art};
pub use model::*;
pub use scan::expand_paths;
