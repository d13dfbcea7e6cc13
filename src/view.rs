//! Grouped, sorted projection of the playlist used for display and selection.
//!
//! The tree is rebuilt from scratch whenever the playlist or grouping mode
//! changes; nothing here is incremental.

mod build;
mod model;

pub use build::{build_view, parse_track_number};
pub use model::*;
