//! Tag reading with `lofty`.
//!
//! Both entry points are infallible: tag errors are logged and replaced by the
//! fallback record, missing art is simply `None`.

use std::borrow::Cow;
use std::path::Path;

use lofty::error::LoftyError;
use lofty::prelude::{Accessor, ItemKey, TaggedFileExt};
use tracing::{debug, warn};

use crate::view::parse_track_number;

use super::model::{CoverArt, TrackMetadata, TrackRef};

/// Extract display metadata for `track`.
///
/// Streams always get the fixed stream record. Local files get whatever their
/// primary (or first) tag provides, with the file name as title and `-` for
/// artist/album when a field is missing.
pub fn extract(track: &TrackRef) -> TrackMetadata {
    match track {
        TrackRef::Stream(_) => TrackMetadata::for_stream(),
        TrackRef::Local(path) => read_tags(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "failed to read tags, using file name");
            TrackMetadata::for_untagged(path)
        }),
    }
}

/// Return the first embedded picture of a local file, if there is one.
pub fn extract_cover_art(track: &TrackRef) -> Option<CoverArt> {
    let path = track.local_path()?;
    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no cover art");
            return None;
        }
    };

    let tag = tagged
        .primary_tag()
        .filter(|t| !t.pictures().is_empty())
        .or_else(|| tagged.tags().iter().find(|t| !t.pictures().is_empty()))?;
    let picture = tag.pictures().first()?;

    Some(CoverArt {
        data: picture.data().to_vec(),
        mime_type: picture.mime_type().map(|m| m.as_str().to_string()),
    })
}

fn read_tags(path: &Path) -> Result<TrackMetadata, LoftyError> {
    let tagged = lofty::read_from_path(path)?;
    let mut meta = TrackMetadata::for_untagged(path);

    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        debug!(path = %path.display(), "file has no tags");
        return Ok(meta);
    };

    if let Some(v) = non_blank(tag.title()) {
        meta.title = v;
    }
    if let Some(v) = non_blank(tag.artist()) {
        meta.artist = v;
    }
    if let Some(v) = non_blank(tag.album()) {
        meta.album = v;
    }

    // Raw text first so "3/12" style values sort the same way everywhere.
    meta.track_number = tag
        .get_string(&ItemKey::TrackNumber)
        .map(parse_track_number)
        .filter(|n| *n > 0)
        .or_else(|| tag.track())
        .unwrap_or(0);

    Ok(meta)
}

fn non_blank(value: Option<Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
