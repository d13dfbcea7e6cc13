use std::collections::BTreeMap;

use crate::library::{PlaylistEntry, TrackMetadata};

use super::model::{GroupingMode, ViewNode, ViewTree};

type Item<'a> = (usize, &'a TrackMetadata);

/// Parse a track number tag value such as `"3"` or `"3/12"`.
///
/// Only the part before the first `/` counts; anything unparsable is 0.
pub fn parse_track_number(raw: &str) -> u32 {
    raw.split('/')
        .next()
        .map(str::trim)
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

/// Leaves sort by album, then track number, then title. Album stays in the
/// key even where it is not shown so the order is the same in every mode.
fn sort_key(m: &TrackMetadata) -> (&str, u32, &str) {
    (m.album.as_str(), m.track_number, m.title.as_str())
}

/// Build the display tree for `entries` in the given `mode`.
///
/// Groups are ordered by name, leaves by [`sort_key`]. Both sorts are stable,
/// so equal keys keep playlist order and the output is fully deterministic.
pub fn build_view(entries: &[PlaylistEntry], mode: GroupingMode) -> ViewTree {
    let items: Vec<Item<'_>> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (i, &e.metadata))
        .collect();

    let roots = match mode {
        GroupingMode::Flat => leaves(&items, |m| m.title.clone()),
        GroupingMode::ByArtist => group_by(&items, |m| m.artist.as_str())
            .into_iter()
            .map(|(artist, members)| ViewNode::Group {
                label: artist.to_string(),
                children: leaves(&members, |m| format!("{} - {}", m.title, m.album)),
            })
            .collect(),
        GroupingMode::ByAlbum => group_by(&items, |m| m.album.as_str())
            .into_iter()
            .map(|(album, members)| ViewNode::Group {
                label: album.to_string(),
                children: leaves(&members, |m| format!("{} - {}", m.title, m.artist)),
            })
            .collect(),
        GroupingMode::ByArtistAndAlbum => group_by(&items, |m| m.artist.as_str())
            .into_iter()
            .map(|(artist, members)| ViewNode::Group {
                label: artist.to_string(),
                children: group_by(&members, |m| m.album.as_str())
                    .into_iter()
                    .map(|(album, songs)| ViewNode::Group {
                        label: album.to_string(),
                        children: leaves(&songs, |m| m.title.clone()),
                    })
                    .collect(),
            })
            .collect(),
    };

    ViewTree { roots }
}

fn group_by<'a>(
    items: &[Item<'a>],
    key: fn(&TrackMetadata) -> &str,
) -> BTreeMap<&'a str, Vec<Item<'a>>> {
    let mut groups: BTreeMap<&'a str, Vec<Item<'a>>> = BTreeMap::new();
    for &(index, meta) in items {
        groups.entry(key(meta)).or_default().push((index, meta));
    }
    groups
}

fn leaves(items: &[Item<'_>], label: fn(&TrackMetadata) -> String) -> Vec<ViewNode> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| sort_key(a.1).cmp(&sort_key(b.1)));
    sorted
        .into_iter()
        .map(|(index, meta)| ViewNode::Leaf {
            index,
            label: label(meta),
        })
        .collect()
}
