/// How the playlist is nested for display.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum GroupingMode {
    #[default]
    Flat,
    ByArtistAndAlbum,
    ByAlbum,
    ByArtist,
}

impl GroupingMode {
    /// Next mode in the order the picker shows them.
    pub fn cycle(self) -> Self {
        match self {
            GroupingMode::Flat => GroupingMode::ByArtistAndAlbum,
            GroupingMode::ByArtistAndAlbum => GroupingMode::ByAlbum,
            GroupingMode::ByAlbum => GroupingMode::ByArtist,
            GroupingMode::ByArtist => GroupingMode::Flat,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GroupingMode::Flat => "All Songs",
            GroupingMode::ByArtistAndAlbum => "By Artist & Album",
            GroupingMode::ByAlbum => "By Album",
            GroupingMode::ByArtist => "By Artist",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewNode {
    /// Grouping node (artist or album). Not selectable.
    Group { label: String, children: Vec<ViewNode> },
    /// A track; `index` points back into the playlist.
    Leaf { index: usize, label: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewTree {
    pub roots: Vec<ViewNode>,
}

/// One line of the fully expanded tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow {
    pub depth: usize,
    pub label: String,
    /// Playlist index for leaves, `None` for group headers.
    pub index: Option<usize>,
}

impl ViewTree {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Pre-order flattening with every group expanded.
    pub fn rows(&self) -> Vec<ViewRow> {
        let mut rows = Vec::new();
        for node in &self.roots {
            push_rows(node, 0, &mut rows);
        }
        rows
    }

    /// Playlist indices of all leaves in display order.
    pub fn leaf_indices(&self) -> Vec<usize> {
        self.rows().into_iter().filter_map(|r| r.index).collect()
    }

    /// Row position of the leaf that refers to playlist entry `index`.
    pub fn row_of(&self, index: usize) -> Option<usize> {
        self.rows().iter().position(|r| r.index == Some(index))
    }
}

fn push_rows(node: &ViewNode, depth: usize, rows: &mut Vec<ViewRow>) {
    match node {
        ViewNode::Group { label, children } => {
            rows.push(ViewRow {
                depth,
                label: label.clone(),
                index: None,
            });
            for child in children {
                push_rows(child, depth + 1, rows);
            }
        }
        ViewNode::Leaf { index, label } => rows.push(ViewRow {
            depth,
            label: label.clone(),
            index: Some(*index),
        }),
    }
}
