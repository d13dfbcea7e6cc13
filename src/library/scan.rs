use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Turn user-supplied paths into the list of files to load.
///
/// Files are kept as given, in argument order, whatever their extension (the
/// user picked them explicitly). Directories are walked and contribute their
/// audio files sorted by path. Paths that do not exist are skipped.
pub fn expand_paths(inputs: &[PathBuf], settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();

    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
        } else if input.is_dir() {
            let mut found = scan_dir(input, settings);
            debug!(dir = %input.display(), count = found.len(), "scanned directory");
            files.append(&mut found);
        } else {
            warn!(path = %input.display(), "skipping path that is neither a file nor a directory");
        }
    }

    files
}

fn scan_dir(dir: &Path, settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_audio_file(p, settings))
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.m4a"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.ogg"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn expand_paths_keeps_files_in_argument_order() {
        let dir = tempdir().unwrap();
        let b = dir.path().join("b.mp3");
        let a = dir.path().join("a.mp3");
        fs::write(&b, b"not real").unwrap();
        fs::write(&a, b"not real").unwrap();

        let files = expand_paths(&[b.clone(), a.clone()], &LibrarySettings::default());
        assert_eq!(files, vec![b, a]);
    }

    #[test]
    fn expand_paths_walks_directories_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.MP3"), b"not real").unwrap();
        fs::write(dir.path().join("a.ogg"), b"not real").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let files = expand_paths(&[dir.path().to_path_buf()], &LibrarySettings::default());
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.ogg".to_string(), "b.MP3".to_string()]);
    }

    #[test]
    fn expand_paths_skips_missing_paths() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.mp3");
        assert!(expand_paths(&[missing], &LibrarySettings::default()).is_empty());
    }

    #[test]
    fn scan_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            include_hidden: false,
            ..LibrarySettings::default()
        };
        let files = scan_dir(dir.path(), &settings);

        assert_eq!(files, vec![dir.path().join("visible.mp3")]);
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        let files = scan_dir(dir.path(), &settings);
        assert_eq!(files, vec![dir.path().join("root.mp3")]);
    }

    #[test]
    fn scan_respects_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        fs::write(d1.join("one.mp3"), b"not real").unwrap();
        fs::write(d2.join("two.mp3"), b"not real").unwrap();

        // WalkDir depth counts root as 0, children as 1, grandchildren as 2...
        let settings = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let files = scan_dir(dir.path(), &settings);

        assert!(files.contains(&dir.path().join("root.mp3")));
        assert!(files.contains(&d1.join("one.mp3")));
        assert!(!files.contains(&d2.join("two.mp3")));
    }
}
