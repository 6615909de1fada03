use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

/// Reasons a folder could not be listed at all.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("folder {} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("{} is not a folder", .0.display())]
    NotADirectory(PathBuf),
    #[error("cannot read folder {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn normalized_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.'))
        .filter(|e| !e.is_empty())
        .map(|e| {
            if settings.case_sensitive_extensions {
                e.to_string()
            } else {
                e.to_ascii_lowercase()
            }
        })
        .collect()
}

fn is_audio_file(path: &Path, exts: &[String], case_sensitive: bool) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            if case_sensitive {
                exts.iter().any(|e| e == ext)
            } else {
                let ext = ext.to_ascii_lowercase();
                exts.iter().any(|e| e == &ext)
            }
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// List the audio files directly inside `dir` (no recursion).
///
/// Entries come back in whatever order the file system lists them; nothing is
/// sorted. A folder that exists but has no matching files yields `Ok(vec![])`.
/// Entries that cannot be read are skipped with a warning, the folder itself
/// failing to open is an error.
pub fn scan_folder(dir: &Path, settings: &LibrarySettings) -> Result<Vec<PathBuf>, ScanError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(ScanError::NotADirectory(dir.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ScanError::NotFound(dir.to_path_buf()));
        }
        Err(source) => {
            return Err(ScanError::Unreadable {
                path: dir.to_path_buf(),
                source,
            });
        }
    }

    let exts = normalized_extensions(settings);
    let mut tracks: Vec<PathBuf> = Vec::new();

    let walker = WalkDir::new(dir).min_depth(1).max_depth(1);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            // The root itself failing means the listing never started.
            Err(e) if e.depth() == 0 => {
                return Err(ScanError::Unreadable {
                    path: dir.to_path_buf(),
                    source: e.into(),
                });
            }
            Err(e) => {
                warn!(folder = %dir.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();
        if path.is_file()
            && (settings.include_hidden || !is_hidden(path))
            && is_audio_file(path, &exts, settings.case_sensitive_extensions)
        {
            tracks.push(path.to_path_buf());
        }
    }

    debug!(folder = %dir.display(), found = tracks.len(), "scanned folder");
    Ok(tracks)
}
