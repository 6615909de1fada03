use super::scan_folder;
use crate::config::LibrarySettings;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn scan_keeps_supported_files_in_listing_order() {
    let dir = tempdir().unwrap();
    for name in ["b.mp3", "a.wav", "notes.txt", "c.flac", "cover.jpg", "d.ogg", "e"] {
        fs::write(dir.path().join(name), b"not real").unwrap();
    }

    let tracks = scan_folder(dir.path(), &LibrarySettings::default()).unwrap();

    // Whatever order the file system hands out, minus the non-audio entries.
    let listed: Vec<PathBuf> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| {
            matches!(
                p.extension().and_then(|e| e.to_str()),
                Some("mp3" | "wav" | "flac" | "ogg")
            )
        })
        .collect();

    assert_eq!(tracks.len(), 4);
    assert_eq!(tracks, listed);
}

#[test]
fn scan_of_folder_without_matches_is_empty_not_an_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("readme.md"), b"hi").unwrap();

    let tracks = scan_folder(dir.path(), &LibrarySettings::default()).unwrap();
    assert!(tracks.is_empty());
}
