use super::DeviceError;
use super::sink::open_source;
use std::fs;
use std::io;
use tempfile::tempdir;

#[test]
fn open_source_reports_missing_file_as_not_found() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("gone.mp3");

    match open_source(&missing) {
        Err(DeviceError::Open { path, source }) => {
            assert_eq!(path, missing);
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("missing file must not open"),
    }
}

#[test]
fn open_source_rejects_undecodable_bytes() {
    let dir = tempdir().unwrap();
    let junk = dir.path().join("junk.ogg");
    fs::write(&junk, b"definitely not audio").unwrap();

    let err = open_source(&junk).err().unwrap();
    assert!(matches!(err, DeviceError::Decode { ref path, .. } if path == &junk));
    assert!(err.to_string().contains("junk.ogg"));
}
