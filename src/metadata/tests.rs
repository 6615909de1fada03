use super::cover::{ArtRegistry, read_cover};
use super::tags::{UNKNOWN_ALBUM, UNKNOWN_ARTIST, UNKNOWN_TITLE};
use super::*;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use lofty::config::WriteOptions;
use lofty::picture::{Picture, PictureType};
use lofty::tag::{Accessor, Tag, TagExt, TagType};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

const SAMPLE_RATE: u32 = 8_000;

/// Write a silent 16-bit mono PCM WAV holding `samples` frames.
fn write_wav(path: &Path, samples: u32) {
    let data_len = samples * 2;
    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    bytes.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(44 + data_len as usize, 0);
    fs::write(path, bytes).unwrap();
}

/// Write a FLAC stream holding only a STREAMINFO block (8 kHz mono 16-bit, 1 s).
fn write_flac(path: &Path) {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"fLaC");
    // Last metadata block, type 0 (STREAMINFO), 34 bytes long.
    bytes.extend_from_slice(&[0x80, 0x00, 0x00, 34]);
    bytes.extend_from_slice(&4096u16.to_be_bytes());
    bytes.extend_from_slice(&4096u16.to_be_bytes());
    bytes.extend_from_slice(&[0; 6]); // min/max frame size unknown
    let packed: u64 = (u64::from(SAMPLE_RATE) << 44) | (15 << 36) | u64::from(SAMPLE_RATE);
    bytes.extend_from_slice(&packed.to_be_bytes());
    bytes.extend_from_slice(&[0; 16]); // MD5
    fs::write(path, bytes).unwrap();
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 40, 40]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

fn fixture(name: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join(name);
    write_wav(&path, SAMPLE_RATE);
    (dir, path)
}

fn junk(name: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, b"this is not an audio file at all").unwrap();
    (dir, path)
}

fn save_id3(path: &Path, fill: impl FnOnce(&mut Tag)) {
    let mut tag = Tag::new(TagType::Id3v2);
    fill(&mut tag);
    tag.save_to_path(path, WriteOptions::default()).unwrap();
}

fn save_vorbis(path: &Path, pictures: Vec<Picture>) {
    let mut tag = Tag::new(TagType::VorbisComments);
    for picture in pictures {
        tag.push_picture(picture);
    }
    tag.save_to_path(path, WriteOptions::default()).unwrap();
}

fn picture(kind: PictureType, width: u32, height: u32) -> Picture {
    let mut picture = Picture::from_reader(&mut Cursor::new(png_bytes(width, height))).unwrap();
    picture.set_pic_type(kind);
    picture
}

fn unknown_triple() -> TrackTags {
    TrackTags {
        title: UNKNOWN_TITLE.into(),
        artist: UNKNOWN_ARTIST.into(),
        album: UNKNOWN_ALBUM.into(),
    }
}

#[test]
fn extract_tags_defaults_for_unreadable_file() {
    let (_dir, path) = junk("broken.mp3");
    assert_eq!(extract_tags(&path), unknown_triple());
}

#[test]
fn extract_tags_defaults_for_missing_file() {
    let dir = tempdir().unwrap();
    assert_eq!(extract_tags(&dir.path().join("gone.flac")), unknown_triple());
}

#[test]
fn extract_tags_defaults_for_untagged_audio() {
    let (_dir, path) = fixture("plain.wav");
    assert_eq!(extract_tags(&path), unknown_triple());
}

#[test]
fn extract_tags_fills_only_missing_fields() {
    let (_dir, path) = fixture("titled.wav");
    save_id3(&path, |tag| tag.set_title("Foo".to_string()));

    assert_eq!(
        extract_tags(&path),
        TrackTags {
            title: "Foo".into(),
            artist: UNKNOWN_ARTIST.into(),
            album: UNKNOWN_ALBUM.into(),
        }
    );
}

#[test]
fn extract_tags_reads_all_fields() {
    let (_dir, path) = fixture("full.wav");
    save_id3(&path, |tag| {
        tag.set_title("Song".to_string());
        tag.set_artist("Band".to_string());
        tag.set_album("Record".to_string());
    });

    let tags = extract_tags(&path);
    assert_eq!(tags.title, "Song");
    assert_eq!(tags.artist, "Band");
    assert_eq!(tags.album, "Record");
}

#[test]
fn duration_is_zero_for_unreadable_file() {
    let (_dir, path) = junk("broken.flac");
    assert_eq!(duration(&path), 0.0);
}

#[test]
fn duration_reports_length_in_seconds() {
    let (_dir, path) = fixture("one-second.wav");
    let secs = duration(&path);
    assert!((secs - 1.0).abs() < 0.05, "got {secs}");
}

#[test]
fn cover_image_is_none_without_art() {
    let (_dir, broken) = junk("broken.mp3");
    assert!(cover_image(&broken).is_none());

    let (_dir2, plain) = fixture("plain.wav");
    assert!(cover_image(&plain).is_none());
}

#[test]
fn cover_image_decodes_embedded_front_cover() {
    let (_dir, path) = fixture("art.wav");
    save_id3(&path, |tag| {
        let mut picture = Picture::from_reader(&mut Cursor::new(png_bytes(3, 2))).unwrap();
        picture.set_pic_type(PictureType::CoverFront);
        tag.push_picture(picture);
    });

    let cover = cover_image(&path).expect("embedded cover");
    assert_eq!((cover.width(), cover.height()), (3, 2));
}

#[test]
fn unregistered_tag_kinds_yield_no_cover() {
    let (_dir, path) = fixture("art.wav");
    save_id3(&path, |tag| {
        let picture = Picture::from_reader(&mut Cursor::new(png_bytes(2, 2))).unwrap();
        tag.push_picture(picture);
    });

    assert!(read_cover(&path, &ArtRegistry::default()).unwrap().is_some());
    assert!(read_cover(&path, &ArtRegistry::empty()).unwrap().is_none());
}

#[test]
fn metadata_read_is_fully_populated_even_when_unreadable() {
    let (_dir, path) = junk("broken.ogg");
    let meta = Metadata::read(&path);
    assert_eq!(meta.tags, unknown_triple());
    assert_eq!(meta.duration, 0.0);
    assert!(meta.cover.is_none());
}

#[test]
fn metadata_read_combines_tags_duration_and_cover() {
    let (_dir, path) = fixture("all.wav");
    save_id3(&path, |tag| {
        tag.set_artist("Band".to_string());
        tag.push_picture(Picture::from_reader(&mut Cursor::new(png_bytes(4, 4))).unwrap());
    });

    let meta = Metadata::read(&path);
    assert_eq!(meta.tags.title, UNKNOWN_TITLE);
    assert_eq!(meta.tags.artist, "Band");
    assert!((meta.duration - 1.0).abs() < 0.05);
    assert!(meta.cover.is_some());
}

#[test]
fn cover_image_reads_flac_picture_block() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("art.flac");
    write_flac(&path);
    save_vorbis(&path, vec![picture(PictureType::CoverFront, 5, 3)]);

    let cover = cover_image(&path).expect("flac cover");
    assert_eq!((cover.width(), cover.height()), (5, 3));
}

#[test]
fn flac_cover_prefers_front_and_falls_back_to_first_picture() {
    let dir = tempdir().unwrap();

    let mixed = dir.path().join("mixed.flac");
    write_flac(&mixed);
    save_vorbis(
        &mixed,
        vec![
            picture(PictureType::Other, 2, 2),
            picture(PictureType::CoverFront, 5, 3),
        ],
    );
    let cover = cover_image(&mixed).unwrap();
    assert_eq!((cover.width(), cover.height()), (5, 3));

    let back_only = dir.path().join("back.flac");
    write_flac(&back_only);
    save_vorbis(&back_only, vec![picture(PictureType::CoverBack, 4, 1)]);
    let cover = cover_image(&back_only).unwrap();
    assert_eq!((cover.width(), cover.height()), (4, 1));
}

#[test]
fn track_info_reads_tags_and_duration_together() {
    let (_dir, path) = fixture("info.wav");
    save_id3(&path, |tag| tag.set_album("Record".to_string()));

    let (tags, secs) = track_info(&path);
    assert_eq!(tags.album, "Record");
    assert_eq!(tags.title, UNKNOWN_TITLE);
    assert!((secs - 1.0).abs() < 0.05, "got {secs}");

    let (_dir2, broken) = junk("broken.mp3");
    assert_eq!(track_info(&broken), (unknown_triple(), 0.0));
}
