use std::borrow::Cow;
use std::path::Path;

use lofty::file::{AudioFile, TaggedFile, TaggedFileExt};
use lofty::tag::Accessor;
use tracing::debug;

use super::MetadataError;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Title, artist and album, each already defaulted when the tag lacks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackTags {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl Default for TrackTags {
    fn default() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
            album: UNKNOWN_ALBUM.to_string(),
        }
    }
}

fn non_empty(value: Option<Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(super) fn tags_from(tagged: &TaggedFile) -> TrackTags {
    let mut tags = TrackTags::default();

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        if let Some(v) = non_empty(tag.title()) {
            tags.title = v;
        }
        if let Some(v) = non_empty(tag.artist()) {
            tags.artist = v;
        }
        if let Some(v) = non_empty(tag.album()) {
            tags.album = v;
        }
    }

    tags
}

pub(super) fn duration_from(tagged: &TaggedFile) -> f64 {
    tagged.properties().duration().as_secs_f64()
}

pub fn read_tags(path: &Path) -> Result<TrackTags, MetadataError> {
    let tagged = lofty::read_from_path(path)?;
    Ok(tags_from(&tagged))
}

/// Title, artist and album of `path`, or the "Unknown ..." triple when unreadable.
pub fn extract_tags(path: &Path) -> TrackTags {
    read_tags(path).unwrap_or_else(|e| {
        debug!(path = %path.display(), error = %e, "using default tags");
        TrackTags::default()
    })
}

pub fn read_duration(path: &Path) -> Result<f64, MetadataError> {
    let tagged = lofty::read_from_path(path)?;
    Ok(duration_from(&tagged))
}

/// Length of `path` in seconds, `0.0` when it cannot be determined.
pub fn duration(path: &Path) -> f64 {
    read_duration(path).unwrap_or_else(|e| {
        debug!(path = %path.display(), error = %e, "using zero duration");
        0.0
    })
}

/// Tags and length from a single parse of `path`, defaulted like
/// [`extract_tags`] and [`duration`].
pub fn track_info(path: &Path) -> (TrackTags, f64) {
    match lofty::read_from_path(path) {
        Ok(tagged) => (tags_from(&tagged), duration_from(&tagged)),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "using default tags and zero duration");
            (TrackTags::default(), 0.0)
        }
    }
}
