use std::path::Path;

use image::DynamicImage;
use tracing::debug;

use super::cover::{cover_from, default_registry};
use super::tags::{TrackTags, duration_from, tags_from};

/// Everything shown for one track, always populated.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub tags: TrackTags,
    /// Length in seconds, `0.0` when unknown.
    pub duration: f64,
    pub cover: Option<DynamicImage>,
}

impl Metadata {
    /// Read tags, duration and cover art with a single parse of the file.
    pub fn read(path: &Path) -> Self {
        let tagged = match lofty::read_from_path(path) {
            Ok(tagged) => tagged,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "using default metadata");
                return Self::default();
            }
        };

        let cover = cover_from(&tagged, default_registry()).unwrap_or_else(|e| {
            debug!(path = %path.display(), error = %e, "no cover art");
            None
        });

        Self {
            tags: tags_from(&tagged),
            duration: duration_from(&tagged),
            cover,
        }
    }
}
