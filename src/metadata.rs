//! Best-effort metadata extraction.
//!
//! Every public reader here returns a fully populated value. Failures are
//! turned into defaults at this boundary and logged at `debug`; the
//! `read_*` variants keep the `Result` for callers that care why.

mod cover;
mod model;
mod tags;

pub use cover::cover_image;
pub use model::Metadata;
pub use tags::{TrackTags, duration, extract_tags, track_info};

/// Why a file's metadata could not be read.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("cannot read tags: {0}")]
    Read(#[from] lofty::error::LoftyError),
    #[error("cannot decode cover art: {0}")]
    Image(#[from] image::ImageError),
}

#[cfg(test)]
mod tests;
