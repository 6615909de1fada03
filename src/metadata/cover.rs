use std::path::Path;
use std::sync::LazyLock;

use image::DynamicImage;
use lofty::file::{TaggedFile, TaggedFileExt};
use lofty::picture::{Picture, PictureType};
use lofty::tag::{Tag, TagType};
use tracing::debug;

use super::MetadataError;

/// Picks the picture to show from one tag of a given kind.
pub type ArtStrategy = fn(&Tag) -> Option<&Picture>;

/// Tag kinds known to carry embedded art, each with its selection strategy.
///
/// Files whose tags are of an unregistered kind never produce a cover.
pub struct ArtRegistry {
    strategies: Vec<(TagType, ArtStrategy)>,
}

static DEFAULT_ART: LazyLock<ArtRegistry> = LazyLock::new(ArtRegistry::default);

// ID3v2 APIC frames and FLAC picture blocks both surface as tag pictures.
fn front_cover_or_first(tag: &Tag) -> Option<&Picture> {
    let pictures = tag.pictures();
    pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())
}

impl Default for ArtRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(TagType::Id3v2, front_cover_or_first)
            .register(TagType::VorbisComments, front_cover_or_first);
        registry
    }
}

impl ArtRegistry {
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Add or replace the strategy for `kind`.
    pub fn register(&mut self, kind: TagType, strategy: ArtStrategy) -> &mut Self {
        match self.strategies.iter_mut().find(|(k, _)| *k == kind) {
            Some(entry) => entry.1 = strategy,
            None => self.strategies.push((kind, strategy)),
        }
        self
    }

    fn strategy_for(&self, kind: TagType) -> Option<ArtStrategy> {
        self.strategies
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, s)| *s)
    }

    /// First picture any registered strategy finds in the file's tags.
    pub fn select<'a>(&self, tagged: &'a TaggedFile) -> Option<&'a Picture> {
        tagged.tags().iter().find_map(|tag| {
            self.strategy_for(tag.tag_type())
                .and_then(|strategy| strategy(tag))
        })
    }
}

pub(super) fn cover_from(
    tagged: &TaggedFile,
    registry: &ArtRegistry,
) -> Result<Option<DynamicImage>, MetadataError> {
    let Some(picture) = registry.select(tagged) else {
        return Ok(None);
    };
    Ok(Some(image::load_from_memory(picture.data())?))
}

pub fn read_cover(path: &Path, registry: &ArtRegistry) -> Result<Option<DynamicImage>, MetadataError> {
    let tagged = lofty::read_from_path(path)?;
    cover_from(&tagged, registry)
}

/// Decoded embedded cover of `path`, or `None` when absent or undecodable.
pub fn cover_image(path: &Path) -> Option<DynamicImage> {
    read_cover(path, &DEFAULT_ART).unwrap_or_else(|e| {
        debug!(path = %path.display(), error = %e, "no cover art");
        None
    })
}

pub(super) fn default_registry() -> &'static ArtRegistry {
    &DEFAULT_ART
}
