//! Playback state types shared between the controller and the UI.

use std::path::PathBuf;

use crate::audio::DeviceError;

/// The playback state derived from the controller flags.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Why a `play` request did nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyPlaylist,
    OutOfRange { index: usize, len: usize },
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPlaylist => write!(f, "playlist is empty"),
            Self::OutOfRange { index, len } => {
                write!(f, "track {index} is out of range (playlist has {len})")
            }
        }
    }
}

/// Result of a successful `play`, `next` or `previous` call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The track at this playlist index is now playing.
    Started(usize),
    /// Nothing changed.
    Ignored(IgnoreReason),
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("track {} no longer exists", .0.display())]
    MissingFile(PathBuf),
    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Read-only view of the controller handed to the UI each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub playlist: Vec<PathBuf>,
    /// Playlist index of the current track, if one has been selected.
    pub current_index: Option<usize>,
    pub current_file: Option<PathBuf>,
    pub state: PlaybackState,
    pub looping: bool,
    pub volume: f32,
}
