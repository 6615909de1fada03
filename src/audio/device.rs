use std::io;
use std::path::{Path, PathBuf};

/// Errors raised by a player device.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("cannot open audio output: {0}")]
    Output(#[from] rodio::StreamError),
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
    #[error("no track loaded")]
    NothingLoaded,
}

/// Audio output capability: one track loaded at a time.
///
/// `play` always replaces whatever was playing before; there is no separate
/// stop or unload step.
pub trait PlayerDevice {
    /// Open and decode `path` so the next `play` starts it.
    fn load(&mut self, path: &Path) -> Result<(), DeviceError>;

    /// Start the loaded track. `looping` repeats this single track forever.
    fn play(&mut self, looping: bool) -> Result<(), DeviceError>;

    fn pause(&mut self);

    fn unpause(&mut self);

    /// Set the output volume. Values are expected in `[0.0, 1.0]`.
    fn set_volume(&mut self, volume: f32);

    /// True while the current track still has audio queued (paused counts as busy).
    fn is_busy(&self) -> bool;

    fn is_initialized(&self) -> bool;
}
