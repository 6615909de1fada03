use std::path::{Path, PathBuf};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::debug;

use super::device::{DeviceError, PlayerDevice};
use super::sink::{TrackSource, create_sink, open_source};

/// `rodio`-backed player device holding the default output stream.
pub struct RodioDevice {
    stream: OutputStream,
    sink: Option<Sink>,
    pending: Option<TrackSource>,
    loaded: Option<PathBuf>,
    volume: f32,
}

impl RodioDevice {
    /// Open the default audio output. Failing here means no sound is possible at all.
    pub fn open() -> Result<Self, DeviceError> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        // rodio logs to stderr when OutputStream is dropped, which garbles the TUI.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            pending: None,
            loaded: None,
            volume: 1.0,
        })
    }

    fn stop_current(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }
}

impl PlayerDevice for RodioDevice {
    fn load(&mut self, path: &Path) -> Result<(), DeviceError> {
        let source = open_source(path)?;
        self.stop_current();
        self.pending = Some(source);
        self.loaded = Some(path.to_path_buf());
        debug!(path = %path.display(), "loaded track");
        Ok(())
    }

    fn play(&mut self, looping: bool) -> Result<(), DeviceError> {
        let source = match self.pending.take() {
            Some(source) => source,
            // Already played once: decode the same file again from the start.
            None => open_source(self.loaded.as_deref().ok_or(DeviceError::NothingLoaded)?)?,
        };

        self.stop_current();
        self.sink = Some(create_sink(&self.stream, source, looping, self.volume));
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
    }

    fn unpause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.play();
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(volume);
        }
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| !s.empty())
    }

    fn is_initialized(&self) -> bool {
        // The stream is opened in the constructor and lives as long as the device.
        true
    }
}
