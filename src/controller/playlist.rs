use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::audio::{DeviceError, PlayerDevice};
use crate::config::LibrarySettings;
use crate::library::{ScanError, scan_folder};

use super::state::{ControllerError, IgnoreReason, PlayOutcome, PlaybackSnapshot, PlaybackState};

/// Ordered playlist plus the single-track playback state machine.
///
/// States move `Stopped -> Playing` through [`play`](Self::play), toggle
/// between `Playing` and `Paused` through [`pause_resume`](Self::pause_resume),
/// and move to another track on `next`, `previous` or a natural track end seen
/// by [`poll_track_end`](Self::poll_track_end).
pub struct Controller<D> {
    device: D,
    library: LibrarySettings,
    playlist: Vec<PathBuf>,
    current_index: Option<usize>,
    current_file: Option<PathBuf>,
    is_playing: bool,
    looping: bool,
    volume: f32,
}

impl<D: PlayerDevice> Controller<D> {
    pub fn new(device: D, library: LibrarySettings) -> Self {
        Self {
            device,
            library,
            playlist: Vec::new(),
            current_index: None,
            current_file: None,
            is_playing: false,
            looping: false,
            volume: 1.0,
        }
    }

    /// Scan `folder` and either replace the playlist or append to it.
    ///
    /// Returns how many tracks the scan found. On error the playlist is left
    /// as it was. Replacing may shrink the playlist below the current index,
    /// in which case the index is cleared; the loaded track keeps playing.
    pub fn load_playlist(&mut self, folder: &Path, append: bool) -> Result<usize, ScanError> {
        let found = scan_folder(folder, &self.library)?;
        let added = found.len();

        if append {
            self.playlist.extend(found);
        } else {
            self.playlist = found;
            if self.current_index.is_some_and(|i| i >= self.playlist.len()) {
                self.current_index = None;
            }
        }

        info!(
            folder = %folder.display(),
            added,
            total = self.playlist.len(),
            append,
            "playlist updated"
        );
        Ok(added)
    }

    /// Load and start the track at `index`.
    ///
    /// An empty playlist or an out-of-range index is reported as
    /// [`PlayOutcome::Ignored`] without touching the device. A file that has
    /// disappeared since the scan yields [`ControllerError::MissingFile`] and
    /// leaves the current playback alone.
    pub fn play(&mut self, index: usize) -> Result<PlayOutcome, ControllerError> {
        let len = self.playlist.len();
        if len == 0 {
            debug!("play ignored: playlist is empty");
            return Ok(PlayOutcome::Ignored(IgnoreReason::EmptyPlaylist));
        }
        if index >= len {
            debug!(index, len, "play ignored: index out of range");
            return Ok(PlayOutcome::Ignored(IgnoreReason::OutOfRange { index, len }));
        }

        let path = self.playlist[index].clone();
        if !path.exists() {
            warn!(path = %path.display(), "track is missing on disk");
            return Err(ControllerError::MissingFile(path));
        }

        if let Err(e) = self.device.load(&path) {
            return Err(match e {
                DeviceError::Open { path, source } if source.kind() == io::ErrorKind::NotFound => {
                    warn!(path = %path.display(), "track is missing on disk");
                    ControllerError::MissingFile(path)
                }
                other => other.into(),
            });
        }

        if let Err(e) = self.device.play(self.looping) {
            // The old track was already replaced by the load, so nothing is audible now.
            warn!(path = %path.display(), error = %e, "device failed to start track");
            self.stop_playback();
            return Err(e.into());
        }

        info!(index, path = %path.display(), looping = self.looping, "playing");
        self.current_index = Some(index);
        self.current_file = Some(path);
        self.is_playing = true;
        Ok(PlayOutcome::Started(index))
    }

    /// Pause when playing, resume when paused.
    ///
    /// Does nothing while no track has been loaded, so the flag never claims
    /// playback the device cannot produce.
    pub fn pause_resume(&mut self) -> PlaybackState {
        if self.current_file.is_none() {
            debug!("pause/resume ignored: nothing loaded");
            return self.state();
        }

        if self.is_playing {
            self.device.pause();
        } else {
            self.device.unpause();
        }
        self.is_playing = !self.is_playing;
        self.state()
    }

    /// Play the following track, wrapping from the last to the first.
    pub fn next(&mut self) -> Result<PlayOutcome, ControllerError> {
        self.step(1)
    }

    /// Play the preceding track, wrapping from the first to the last.
    pub fn previous(&mut self) -> Result<PlayOutcome, ControllerError> {
        self.step(-1)
    }

    // `None` counts as -1, so `next` from nothing starts at 0.
    fn step(&mut self, delta: i64) -> Result<PlayOutcome, ControllerError> {
        if self.playlist.is_empty() {
            return Ok(PlayOutcome::Ignored(IgnoreReason::EmptyPlaylist));
        }

        let len = self.playlist.len() as i64;
        let current = self.current_index.map_or(-1, |i| i as i64);
        let target = (current + delta).rem_euclid(len) as usize;
        self.play(target)
    }

    /// Flip single-track looping. Takes effect from the next `play`.
    pub fn toggle_loop(&mut self) -> bool {
        self.looping = !self.looping;
        debug!(looping = self.looping, "loop toggled");
        self.looping
    }

    /// Forward `volume` to the device. Clamping is the caller's job.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.device.set_volume(volume);
    }

    /// Advance to the next track when the current one ended on its own.
    ///
    /// Meant to be called on a fixed tick. Returns `Ok(true)` exactly when the
    /// device went idle while we were playing (not paused) and the next track
    /// started. When that next track cannot be started, playback is marked as
    /// stopped so later ticks do not retry it.
    pub fn poll_track_end(&mut self) -> Result<bool, ControllerError> {
        if !self.is_playing || !self.device.is_initialized() || self.device.is_busy() {
            return Ok(false);
        }

        info!(index = ?self.current_index, "track ended");
        match self.next() {
            Ok(PlayOutcome::Started(_)) => Ok(true),
            Ok(PlayOutcome::Ignored(_)) => {
                self.stop_playback();
                Ok(false)
            }
            Err(e) => {
                self.stop_playback();
                Err(e)
            }
        }
    }

    /// Forget the current file so `state()` reads `Stopped` and neither
    /// `pause_resume` nor `poll_track_end` touches the device again.
    fn stop_playback(&mut self) {
        self.is_playing = false;
        self.current_file = None;
    }

    pub fn state(&self) -> PlaybackState {
        if self.is_playing {
            PlaybackState::Playing
        } else if self.current_file.is_some() {
            PlaybackState::Paused
        } else {
            PlaybackState::Stopped
        }
    }

    pub fn playlist(&self) -> &[PathBuf] {
        &self.playlist
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    #[cfg(test)]
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    #[cfg(test)]
    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Copy out everything the UI needs to render one frame.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            playlist: self.playlist.clone(),
            current_index: self.current_index,
            current_file: self.current_file.clone(),
            state: self.state(),
            looping: self.looping,
            volume: self.volume,
        }
    }

    #[cfg(test)]
    pub(crate) fn device(&self) -> &D {
        &self.device
    }

    #[cfg(test)]
    pub(crate) fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}
