use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, warn};

use crate::app::App;
use crate::audio::{DeviceError, PlayerDevice, RodioDevice};
use crate::controller::Controller;
use crate::config;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    AudioOutput(DeviceError),
    #[error("cannot open audio output: device reports it is not initialized")]
    NotInitialized,
}

/// Open the default output device. Without it nothing can be played, so the
/// caller treats any error here as fatal.
pub fn open_device() -> Result<RodioDevice, StartupError> {
    let device = RodioDevice::open().map_err(|e| {
        error!(error = %e, "cannot open audio output");
        StartupError::AudioOutput(e)
    })?;

    if !device.is_initialized() {
        error!("audio output is not initialized");
        return Err(StartupError::NotInitialized);
    }
    Ok(device)
}

/// Folders named on the command line, or the current directory when none are.
pub fn startup_folders(args: impl Iterator<Item = String>) -> Vec<PathBuf> {
    let folders: Vec<PathBuf> = args.map(PathBuf::from).collect();
    if folders.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        folders
    }
}

/// Apply the configured playback defaults and load the startup folders.
pub fn apply_playback_defaults<D: PlayerDevice>(
    controller: &mut Controller<D>,
    app: &mut App,
    settings: &config::Settings,
    folders: &[PathBuf],
) {
    controller.set_volume(settings.audio.volume.clamp(0.0, 1.0));
    if settings.playback.looping {
        controller.toggle_loop();
    }

    for folder in folders {
        add_folder(controller, app, folder);
    }
    app.sync_rows(controller.playlist());
}

/// Append `folder` to the playlist and report the result in the status line.
pub fn add_folder<D: PlayerDevice>(controller: &mut Controller<D>, app: &mut App, folder: &Path) {
    match controller.load_playlist(folder, true) {
        Ok(added) => app.set_status(format!("{added} tracks added from {}", folder.display())),
        Err(e) => {
            warn!(error = %e, "cannot load folder");
            app.set_status(format!("{e}; 0 tracks added"));
        }
    }
}

/// Expand a leading `~/` against `$HOME`.
pub fn expand_home(input: &str) -> PathBuf {
    let input = input.trim();
    match (input.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ if input == "~" => std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(input)),
        _ => PathBuf::from(input),
    }
}
