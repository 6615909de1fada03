use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/staccato/config.toml` or `~/.config/staccato/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `STACCATO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Initial output volume in `[0.0, 1.0]`.
    pub volume: f32,
    /// Amount added or removed by one volume key press.
    pub volume_step: f32,
    /// How often the event loop checks for the end of the current track (milliseconds).
    pub poll_interval_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 0.7,
            volume_step: 0.05,
            poll_interval_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether single-track looping starts enabled.
    pub looping: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (without dot).
    pub extensions: Vec<String>,
    /// Match extensions exactly instead of ignoring ASCII case.
    pub case_sensitive_extensions: bool,
    /// Whether to include hidden files (dotfiles).
    pub include_hidden: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "wav".into(), "ogg".into(), "flac".into()],
            case_sensitive_extensions: false,
            include_hidden: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Width of the cover thumbnail in terminal cells (height is half that in rows).
    pub cover_size: u16,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ staccato ~ ".to_string(),
            cover_size: 16,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log file. Logging is disabled when unset, the terminal belongs to the UI.
    pub file: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directives, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: None,
            filter: "info".to_string(),
        }
    }
}
