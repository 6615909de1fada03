//! Application model types: `App`, playlist rows and input modes.
//!
//! The `App` struct holds what the UI shows: one row per playlist entry, the
//! search filter, the selection and the now-playing panel. It never touches
//! the controller; it is fed from `PlaybackSnapshot`s.

use std::path::{Path, PathBuf};

use image::RgbImage;
use image::imageops::FilterType;

use crate::controller::PlaybackSnapshot;
use crate::metadata::{self, Metadata, TrackTags};

/// One line of the playlist table.
#[derive(Debug, Clone)]
pub struct Row {
    pub path: PathBuf,
    pub tags: TrackTags,
    /// Seconds, `0.0` when unknown.
    pub duration: f64,
}

impl Row {
    pub fn read(path: &Path) -> Self {
        let (tags, duration) = metadata::track_info(path);
        Self {
            path: path.to_path_buf(),
            tags,
            duration,
        }
    }

    /// Case-insensitive substring match on the path or any tag field.
    fn matches(&self, query_lower: &str) -> bool {
        self.path
            .to_string_lossy()
            .to_lowercase()
            .contains(query_lower)
            || [&self.tags.title, &self.tags.artist, &self.tags.album]
                .iter()
                .any(|v| v.to_lowercase().contains(query_lower))
    }
}

/// Metadata shown in the details popup, tied to the file it was read from.
#[derive(Debug, Clone)]
pub struct Details {
    pub path: PathBuf,
    pub metadata: Metadata,
}

/// The track shown in the now-playing panel.
#[derive(Debug, Clone)]
pub struct NowPlaying {
    pub index: usize,
    pub path: PathBuf,
    pub label: String,
    /// Cover scaled to the thumbnail size, two pixel rows per terminal row.
    pub cover: Option<RgbImage>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    Filter,
    AddFolder,
}

/// The main application model.
pub struct App {
    pub rows: Vec<Row>,
    /// Playlist index of the highlighted row.
    pub selected: usize,
    pub input_mode: InputMode,
    pub filter_query: String,
    pub folder_input: String,
    pub status: Option<String>,
    pub now_playing: Option<NowPlaying>,
    pub details: Option<Details>,
    pub cover_size: u16,
}

impl App {
    pub fn new(cover_size: u16) -> Self {
        Self {
            rows: Vec::new(),
            selected: 0,
            input_mode: InputMode::Normal,
            filter_query: String::new(),
            folder_input: String::new(),
            status: None,
            now_playing: None,
            details: None,
            cover_size,
        }
    }

    /// Bring `rows` in line with `playlist`, reading metadata only for new entries.
    pub fn sync_rows(&mut self, playlist: &[PathBuf]) {
        let kept = self
            .rows
            .iter()
            .zip(playlist)
            .take_while(|(row, path)| row.path == **path)
            .count();

        self.rows.truncate(kept);
        self.rows
            .extend(playlist[kept..].iter().map(|p| Row::read(p)));
        self.ensure_selected_visible();
    }

    /// Refresh the now-playing panel when the current track changed.
    pub fn sync_now_playing(&mut self, snapshot: &PlaybackSnapshot) {
        let current = snapshot
            .current_index
            .zip(snapshot.current_file.as_ref());

        let Some((index, path)) = current else {
            self.now_playing = None;
            return;
        };

        if self
            .now_playing
            .as_ref()
            .is_some_and(|np| np.index == index && np.path == *path)
        {
            return;
        }

        let tags = match self.rows.get(index) {
            Some(row) if row.path == *path => row.tags.clone(),
            _ => metadata::extract_tags(path),
        };
        let cover = metadata::cover_image(path).map(|img| {
            let side = u32::from(self.cover_size.max(2));
            img.resize_exact(side, side, FilterType::Triangle).to_rgb8()
        });

        self.now_playing = Some(NowPlaying {
            index,
            path: path.clone(),
            label: now_playing_label(&tags),
            cover,
        });
    }

    /// Playlist indices of the rows passing the current filter, in playlist order.
    pub fn display_indices(&self) -> Vec<usize> {
        let query = self.filter_query.trim().to_lowercase();
        if query.is_empty() {
            return (0..self.rows.len()).collect();
        }

        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.matches(&query))
            .map(|(i, _)| i)
            .collect()
    }

    /// The selected playlist index, if it is currently visible.
    pub fn selected_index(&self) -> Option<usize> {
        let display = self.display_indices();
        display.contains(&self.selected).then_some(self.selected)
    }

    /// Return the next visible index in the current display order after `current`.
    /// Wraps around to the first element.
    pub fn next_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        let pos = display.iter().position(|&i| i == current);
        match pos {
            Some(p) => Some(display[(p + 1) % display.len()]),
            None => Some(display[0]),
        }
    }

    /// Return the previous visible index in the current display order before `current`.
    /// Wraps around to the last element.
    pub fn prev_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        let pos = display.iter().position(|&i| i == current);
        match pos {
            Some(0) => Some(display[display.len() - 1]),
            Some(p) => Some(display[p - 1]),
            None => Some(display[display.len() - 1]),
        }
    }

    /// Move selection to the next visible track.
    pub fn next(&mut self) {
        if let Some(next) = self.next_in_view_from(self.selected) {
            self.selected = next;
        }
    }

    /// Move selection to the previous visible track.
    pub fn prev(&mut self) {
        if let Some(prev) = self.prev_in_view_from(self.selected) {
            self.selected = prev;
        }
    }

    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx;
        self.ensure_selected_visible();
    }

    pub fn enter_filter_mode(&mut self) {
        self.input_mode = InputMode::Filter;
        self.ensure_selected_visible();
    }

    /// Leave filter mode, keeping the query applied.
    pub fn exit_filter_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.input_mode = InputMode::Normal;
        self.ensure_selected_visible();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    pub fn begin_add_folder(&mut self) {
        self.folder_input.clear();
        self.input_mode = InputMode::AddFolder;
    }

    /// Leave the folder prompt, returning what was typed.
    pub fn take_folder_input(&mut self) -> String {
        self.input_mode = InputMode::Normal;
        std::mem::take(&mut self.folder_input)
    }

    pub fn toggle_details(&mut self) {
        self.details = match self.details {
            Some(_) => None,
            None => self.rows.get(self.selected).map(|row| Details {
                path: row.path.clone(),
                metadata: Metadata::read(&row.path),
            }),
        };
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    /// Summary for the header, e.g. `"12 Tracks - 1 hr 3 min"`.
    pub fn summary(&self) -> String {
        playlist_summary(self.rows.iter().map(|r| r.duration))
    }

    /// Ensure that `selected` is part of the current filtered view,
    /// otherwise move selection to the first visible track.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            self.selected = 0;
            return;
        }

        if !display.contains(&self.selected) {
            self.selected = display[0];
        }
    }
}

fn now_playing_label(tags: &TrackTags) -> String {
    format!("{} - {}", tags.title, tags.artist)
}

/// Format seconds as `M:SS`, truncating partial seconds.
pub fn format_duration(secs: f64) -> String {
    let secs = if secs.is_finite() && secs > 0.0 {
        secs as u64
    } else {
        0
    };
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// `"<N> Tracks - <H> hr <M> min"` over per-track durations rounded to whole seconds.
///
/// Hours appear only when non-zero; minutes appear when minutes or hours are.
pub fn playlist_summary(durations: impl Iterator<Item = f64>) -> String {
    let mut count = 0usize;
    let mut total: u64 = 0;
    for d in durations {
        count += 1;
        if d.is_finite() && d > 0.0 {
            total += d.round() as u64;
        }
    }

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;

    let mut text = format!("{count} Tracks");
    if hours > 0 || minutes > 0 {
        text.push_str(" -");
        if hours > 0 {
            text.push_str(&format!(" {hours} hr"));
        }
        text.push_str(&format!(" {minutes} min"));
    }
    text
}
