//! UI-side state: playlist rows with their tags, search filter, selection and
//! the now-playing panel. Fed from controller snapshots, never drives playback.

mod model;

pub use model::*;
