//! Playback/playlist controller.
//!
//! Owns the ordered playlist and the playback flags, drives a
//! [`PlayerDevice`](crate::audio::PlayerDevice) and hands out immutable
//! [`PlaybackSnapshot`]s to whoever renders them.

mod playlist;
mod state;

pub use playlist::Controller;
pub use state::*;
