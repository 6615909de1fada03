//! Utilities for creating `rodio` sources and sinks from track paths.
//!
//! Opening and decoding happen before anything touches the output, so a bad
//! file never interrupts the track that is currently playing.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::device::DeviceError;

pub(super) type TrackSource = Decoder<BufReader<File>>;

/// Open `path` and wrap it in a decoder.
pub(super) fn open_source(path: &Path) -> Result<TrackSource, DeviceError> {
    let file = File::open(path).map_err(|source| DeviceError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    Decoder::new(BufReader::new(file)).map_err(|source| DeviceError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Create a playing `Sink` for `source` at `volume`.
pub(super) fn create_sink(
    stream: &OutputStream,
    source: TrackSource,
    looping: bool,
    volume: f32,
) -> Sink {
    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    if looping {
        sink.append(source.repeat_infinite());
    } else {
        sink.append(source);
    }
    sink.play();
    sink
}
