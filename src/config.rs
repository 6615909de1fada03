//! Layered settings: struct defaults, an optional `config.toml`, then
//! `STACCATO__*` environment variables.

mod load;
mod schema;

pub use schema::*;
