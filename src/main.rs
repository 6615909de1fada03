mod app;
mod audio;
mod config;
mod controller;
mod library;
mod metadata;
mod runtime;
mod ui;

fn main() {
    if let Err(e) = runtime::run() {
        eprintln!("staccato: fatal: {e}");
        std::process::exit(1);
    }
}
