use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::{App, InputMode};
use crate::audio::PlayerDevice;
use crate::config;
use crate::controller::{Controller, ControllerError, PlayOutcome};
use crate::runtime::startup::{add_folder, expand_home};
use crate::ui;

/// Main terminal event loop: polls for the end of the current track on a fixed
/// tick, draws the UI and handles input. Returns `Ok(())` when the user quits.
pub fn run<D: PlayerDevice>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller<D>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick = Duration::from_millis(settings.audio.poll_interval_ms.max(1));
    let mut last_poll = Instant::now();

    loop {
        if last_poll.elapsed() >= tick {
            last_poll = Instant::now();
            poll_track_end(app, controller);
        }

        let snapshot = controller.snapshot();
        app.sync_rows(&snapshot.playlist);
        app.sync_now_playing(&snapshot);
        let display = app.display_indices();
        terminal.draw(|f| ui::draw(f, app, &snapshot, &display, &settings.ui))?;

        let timeout = tick.saturating_sub(last_poll.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, controller) {
                    break;
                }
            }
        }
    }

    info!("quit requested");
    Ok(())
}

fn poll_track_end<D: PlayerDevice>(app: &mut App, controller: &mut Controller<D>) {
    match controller.poll_track_end() {
        Ok(true) => follow_current(app, controller),
        Ok(false) => {}
        Err(e) => {
            warn!(error = %e, "auto-advance failed, playback stopped");
            app.set_status(format!("{e}; playback stopped"));
        }
    }
}

/// Move the selection onto the playing track unless the user is typing.
fn follow_current<D: PlayerDevice>(app: &mut App, controller: &Controller<D>) {
    if app.input_mode != InputMode::Normal {
        return;
    }
    if let Some(i) = controller.current_index() {
        app.set_selected(i);
    }
}

fn report_play<D: PlayerDevice>(
    app: &mut App,
    controller: &Controller<D>,
    result: Result<PlayOutcome, ControllerError>,
) {
    match result {
        Ok(PlayOutcome::Started(_)) => {
            app.status = None;
            follow_current(app, controller);
        }
        Ok(PlayOutcome::Ignored(reason)) => app.set_status(format!("nothing to play: {reason}")),
        Err(e) => {
            warn!(error = %e, "cannot play track");
            app.set_status(e.to_string());
        }
    }
}

fn play_selected<D: PlayerDevice>(app: &mut App, controller: &mut Controller<D>) {
    let Some(index) = app.selected_index() else {
        return;
    };
    let result = controller.play(index);
    report_play(app, controller, result);
}

fn change_volume<D: PlayerDevice>(controller: &mut Controller<D>, delta: f32) {
    let volume = (controller.volume() + delta).clamp(0.0, 1.0);
    controller.set_volume(volume);
}

/// Returns `true` when the loop should exit.
fn handle_key_event<D: PlayerDevice>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller<D>,
) -> bool {
    match app.input_mode {
        InputMode::Filter => {
            handle_filter_key(key, app, controller);
            false
        }
        InputMode::AddFolder => {
            handle_folder_key(key, app, controller);
            false
        }
        InputMode::Normal => handle_normal_key(key, settings, app, controller),
    }
}

fn handle_filter_key<D: PlayerDevice>(key: KeyEvent, app: &mut App, controller: &mut Controller<D>) {
    match key.code {
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Backspace => app.pop_filter_char(),
        KeyCode::Down => app.next(),
        KeyCode::Up => app.prev(),
        KeyCode::Enter => {
            if app.display_indices().is_empty() {
                return;
            }
            app.exit_filter_mode();
            play_selected(app, controller);
        }
        KeyCode::Char(c) if !c.is_control() => app.push_filter_char(c),
        _ => {}
    }
}

fn handle_folder_key<D: PlayerDevice>(key: KeyEvent, app: &mut App, controller: &mut Controller<D>) {
    match key.code {
        KeyCode::Esc => {
            app.take_folder_input();
        }
        KeyCode::Backspace => {
            app.folder_input.pop();
        }
        KeyCode::Enter => {
            let input = app.take_folder_input();
            if input.trim().is_empty() {
                return;
            }
            add_folder(controller, app, &expand_home(&input));
        }
        KeyCode::Char(c) if !c.is_control() => app.folder_input.push(c),
        _ => {}
    }
}

fn handle_normal_key<D: PlayerDevice>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller<D>,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Esc => app.details = None,
        KeyCode::Char('/') => app.enter_filter_mode(),
        KeyCode::Char('a') => app.begin_add_folder(),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => play_selected(app, controller),
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            controller.pause_resume();
        }
        KeyCode::Char('l') => {
            let result = controller.next();
            report_play(app, controller, result);
        }
        KeyCode::Char('h') => {
            let result = controller.previous();
            report_play(app, controller, result);
        }
        KeyCode::Char('r') => {
            let looping = controller.toggle_loop();
            app.set_status(if looping {
                "loop on (from the next track played)"
            } else {
                "loop off (from the next track played)"
            });
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            change_volume(controller, settings.audio.volume_step)
        }
        KeyCode::Char('-') => change_volume(controller, -settings.audio.volume_step),
        KeyCode::Char('K') => app.toggle_details(),
        _ => {}
    }

    false
}
