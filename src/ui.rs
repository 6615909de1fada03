//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Padding, Paragraph, Row, Table, TableState, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, InputMode, format_duration};
use crate::config::UiSettings;
use crate::controller::{PlaybackSnapshot, PlaybackState};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("enter", "play selected");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next track");
    map.insert("+/-", "volume");
    map.insert("r", "loop track");
    map.insert("/", "search");
    map.insert("a", "add folder");
    map.insert("K", "details");
    map.insert("q", "quit");
    map
});

/// Render the controls help text.
fn controls_text() -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "enter", "space/p", "h/l", "+/-", "r", "/", "a", "K", "q",
    ];
    order
        .iter()
        .filter_map(|k| CONTROLS_MAP.get(k).map(|v| format!("[{}] {}", k, v)))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Half-block rendering: each cell shows the pixel above as foreground and the
/// pixel below as background.
fn cover_lines(cover: &image::RgbImage) -> Vec<Line<'static>> {
    let (w, h) = cover.dimensions();
    (0..h)
        .step_by(2)
        .map(|y| {
            let spans: Vec<Span> = (0..w)
                .map(|x| {
                    let top = cover.get_pixel(x, y).0;
                    let bottom = if y + 1 < h {
                        cover.get_pixel(x, y + 1).0
                    } else {
                        top
                    };
                    Span::styled(
                        "▀",
                        Style::default()
                            .fg(Color::Rgb(top[0], top[1], top[2]))
                            .bg(Color::Rgb(bottom[0], bottom[1], bottom[2])),
                    )
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn state_text(snapshot: &PlaybackSnapshot) -> &'static str {
    match snapshot.state {
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
        PlaybackState::Stopped => "Stopped",
    }
}

fn now_playing_lines(app: &App, snapshot: &PlaybackSnapshot) -> Vec<Line<'static>> {
    let title = match &app.now_playing {
        Some(np) => np.label.clone(),
        None => "Nothing playing".to_string(),
    };

    let mut lines = vec![
        Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(app.summary()),
        Line::from(format!(
            "{} • Loop: {} • Volume: {:.0}%",
            state_text(snapshot),
            if snapshot.looping { "ON" } else { "OFF" },
            snapshot.volume * 100.0
        )),
    ];

    match app.input_mode {
        InputMode::Filter => lines.push(Line::from(format!("Search: {}_", app.filter_query))),
        InputMode::AddFolder => lines.push(Line::from(format!("Add folder: {}_", app.folder_input))),
        InputMode::Normal if !app.filter_query.trim().is_empty() => {
            lines.push(Line::from(format!("Search: {}", app.filter_query.trim())))
        }
        InputMode::Normal => {}
    }

    if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }

    lines
}

fn draw_playlist(frame: &mut Frame, area: Rect, app: &App, snapshot: &PlaybackSnapshot, display: &[usize]) {
    let rows: Vec<Row> = display
        .iter()
        .enumerate()
        .map(|(pos, &i)| {
            let row = &app.rows[i];
            let style = if snapshot.current_index == Some(i) {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from((pos + 1).to_string()),
                Cell::from(row.tags.title.clone()),
                Cell::from(row.tags.artist.clone()),
                Cell::from(row.tags.album.clone()),
                Cell::from(format_duration(row.duration)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Percentage(35),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Length(7),
    ];
    let header = Row::new(vec!["#", "Title", "Artist", "Album", "Time"])
        .style(Style::default().add_modifier(Modifier::UNDERLINED));

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" playlist "))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = TableState::default();
    if let Some(pos) = display.iter().position(|&i| i == app.selected) {
        state.select(Some(pos));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_details(frame: &mut Frame, area: Rect, app: &App) {
    let Some(details) = &app.details else {
        return;
    };
    let meta = &details.metadata;

    let popup_area = centered_rect_sized(72, 9, area);
    frame.render_widget(Clear, popup_area);

    let cover = match &meta.cover {
        Some(img) => format!("{}x{}", img.width(), img.height()),
        None => "-".to_string(),
    };
    let text = format!(
        "Title: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nCover: {}\nPath: {}",
        meta.tags.title,
        meta.tags.artist,
        meta.tags.album,
        format_duration(meta.duration),
        cover,
        details.path.display()
    );

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .padding(Padding::left(1))
                .borders(Borders::ALL)
                .title(" details (K closes) "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    snapshot: &PlaybackSnapshot,
    display: &[usize],
    ui_settings: &UiSettings,
) {
    let cover_cols = ui_settings.cover_size.max(2);
    let cover_rows = cover_cols.div_ceil(2);
    let panel_height = (cover_rows + 2).max(7);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(panel_height),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" staccato ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let panel = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(cover_cols + 2), Constraint::Min(1)])
        .split(chunks[1]);

    let cover = app
        .now_playing
        .as_ref()
        .and_then(|np| np.cover.as_ref())
        .map(cover_lines)
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(cover).block(Block::default().borders(Borders::ALL).title(" cover ")),
        panel[0],
    );

    let info = Paragraph::new(now_playing_lines(app, snapshot))
        .block(
            Block::bordered()
                .padding(Padding::left(1))
                .title(" now playing "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(info, panel[1]);

    draw_playlist(frame, chunks[2], app, snapshot, display);
    draw_details(frame, chunks[2], app);

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding::left(1)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn controls_text_lists_every_binding_once() {
        let text = controls_text();
        for key in CONTROLS_MAP.keys() {
            assert_eq!(text.matches(&format!("[{key}]")).count(), 1, "{key}");
        }
    }

    #[test]
    fn cover_lines_pack_two_pixel_rows_per_line() {
        let mut img = RgbImage::from_pixel(4, 3, Rgb([10, 20, 30]));
        img.put_pixel(0, 1, Rgb([1, 2, 3]));

        let lines = cover_lines(&img);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 4);

        let first = lines[0].spans[0].style;
        assert_eq!(first.fg, Some(Color::Rgb(10, 20, 30)));
        assert_eq!(first.bg, Some(Color::Rgb(1, 2, 3)));

        // The odd last row repeats itself as background.
        let last = lines[1].spans[0].style;
        assert_eq!(last.bg, Some(Color::Rgb(10, 20, 30)));
    }

    #[test]
    fn centered_rect_stays_inside() {
        let outer = Rect::new(0, 0, 40, 10);
        let r = centered_rect_sized(72, 9, outer);
        assert!(r.width <= 38);
        assert!(r.height <= 8);
        assert!(r.x + r.width <= outer.width);
    }
}
