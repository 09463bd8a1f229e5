use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

use trim_studio::playback::PlaybackState;
use trim_studio::timecode;

pub fn draw(f: &mut Frame, state: &PlaybackState) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(3), // File info + status
            Constraint::Length(3), // Progress bar
            Constraint::Min(3),    // Error panel
            Constraint::Length(3), // Controls
        ])
        .split(size);

    let title = Paragraph::new("✂ Trim Studio Player")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    draw_file_info(f, chunks[1], state);
    draw_progress_bar(f, chunks[2], state);

    if state.has_error {
        draw_error(f, chunks[3], state);
    }

    draw_controls(f, chunks[4], state);
}

fn status_label(state: &PlaybackState) -> (&'static str, Color) {
    if state.has_error {
        ("ERROR", Color::Red)
    } else if state.playing {
        ("PLAYING", Color::Green)
    } else if state.loaded {
        ("PAUSED", Color::Yellow)
    } else {
        ("EMPTY", Color::DarkGray)
    }
}

fn draw_file_info(f: &mut Frame, area: Rect, state: &PlaybackState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(10)])
        .split(area);

    let file_info = match &state.current_file_path {
        Some(path) => {
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            format!("Loaded: {filename}")
        }
        None => "No file loaded".to_string(),
    };
    f.render_widget(
        Paragraph::new(file_info).style(Style::default().fg(Color::White)),
        chunks[0],
    );

    let (label, color) = status_label(state);
    let status = Paragraph::new(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Right);
    f.render_widget(status, chunks[1]);

    f.render_widget(Block::default().borders(Borders::BOTTOM), area);
}

/// `1:05.0 / 3:20.5`
pub fn time_label(state: &PlaybackState) -> String {
    format!(
        "{} / {}",
        timecode::format(state.position.as_secs_f64()),
        timecode::format(state.duration.as_secs_f64())
    )
}

fn draw_progress_bar(f: &mut Frame, area: Rect, state: &PlaybackState) {
    let ratio = state.progress_percent();

    let label_style = if ratio >= 0.5 {
        Style::default()
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio)
        .label(Span::styled(time_label(state), label_style));

    f.render_widget(gauge, area);
}

fn draw_error(f: &mut Frame, area: Rect, state: &PlaybackState) {
    let text = vec![
        Line::from(Span::styled(
            state.error_message.as_str(),
            Style::default().fg(Color::Red),
        )),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("[r]", Style::default().fg(Color::Yellow)),
            Span::raw(" to repair the audio engine"),
        ]),
    ];

    let panel = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Playback error "),
        );
    f.render_widget(panel, area);
}

fn draw_controls(f: &mut Frame, area: Rect, state: &PlaybackState) {
    let controls = vec![
        if state.playing {
            Span::styled("[space]", Style::default().fg(Color::Yellow))
        } else {
            Span::styled("[space]", Style::default().fg(Color::Green))
        },
        Span::raw(if state.playing { " pause  " } else { " play  " }),
        Span::styled("[←→]", Style::default().fg(Color::Magenta)),
        Span::raw(" ±5s  "),
        Span::styled("[⇧←→]", Style::default().fg(Color::Magenta)),
        Span::raw(" ±20%  "),
        Span::styled("[0-9]", Style::default().fg(Color::Blue)),
        Span::raw(" jump  "),
        Span::styled("[r]", Style::default().fg(Color::Yellow)),
        Span::raw(" repair  "),
        Span::styled("[q]", Style::default().fg(Color::Red)),
        Span::raw(" quit"),
    ];

    let widget = Paragraph::new(Line::from(controls))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(widget, area);
}
