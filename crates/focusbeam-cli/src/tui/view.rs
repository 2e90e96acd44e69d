use focusbeam_core::{format_clock, Phase, SessionType, Snapshot};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph, Tabs},
    Frame,
};

fn accent(session: SessionType) -> Color {
    let rgb = session.accent_rgb();
    Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

pub fn status_text(snap: &Snapshot) -> &'static str {
    match snap.phase {
        Phase::Finished => "Round finished, take a break.",
        Phase::Running => "Focus in progress…",
        Phase::Idle => "Adjust the duration, then start.",
    }
}

pub fn toggle_caption(snap: &Snapshot) -> &'static str {
    match snap.phase {
        Phase::Finished => "Start New Round",
        Phase::Running => "Pause",
        Phase::Idle => "Start",
    }
}

pub const LOCKED_HINT: &str = "Durations can't be changed while the timer is running.";

pub fn render(f: &mut Frame, snap: &Snapshot) {
    let color = accent(snap.current_type);
    let area = f.area();

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // header
            Constraint::Length(3), // session tabs
            Constraint::Length(1), // durations
            Constraint::Length(1), // locked hint
            Constraint::Length(3), // clock
            Constraint::Length(3), // progress
            Constraint::Length(1), // status
            Constraint::Length(1),
            Constraint::Length(1), // stats
            Constraint::Min(0),
            Constraint::Length(1), // key help
        ])
        .split(area);

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "FocusBeam",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Today's focus: {} min", snap.stats.total_focus_minutes),
            Style::default().fg(Color::Gray),
        )),
    ]);
    f.render_widget(header, sections[0]);

    let selected = SessionType::ALL
        .iter()
        .position(|t| *t == snap.current_type)
        .unwrap_or(0);
    let tabs = Tabs::new(
        SessionType::ALL
            .iter()
            .enumerate()
            .map(|(i, t)| Line::from(format!("{} {}", i + 1, t.label()))),
    )
    .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded))
    .select(selected)
    .highlight_style(Style::default().fg(color).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, sections[1]);

    // Duration controls render dimmed while running since they are ignored.
    let duration_style = if snap.is_running {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let durations: Vec<Span> = SessionType::ALL
        .iter()
        .enumerate()
        .flat_map(|(i, t)| {
            let mut style = duration_style;
            if *t == snap.current_type && !snap.is_running {
                style = style.fg(accent(*t));
            }
            let sep = if i == 0 { "" } else { "  ·  " };
            [
                Span::raw(sep),
                Span::styled(format!("{} {} min", t.label(), snap.durations.minutes(*t)), style),
            ]
        })
        .collect();
    f.render_widget(
        Paragraph::new(Line::from(durations)).alignment(Alignment::Center),
        sections[2],
    );
    if snap.is_running {
        f.render_widget(
            Paragraph::new(LOCKED_HINT)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            sections[3],
        );
    }

    let clock = Paragraph::new(vec![
        Line::from(Span::styled(
            snap.current_type.label(),
            Style::default().fg(color),
        )),
        Line::from(Span::styled(
            format_clock(snap.seconds_left),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(clock, sections[4]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded))
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio(snap.progress.clamp(0.0, 1.0))
        .label(format!("{:.0}%", snap.progress * 100.0));
    f.render_widget(gauge, sections[5]);

    f.render_widget(
        Paragraph::new(status_text(snap))
            .style(Style::default().fg(Color::LightMagenta))
            .alignment(Alignment::Center),
        sections[6],
    );

    let stats = format!(
        "Completed focus blocks: {}  •  Total focus: {} min",
        snap.stats.completed_focus_blocks, snap.stats.total_focus_minutes
    );
    f.render_widget(
        Paragraph::new(stats)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        sections[8],
    );

    let help = Line::from(vec![
        Span::styled("Space", Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(format!(" {}  •  ", toggle_caption(snap))),
        Span::styled("r", Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(" Reset  •  "),
        Span::styled("1-3/Tab", Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(" Session  •  "),
        Span::styled("+/-", Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(" ±5 min  •  "),
        Span::styled("q", Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(" Quit"),
    ]);
    f.render_widget(
        Paragraph::new(help).alignment(Alignment::Center),
        sections[10],
    );
}
