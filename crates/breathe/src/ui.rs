//! UI rendering

use breathe::{render, Phase};
use haven_core::format;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};

use crate::app::App;

const BENEFITS: [(&str, &str); 3] = [
    ("Reduce Stress", "Calm your nervous system and reduce anxiety"),
    ("Clear Mind", "Improve focus and mental clarity"),
    ("Better Sleep", "Relax your body for restful sleep"),
];

/// Circle radius at scale 1.0, in canvas units (the y axis spans 4)
const BASE_RADIUS: f64 = 1.2;

/// Main draw function
pub fn draw(f: &mut Frame, app: &App) {
    let benefits_height = if app.show_benefits { 5 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),               // Header
            Constraint::Min(8),                  // Circle
            Constraint::Length(4),               // Status
            Constraint::Length(benefits_height), // Benefits
            Constraint::Length(1),               // Footer
        ])
        .split(f.area());

    draw_header(f, chunks[0]);
    draw_circle(f, app, chunks[1]);
    draw_status(f, app, chunks[2]);
    if app.show_benefits {
        draw_benefits(f, chunks[3]);
    }
    draw_footer(f, chunks[4]);

    if app.show_help {
        draw_help_overlay(f);
    }
}

/// Terminal color for a palette hue
fn hue(name: &str) -> Color {
    match name {
        "teal" => Color::Rgb(45, 212, 191),
        "cyan" => Color::Rgb(6, 182, 212),
        "blue" => Color::Rgb(96, 165, 250),
        "indigo" => Color::Rgb(99, 102, 241),
        "purple" => Color::Rgb(168, 85, 247),
        "pink" => Color::Rgb(236, 72, 153),
        "violet" => Color::Rgb(167, 139, 250),
        _ => Color::White,
    }
}

fn phase_colors(phase: Phase) -> (Color, Color) {
    let palette = phase.spec().palette;
    (hue(palette.from), hue(palette.to))
}

fn draw_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![Line::from(vec![
        Span::styled(" Breathing Exercises ", Style::default().fg(Color::Magenta).bold()),
        Span::raw(" - "),
        Span::styled(
            "Take a moment to center yourself with guided breathing",
            Style::default().fg(Color::DarkGray),
        ),
    ])])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );

    f.render_widget(header, area);
}

fn draw_circle(f: &mut Frame, app: &App, area: Rect) {
    let view = app.session.view();
    let scale = render::circle_scale(&view, app.session.tick_progress());
    let (glow, core) = phase_colors(view.phase);

    // Cells are about twice as tall as wide; the y axis spans 4 units
    let inner_w = area.width.saturating_sub(2).max(1) as f64;
    let inner_h = area.height.saturating_sub(2).max(1) as f64;
    let x_half = inner_w / inner_h;

    let radius = BASE_RADIUS * scale;
    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .marker(Marker::Braille)
        .x_bounds([-x_half, x_half])
        .y_bounds([-2.0, 2.0])
        .paint(move |ctx| {
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius: radius * 1.15,
                color: glow,
            });
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius,
                color: core,
            });
        });

    f.render_widget(canvas, area);
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let view = app.session.view();
    let (_, core) = phase_colors(view.phase);

    let (control, control_color) = if view.running {
        ("running - Space to pause", Color::Green)
    } else if view.elapsed_total == 0 {
        ("Space to begin", Color::Cyan)
    } else {
        ("paused - Space to resume", Color::Yellow)
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(view.phase.label(), Style::default().fg(core).bold()),
            Span::raw("  "),
            Span::styled(view.remaining.to_string(), Style::default().fg(Color::White).bold()),
        ])
        .centered(),
        Line::from(vec![
            Span::styled("Total time: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format::clock(view.elapsed_total)),
            Span::styled("   Cycles: ", Style::default().fg(Color::DarkGray)),
            Span::raw(app.session.cycles_completed().to_string()),
        ])
        .centered(),
        Line::from(Span::styled(control, Style::default().fg(control_color))).centered(),
    ];

    let status = Paragraph::new(lines).block(Block::default().borders(Borders::TOP));
    f.render_widget(status, area);
}

fn draw_benefits(f: &mut Frame, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for ((title, text), col) in BENEFITS.iter().zip(cols.iter()) {
        let card = Paragraph::new(*text)
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(format!(" {} ", title))
                    .title_style(Style::default().fg(Color::Magenta).bold())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(card, *col);
    }
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let help = Line::from(vec![
        Span::styled(" Space", Style::default().fg(Color::Cyan).bold()),
        Span::raw(" start/pause  "),
        Span::styled("r", Style::default().fg(Color::Cyan).bold()),
        Span::raw(" reset  "),
        Span::styled("?", Style::default().fg(Color::Cyan).bold()),
        Span::raw(" help  "),
        Span::styled("q", Style::default().fg(Color::Cyan).bold()),
        Span::raw(" quit"),
    ]);

    let footer = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, area);
}

fn draw_help_overlay(f: &mut Frame) {
    let area = f.area();

    let popup_width = area.width.min(46);
    let popup_height = area.height.min(12);
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);

    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(k, Style::default().fg(Color::Cyan)),
            Span::raw(what),
        ])
    };

    let mut help_text = vec![
        Line::from(""),
        key("  Space/Enter  ", "Start or pause"),
        key("  r            ", "Reset to the first inhale"),
        key("  ?            ", "Toggle this help"),
        key("  q / Esc      ", "Quit"),
        Line::from(""),
    ];
    for p in Phase::ALL {
        help_text.push(Line::from(vec![
            Span::styled(format!("  {:<13}", p.label()), Style::default().fg(phase_colors(p).1)),
            Span::raw(format!("{}s", p.duration())),
        ]));
    }

    let help_popup = Paragraph::new(help_text).block(
        Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(Style::default().fg(Color::Yellow).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    f.render_widget(help_popup, popup_area);
}
