use crate::app::{kind_label, App};
use minislot_core::{ReelPhase, Row, REEL_COUNT};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Modifier, Span, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(9),
            Constraint::Length(3),
            Constraint::Min(6),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);
    draw_reels(frame, root[1], app);
    draw_controls(frame, root[2], app);
    draw_events(frame, root[3], app);

    if app.show_help {
        draw_help_popup(frame, app);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let mut summary = format!(
        "{} {}  {} {}  {} {}",
        app.locale.text("Score", "分数"),
        session.score(),
        app.locale.text("Spins", "次数"),
        session.spin_count(),
        app.locale.text("Cost", "花费"),
        session.config.spin_cost
    );
    if session.bonus_active() {
        summary.push_str(&format!(
            "  {} {}",
            app.locale.text("BONUS", "奖励回合"),
            session.bonus_remaining()
        ));
    }
    if let Some(outcome) = session.last_outcome() {
        summary.push_str(&format!(
            "  {} {}",
            app.locale.text("last", "上次"),
            kind_label(app.locale, outcome.kind)
        ));
    }
    let lines = vec![
        Line::from(summary),
        Line::from(format!(
            "{}: {}",
            app.locale.text("Status", "状态"),
            app.status_line
        ))
        .bold(),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Minislot", "迷你老虎机"));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_reels(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, REEL_COUNT as u32); REEL_COUNT])
        .split(area);
    let faces = app.visible_faces();
    let winning = app.winning_cells();
    for (index, reel) in app.session.reels().iter().enumerate() {
        let mut lines = vec![Line::from("")];
        for row in Row::ALL {
            let symbol = faces[index].get(row);
            let mut style = Style::default();
            if row == Row::Center {
                style = style.add_modifier(Modifier::BOLD);
            }
            if winning.contains(&(index, row.index())) {
                style = style.fg(Color::Black).bg(Color::Yellow);
            } else if reel.is_spinning() {
                style = style.fg(Color::DarkGray);
            }
            lines.push(Line::from(Span::styled(
                format!(" {} ", app.symbol_name(symbol)),
                style,
            )));
            lines.push(Line::from(""));
        }
        let title = match reel.phase() {
            ReelPhase::Idle => format!("{} {}", app.locale.text("Reel", "转轮"), index + 1),
            ReelPhase::Spinning => format!("{} {} ~", app.locale.text("Reel", "转轮"), index + 1),
            ReelPhase::Stopping { .. } => {
                format!("{} {} ..", app.locale.text("Reel", "转轮"), index + 1)
            }
        };
        let mut block = Block::default().title(title).borders(Borders::ALL);
        if reel.is_spinning() {
            block = block.border_style(Style::default().fg(Color::Cyan));
        }
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(block),
            columns[index],
        );
    }
}

fn draw_controls(frame: &mut Frame, area: Rect, app: &App) {
    let controls = app.session.controls();
    let mut spans = Vec::new();
    let spin_style = if controls.spin {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    spans.push(Span::styled(
        format!("[{}] ", app.locale.text("Space spin", "空格 转动")),
        spin_style,
    ));
    for (index, enabled) in controls.stop.iter().enumerate() {
        let style = if *enabled {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(
            format!("[{} {}] ", index + 1, app.locale.text("stop", "停")),
            style,
        ));
    }
    spans.push(Span::raw(app.locale.text("r reset  ? help  q quit", "r 重置  ? 帮助  q 退出")));
    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let capacity = area.height.saturating_sub(2) as usize;
    let start = app.event_log.len().saturating_sub(capacity);
    let lines: Vec<Line<'_>> = app
        .event_log
        .iter()
        .skip(start)
        .map(|line| Line::from(line.clone()))
        .collect();
    let block = Block::default()
        .title(app.locale.text("Events", "事件"))
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_help_popup(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(app.locale.text(
            "space/enter: spin, then stop reels left to right",
            "空格/回车：转动，然后从左到右停轮",
        )),
        Line::from(app.locale.text(
            "1/2/3 or arrows: stop that reel (spins when idle)",
            "1/2/3 或方向键：停止对应转轮（空闲时转动）",
        )),
        Line::from(app.locale.text("r reset | ? help | q quit", "r 重置 | ? 帮助 | q 退出")),
        Line::from(""),
        Line::from(format!(
            "{}: {}",
            app.locale.text("Paylines", "连线"),
            app.session
                .config
                .paylines
                .lines()
                .iter()
                .map(|line| crate::app::line_label(app.locale, *line))
                .collect::<Vec<_>>()
                .join(", ")
        )),
    ];
    let block = Block::default()
        .title(app.locale.text("Help", "帮助"))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
