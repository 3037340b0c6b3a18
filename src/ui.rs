#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation and sign loss when mapping play-area pixels to terminal cells; values are clamped first
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    // Allow precision loss when casting between numeric types since exact precision isn't critical for layout
    clippy::cast_precision_loss
)]

use crate::app::{App, Button};
use crate::components::{GameState, PlayArea, Popup, Position, Screen, Target, TargetStatus};
use crate::game::TIMER_WARNING_TENTHS;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

// Below this the play area is too cramped to aim at anything
const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 16;

const BUTTON_HEIGHT: u16 = 3;

/// Maps between terminal cells and play-area pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub area: Rect,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[must_use]
    pub fn new(area: Rect, play_area: PlayArea) -> Self {
        Self {
            area,
            width: play_area.width,
            height: play_area.height,
        }
    }

    /// Pixels covered by one cell, horizontally and vertically.
    #[must_use]
    pub fn cell_size(&self) -> (f32, f32) {
        (
            self.width / f32::from(self.area.width.max(1)),
            self.height / f32::from(self.area.height.max(1)),
        )
    }

    /// Centre of the cell in play-area pixels, or `None` outside the viewport.
    #[must_use]
    pub fn to_logical(&self, column: u16, row: u16) -> Option<(f32, f32)> {
        if !crate::app::rect_contains(self.area, column, row) {
            return None;
        }
        let (cell_w, cell_h) = self.cell_size();
        Some((
            (f32::from(column - self.area.x) + 0.5) * cell_w,
            (f32::from(row - self.area.y) + 0.5) * cell_h,
        ))
    }

    /// Cell containing the play-area point, clamped to the viewport.
    #[must_use]
    pub fn to_cell(&self, x: f32, y: f32) -> (u16, u16) {
        let (cell_w, cell_h) = self.cell_size();
        let max_col = self.area.width.saturating_sub(1);
        let max_row = self.area.height.saturating_sub(1);
        let col = ((x / cell_w).floor().max(0.0) as u16).min(max_col);
        let row = ((y / cell_h).floor().max(0.0) as u16).min(max_row);
        (self.area.x + col, self.area.y + row)
    }
}

pub fn render(f: &mut Frame, app: &mut App) {
    app.buttons.clear();
    app.viewport = None;

    if f.area().width < MIN_WIDTH || f.area().height < MIN_HEIGHT {
        let warning_text = Paragraph::new(
            "Terminal too small!\nPlease resize your terminal\nto continue playing.",
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Reaction Speed"));
        f.render_widget(warning_text, centered_rect(80, 50, f.area()));
        return;
    }

    match app.screen() {
        Screen::Start => render_start(f, app),
        Screen::Playing => render_game(f, app),
        Screen::Paused => {
            render_game(f, app);
            render_pause_overlay(f, app);
        }
        Screen::GameOver => render_game_over(f, app),
    }
}

fn render_start(f: &mut Frame, app: &mut App) {
    let area = centered_rect(60, 70, f.area());
    let layout = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(6),
        Constraint::Length(BUTTON_HEIGHT),
        Constraint::Length(1),
    ])
    .split(area);

    let title = Paragraph::new("REACTION SPEED")
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, layout[0]);

    let intro = Text::from(vec![
        Line::from("Click the targets before they vanish."),
        Line::from("Every hit scores level x 10 and adds time."),
        Line::from("Every miss costs time. Run out and it's over."),
        Line::from(""),
        Line::from(Span::styled(
            format!("Best: {}", app.best_score()),
            Style::default().fg(Color::Yellow),
        )),
    ]);
    let intro = Paragraph::new(intro)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(intro, layout[1]);

    render_buttons(f, app, layout[2], &[Button::Start]);

    let help = Paragraph::new("Space: start   S: sound   +/-: volume   Q: quit")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, layout[3]);
}

fn render_game(f: &mut Frame, app: &mut App) {
    let layout = Layout::vertical([
        Constraint::Length(BUTTON_HEIGHT),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .split(f.area());

    let header = Layout::horizontal([Constraint::Min(20), Constraint::Length(12)]).split(layout[0]);

    let game_state = app.world.resource::<GameState>();
    let timer_style = if game_state.time_left_tenths <= TIMER_WARNING_TENTHS {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let stats = Line::from(vec![
        Span::raw(format!("Score: {}   ", game_state.score)),
        Span::raw(format!("Level: {}   ", game_state.level)),
        Span::raw("Time: "),
        Span::styled(format!("{:.1}", game_state.time_left()), timer_style),
    ]);
    let instruction = game_state.instruction;
    f.render_widget(
        Paragraph::new(stats).block(Block::default().borders(Borders::ALL)),
        header[0],
    );

    if app.screen() == Screen::Playing {
        render_buttons(f, app, header[1], &[Button::Pause]);
    }

    let board = Block::default()
        .borders(Borders::ALL)
        .title("Reaction Speed");
    let inner = board.inner(layout[1]);
    f.render_widget(board, layout[1]);

    let play_area = *app.world.resource::<PlayArea>();
    let viewport = Viewport::new(inner, play_area);
    render_targets(f, app, &viewport);
    render_popups(f, app, &viewport);

    if let Some(text) = instruction {
        let message = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
        let row = Rect {
            x: inner.x,
            y: inner.y + inner.height / 2,
            width: inner.width,
            height: 1,
        };
        f.render_widget(message, row);
    }

    if app.screen() == Screen::Playing {
        app.viewport = Some(viewport);
    }

    let help = Paragraph::new("Click targets   Esc: pause   Q: quit")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, layout[2]);
}

fn render_targets(f: &mut Frame, app: &mut App, viewport: &Viewport) {
    let mut targets: Vec<(Target, Position)> = app
        .world
        .query::<(&Target, &Position)>()
        .iter(&app.world)
        .map(|(target, position)| (target.clone(), *position))
        .collect();
    // Later spawns are drawn on top
    targets.sort_by_key(|(target, _)| target.serial);

    for (target, position) in &targets {
        render_target(f, viewport, target, *position);
    }
}

fn render_target(f: &mut Frame, viewport: &Viewport, target: &Target, position: Position) {
    let (left, top) = viewport.to_cell(position.x, position.y);
    let (right, bottom) = viewport.to_cell(position.x + target.size, position.y + target.size);

    let inside = |col: u16, row: u16| {
        viewport
            .to_logical(col, row)
            .is_some_and(|(x, y)| target.contains(position, x, y))
    };

    let (symbol, fill, edge) = match target.status {
        TargetStatus::Live => ("█", target.fill_color(), target.edge_color()),
        TargetStatus::Hit => ("▓", Color::LightGreen, Color::Green),
        TargetStatus::Missed => ("░", Color::DarkGray, Color::DarkGray),
    };

    let mut painted = false;
    for row in top..=bottom {
        for col in left..=right {
            if !inside(col, row) {
                continue;
            }
            let on_edge = !inside(col.saturating_sub(1), row)
                || !inside(col + 1, row)
                || !inside(col, row.saturating_sub(1))
                || !inside(col, row + 1);
            if let Some(cell) = f.buffer_mut().cell_mut((col, row)) {
                cell.set_symbol(symbol);
                cell.set_fg(if on_edge { edge } else { fill });
            }
            painted = true;
        }
    }

    // Small targets on coarse terminals still get one cell
    if !painted {
        let half = target.size / 2.0;
        let (col, row) = viewport.to_cell(position.x + half, position.y + half);
        if let Some(cell) = f.buffer_mut().cell_mut((col, row)) {
            cell.set_symbol(symbol);
            cell.set_fg(fill);
        }
    }
}

fn render_popups(f: &mut Frame, app: &mut App, viewport: &Viewport) {
    let popups: Vec<(String, Position)> = app
        .world
        .query::<(&Popup, &Position)>()
        .iter(&app.world)
        .map(|(popup, position)| (popup.text.clone(), *position))
        .collect();

    for (text, position) in popups {
        let (col, row) = viewport.to_cell(position.x, position.y);
        let available = viewport.area.right().saturating_sub(col);
        let width = (text.chars().count() as u16).min(available);
        if width == 0 {
            continue;
        }
        let popup = Paragraph::new(text).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
        f.render_widget(
            popup,
            Rect {
                x: col,
                y: row,
                width,
                height: 1,
            },
        );
    }
}

fn render_pause_overlay(f: &mut Frame, app: &mut App) {
    let area = centered_rect(50, 50, f.area());
    f.render_widget(Clear, area);
    let block = Block::default().borders(Borders::ALL).title("Paused");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let layout = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(BUTTON_HEIGHT),
        Constraint::Length(1),
    ])
    .split(inner);

    let title = Paragraph::new("PAUSED")
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD));
    f.render_widget(title, layout[0]);

    render_buttons(f, app, layout[1], &[Button::Resume, Button::Menu]);

    let help = Paragraph::new("Esc: resume   M: menu")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, layout[2]);
}

fn render_game_over(f: &mut Frame, app: &mut App) {
    let area = centered_rect(60, 70, f.area());
    let layout = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(BUTTON_HEIGHT),
        Constraint::Length(1),
    ])
    .split(area);

    let title = Paragraph::new("GAME OVER")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, layout[0]);

    let best = app.best_score();
    let game_state = app.game_state();
    let mut lines = vec![
        Line::from(format!("Final score: {}", game_state.score)),
        Line::from(format!("Best: {best}")),
        Line::from(format!(
            "Hits: {}   Misses: {}",
            game_state.hits, game_state.misses
        )),
    ];
    if game_state.new_record {
        lines.push(Line::from(Span::styled(
            "NEW RECORD!",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
    }
    let summary = Paragraph::new(Text::from(lines)).alignment(Alignment::Center);
    f.render_widget(summary, layout[1]);

    render_buttons(f, app, layout[2], &[Button::Restart, Button::Menu]);

    let help = Paragraph::new("Space: play again   M: menu   Q: quit")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, layout[3]);
}

/// Draws the buttons side by side, centred in `area`, and registers them for clicks.
fn render_buttons(f: &mut Frame, app: &mut App, area: Rect, buttons: &[Button]) {
    let widths: Vec<u16> = buttons
        .iter()
        .map(|button| button.label().len() as u16 + 4)
        .collect();
    let gap = 2u16;
    let total: u16 = widths.iter().sum::<u16>() + gap * buttons.len().saturating_sub(1) as u16;
    let mut x = area.x + area.width.saturating_sub(total) / 2;

    for (button, width) in buttons.iter().zip(widths) {
        let width = width.min(area.right().saturating_sub(x));
        if width == 0 {
            break;
        }
        let rect = Rect {
            x,
            y: area.y,
            width,
            height: BUTTON_HEIGHT.min(area.height),
        };
        let widget = Paragraph::new(button.label())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(widget, rect);
        app.buttons.push((rect, *button));
        x = x.saturating_add(width + gap);
    }
}

/// Helper function to create a centered rect using up certain percentage of the available rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
