//! Watch command implementation - Interactive TUI.

// CLI watch uses intentional casts for display and timing
#![allow(
    clippy::needless_pass_by_value,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]

use super::{CliError, GameArgs, resolve_seed};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use hexrealm::game::PLAYER_COLORS;
use hexrealm::render::{render_conquest, tile_glyph};
use hexrealm::{Offset, PlayerId, RoundReport, Session};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io::stdout;
use std::time::{Duration, Instant};

/// Execute the watch command.
///
/// # Errors
///
/// Returns an error if the config is invalid or the TUI fails.
pub(crate) fn execute(game: &GameArgs, seed: Option<u64>, speed: u64) -> Result<(), CliError> {
    let config = game.resolve()?;
    let seed = resolve_seed(seed);
    let session = Session::new(&config, seed)?;
    run_tui(session, seed, config.rounds, speed)
}

/// App state for the TUI.
struct App {
    session: Session,
    seed: u64,
    max_rounds: u32,
    cursor: Offset,
    paused: bool,
    speed_ms: u64,
    last_step: Instant,
    last_report: Option<RoundReport>,
    message: String,
}

impl App {
    fn new(session: Session, seed: u64, max_rounds: u32, speed_ms: u64) -> Self {
        let cursor = session
            .grid()
            .player(session.active_player())
            .and_then(|p| p.home())
            .unwrap_or_else(|| session.grid().center());
        Self {
            session,
            seed,
            max_rounds,
            cursor,
            paused: true, // Start paused
            speed_ms,
            last_step: Instant::now(),
            last_report: None,
            message: String::from("Move the cursor and press [f] to plant the active player's flag"),
        }
    }

    fn is_over(&self) -> bool {
        self.session.round() >= self.max_rounds
    }

    fn record(&mut self, result: Result<Option<RoundReport>, hexrealm::GameError>) {
        match result {
            Ok(Some(report)) => {
                self.message = format!("Round {} complete", report.round);
                self.last_report = Some(report);
            }
            Ok(None) => {
                self.message = format!("Player {}'s turn", usize::from(self.session.active_player()) + 1);
            }
            Err(e) => self.message = e.to_string(),
        }
        self.last_step = Instant::now();
    }

    fn end_turn(&mut self) {
        if !self.is_over() {
            let result = self.session.end_player_turn();
            self.record(result);
        }
    }

    fn play_round(&mut self) {
        if !self.is_over() {
            let result = self.session.play_round().map(Some);
            self.record(result);
        }
    }

    fn place_flag(&mut self) {
        let player = self.session.active_player();
        self.message = match self.session.place_flag(self.cursor) {
            Ok(()) => format!("Player {} flag planted at {}", usize::from(player) + 1, self.cursor),
            Err(e) => e.to_string(),
        };
    }

    fn allocate(&mut self, to_military: bool) {
        let player = self.session.active_player();
        let resources = self.session.grid().player(player).map_or(0.0, |p| p.resources());
        let military = if to_military { resources } else { 0.0 };
        self.message = match self.session.allocate_active(military) {
            Ok(()) => format!(
                "Player {} put {resources:.0} into {}",
                usize::from(player) + 1,
                if to_military { "military" } else { "culture" }
            ),
            Err(e) => e.to_string(),
        };
    }

    fn move_cursor(&mut self, dq: i32, dr: i32) {
        let next = Offset::new(self.cursor.q + dq, self.cursor.r + dr);
        if self.session.grid().in_bounds(next) {
            self.cursor = next;
        }
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    fn increase_speed(&mut self) {
        self.speed_ms = self.speed_ms.saturating_sub(100).max(50);
    }

    fn decrease_speed(&mut self) {
        self.speed_ms = (self.speed_ms + 100).min(2000);
    }

    fn should_auto_step(&self) -> bool {
        !self.paused && !self.is_over() && self.last_step.elapsed() >= Duration::from_millis(self.speed_ms)
    }
}

fn run_tui(session: Session, seed: u64, max_rounds: u32, speed: u64) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    let mut app = App::new(session, seed, max_rounds, speed);

    loop {
        terminal.draw(|f| ui(f, &app)).map_err(|e| CliError::new(e.to_string()))?;

        if app.should_auto_step() {
            app.play_round();
        }

        if !event::poll(Duration::from_millis(50)).map_err(|e| CliError::new(e.to_string()))? {
            continue;
        }
        let Event::Key(key) = event::read().map_err(|e| CliError::new(e.to_string()))? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char(' ') => app.toggle_pause(),
            KeyCode::Left | KeyCode::Char('h') => app.move_cursor(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => app.move_cursor(1, 0),
            KeyCode::Up | KeyCode::Char('k') => app.move_cursor(0, -1),
            KeyCode::Down | KeyCode::Char('j') => app.move_cursor(0, 1),
            KeyCode::Char('f') => app.place_flag(),
            KeyCode::Char('m') => app.allocate(true),
            KeyCode::Char('c') => app.allocate(false),
            KeyCode::Enter | KeyCode::Char('n') => {
                app.paused = true;
                app.end_turn();
            }
            KeyCode::Char('r') => {
                app.paused = true;
                app.play_round();
            }
            KeyCode::Char('+' | '=') => app.increase_speed(),
            KeyCode::Char('-') => app.decrease_speed(),
            _ => {}
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Messages
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1]);

    render_map(f, main_chunks[0], app);
    render_stats(f, main_chunks[1], app);

    let message = Paragraph::new(app.message.as_str())
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[2]);

    render_footer(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let status = if app.is_over() {
        "GAME OVER"
    } else if app.paused {
        "PAUSED"
    } else {
        "RUNNING"
    };

    let title = format!(
        " hexrealm | Seed {} | Round {}/{} | Player {}'s turn | {} | Speed: {}ms ",
        app.seed,
        app.session.round(),
        app.max_rounds,
        usize::from(app.session.active_player()) + 1,
        status,
        app.speed_ms
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_map(f: &mut Frame, area: Rect, app: &App) {
    let grid = app.session.grid();
    let mut lines: Vec<Line> = Vec::new();

    let visible_height = (area.height as usize).saturating_sub(2).min(usize::from(grid.rows()));
    let visible_cols = ((area.width as usize).saturating_sub(3) / 2).min(usize::from(grid.cols()));

    for r in 0..visible_height as i32 {
        let mut spans = Vec::new();
        if r & 1 == 1 {
            spans.push(Span::raw(" "));
        }
        for q in 0..visible_cols as i32 {
            let coord = Offset::new(q, r);
            let Some(tile) = grid.get(coord) else {
                spans.push(Span::raw("  "));
                continue;
            };
            let mut style = Style::default().fg(tile.owner().map_or(
                if tile.is_land() { Color::Green } else { Color::Blue },
                player_color,
            ));
            if tile.flag_holder().is_some() {
                style = style.add_modifier(Modifier::BOLD);
            }
            if coord == app.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(tile_glyph(tile).to_string(), style));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    let title = match grid.get(app.cursor) {
        Some(tile) => format!(
            " Map | {} {} {} ",
            app.cursor,
            if tile.is_land() { "land" } else { "water" },
            tile.owner()
                .map_or_else(|| "unowned".to_string(), |o| format!("owned by player {}", usize::from(o) + 1))
        ),
        None => " Map ".to_string(),
    };
    let map_widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(map_widget, area);
}

fn render_stats(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();
    lines.push(Line::from(""));

    let active = app.session.active_player();
    for standing in app.session.standings() {
        let marker = if standing.player == active { "> " } else { "  " };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(
                format!("{} ", standing.name),
                Style::default()
                    .fg(player_color(standing.player))
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(format!(
            "    Tiles: {}  Sphere: {}",
            standing.territory, standing.sphere
        )));
        lines.push(Line::from(format!(
            "    Culture: {:.1}  Military: {:.1}",
            standing.culture, standing.military
        )));
        lines.push(Line::from(""));
    }

    if let Some(report) = &app.last_report {
        lines.push(Line::from(format!("Round {}: expansion +{}", report.round, report.expanded)));
        for outcome in &report.conquests {
            lines.push(Line::from(format!("  {}", render_conquest(outcome))));
        }
    }

    let stats_widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Players "))
        .wrap(Wrap { trim: false });

    f.render_widget(stats_widget, area);
}

/// Terminal color for a player's palette entry.
fn player_color(id: PlayerId) -> Color {
    let name = PLAYER_COLORS.get(usize::from(id)).copied().unwrap_or("white");
    parse_color(name)
}

fn parse_color(name: &str) -> Color {
    if let Some(rgb) = name.strip_prefix('#').and_then(|hex| u32::from_str_radix(hex, 16).ok()) {
        return Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8);
    }
    match name {
        "pink" => Color::Rgb(255, 192, 203),
        "orange" => Color::Rgb(255, 165, 0),
        _ => Color::White,
    }
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = if app.is_over() {
        " [q] Quit  [arrows] Cursor "
    } else {
        " [q] Quit  [arrows] Cursor  [f] Flag  [m/c] All to military/culture  [n] End turn  [r] Round  [Space] Auto  [+/-] Speed "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#BC8ED6"), Color::Rgb(0xBC, 0x8E, 0xD6));
        assert_eq!(parse_color("orange"), Color::Rgb(255, 165, 0));
        assert_eq!(parse_color("nope"), Color::White);
    }
}
