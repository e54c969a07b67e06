use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::{self, stdout};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::Config;
use crate::display::braille::{BrailleCanvas, DOTS_PER_CELL_X, DOTS_PER_CELL_Y};
use crate::renderer::ConcentricRenderer;
use crate::surface::SurfaceError;

/// Rows reserved for the status line.
const STATUS_ROWS: u16 = 1;

pub async fn run(config: Config) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Dot dimensions of the drawing area for a terminal of `cols` x `rows` cells.
fn surface_dots(cols: u16, rows: u16) -> (u32, u32) {
    (
        u32::from(cols) * DOTS_PER_CELL_X,
        u32::from(rows.saturating_sub(STATUS_ROWS)) * DOTS_PER_CELL_Y,
    )
}

/// Resize events arrive in bursts while a window is dragged; only the last
/// size is applied, once it has been stable for the settle delay.
struct PendingResize {
    settle: Duration,
    pending: Option<((u16, u16), Instant)>,
}

impl PendingResize {
    fn new(settle: Duration) -> Self {
        Self {
            settle,
            pending: None,
        }
    }

    fn push(&mut self, cols: u16, rows: u16, now: Instant) {
        self.pending = Some(((cols, rows), now));
    }

    /// Take the pending size if it has settled by `now`.
    fn take_settled(&mut self, now: Instant) -> Option<(u16, u16)> {
        match self.pending {
            Some((size, at)) if now.duration_since(at) >= self.settle => {
                self.pending = None;
                Some(size)
            }
            _ => None,
        }
    }
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, config: Config) -> Result<()> {
    let size = terminal
        .size()
        .map_err(|e| SurfaceError::Unavailable(format!("terminal size: {}", e)))?;
    let (width, height) = surface_dots(size.width, size.height);

    let mut renderer = ConcentricRenderer::new(BrailleCanvas::new(width, height), config.squares.policy());
    renderer.render_all()?;
    info!("Drew {} squares on {}x{} dots", renderer.policy().generations, width, height);

    let mut resize = PendingResize::new(Duration::from_millis(config.display.resize_settle_ms));
    let poll_interval = Duration::from_millis(16);

    loop {
        if let Some((cols, rows)) = resize.take_settled(Instant::now()) {
            let (width, height) = surface_dots(cols, rows);
            renderer.reinitialize(width, height);
            renderer.render_all()?;
            info!("Surface resized to {}x{} dots", width, height);
        }

        terminal.draw(|frame| {
            let area = frame.area();

            let block = ratatui::widgets::Block::default()
                .style(Style::default().bg(Color::Reset));
            frame.render_widget(block, area);

            let canvas_area = Rect::new(
                area.x,
                area.y + STATUS_ROWS.min(area.height),
                area.width,
                area.height.saturating_sub(STATUS_ROWS),
            );
            renderer.surface().render(frame, canvas_area);

            render_status(frame, area, &renderer);
        })?;

        if event::poll(poll_interval)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key {
                    KeyEvent {
                        code: KeyCode::Char('q'),
                        ..
                    }
                    | KeyEvent {
                        code: KeyCode::Char('c'),
                        modifiers: KeyModifiers::CONTROL,
                        ..
                    } => {
                        break;
                    }
                    KeyEvent {
                        code: KeyCode::Char('r'),
                        ..
                    } => {
                        renderer.render_all()?;
                        debug!("Redraw requested");
                    }
                    _ => {}
                },
                Event::Resize(cols, rows) => resize.push(cols, rows, Instant::now()),
                _ => {}
            }
        }
    }

    Ok(())
}

fn render_status(frame: &mut Frame, area: Rect, renderer: &ConcentricRenderer<BrailleCanvas>) {
    let extent = renderer.extent();
    let status = format!(
        " {} squares | {}x{} | [r]edraw | [q]uit ",
        renderer.policy().generations,
        extent.max_x + 1,
        extent.max_y + 1,
    );

    for (i, ch) in status.chars().enumerate() {
        if i < area.width as usize {
            let cell = frame.buffer_mut().cell_mut((area.x + i as u16, area.y));
            if let Some(cell) = cell {
                cell.set_char(ch);
                cell.set_fg(Color::DarkGray);
            }
        }
    }
}
