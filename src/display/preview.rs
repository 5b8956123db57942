// ============================================================================
// Aperçu dans le terminal
// ============================================================================
// Affiche l'image avec ratatui : chaque cellule du terminal porte deux
// pixels empilés grâce au caractère '▀' (haut = couleur du texte,
// bas = couleur du fond). Le cadre du widget prend la couleur de bordure.
//
// CONCEPTS RUST :
// 1. Terminal raw mode + alternate screen, restaurés même en cas d'erreur
// 2. Raw mode désactivé si la suite de l'initialisation échoue
// ============================================================================

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;
use tracing::debug;

use crate::display::DisplayOutput;
use crate::error::{Result, TickerError};
use crate::ui::{Accent, Frame, Ink};

const HALF_BLOCK: &str = "▀";
const POLL_INTERVAL: Duration = Duration::from_millis(250);

type Backend = CrosstermBackend<io::Stdout>;

/// Affiche l'image dans le terminal et attend une touche
#[derive(Debug, Clone)]
pub struct TerminalPreview {
    accent: Accent,
}

impl TerminalPreview {
    pub fn new(accent: Accent) -> Self {
        Self { accent }
    }
}

fn ink_color(ink: Ink, accent: Accent) -> Color {
    let [r, g, b] = ink.to_rgb(accent);
    Color::Rgb(r, g, b)
}

/// Une ligne de texte pour chaque paire de lignes de pixels
pub fn frame_to_lines(frame: &Frame, accent: Accent) -> Vec<Line<'static>> {
    (0..frame.height())
        .step_by(2)
        .map(|y| {
            let spans: Vec<Span<'static>> = (0..frame.width())
                .map(|x| {
                    let top = frame.pixel(x, y).unwrap_or(Ink::White);
                    // Hauteur impaire : la dernière demi-ligne reste blanche
                    let bottom = frame.pixel(x, y + 1).unwrap_or(Ink::White);
                    Span::styled(
                        HALF_BLOCK,
                        Style::default()
                            .fg(ink_color(top, accent))
                            .bg(ink_color(bottom, accent)),
                    )
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn terminal_error(e: io::Error) -> TickerError {
    TickerError::output("terminal", e)
}

/// Repasse le terminal en mode normal si `result` est une erreur
fn rollback_raw_mode<T>(result: Result<T>) -> Result<T> {
    if result.is_err() {
        // L'erreur d'origine est plus utile que celle du rollback
        let _ = disable_raw_mode();
    }
    result
}

fn enter_alternate_screen() -> Result<Terminal<Backend>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(terminal_error)?;
    Terminal::new(CrosstermBackend::new(stdout)).map_err(terminal_error)
}

fn setup_terminal() -> Result<Terminal<Backend>> {
    enable_raw_mode().map_err(terminal_error)?;
    rollback_raw_mode(enter_alternate_screen())
}

fn restore_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode().map_err(terminal_error)?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(terminal_error)?;
    terminal.show_cursor().map_err(terminal_error)
}

/// Attend une touche pressée
fn wait_for_key() -> Result<()> {
    loop {
        if event::poll(POLL_INTERVAL).map_err(terminal_error)? {
            // Sur certains OS on reçoit Press et Release : on ne garde que Press
            if let Event::Key(key) = event::read().map_err(terminal_error)? {
                if key.kind == KeyEventKind::Press {
                    debug!(key = ?key.code, "Preview closed by key press");
                    return Ok(());
                }
            }
        }
    }
}

impl TerminalPreview {
    fn draw(&self, terminal: &mut Terminal<Backend>, frame: &Frame, border: Ink) -> Result<()> {
        let lines = frame_to_lines(frame, self.accent);
        let block = Block::default()
            .title(" inkyticker - une touche pour fermer ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ink_color(border, self.accent)));

        terminal
            .draw(|f| f.render_widget(Paragraph::new(lines).block(block), f.size()))
            .map_err(terminal_error)?;
        wait_for_key()
    }
}

impl DisplayOutput for TerminalPreview {
    fn show(&mut self, frame: &Frame, border: Ink) -> Result<()> {
        let mut terminal = setup_terminal()?;
        let result = self.draw(&mut terminal, frame, border);
        // Restaure le terminal même si le dessin a échoué
        restore_terminal(&mut terminal)?;
        result
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::*;

    #[test]
    fn test_rollback_keeps_original_error() {
        let failed: Result<()> = Err(TickerError::output("terminal", "no tty"));
        let err = rollback_raw_mode(failed).unwrap_err();
        assert!(matches!(err, TickerError::Output { ref reason, .. } if reason == "no tty"));

        assert_eq!(rollback_raw_mode(Ok(3)).unwrap(), 3);
    }

    #[test]
    fn test_two_pixel_rows_per_line() {
        let lines = frame_to_lines(&Frame::new(4, 5), Accent::Red);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| line.spans.len() == 4));
    }

    #[test]
    fn test_half_block_colors() {
        let mut frame = Frame::new(1, 2);
        frame
            .draw_iter([Pixel(Point::new(0, 0), Ink::Accent), Pixel(Point::new(0, 1), Ink::Black)])
            .unwrap();

        let lines = frame_to_lines(&frame, Accent::Red);
        let span = &lines[0].spans[0];
        assert_eq!(span.content, HALF_BLOCK);
        assert_eq!(span.style.fg, Some(Color::Rgb(200, 30, 30)));
        assert_eq!(span.style.bg, Some(Color::Rgb(0, 0, 0)));
    }
}
