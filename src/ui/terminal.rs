use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::render::draw_board;
use crate::commands;
use crate::errors::AppError;
use crate::models::disposition::SortKey;
use crate::AppState;

const INPUT_POLL: Duration = Duration::from_millis(100);
const REDRAW_INTERVAL: Duration = Duration::from_millis(120);

/// What a key press asks the board to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    Sort(SortKey),
    Previous,
    Next,
    First,
    Last,
    /// Refresh, or retry from the error panel
    Refresh,
    Quit,
}

/// Key bindings. Columns are numbered in display order.
pub fn action_for(key: KeyEvent) -> Option<BoardAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(BoardAction::Quit);
    }
    match key.code {
        KeyCode::Char(c @ '1'..='6') => {
            let idx = c as usize - '1' as usize;
            Some(BoardAction::Sort(SortKey::COLUMNS[idx]))
        }
        KeyCode::Left | KeyCode::Char('h') => Some(BoardAction::Previous),
        KeyCode::Right | KeyCode::Char('l') => Some(BoardAction::Next),
        KeyCode::Home | KeyCode::Char('g') => Some(BoardAction::First),
        KeyCode::End | KeyCode::Char('G') => Some(BoardAction::Last),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(BoardAction::Refresh),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(BoardAction::Quit),
        _ => None,
    }
}

/// Start a fetch in the background so the board keeps drawing meanwhile.
fn spawn_fetch(state: &Arc<AppState>) {
    let state = state.clone();
    tokio::spawn(async move {
        // Failures are already stored on the board for the error panel
        let _ = commands::refresh(&state).await;
    });
}

async fn apply(state: &Arc<AppState>, action: BoardAction) {
    match action {
        BoardAction::Sort(key) => {
            commands::sort_by(state, key).await;
        }
        BoardAction::Previous => {
            commands::previous_page(state).await;
        }
        BoardAction::Next => {
            commands::next_page(state).await;
        }
        BoardAction::First => {
            commands::first_page(state).await;
        }
        BoardAction::Last => {
            commands::last_page(state).await;
        }
        BoardAction::Refresh => spawn_fetch(state),
        BoardAction::Quit => {}
    }
}

/// Forward key presses from a blocking reader thread until `stop` is set.
fn spawn_input_reader(
    tx: mpsc::UnboundedSender<KeyEvent>,
    stop: Arc<AtomicBool>,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !stop.load(Ordering::Relaxed) {
            match event::poll(INPUT_POLL) {
                Ok(true) => {
                    if let Ok(Event::Key(key)) = event::read() {
                        if tx.send(key).is_err() {
                            break;
                        }
                    }
                }
                Ok(false) => {}
                Err(e) => {
                    warn!("Input polling failed: {}", e);
                    break;
                }
            }
        }
    })
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: Arc<AppState>,
) -> Result<(), AppError> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let stop = Arc::new(AtomicBool::new(false));
    let reader = spawn_input_reader(tx, stop.clone());

    // Initial load, as on mount
    spawn_fetch(&state);

    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);
    let result = loop {
        let snapshot = commands::snapshot(&state).await;
        if let Err(e) = terminal.draw(|f| draw_board(f, &snapshot)) {
            break Err(AppError::Terminal(e.to_string()));
        }

        tokio::select! {
            key = rx.recv() => match key {
                Some(key) => match action_for(key) {
                    Some(BoardAction::Quit) => break Ok(()),
                    Some(action) => apply(&state, action).await,
                    None => {}
                },
                None => break Err(AppError::Terminal("input reader stopped".to_string())),
            },
            _ = redraw.tick() => {}
        }
    };

    stop.store(true, Ordering::Relaxed);
    let _ = reader.await;
    result
}

fn enter_board_screen() -> Result<Terminal<CrosstermBackend<Stdout>>, AppError> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Best-effort teardown after a failed setup; the setup error is what gets reported.
fn restore_terminal(out: &mut impl io::Write) {
    if let Err(e) = disable_raw_mode() {
        warn!("Failed to leave raw mode: {}", e);
    }
    if let Err(e) = execute!(out, LeaveAlternateScreen) {
        warn!("Failed to leave alternate screen: {}", e);
    }
}

/// Run the interactive board until the user quits.
pub async fn run(state: Arc<AppState>) -> Result<(), AppError> {
    enable_raw_mode()?;
    let mut terminal = match enter_board_screen() {
        Ok(terminal) => terminal,
        Err(e) => {
            restore_terminal(&mut io::stdout());
            return Err(e);
        }
    };

    info!("Terminal board started");
    let result = event_loop(&mut terminal, state).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_number_keys_sort_columns_in_display_order() {
        assert_eq!(
            action_for(press(KeyCode::Char('1'))),
            Some(BoardAction::Sort(SortKey::Symbol))
        );
        assert_eq!(
            action_for(press(KeyCode::Char('3'))),
            Some(BoardAction::Sort(SortKey::StockDate))
        );
        assert_eq!(
            action_for(press(KeyCode::Char('6'))),
            Some(BoardAction::Sort(SortKey::End))
        );
        assert_eq!(action_for(press(KeyCode::Char('7'))), None);
    }

    #[test]
    fn test_navigation_and_control_keys() {
        assert_eq!(action_for(press(KeyCode::Left)), Some(BoardAction::Previous));
        assert_eq!(action_for(press(KeyCode::Char('l'))), Some(BoardAction::Next));
        assert_eq!(action_for(press(KeyCode::Home)), Some(BoardAction::First));
        assert_eq!(action_for(press(KeyCode::End)), Some(BoardAction::Last));
        assert_eq!(action_for(press(KeyCode::Char('r'))), Some(BoardAction::Refresh));
        assert_eq!(action_for(press(KeyCode::Esc)), Some(BoardAction::Quit));
        assert_eq!(
            action_for(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(BoardAction::Quit)
        );
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(action_for(key), None);
    }

    #[test]
    fn test_restore_terminal_leaves_alternate_screen() {
        let mut out: Vec<u8> = Vec::new();
        restore_terminal(&mut out);
        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("\x1b[?1049l"));
    }
}
