// Keyboard event handling
//
// This module contains the keyboard event handler that processes
// user input and updates the application state accordingly.

use super::AppState;
use crossterm::event::KeyCode;

/// Handle keyboard events and update application state
///
/// Returns `true` if the application should continue running,
/// `false` if it should exit.
///
/// # Key Bindings
/// - `q`, `Q`, `Esc` - Quit the application
/// - `Up` / `Left` - Select previous interface
/// - `Down` / `Right` - Select next interface
/// - `g`, `G` - Cycle grouping mode (group / subnet / az / tags)
/// - `r`, `R` - Reload the snapshot file
/// - `+`, `=` - Slower refresh (increase interval)
/// - `-`, `_` - Faster refresh (decrease interval)
pub fn handle_key_event(app: &mut AppState, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            app.running = false;
            false
        }
        KeyCode::Up | KeyCode::Left => {
            app.select_previous();
            true
        }
        KeyCode::Down | KeyCode::Right => {
            app.select_next();
            true
        }
        KeyCode::Char('g') | KeyCode::Char('G') => {
            app.cycle_grouping();
            true
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.reload();
            true
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            app.increase_refresh_rate();
            true
        }
        KeyCode::Char('-') | KeyCode::Char('_') => {
            app.decrease_refresh_rate();
            true
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::RingConfig;
    use crate::model::Snapshot;

    fn app() -> AppState {
        AppState::new(Snapshot::default(), None, RingConfig::default())
    }

    #[test]
    fn test_quit_keys() {
        for key in [KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc] {
            let mut app = app();
            assert!(app.running);
            assert!(!handle_key_event(&mut app, key));
            assert!(!app.running);
        }
    }

    #[test]
    fn test_grouping_key_cycles_mode() {
        let mut app = app();
        let before = app.grouping.clone();
        assert!(handle_key_event(&mut app, KeyCode::Char('g')));
        assert_ne!(app.grouping, before);
    }

    #[test]
    fn test_refresh_keys_adjust_interval() {
        let mut app = app();
        let before = app.refresh_config.refresh_ms;
        handle_key_event(&mut app, KeyCode::Char('+'));
        assert!(app.refresh_config.refresh_ms > before);
        handle_key_event(&mut app, KeyCode::Char('-'));
        assert_eq!(app.refresh_config.refresh_ms, before);
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let mut app = app();
        assert!(handle_key_event(&mut app, KeyCode::Char('z')));
        assert!(app.running);
    }
}
