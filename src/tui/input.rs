//! Keyboard input mapping for the map viewer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::navigation::{Command, Direction};

/// Input action resulting from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Pan toward smaller x.
    PanLeft,
    /// Pan toward larger x.
    PanRight,
    /// Pan toward larger y.
    PanUp,
    /// Pan toward smaller y.
    PanDown,
    /// Zoom in.
    ZoomIn,
    /// Zoom out.
    ZoomOut,
    /// Restore the home view.
    Reset,
    /// Toggle help.
    Help,
    /// No action.
    None,
}

impl Action {
    /// The navigation command for this action, if it moves the view.
    #[must_use]
    pub fn command(self) -> Option<Command> {
        match self {
            Self::PanLeft => Some(Command::Pan(Direction::Left)),
            Self::PanRight => Some(Command::Pan(Direction::Right)),
            Self::PanUp => Some(Command::Pan(Direction::Up)),
            Self::PanDown => Some(Command::Pan(Direction::Down)),
            Self::ZoomIn => Some(Command::ZoomIn),
            Self::ZoomOut => Some(Command::ZoomOut),
            Self::Reset => Some(Command::Reset),
            Self::Quit | Self::Help | Self::None => None,
        }
    }
}

/// Input handler with configurable vim keys.
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    /// Enable vim-style keys (hjkl).
    pub vim_keys: bool,
}

impl InputHandler {
    /// Creates a new input handler.
    #[must_use]
    pub fn new(vim_keys: bool) -> Self {
        Self { vim_keys }
    }

    /// Handles a key event and returns the corresponding action.
    #[must_use]
    pub fn handle_key(&self, event: KeyEvent) -> Action {
        if event.modifiers.contains(KeyModifiers::CONTROL) {
            return match event.code {
                KeyCode::Char('c' | 'q') => Action::Quit,
                _ => Action::None,
            };
        }

        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,

            KeyCode::Char('a') | KeyCode::Left => Action::PanLeft,
            KeyCode::Char('d') | KeyCode::Right => Action::PanRight,
            KeyCode::Char('w') | KeyCode::Up => Action::PanUp,
            KeyCode::Char('s') | KeyCode::Down => Action::PanDown,

            KeyCode::Char('h') if self.vim_keys => Action::PanLeft,
            KeyCode::Char('l') if self.vim_keys => Action::PanRight,
            KeyCode::Char('k') if self.vim_keys => Action::PanUp,
            KeyCode::Char('j') if self.vim_keys => Action::PanDown,

            KeyCode::Char(']' | '+' | '=') => Action::ZoomIn,
            KeyCode::Char('[' | '-') => Action::ZoomOut,

            KeyCode::Char('r') => Action::Reset,

            KeyCode::Char('?') | KeyCode::F(1) => Action::Help,

            _ => Action::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn key_event_ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    #[test]
    fn test_quit_actions() {
        let handler = InputHandler::new(false);

        assert_eq!(handler.handle_key(key_event(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(handler.handle_key(key_event(KeyCode::Esc)), Action::Quit);
        assert_eq!(handler.handle_key(key_event_ctrl(KeyCode::Char('c'))), Action::Quit);
        assert_eq!(handler.handle_key(key_event_ctrl(KeyCode::Char('q'))), Action::Quit);
    }

    #[test]
    fn test_wasd_and_arrows() {
        let handler = InputHandler::new(false);

        for (keys, action) in [
            ([KeyCode::Char('a'), KeyCode::Left], Action::PanLeft),
            ([KeyCode::Char('d'), KeyCode::Right], Action::PanRight),
            ([KeyCode::Char('w'), KeyCode::Up], Action::PanUp),
            ([KeyCode::Char('s'), KeyCode::Down], Action::PanDown),
        ] {
            for key in keys {
                assert_eq!(handler.handle_key(key_event(key)), action, "{key:?}");
            }
        }
    }

    #[test]
    fn test_zoom_keys() {
        let handler = InputHandler::new(false);

        for c in [']', '+', '='] {
            assert_eq!(handler.handle_key(key_event(KeyCode::Char(c))), Action::ZoomIn);
        }
        for c in ['[', '-'] {
            assert_eq!(handler.handle_key(key_event(KeyCode::Char(c))), Action::ZoomOut);
        }
    }

    #[test]
    fn test_vim_keys_enabled() {
        let handler = InputHandler::new(true);

        assert_eq!(handler.handle_key(key_event(KeyCode::Char('h'))), Action::PanLeft);
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('j'))), Action::PanDown);
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('k'))), Action::PanUp);
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('l'))), Action::PanRight);
    }

    #[test]
    fn test_vim_keys_disabled() {
        let handler = InputHandler::new(false);

        assert_eq!(handler.handle_key(key_event(KeyCode::Char('k'))), Action::None);
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('j'))), Action::None);
    }

    #[test]
    fn test_reset_and_help() {
        let handler = InputHandler::default();

        assert_eq!(handler.handle_key(key_event(KeyCode::Char('r'))), Action::Reset);
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('?'))), Action::Help);
        assert_eq!(handler.handle_key(key_event(KeyCode::F(1))), Action::Help);
    }

    #[test]
    fn test_ctrl_letters_do_not_pan() {
        let handler = InputHandler::default();
        assert_eq!(handler.handle_key(key_event_ctrl(KeyCode::Char('d'))), Action::None);
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::default();
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('x'))), Action::None);
        assert_eq!(handler.handle_key(key_event(KeyCode::Tab)), Action::None);
    }

    #[test]
    fn test_action_commands() {
        assert_eq!(Action::PanLeft.command(), Some(Command::Pan(Direction::Left)));
        assert_eq!(Action::ZoomOut.command(), Some(Command::ZoomOut));
        assert_eq!(Action::Reset.command(), Some(Command::Reset));
        assert_eq!(Action::Quit.command(), None);
        assert_eq!(Action::Help.command(), None);
    }
}
