use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    ToggleHelp,
    CloseHelp,
    Activate,
    Press(usize),
    Reset,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => InputAction::Quit,
        KeyCode::Esc => InputAction::CloseHelp,
        KeyCode::Enter | KeyCode::Char(' ') => InputAction::Activate,
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        KeyCode::Char('r') => InputAction::Reset,
        KeyCode::Char('1') | KeyCode::Left => InputAction::Press(0),
        KeyCode::Char('2') | KeyCode::Down => InputAction::Press(1),
        KeyCode::Char('3') | KeyCode::Right => InputAction::Press(2),
        _ => InputAction::None,
    }
}
