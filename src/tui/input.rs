use crate::hotkeys::KeyToken;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Keys the browsing view consumes before hotkey dispatch. Key capture
/// refuses them so a folder binding can never shadow a control.
pub const RESERVED_KEYS: &[&str] = &[
    "Left", "Right", "Space", "Up", "Down", "Enter", "Escape", "q", "a", "b", "r", "x", "?",
];

pub fn is_reserved(token: &KeyToken) -> bool {
    RESERVED_KEYS.contains(&token.as_str())
}

/// Result of handling a key event in the browsing view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Show the next image
    NextImage,
    /// Show the previous image
    PrevImage,
    /// Undo the last move
    Undo,
    /// Toggle help overlay
    Help,
    /// Move the sidebar selection up
    SelectPrev,
    /// Move the sidebar selection down
    SelectNext,
    /// Classify into the selected folder
    ClassifySelected,
    /// Start key capture for the selected folder
    BeginCapture,
    /// Open the new-folder prompt
    AddFolder,
    /// Open the rename prompt for the selected folder
    RenameFolder,
    /// Ask to delete the selected folder
    DeleteFolder,
    /// Dispatch a classification hotkey
    Hotkey(KeyToken),
    /// No action
    None,
}

/// Maps keyboard events to browsing actions. Unreserved keys fall
/// through to hotkey dispatch.
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Quit,

        (KeyCode::Right, KeyModifiers::NONE) => KeyAction::NextImage,
        (KeyCode::Char(' '), KeyModifiers::NONE) => KeyAction::NextImage,
        (KeyCode::Left, KeyModifiers::NONE) => KeyAction::PrevImage,

        (KeyCode::Char('z'), KeyModifiers::CONTROL) => KeyAction::Undo,

        (KeyCode::Up, KeyModifiers::NONE) => KeyAction::SelectPrev,
        (KeyCode::Down, KeyModifiers::NONE) => KeyAction::SelectNext,
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::ClassifySelected,

        (KeyCode::Char('b'), KeyModifiers::NONE) => KeyAction::BeginCapture,
        (KeyCode::Char('a'), KeyModifiers::NONE) => KeyAction::AddFolder,
        (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::RenameFolder,
        (KeyCode::Char('x'), KeyModifiers::NONE) => KeyAction::DeleteFolder,

        // Some terminals report '?' with an explicit shift modifier.
        (KeyCode::Char('?'), KeyModifiers::NONE | KeyModifiers::SHIFT) => KeyAction::Help,

        _ => match KeyToken::from_key_event(&key) {
            Some(token) => KeyAction::Hotkey(token),
            None => KeyAction::None,
        },
    }
}

/// Result of a key press while capturing a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureAction {
    /// Bind this key
    Bind(KeyToken),
    /// The key is reserved for UI controls and cannot be bound
    Reserved(KeyToken),
    /// Abort the capture
    Cancel,
    /// Ineligible key (modifier combo, Tab, ...)
    None,
}

/// Maps a key press in capture mode. Esc always cancels, so Escape is
/// never a bindable key.
pub fn handle_capture_input(key: KeyEvent) -> CaptureAction {
    if key.code == KeyCode::Esc {
        return CaptureAction::Cancel;
    }
    match KeyToken::from_key_event(&key) {
        Some(token) if is_reserved(&token) => CaptureAction::Reserved(token),
        Some(token) => CaptureAction::Bind(token),
        None => CaptureAction::None,
    }
}

/// Result of a key press in a yes/no confirmation overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    Confirm,
    Cancel,
    None,
}

/// Maps keyboard events in confirmation overlays (rebind, delete).
pub fn handle_confirm_input(key: KeyEvent) -> ConfirmAction {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return ConfirmAction::None;
    }
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => ConfirmAction::Confirm,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => ConfirmAction::Cancel,
        _ => ConfirmAction::None,
    }
}

/// Result of a key press in a text-entry overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextAction {
    Submit,
    Cancel,
    Backspace,
    Insert(char),
    None,
}

/// Maps keyboard events in text-entry overlays (new folder, rename).
pub fn handle_text_input(key: KeyEvent) -> TextAction {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return TextAction::None;
    }
    match key.code {
        KeyCode::Enter => TextAction::Submit,
        KeyCode::Esc => TextAction::Cancel,
        KeyCode::Backspace => TextAction::Backspace,
        KeyCode::Char(c) => TextAction::Insert(c),
        _ => TextAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_quit() {
        assert_eq!(handle_key_event(press(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(handle_key_event(press(KeyCode::Esc)), KeyAction::Quit);

        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(key), KeyAction::Quit);
    }

    #[test]
    fn test_key_navigation() {
        assert_eq!(
            handle_key_event(press(KeyCode::Right)),
            KeyAction::NextImage
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Char(' '))),
            KeyAction::NextImage
        );
        assert_eq!(handle_key_event(press(KeyCode::Left)), KeyAction::PrevImage);
    }

    #[test]
    fn test_key_undo() {
        let key = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(key), KeyAction::Undo);
    }

    #[test]
    fn test_key_folder_selection() {
        assert_eq!(handle_key_event(press(KeyCode::Up)), KeyAction::SelectPrev);
        assert_eq!(
            handle_key_event(press(KeyCode::Down)),
            KeyAction::SelectNext
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Enter)),
            KeyAction::ClassifySelected
        );
    }

    #[test]
    fn test_key_folder_management() {
        assert_eq!(
            handle_key_event(press(KeyCode::Char('b'))),
            KeyAction::BeginCapture
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Char('a'))),
            KeyAction::AddFolder
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Char('r'))),
            KeyAction::RenameFolder
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Char('x'))),
            KeyAction::DeleteFolder
        );
    }

    #[test]
    fn test_unreserved_keys_become_hotkeys() {
        assert_eq!(
            handle_key_event(press(KeyCode::Char('g'))),
            KeyAction::Hotkey(KeyToken::from_char('g'))
        );
        assert_eq!(
            handle_key_event(press(KeyCode::F(5))),
            KeyAction::Hotkey(KeyToken::new("F5").unwrap())
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Char('3'))),
            KeyAction::Hotkey(KeyToken::from_char('3'))
        );
    }

    #[test]
    fn test_ineligible_keys_do_nothing() {
        assert_eq!(handle_key_event(press(KeyCode::Tab)), KeyAction::None);

        let alt = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::ALT);
        assert_eq!(handle_key_event(alt), KeyAction::None);
    }

    #[test]
    fn test_capture_binds_plain_keys() {
        assert_eq!(
            handle_capture_input(press(KeyCode::Char('g'))),
            CaptureAction::Bind(KeyToken::from_char('g'))
        );
        assert_eq!(
            handle_capture_input(press(KeyCode::PageUp)),
            CaptureAction::Bind(KeyToken::new("PageUp").unwrap())
        );
    }

    #[test]
    fn test_capture_rejects_reserved_and_esc() {
        assert_eq!(handle_capture_input(press(KeyCode::Esc)), CaptureAction::Cancel);
        assert_eq!(
            handle_capture_input(press(KeyCode::Char('q'))),
            CaptureAction::Reserved(KeyToken::from_char('q'))
        );
        assert_eq!(
            handle_capture_input(press(KeyCode::Left)),
            CaptureAction::Reserved(KeyToken::new("Left").unwrap())
        );
        assert_eq!(handle_capture_input(press(KeyCode::Tab)), CaptureAction::None);
    }

    #[test]
    fn test_confirm_keys() {
        assert_eq!(
            handle_confirm_input(press(KeyCode::Char('y'))),
            ConfirmAction::Confirm
        );
        assert_eq!(
            handle_confirm_input(press(KeyCode::Enter)),
            ConfirmAction::Confirm
        );
        assert_eq!(
            handle_confirm_input(press(KeyCode::Char('n'))),
            ConfirmAction::Cancel
        );
        assert_eq!(
            handle_confirm_input(press(KeyCode::Esc)),
            ConfirmAction::Cancel
        );
        assert_eq!(
            handle_confirm_input(press(KeyCode::Char('q'))),
            ConfirmAction::None
        );
    }

    #[test]
    fn test_text_entry_keys() {
        assert_eq!(
            handle_text_input(press(KeyCode::Char('C'))),
            TextAction::Insert('C')
        );
        assert_eq!(
            handle_text_input(press(KeyCode::Backspace)),
            TextAction::Backspace
        );
        assert_eq!(handle_text_input(press(KeyCode::Enter)), TextAction::Submit);
        assert_eq!(handle_text_input(press(KeyCode::Esc)), TextAction::Cancel);

        let ctrl = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert_eq!(handle_text_input(ctrl), TextAction::None);
    }
}
