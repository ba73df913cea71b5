//! Platform-specific key bindings

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Platform-appropriate modifier for shortcuts
/// - macOS: SUPER (Cmd key)
/// - Linux/Windows: CONTROL (Ctrl key)
#[cfg(target_os = "macos")]
pub const SHORTCUT_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
pub const SHORTCUT_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// Submit shortcut display for form help text
pub const SUBMIT_SHORTCUT: &str = "Ctrl+S";

/// Whether the key submits the focused form: Ctrl+S everywhere, Cmd+S on macOS
pub fn is_submit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('s')
        && (key.modifiers.contains(KeyModifiers::CONTROL)
            || key.modifiers.contains(SHORTCUT_MODIFIER))
}
