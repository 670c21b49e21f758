//! Keyboard command dispatch.
//!
//! A data-driven mapping from key identifiers to commands, so the shell's
//! key handler stays a thin forwarding layer and the bindings are testable
//! by feeding key names and asserting the resulting command.

/// A user-level operation triggered by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Select the section at this collection index and start looping it.
    PlaySection(usize),
    /// Seek to this section's end bound and exit the loop.
    SeekSectionEnd(usize),
    TogglePlayPause,
    /// Advance the two-press mark workflow.
    Mark,
    RateUp,
    RateDown,
    /// Seek to absolute 0:00 and play.
    SeekToStart,
    /// Seek backward by the configured step.
    SeekBack,
    /// Seek forward by the configured step.
    SeekForward,
    ToggleControls,
    ToggleTheme,
    ToggleMirror,
}

/// Context a key event arrives in. Commands only fire for bare key presses
/// outside text-editing controls.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyContext {
    /// Any of meta/ctrl/alt/shift held.
    pub has_modifiers: bool,
    /// Focus is inside an input, textarea or other editable control.
    pub in_text_input: bool,
}

/// Letter row bound to "seek to section end", in collection-index order.
const SECTION_END_ROW: [&str; 10] = ["q", "w", "e", "r", "t", "y", "u", "i", "o", "p"];

/// Single-key bindings that are not index-addressed.
const BINDINGS: &[(&str, Command)] = &[
    (" ", Command::TogglePlayPause),
    ("[", Command::Mark),
    ("-", Command::RateDown),
    ("=", Command::RateUp),
    ("0", Command::SeekToStart),
    ("arrowleft", Command::SeekBack),
    ("arrowright", Command::SeekForward),
    ("b", Command::ToggleControls),
    ("m", Command::ToggleTheme),
    ("f", Command::ToggleMirror),
];

/// Map a key identifier (DOM-style `key` value) to a command.
///
/// Returns `None` for unmapped keys and for guarded contexts (modifier held
/// or focus inside a text-editing control).
#[must_use]
pub fn command_for_key(key: &str, ctx: KeyContext) -> Option<Command> {
    if ctx.has_modifiers || ctx.in_text_input {
        return None;
    }

    let key = key.to_lowercase();

    // Digits 1-9 select collection indices 0-8.
    if let Some(digit) = key
        .chars()
        .next()
        .filter(|_| key.len() == 1)
        .and_then(|c| c.to_digit(10))
    {
        if (1..=9).contains(&digit) {
            return Some(Command::PlaySection(digit as usize - 1));
        }
    }

    if let Some(index) = SECTION_END_ROW.iter().position(|k| *k == key) {
        return Some(Command::SeekSectionEnd(index));
    }

    BINDINGS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, command)| *command)
}
