//! Input commands
//!
//! The host reports key presses as events; the keymap turns them into
//! possession commands so the driver never polls key state.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Keyboard keys a hotkey may be bound to, named as in the options file
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    D0, D1, D2, D3, D4, D5, D6, D7, D8, D9,
    Numpad0, Numpad1, Numpad2, Numpad3, Numpad4,
    Numpad5, Numpad6, Numpad7, Numpad8, Numpad9,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    Escape, Tab, Space, Enter, BackSpace, Insert, Delete, Home, End, PageUp, PageDown,
    Up, Down, Left, Right,
    LeftShift, RightShift, LeftControl, RightControl, LeftAlt, RightAlt,
    CapsLock, Tilde, Minus, Equals, OpenBraces, CloseBraces, SemiColon, Apostrophe,
    Comma, Period, Slash, BackSlash,
}

impl Key {
    #[rustfmt::skip]
    const NAMED: [(&'static str, Key); 91] = [
        ("A", Key::A), ("B", Key::B), ("C", Key::C), ("D", Key::D), ("E", Key::E),
        ("F", Key::F), ("G", Key::G), ("H", Key::H), ("I", Key::I), ("J", Key::J),
        ("K", Key::K), ("L", Key::L), ("M", Key::M), ("N", Key::N), ("O", Key::O),
        ("P", Key::P), ("Q", Key::Q), ("R", Key::R), ("S", Key::S), ("T", Key::T),
        ("U", Key::U), ("V", Key::V), ("W", Key::W), ("X", Key::X), ("Y", Key::Y),
        ("Z", Key::Z),
        ("D0", Key::D0), ("D1", Key::D1), ("D2", Key::D2), ("D3", Key::D3), ("D4", Key::D4),
        ("D5", Key::D5), ("D6", Key::D6), ("D7", Key::D7), ("D8", Key::D8), ("D9", Key::D9),
        ("Numpad0", Key::Numpad0), ("Numpad1", Key::Numpad1), ("Numpad2", Key::Numpad2),
        ("Numpad3", Key::Numpad3), ("Numpad4", Key::Numpad4), ("Numpad5", Key::Numpad5),
        ("Numpad6", Key::Numpad6), ("Numpad7", Key::Numpad7), ("Numpad8", Key::Numpad8),
        ("Numpad9", Key::Numpad9),
        ("F1", Key::F1), ("F2", Key::F2), ("F3", Key::F3), ("F4", Key::F4),
        ("F5", Key::F5), ("F6", Key::F6), ("F7", Key::F7), ("F8", Key::F8),
        ("F9", Key::F9), ("F10", Key::F10), ("F11", Key::F11), ("F12", Key::F12),
        ("Escape", Key::Escape), ("Tab", Key::Tab), ("Space", Key::Space),
        ("Enter", Key::Enter), ("BackSpace", Key::BackSpace), ("Insert", Key::Insert),
        ("Delete", Key::Delete), ("Home", Key::Home), ("End", Key::End),
        ("PageUp", Key::PageUp), ("PageDown", Key::PageDown),
        ("Up", Key::Up), ("Down", Key::Down), ("Left", Key::Left), ("Right", Key::Right),
        ("LeftShift", Key::LeftShift), ("RightShift", Key::RightShift),
        ("LeftControl", Key::LeftControl), ("RightControl", Key::RightControl),
        ("LeftAlt", Key::LeftAlt), ("RightAlt", Key::RightAlt),
        ("CapsLock", Key::CapsLock), ("Tilde", Key::Tilde), ("Minus", Key::Minus),
        ("Equals", Key::Equals), ("OpenBraces", Key::OpenBraces),
        ("CloseBraces", Key::CloseBraces), ("SemiColon", Key::SemiColon),
        ("Apostrophe", Key::Apostrophe), ("Comma", Key::Comma), ("Period", Key::Period),
        ("Slash", Key::Slash), ("BackSlash", Key::BackSlash),
    ];

    pub fn name(self) -> &'static str {
        Self::NAMED
            .iter()
            .find(|(_, key)| *key == self)
            .map(|(name, _)| *name)
            .unwrap_or("?")
    }
}

impl FromStr for Key {
    type Err = String;

    /// Case-insensitive key name lookup
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::NAMED
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
            .map(|(_, key)| *key)
            .ok_or_else(|| format!("'{}' is not a known Key name", s))
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What the player asked for this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PossessionCommand {
    /// Possess the unit the spectator camera follows
    PossessSpectated,
    /// Possess the best unit by category priority
    PossessByPriority,
}

/// Binds hotkeys to commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keymap {
    pub manual: Key,
    pub automatic: Key,
}

impl Keymap {
    pub fn new(manual: Key, automatic: Key) -> Self {
        Self { manual, automatic }
    }

    /// Command for the keys pressed this frame
    ///
    /// Manual possession wins when both hotkeys fire together.
    pub fn command(&self, pressed: &[Key]) -> Option<PossessionCommand> {
        if pressed.contains(&self.manual) {
            Some(PossessionCommand::PossessSpectated)
        } else if pressed.contains(&self.automatic) {
            Some(PossessionCommand::PossessByPriority)
        } else {
            None
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new(Key::O, Key::U)
    }
}
