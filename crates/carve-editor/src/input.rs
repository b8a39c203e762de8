//! Keyboard input events

/// Phase of a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    KeyDown,
    KeyUp,
}

/// Logical key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Tab,
    Enter,
    Char(char),
    /// Any other key by its DOM name ("ArrowLeft", "Delete", ...)
    Named(String),
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Self {
        let mut chars = key.chars();
        match (key, chars.next(), chars.next()) {
            ("Backspace", _, _) => Key::Backspace,
            ("Tab", _, _) => Key::Tab,
            ("Enter", _, _) => Key::Enter,
            (_, Some(c), None) => Key::Char(c),
            _ => Key::Named(key.to_string()),
        }
    }
}

/// Keyboard event delivered to the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub key: Key,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyEvent {
    pub fn key_down(key: Key) -> Self {
        Self {
            kind: KeyEventKind::KeyDown,
            key,
            shift: false,
            ctrl: false,
            alt: false,
        }
    }

    pub fn key_up(key: Key) -> Self {
        Self {
            kind: KeyEventKind::KeyUp,
            ..Self::key_down(key)
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn is_key_down(&self) -> bool {
        self.kind == KeyEventKind::KeyDown
    }
}

/// What the host should do with the event after a handler ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerResponse {
    pub allow_propagation: bool,
    pub allow_browser_default: bool,
}

impl HandlerResponse {
    /// Handled: stop propagation and suppress the browser default
    pub fn handled() -> Self {
        Self {
            allow_propagation: false,
            allow_browser_default: false,
        }
    }

    /// Not handled by the editor
    pub fn propagate() -> Self {
        Self {
            allow_propagation: true,
            allow_browser_default: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dom_key() {
        assert_eq!(Key::from_dom_key("Backspace"), Key::Backspace);
        assert_eq!(Key::from_dom_key("a"), Key::Char('a'));
        assert_eq!(Key::from_dom_key(" "), Key::Char(' '));
        assert_eq!(Key::from_dom_key("ArrowLeft"), Key::Named("ArrowLeft".into()));
    }

    #[test]
    fn test_builders() {
        let event = KeyEvent::key_down(Key::Tab).with_shift();
        assert!(event.shift && event.is_key_down());
        assert!(!KeyEvent::key_up(Key::Tab).is_key_down());
    }
}
