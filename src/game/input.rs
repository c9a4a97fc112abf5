// Keystroke classification and the typed candidate buffer.

/// Key-down event as delivered by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyEvent {
    pub key: String,
    pub shift: bool,
    pub repeat: bool, // key held down
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), shift: false, repeat: false }
    }

    pub fn shifted(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// True for the restart key in either case.
    pub fn is_restart(&self, restart: char) -> bool {
        let mut chars = self.key.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.eq_ignore_ascii_case(&restart))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Char(char),
    Backspace,
    Submit,
}

impl KeyAction {
    /// Maps a key to a typing action. Anything outside `[A-Za-z0-9]`, space,
    /// Enter and Backspace yields None.
    pub fn classify(event: &KeyEvent) -> Option<Self> {
        match event.key.as_str() {
            " " | "Enter" => Some(KeyAction::Submit),
            "Backspace" => Some(KeyAction::Backspace),
            key => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphanumeric() => {
                        Some(KeyAction::Char(if event.shift { c.to_ascii_uppercase() } else { c }))
                    }
                    _ => None,
                }
            }
        }
    }
}

// --- Input buffer -----------------------------------------------------------

const PLACEHOLDER: &str = "...";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `c` if it is in `[A-Za-z0-9 ]`. Returns false when ignored.
    pub fn append(&mut self, c: char) -> bool {
        if c.is_ascii_alphanumeric() || c == ' ' {
            self.text.push(c);
            true
        } else {
            false
        }
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn submit_and_clear(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    pub fn current(&self) -> &str {
        &self.text
    }

    /// Text for the buffer display; a placeholder stands in when empty.
    pub fn display(&self) -> &str {
        if self.text.is_empty() { PLACEHOLDER } else { &self.text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_returns_contents_and_clears() {
        let mut buf = InputBuffer::new();
        for c in ['c', 'a', 't'] {
            assert!(buf.append(c));
        }
        assert_eq!(buf.current(), "cat");
        assert_eq!(buf.submit_and_clear(), "cat");
        assert_eq!(buf.current(), "");
        assert_eq!(buf.display(), "...");
    }

    #[test]
    fn test_backspace_on_empty_is_noop() {
        let mut buf = InputBuffer::new();
        buf.backspace();
        assert_eq!(buf.current(), "");
        buf.append('x');
        buf.append('y');
        buf.backspace();
        assert_eq!(buf.current(), "x");
    }

    #[test]
    fn test_disallowed_chars_leave_buffer_untouched() {
        let mut buf = InputBuffer::new();
        buf.append('a');
        for c in ['-', '!', 'é', '\n', '漢'] {
            assert!(!buf.append(c));
        }
        assert_eq!(buf.current(), "a");
    }

    #[test]
    fn test_classify_keys() {
        assert_eq!(KeyAction::classify(&KeyEvent::new("a")), Some(KeyAction::Char('a')));
        assert_eq!(KeyAction::classify(&KeyEvent::new("a").shifted()), Some(KeyAction::Char('A')));
        assert_eq!(KeyAction::classify(&KeyEvent::new("7")), Some(KeyAction::Char('7')));
        assert_eq!(KeyAction::classify(&KeyEvent::new(" ")), Some(KeyAction::Submit));
        assert_eq!(KeyAction::classify(&KeyEvent::new("Enter")), Some(KeyAction::Submit));
        assert_eq!(KeyAction::classify(&KeyEvent::new("Backspace")), Some(KeyAction::Backspace));
        for key in ["Shift", "ArrowLeft", "Tab", "-", "ß", ""] {
            assert_eq!(KeyAction::classify(&KeyEvent::new(key)), None, "key {key:?}");
        }
    }

    #[test]
    fn test_restart_key_either_case() {
        assert!(KeyEvent::new("r").is_restart('r'));
        assert!(KeyEvent::new("R").is_restart('r'));
        assert!(!KeyEvent::new("t").is_restart('r'));
        assert!(!KeyEvent::new("Right").is_restart('r'));
    }
}
