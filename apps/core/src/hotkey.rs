use std::fmt::{Display, Formatter};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    Enter,
    Backspace,
    ArrowUp,
    ArrowDown,
    Tab,
    Other(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn has_command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn char(c: char) -> Self {
        Self::new(Key::Char(c))
    }

    pub fn with_ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.modifiers.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    /// A single printable character typed without Ctrl, Cmd or Alt.
    pub fn printable(&self) -> Option<char> {
        match self.key {
            Key::Char(c)
                if !c.is_control()
                    && !self.modifiers.ctrl
                    && !self.modifiers.meta
                    && !self.modifiers.alt =>
            {
                Some(c)
            }
            _ => None,
        }
    }

    /// The lowercase letter of a Ctrl/Cmd+letter chord.
    pub fn command_letter(&self) -> Option<char> {
        match self.key {
            Key::Char(c) if self.modifiers.has_command() && c.is_ascii_alphabetic() => {
                Some(c.to_ascii_lowercase())
            }
            _ => None,
        }
    }
}

impl Display for KeyEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (held, name) in [
            (self.modifiers.ctrl, "Ctrl"),
            (self.modifiers.meta, "Cmd"),
            (self.modifiers.alt, "Alt"),
            (self.modifiers.shift, "Shift"),
        ] {
            if held {
                write!(f, "{name}+")?;
            }
        }
        match &self.key {
            Key::Char(' ') => write!(f, "Space"),
            Key::Char(c) => write!(f, "{c}"),
            Key::Escape => write!(f, "Escape"),
            Key::Enter => write!(f, "Enter"),
            Key::Backspace => write!(f, "Backspace"),
            Key::ArrowUp => write!(f, "ArrowUp"),
            Key::ArrowDown => write!(f, "ArrowDown"),
            Key::Tab => write!(f, "Tab"),
            Key::Other(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("empty key")]
    Empty,
    #[error("unsupported modifier '{0}'")]
    UnknownModifier(String),
    #[error("unknown key '{0}'")]
    UnknownKey(String),
}

pub fn parse_key(input: &str) -> Result<KeyEvent, KeyParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(KeyParseError::Empty);
    }

    // A lone '+' is the plus key, not a separator.
    let (modifier_parts, key_raw) = match trimmed.rsplit_once('+') {
        Some((head, tail)) if !head.is_empty() && !tail.is_empty() => {
            (head.split('+').collect::<Vec<_>>(), tail)
        }
        Some((head, "")) if !head.is_empty() => {
            let head = head.trim_end_matches('+');
            if head.is_empty() {
                (Vec::new(), "+")
            } else {
                (head.split('+').collect::<Vec<_>>(), "+")
            }
        }
        _ => (Vec::new(), trimmed),
    };

    let mut modifiers = Modifiers::default();
    for part in modifier_parts {
        if !apply_modifier(&mut modifiers, part) {
            return Err(KeyParseError::UnknownModifier(part.trim().to_string()));
        }
    }

    Ok(KeyEvent {
        key: parse_named_key(key_raw.trim())?,
        modifiers,
    })
}

fn apply_modifier(modifiers: &mut Modifiers, part: &str) -> bool {
    match part.trim().to_ascii_lowercase().as_str() {
        "ctrl" | "control" => modifiers.ctrl = true,
        "cmd" | "meta" | "command" => modifiers.meta = true,
        "alt" | "option" => modifiers.alt = true,
        "shift" => modifiers.shift = true,
        _ => return false,
    }
    true
}

/// `Mod+...+Key` where every part before the key is a known modifier.
fn is_chord(token: &str) -> bool {
    let head = match token.rsplit_once('+') {
        Some((head, "")) => head.trim_end_matches('+'),
        Some((head, _)) => head,
        None => return false,
    };
    let mut scratch = Modifiers::default();
    !head.is_empty() && head.split('+').all(|part| apply_modifier(&mut scratch, part))
}

fn parse_named_key(input: &str) -> Result<Key, KeyParseError> {
    let mut chars = input.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(Key::Char(c));
    }

    match input.to_ascii_lowercase().as_str() {
        "escape" | "esc" => Ok(Key::Escape),
        "enter" | "return" => Ok(Key::Enter),
        "backspace" => Ok(Key::Backspace),
        "arrowup" | "up" => Ok(Key::ArrowUp),
        "arrowdown" | "down" => Ok(Key::ArrowDown),
        "tab" => Ok(Key::Tab),
        "space" => Ok(Key::Char(' ')),
        "pageup" | "pagedown" | "home" | "end" | "arrowleft" | "arrowright" | "delete"
        | "insert" => Ok(Key::Other(input.to_string())),
        "" => Err(KeyParseError::Empty),
        _ => {
            if let Some(number) = input.strip_prefix(['F', 'f']) {
                if let Ok(parsed) = number.parse::<u8>() {
                    if (1..=24).contains(&parsed) {
                        return Ok(Key::Other(format!("F{parsed}")));
                    }
                }
            }
            Err(KeyParseError::UnknownKey(input.to_string()))
        }
    }
}

/// Parses a whitespace-separated key script. Tokens that name a key or a
/// modifier chord become one event; anything else is typed one character at
/// a time.
pub fn parse_key_script(script: &str) -> Result<Vec<KeyEvent>, KeyParseError> {
    let mut events = Vec::new();
    for token in script.split_whitespace() {
        if is_named_token(token) {
            events.push(parse_key(token)?);
        } else {
            events.extend(token.chars().map(KeyEvent::char));
        }
    }
    Ok(events)
}

fn is_named_token(token: &str) -> bool {
    if token.chars().count() == 1 {
        return true;
    }
    if is_chord(token) {
        return true;
    }
    matches!(
        token.to_ascii_lowercase().as_str(),
        "escape"
            | "esc"
            | "enter"
            | "return"
            | "backspace"
            | "arrowup"
            | "arrowdown"
            | "arrowleft"
            | "arrowright"
            | "tab"
            | "space"
            | "pageup"
            | "pagedown"
            | "delete"
    )
}
