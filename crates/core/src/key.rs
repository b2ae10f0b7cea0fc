//! Key tokens and key-spec parsing.
//!
//! Responsibilities:
//! - Define the canonical `KeyToken` and `KeySequence` types the tries store.
//! - Parse key-spec strings like `"gg"`, `"<C-L>"`, `"d<dir>"`, `"p<bg>"`.
//! - Render sequences back into the same notation.
//!
//! Does NOT handle:
//! - Decoding terminal events (see `term.rs` for the crossterm adapter).
//! - Expanding `<dir>` or matching `<any>` (see `context.rs` and `trie.rs`).
//!
//! Invariants:
//! - Parsing is pure; `Display` output parses back to an equal sequence.
//! - `<C-x>` with a letter is stored lower-case; `<S-x>` with a letter is stored
//!   as the upper-case letter; `<S-tab>` is stored as back-tab.
//! - A parsed sequence holds at most one `<dir>`, and `<bg>` only as its last token.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use bitflags::bitflags;
use thiserror::Error;

/// Errors that can occur when parsing key specs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty key spec")]
    Empty,

    #[error("Unterminated '<' at position {position} in key spec '{spec}'")]
    Unterminated { spec: String, position: usize },

    #[error("Unknown modifier '{modifier}' in key spec '{spec}'. Expected C, A, M or S")]
    UnknownModifier { spec: String, modifier: char },

    #[error("Unknown key name '<{name}>' in key spec '{spec}'")]
    UnknownKey { spec: String, name: String },

    #[error("Misplaced wildcard in key spec '{spec}': {reason}")]
    MisplacedWildcard { spec: String, reason: &'static str },
}

bitflags! {
    /// Modifier keys held with a token.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Modifiers: u8 {
        const CTRL = 1;
        const ALT = 1 << 1;
        const SHIFT = 1 << 2;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::empty()
    }
}

/// The key part of a token, without modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    /// A character key (e.g., 'a', '1', '?', ' ')
    Char(char),
    /// Function key F1-F20
    F(u8),
    Esc,
    Enter,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    /// `<any>`: matches exactly one arbitrary token.
    Any,
    /// `<dir>`: placeholder expanded into the context's direction keys.
    Dir,
    /// `<bg>`: marks a hint-only sequence.
    Bg,
}

/// One atomic key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyToken {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyToken {
    pub const ANY: KeyToken = KeyToken::new(KeyCode::Any);
    pub const DIR: KeyToken = KeyToken::new(KeyCode::Dir);
    pub const BG: KeyToken = KeyToken::new(KeyCode::Bg);

    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    pub const fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }

    /// A control-modified character, normalised like `<C-x>`.
    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c)).with_modifiers(Modifiers::CTRL)
    }

    /// An alt-modified character, as written `<A-x>`.
    pub fn alt(c: char) -> Self {
        Self::new(KeyCode::Char(c)).with_modifiers(Modifiers::ALT)
    }

    /// Add modifiers and normalise the result.
    pub fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self {
            code: self.code,
            modifiers: self.modifiers | modifiers,
        }
        .normalized()
    }

    fn normalized(self) -> Self {
        let mut code = self.code;
        let mut modifiers = self.modifiers;

        if modifiers.contains(Modifiers::SHIFT) {
            match code {
                KeyCode::Tab | KeyCode::BackTab => {
                    code = KeyCode::BackTab;
                    modifiers.remove(Modifiers::SHIFT);
                }
                KeyCode::Char(c) if c.is_ascii_alphabetic() => {
                    code = KeyCode::Char(c.to_ascii_uppercase());
                    modifiers.remove(Modifiers::SHIFT);
                }
                _ => {}
            }
        }
        // Terminals cannot tell Ctrl+l from Ctrl+L.
        if modifiers.contains(Modifiers::CTRL)
            && let KeyCode::Char(c) = code
            && c.is_ascii_alphabetic()
        {
            code = KeyCode::Char(c.to_ascii_lowercase());
        }

        Self { code, modifiers }
    }

    /// True for `<any>`, `<dir>` and `<bg>`.
    pub fn is_wildcard(&self) -> bool {
        matches!(self.code, KeyCode::Any | KeyCode::Dir | KeyCode::Bg)
    }

    /// The decimal value of an unmodified digit key.
    pub fn digit(&self) -> Option<u32> {
        match self.code {
            KeyCode::Char(c) if self.modifiers.is_empty() => c.to_digit(10),
            _ => None,
        }
    }

    /// The character of an unmodified character key.
    pub fn as_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if self.modifiers.is_empty() => Some(c),
            _ => None,
        }
    }

    fn code_name(&self) -> Option<String> {
        let name = match self.code {
            KeyCode::Char('<') => "lt",
            KeyCode::Char('>') => "gt",
            KeyCode::Char(' ') => "space",
            KeyCode::Char(c) => return (!self.modifiers.is_empty()).then(|| c.to_string()),
            KeyCode::F(n) => return Some(format!("F{n}")),
            KeyCode::Esc => "esc",
            KeyCode::Enter => "cr",
            KeyCode::Tab => "tab",
            KeyCode::BackTab => "s-tab",
            KeyCode::Backspace => "backspace",
            KeyCode::Delete => "delete",
            KeyCode::Insert => "insert",
            KeyCode::Home => "home",
            KeyCode::End => "end",
            KeyCode::PageUp => "pageup",
            KeyCode::PageDown => "pagedown",
            KeyCode::Up => "up",
            KeyCode::Down => "down",
            KeyCode::Left => "left",
            KeyCode::Right => "right",
            KeyCode::Any => "any",
            KeyCode::Dir => "dir",
            KeyCode::Bg => "bg",
        };
        Some(name.to_string())
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(name) = self.code_name() else {
            // Plain character keys render bare.
            if let KeyCode::Char(c) = self.code {
                return write!(f, "{c}");
            }
            return Ok(());
        };

        write!(f, "<")?;
        if self.modifiers.contains(Modifiers::CTRL) {
            write!(f, "C-")?;
        }
        if self.modifiers.contains(Modifiers::ALT) {
            write!(f, "A-")?;
        }
        if self.modifiers.contains(Modifiers::SHIFT) {
            write!(f, "S-")?;
        }
        write!(f, "{name}>")
    }
}

impl From<char> for KeyToken {
    fn from(c: char) -> Self {
        Self::char(c)
    }
}

/// An ordered sequence of key tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeySequence(Vec<KeyToken>);

impl KeySequence {
    pub fn new(tokens: Vec<KeyToken>) -> Self {
        Self(tokens)
    }

    pub fn tokens(&self) -> &[KeyToken] {
        &self.0
    }

    pub fn into_tokens(self) -> Vec<KeyToken> {
        self.0
    }

    /// Index of the `<dir>` placeholder, if any.
    pub fn dir_position(&self) -> Option<usize> {
        self.0.iter().position(|t| t.code == KeyCode::Dir)
    }

    /// True when this is a `<bg>` hint sequence.
    pub fn is_hint(&self) -> bool {
        self.0.last().is_some_and(|t| t.code == KeyCode::Bg)
    }
}

impl Deref for KeySequence {
    type Target = [KeyToken];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<KeyToken>> for KeySequence {
    fn from(tokens: Vec<KeyToken>) -> Self {
        Self(tokens)
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.0 {
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

impl FromStr for KeySequence {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_keys(s)
    }
}

/// Parse a key spec like `"5dgg"`, `"<C-L>"`, `"y<dir>"` into a sequence.
///
/// # Examples
///
/// ```
/// use keychord_core::key::{parse_keys, KeyCode, KeyToken, Modifiers};
///
/// let seq = parse_keys("g<C-L>").unwrap();
/// assert_eq!(seq.len(), 2);
/// assert_eq!(seq[0], KeyToken::char('g'));
/// assert_eq!(seq[1].code, KeyCode::Char('l'));
/// assert!(seq[1].modifiers.contains(Modifiers::CTRL));
/// ```
pub fn parse_keys(spec: &str) -> Result<KeySequence, ParseError> {
    if spec.is_empty() {
        return Err(ParseError::Empty);
    }

    let chars: Vec<char> = spec.chars().collect();
    let mut tokens = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '<' {
            tokens.push(KeyToken::char(chars[i]));
            i += 1;
            continue;
        }

        let Some(offset) = chars[i + 1..].iter().position(|c| *c == '>') else {
            return Err(ParseError::Unterminated {
                spec: spec.to_string(),
                position: i,
            });
        };
        let name: String = chars[i + 1..i + 1 + offset].iter().collect();
        tokens.push(parse_bracketed(&name, spec)?);
        i += offset + 2;
    }

    validate_wildcards(&tokens, spec)?;
    Ok(KeySequence(tokens))
}

/// Parse a spec that must describe exactly one token.
pub fn parse_key(spec: &str) -> Result<KeyToken, ParseError> {
    let seq = parse_keys(spec)?;
    match seq.tokens() {
        [token] => Ok(*token),
        _ => Err(ParseError::UnknownKey {
            spec: spec.to_string(),
            name: spec.to_string(),
        }),
    }
}

fn parse_bracketed(name: &str, spec: &str) -> Result<KeyToken, ParseError> {
    let unknown = || ParseError::UnknownKey {
        spec: spec.to_string(),
        name: name.to_string(),
    };

    if let Some(code) = named_code(&name.to_ascii_lowercase()) {
        return Ok(KeyToken::new(code));
    }

    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => return Ok(KeyToken::char(c)),
        (Some(prefix), Some('-')) if name.chars().count() > 2 => {
            let modifier = match prefix.to_ascii_uppercase() {
                'C' => Modifiers::CTRL,
                'A' | 'M' => Modifiers::ALT,
                'S' => Modifiers::SHIFT,
                other => {
                    return Err(ParseError::UnknownModifier {
                        spec: spec.to_string(),
                        modifier: other,
                    });
                }
            };
            let rest: String = name.chars().skip(2).collect();
            let inner = parse_bracketed(&rest, spec)?;
            if inner.is_wildcard() {
                return Err(unknown());
            }
            return Ok(inner.with_modifiers(modifier));
        }
        _ => {}
    }

    // Function keys F1-F20
    if let Some(num) = name
        .strip_prefix(['f', 'F'])
        .and_then(|n| n.parse::<u8>().ok())
        && (1..=20).contains(&num)
    {
        return Ok(KeyToken::new(KeyCode::F(num)));
    }

    Err(unknown())
}

fn named_code(name: &str) -> Option<KeyCode> {
    let code = match name {
        "esc" | "escape" => KeyCode::Esc,
        "cr" | "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "s-tab" | "backtab" => KeyCode::BackTab,
        "space" => KeyCode::Char(' '),
        "backspace" | "bs" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "insert" | "ins" => KeyCode::Insert,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "lt" => KeyCode::Char('<'),
        "gt" => KeyCode::Char('>'),
        "any" => KeyCode::Any,
        "dir" => KeyCode::Dir,
        "bg" => KeyCode::Bg,
        _ => return None,
    };
    Some(code)
}

fn validate_wildcards(tokens: &[KeyToken], spec: &str) -> Result<(), ParseError> {
    let misplaced = |reason| ParseError::MisplacedWildcard {
        spec: spec.to_string(),
        reason,
    };

    if let Some(pos) = tokens.iter().position(|t| t.code == KeyCode::Bg) {
        if pos + 1 != tokens.len() {
            return Err(misplaced("<bg> must be the last token"));
        }
        if pos == 0 {
            return Err(misplaced("<bg> needs a key prefix"));
        }
    }
    if tokens.iter().filter(|t| t.code == KeyCode::Dir).count() > 1 {
        return Err(misplaced("at most one <dir> per sequence"));
    }
    Ok(())
}
