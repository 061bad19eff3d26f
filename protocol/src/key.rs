//! Key descriptors shared by the page configuration and the browser dispatcher.
//!
//! A [`KeyChord`] pairs a DOM `KeyboardEvent.key` name with a [`ModifierMode`]. Matching is
//! superset-tolerant: a modifier that is held but not named by the mode never disqualifies a
//! match, so `ctrl+s` still matches a chord configured as plain `s`.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// Modifier keys held while a key event fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    pub const ALT: Modifiers = Modifiers {
        alt: true,
        ..Modifiers::NONE
    };

    pub const META: Modifiers = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub fn with_alt(self) -> Self {
        Self { alt: true, ..self }
    }
}

/// Which modifier check a chord applies. Selected once when the page is assembled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierMode {
    #[default]
    None,
    /// Ctrl on Linux/Windows, ⌘ on macOS.
    #[serde(alias = "mod")]
    CtrlOrMeta,
    #[serde(alias = "is_ctrl")]
    Ctrl,
    #[serde(alias = "is_alt")]
    Alt,
    #[serde(alias = "is_ctrl_alt")]
    CtrlAlt,
}

impl ModifierMode {
    pub fn holds(self, modifiers: Modifiers) -> bool {
        match self {
            ModifierMode::None => true,
            ModifierMode::CtrlOrMeta => modifiers.ctrl || modifiers.meta,
            ModifierMode::Ctrl => modifiers.ctrl,
            ModifierMode::Alt => modifiers.alt,
            ModifierMode::CtrlAlt => modifiers.ctrl && modifiers.alt,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            ModifierMode::None => "",
            ModifierMode::CtrlOrMeta => "mod+",
            ModifierMode::Ctrl => "ctrl+",
            ModifierMode::Alt => "alt+",
            ModifierMode::CtrlAlt => "ctrl+alt+",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: String,
    #[serde(default)]
    pub modifiers: ModifierMode,
}

impl KeyChord {
    pub fn new(key: impl Into<String>, modifiers: ModifierMode) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }

    pub fn matches(&self, key: &str, modifiers: Modifiers) -> bool {
        self.key == key && self.modifiers.holds(modifiers)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.modifiers.prefix(), self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyChordParseError {
    #[error("key chord is empty")]
    Empty,
    #[error("unknown modifier `{0}` (expected ctrl, alt or mod)")]
    UnknownModifier(String),
    #[error("modifier combination `{0}` is not supported")]
    UnsupportedCombination(String),
    #[error("key chord `{0}` names modifiers but no key")]
    MissingKey(String),
    #[error("key trigger sets both `chord` ({chord}) and `key` ({key}); use either")]
    Conflicting { chord: String, key: String },
}

fn is_modifier_name(part: &str) -> bool {
    matches!(
        part.to_ascii_lowercase().as_str(),
        "ctrl" | "control" | "alt" | "option" | "mod" | "cmd" | "meta"
    )
}

impl FromStr for KeyChord {
    type Err = KeyChordParseError;

    /// Parses `p`, `ctrl+o`, `alt+k`, `ctrl+alt+k` or `mod+s`.
    ///
    /// The key itself is kept verbatim, so `ctrl++` binds the `+` key and `End` stays `End`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyChordParseError::Empty);
        }

        let (prefix, key) = match s.rfind('+') {
            Some(idx) if idx + 1 == s.len() && idx > 0 => {
                // Trailing `+` is the key; everything before the separator is the prefix.
                let head = &s[..idx];
                match head.strip_suffix('+') {
                    Some(prefix) => (prefix, "+"),
                    None if head.split('+').all(is_modifier_name) => {
                        return Err(KeyChordParseError::MissingKey(s.to_string()));
                    }
                    None => return Err(KeyChordParseError::UnknownModifier(head.to_string())),
                }
            }
            Some(idx) if idx + 1 < s.len() => (&s[..idx], &s[idx + 1..]),
            _ => ("", s),
        };

        let mut ctrl = false;
        let mut alt = false;
        let mut either = false;
        for part in prefix.split('+').filter(|part| !part.is_empty()) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => ctrl = true,
                "alt" | "option" => alt = true,
                "mod" | "cmd" | "meta" => either = true,
                other => return Err(KeyChordParseError::UnknownModifier(other.to_string())),
            }
        }

        let modifiers = match (ctrl, alt, either) {
            (false, false, false) => ModifierMode::None,
            (true, false, false) => ModifierMode::Ctrl,
            (false, true, false) => ModifierMode::Alt,
            (true, true, false) => ModifierMode::CtrlAlt,
            (false, false, true) => ModifierMode::CtrlOrMeta,
            _ => return Err(KeyChordParseError::UnsupportedCombination(prefix.to_string())),
        };

        Ok(KeyChord::new(key, modifiers))
    }
}
