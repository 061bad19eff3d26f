//! Page binding configuration.
//!
//! The page server assembles one [`PageBindingsConfig`] per rendered page and embeds it as JSON;
//! the browser bindings read it once at mount time and never change it afterwards. Element ids are
//! opaque: they are compared and looked up verbatim, never escaped or rewritten.

use serde::Deserialize;
use serde::Serialize;

use crate::endpoints::MAX_UPLOAD_FILE_BYTES;
use crate::endpoints::OPEN_EXTERNAL_LINK_PATH;
use crate::endpoints::SESSION_TOKEN_PARAM;
use crate::endpoints::UPLOAD_FIELD_NAME;
use crate::endpoints::UPLOAD_PATH;
use crate::key::KeyChord;
use crate::key::KeyChordParseError;
use crate::key::ModifierMode;

/// Id of the `<script type="application/json">` element carrying the serialized config.
pub const CONFIG_ELEMENT_ID: &str = "page-hooks-config";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageBindingsConfig {
    /// Button clicked on <kbd>Ctrl</kbd>/<kbd>⌘</kbd>+<kbd>S</kbd>.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_button_id: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub key_triggers: Vec<KeyTriggerConfig>,

    /// Element whose paste events are scanned for file attachments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paste_target_id: Option<String>,

    /// Container that accepts dropped files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_container_id: Option<String>,

    pub textarea_aids: bool,
    pub intercept_links: bool,
    pub upload: UploadConfig,
    pub links: LinkConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "KeyTriggerEntry")]
pub struct KeyTriggerConfig {
    pub key: String,
    #[serde(default)]
    pub modifiers: ModifierMode,
    /// Element activated (clicked) when the chord matches.
    pub target_id: String,
    /// Higher priorities are consulted first by the keyboard dispatcher.
    #[serde(default)]
    pub priority: i32,
}

/// Accepted input form of a key trigger: `key` plus `modifiers`, or a `chord` string such as
/// `ctrl+o`.
#[derive(Deserialize)]
struct KeyTriggerEntry {
    #[serde(default)]
    chord: Option<String>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    modifiers: ModifierMode,
    target_id: String,
    #[serde(default)]
    priority: i32,
}

impl TryFrom<KeyTriggerEntry> for KeyTriggerConfig {
    type Error = KeyChordParseError;

    fn try_from(entry: KeyTriggerEntry) -> Result<Self, Self::Error> {
        let chord = match (entry.chord, entry.key) {
            (Some(chord), None) => chord.parse::<KeyChord>()?,
            (None, Some(key)) => KeyChord::new(key, entry.modifiers),
            (None, None) => return Err(KeyChordParseError::Empty),
            (Some(chord), Some(key)) => {
                return Err(KeyChordParseError::Conflicting { chord, key });
            }
        };
        Ok(Self {
            key: chord.key,
            modifiers: chord.modifiers,
            target_id: entry.target_id,
            priority: entry.priority,
        })
    }
}

impl KeyTriggerConfig {
    pub fn new(chord: KeyChord, target_id: impl Into<String>) -> Self {
        Self {
            key: chord.key,
            modifiers: chord.modifiers,
            target_id: target_id.into(),
            priority: 0,
        }
    }

    pub fn chord(&self) -> KeyChord {
        KeyChord::new(self.key.clone(), self.modifiers)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub endpoint: String,
    pub field_name: String,
    pub token_param: String,
    pub max_file_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: UPLOAD_PATH.to_string(),
            field_name: UPLOAD_FIELD_NAME.to_string(),
            token_param: SESSION_TOKEN_PARAM.to_string(),
            max_file_bytes: MAX_UPLOAD_FILE_BYTES,
        }
    }
}

impl UploadConfig {
    /// The ceiling rendered for people, e.g. `10MB`.
    pub fn max_file_size_label(&self) -> String {
        const MIB: u64 = 1024 * 1024;
        if self.max_file_bytes >= MIB && self.max_file_bytes % MIB == 0 {
            format!("{}MB", self.max_file_bytes / MIB)
        } else {
            format!("{} bytes", self.max_file_bytes)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub endpoint: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            endpoint: OPEN_EXTERNAL_LINK_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// How long a toast stays on screen.
    pub toast_duration_ms: u32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            toast_duration_ms: 4_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("`{field}` must not be empty")]
    EmptyField { field: String },
    #[error("key trigger #{index} has an empty key")]
    EmptyTriggerKey { index: usize },
    #[error("key trigger #{index} (`{chord}`) has an empty target id")]
    EmptyTriggerTarget { index: usize, chord: String },
    #[error("upload size limit must be greater than zero")]
    ZeroUploadLimit,
}

impl PageBindingsConfig {
    /// Reject configurations that could never bind to anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let optional_ids = [
            ("save_button_id", &self.save_button_id),
            ("paste_target_id", &self.paste_target_id),
            ("drop_container_id", &self.drop_container_id),
        ];
        for (field, id) in optional_ids {
            if id.as_deref().is_some_and(|id| id.trim().is_empty()) {
                return Err(ConfigError::EmptyField {
                    field: field.to_string(),
                });
            }
        }

        for (index, trigger) in self.key_triggers.iter().enumerate() {
            if trigger.key.is_empty() {
                return Err(ConfigError::EmptyTriggerKey { index });
            }
            if trigger.target_id.trim().is_empty() {
                return Err(ConfigError::EmptyTriggerTarget {
                    index,
                    chord: trigger.chord().to_string(),
                });
            }
        }

        let required = [
            ("upload.endpoint", &self.upload.endpoint),
            ("upload.field_name", &self.upload.field_name),
            ("upload.token_param", &self.upload.token_param),
            ("links.endpoint", &self.links.endpoint),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField {
                    field: field.to_string(),
                });
            }
        }

        if self.upload.max_file_bytes == 0 {
            return Err(ConfigError::ZeroUploadLimit);
        }

        Ok(())
    }

    /// Every key trigger, with the save shortcut expanded into a `mod+s` trigger placed first.
    pub fn resolved_key_triggers(&self) -> Vec<KeyTriggerConfig> {
        let save = self.save_button_id.iter().map(|id| {
            KeyTriggerConfig::new(KeyChord::new("s", ModifierMode::CtrlOrMeta), id.clone())
        });
        save.chain(self.key_triggers.iter().cloned()).collect()
    }

    pub fn uses_uploads(&self) -> bool {
        self.paste_target_id.is_some() || self.drop_container_id.is_some()
    }
}
