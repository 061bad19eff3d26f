//! Key-trigger binding: a configured chord clicks a configured element.

use page_hooks_protocol::KeyChord;
use page_hooks_protocol::KeyTriggerConfig;

use crate::keyboard::KeyAction;
use crate::keyboard::KeyPress;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTrigger {
    pub chord: KeyChord,
    pub target_id: String,
}

impl KeyTrigger {
    pub fn new(chord: KeyChord, target_id: impl Into<String>) -> Self {
        Self {
            chord,
            target_id: target_id.into(),
        }
    }

    /// Held modifiers beyond the chord's mode do not prevent a match.
    pub fn evaluate(&self, press: &KeyPress) -> Option<KeyAction> {
        self.chord
            .matches(&press.key, press.modifiers)
            .then(|| KeyAction::Activate {
                target_id: self.target_id.clone(),
            })
    }
}

impl From<&KeyTriggerConfig> for KeyTrigger {
    fn from(config: &KeyTriggerConfig) -> Self {
        KeyTrigger::new(config.chord(), config.target_id.clone())
    }
}

/// Finds an element by id and performs its default activation.
pub trait Activator {
    /// Returns `false` when no element with `target_id` exists.
    fn activate(&self, target_id: &str) -> bool;
}

/// A missing target is not an error: the page may legitimately omit the element.
pub fn activate_target<A: Activator + ?Sized>(activator: &A, target_id: &str) {
    if activator.activate(target_id) {
        tracing::debug!("activated #{target_id}");
    } else {
        tracing::debug!("key trigger target #{target_id} not found");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use page_hooks_protocol::ModifierMode;
    use page_hooks_protocol::Modifiers;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn ctrl_trigger_ignores_plain_key() {
        let trigger = KeyTrigger::new(KeyChord::new("p", ModifierMode::Ctrl), "c42");
        assert_eq!(trigger.evaluate(&KeyPress::new("p", Modifiers::NONE)), None);
        assert_eq!(
            trigger.evaluate(&KeyPress::new("p", Modifiers::CTRL)),
            Some(KeyAction::Activate {
                target_id: "c42".to_string()
            })
        );
    }

    #[test]
    fn plain_trigger_also_fires_with_modifiers_held() {
        let trigger = KeyTrigger::new(KeyChord::new("Escape", ModifierMode::None), "c7");
        assert!(
            trigger
                .evaluate(&KeyPress::new("Escape", Modifiers::CTRL.with_alt()))
                .is_some()
        );
    }

    #[test]
    fn builds_from_config() {
        let config = KeyTriggerConfig::new(KeyChord::new("o", ModifierMode::Alt), "c3");
        assert_eq!(
            KeyTrigger::from(&config),
            KeyTrigger::new(KeyChord::new("o", ModifierMode::Alt), "c3")
        );
    }

    struct FakePage {
        present: Vec<&'static str>,
        clicked: RefCell<Vec<String>>,
    }

    impl Activator for FakePage {
        fn activate(&self, target_id: &str) -> bool {
            if self.present.contains(&target_id) {
                self.clicked.borrow_mut().push(target_id.to_string());
                true
            } else {
                false
            }
        }
    }

    #[test]
    fn missing_target_is_silently_skipped() {
        let page = FakePage {
            present: vec!["c1"],
            clicked: RefCell::new(Vec::new()),
        };
        activate_target(&page, "c2");
        activate_target(&page, "c1");
        assert_eq!(page.clicked.into_inner(), vec!["c1".to_string()]);
    }
}
