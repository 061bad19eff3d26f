//! Document-level keyboard dispatcher.
//!
//! Every keyboard feature of a page registers a route here instead of attaching its own
//! `keydown` listener. Routes are consulted from the highest priority down (registration order
//! within a priority) and the first route that returns an action wins, so each keystroke triggers
//! at most one action. Every dispatched action cancels the browser's default for that key.

use std::fmt;

use page_hooks_protocol::Modifiers;

use crate::key_trigger::KeyTrigger;
use crate::textarea::TextareaCommand;

/// Priority of the textarea editing aids: above the default priority of key triggers, so a
/// trigger bound to `End` does not steal the keystroke from a focused textarea.
pub const TEXTAREA_AIDS_PRIORITY: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    /// `KeyboardEvent.key`.
    pub key: String,
    pub modifiers: Modifiers,
    /// Whether the event target is a `<textarea>`.
    pub in_textarea: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            in_textarea: false,
        }
    }

    pub fn in_textarea(self) -> Self {
        Self {
            in_textarea: true,
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Click the element with this id, if it exists.
    Activate { target_id: String },
    /// Edit the focused textarea.
    Textarea(TextareaCommand),
}

type RouteFn = Box<dyn Fn(&KeyPress) -> Option<KeyAction>>;

struct Route {
    name: String,
    priority: i32,
    route: RouteFn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched<'a> {
    pub route: &'a str,
    pub action: KeyAction,
}

#[derive(Default)]
pub struct KeyboardDispatcher {
    routes: Vec<Route>,
}

impl fmt::Debug for KeyboardDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.routes.iter().map(|r| (r.priority, r.name.as_str())))
            .finish()
    }
}

impl KeyboardDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, priority: i32, route: F)
    where
        F: Fn(&KeyPress) -> Option<KeyAction> + 'static,
    {
        let idx = self
            .routes
            .iter()
            .position(|existing| existing.priority < priority)
            .unwrap_or(self.routes.len());
        self.routes.insert(
            idx,
            Route {
                name: name.into(),
                priority,
                route: Box::new(route),
            },
        );
    }

    pub fn register_trigger(&mut self, trigger: KeyTrigger, priority: i32) {
        let name = format!("{} -> #{}", trigger.chord, trigger.target_id);
        self.register(name, priority, move |press| trigger.evaluate(press));
    }

    pub fn register_textarea_aids(&mut self) {
        self.register("textarea aids", TEXTAREA_AIDS_PRIORITY, |press| {
            if !press.in_textarea {
                return None;
            }
            TextareaCommand::for_key(&press.key, press.modifiers).map(KeyAction::Textarea)
        });
    }

    pub fn route_names(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn dispatch(&self, press: &KeyPress) -> Option<Dispatched<'_>> {
        self.routes.iter().find_map(|r| {
            (r.route)(press).map(|action| Dispatched {
                route: r.name.as_str(),
                action,
            })
        })
    }
}
