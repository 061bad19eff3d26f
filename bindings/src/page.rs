//! Binding factory: turns a page's [`PageBindingsConfig`] into ready-to-register bindings.

use page_hooks_protocol::ConfigError;
use page_hooks_protocol::PageBindingsConfig;
use url::Url;

use crate::key_trigger::Activator;
use crate::key_trigger::KeyTrigger;
use crate::key_trigger::activate_target;
use crate::keyboard::KeyAction;
use crate::keyboard::KeyPress;
use crate::keyboard::KeyboardDispatcher;
use crate::link::LinkInterceptor;
use crate::notify::Notifier;
use crate::textarea;
use crate::textarea::TextareaEdit;
use crate::textarea::TextareaState;
use crate::upload::UploadClient;
use crate::upload::UploadTransport;

#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("invalid page configuration JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid page configuration: {0}")]
    Config(#[from] ConfigError),
}

/// What a keydown handler needs from the page besides the event itself.
pub trait KeyHost: Activator {
    /// The textarea the event targets, if any.
    fn textarea_state(&self) -> Option<TextareaState>;
    fn apply_textarea_edit(&self, edit: TextareaEdit);
}

#[derive(Debug)]
pub struct PageBindings {
    config: PageBindingsConfig,
    page_url: Url,
    dispatcher: KeyboardDispatcher,
    links: Option<LinkInterceptor>,
}

impl PageBindings {
    pub fn new(config: PageBindingsConfig, page_url: Url) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut dispatcher = KeyboardDispatcher::new();
        for trigger in config.resolved_key_triggers() {
            dispatcher.register_trigger(KeyTrigger::from(&trigger), trigger.priority);
        }
        if config.textarea_aids {
            dispatcher.register_textarea_aids();
        }

        let links = config
            .intercept_links
            .then(|| LinkInterceptor::new(page_url.clone(), config.links.clone()));

        Ok(Self {
            config,
            page_url,
            dispatcher,
            links,
        })
    }

    /// Parse the JSON document embedded by the page server.
    pub fn from_json(json: &str, page_url: Url) -> Result<Self, MountError> {
        let config: PageBindingsConfig = serde_json::from_str(json)?;
        Ok(Self::new(config, page_url)?)
    }

    pub fn config(&self) -> &PageBindingsConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &KeyboardDispatcher {
        &self.dispatcher
    }

    pub fn link_interceptor(&self) -> Option<&LinkInterceptor> {
        self.links.as_ref()
    }

    pub fn upload_client<T, N>(&self, transport: T, notifier: N) -> UploadClient<T, N>
    where
        T: UploadTransport,
        N: Notifier,
    {
        UploadClient::new(
            self.config.upload.clone(),
            self.page_url.clone(),
            transport,
            notifier,
        )
    }

    /// Route one keydown. Returns `true` when the browser default must be prevented.
    pub fn handle_keydown<H: KeyHost + ?Sized>(&self, press: &KeyPress, host: &H) -> bool {
        let Some(dispatched) = self.dispatcher.dispatch(press) else {
            return false;
        };
        tracing::debug!("keydown {} handled by {}", press.key, dispatched.route);

        match dispatched.action {
            KeyAction::Activate { target_id } => activate_target(host, &target_id),
            KeyAction::Textarea(command) => {
                if let Some(state) = host.textarea_state() {
                    host.apply_textarea_edit(textarea::apply(&state, command));
                }
            }
        }
        true
    }
}
