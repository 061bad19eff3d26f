//! DOM adapters for the platform-neutral traits.

use page_hooks_protocol::Modifiers;
use page_hooks_protocol::endpoints::UPLOAD_SUCCESS_EVENT;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Document;
use web_sys::Element;
use web_sys::Event;
use web_sys::HtmlAnchorElement;
use web_sys::HtmlElement;
use web_sys::HtmlTextAreaElement;
use web_sys::KeyboardEvent;

use crate::capture::CompletionSignal;
use crate::file::FileHandle;
use crate::key_trigger::Activator;
use crate::keyboard::KeyPress;
use crate::link::LinkNode;
use crate::page::KeyHost;
use crate::paste_capture::ClipboardItem;
use crate::textarea::TextareaEdit;
use crate::textarea::TextareaState;

/// A browser `File` with its metadata read once up front.
pub(crate) struct WebFile {
    pub(crate) file: web_sys::File,
    name: String,
    mime_type: String,
    size: u64,
}

impl From<web_sys::File> for WebFile {
    fn from(file: web_sys::File) -> Self {
        Self {
            name: file.name(),
            mime_type: file.type_(),
            size: file.size() as u64,
            file,
        }
    }
}

impl FileHandle for WebFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// Clipboard items must be read while the paste event is being dispatched.
pub(crate) fn clipboard_items(
    event: &web_sys::ClipboardEvent,
) -> Option<Vec<ClipboardItem<WebFile>>> {
    let items = event.clipboard_data()?.items();
    let items = (0..items.length())
        .filter_map(|idx| items.get(idx))
        .map(|item| {
            if item.kind() != "file" {
                return ClipboardItem::Other;
            }
            match item.get_as_file() {
                Ok(Some(file)) => ClipboardItem::File(WebFile::from(file)),
                _ => ClipboardItem::Other,
            }
        })
        .collect();
    Some(items)
}

pub(crate) fn dropped_files(event: &web_sys::DragEvent) -> Option<Vec<WebFile>> {
    let files = event.data_transfer()?.files()?;
    Some(
        (0..files.length())
            .filter_map(|idx| files.get(idx))
            .map(WebFile::from)
            .collect(),
    )
}

pub(crate) fn key_press(event: &KeyboardEvent) -> KeyPress {
    let modifiers = Modifiers {
        ctrl: event.ctrl_key(),
        alt: event.alt_key(),
        shift: event.shift_key(),
        meta: event.meta_key(),
    };
    let press = KeyPress::new(event.key(), modifiers);
    if event_textarea(event).is_some() {
        press.in_textarea()
    } else {
        press
    }
}

fn event_textarea(event: &Event) -> Option<HtmlTextAreaElement> {
    event.target()?.dyn_into::<HtmlTextAreaElement>().ok()
}

pub(crate) struct DomNode(pub(crate) Element);

impl DomNode {
    pub(crate) fn from_event(event: &Event) -> Option<Self> {
        event.target()?.dyn_into::<Element>().ok().map(DomNode)
    }
}

impl LinkNode for DomNode {
    /// HTML `<a>` only; an SVG `<a>` has no string `href` to redirect.
    fn is_anchor(&self) -> bool {
        self.0.dyn_ref::<HtmlAnchorElement>().is_some()
    }

    fn href(&self) -> Option<String> {
        self.0
            .dyn_ref::<HtmlAnchorElement>()
            .map(HtmlAnchorElement::href)
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent_element().map(DomNode)
    }
}

/// The document plus the textarea a keydown targeted, if any.
pub(crate) struct DomKeyHost {
    document: Document,
    textarea: Option<HtmlTextAreaElement>,
}

impl DomKeyHost {
    pub(crate) fn new(document: Document, event: &KeyboardEvent) -> Self {
        Self {
            document,
            textarea: event_textarea(event),
        }
    }
}

impl Activator for DomKeyHost {
    fn activate(&self, target_id: &str) -> bool {
        let Some(element) = self.document.get_element_by_id(target_id) else {
            return false;
        };
        match element.dyn_into::<HtmlElement>() {
            Ok(element) => {
                element.click();
                true
            }
            Err(_) => false,
        }
    }
}

impl KeyHost for DomKeyHost {
    fn textarea_state(&self) -> Option<TextareaState> {
        let textarea = self.textarea.as_ref()?;
        let value = textarea.value();
        let start = textarea.selection_start().ok().flatten().unwrap_or(0) as usize;
        let end = textarea.selection_end().ok().flatten().unwrap_or(0) as usize;
        Some(TextareaState::from_utf16_selection(value, start, end))
    }

    fn apply_textarea_edit(&self, edit: TextareaEdit) {
        let Some(textarea) = self.textarea.as_ref() else {
            return;
        };
        if let Some(value) = &edit.value {
            textarea.set_value(value);
        }
        let caret = edit.utf16_cursor(&textarea.value());
        if let Err(err) = textarea.set_selection_range(caret, caret) {
            tracing::warn!("cannot move textarea caret: {err:?}");
        }

        if edit.scroll_to_bottom {
            scroll_to_bottom_after_render(textarea.clone());
        }
    }
}

/// Deferred by a zero-delay timeout so the new caret position is rendered first.
fn scroll_to_bottom_after_render(textarea: HtmlTextAreaElement) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let scroll = Closure::once_into_js(move || textarea.set_scroll_top(textarea.scroll_height()));
    if let Err(err) =
        window.set_timeout_with_callback_and_timeout_and_arguments_0(scroll.unchecked_ref(), 0)
    {
        tracing::warn!("cannot schedule textarea scroll: {err:?}");
    }
}

/// Dispatches the upload-success event on the bound element.
pub(crate) struct ElementSignal(pub(crate) Element);

impl CompletionSignal for ElementSignal {
    fn upload_succeeded(&self) {
        let dispatched =
            Event::new(UPLOAD_SUCCESS_EVENT).and_then(|event| self.0.dispatch_event(&event));
        if let Err(err) = dispatched {
            tracing::warn!("cannot dispatch {UPLOAD_SUCCESS_EVENT}: {err:?}");
        }
    }
}
