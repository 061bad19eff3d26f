//! Non-blocking toast notices.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::Document;
use web_sys::HtmlElement;

use crate::notify::Notice;
use crate::notify::NoticeLevel;
use crate::notify::Notifier;

const TOAST_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("right", "1rem"),
    ("bottom", "1rem"),
    ("z-index", "2147483647"),
    ("max-width", "24rem"),
    ("padding", "0.5rem 0.75rem"),
    ("border-radius", "4px"),
    ("color", "#fff"),
    ("font", "14px sans-serif"),
];

pub(crate) struct ToastNotifier {
    document: Document,
    duration_ms: u32,
}

impl ToastNotifier {
    pub(crate) fn new(document: Document, duration_ms: u32) -> Self {
        Self {
            document,
            duration_ms,
        }
    }

    fn show(&self, notice: &Notice) -> Result<(), JsValue> {
        let toast: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        let role = match notice.level {
            NoticeLevel::Warning => "status",
            NoticeLevel::Error => "alert",
        };
        toast.set_attribute("role", role)?;
        toast.set_attribute("data-level", notice.level.label())?;
        toast.set_text_content(Some(&notice.message));

        let style = toast.style();
        for (property, value) in TOAST_STYLE {
            style.set_property(property, value)?;
        }
        let background = match notice.level {
            NoticeLevel::Warning => "#b26a00",
            NoticeLevel::Error => "#b00020",
        };
        style.set_property("background", background)?;

        let Some(body) = self.document.body() else {
            return Err(JsValue::from_str("document has no body"));
        };
        body.append_child(&toast)?;

        let Some(window) = web_sys::window() else {
            return Ok(());
        };
        let dismiss = Closure::once_into_js(move || toast.remove());
        window.set_timeout_with_callback_and_timeout_and_arguments_0(
            dismiss.unchecked_ref(),
            i32::try_from(self.duration_ms).unwrap_or(i32::MAX),
        )?;
        Ok(())
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, notice: Notice) {
        tracing::info!("{notice}");
        if let Err(err) = self.show(&notice) {
            tracing::warn!("cannot show toast: {err:?}");
        }
    }
}
