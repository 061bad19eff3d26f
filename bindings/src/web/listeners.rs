//! Event listener installation. Listeners live as long as the page, so their closures are leaked
//! with `Closure::forget`.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;
use web_sys::ClipboardEvent;
use web_sys::Document;
use web_sys::DragEvent;
use web_sys::KeyboardEvent;
use web_sys::MouseEvent;

use super::dom;
use super::dom::DomKeyHost;
use super::dom::DomNode;
use super::dom::ElementSignal;
use super::fetch::FetchTransport;
use super::toast::ToastNotifier;
use crate::capture::UploadCapture;
use crate::drop_capture::DropCapture;
use crate::drop_capture::SUPPRESSED_DRAG_EVENTS;
use crate::drop_capture::drag_handling;
use crate::link::LinkDecision;
use crate::link::LinkInterceptor;
use crate::link::open_external;
use crate::page::PageBindings;
use crate::paste_capture::PasteCapture;
use crate::upload::UploadClient;

type WebUploadClient = UploadClient<FetchTransport, ToastNotifier>;

pub(crate) fn install(document: &Document, bindings: Rc<PageBindings>) -> Result<(), JsValue> {
    let config = bindings.config();

    if config.uses_uploads() {
        let notifier = ToastNotifier::new(
            document.clone(),
            config.notifications.toast_duration_ms,
        );
        let client = Rc::new(bindings.upload_client(FetchTransport, notifier));
        if let Some(id) = &config.paste_target_id {
            install_paste(document, id, &client)?;
        }
        if let Some(id) = &config.drop_container_id {
            install_drop(document, id, &client)?;
        }
    }

    if let Some(interceptor) = bindings.link_interceptor() {
        install_link_interceptor(document, interceptor.clone())?;
    }

    if !bindings.dispatcher().is_empty() {
        install_keydown(document, bindings)?;
    }
    Ok(())
}

fn install_keydown(document: &Document, bindings: Rc<PageBindings>) -> Result<(), JsValue> {
    tracing::debug!("keyboard routes: {:?}", bindings.dispatcher());
    let host_document = document.clone();
    let on_keydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        let press = dom::key_press(&event);
        let host = DomKeyHost::new(host_document.clone(), &event);
        if bindings.handle_keydown(&press, &host) {
            event.prevent_default();
        }
    });
    document.add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref())?;
    on_keydown.forget();
    Ok(())
}

fn install_paste(
    document: &Document,
    id: &str,
    client: &Rc<WebUploadClient>,
) -> Result<(), JsValue> {
    let Some(target) = document.get_element_by_id(id) else {
        tracing::debug!("paste target #{id} not found, paste capture disabled");
        return Ok(());
    };

    let paste = Rc::new(PasteCapture::new(UploadCapture::new(
        Rc::clone(client),
        ElementSignal(target.clone()),
    )));
    let on_paste = Closure::<dyn FnMut(ClipboardEvent)>::new(move |event: ClipboardEvent| {
        let items = dom::clipboard_items(&event);
        let paste = Rc::clone(&paste);
        spawn_local(async move {
            let outcome = paste.on_paste(items).await;
            tracing::trace!("paste upload finished: {outcome:?}");
        });
    });
    target.add_event_listener_with_callback("paste", on_paste.as_ref().unchecked_ref())?;
    on_paste.forget();
    tracing::debug!("paste capture bound to #{id}");
    Ok(())
}

fn install_drop(
    document: &Document,
    id: &str,
    client: &Rc<WebUploadClient>,
) -> Result<(), JsValue> {
    let Some(container) = document.get_element_by_id(id) else {
        tracing::debug!("drop container #{id} not found, drop capture disabled");
        return Ok(());
    };

    let dropzone = Rc::new(DropCapture::new(UploadCapture::new(
        Rc::clone(client),
        ElementSignal(container.clone()),
    )));
    let on_drag = Closure::<dyn FnMut(DragEvent)>::new(move |event: DragEvent| {
        let handling = drag_handling(&event.type_());
        if handling.suppress {
            event.prevent_default();
            event.stop_propagation();
        }
        if !handling.upload {
            return;
        }
        let files = dom::dropped_files(&event);
        let dropzone = Rc::clone(&dropzone);
        spawn_local(async move {
            let outcome = dropzone.on_drop(files).await;
            tracing::trace!("drop upload finished: {outcome:?}");
        });
    });
    for event_name in SUPPRESSED_DRAG_EVENTS {
        container.add_event_listener_with_callback(event_name, on_drag.as_ref().unchecked_ref())?;
    }
    on_drag.forget();
    tracing::debug!("drop capture bound to #{id}");
    Ok(())
}

fn install_link_interceptor(
    document: &Document,
    interceptor: LinkInterceptor,
) -> Result<(), JsValue> {
    let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        let LinkDecision::Redirect {
            destination,
            request,
        } = interceptor.decide(DomNode::from_event(&event))
        else {
            return;
        };
        event.prevent_default();
        tracing::debug!("opening {destination} through the server");
        spawn_local(async move { open_external(&FetchTransport, request).await });
    });
    document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(())
}
