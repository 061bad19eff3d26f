//! `fetch`-backed transport.

use js_sys::Promise;
use url::Url;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::FormData;
use web_sys::RequestInit;
use web_sys::Response;

use super::dom::WebFile;
use crate::file::FileHandle;
use crate::link::LinkOpener;
use crate::upload::TransportError;
use crate::upload::TransportStatus;
use crate::upload::UploadTransport;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FetchTransport;

pub(crate) fn js_error_message(err: &JsValue) -> String {
    if let Some(err) = err.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn network_error(err: JsValue) -> TransportError {
    TransportError::Network(js_error_message(&err))
}

fn invalid_request(err: JsValue) -> TransportError {
    TransportError::InvalidRequest(js_error_message(&err))
}

async fn send(promise: Promise) -> Result<Response, TransportError> {
    let response = JsFuture::from(promise).await.map_err(network_error)?;
    response
        .dyn_into::<Response>()
        .map_err(|_| TransportError::Network("fetch did not resolve to a Response".to_string()))
}

fn window() -> Result<web_sys::Window, TransportError> {
    web_sys::window().ok_or_else(|| TransportError::Network("no window".to_string()))
}

impl UploadTransport for FetchTransport {
    type File = WebFile;

    async fn post_files(
        &self,
        url: Url,
        field_name: &str,
        files: Vec<WebFile>,
    ) -> Result<TransportStatus, TransportError> {
        let form = FormData::new().map_err(invalid_request)?;
        for file in &files {
            form.append_with_blob_and_filename(field_name, &file.file, file.name())
                .map_err(invalid_request)?;
        }

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_body(&form);

        let promise = window()?.fetch_with_str_and_init(url.as_str(), &init);
        let response = send(promise).await?;
        Ok(TransportStatus(response.status()))
    }
}

impl LinkOpener for FetchTransport {
    async fn open(&self, request: Url) -> Result<(), TransportError> {
        let response = send(window()?.fetch_with_str(request.as_str())).await?;
        if !response.ok() {
            tracing::warn!("{request} answered {}", response.status());
        }
        Ok(())
    }
}
