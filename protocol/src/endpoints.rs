//! HTTP boundary shared with the page server.

use url::Url;

/// Multipart upload endpoint. Files are attached under [`UPLOAD_FIELD_NAME`].
pub const UPLOAD_PATH: &str = "/api/upload";
pub const UPLOAD_FIELD_NAME: &str = "files";

/// Query parameter on the hosting page that correlates uploads with the server-side draft.
pub const SESSION_TOKEN_PARAM: &str = "temporary_uuid";

/// Per-file ceiling enforced before any request is made.
pub const MAX_UPLOAD_FILE_BYTES: u64 = 10 * 1024 * 1024;

pub const OPEN_EXTERNAL_LINK_PATH: &str = "/open-external-link";

/// Custom DOM event dispatched on the bound element after a successful upload.
pub const UPLOAD_SUCCESS_EVENT: &str = "nms_upload_success";

/// Resolve `path` against the page origin and attach a single query pair.
///
/// The value is form-encoded, so `https://example.com` becomes `https%3A%2F%2Fexample.com`.
pub fn endpoint_url(
    base: &Url,
    path: &str,
    param: &str,
    value: &str,
) -> Result<Url, url::ParseError> {
    let mut url = base.join(path)?;
    url.set_fragment(None);
    url.query_pairs_mut().clear().append_pair(param, value);
    Ok(url)
}

pub fn upload_url(
    base: &Url,
    path: &str,
    token_param: &str,
    token: &str,
) -> Result<Url, url::ParseError> {
    endpoint_url(base, path, token_param, token)
}

pub fn open_external_link_url(
    base: &Url,
    path: &str,
    destination: &str,
) -> Result<Url, url::ParseError> {
    endpoint_url(base, path, "url", destination)
}

/// Read the session correlation token from a page URL. Empty values count as absent.
pub fn session_token(page_url: &Url, token_param: &str) -> Option<String> {
    page_url
        .query_pairs()
        .find(|(name, _)| name == token_param)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
