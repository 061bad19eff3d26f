//! External-link interception.
//!
//! A click anywhere in the document is traced up to the nearest `<a>`. If that anchor resolves to
//! a destination, the browser navigation is cancelled and the destination is handed to the
//! server's open-external-link endpoint instead. The request is fire-and-forget.

use std::future::Future;

use page_hooks_protocol::config::LinkConfig;
use page_hooks_protocol::endpoints;
use url::Url;

use crate::upload::TransportError;

/// The slice of the DOM the interceptor needs: an element, its tag, its resolved `href` and
/// its parent.
pub trait LinkNode: Sized {
    fn is_anchor(&self) -> bool;
    /// The anchor's resolved `href` property; `None` or empty when it has none.
    fn href(&self) -> Option<String>;
    fn parent(&self) -> Option<Self>;
}

/// Walk from `start` through its ancestors to the first anchor.
pub fn nearest_anchor<N: LinkNode>(start: N) -> Option<N> {
    let mut node = Some(start);
    while let Some(current) = node {
        if current.is_anchor() {
            return Some(current);
        }
        node = current.parent();
    }
    None
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkDecision {
    /// Leave the click to the browser.
    PassThrough,
    /// Cancel navigation and `GET` `request`.
    Redirect { destination: String, request: Url },
}

#[derive(Debug, Clone)]
pub struct LinkInterceptor {
    page_url: Url,
    config: LinkConfig,
}

impl LinkInterceptor {
    pub fn new(page_url: Url, config: LinkConfig) -> Self {
        Self { page_url, config }
    }

    pub fn decide<N: LinkNode>(&self, target: Option<N>) -> LinkDecision {
        let Some(anchor) = target.and_then(nearest_anchor) else {
            return LinkDecision::PassThrough;
        };
        let Some(destination) = anchor.href().filter(|href| !href.is_empty()) else {
            return LinkDecision::PassThrough;
        };

        let request =
            endpoints::open_external_link_url(&self.page_url, &self.config.endpoint, &destination);
        match request {
            Ok(request) => LinkDecision::Redirect {
                destination,
                request,
            },
            Err(err) => {
                tracing::warn!("cannot build open-external-link request for {destination}: {err}");
                LinkDecision::PassThrough
            }
        }
    }
}

/// Issues the `GET` to the open-external-link endpoint.
pub trait LinkOpener {
    fn open(&self, request: Url) -> impl Future<Output = Result<(), TransportError>>;
}

/// Failures are logged and otherwise ignored; the page is never affected.
pub async fn open_external<O: LinkOpener>(opener: &O, request: Url) {
    if let Err(err) = opener.open(request.clone()).await {
        tracing::error!("Failed to open link via {request}: {err}");
    }
}
