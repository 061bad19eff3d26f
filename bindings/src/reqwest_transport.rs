//! `reqwest`-backed transport for callers outside the browser (the CLI, integration tests).

use reqwest::multipart::Form;
use reqwest::multipart::Part;
use url::Url;

use crate::file::InMemoryFile;
use crate::link::LinkOpener;
use crate::upload::TransportError;
use crate::upload::TransportStatus;
use crate::upload::UploadTransport;

pub const USER_AGENT: &str = concat!("page-hooks/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| TransportError::InvalidRequest(err.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn multipart_form(field_name: &str, files: Vec<InMemoryFile>) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for file in files {
        let part = Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(&file.mime_type)
            .map_err(|err| TransportError::InvalidRequest(err.to_string()))?;
        form = form.part(field_name.to_string(), part);
    }
    Ok(form)
}

impl UploadTransport for ReqwestTransport {
    type File = InMemoryFile;

    async fn post_files(
        &self,
        url: Url,
        field_name: &str,
        files: Vec<InMemoryFile>,
    ) -> Result<TransportStatus, TransportError> {
        let form = multipart_form(field_name, files)?;
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;
        Ok(TransportStatus(response.status().as_u16()))
    }
}

impl LinkOpener for ReqwestTransport {
    async fn open(&self, request: Url) -> Result<(), TransportError> {
        self.client
            .get(request)
            .send()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use mockito::Matcher;
    use page_hooks_protocol::config::LinkConfig;
    use page_hooks_protocol::config::UploadConfig;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::link::LinkDecision;
    use crate::link::LinkInterceptor;
    use crate::link::LinkNode;
    use crate::notify::RecordingNotifier;
    use crate::upload::UploadClient;
    use crate::upload::UploadOutcome;

    fn page_url(server: &mockito::Server, query: &str) -> Url {
        Url::parse(&format!("{}/add_or_edit_note?{query}", server.url())).expect("page url")
    }

    #[test]
    fn rejects_malformed_mime_type() {
        let err = multipart_form("files", vec![InMemoryFile::new("a", "not a mime", vec![1])])
            .map(|_| ())
            .expect_err("invalid mime type");
        assert!(matches!(err, TransportError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn posts_multipart_batch_with_session_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/upload")
            .match_query(Matcher::UrlEncoded(
                "temporary_uuid".into(),
                "abc123".into(),
            ))
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".into()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="files"; filename="a.png""#.into()),
                Matcher::Regex(r#"name="files"; filename="b.txt""#.into()),
            ]))
            .with_status(200)
            .with_body(r#"{"message":"ok"}"#)
            .expect(1)
            .create_async()
            .await;

        let notifier = RecordingNotifier::new();
        let client = UploadClient::new(
            UploadConfig::default(),
            page_url(&server, "temporary_uuid=abc123"),
            ReqwestTransport::new().expect("transport"),
            &notifier,
        );
        let called = Cell::new(0);

        let outcome = client
            .upload(
                vec![
                    InMemoryFile::new("a.png", "image/png", b"png-bytes".to_vec()),
                    InMemoryFile::new("b.txt", "text/plain", b"hello".to_vec()),
                ],
                || called.set(called.get() + 1),
            )
            .await;

        mock.assert_async().await;
        assert_eq!(outcome, UploadOutcome::Succeeded { files: 2 });
        assert_eq!(called.get(), 1);
        assert_eq!(notifier.notices(), Vec::new());
    }

    #[tokio::test]
    async fn server_error_is_reported_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/upload")
            .match_query(Matcher::Any)
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let notifier = RecordingNotifier::new();
        let client = UploadClient::new(
            UploadConfig::default(),
            page_url(&server, "temporary_uuid=t"),
            ReqwestTransport::new().expect("transport"),
            &notifier,
        );

        let outcome = client
            .upload(vec![InMemoryFile::new("a.txt", "text/plain", vec![1])], || {
                panic!("callback must not run on failure")
            })
            .await;

        mock.assert_async().await;
        assert!(!outcome.is_success());
        assert_eq!(notifier.notices().len(), 1);
    }

    struct Anchor(&'static str);

    impl LinkNode for Anchor {
        fn is_anchor(&self) -> bool {
            true
        }

        fn href(&self) -> Option<String> {
            Some(self.0.to_string())
        }

        fn parent(&self) -> Option<Self> {
            None
        }
    }

    #[tokio::test]
    async fn opens_external_link_through_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/open-external-link")
            .match_query(Matcher::UrlEncoded(
                "url".into(),
                "https://example.com".into(),
            ))
            .with_status(200)
            .with_body(r#"{"status":"ok"}"#)
            .expect(1)
            .create_async()
            .await;

        let interceptor =
            LinkInterceptor::new(page_url(&server, "note_id=1"), LinkConfig::default());
        let LinkDecision::Redirect { request, .. } =
            interceptor.decide(Some(Anchor("https://example.com")))
        else {
            panic!("expected a redirect");
        };

        crate::link::open_external(&ReqwestTransport::new().expect("transport"), request).await;

        mock.assert_async().await;
    }
}
