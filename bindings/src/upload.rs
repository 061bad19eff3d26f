//! Upload client shared by the paste and drop bindings.
//!
//! One call is one batch: every file is checked against the per-file ceiling and the page must
//! carry a session token before a single multipart request is issued. Any rejection is reported
//! through the [`Notifier`] and ends the call; there is no retry.

use std::future::Future;

use page_hooks_protocol::config::UploadConfig;
use page_hooks_protocol::endpoints;
use url::Url;

use crate::file::FileHandle;
use crate::notify::Notice;
use crate::notify::Notifier;

/// HTTP status reported by a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportStatus(pub u16);

impl TransportStatus {
    pub fn is_ok(self) -> bool {
        (200..300).contains(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("{0}")]
    Network(String),
    #[error("could not build request: {0}")]
    InvalidRequest(String),
}

/// Sends a multipart batch to the upload endpoint.
pub trait UploadTransport {
    type File: FileHandle;

    /// Issue one `POST` to `url` with every file attached under `field_name`.
    fn post_files(
        &self,
        url: Url,
        field_name: &str,
        files: Vec<Self::File>,
    ) -> impl Future<Output = Result<TransportStatus, TransportError>>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("File is larger than {limit} and cannot be uploaded")]
    FileTooLarge {
        name: String,
        size: u64,
        limit: String,
    },
    #[error("An error occurred during upload: {param} is missing")]
    MissingSessionToken { param: String },
    #[error("An error occurred during upload: invalid endpoint ({0})")]
    InvalidEndpoint(String),
    #[error("File upload failed: server responded with status {status}")]
    Rejected { status: u16 },
    #[error("An error occurred during upload, reason: {0}")]
    Transport(#[from] TransportError),
}

impl UploadError {
    pub fn notice(&self) -> Notice {
        match self {
            UploadError::FileTooLarge { .. } => Notice::warning(self.to_string()),
            _ => Notice::error(self.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Succeeded { files: usize },
    /// Nothing to upload; no request was made.
    Skipped,
    Failed(UploadError),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Succeeded { .. })
    }
}

pub struct UploadClient<T, N> {
    config: UploadConfig,
    page_url: Url,
    transport: T,
    notifier: N,
}

impl<T, N> UploadClient<T, N>
where
    T: UploadTransport,
    N: Notifier,
{
    /// `page_url` is the hosting page; its query carries the session token and its origin is
    /// the base for the upload endpoint.
    pub fn new(config: UploadConfig, page_url: Url, transport: T, notifier: N) -> Self {
        Self {
            config,
            page_url,
            transport,
            notifier,
        }
    }

    /// Check the batch and resolve the request URL without touching the network.
    pub fn prepare(&self, files: &[T::File]) -> Result<Url, UploadError> {
        if let Some(file) = files
            .iter()
            .find(|file| file.size() > self.config.max_file_bytes)
        {
            return Err(UploadError::FileTooLarge {
                name: file.name().to_string(),
                size: file.size(),
                limit: self.config.max_file_size_label(),
            });
        }

        let Some(token) = endpoints::session_token(&self.page_url, &self.config.token_param)
        else {
            return Err(UploadError::MissingSessionToken {
                param: self.config.token_param.clone(),
            });
        };

        endpoints::upload_url(
            &self.page_url,
            &self.config.endpoint,
            &self.config.token_param,
            &token,
        )
        .map_err(|err| UploadError::InvalidEndpoint(err.to_string()))
    }

    /// Upload one batch. `on_success` runs at most once, only after a 2xx response.
    pub async fn upload<F>(&self, files: Vec<T::File>, on_success: F) -> UploadOutcome
    where
        F: FnOnce(),
    {
        if files.is_empty() {
            tracing::debug!("upload skipped: empty batch");
            return UploadOutcome::Skipped;
        }

        for file in &files {
            tracing::debug!(
                "upload candidate name={} type={} size={}",
                file.name(),
                file.mime_type(),
                file.size()
            );
        }

        match self.send(files).await {
            Ok(count) => {
                tracing::info!("uploaded {count} file(s)");
                on_success();
                UploadOutcome::Succeeded { files: count }
            }
            Err(err) => {
                tracing::warn!("upload failed: {err}");
                self.notifier.notify(err.notice());
                UploadOutcome::Failed(err)
            }
        }
    }

    async fn send(&self, files: Vec<T::File>) -> Result<usize, UploadError> {
        let url = self.prepare(&files)?;
        let count = files.len();
        let status = self
            .transport
            .post_files(url, &self.config.field_name, files)
            .await?;
        if !status.is_ok() {
            return Err(UploadError::Rejected { status: status.0 });
        }
        Ok(count)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::file::InMemoryFile;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) struct RecordedPost {
        pub url: String,
        pub field_name: String,
        pub file_names: Vec<String>,
    }

    /// Records every post and answers with queued responses (200 once the queue is empty).
    #[derive(Debug, Default)]
    pub(crate) struct FakeTransport {
        pub posts: RefCell<Vec<RecordedPost>>,
        pub responses: RefCell<VecDeque<Result<TransportStatus, TransportError>>>,
    }

    impl FakeTransport {
        pub(crate) fn respond_with(
            self,
            response: Result<TransportStatus, TransportError>,
        ) -> Self {
            self.responses.borrow_mut().push_back(response);
            self
        }

        pub(crate) fn posts(&self) -> Vec<RecordedPost> {
            self.posts.borrow().clone()
        }
    }

    impl UploadTransport for &FakeTransport {
        type File = InMemoryFile;

        async fn post_files(
            &self,
            url: Url,
            field_name: &str,
            files: Vec<InMemoryFile>,
        ) -> Result<TransportStatus, TransportError> {
            self.posts.borrow_mut().push(RecordedPost {
                url: url.to_string(),
                field_name: field_name.to_string(),
                file_names: files.into_iter().map(|file| file.name).collect(),
            });
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or(Ok(TransportStatus(200)))
        }
    }

    pub(crate) fn file_of_size(name: &str, size: usize) -> InMemoryFile {
        InMemoryFile::new(name, "application/octet-stream", vec![0; size])
    }

    pub(crate) fn page_with_token(token: &str) -> Url {
        Url::parse(&format!(
            "http://127.0.0.1:8080/add_or_edit_note?temporary_uuid={token}"
        ))
        .expect("page url")
    }
}
