//! Paste capture: file attachments pasted into the bound element become one upload batch.
//!
//! Text pastes are never intercepted; the browser's default paste still runs for them.

use crate::capture::CompletionSignal;
use crate::capture::UploadCapture;
use crate::notify::Notifier;
use crate::upload::UploadOutcome;
use crate::upload::UploadTransport;

/// One entry of `ClipboardEvent.clipboardData.items`, classified by its `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardItem<F> {
    File(F),
    /// `kind == "string"`, or a file item whose `getAsFile()` returned nothing.
    Other,
}

/// Collect every file item, in clipboard order. `None` means the event carried no clipboard data.
pub fn extract_pasted_files<F, I>(items: Option<I>) -> Vec<F>
where
    I: IntoIterator<Item = ClipboardItem<F>>,
{
    let Some(items) = items else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| match item {
            ClipboardItem::File(file) => Some(file),
            ClipboardItem::Other => None,
        })
        .collect()
}

pub struct PasteCapture<T, N, S> {
    capture: UploadCapture<T, N, S>,
}

impl<T, N, S> PasteCapture<T, N, S>
where
    T: UploadTransport,
    N: Notifier,
    S: CompletionSignal,
{
    pub fn new(capture: UploadCapture<T, N, S>) -> Self {
        Self { capture }
    }

    pub fn capture(&self) -> &UploadCapture<T, N, S> {
        &self.capture
    }

    pub async fn on_paste<I>(&self, items: Option<I>) -> UploadOutcome
    where
        I: IntoIterator<Item = ClipboardItem<T::File>>,
    {
        let files = extract_pasted_files(items);
        if files.is_empty() {
            tracing::trace!("paste without file items, leaving it to the browser");
            return UploadOutcome::Skipped;
        }
        tracing::debug!("paste captured {} file(s)", files.len());
        self.capture.upload_batch(files).await
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use page_hooks_protocol::config::UploadConfig;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::capture::CapturePhase;
    use crate::capture::testing::CountingSignal;
    use crate::file::InMemoryFile;
    use crate::notify::RecordingNotifier;
    use crate::upload::TransportStatus;
    use crate::upload::UploadClient;
    use crate::upload::testing::FakeTransport;
    use crate::upload::testing::file_of_size;
    use crate::upload::testing::page_with_token;

    fn binding<'a>(
        transport: &'a FakeTransport,
        notifier: &'a RecordingNotifier,
        signal: &'a CountingSignal,
    ) -> PasteCapture<&'a FakeTransport, &'a RecordingNotifier, &'a CountingSignal> {
        let client = UploadClient::new(
            UploadConfig::default(),
            page_with_token("abc123"),
            transport,
            notifier,
        );
        PasteCapture::new(UploadCapture::new(Rc::new(client), signal))
    }

    #[test]
    fn extracts_only_file_items_in_order() {
        let items = vec![
            ClipboardItem::Other,
            ClipboardItem::File("a.png"),
            ClipboardItem::Other,
            ClipboardItem::File("b.png"),
        ];
        assert_eq!(extract_pasted_files(Some(items)), vec!["a.png", "b.png"]);
        assert_eq!(
            extract_pasted_files::<&str, Vec<ClipboardItem<&str>>>(None),
            Vec::<&str>::new()
        );
    }

    #[tokio::test]
    async fn text_paste_uploads_nothing() {
        let transport = FakeTransport::default();
        let notifier = RecordingNotifier::new();
        let signal = CountingSignal::default();
        let paste = binding(&transport, &notifier, &signal);

        let outcome = paste
            .on_paste(Some(vec![ClipboardItem::<InMemoryFile>::Other]))
            .await;
        assert_eq!(outcome, UploadOutcome::Skipped);

        let outcome = paste
            .on_paste(None::<Vec<ClipboardItem<InMemoryFile>>>)
            .await;
        assert_eq!(outcome, UploadOutcome::Skipped);

        assert_eq!(transport.posts(), Vec::new());
        assert_eq!(signal.fired.get(), 0);
        assert_eq!(notifier.notices(), Vec::new());
    }

    #[tokio::test]
    async fn pasted_files_upload_as_one_batch_and_signal() {
        let transport = FakeTransport::default();
        let notifier = RecordingNotifier::new();
        let signal = CountingSignal::default();
        let paste = binding(&transport, &notifier, &signal);

        let outcome = paste
            .on_paste(Some(vec![
                ClipboardItem::File(file_of_size("image.png", 1024)),
                ClipboardItem::Other,
                ClipboardItem::File(file_of_size("notes.txt", 12)),
            ]))
            .await;

        assert_eq!(outcome, UploadOutcome::Succeeded { files: 2 });
        let posts = transport.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].file_names, vec!["image.png", "notes.txt"]);
        assert_eq!(signal.fired.get(), 1);
        assert_eq!(paste.capture().phase(), CapturePhase::Idle);
    }

    #[tokio::test]
    async fn failed_upload_does_not_signal() {
        let transport = FakeTransport::default().respond_with(Ok(TransportStatus(500)));
        let notifier = RecordingNotifier::new();
        let signal = CountingSignal::default();
        let paste = binding(&transport, &notifier, &signal);

        let outcome = paste
            .on_paste(Some(vec![ClipboardItem::File(file_of_size("a.png", 1))]))
            .await;

        assert!(!outcome.is_success());
        assert_eq!(signal.fired.get(), 0);
        assert_eq!(notifier.notices().len(), 1);
    }
}
