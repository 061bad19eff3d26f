//! Drop capture: files dropped on the bound container become one upload batch.

use crate::capture::CompletionSignal;
use crate::capture::UploadCapture;
use crate::notify::Notifier;
use crate::upload::UploadOutcome;
use crate::upload::UploadTransport;

/// Drag events whose default action and propagation are suppressed on the container. Browsers
/// refuse a drop unless `dragover` is cancelled as well.
pub const SUPPRESSED_DRAG_EVENTS: [&str; 2] = ["dragover", "drop"];

/// What the container listener does with one drag event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragHandling {
    /// Call `preventDefault` and `stopPropagation`.
    pub suppress: bool,
    /// Read `DataTransfer.files` and upload them.
    pub upload: bool,
}

pub fn drag_handling(event_type: &str) -> DragHandling {
    DragHandling {
        suppress: SUPPRESSED_DRAG_EVENTS.contains(&event_type),
        upload: event_type == "drop",
    }
}

pub struct DropCapture<T, N, S> {
    capture: UploadCapture<T, N, S>,
}

impl<T, N, S> DropCapture<T, N, S>
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

    /// `files` is `DataTransfer.files`; `None` when the event carried no data transfer.
    pub async fn on_drop(&self, files: Option<Vec<T::File>>) -> UploadOutcome {
        let files = files.unwrap_or_default();
        if files.is_empty() {
            tracing::trace!("drop without files");
            return UploadOutcome::Skipped;
        }
        tracing::debug!("drop captured {} file(s)", files.len());
        self.capture.upload_batch(files).await
    }
}
