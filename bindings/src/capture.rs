//! Shared pipeline behind the paste and drop bindings: one gesture, one batch, one upload, and a
//! completion signal on the bound element when the server accepted it.

use std::cell::Cell;
use std::rc::Rc;

use crate::notify::Notifier;
use crate::upload::UploadClient;
use crate::upload::UploadOutcome;
use crate::upload::UploadTransport;

/// Raised on the bound element after a successful upload (`nms_upload_success` in the browser).
pub trait CompletionSignal {
    fn upload_succeeded(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    Idle,
    /// At least one batch from this binding is waiting on the network.
    Uploading,
}

pub struct UploadCapture<T, N, S> {
    client: Rc<UploadClient<T, N>>,
    signal: S,
    in_flight: Cell<usize>,
}

impl<T, N, S> UploadCapture<T, N, S>
where
    T: UploadTransport,
    N: Notifier,
    S: CompletionSignal,
{
    pub fn new(client: Rc<UploadClient<T, N>>, signal: S) -> Self {
        Self {
            client,
            signal,
            in_flight: Cell::new(0),
        }
    }

    pub fn phase(&self) -> CapturePhase {
        if self.in_flight.get() == 0 {
            CapturePhase::Idle
        } else {
            CapturePhase::Uploading
        }
    }

    /// Upload `files` as one batch. Gestures are not queued: overlapping calls each issue their
    /// own request.
    pub async fn upload_batch(&self, files: Vec<T::File>) -> UploadOutcome {
        if files.is_empty() {
            return UploadOutcome::Skipped;
        }

        if self.phase() == CapturePhase::Uploading {
            tracing::debug!("starting a batch while an earlier one is still uploading");
        }
        let _guard = InFlightGuard::enter(&self.in_flight);
        self.client
            .upload(files, || self.signal.upload_succeeded())
            .await
    }
}

struct InFlightGuard<'a>(&'a Cell<usize>);

impl<'a> InFlightGuard<'a> {
    fn enter(counter: &'a Cell<usize>) -> Self {
        counter.set(counter.get() + 1);
        Self(counter)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}
