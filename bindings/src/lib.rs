//! Page-level behaviors for server-rendered note editor pages: key triggers, paste and drop
//! uploads, textarea editing aids and external-link interception.
//!
//! The behavior lives in platform-neutral modules driven through small traits
//! ([`UploadTransport`], [`Notifier`], [`KeyHost`], [`LinkNode`]). The `web` module binds them to
//! the DOM when compiled for `wasm32`; [`ReqwestTransport`] drives the same pipeline natively.

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod capture;
pub mod drop_capture;
pub mod file;
pub mod key_trigger;
pub mod keyboard;
pub mod link;
pub mod notify;
pub mod page;
pub mod paste_capture;
pub mod textarea;
pub mod upload;

#[cfg(not(target_arch = "wasm32"))]
mod reqwest_transport;
#[cfg(target_arch = "wasm32")]
mod web;

pub use capture::CompletionSignal;
pub use capture::UploadCapture;
pub use drop_capture::DropCapture;
pub use file::FileHandle;
pub use file::InMemoryFile;
pub use keyboard::KeyPress;
pub use keyboard::KeyboardDispatcher;
pub use link::LinkInterceptor;
pub use link::LinkNode;
pub use notify::Notice;
pub use notify::NoticeLevel;
pub use notify::Notifier;
pub use page::KeyHost;
pub use page::MountError;
pub use page::PageBindings;
pub use paste_capture::PasteCapture;
#[cfg(not(target_arch = "wasm32"))]
pub use reqwest_transport::ReqwestTransport;
pub use upload::UploadClient;
pub use upload::UploadError;
pub use upload::UploadOutcome;
pub use upload::UploadTransport;
#[cfg(target_arch = "wasm32")]
pub use web::mount_page_hooks;
