//! Controllers
//!
//! Reactive glue between components and the services: each one owns signals
//! in the current reactive owner and is `Copy` so it can move into closures.

mod job_detail;
mod resource;
mod toast;
pub mod upload;

pub use job_detail::{use_job_detail, JobDetailController};
pub use resource::{use_resource, use_resource_list, ResourceController};
pub use toast::{Toast, ToastLevel, Toasts};
pub use upload::{use_upload, BlobPreview, UploadController};
