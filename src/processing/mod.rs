//! Upload processing pipeline: classification, PDF extraction, and inference orchestration.

pub mod classify;
mod service;
pub mod types;

pub use classify::classify;
pub use service::{SimplifyApi, SimplifyService};
pub use types::{SimplifyError, SimplifyResult, SourceType, UploadedFile};
