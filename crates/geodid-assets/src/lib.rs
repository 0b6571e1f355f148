//! Asset attachment for GeoDID items.
//!
//! [`AttachmentPipeline::attach`] resolves an item, pins each asset through
//! the content store and appends one service reference per asset. A batch
//! either lands completely or leaves the document as it was.

pub mod error;
pub mod pipeline;

pub use error::{AttachError, Result};
pub use pipeline::{AttachmentPipeline, DEFAULT_MAX_CONCURRENT_PINS};
