//! Service layer
//!
//! File-producing operations that sit beside the conversation state rather
//! than inside it.

pub mod export;

pub use export::{ExportError, Transcript};
