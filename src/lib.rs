//! LevelUp analyzer - turns an uploaded document and a free-text query into
//! a Gemini analysis.
//!
//! The service accepts an optional file plus a query over HTTP, hosts the
//! file with Gemini's file API (falling back to a temp-file upload when the
//! in-memory upload fails), sends a multimodal `generateContent` request and
//! normalizes whatever response shape comes back into a single string.

pub mod ai;
pub mod analyzer;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod models;
pub mod prompts;
pub mod request;
pub mod server;
pub mod upload;

pub use error::{Error, Result};
