//! # Host Bridge Traits
//!
//! Contracts shared between the drive adapter and the code around it.
//!
//! ## Traits
//!
//! - [`FilesystemAdapter`](storage::FilesystemAdapter) - The abstract file store an
//!   application codes against
//! - [`HttpClient`](http::HttpClient) - Async HTTP round trips with buffered bodies
//! - [`LoggerSink`](log::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). HTTP failures keep
//! their status code in [`BridgeError::Http`] so callers can tell a conflict
//! from a throttle without parsing messages.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can be shared
//! behind an `Arc` across tasks.
//!
//! ## Implementing HttpClient
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         // Implementation
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod log;
pub mod storage;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use log::{LogEntry, LogLevel, LoggerSink};
pub use storage::{
    BoxedReader, EntryKind, FileMetadata, FilesystemAdapter, ListingEntry, Visibility,
    WriteConfig,
};
