//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop and server hosts.
//!
//! - `HttpClient` using `reqwest`
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new());
//! let config = DriveConfig::builder()
//!     .http_client(http_client)
//!     // ...
//!     .build()?;
//! ```

mod http;

pub use http::ReqwestHttpClient;
