//! # Authentication Module
//!
//! App-only authentication against the Microsoft identity platform.
//!
//! ## Overview
//!
//! The drive adapter authenticates once, when it is constructed, with the
//! OAuth 2.0 client-credentials grant. The resulting [`AccessToken`] is an
//! owned value handed to the adapter; nothing here refreshes it, so a process
//! that outlives the token has to build a new adapter.

pub mod error;
pub mod oauth;
pub mod types;

pub use error::{AuthError, Result};
pub use oauth::{ClientCredentialsFlow, DEFAULT_AUTHORITY, GRAPH_DEFAULT_SCOPE};
pub use types::{AccessToken, ClientCredentials};
