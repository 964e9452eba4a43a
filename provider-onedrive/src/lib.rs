//! # OneDrive / SharePoint Provider
//!
//! Implements the `FilesystemAdapter` trait on top of the Microsoft Graph
//! drive-item API.
//!
//! ## Overview
//!
//! This module provides:
//! - App-only authentication through the client-credentials grant
//! - Item-path addressing under a configurable Graph prefix
//!   (`users/{id}/drive`, `sites/{id}/drive`, `drives/{id}`)
//! - Normalization of drive items into listing entries and file metadata
//! - 404 responses surfaced as negative results instead of errors
//!
//! No retries, token refresh, paging or range reads are performed.

pub mod connector;
pub mod error;
pub mod path;
pub mod types;

pub use connector::GraphDriveAdapter;
pub use error::{GraphError, NotFoundExt, Result};
pub use types::{DriveItem, DriveItemCollection};
