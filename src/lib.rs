//! Graph drive workspace facade.
//!
//! Re-exports the pieces a host application needs to mount a Microsoft Graph
//! drive behind the `FilesystemAdapter` interface without wiring each crate
//! individually. The `desktop-shims` feature (on by default) brings in the
//! reqwest-backed `HttpClient` and lets `DriveConfig` use it automatically.
//!
//! ```no_run
//! use graph_drive::{DriveConfig, FilesystemAdapter, GraphDriveAdapter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DriveConfig::from_env()?;
//! let drive = GraphDriveAdapter::connect(&config).await?;
//! for entry in drive.list_contents("", false).await? {
//!     println!("{}", entry.path);
//! }
//! # Ok(())
//! # }
//! ```

pub use bridge_traits::{
    BridgeError, EntryKind, FileMetadata, FilesystemAdapter, HttpClient, ListingEntry,
    Visibility, WriteConfig,
};
pub use core_auth::{AccessToken, ClientCredentials, ClientCredentialsFlow};
pub use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
pub use core_runtime::{DriveConfig, DriveConfigBuilder};
pub use provider_onedrive::{GraphDriveAdapter, GraphError};

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop::ReqwestHttpClient;
