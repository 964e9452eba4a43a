//! Microsoft Graph drive connector implementation
//!
//! Implements the `FilesystemAdapter` trait against Graph drive items.

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bridge_traits::storage::{EntryKind, FileMetadata, FilesystemAdapter, ListingEntry, WriteConfig};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use core_auth::{AccessToken, ClientCredentials, ClientCredentialsFlow};
use core_runtime::config::{DriveConfig, DEFAULT_GRAPH_BASE_URL};
use core_runtime::logging::strip_path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{GraphError, NotFoundExt, Result};
use crate::path::{encode_path, join_path, normalize_prefix, segments, split_path, trim_path};
use crate::types::{DriveItem, DriveItemCollection, ErrorResponse, ItemPatch, ItemReference, NewFolder};

/// Content type sent with uploads when the caller gives none
const DEFAULT_UPLOAD_MIME_TYPE: &str = "application/octet-stream";

/// Microsoft Graph drive connector
///
/// Implements `FilesystemAdapter` over the drive-item endpoints. Every
/// path is resolved under a Graph prefix such as `users/{id}/drive`, so the
/// same adapter serves OneDrive for Business accounts, SharePoint document
/// libraries or any drive addressable by id.
///
/// The adapter holds no mutable state and can be shared behind an `Arc`.
///
/// # Example
///
/// ```ignore
/// use provider_onedrive::GraphDriveAdapter;
/// use bridge_traits::storage::FilesystemAdapter;
///
/// let adapter = GraphDriveAdapter::connect(&config).await?;
/// let entries = adapter.list_contents("reports", false).await?;
/// ```
pub struct GraphDriveAdapter {
    http_client: Arc<dyn HttpClient>,

    /// Bearer credential obtained once at construction
    token: AccessToken,

    /// Normalized prefix, always starting and ending with `/`
    prefix: String,

    base_url: String,
}

impl GraphDriveAdapter {
    /// Create an adapter from an already acquired token
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `token` - bearer token valid for Graph
    /// * `prefix` - Graph resource prefix, e.g. `users/{id}/drive`
    pub fn new(http_client: Arc<dyn HttpClient>, token: impl Into<AccessToken>, prefix: &str) -> Self {
        Self {
            http_client,
            token: token.into(),
            prefix: normalize_prefix(prefix),
            base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
        }
    }

    /// Point the adapter at another Graph endpoint (national clouds, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Acquire a token with the configured client credentials and build the
    /// adapter.
    ///
    /// The token is never refreshed; build a new adapter once it expires.
    #[instrument(skip(config), fields(tenant = %config.tenant_id))]
    pub async fn connect(config: &DriveConfig) -> Result<Self> {
        let credentials = ClientCredentials::new(
            config.client_id.as_str(),
            config.client_secret.as_str(),
            config.tenant_id.as_str(),
        );

        let token = ClientCredentialsFlow::new(Arc::clone(&config.http_client))
            .with_authority(config.authority_url.as_str())
            .acquire_token(&credentials)
            .await?;

        let adapter = Self::new(Arc::clone(&config.http_client), token, &config.root_prefix)
            .with_base_url(config.graph_base_url.as_str());

        info!(prefix = %adapter.prefix, "Connected to Microsoft Graph");
        Ok(adapter)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    fn url(&self, resource: &str) -> String {
        format!("{}{}{}", self.base_url, self.prefix, resource)
    }

    /// `root:/{path}`, or `root` for the drive root
    fn item_resource(path: &str) -> String {
        let encoded = encode_path(path);
        if encoded.is_empty() {
            "root".to_string()
        } else {
            format!("root:/{}", encoded)
        }
    }

    fn children_resource(path: &str) -> String {
        let encoded = encode_path(path);
        if encoded.is_empty() {
            "root/children".to_string()
        } else {
            format!("root:/{}:/children", encoded)
        }
    }

    fn by_id(item_id: &str) -> String {
        format!("items/{}", urlencoding::encode(item_id))
    }

    /// Parse RFC 3339 timestamp to Unix timestamp
    fn parse_timestamp(rfc3339: &str) -> Option<i64> {
        DateTime::parse_from_rfc3339(rfc3339)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).timestamp())
    }

    fn parse_body<T: serde::de::DeserializeOwned>(response: &HttpResponse, what: &str) -> Result<T> {
        serde_json::from_slice(&response.body)
            .map_err(|e| GraphError::ParseError(format!("Failed to parse {}: {}", what, e)))
    }

    fn error_message(response: &HttpResponse) -> String {
        match serde_json::from_slice::<ErrorResponse>(&response.body) {
            Ok(envelope) if envelope.error.code.is_empty() => envelope.error.message,
            Ok(envelope) => format!("{}: {}", envelope.error.code, envelope.error.message),
            Err(_) => String::from_utf8_lossy(&response.body).to_string(),
        }
    }

    /// Convert a child item into a listing entry rooted at `directory`
    fn convert_entry(directory: &str, item: DriveItem) -> ListingEntry {
        ListingEntry {
            path: join_path(directory, &item.name),
            kind: if item.is_folder() {
                EntryKind::Dir
            } else {
                EntryKind::File
            },
            dirname: trim_path(directory).to_string(),
            properties: item.properties(),
        }
    }

    fn convert_metadata(item: &DriveItem) -> FileMetadata {
        FileMetadata {
            mimetype: item.mime_type().map(str::to_string),
            size: item.size.unwrap_or(0),
            timestamp: item
                .last_modified_date_time
                .as_deref()
                .and_then(Self::parse_timestamp),
        }
    }

    /// Execute one authorized request and classify the response.
    ///
    /// 404 becomes [`GraphError::NotFound`], any other non-2xx becomes
    /// [`GraphError::ApiError`], transport failures pass through untouched.
    #[instrument(skip(self, request), fields(method = request.method.as_str()))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let resource = request
            .url
            .strip_prefix(&self.base_url)
            .unwrap_or(&request.url)
            .to_string();
        debug!(resource = %resource, "Graph request");

        let response = self
            .http_client
            .execute(request.bearer_token(self.token.secret()))
            .await?;

        if response.is_success() {
            debug!(status = response.status, "Graph request succeeded");
            return Ok(response);
        }

        if response.status == 404 {
            debug!(resource = %resource, "Graph item not found");
            return Err(GraphError::NotFound { resource });
        }

        let message = Self::error_message(&response);
        warn!(
            status = response.status,
            error = %message,
            request_id = response.header("request-id").unwrap_or("-"),
            "Graph request failed"
        );

        Err(GraphError::ApiError {
            status_code: response.status,
            message,
        })
    }

    /// Mutations addressed by path must name an item below the drive root
    fn require_item_path(path: &str, operation: &str) -> Result<()> {
        if trim_path(path).is_empty() {
            return Err(GraphError::Unsupported(format!(
                "{} requires a path below the drive root",
                operation
            )));
        }
        Ok(())
    }

    /// Look up the item at `path` (`root` when empty)
    async fn get_drive_item(&self, path: &str) -> Result<DriveItem> {
        let url = self.url(&Self::item_resource(path));
        let response = self.send(HttpRequest::new(HttpMethod::Get, url)).await?;
        Self::parse_body(&response, "drive item")
    }

    async fn list_children(&self, directory: &str) -> Result<Vec<ListingEntry>> {
        let url = self.url(&Self::children_resource(directory));
        let response = self.send(HttpRequest::new(HttpMethod::Get, url)).await?;
        let collection: DriveItemCollection = Self::parse_body(&response, "children listing")?;

        if collection.next_link.is_some() {
            warn!(
                directory = %directory,
                returned = collection.value.len(),
                "Listing has more pages; only the first page is returned"
            );
        }

        Ok(collection
            .value
            .into_iter()
            .map(|item| Self::convert_entry(directory, item))
            .collect())
    }

    async fn download(&self, path: &str) -> Result<Bytes> {
        let item = self.get_drive_item(path).await?;
        let url = self.url(&format!("{}/content", Self::by_id(&item.id)));
        let response = self.send(HttpRequest::new(HttpMethod::Get, url)).await?;

        debug!(bytes = response.body.len(), "Downloaded item content");
        Ok(response.body)
    }

    async fn upload(&self, path: &str, contents: Bytes, config: &WriteConfig) -> Result<bool> {
        Self::require_item_path(path, "write")?;
        let url = self.url(&format!("{}:/content", Self::item_resource(path)));
        let content_type = config
            .mimetype
            .as_deref()
            .unwrap_or(DEFAULT_UPLOAD_MIME_TYPE);
        let size = contents.len();

        let request = HttpRequest::new(HttpMethod::Put, url)
            .header("Content-Type", content_type)
            .body(contents);
        let response = self.send(request).await?;

        let written = matches!(response.status, 200 | 201);
        if written {
            info!(file = %strip_path(path), bytes = size, "Uploaded item");
        }
        Ok(written)
    }

    async fn remove(&self, path: &str) -> Result<bool> {
        Self::require_item_path(path, "delete")?;
        let item = self.get_drive_item(path).await?;
        let url = self.url(&Self::by_id(&item.id));
        let response = self.send(HttpRequest::new(HttpMethod::Delete, url)).await?;

        let deleted = response.status == 204;
        if deleted {
            info!(file = %strip_path(path), "Deleted item");
        }
        Ok(deleted)
    }

    /// Existing folder at `directory`, created when missing
    async fn resolve_folder(&self, directory: &str) -> Result<DriveItem> {
        if trim_path(directory).is_empty() {
            return self.get_drive_item("").await;
        }

        match self.get_drive_item(directory).await.found()? {
            Some(item) => Ok(item),
            None => match self.make_path(directory).await? {
                Some(item) => Ok(item),
                None => self.get_drive_item("").await,
            },
        }
    }

    async fn move_item(&self, path: &str, new_path: &str) -> Result<()> {
        Self::require_item_path(path, "rename")?;
        Self::require_item_path(new_path, "rename")?;
        let item = self.get_drive_item(path).await?;
        let (old_dir, _) = split_path(path);
        let (new_dir, new_name) = split_path(new_path);

        let parent_reference = if old_dir != new_dir {
            let destination = self.resolve_folder(new_dir).await?;
            Some(ItemReference::to_id(destination.id))
        } else {
            None
        };

        let body = ItemPatch {
            name: new_name,
            parent_reference,
        };
        let request =
            HttpRequest::new(HttpMethod::Patch, self.url(&Self::by_id(&item.id))).json(&body)?;
        self.send(request).await?;

        info!(from = %strip_path(path), to = %strip_path(new_path), "Moved item");
        Ok(())
    }

    async fn create_folder(&self, parent_id: Option<&str>, name: &str) -> Result<DriveItem> {
        let resource = match parent_id {
            Some(id) => format!("{}/children", Self::by_id(id)),
            None => "root/children".to_string(),
        };

        let request = HttpRequest::new(HttpMethod::Post, self.url(&resource))
            .json(&NewFolder::replacing(name))?;
        let response = self.send(request).await?;
        Self::parse_body(&response, "created folder")
    }

    /// Create every folder along `path`, outermost first.
    ///
    /// Each segment is created under the item produced by the previous one
    /// with the `replace` conflict behaviour, so existing folders are reused
    /// rather than duplicated. Returns the innermost folder, or `None` for an
    /// empty path.
    ///
    /// Unlike [`FilesystemAdapter::create_dir`], failures are returned to the
    /// caller.
    #[instrument(skip(self))]
    pub async fn make_path(&self, path: &str) -> Result<Option<DriveItem>> {
        let mut current: Option<DriveItem> = None;

        for name in segments(path) {
            let parent_id = current.as_ref().map(|item| item.id.as_str());
            current = Some(self.create_folder(parent_id, name).await?);
        }

        Ok(current)
    }
}

#[async_trait]
impl FilesystemAdapter for GraphDriveAdapter {
    #[instrument(skip(self))]
    async fn has(&self, path: &str) -> BridgeResult<bool> {
        Ok(self.get_drive_item(path).await.found()?.is_some())
    }

    #[instrument(skip(self))]
    async fn list_contents(&self, directory: &str, recursive: bool) -> BridgeResult<Vec<ListingEntry>> {
        if recursive {
            return Err(GraphError::Unsupported("recursive listing".to_string()).into());
        }

        let entries = self.list_children(directory).await?;
        debug!(count = entries.len(), "Listed directory");
        Ok(entries)
    }

    #[instrument(skip(self))]
    async fn read(&self, path: &str) -> BridgeResult<Option<Bytes>> {
        Ok(self.download(path).await.found()?)
    }

    #[instrument(skip(self))]
    async fn get_url(&self, path: &str) -> BridgeResult<Option<String>> {
        let item = self.get_drive_item(path).await.found()?;
        Ok(item.and_then(|item| item.web_url))
    }

    #[instrument(skip(self))]
    async fn get_metadata(&self, path: &str) -> BridgeResult<Option<FileMetadata>> {
        let item = self.get_drive_item(path).await.found()?;
        Ok(item.as_ref().map(Self::convert_metadata))
    }

    #[instrument(skip(self))]
    async fn rename(&self, path: &str, new_path: &str) -> BridgeResult<bool> {
        Ok(self.move_item(path, new_path).await.found()?.is_some())
    }

    #[instrument(skip(self))]
    async fn delete(&self, path: &str) -> BridgeResult<bool> {
        Ok(self.remove(path).await.found()?.unwrap_or(false))
    }

    #[instrument(skip(self, contents, config), fields(bytes = contents.len()))]
    async fn write(&self, path: &str, contents: Bytes, config: &WriteConfig) -> BridgeResult<bool> {
        Ok(self.upload(path, contents, config).await?)
    }

    #[instrument(skip(self, _config))]
    async fn create_dir(&self, dirname: &str, _config: &WriteConfig) -> BridgeResult<bool> {
        match self.make_path(dirname).await {
            Ok(Some(_)) => Ok(true),
            Ok(None) => {
                warn!("Refusing to create a directory with an empty path");
                Ok(false)
            }
            Err(e) => {
                warn!(error = %e, "Failed to create directory");
                Ok(false)
            }
        }
    }
}
