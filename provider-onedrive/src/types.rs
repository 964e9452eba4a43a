//! Microsoft Graph API response types
//!
//! Data structures for (de)serializing Graph drive-item resources.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Graph drive item resource
///
/// Fields the adapter reads are typed; every other property the service
/// returns is kept in `extra` so listings can expose the full property bag.
///
/// See: https://learn.microsoft.com/graph/api/resources/driveitem
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Size in bytes (for folders, the sum of their contents)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,

    /// Last modification time (RFC 3339)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_date_time: Option<String>,

    /// Present on files only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileFacet>,

    /// Present on folders only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<FolderFacet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_reference: Option<ItemReference>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DriveItem {
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.file.as_ref().and_then(|f| f.mime_type.as_deref())
    }

    /// Every property of the item as returned by the service
    pub fn properties(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFacet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_count: Option<u64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reference to another item, typically the parent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ItemReference {
    pub fn to_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Collection returned by `.../children`
///
/// See: https://learn.microsoft.com/graph/api/driveitem-list-children
#[derive(Debug, Deserialize)]
pub struct DriveItemCollection {
    #[serde(default)]
    pub value: Vec<DriveItem>,

    /// Link to the next page; never followed
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

/// Body of a folder-creation request
#[derive(Debug, Serialize)]
pub struct NewFolder<'a> {
    pub name: &'a str,
    pub folder: FolderFacet,
    #[serde(rename = "@microsoft.graph.conflictBehavior")]
    pub conflict_behavior: &'static str,
}

impl<'a> NewFolder<'a> {
    pub fn replacing(name: &'a str) -> Self {
        Self {
            name,
            folder: FolderFacet::default(),
            conflict_behavior: "replace",
        }
    }
}

/// Body of a rename / move request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_reference: Option<ItemReference>,
}

/// Graph error envelope: `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
