//! In-memory stand-in for the identity platform and Graph drive endpoints.
//!
//! Implements `HttpClient` so the real adapter and token flow run unchanged
//! against it. Only the routes the adapter uses are served.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bytes::Bytes;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const AUTHORITY: &str = "http://login.test";
pub const GRAPH_BASE: &str = "http://graph.test/v1.0";
pub const PREFIX: &str = "drives/test-drive";
pub const TENANT: &str = "contoso";
pub const ACCESS_TOKEN: &str = "fake-access-token";

const ROOT_ID: &str = "ROOT";
const MODIFIED: &str = "2024-05-01T12:00:00Z";

#[derive(Debug, Clone)]
struct FakeItem {
    id: String,
    name: String,
    parent: Option<String>,
    folder: bool,
    content: Bytes,
    mime_type: Option<String>,
}

#[derive(Debug, Default)]
struct FakeState {
    items: HashMap<String, FakeItem>,
    next_id: u64,
    requests: Vec<(HttpMethod, String)>,
    /// Mutating requests still allowed; `None` means unlimited
    mutation_budget: Option<usize>,
}

impl FakeState {
    fn children(&self, parent_id: &str) -> Vec<&FakeItem> {
        let mut children: Vec<_> = self
            .items
            .values()
            .filter(|item| item.parent.as_deref() == Some(parent_id))
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        children
    }

    fn child_named(&self, parent_id: &str, name: &str) -> Option<&FakeItem> {
        self.items
            .values()
            .find(|item| item.parent.as_deref() == Some(parent_id) && item.name == name)
    }

    fn resolve(&self, segments: &[String]) -> Option<&FakeItem> {
        let mut current = self.items.get(ROOT_ID)?;
        for segment in segments {
            current = self.child_named(&current.id, segment)?;
        }
        Some(current)
    }

    fn path_of(&self, item: &FakeItem) -> String {
        let mut names = Vec::new();
        let mut cursor = Some(item);
        while let Some(current) = cursor {
            if current.id == ROOT_ID {
                break;
            }
            names.push(current.name.clone());
            cursor = current.parent.as_ref().and_then(|id| self.items.get(id));
        }
        names.reverse();
        names.join("/")
    }

    fn insert(&mut self, parent: &str, name: &str, folder: bool) -> String {
        self.next_id += 1;
        let id = format!("ITEM{}", self.next_id);
        self.items.insert(
            id.clone(),
            FakeItem {
                id: id.clone(),
                name: name.to_string(),
                parent: Some(parent.to_string()),
                folder,
                content: Bytes::new(),
                mime_type: None,
            },
        );
        id
    }

    fn remove_tree(&mut self, id: &str) {
        let children: Vec<String> = self.children(id).iter().map(|c| c.id.clone()).collect();
        for child in children {
            self.remove_tree(&child);
        }
        self.items.remove(id);
    }

    fn to_json(&self, item: &FakeItem) -> Value {
        let mut value = json!({
            "id": item.id,
            "name": item.name,
            "lastModifiedDateTime": MODIFIED,
            "webUrl": format!("https://contoso.sharepoint.com/Shared%20Documents/{}", self.path_of(item)),
            "eTag": format!("\"{{{}}}\",1", item.id),
        });

        if item.folder {
            value["folder"] = json!({ "childCount": self.children(&item.id).len() });
            value["size"] = json!(0);
        } else {
            value["file"] = match &item.mime_type {
                Some(mime) => json!({ "mimeType": mime }),
                None => json!({}),
            };
            value["size"] = json!(item.content.len());
        }

        if let Some(parent) = &item.parent {
            value["parentReference"] = json!({ "id": parent, "driveId": "test-drive" });
        }

        value
    }
}

/// Fake Graph service shared between the test and the adapter under test
#[derive(Clone)]
pub struct FakeGraph {
    state: Arc<Mutex<FakeState>>,
}

impl FakeGraph {
    pub fn new() -> Self {
        let mut state = FakeState::default();
        state.items.insert(
            ROOT_ID.to_string(),
            FakeItem {
                id: ROOT_ID.to_string(),
                name: "root".to_string(),
                parent: None,
                folder: true,
                content: Bytes::new(),
                mime_type: None,
            },
        );

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Reject every mutating request with 403 from now on
    pub fn set_read_only(&self, read_only: bool) {
        self.state.lock().unwrap().mutation_budget = read_only.then_some(0);
    }

    /// Let `allowed` more mutating requests through, then reject the rest
    pub fn deny_mutations_after(&self, allowed: usize) {
        self.state.lock().unwrap().mutation_budget = Some(allowed);
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn requests(&self) -> Vec<(HttpMethod, String)> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Number of items (files and folders) named `name` directly under `dir`
    pub fn count_named(&self, dir: &str, name: &str) -> usize {
        let state = self.state.lock().unwrap();
        let segments = split(dir);
        match state.resolve(&segments) {
            Some(parent) => state
                .children(&parent.id)
                .iter()
                .filter(|child| child.name == name)
                .count(),
            None => 0,
        }
    }

    fn handle(&self, request: HttpRequest) -> HttpResponse {
        let mut state = self.state.lock().unwrap();
        state.requests.push((request.method, request.url.clone()));

        if request.url == format!("{}/{}/oauth2/v2.0/token", AUTHORITY, TENANT) {
            return token_response(&request);
        }

        let graph_root = format!("{}/{}/", GRAPH_BASE, PREFIX);
        let Some(resource) = request.url.strip_prefix(&graph_root).map(str::to_string) else {
            return error(400, "invalidRequest", "Unknown endpoint");
        };

        let expected_auth = format!("Bearer {}", ACCESS_TOKEN);
        if request.headers.get("Authorization") != Some(&expected_auth) {
            return error(401, "InvalidAuthenticationToken", "Access token is empty.");
        }

        if request.method != HttpMethod::Get {
            match state.mutation_budget {
                Some(0) => return error(403, "accessDenied", "Access denied"),
                Some(remaining) => state.mutation_budget = Some(remaining - 1),
                None => {}
            }
        }

        route(&mut state, &request, &resource)
    }
}

#[async_trait]
impl HttpClient for FakeGraph {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        Ok(self.handle(request))
    }
}

fn split(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            urlencoding::decode(s)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| s.to_string())
        })
        .collect()
}

fn respond(status: u16, body: Value) -> HttpResponse {
    HttpResponse::new(status, body.to_string())
}

fn error(status: u16, code: &str, message: &str) -> HttpResponse {
    respond(status, json!({ "error": { "code": code, "message": message } }))
}

fn not_found() -> HttpResponse {
    error(404, "itemNotFound", "The resource could not be found.")
}

fn token_response(request: &HttpRequest) -> HttpResponse {
    let body = request
        .body
        .as_ref()
        .map(|b| String::from_utf8_lossy(b).to_string())
        .unwrap_or_default();

    if body.contains("grant_type=client_credentials") && body.contains("client_secret=good-secret") {
        respond(
            200,
            json!({ "token_type": "Bearer", "expires_in": 3599, "access_token": ACCESS_TOKEN }),
        )
    } else {
        respond(
            401,
            json!({ "error": "invalid_client", "error_description": "AADSTS7000215: Invalid client secret provided." }),
        )
    }
}

fn route(state: &mut FakeState, request: &HttpRequest, resource: &str) -> HttpResponse {
    let method = request.method;

    if resource == "root" {
        return match (method, state.items.get(ROOT_ID)) {
            (HttpMethod::Get, Some(root)) => respond(200, state.to_json(root)),
            _ => error(405, "invalidRequest", "Method not allowed"),
        };
    }

    if resource == "root/children" {
        return match method {
            HttpMethod::Get => list(state, ROOT_ID),
            HttpMethod::Post => create_folder(state, ROOT_ID, request),
            _ => error(405, "invalidRequest", "Method not allowed"),
        };
    }

    if let Some(rest) = resource.strip_prefix("root:/") {
        if let Some(path) = rest.strip_suffix(":/children") {
            return match state.resolve(&split(path)).map(|item| item.id.clone()) {
                Some(id) if method == HttpMethod::Get => list(state, &id),
                Some(_) => error(405, "invalidRequest", "Method not allowed"),
                None => not_found(),
            };
        }

        if let Some(path) = rest.strip_suffix(":/content") {
            return match method {
                HttpMethod::Put => upload(state, &split(path), request),
                _ => error(405, "invalidRequest", "Method not allowed"),
            };
        }

        return match state.resolve(&split(rest)) {
            Some(item) if method == HttpMethod::Get => respond(200, state.to_json(item)),
            Some(_) => error(405, "invalidRequest", "Method not allowed"),
            None => not_found(),
        };
    }

    if let Some(rest) = resource.strip_prefix("items/") {
        let (id, tail) = match rest.split_once('/') {
            Some((id, tail)) => (id.to_string(), Some(tail)),
            None => (rest.to_string(), None),
        };

        if !state.items.contains_key(&id) {
            return not_found();
        }

        return match (method, tail) {
            (HttpMethod::Get, Some("content")) => {
                let content = state.items[&id].content.clone();
                HttpResponse::new(200, content)
            }
            (HttpMethod::Post, Some("children")) => create_folder(state, &id, request),
            (HttpMethod::Get, None) => respond(200, state.to_json(&state.items[&id])),
            (HttpMethod::Patch, None) => patch(state, &id, request),
            (HttpMethod::Delete, None) => {
                state.remove_tree(&id);
                HttpResponse::new(204, Bytes::new())
            }
            _ => error(405, "invalidRequest", "Method not allowed"),
        };
    }

    error(400, "invalidRequest", "Unknown resource")
}

fn list(state: &FakeState, parent_id: &str) -> HttpResponse {
    let value: Vec<Value> = state
        .children(parent_id)
        .into_iter()
        .map(|item| state.to_json(item))
        .collect();
    respond(200, json!({ "value": value }))
}

fn request_json(request: &HttpRequest) -> Option<Value> {
    request
        .body
        .as_ref()
        .and_then(|body| serde_json::from_slice(body).ok())
}

fn create_folder(state: &mut FakeState, parent_id: &str, request: &HttpRequest) -> HttpResponse {
    let Some(body) = request_json(request) else {
        return error(400, "invalidRequest", "Body must be JSON");
    };
    let name = body["name"].as_str().unwrap_or_default().to_string();
    if name.is_empty() || body.get("folder").is_none() {
        return error(400, "invalidRequest", "Folder name and facet are required");
    }

    let existing = state.child_named(parent_id, &name).map(|item| item.id.clone());
    match existing {
        Some(id) if body["@microsoft.graph.conflictBehavior"] == "replace" => {
            respond(200, state.to_json(&state.items[&id]))
        }
        Some(_) => error(409, "nameAlreadyExists", "An item with this name already exists"),
        None => {
            let id = state.insert(parent_id, &name, true);
            respond(201, state.to_json(&state.items[&id]))
        }
    }
}

fn upload(state: &mut FakeState, segments: &[String], request: &HttpRequest) -> HttpResponse {
    let Some((name, dirs)) = segments.split_last() else {
        return error(400, "invalidRequest", "Path required");
    };

    let mut parent_id = ROOT_ID.to_string();
    for dir in dirs {
        parent_id = match state.child_named(&parent_id, dir).map(|item| item.id.clone()) {
            Some(id) => id,
            None => state.insert(&parent_id, dir, true),
        };
    }

    let (id, status) = match state.child_named(&parent_id, name).map(|item| item.id.clone()) {
        Some(id) => (id, 200),
        None => (state.insert(&parent_id, name, false), 201),
    };

    if let Some(item) = state.items.get_mut(&id) {
        item.content = request.body.clone().unwrap_or_default();
        item.mime_type = request.headers.get("Content-Type").cloned();
    }

    respond(status, state.to_json(&state.items[&id]))
}

fn patch(state: &mut FakeState, id: &str, request: &HttpRequest) -> HttpResponse {
    let Some(body) = request_json(request) else {
        return error(400, "invalidRequest", "Body must be JSON");
    };

    let parent_id = match body["parentReference"]["id"].as_str() {
        Some(parent) if !state.items.contains_key(parent) => return not_found(),
        Some(parent) => parent.to_string(),
        None => state.items[id].parent.clone().unwrap_or_else(|| ROOT_ID.to_string()),
    };
    let name = body["name"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| state.items[id].name.clone());

    if let Some(item) = state.items.get_mut(id) {
        item.name = name;
        item.parent = Some(parent_id);
    }

    respond(200, state.to_json(&state.items[id]))
}
