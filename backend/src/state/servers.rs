//! Server registry
//!
//! User-managed list of remote service endpoints. The list is persisted
//! like the chat history and pushed to the backend's configuration API as
//! a map keyed by a slug of each server's name.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{error, info};

use super::persistence::{load_json, save_json, Storage};
use crate::chat::models::{generate_id, RecordId, ServerEndpoint};

/// Storage key of the server list
pub const SERVERS_KEY: &str = "mcpServers";

/// Errors raised by registry edits
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Name was blank
    #[error("Server name is required")]
    EmptyName,

    /// URL was blank
    #[error("Server URL is required")]
    EmptyUrl,

    /// No server has the given id
    #[error("Server not found: {0}")]
    NotFound(String),
}

/// Editable fields of a server endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerDraft {
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Endpoint URL
    pub url: String,
    /// Optional icon
    pub icon: Option<String>,
}

impl ServerDraft {
    /// Prefill a draft from an existing endpoint
    pub fn from_endpoint(server: &ServerEndpoint) -> Self {
        Self {
            name: server.name.clone(),
            description: server.description.clone(),
            url: server.url.clone(),
            icon: server.icon.clone(),
        }
    }

    fn validated(&self) -> Result<(String, String, String, Option<String>), RegistryError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        let url = self.url.trim();
        if url.is_empty() {
            return Err(RegistryError::EmptyUrl);
        }
        let icon = self
            .icon
            .as_deref()
            .map(str::trim)
            .filter(|icon| !icon.is_empty())
            .map(str::to_string);
        Ok((
            name.to_string(),
            self.description.trim().to_string(),
            url.to_string(),
            icon,
        ))
    }
}

/// Lowercase a name and turn each whitespace run into a hyphen
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Build the configuration document pushed to the backend
///
/// Servers whose names slugify identically overwrite each other; the last
/// one in the list wins.
pub fn sync_document(servers: &[ServerEndpoint]) -> Value {
    let mut map = Map::new();
    for server in servers {
        map.insert(
            slugify(&server.name),
            json!({
                "url": server.url,
                "name": server.name,
                "description": server.description,
            }),
        );
    }
    json!({ "mcpServers": Value::Object(map) })
}

/// Persisted list of server endpoints
pub struct ServerRegistry {
    storage: Arc<dyn Storage>,
    servers: Vec<ServerEndpoint>,
}

impl ServerRegistry {
    /// Create a registry and load whatever is persisted
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let mut registry = Self {
            storage,
            servers: Vec::new(),
        };
        registry.load();
        registry
    }

    /// Reload servers from storage; unreadable data yields an empty list
    pub fn load(&mut self) -> &[ServerEndpoint] {
        self.servers = match load_json::<Vec<ServerEndpoint>>(self.storage.as_ref(), SERVERS_KEY) {
            Ok(Some(servers)) => {
                info!(count = servers.len(), "Loaded server registry");
                servers
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                error!(error = %e, "Error loading server registry");
                Vec::new()
            }
        };
        &self.servers
    }

    /// Persist the current list; failures are logged only
    pub fn save(&self) {
        if let Err(e) = save_json(self.storage.as_ref(), SERVERS_KEY, &self.servers) {
            error!(error = %e, "Error saving server registry");
        }
    }

    /// All servers in insertion order
    pub fn servers(&self) -> &[ServerEndpoint] {
        &self.servers
    }

    /// Look up a server by id
    pub fn get(&self, id: &str) -> Option<&ServerEndpoint> {
        self.servers.iter().find(|server| server.id == id)
    }

    /// Add a server from a draft
    pub fn add(&mut self, draft: &ServerDraft) -> Result<ServerEndpoint, RegistryError> {
        let (name, description, url, icon) = draft.validated()?;
        let server = ServerEndpoint {
            id: self.unused_id(),
            name,
            description,
            url,
            icon,
        };
        info!(server_id = %server.id, name = %server.name, "Server added");
        self.servers.push(server.clone());
        self.save();
        Ok(server)
    }

    /// Replace the editable fields of an existing server
    pub fn update(&mut self, id: &str, draft: &ServerDraft) -> Result<(), RegistryError> {
        let (name, description, url, icon) = draft.validated()?;
        let server = self
            .servers
            .iter_mut()
            .find(|server| server.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        server.name = name;
        server.description = description;
        server.url = url;
        server.icon = icon;
        info!(server_id = %id, "Server updated");
        self.save();
        Ok(())
    }

    /// Delete a server; returns whether it existed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.servers.len();
        self.servers.retain(|server| server.id != id);
        let removed = self.servers.len() != before;
        if removed {
            info!(server_id = %id, "Server removed");
            self.save();
        }
        removed
    }

    /// Configuration document for the current list
    pub fn sync_document(&self) -> Value {
        sync_document(&self.servers)
    }

    fn unused_id(&self) -> RecordId {
        loop {
            let id = generate_id();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}
