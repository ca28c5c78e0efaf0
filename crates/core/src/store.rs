//! The in-memory domain store and its mapping to storage blobs.
//!
//! Every collection is persisted as one independent JSON blob under a fixed
//! key and replaced wholesale on each save.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::activity::Activity;
use crate::checklist::{ChecklistDefinition, ChecklistRecord};
use crate::client::Client;
use crate::project::Project;
use crate::settings::SystemConfig;
use crate::user::{default_admin, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    Config,
    Clients,
    Activities,
    Checklists,
    ChecklistDefinitions,
    Projects,
    Users,
}

impl StorageKey {
    pub const ALL: [StorageKey; 7] = [
        Self::Config,
        Self::Clients,
        Self::Activities,
        Self::Checklists,
        Self::ChecklistDefinitions,
        Self::Projects,
        Self::Users,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Config => "cliqa_config",
            Self::Clients => "cliqa_clients",
            Self::Activities => "cliqa_activities",
            Self::Checklists => "cliqa_checklists",
            Self::ChecklistDefinitions => "cliqa_checklist_defs",
            Self::Projects => "cliqa_projects",
            Self::Users => "cliqa_users",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored blob that does not match its collection's shape.
#[derive(Debug, thiserror::Error)]
#[error("Malformed blob {key}: {source}")]
pub struct BlobDecodeError {
    pub key: StorageKey,
    #[source]
    pub source: serde_json::Error,
}

/// All application state, owned by the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainStore {
    pub config: SystemConfig,
    pub clients: Vec<Client>,
    pub activities: Vec<Activity>,
    pub checklists: Vec<ChecklistRecord>,
    pub checklist_definitions: Vec<ChecklistDefinition>,
    pub projects: Vec<Project>,
    pub users: Vec<User>,
}

/// Result of hydrating a store from `load_all`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedStore {
    pub store: DomainStore,
    /// The users blob was absent and the default admin was created. The
    /// caller is expected to persist [`StorageKey::Users`] right away.
    pub seeded_admin: bool,
}

fn take<T: DeserializeOwned>(
    blobs: &Map<String, Value>,
    key: StorageKey,
) -> Result<Option<T>, BlobDecodeError> {
    match blobs.get(key.as_str()) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|source| BlobDecodeError { key, source }),
    }
}

impl DomainStore {
    /// Build the store from the key-to-blob map returned by the bridge.
    /// Missing or null blobs keep their defaults. Unknown keys are ignored.
    pub fn from_blobs(blobs: &Map<String, Value>) -> Result<LoadedStore, BlobDecodeError> {
        let mut store = DomainStore::default();

        if let Some(config) = take(blobs, StorageKey::Config)? {
            store.config = config;
        }
        if let Some(clients) = take(blobs, StorageKey::Clients)? {
            store.clients = clients;
        }
        if let Some(activities) = take(blobs, StorageKey::Activities)? {
            store.activities = activities;
        }
        if let Some(checklists) = take(blobs, StorageKey::Checklists)? {
            store.checklists = checklists;
        }
        if let Some(definitions) = take(blobs, StorageKey::ChecklistDefinitions)? {
            store.checklist_definitions = definitions;
        }
        if let Some(projects) = take(blobs, StorageKey::Projects)? {
            store.projects = projects;
        }

        let seeded_admin = match take(blobs, StorageKey::Users)? {
            Some(users) => {
                store.users = users;
                false
            }
            None => {
                store.users = vec![default_admin()];
                true
            }
        };

        Ok(LoadedStore { store, seeded_admin })
    }

    /// The current value of one collection, ready to be saved.
    pub fn blob(&self, key: StorageKey) -> Result<Value, serde_json::Error> {
        match key {
            StorageKey::Config => serde_json::to_value(&self.config),
            StorageKey::Clients => serde_json::to_value(&self.clients),
            StorageKey::Activities => serde_json::to_value(&self.activities),
            StorageKey::Checklists => serde_json::to_value(&self.checklists),
            StorageKey::ChecklistDefinitions => serde_json::to_value(&self.checklist_definitions),
            StorageKey::Projects => serde_json::to_value(&self.projects),
            StorageKey::Users => serde_json::to_value(&self.users),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::user::DEFAULT_ADMIN_ID;

    fn blobs(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn keys_round_trip_through_parse() {
        for key in StorageKey::ALL {
            assert_eq!(StorageKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(StorageKey::parse("cliqa_session"), None);
    }

    #[test]
    fn empty_load_seeds_admin_and_defaults() {
        let loaded = DomainStore::from_blobs(&Map::new()).unwrap();
        assert!(loaded.seeded_admin);
        assert_eq!(loaded.store.users.len(), 1);
        assert_eq!(loaded.store.users[0].id, DEFAULT_ADMIN_ID);
        assert_eq!(loaded.store.config, SystemConfig::default());
        assert!(loaded.store.clients.is_empty());
    }

    #[test]
    fn null_users_blob_also_seeds() {
        let loaded = DomainStore::from_blobs(&blobs(json!({"cliqa_users": null}))).unwrap();
        assert!(loaded.seeded_admin);
    }

    #[test]
    fn empty_users_list_is_kept() {
        let loaded = DomainStore::from_blobs(&blobs(json!({"cliqa_users": []}))).unwrap();
        assert!(!loaded.seeded_admin);
        assert!(loaded.store.users.is_empty());
    }

    #[test]
    fn stored_collections_are_loaded() {
        let loaded = DomainStore::from_blobs(&blobs(json!({
            "cliqa_clients": [{"id": "c1", "name": "Acme", "domain": "acme.com"}],
            "cliqa_checklist_defs": [{"id": "d1", "label": "SSL", "hasQuantity": false}],
            "cliqa_users": [{"id": "u1", "username": "ana", "password": "pw", "role": "staff", "allowedTabs": ["dashboard"]}],
            "unrelated": 42
        })))
        .unwrap();
        assert_eq!(loaded.store.clients[0].name, "Acme");
        assert!(!loaded.store.checklist_definitions[0].is_hidden);
        assert_eq!(loaded.store.users[0].username, "ana");
    }

    #[test]
    fn malformed_blob_names_its_key() {
        let err = DomainStore::from_blobs(&blobs(json!({"cliqa_projects": {"not": "a list"}}))).unwrap_err();
        assert_matches!(err.key, StorageKey::Projects);
        assert!(err.to_string().contains("cliqa_projects"));
    }

    #[test]
    fn blob_serializes_collection() {
        let loaded = DomainStore::from_blobs(&Map::new()).unwrap();
        let users = loaded.store.blob(StorageKey::Users).unwrap();
        assert_eq!(users[0]["username"], "admin");
        let clients = loaded.store.blob(StorageKey::Clients).unwrap();
        assert_eq!(clients, json!([]));
    }
}
