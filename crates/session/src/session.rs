//! The top-level session: domain store, current user and sync status.
//!
//! Every mutation goes through one method per operation. The method applies
//! the domain rule to the in-memory store and, when it succeeded, fires a
//! save of the whole affected collection without awaiting it. Rejected
//! operations leave the store untouched and save nothing.

use std::sync::Arc;

use chrono::Utc;
use cliqa_core::access::{self, NavSection, View};
use cliqa_core::activity::{self, Activity, ActivityCategory, ActivityEdit, ActivityForm, ActivityType, DeleteConfirmation};
use cliqa_core::checklist::{self, ChecklistDefinition, ChecklistDraft, ChecklistRecord};
use cliqa_core::client::{self, Client, ClientForm};
use cliqa_core::dashboard::{self, DashboardSnapshot};
use cliqa_core::department::Department;
use cliqa_core::error::CoreError;
use cliqa_core::project::{self, Project, ProjectForm, ProjectStatus};
use cliqa_core::settings::SystemConfig;
use cliqa_core::store::{DomainStore, StorageKey};
use cliqa_core::types::{today, EntityId};
use cliqa_core::user::{self, User, UserForm};
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::bridge::PersistenceBridge;
use crate::error::SessionError;
use crate::slot::FileSessionSlot;
use crate::sync::{SyncStatus, SyncTracker};

pub struct Session {
    bridge: Arc<dyn PersistenceBridge>,
    slot: FileSessionSlot,
    store: DomainStore,
    current_user: Option<User>,
    active_tab: String,
    sync: SyncTracker,
}

impl Session {
    /// An empty, not yet loaded session. Status starts `offline` until the
    /// first successful [`load`](Self::load). Saves run on the current Tokio
    /// runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime. Use
    /// [`with_runtime`](Self::with_runtime) to pass a handle explicitly.
    pub fn new(bridge: Arc<dyn PersistenceBridge>, slot: FileSessionSlot) -> Self {
        Self::with_runtime(bridge, slot, Handle::current())
    }

    /// Like [`new`](Self::new), spawning saves onto `runtime`.
    pub fn with_runtime(
        bridge: Arc<dyn PersistenceBridge>,
        slot: FileSessionSlot,
        runtime: Handle,
    ) -> Self {
        Self {
            bridge,
            slot,
            store: DomainStore::default(),
            current_user: None,
            active_tab: access::TAB_DASHBOARD.to_string(),
            sync: SyncTracker::new(SyncStatus::Offline, runtime),
        }
    }

    /// Create a session and load it. On failure the caller may build a new
    /// one or call [`load`](Self::load) again on an existing session.
    pub async fn start(
        bridge: Arc<dyn PersistenceBridge>,
        slot: FileSessionSlot,
    ) -> Result<Self, SessionError> {
        let mut session = Self::new(bridge, slot);
        session.load().await?;
        Ok(session)
    }

    /// Replace the store with everything the bridge holds and restore the
    /// user from the session slot.
    pub async fn load(&mut self) -> Result<(), SessionError> {
        self.sync.set(SyncStatus::Syncing);
        match self.fetch().await {
            Ok(()) => {
                self.sync.set(SyncStatus::Online);
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "Initial load failed");
                self.sync.set(SyncStatus::Offline);
                Err(err)
            }
        }
    }

    async fn fetch(&mut self) -> Result<(), SessionError> {
        let blobs = self.bridge.load_all().await?;
        let loaded = DomainStore::from_blobs(&blobs)
            .map_err(|e| SessionError::Malformed(e.to_string()))?;
        self.store = loaded.store;
        tracing::info!(
            clients = self.store.clients.len(),
            projects = self.store.projects.len(),
            users = self.store.users.len(),
            "Store loaded"
        );

        if loaded.seeded_admin {
            tracing::info!("No users stored, seeding default admin");
            self.persist(StorageKey::Users)?;
        }

        self.current_user = self.slot.restore().await?;
        self.active_tab = match &self.current_user {
            Some(user) => access::initial_tab(user).to_string(),
            None => access::TAB_DASHBOARD.to_string(),
        };
        Ok(())
    }

    // ---- accessors ----

    pub fn store(&self) -> &DomainStore {
        &self.store
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn active_tab(&self) -> &str {
        &self.active_tab
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.sync.status()
    }

    pub fn subscribe_sync(&self) -> watch::Receiver<SyncStatus> {
        self.sync.subscribe()
    }

    /// Wait for every save fired so far to complete.
    pub async fn flush(&self) {
        self.sync.flush().await;
    }

    // ---- authentication and navigation ----

    pub async fn login(&mut self, username: &str, password: &str) -> Result<&User, SessionError> {
        let user = match user::authenticate(&self.store.users, username, password) {
            Ok(user) => user.clone(),
            Err(err) => {
                tracing::warn!(username, "Login rejected");
                return Err(err.into());
            }
        };
        self.slot.store(&user).await?;
        tracing::info!(user_id = %user.id, "Logged in");
        self.active_tab = access::initial_tab(&user).to_string();
        Ok(self.current_user.insert(user))
    }

    /// Clear the slot and reload everything from the bridge.
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        self.slot.clear().await?;
        if let Some(user) = self.current_user.take() {
            tracing::info!(user_id = %user.id, "Logged out");
        }
        self.flush().await;
        self.load().await
    }

    pub fn navigation(&self) -> Result<Vec<NavSection>, SessionError> {
        let user = self.require_user()?;
        Ok(access::navigation(user, &self.store.config))
    }

    /// Switch to `tab_id` when the current user may see it.
    pub fn select_tab(&mut self, tab_id: &str) -> Result<View, SessionError> {
        let user = self.require_user()?;
        if !access::can_access(user, tab_id) {
            return Err(CoreError::Forbidden(format!("tab {tab_id} is not allowed")).into());
        }
        self.active_tab = tab_id.to_string();
        Ok(access::resolve_view(tab_id))
    }

    pub fn dashboard(&self) -> DashboardSnapshot<'_> {
        dashboard::snapshot(&self.store, Utc::now())
    }

    fn require_user(&self) -> Result<&User, SessionError> {
        self.current_user.as_ref().ok_or(SessionError::NotLoggedIn)
    }

    // ---- persistence ----

    /// Fire a save of the collection stored under `key`.
    fn persist(&self, key: StorageKey) -> Result<(), SessionError> {
        let data = self.store.blob(key)?;
        self.sync.dispatch(Arc::clone(&self.bridge), key, data);
        Ok(())
    }

    /// Persist `key` when the domain operation succeeded.
    fn commit<T>(&self, key: StorageKey, outcome: Result<T, CoreError>) -> Result<T, SessionError> {
        match outcome {
            Ok(value) => {
                self.persist(key)?;
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(key = %key, error = %err, "Mutation rejected");
                Err(err.into())
            }
        }
    }

    // ---- clients ----

    pub fn create_client(&mut self, form: &ClientForm) -> Result<Client, SessionError> {
        let outcome = client::create_client(&mut self.store.clients, form).cloned();
        self.commit(StorageKey::Clients, outcome)
    }

    pub fn update_client(&mut self, id: &str, form: &ClientForm) -> Result<Client, SessionError> {
        let outcome = client::update_client(&mut self.store.clients, id, form).cloned();
        self.commit(StorageKey::Clients, outcome)
    }

    pub fn delete_client(&mut self, id: &str) -> Result<(), SessionError> {
        let outcome = client::delete_client(&mut self.store.clients, id);
        self.commit(StorageKey::Clients, outcome)
    }

    // ---- checklist ----

    /// Start or resume today's checklist for `client_id`.
    pub fn select_checklist_client(&self, client_id: &str) -> Result<ChecklistDraft, SessionError> {
        Ok(ChecklistDraft::select_client(
            client_id,
            today(),
            &self.store.checklists,
            &self.store.checklist_definitions,
        )?)
    }

    pub fn save_checklist(&mut self, draft: &ChecklistDraft) -> Result<ChecklistRecord, SessionError> {
        let outcome = if draft.client_id.is_empty() {
            Err(CoreError::Validation("a client must be selected".into()))
        } else {
            Ok(draft.save(&mut self.store.checklists).clone())
        };
        self.commit(StorageKey::Checklists, outcome)
    }

    pub fn add_checklist_definition(
        &mut self,
        label: &str,
        has_quantity: bool,
    ) -> Result<ChecklistDefinition, SessionError> {
        let outcome =
            checklist::add_definition(&mut self.store.checklist_definitions, label, has_quantity).cloned();
        self.commit(StorageKey::ChecklistDefinitions, outcome)
    }

    pub fn remove_checklist_definition(&mut self, id: &str) -> Result<(), SessionError> {
        let outcome = checklist::remove_definition(&mut self.store.checklist_definitions, id);
        self.commit(StorageKey::ChecklistDefinitions, outcome)
    }

    /// Returns the new `is_hidden` value.
    pub fn toggle_checklist_definition(&mut self, id: &str) -> Result<bool, SessionError> {
        let outcome = checklist::toggle_hidden(&mut self.store.checklist_definitions, id);
        self.commit(StorageKey::ChecklistDefinitions, outcome)
    }

    // ---- activities ----

    pub fn record_activity(
        &mut self,
        client_id: &str,
        department: Department,
        kind: ActivityType,
        category: ActivityCategory,
        quantity: i64,
        detail: Option<&str>,
    ) -> Result<Activity, SessionError> {
        let outcome = activity::record(
            &mut self.store.activities,
            client_id,
            department,
            kind,
            category,
            quantity,
            detail,
        )
        .cloned();
        self.commit(StorageKey::Activities, outcome)
    }

    /// Submit the form as a new activity or as the edit it holds.
    pub fn submit_activity_form(&mut self, form: &mut ActivityForm) -> Result<EntityId, SessionError> {
        let outcome = form.submit(&mut self.store.activities);
        self.commit(StorageKey::Activities, outcome)
    }

    pub fn edit_activity(&mut self, id: &str, edit: &ActivityEdit) -> Result<Activity, SessionError> {
        let outcome = activity::edit_activity(&mut self.store.activities, id, edit).cloned();
        self.commit(StorageKey::Activities, outcome)
    }

    /// Returns whether an activity was removed. A declined confirmation
    /// removes and saves nothing.
    pub fn delete_activity(
        &mut self,
        id: &str,
        confirmation: DeleteConfirmation,
    ) -> Result<bool, SessionError> {
        match activity::delete_activity(&mut self.store.activities, id, confirmation) {
            Ok(false) => Ok(false),
            outcome => self.commit(StorageKey::Activities, outcome),
        }
    }

    // ---- projects ----

    pub fn create_project(
        &mut self,
        form: &ProjectForm,
        department: Department,
    ) -> Result<Project, SessionError> {
        let current = self.require_user()?.clone();
        let outcome = project::create_project(
            &mut self.store.projects,
            form,
            department,
            &self.store.clients,
            &current,
        )
        .cloned();
        self.commit(StorageKey::Projects, outcome)
    }

    pub fn update_project(&mut self, id: &str, form: &ProjectForm) -> Result<Project, SessionError> {
        let outcome =
            project::update_project(&mut self.store.projects, id, form, &self.store.clients).cloned();
        self.commit(StorageKey::Projects, outcome)
    }

    pub fn update_project_status(
        &mut self,
        id: &str,
        status: ProjectStatus,
    ) -> Result<Project, SessionError> {
        let outcome = project::update_status(&mut self.store.projects, id, status).cloned();
        self.commit(StorageKey::Projects, outcome)
    }

    pub fn set_project_progress(&mut self, id: &str, progress: i64) -> Result<Project, SessionError> {
        let outcome = project::set_progress(&mut self.store.projects, id, progress).cloned();
        self.commit(StorageKey::Projects, outcome)
    }

    /// Comment on a project as the current user.
    pub fn add_project_comment(&mut self, id: &str, text: &str) -> Result<Project, SessionError> {
        let author = self.require_user()?.clone();
        let outcome = project::add_comment(&mut self.store.projects, id, text, &author).cloned();
        self.commit(StorageKey::Projects, outcome)
    }

    // ---- users and settings ----

    pub fn create_user(&mut self, form: &UserForm) -> Result<User, SessionError> {
        let outcome = user::create_user(&mut self.store.users, form).cloned();
        self.commit(StorageKey::Users, outcome)
    }

    pub fn update_user(&mut self, id: &str, form: &UserForm) -> Result<User, SessionError> {
        let outcome = user::update_user(&mut self.store.users, id, form).cloned();
        self.commit(StorageKey::Users, outcome)
    }

    pub fn delete_user(&mut self, id: &str) -> Result<(), SessionError> {
        let current_id = self.require_user()?.id.clone();
        let outcome = user::delete_user(&mut self.store.users, id, &current_id);
        self.commit(StorageKey::Users, outcome)
    }

    pub fn update_config(&mut self, config: SystemConfig) -> Result<(), SessionError> {
        self.store.config = config;
        self.persist(StorageKey::Config)
    }

    pub fn update_admin_credentials(&mut self, username: &str, password: &str) -> Result<(), SessionError> {
        let outcome = user::update_admin_credentials(&mut self.store.users, username, password);
        self.commit(StorageKey::Users, outcome)
    }
}
