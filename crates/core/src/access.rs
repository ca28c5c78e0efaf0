//! Tab registry and role-based visibility.
//!
//! Every user carries a set of capability tags (tab ids). Admins hold the
//! wildcard capability and see every registered tab regardless of their
//! stored list. Staff see exactly their stored list, unvalidated.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::department::Department;
use crate::settings::SystemConfig;
use crate::user::User;

pub const TAB_DASHBOARD: &str = "dashboard";
pub const TAB_CLIENTS: &str = "clients";
pub const TAB_WEB_PROJECTS: &str = "web-projects";
pub const TAB_WEB_ACTIVITIES: &str = "web-activities";
pub const TAB_WEB_CHECKLIST: &str = "web-checklist";
pub const TAB_SOCIAL_PROJECTS: &str = "social-projects";
pub const TAB_SOCIAL_ACTIVITIES: &str = "social-activities";
pub const TAB_USERS: &str = "users";
pub const TAB_SETTINGS: &str = "settings";

/// Label of the general menu section.
pub const GENERAL_SECTION_LABEL: &str = "GERAL";
/// Label of the admin menu section.
pub const ADMIN_SECTION_LABEL: &str = "ADMIN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    General,
    Department(Department),
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tab {
    pub id: &'static str,
    pub label: &'static str,
    pub section: Section,
}

/// Every tab known to the system, in menu order.
pub const TABS: &[Tab] = &[
    Tab { id: TAB_DASHBOARD, label: "Dashboard", section: Section::General },
    Tab { id: TAB_CLIENTS, label: "Clientes", section: Section::General },
    Tab { id: TAB_WEB_PROJECTS, label: "Projetos", section: Section::Department(Department::Web) },
    Tab { id: TAB_WEB_ACTIVITIES, label: "Atividades", section: Section::Department(Department::Web) },
    Tab { id: TAB_WEB_CHECKLIST, label: "Checklist", section: Section::Department(Department::Web) },
    Tab { id: TAB_SOCIAL_PROJECTS, label: "Projetos", section: Section::Department(Department::Social) },
    Tab { id: TAB_SOCIAL_ACTIVITIES, label: "Atividades", section: Section::Department(Department::Social) },
    Tab { id: TAB_USERS, label: "Usuários", section: Section::Admin },
    Tab { id: TAB_SETTINGS, label: "Configurações", section: Section::Admin },
];

pub fn all_tab_ids() -> impl Iterator<Item = &'static str> {
    TABS.iter().map(|t| t.id)
}

pub fn find_tab(id: &str) -> Option<&'static Tab> {
    TABS.iter().find(|t| t.id == id)
}

/// What a user is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capabilities {
    /// Every tab, present and future.
    All,
    /// Exactly these tab ids, taken verbatim from the user record.
    Tags(BTreeSet<String>),
}

impl Capabilities {
    pub fn for_user(user: &User) -> Self {
        if user.is_admin() {
            Capabilities::All
        } else {
            Capabilities::Tags(user.allowed_tabs.iter().cloned().collect())
        }
    }

    pub fn allows(&self, tab_id: &str) -> bool {
        match self {
            Capabilities::All => true,
            Capabilities::Tags(tags) => tags.contains(tab_id),
        }
    }
}

/// Tab ids visible to `user`. Unknown ids in a staff list are kept.
pub fn visible_tabs(user: &User) -> BTreeSet<String> {
    match Capabilities::for_user(user) {
        Capabilities::All => all_tab_ids().map(str::to_string).collect(),
        Capabilities::Tags(tags) => tags,
    }
}

pub fn can_access(user: &User, tab_id: &str) -> bool {
    Capabilities::for_user(user).allows(tab_id)
}

/// Tab shown right after login or session restore.
pub fn initial_tab(user: &User) -> &str {
    if user.is_admin() {
        return TAB_DASHBOARD;
    }
    user.allowed_tabs
        .first()
        .map(String::as_str)
        .unwrap_or(TAB_DASHBOARD)
}

/// One rendered menu group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavSection {
    pub section: Section,
    pub label: String,
    pub tabs: Vec<&'static Tab>,
}

/// Menu sections in registry order, holding only tabs the user may see.
/// Sections left empty are omitted.
pub fn navigation(user: &User, config: &SystemConfig) -> Vec<NavSection> {
    let caps = Capabilities::for_user(user);
    let mut sections: Vec<NavSection> = Vec::new();

    for tab in TABS.iter().filter(|t| caps.allows(t.id)) {
        match sections.iter_mut().find(|s| s.section == tab.section) {
            Some(existing) => existing.tabs.push(tab),
            None => sections.push(NavSection {
                section: tab.section,
                label: section_label(tab.section, config).to_string(),
                tabs: vec![tab],
            }),
        }
    }

    sections
}

fn section_label(section: Section, config: &SystemConfig) -> &str {
    match section {
        Section::General => GENERAL_SECTION_LABEL,
        Section::Department(dept) => config.department_label(dept),
        Section::Admin => ADMIN_SECTION_LABEL,
    }
}

/// The view a tab id renders. Unknown ids fall back to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Clients,
    Projects(Department),
    Activities(Department),
    Checklist,
    Users,
    Settings,
}

pub fn resolve_view(tab_id: &str) -> View {
    match tab_id {
        TAB_CLIENTS => View::Clients,
        TAB_WEB_CHECKLIST => View::Checklist,
        TAB_USERS => View::Users,
        TAB_SETTINGS => View::Settings,
        id if id.ends_with("-projects") => match Department::from_tab_id(id) {
            Some(dept) => View::Projects(dept),
            None => View::Dashboard,
        },
        id if id.ends_with("-activities") => match Department::from_tab_id(id) {
            Some(dept) => View::Activities(dept),
            None => View::Dashboard,
        },
        _ => View::Dashboard,
    }
}
