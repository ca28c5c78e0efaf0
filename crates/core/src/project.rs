//! Department project boards.
//!
//! Status is a grouping label, not a guarded workflow: any status may be set
//! from any other. The board shows three lanes; cancelled projects are kept
//! aside in an archive list.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::client::{find_client, Client};
use crate::department::Department;
use crate::error::CoreError;
use crate::types::{new_id, optional_day, Day, EntityId, Timestamp};
use crate::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "nao_iniciado")]
    NotStarted,
    #[serde(rename = "em_andamento")]
    InProgress,
    #[serde(rename = "concluido")]
    Done,
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [Self::NotStarted, Self::InProgress, Self::Done, Self::Cancelled];

    /// Badge text shown on a project card.
    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Pendente",
            Self::InProgress => "Em Andamento",
            Self::Done => "Concluído",
            Self::Cancelled => "Cancelado",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Baixa")]
    Low,
    #[default]
    #[serde(rename = "Média")]
    Medium,
    #[serde(rename = "Alta")]
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectComment {
    pub id: EntityId,
    pub text: String,
    pub author_id: EntityId,
    /// Username at the time the comment was written.
    pub author_name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub client_id: EntityId,
    /// Client name copied at save time. Goes stale if the client is renamed.
    #[serde(default)]
    pub client_name: String,
    /// Client domain copied at save time.
    #[serde(default)]
    pub domain: String,
    pub status: ProjectStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub responsible_id: EntityId,
    #[serde(default, with = "optional_day", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Day>,
    #[serde(default)]
    pub progress: u8,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: Timestamp,
    #[serde(default)]
    pub comments: Vec<ProjectComment>,
    pub department: Department,
}

/// Editable project fields.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ProjectForm {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub description: String,
    #[validate(length(min = 1, message = "a client must be selected"))]
    pub client_id: String,
    pub status: ProjectStatus,
    pub priority: Priority,
    /// Empty means "the user creating the project".
    pub responsible_id: String,
    pub end_date: Option<Day>,
}

impl ProjectForm {
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            client_id: project.client_id.clone(),
            status: project.status,
            priority: project.priority,
            responsible_id: project.responsible_id.clone(),
            end_date: project.end_date,
        }
    }
}

fn client_snapshot(clients: &[Client], client_id: &str) -> (String, String) {
    find_client(clients, client_id)
        .map(|c| (c.name.clone(), c.domain.clone()))
        .unwrap_or_default()
}

fn find_project_mut<'a>(projects: &'a mut [Project], id: &str) -> Result<&'a mut Project, CoreError> {
    projects
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| CoreError::not_found("project", id))
}

/// Prepend a new project with zero progress and no comments.
pub fn create_project<'a>(
    projects: &'a mut Vec<Project>,
    form: &ProjectForm,
    department: Department,
    clients: &[Client],
    current_user: &User,
) -> Result<&'a Project, CoreError> {
    form.validate()?;
    let (client_name, domain) = client_snapshot(clients, &form.client_id);
    let responsible_id = if form.responsible_id.is_empty() {
        current_user.id.clone()
    } else {
        form.responsible_id.clone()
    };

    projects.insert(
        0,
        Project {
            id: new_id(),
            title: form.title.clone(),
            description: form.description.clone(),
            client_id: form.client_id.clone(),
            client_name,
            domain,
            status: form.status,
            priority: form.priority,
            responsible_id,
            end_date: form.end_date,
            progress: 0,
            created_at: Utc::now(),
            comments: Vec::new(),
            department,
        },
    );
    Ok(&projects[0])
}

/// Re-apply the form and refresh the cached client name and domain.
pub fn update_project<'a>(
    projects: &'a mut [Project],
    id: &str,
    form: &ProjectForm,
    clients: &[Client],
) -> Result<&'a Project, CoreError> {
    form.validate()?;
    let project = find_project_mut(projects, id)?;
    let (client_name, domain) = client_snapshot(clients, &form.client_id);
    project.title = form.title.clone();
    project.description = form.description.clone();
    project.client_id = form.client_id.clone();
    project.client_name = client_name;
    project.domain = domain;
    project.status = form.status;
    project.priority = form.priority;
    project.responsible_id = form.responsible_id.clone();
    project.end_date = form.end_date;
    Ok(project)
}

/// Overwrite the status unconditionally.
pub fn update_status<'a>(
    projects: &'a mut [Project],
    id: &str,
    status: ProjectStatus,
) -> Result<&'a Project, CoreError> {
    let project = find_project_mut(projects, id)?;
    project.status = status;
    Ok(project)
}

pub fn set_progress<'a>(projects: &'a mut [Project], id: &str, progress: i64) -> Result<&'a Project, CoreError> {
    let project = find_project_mut(projects, id)?;
    project.progress = u8::try_from(progress.clamp(0, 100)).unwrap_or(100);
    Ok(project)
}

/// Append a comment authored by `author`. Blank text is rejected.
pub fn add_comment<'a>(
    projects: &'a mut [Project],
    id: &str,
    text: &str,
    author: &User,
) -> Result<&'a Project, CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation("comment text is required".into()));
    }
    let project = find_project_mut(projects, id)?;
    project.comments.push(ProjectComment {
        id: new_id(),
        text: text.to_string(),
        author_id: author.id.clone(),
        author_name: author.username.clone(),
        timestamp: Utc::now(),
    });
    Ok(project)
}

/// Username of the responsible user, blank when the id matches no one.
pub fn responsible_name<'a>(project: &Project, users: &'a [User]) -> &'a str {
    users
        .iter()
        .find(|u| u.id == project.responsible_id)
        .map(|u| u.username.as_str())
        .unwrap_or("")
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lane<'a> {
    pub status: ProjectStatus,
    pub title: &'static str,
    pub projects: Vec<&'a Project>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView<'a> {
    pub lanes: Vec<Lane<'a>>,
    pub archived: Vec<&'a Project>,
}

const LANES: [(ProjectStatus, &str); 3] = [
    (ProjectStatus::NotStarted, "Backlog"),
    (ProjectStatus::InProgress, "Em Execução"),
    (ProjectStatus::Done, "Concluídos"),
];

/// Group a department's projects into the three board lanes.
pub fn board(projects: &[Project], department: Department) -> BoardView<'_> {
    let in_department = || projects.iter().filter(move |p| p.department == department);

    let lanes = LANES
        .iter()
        .map(|&(status, title)| Lane {
            status,
            title,
            projects: in_department().filter(|p| p.status == status).collect(),
        })
        .collect();
    let archived = in_department()
        .filter(|p| p.status == ProjectStatus::Cancelled)
        .collect();

    BoardView { lanes, archived }
}
