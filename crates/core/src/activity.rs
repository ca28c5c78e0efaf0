//! Production activity log.
//!
//! Each department has its own type and category vocabulary. Quantities are
//! clamped to at least one on input rather than rejected, and the free-text
//! detail is stored only for the "other" category.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::department::Department;
use crate::error::CoreError;
use crate::types::{new_id, today, Day, EntityId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityType {
    #[serde(rename = "Alteração")]
    Change,
    #[serde(rename = "Inclusão")]
    Addition,
    #[serde(rename = "Exclusão")]
    Removal,
    #[serde(rename = "Desenvolvimento")]
    Development,
    #[serde(rename = "Ajuste")]
    Adjustment,
}

impl ActivityType {
    pub const WEB: &'static [ActivityType] = &[Self::Change, Self::Addition, Self::Removal];
    pub const SOCIAL: &'static [ActivityType] = &[Self::Development, Self::Adjustment];

    pub fn for_department(department: Department) -> &'static [ActivityType] {
        match department {
            Department::Web => Self::WEB,
            Department::Social => Self::SOCIAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityCategory {
    #[serde(rename = "Imagens")]
    Images,
    #[serde(rename = "Terapeutas")]
    Therapists,
    #[serde(rename = "Plugins")]
    Plugins,
    #[serde(rename = "Vídeo")]
    Video,
    #[serde(rename = "Banner")]
    Banner,
    #[serde(rename = "Post")]
    Post,
    #[serde(rename = "Reels")]
    Reels,
    #[serde(rename = "Outros")]
    Other,
}

impl ActivityCategory {
    pub const WEB: &'static [ActivityCategory] =
        &[Self::Images, Self::Therapists, Self::Plugins, Self::Video, Self::Other];
    pub const SOCIAL: &'static [ActivityCategory] = &[Self::Banner, Self::Post, Self::Reels, Self::Other];

    pub fn for_department(department: Department) -> &'static [ActivityCategory] {
        match department {
            Department::Web => Self::WEB,
            Department::Social => Self::SOCIAL,
        }
    }

    pub fn is_other(self) -> bool {
        self == Self::Other
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: EntityId,
    pub client_id: EntityId,
    pub date: Day,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub category: ActivityCategory,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_details: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: Timestamp,
    pub department: Department,
}

/// Outcome of the confirmation prompt shown before a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteConfirmation {
    Confirmed,
    Declined,
}

fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(1)).unwrap_or(u32::MAX)
}

fn detail_for(category: ActivityCategory, detail: Option<&str>) -> Option<String> {
    if category.is_other() {
        Some(detail.unwrap_or_default().to_string())
    } else {
        None
    }
}

/// Prepend a new activity dated today.
pub fn record<'a>(
    activities: &'a mut Vec<Activity>,
    client_id: &str,
    department: Department,
    kind: ActivityType,
    category: ActivityCategory,
    quantity: i64,
    detail: Option<&str>,
) -> Result<&'a Activity, CoreError> {
    if client_id.is_empty() {
        return Err(CoreError::Validation("a client must be selected".into()));
    }
    activities.insert(
        0,
        Activity {
            id: new_id(),
            client_id: client_id.to_string(),
            date: today(),
            kind,
            category,
            quantity: clamp_quantity(quantity),
            other_details: detail_for(category, detail),
            timestamp: Utc::now(),
            department,
        },
    );
    Ok(&activities[0])
}

/// Editable fields of an existing activity.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEdit {
    pub client_id: EntityId,
    pub kind: ActivityType,
    pub category: ActivityCategory,
    pub quantity: i64,
    pub other_details: Option<String>,
}

/// Replace the matching activity in place. Id, date, timestamp and
/// department are preserved.
pub fn edit_activity<'a>(
    activities: &'a mut [Activity],
    id: &str,
    edit: &ActivityEdit,
) -> Result<&'a Activity, CoreError> {
    if edit.client_id.is_empty() {
        return Err(CoreError::Validation("a client must be selected".into()));
    }
    let activity = activities
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or_else(|| CoreError::not_found("activity", id))?;
    activity.client_id = edit.client_id.clone();
    activity.kind = edit.kind;
    activity.category = edit.category;
    activity.quantity = clamp_quantity(edit.quantity);
    activity.other_details = detail_for(edit.category, edit.other_details.as_deref());
    Ok(activity)
}

/// Remove the matching activity once the user confirmed. Returns whether
/// anything was removed.
pub fn delete_activity(
    activities: &mut Vec<Activity>,
    id: &str,
    confirmation: DeleteConfirmation,
) -> Result<bool, CoreError> {
    if confirmation == DeleteConfirmation::Declined {
        return Ok(false);
    }
    let before = activities.len();
    activities.retain(|a| a.id != id);
    if activities.len() == before {
        return Err(CoreError::not_found("activity", id));
    }
    Ok(true)
}

pub fn list_for_department(activities: &[Activity], department: Department) -> Vec<&Activity> {
    activities
        .iter()
        .filter(|a| a.department == department)
        .collect()
}

// ---------------------------------------------------------------------------
// Entry form
// ---------------------------------------------------------------------------

/// The tracker bar above the activity list.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityForm {
    pub department: Department,
    pub client_id: String,
    pub kind: ActivityType,
    pub category: ActivityCategory,
    pub quantity: u32,
    pub other_details: String,
    /// Set while an existing activity is loaded for editing.
    pub editing: Option<EntityId>,
}

impl ActivityForm {
    pub fn new(department: Department) -> Self {
        Self {
            department,
            client_id: String::new(),
            kind: ActivityType::for_department(department)[0],
            category: ActivityCategory::for_department(department)[0],
            quantity: 1,
            other_details: String::new(),
            editing: None,
        }
    }

    /// Switch department, resetting type and category to the first entry of
    /// the new vocabularies.
    pub fn switch_department(&mut self, department: Department) {
        self.department = department;
        self.kind = ActivityType::for_department(department)[0];
        self.category = ActivityCategory::for_department(department)[0];
    }

    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = clamp_quantity(quantity);
    }

    pub fn adjust_quantity(&mut self, delta: i64) {
        self.set_quantity(i64::from(self.quantity) + delta);
    }

    pub fn load(&mut self, activity: &Activity) {
        self.editing = Some(activity.id.clone());
        self.client_id = activity.client_id.clone();
        self.kind = activity.kind;
        self.category = activity.category;
        self.quantity = activity.quantity;
        self.other_details = activity.other_details.clone().unwrap_or_default();
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.reset();
    }

    fn reset(&mut self) {
        self.client_id.clear();
        self.other_details.clear();
        self.quantity = 1;
    }

    /// Record a new activity or apply the loaded edit, then clear the form.
    /// Without a selected client nothing happens and the form is kept.
    pub fn submit(&mut self, activities: &mut Vec<Activity>) -> Result<EntityId, CoreError> {
        let id = match self.editing.clone() {
            Some(id) => {
                let edit = ActivityEdit {
                    client_id: self.client_id.clone(),
                    kind: self.kind,
                    category: self.category,
                    quantity: i64::from(self.quantity),
                    other_details: Some(self.other_details.clone()),
                };
                edit_activity(activities, &id, &edit)?.id.clone()
            }
            None => record(
                activities,
                &self.client_id,
                self.department,
                self.kind,
                self.category,
                i64::from(self.quantity),
                Some(&self.other_details),
            )?
            .id
            .clone(),
        };
        self.editing = None;
        self.reset();
        Ok(id)
    }
}
