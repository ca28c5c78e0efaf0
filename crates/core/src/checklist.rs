//! Daily audit checklists.
//!
//! A library of [`ChecklistDefinition`]s is instantiated per client and
//! calendar day into a [`ChecklistDraft`]. Saving a draft always appends a new
//! [`ChecklistRecord`] to the newest-first history; reselecting the same
//! client on the same day resumes the latest saved record instead of starting
//! over. Items are snapshots: later edits to a definition never reach records
//! that were already saved.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::CoreError;
use crate::types::{new_id, Day, EntityId, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistDefinition {
    pub id: EntityId,
    pub label: String,
    #[serde(default)]
    pub has_quantity: bool,
    #[serde(default)]
    pub is_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    /// Id of the definition this item was instantiated from.
    pub id: EntityId,
    pub label: String,
    pub checked: bool,
    #[serde(default)]
    pub comment: String,
    /// `None` means "not applicable", which differs from an observed zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistRecord {
    pub id: EntityId,
    pub client_id: EntityId,
    pub date: Day,
    #[serde(default)]
    pub summary: String,
    pub items: Vec<ChecklistItem>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: Timestamp,
}

// ---------------------------------------------------------------------------
// Definition library
// ---------------------------------------------------------------------------

/// Append a definition. The label must not be blank.
pub fn add_definition<'a>(
    definitions: &'a mut Vec<ChecklistDefinition>,
    label: &str,
    has_quantity: bool,
) -> Result<&'a ChecklistDefinition, CoreError> {
    if label.trim().is_empty() {
        return Err(CoreError::Validation("checklist item label is required".into()));
    }
    definitions.push(ChecklistDefinition {
        id: new_id(),
        label: label.to_string(),
        has_quantity,
        is_hidden: false,
    });
    Ok(&definitions[definitions.len() - 1])
}

/// Remove a definition immediately. Saved records keep their copied items.
pub fn remove_definition(definitions: &mut Vec<ChecklistDefinition>, id: &str) -> Result<(), CoreError> {
    let before = definitions.len();
    definitions.retain(|d| d.id != id);
    if definitions.len() == before {
        return Err(CoreError::not_found("checklist definition", id));
    }
    Ok(())
}

/// Flip the hidden flag, returning the new value.
pub fn toggle_hidden(definitions: &mut [ChecklistDefinition], id: &str) -> Result<bool, CoreError> {
    let def = definitions
        .iter_mut()
        .find(|d| d.id == id)
        .ok_or_else(|| CoreError::not_found("checklist definition", id))?;
    def.is_hidden = !def.is_hidden;
    Ok(def.is_hidden)
}

/// Fresh items for every visible definition, unchecked and uncommented.
pub fn instantiate(definitions: &[ChecklistDefinition]) -> Vec<ChecklistItem> {
    definitions
        .iter()
        .filter(|d| !d.is_hidden)
        .map(|d| ChecklistItem {
            id: d.id.clone(),
            label: d.label.clone(),
            checked: false,
            comment: String::new(),
            quantity: d.has_quantity.then_some(0),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// History queries
// ---------------------------------------------------------------------------

/// The record that represents `client_id` on `day`.
///
/// When repeated saves left several records for the same pair, the one with
/// the greatest timestamp wins; equal timestamps resolve to the earliest in
/// list order (the most recently prepended).
pub fn find_record<'a>(
    history: &'a [ChecklistRecord],
    client_id: &str,
    day: Day,
) -> Option<&'a ChecklistRecord> {
    history
        .iter()
        .filter(|r| r.client_id == client_id && r.date == day)
        .fold(None, |best: Option<&ChecklistRecord>, r| match best {
            Some(b) if b.timestamp >= r.timestamp => Some(b),
            _ => Some(r),
        })
}

pub fn done_today(history: &[ChecklistRecord], client_id: &str, today: Day) -> bool {
    history
        .iter()
        .any(|r| r.client_id == client_id && r.date == today)
}

/// A client row of the site selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteStatus<'a> {
    pub client: &'a Client,
    pub is_done: bool,
}

/// Every client with its done-today flag, filtered by case-insensitive
/// name match.
pub fn site_status<'a>(
    clients: &'a [Client],
    history: &[ChecklistRecord],
    today: Day,
    filter: &str,
) -> Vec<SiteStatus<'a>> {
    let needle = filter.to_lowercase();
    clients
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle))
        .map(|client| SiteStatus {
            client,
            is_done: done_today(history, &client.id, today),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// The checklist currently being filled for one client on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistDraft {
    pub client_id: EntityId,
    pub date: Day,
    pub items: Vec<ChecklistItem>,
    pub summary: String,
}

impl ChecklistDraft {
    /// Resume today's saved record for the client, or instantiate the
    /// current definitions when there is none.
    pub fn select_client(
        client_id: &str,
        today: Day,
        history: &[ChecklistRecord],
        definitions: &[ChecklistDefinition],
    ) -> Result<Self, CoreError> {
        if client_id.is_empty() {
            return Err(CoreError::Validation("a client must be selected".into()));
        }
        let (items, summary) = match find_record(history, client_id, today) {
            Some(existing) => (existing.items.clone(), existing.summary.clone()),
            None => (instantiate(definitions), String::new()),
        };
        Ok(Self {
            client_id: client_id.to_string(),
            date: today,
            items,
            summary,
        })
    }

    /// Flip `checked` on the matching item. Returns whether one matched.
    pub fn toggle(&mut self, item_id: &str) -> bool {
        match self.items.iter_mut().find(|i| i.id == item_id) {
            Some(item) => {
                item.checked = !item.checked;
                true
            }
            None => false,
        }
    }

    /// Set the quantity of a quantity-bearing item, clamped at zero.
    /// Items without a quantity are left untouched.
    pub fn set_quantity(&mut self, item_id: &str, quantity: i64) -> bool {
        match self.items.iter_mut().find(|i| i.id == item_id) {
            Some(item) if item.quantity.is_some() => {
                item.quantity = Some(quantity.max(0).unsigned_abs());
                true
            }
            _ => false,
        }
    }

    pub fn set_comment(&mut self, item_id: &str, comment: &str) -> bool {
        match self.items.iter_mut().find(|i| i.id == item_id) {
            Some(item) => {
                item.comment = comment.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_summary(&mut self, summary: &str) {
        self.summary = summary.to_string();
    }

    /// Freeze the draft into a new record stamped now.
    pub fn to_record(&self) -> ChecklistRecord {
        ChecklistRecord {
            id: new_id(),
            client_id: self.client_id.clone(),
            date: self.date,
            summary: self.summary.clone(),
            items: self.items.clone(),
            timestamp: Utc::now(),
        }
    }

    /// Prepend a new record to `history`. Earlier same-day records stay.
    pub fn save<'a>(&self, history: &'a mut Vec<ChecklistRecord>) -> &'a ChecklistRecord {
        history.insert(0, self.to_record());
        &history[0]
    }
}
