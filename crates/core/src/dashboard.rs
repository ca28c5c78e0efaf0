//! Read-only dashboard aggregates, recomputed from the current store.

use serde::Serialize;

use crate::activity::Activity;
use crate::checklist::{done_today, ChecklistRecord, SiteStatus};
use crate::client::Client;
use crate::project::{Project, ProjectStatus};
use crate::store::DomainStore;
use crate::types::{Day, Timestamp};

/// Number of clients shown in the activity volume chart.
pub const TOP_CLIENTS_LIMIT: usize = 6;
/// Number of clients shown in the checklist-due panel.
pub const CHECKLIST_DUE_LIMIT: usize = 5;
/// Clients expiring within this many days (or already expired) are flagged.
pub const EXPIRING_WITHIN_DAYS: i64 = 30;

const CHART_LABEL_MAX: usize = 10;
const CHART_LABEL_KEEP: usize = 8;

/// Percentage of done projects, rounded half up. Zero without projects.
pub fn completion_rate(projects: &[Project]) -> u32 {
    if projects.is_empty() {
        return 0;
    }
    let done = projects.iter().filter(|p| p.status == ProjectStatus::Done).count();
    let rate = (100 * done as u64 * 2 + projects.len() as u64) / (2 * projects.len() as u64);
    rate as u32
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartEntry<'a> {
    pub client: &'a Client,
    pub label: String,
    pub value: u64,
}

/// Names longer than ten characters are cut to eight plus an ellipsis.
pub fn chart_label(name: &str) -> String {
    if name.chars().count() > CHART_LABEL_MAX {
        let head: String = name.chars().take(CHART_LABEL_KEEP).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

/// Clients ranked by total activity quantity, descending. Ties keep client
/// list order.
pub fn top_clients<'a>(clients: &'a [Client], activities: &[Activity]) -> Vec<ChartEntry<'a>> {
    let mut entries: Vec<ChartEntry<'a>> = clients
        .iter()
        .map(|client| ChartEntry {
            client,
            label: chart_label(&client.name),
            value: activities
                .iter()
                .filter(|a| a.client_id == client.id)
                .map(|a| u64::from(a.quantity))
                .sum(),
        })
        .collect();
    entries.sort_by(|a, b| b.value.cmp(&a.value));
    entries.truncate(TOP_CLIENTS_LIMIT);
    entries
}

/// The first clients in list order with their done-today flag.
pub fn checklist_due_today<'a>(
    clients: &'a [Client],
    history: &[ChecklistRecord],
    today: Day,
) -> Vec<SiteStatus<'a>> {
    clients
        .iter()
        .take(CHECKLIST_DUE_LIMIT)
        .map(|client| SiteStatus {
            client,
            is_done: done_today(history, &client.id, today),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpiringClient<'a> {
    pub client: &'a Client,
    pub days_left: i64,
}

/// Clients whose expiration is at most thirty days away, including those
/// already expired. Clients without a date are skipped.
pub fn expiring_soon(clients: &[Client], now: Timestamp) -> Vec<ExpiringClient<'_>> {
    clients
        .iter()
        .filter_map(|client| {
            let days_left = client.days_until_expiration(now)?;
            (days_left <= EXPIRING_WITHIN_DAYS).then_some(ExpiringClient { client, days_left })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryCounts {
    pub clients: usize,
    pub open_projects: usize,
    pub activities: usize,
    pub checklist_records: usize,
}

pub fn summary_counts(store: &DomainStore) -> SummaryCounts {
    SummaryCounts {
        clients: store.clients.len(),
        open_projects: store
            .projects
            .iter()
            .filter(|p| p.status != ProjectStatus::Done)
            .count(),
        activities: store.activities.len(),
        checklist_records: store.checklists.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot<'a> {
    pub summary: SummaryCounts,
    pub completion_rate: u32,
    pub top_clients: Vec<ChartEntry<'a>>,
    pub checklist_due: Vec<SiteStatus<'a>>,
    pub expiring: Vec<ExpiringClient<'a>>,
}

pub fn snapshot(store: &DomainStore, now: Timestamp) -> DashboardSnapshot<'_> {
    DashboardSnapshot {
        summary: summary_counts(store),
        completion_rate: completion_rate(&store.projects),
        top_clients: top_clients(&store.clients, &store.activities),
        checklist_due: checklist_due_today(&store.clients, &store.checklists, now.date_naive()),
        expiring: expiring_soon(&store.clients, now),
    }
}
