//! Managed client websites.
//!
//! Deleting a client never cascades. Activities, checklist records and
//! projects keep their dangling `client_id` and render [`DELETED_CLIENT_LABEL`].

use chrono::{NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{new_id, optional_day, Day, EntityId, Timestamp};

/// Label rendered in place of a client that no longer exists.
pub const DELETED_CLIENT_LABEL: &str = "Cliente Excluído";

/// Hosting option that switches the form to a free-text provider.
pub const HOSTING_OTHER: &str = "Outros";

pub const HOSTING_PROVIDERS: &[&str] = &["RunCloud", "Hostoo", "GoDaddy", "Locaweb", HOSTING_OTHER];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClientStatus {
    #[default]
    #[serde(rename = "Ativo")]
    Active,
    #[serde(rename = "Congelado")]
    Frozen,
    #[serde(rename = "Incompleto")]
    Incomplete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: EntityId,
    pub name: String,
    pub domain: String,
    #[serde(default)]
    pub other_domains: Vec<String>,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default, with = "optional_day")]
    pub expiration_date: Option<Day>,
    #[serde(default)]
    pub hosting: String,
    #[serde(default)]
    pub status: ClientStatus,
}

impl Client {
    /// Whole days from `now` until the start of the expiration day, rounded
    /// up. Negative once expired; `None` when no date is set.
    pub fn days_until_expiration(&self, now: Timestamp) -> Option<i64> {
        let expires_at = self.expiration_date?.and_time(NaiveTime::MIN).and_utc();
        let remaining = expires_at - now;
        let day = TimeDelta::days(1).num_milliseconds();
        let ms = remaining.num_milliseconds();
        Some(ms.div_euclid(day) + i64::from(ms.rem_euclid(day) != 0))
    }
}

/// Editable client fields.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ClientForm {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "domain is required"))]
    pub domain: String,
    pub other_domains: Vec<String>,
    pub logo_url: String,
    pub expiration_date: Option<Day>,
    /// Selected hosting option, one of [`HOSTING_PROVIDERS`] or empty.
    pub hosting: String,
    /// Free-text provider used when `hosting` is [`HOSTING_OTHER`].
    pub custom_hosting: String,
    pub status: ClientStatus,
}

impl ClientForm {
    /// Form pre-filled for editing. A provider that is not one of the presets
    /// is shown as "other" with its text in the custom field.
    pub fn from_client(client: &Client) -> Self {
        let is_preset = HOSTING_PROVIDERS
            .iter()
            .any(|h| *h != HOSTING_OTHER && *h == client.hosting);
        let (hosting, custom_hosting) = if !is_preset && !client.hosting.is_empty() {
            if client.hosting == HOSTING_OTHER {
                (HOSTING_OTHER.to_string(), String::new())
            } else {
                (HOSTING_OTHER.to_string(), client.hosting.clone())
            }
        } else {
            (client.hosting.clone(), String::new())
        };

        Self {
            name: client.name.clone(),
            domain: client.domain.clone(),
            other_domains: client.other_domains.clone(),
            logo_url: client.logo_url.clone(),
            expiration_date: client.expiration_date,
            hosting,
            custom_hosting,
            status: client.status,
        }
    }

    /// The hosting label that will be stored.
    pub fn resolved_hosting(&self) -> String {
        if self.hosting == HOSTING_OTHER {
            self.custom_hosting.clone()
        } else {
            self.hosting.clone()
        }
    }

    pub fn add_other_domain(&mut self) {
        self.other_domains.push(String::new());
    }

    pub fn update_other_domain(&mut self, index: usize, value: &str) {
        if let Some(slot) = self.other_domains.get_mut(index) {
            *slot = value.to_string();
        }
    }

    pub fn remove_other_domain(&mut self, index: usize) {
        if index < self.other_domains.len() {
            self.other_domains.remove(index);
        }
    }

    fn apply(&self, client: &mut Client) {
        client.name = self.name.clone();
        client.domain = self.domain.clone();
        client.other_domains = self.other_domains.clone();
        client.logo_url = self.logo_url.clone();
        client.expiration_date = self.expiration_date;
        client.hosting = self.resolved_hosting();
        client.status = self.status;
    }
}

/// Create a client from `form` and prepend it to the list.
pub fn create_client<'a>(clients: &'a mut Vec<Client>, form: &ClientForm) -> Result<&'a Client, CoreError> {
    form.validate()?;
    let mut client = Client {
        id: new_id(),
        name: String::new(),
        domain: String::new(),
        other_domains: Vec::new(),
        logo_url: String::new(),
        expiration_date: None,
        hosting: String::new(),
        status: ClientStatus::Active,
    };
    form.apply(&mut client);
    clients.insert(0, client);
    Ok(&clients[0])
}

pub fn update_client<'a>(
    clients: &'a mut [Client],
    id: &str,
    form: &ClientForm,
) -> Result<&'a Client, CoreError> {
    form.validate()?;
    let client = clients
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| CoreError::not_found("client", id))?;
    form.apply(client);
    Ok(client)
}

pub fn delete_client(clients: &mut Vec<Client>, id: &str) -> Result<(), CoreError> {
    let before = clients.len();
    clients.retain(|c| c.id != id);
    if clients.len() == before {
        return Err(CoreError::not_found("client", id));
    }
    Ok(())
}

pub fn find_client<'a>(clients: &'a [Client], id: &str) -> Option<&'a Client> {
    clients.iter().find(|c| c.id == id)
}

/// Name of client `id`, or the deleted-client fallback.
pub fn client_label<'a>(clients: &'a [Client], id: &str) -> &'a str {
    find_client(clients, id)
        .map(|c| c.name.as_str())
        .unwrap_or(DELETED_CLIENT_LABEL)
}

/// Case-insensitive substring search over name and domain.
pub fn search_clients<'a>(clients: &'a [Client], term: &str) -> Vec<&'a Client> {
    let needle = term.to_lowercase();
    clients
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&needle) || c.domain.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;

    fn form(name: &str, domain: &str) -> ClientForm {
        ClientForm {
            name: name.into(),
            domain: domain.into(),
            ..ClientForm::default()
        }
    }

    #[test]
    fn create_requires_name_and_domain() {
        let mut clients = Vec::new();
        assert_matches!(create_client(&mut clients, &form("", "acme.com")), Err(CoreError::Validation(_)));
        assert_matches!(create_client(&mut clients, &form("Acme", "")), Err(CoreError::Validation(_)));
        assert!(clients.is_empty());
    }

    #[test]
    fn create_prepends_active_client() {
        let mut clients = Vec::new();
        create_client(&mut clients, &form("Old", "old.com")).unwrap();
        let created = create_client(&mut clients, &form("Acme", "acme.com")).unwrap().clone();
        assert_eq!(clients[0], created);
        assert_eq!(created.status, ClientStatus::Active);
    }

    #[test]
    fn other_hosting_uses_custom_text() {
        let mut f = form("Acme", "acme.com");
        f.hosting = HOSTING_OTHER.into();
        f.custom_hosting = "Hetzner".into();
        assert_eq!(f.resolved_hosting(), "Hetzner");
        f.hosting = "Hostoo".into();
        assert_eq!(f.resolved_hosting(), "Hostoo");
    }

    #[test]
    fn editing_custom_hosting_restores_other_selection() {
        let mut clients = Vec::new();
        let mut f = form("Acme", "acme.com");
        f.hosting = HOSTING_OTHER.into();
        f.custom_hosting = "Hetzner".into();
        let client = create_client(&mut clients, &f).unwrap();
        let edit = ClientForm::from_client(client);
        assert_eq!(edit.hosting, HOSTING_OTHER);
        assert_eq!(edit.custom_hosting, "Hetzner");
    }

    #[test]
    fn other_domains_edit_in_place() {
        let mut f = form("Acme", "acme.com");
        f.add_other_domain();
        f.add_other_domain();
        f.update_other_domain(0, "shop.acme.com");
        f.update_other_domain(1, "blog.acme.com");
        f.remove_other_domain(0);
        f.remove_other_domain(7);
        assert_eq!(f.other_domains, vec!["blog.acme.com".to_string()]);
    }

    #[test]
    fn delete_does_not_cascade_and_label_falls_back() {
        let mut clients = Vec::new();
        let id = create_client(&mut clients, &form("Acme", "acme.com")).unwrap().id.clone();
        assert_eq!(client_label(&clients, &id), "Acme");
        delete_client(&mut clients, &id).unwrap();
        assert_eq!(client_label(&clients, &id), DELETED_CLIENT_LABEL);
    }

    #[test]
    fn search_matches_name_or_domain_case_insensitively() {
        let mut clients = Vec::new();
        create_client(&mut clients, &form("Acme", "acme.com")).unwrap();
        create_client(&mut clients, &form("Globex", "globex.io")).unwrap();
        assert_eq!(search_clients(&clients, "ACM").len(), 1);
        assert_eq!(search_clients(&clients, ".io")[0].name, "Globex");
        assert_eq!(search_clients(&clients, "").len(), 2);
    }

    #[test]
    fn wire_status_values() {
        assert_eq!(serde_json::to_string(&ClientStatus::Frozen).unwrap(), "\"Congelado\"");
        let client: Client = serde_json::from_value(serde_json::json!({
            "id": "c1", "name": "Acme", "domain": "acme.com",
            "logoUrl": "", "expirationDate": "", "hosting": "", "status": "Incompleto"
        }))
        .unwrap();
        assert_eq!(client.status, ClientStatus::Incomplete);
        assert_eq!(client.expiration_date, None);
        assert!(client.other_domains.is_empty());
    }

    #[test]
    fn days_until_expiration_rounds_up() {
        let mut client: Client = serde_json::from_value(serde_json::json!({
            "id": "c1", "name": "Acme", "domain": "acme.com"
        }))
        .unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 15, 0, 0).unwrap();
        assert_eq!(client.days_until_expiration(now), None);

        client.expiration_date = NaiveDate::from_ymd_opt(2026, 1, 31);
        assert_eq!(client.days_until_expiration(now), Some(30));

        client.expiration_date = NaiveDate::from_ymd_opt(2026, 1, 1);
        assert_eq!(client.days_until_expiration(now), Some(0));

        client.expiration_date = NaiveDate::from_ymd_opt(2025, 12, 31);
        assert_eq!(client.days_until_expiration(now), Some(-1));

        client.expiration_date = NaiveDate::from_ymd_opt(2025, 12, 30);
        assert_eq!(client.days_until_expiration(now), Some(-2));
    }
}
