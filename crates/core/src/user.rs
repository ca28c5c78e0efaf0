//! Users, login, and user management.
//!
//! Credentials are compared by plain equality against the in-memory user
//! list. There is no hashing, lockout, or attempt counting.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::access::{self, TAB_DASHBOARD};
use crate::error::CoreError;
use crate::types::{new_id, EntityId};

/// Message shown inline when login fails.
pub const ACCESS_DENIED_MESSAGE: &str = "Access denied. Check username and password.";

/// Identifier of the admin seeded when no user list has been stored yet.
pub const DEFAULT_ADMIN_ID: &str = "admin-1";
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "123";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub allowed_tabs: Vec<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Seed administrator with every registered tab allowed.
pub fn default_admin() -> User {
    User {
        id: DEFAULT_ADMIN_ID.to_string(),
        username: DEFAULT_ADMIN_USERNAME.to_string(),
        password: DEFAULT_ADMIN_PASSWORD.to_string(),
        role: Role::Admin,
        allowed_tabs: access::all_tab_ids().map(str::to_string).collect(),
    }
}

/// Find the first user whose username and password both match exactly.
pub fn authenticate<'a>(
    users: &'a [User],
    username: &str,
    password: &str,
) -> Result<&'a User, CoreError> {
    users
        .iter()
        .find(|u| u.username == username && u.password == password)
        .ok_or_else(|| CoreError::Unauthorized(ACCESS_DENIED_MESSAGE.to_string()))
}

/// Editable user fields.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct UserForm {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    pub role: Role,
    pub allowed_tabs: Vec<String>,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            role: Role::Staff,
            allowed_tabs: vec![TAB_DASHBOARD.to_string()],
        }
    }
}

impl UserForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            password: user.password.clone(),
            role: user.role,
            allowed_tabs: user.allowed_tabs.clone(),
        }
    }

    /// Add the tab when absent, remove it when present.
    pub fn toggle_tab(&mut self, tab_id: &str) {
        toggle_tab(&mut self.allowed_tabs, tab_id);
    }
}

/// Add `tab_id` to `tabs` when absent, remove every occurrence when present.
pub fn toggle_tab(tabs: &mut Vec<String>, tab_id: &str) {
    if tabs.iter().any(|t| t == tab_id) {
        tabs.retain(|t| t != tab_id);
    } else {
        tabs.push(tab_id.to_string());
    }
}

/// Append a new user built from `form`.
pub fn create_user<'a>(users: &'a mut Vec<User>, form: &UserForm) -> Result<&'a User, CoreError> {
    form.validate()?;
    users.push(User {
        id: new_id(),
        username: form.username.clone(),
        password: form.password.clone(),
        role: form.role,
        allowed_tabs: form.allowed_tabs.clone(),
    });
    Ok(&users[users.len() - 1])
}

/// Replace the editable fields of user `id` with those from `form`.
pub fn update_user<'a>(
    users: &'a mut [User],
    id: &str,
    form: &UserForm,
) -> Result<&'a User, CoreError> {
    form.validate()?;
    let user = users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or_else(|| CoreError::not_found("user", id))?;
    user.username = form.username.clone();
    user.password = form.password.clone();
    user.role = form.role;
    user.allowed_tabs = form.allowed_tabs.clone();
    Ok(user)
}

/// Remove user `id`. A user may not delete themselves.
pub fn delete_user(users: &mut Vec<User>, id: &str, current_user_id: &str) -> Result<(), CoreError> {
    if id == current_user_id {
        return Err(CoreError::Forbidden("users cannot delete themselves".into()));
    }
    let before = users.len();
    users.retain(|u| u.id != id);
    if users.len() == before {
        return Err(CoreError::not_found("user", id));
    }
    Ok(())
}

/// Rewrite the credentials of the first admin in the list.
pub fn update_admin_credentials(
    users: &mut [User],
    username: &str,
    password: &str,
) -> Result<(), CoreError> {
    let admin = users
        .iter_mut()
        .find(|u| u.is_admin())
        .ok_or_else(|| CoreError::NotFound {
            entity: "user",
            id: "<admin>".to_string(),
        })?;
    admin.username = username.to_string();
    admin.password = password.to_string();
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn staff(id: &str, username: &str, password: &str) -> User {
        User {
            id: id.into(),
            username: username.into(),
            password: password.into(),
            role: Role::Staff,
            allowed_tabs: vec!["dashboard".into()],
        }
    }

    #[test]
    fn authenticate_matches_exact_credentials() {
        let users = vec![staff("u1", "ana", "pw"), default_admin()];
        let user = authenticate(&users, "admin", "123").unwrap();
        assert_eq!(user.id, DEFAULT_ADMIN_ID);
    }

    #[test]
    fn authenticate_rejects_wrong_password() {
        let users = vec![staff("u1", "ana", "pw")];
        assert_matches!(authenticate(&users, "ana", "PW"), Err(CoreError::Unauthorized(_)));
        assert_matches!(authenticate(&users, "ana ", "pw"), Err(CoreError::Unauthorized(_)));
    }

    #[test]
    fn authenticate_first_match_wins() {
        let users = vec![staff("first", "dup", "pw"), staff("second", "dup", "pw")];
        assert_eq!(authenticate(&users, "dup", "pw").unwrap().id, "first");
    }

    #[test]
    fn user_json_uses_camel_case() {
        let json = serde_json::to_value(staff("u1", "ana", "pw")).unwrap();
        assert_eq!(json["allowedTabs"][0], "dashboard");
        assert_eq!(json["role"], "staff");
    }

    #[test]
    fn user_without_password_deserializes() {
        let user: User =
            serde_json::from_str(r#"{"id":"x","username":"a","role":"admin"}"#).unwrap();
        assert_eq!(user.password, "");
        assert!(user.allowed_tabs.is_empty());
    }

    #[test]
    fn default_admin_allows_every_tab() {
        let admin = default_admin();
        assert!(admin.is_admin());
        assert_eq!(admin.allowed_tabs.len(), access::TABS.len());
    }

    #[test]
    fn new_user_form_defaults_to_staff_dashboard() {
        let form = UserForm::default();
        assert_eq!(form.role, Role::Staff);
        assert_eq!(form.allowed_tabs, vec!["dashboard".to_string()]);
    }

    #[test]
    fn create_user_requires_credentials() {
        let mut users = Vec::new();
        let form = UserForm {
            username: "bia".into(),
            ..UserForm::default()
        };
        assert_matches!(create_user(&mut users, &form), Err(CoreError::Validation(_)));
        assert!(users.is_empty());
    }

    #[test]
    fn create_user_appends() {
        let mut users = vec![default_admin()];
        let form = UserForm {
            username: "bia".into(),
            password: "secret".into(),
            ..UserForm::default()
        };
        create_user(&mut users, &form).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].username, "bia");
    }

    #[test]
    fn toggle_tab_adds_and_removes() {
        let mut form = UserForm::default();
        form.toggle_tab("clients");
        assert_eq!(form.allowed_tabs, vec!["dashboard", "clients"]);
        form.toggle_tab("dashboard");
        assert_eq!(form.allowed_tabs, vec!["clients"]);
    }

    #[test]
    fn update_user_unknown_id_is_not_found() {
        let mut users = vec![staff("u1", "ana", "pw")];
        let form = UserForm::from_user(&users[0]);
        assert_matches!(
            update_user(&mut users, "nope", &form),
            Err(CoreError::NotFound { entity: "user", .. })
        );
    }

    #[test]
    fn cannot_delete_self() {
        let mut users = vec![default_admin(), staff("u1", "ana", "pw")];
        assert_matches!(
            delete_user(&mut users, DEFAULT_ADMIN_ID, DEFAULT_ADMIN_ID),
            Err(CoreError::Forbidden(_))
        );
        delete_user(&mut users, "u1", DEFAULT_ADMIN_ID).unwrap();
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn admin_credentials_are_rewritten() {
        let mut users = vec![staff("u1", "ana", "pw"), default_admin()];
        update_admin_credentials(&mut users, "root", "s3cret").unwrap();
        assert_eq!(users[1].username, "root");
        assert_eq!(users[1].password, "s3cret");
        assert_eq!(users[0].username, "ana");
    }
}
