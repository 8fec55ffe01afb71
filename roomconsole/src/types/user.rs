use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::role::RoleRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    /// `local`, `ldap`, `shibboleth`, ...
    pub authenticator: String,
    #[serde(default)]
    pub roles: Vec<RoleRef>,
    #[serde(default)]
    pub user_locale: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// Write payload for a user. Roles are sent as IDs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDraft {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub user_locale: Option<String>,
    pub timezone: Option<String>,
    pub roles: Vec<u64>,
    pub updated_at: Option<String>,
}

/// The authenticated user as returned by `/currentUser`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: u64,
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub permissions: BTreeSet<String>,
}
