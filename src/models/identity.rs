use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::repository::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Candidate,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered candidate or company administrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// National ID, candidates only.
    pub national_id: Option<String>,
    /// Company registration number, admins only.
    pub company_registration: Option<String>,
    pub company_name: Option<String>,
    pub skills: Vec<String>,
    pub location: String,
    pub phone: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

impl Identity {
    /// The identifier this identity logs in with, which depends on its role.
    pub fn login_identifier(&self) -> Option<&str> {
        match self.role {
            Role::Candidate => self.national_id.as_deref(),
            Role::Admin => self.company_registration.as_deref(),
        }
    }

    pub fn matches_login(&self, identifier: &str, role: Role) -> bool {
        self.role == role && self.login_identifier() == Some(identifier)
    }
}

impl Record for Identity {
    fn id(&self) -> Uuid {
        self.id
    }
}
