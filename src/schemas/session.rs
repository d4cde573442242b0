use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Teacher,
    Qao,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Qao => "qao",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "student" | "parent" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "qao" => Ok(Role::Qao),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Account families with their own `/api/{students|teachers}` auth routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Student,
    Teacher,
}

impl AccountKind {
    pub(crate) fn collection(self) -> &'static str {
        match self {
            AccountKind::Student => "students",
            AccountKind::Teacher => "teachers",
        }
    }

    pub fn role(self) -> Role {
        match self {
            AccountKind::Student => Role::Student,
            AccountKind::Teacher => Role::Teacher,
        }
    }
}

impl TryFrom<Role> for AccountKind {
    type Error = Role;

    fn try_from(role: Role) -> Result<Self, Self::Error> {
        match role {
            Role::Student => Ok(AccountKind::Student),
            Role::Teacher => Ok(AccountKind::Teacher),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub role: Role,
}
