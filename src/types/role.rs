use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Role decides which dashboard a user lands on and whether they may upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Owner,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Employee, Role::Owner];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Owner => "owner",
        }
    }

    /// Path of the landing page for this role.
    #[must_use]
    pub const fn dashboard_path(self) -> &'static str {
        match self {
            Role::Employee => "/employee",
            Role::Owner => "/owner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee" => Ok(Role::Employee),
            "owner" => Ok(Role::Owner),
            other => Err(Error::InvalidRole(other.to_string())),
        }
    }
}
