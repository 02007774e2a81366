//! Post-login routing by role.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;

/// Access level stored with each account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(AuthError::UnknownRole(other.to_string())),
        }
    }
}

/// View a user lands on after logging in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Destination {
    FormBuilder,
    Landing,
}

impl Destination {
    /// Client route for this destination.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Destination::FormBuilder => "/dynamic-form",
            Destination::Landing => "/home",
        }
    }
}

/// Only `admin` reaches the form builder; every other role lands on the
/// plain landing view.
#[must_use]
pub fn route_for(role: &str) -> Destination {
    if role == Role::Admin.as_str() {
        Destination::FormBuilder
    } else {
        Destination::Landing
    }
}
