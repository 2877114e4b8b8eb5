// SPDX-FileCopyrightText: 2026 Praxis Contributors
// SPDX-License-Identifier: MIT

use std::fmt;
use std::str::FromStr;

/// The active role, which gates feature visibility in navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Role {
    #[default]
    Manager,
    Clinician,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "Manager",
            Self::Clinician => "Clinician",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Manager => Self::Clinician,
            Self::Clinician => Self::Manager,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Manager" => Ok(Self::Manager),
            "Clinician" => Ok(Self::Clinician),
            _ => Err(ParseRoleError {
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError {
    value: String,
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role {:?}", self.value)
    }
}

impl std::error::Error for ParseRoleError {}

/// The identity record attached to the current role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "John Doe".to_owned(),
            email: "john.doe@clinic.com".to_owned(),
        }
    }
}

impl UserProfile {
    /// Initials for the avatar badge, e.g. "John Doe" -> "JD".
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase()
    }
}

/// Current role + identity. Mutated only through [`crate::ops::RoleOp`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleState {
    role: Role,
    user: UserProfile,
}

impl RoleState {
    pub fn new(role: Role, user: UserProfile) -> Self {
        Self { role, user }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }
}

/// A partial overlay for role hydration; fields absent from the persisted
/// snapshot stay untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolePatch {
    pub role: Option<Role>,
    pub user: Option<UserProfile>,
}
