//! Roles held by a user.
//!
//! On the wire roles are a single space separated string such as
//! `"system_user system_admin"`.

use std::fmt;
use std::str::FromStr;

/// Role known by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Regular member.
    SystemUser,
    /// Administrator of the whole system.
    SystemAdmin,
}

impl Role {
    /// Wire token of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SystemUser => "system_user",
            Role::SystemAdmin => "system_admin",
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

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system_user" => Ok(Role::SystemUser),
            "system_admin" => Ok(Role::SystemAdmin),
            _ => Err(s.to_owned()),
        }
    }
}

/// Parse a role string.
///
/// # Errors
///
/// Returns the first token which is not a known [`Role`].
pub fn parse_roles(roles: &str) -> Result<Vec<Role>, String> {
    roles.split_whitespace().map(Role::from_str).collect()
}

/// Whether every token of `roles` is a known [`Role`].
pub fn is_valid_user_roles(roles: &str) -> bool {
    parse_roles(roles).is_ok()
}

/// Whether `role` is one of the tokens of `roles`.
pub fn is_in_role(roles: &str, role: &str) -> bool {
    roles.split_whitespace().any(|r| r == role)
}
