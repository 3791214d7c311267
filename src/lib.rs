//! Roster is the user identity model of a collaboration service.
//!
//! It validates and canonicalizes the fields of a [`User`] before the
//! caller persists it. Apart from reading its configuration file, nothing
//! here performs I/O.

#![forbid(unsafe_code)]

pub mod config;
pub mod crypto;
pub mod error;
pub mod telemetry;
pub mod time;
pub mod user;
pub mod validation;

pub use error::{Error, FieldValidationError, Reason, Result};
pub use user::builder::UserBuilder;
pub use user::mention::update_mention_keys;
pub use user::role::{Role, is_in_role, is_valid_user_roles};
pub use user::username::{clean_username, is_valid_username};
pub use user::{SanitizeOptions, StringMap, User};
pub use validation::{Limits, Rules, ThemeSlot, Validator};
