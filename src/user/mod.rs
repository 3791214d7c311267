//! User record and its lifecycle.

pub mod builder;
pub mod mention;
pub mod role;
pub mod theme;
pub mod username;

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::crypto::{PasswordManager, new_id};
use crate::error::{FieldValidationError, Result};
use crate::time::now_millis;
use crate::validation::Validator;
use builder::{Missing, UserBuilder};
use role::Role;

/// String to string mapping used for user properties.
pub type StringMap = BTreeMap<String, String>;

pub const DEFAULT_LOCALE: &str = "en";

pub const NOTIFY_EMAIL: &str = "email";
pub const NOTIFY_DESKTOP: &str = "desktop";
pub const NOTIFY_DESKTOP_SOUND: &str = "desktop_sound";
pub const NOTIFY_CHANNEL: &str = "channel";
pub const NOTIFY_FIRST_NAME: &str = "first_name";
pub const NOTIFY_MENTION_KEYS: &str = "mention_keys";

/// Desktop notifications for every message.
pub const NOTIFY_ALL: &str = "all";

/// User as exchanged with clients and storage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub create_at: i64,
    pub update_at: i64,
    pub delete_at: i64,
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    pub email: String,
    pub email_verified: bool,
    pub nickname: String,
    pub first_name: String,
    pub last_name: String,
    /// Space separated role tokens.
    pub roles: String,
    pub last_activity_at: i64,
    pub last_ping_at: i64,
    pub allow_marketing: bool,
    pub notify_props: StringMap,
    pub theme_props: StringMap,
    pub last_password_update: i64,
    pub failed_attempts: i32,
    pub locale: String,
}

/// Which private fields survive [`User::sanitize`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SanitizeOptions {
    pub email: bool,
    pub full_name: bool,
}

impl User {
    /// Create a new [`UserBuilder`].
    pub fn builder() -> UserBuilder<Missing, Missing> {
        UserBuilder::new()
    }

    /// Serialize [`User`] into JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a [`User`] from JSON.
    /// Unknown keys are ignored and missing ones take their default value.
    pub fn from_json(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Check every field using default rules.
    pub fn is_valid(&self) -> std::result::Result<(), FieldValidationError> {
        Validator::standard().validate(self)
    }

    /// Replace a plaintext `password` with its Argon2id hash.
    /// An empty password stays empty.
    pub fn hash_password(&mut self, pwd: &PasswordManager) -> Result<&mut Self> {
        if !self.password.is_empty() {
            self.password = pwd.hash_password(&self.password)?;
        }
        Ok(self)
    }

    /// Prepare a new [`User`] before its first save.
    ///
    /// `password` is kept as is: call [`User::hash_password`] first when it
    /// holds a plaintext.
    pub fn pre_save(&mut self) -> &mut Self {
        self.pre_save_with(Validator::standard())
    }

    /// Same as [`User::pre_save`] with custom rules.
    pub fn pre_save_with(&mut self, validator: &Validator) -> &mut Self {
        if self.id.is_empty() {
            self.id = new_id();
        }

        if self.username.is_empty() {
            self.username = new_id();
        }

        self.username = self.username.to_lowercase();
        self.email = self.email.to_lowercase();
        self.locale = self.locale.to_lowercase();

        self.create_at = now_millis();
        self.update_at = self.create_at;
        self.last_password_update = self.create_at;

        if self.locale.is_empty() {
            self.locale = DEFAULT_LOCALE.to_owned();
        }

        if self.roles.trim().is_empty() {
            self.roles = Role::SystemUser.to_string();
        }

        if self.notify_props.is_empty() {
            self.set_default_notifications();
        }

        validator.sanitize_theme(&mut self.theme_props);

        tracing::debug!(user_id = %self.id, "user prepared for first save");
        self
    }

    /// Prepare an existing [`User`] before it is saved again.
    pub fn pre_update(&mut self) -> &mut Self {
        self.pre_update_with(Validator::standard())
    }

    /// Same as [`User::pre_update`] with custom rules.
    pub fn pre_update_with(&mut self, validator: &Validator) -> &mut Self {
        self.username = self.username.to_lowercase();
        self.email = self.email.to_lowercase();
        self.update_at = now_millis();

        if self.notify_props.is_empty() {
            self.set_default_notifications();
        } else if let Some(keys) = self.notify_props.get_mut(NOTIFY_MENTION_KEYS)
        {
            *keys = mention::normalize(keys);
        }

        validator.sanitize_theme(&mut self.theme_props);
        self
    }

    /// Reset notification preferences to their defaults.
    pub fn set_default_notifications(&mut self) {
        let first_name = if self.first_name.is_empty() {
            "false"
        } else {
            "true"
        };

        self.notify_props = StringMap::from([
            (NOTIFY_EMAIL.to_owned(), "true".to_owned()),
            (NOTIFY_DESKTOP.to_owned(), NOTIFY_ALL.to_owned()),
            (NOTIFY_DESKTOP_SOUND.to_owned(), "true".to_owned()),
            (NOTIFY_CHANNEL.to_owned(), "true".to_owned()),
            (NOTIFY_FIRST_NAME.to_owned(), first_name.to_owned()),
        ]);

        // Mention keys follow the username, none exist without one.
        if !self.username.is_empty() {
            self.notify_props.insert(
                NOTIFY_MENTION_KEYS.to_owned(),
                mention::default_keys(&self.username),
            );
        }
    }

    /// Swap `old_username` for the current username inside mention keys.
    pub fn update_mention_keys_from_username(&mut self, old_username: &str) {
        let keys = self
            .notify_props
            .get(NOTIFY_MENTION_KEYS)
            .map(String::as_str)
            .unwrap_or_default();
        let keys =
            mention::update_mention_keys(keys, old_username, &self.username);

        self.notify_props.insert(NOTIFY_MENTION_KEYS.to_owned(), keys);
    }

    /// `first last`, or whichever of both is set.
    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) => String::new(),
        }
    }

    /// Name shown to other users.
    pub fn display_name(&self) -> String {
        if !self.nickname.is_empty() {
            return self.nickname.clone();
        }

        let full_name = self.full_name();
        if full_name.is_empty() {
            self.username.clone()
        } else {
            full_name
        }
    }

    /// Whether the user holds `role`.
    pub fn has_role(&self, role: Role) -> bool {
        role::is_in_role(&self.roles, role.as_str())
    }

    /// Cache validator of the user as seen with the given visibility.
    pub fn etag(&self, show_full_name: bool, show_email: bool) -> String {
        format!(
            "{}.{}.{}.{}.{}",
            env!("CARGO_PKG_VERSION"),
            self.id,
            self.update_at,
            show_full_name,
            show_email
        )
    }

    /// Remove private data before sending [`User`] to someone else.
    pub fn sanitize(&mut self, options: SanitizeOptions) -> &mut Self {
        self.password.clear();

        if !options.email {
            self.email.clear();
        }

        if !options.full_name {
            self.first_name.clear();
            self.last_name.clear();
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json() {
        let user = User {
            id: new_id(),
            username: new_id(),
            ..Default::default()
        };

        let json = user.to_json().unwrap();
        let ruser = User::from_json(json.as_bytes()).unwrap();
        assert_eq!(user.id, ruser.id);
        assert_eq!(user, ruser);
    }

    #[test]
    fn test_json_skips_empty_password() {
        let user = User {
            username: "user".into(),
            ..Default::default()
        };
        let value: serde_json::Value =
            serde_json::from_str(&user.to_json().unwrap()).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["username"], "user");
    }

    #[test]
    fn test_json_partial_body() {
        let body = json!({
            "username": "spin-punch",
            "notify_props": { "mention_keys": "spin-punch,@spin-punch" },
            "unknown": 42,
        })
        .to_string();

        let user = User::from_json(body.as_bytes()).unwrap();
        assert_eq!(user.username, "spin-punch");
        assert_eq!(user.create_at, 0);
        assert_eq!(
            user.notify_props[NOTIFY_MENTION_KEYS],
            "spin-punch,@spin-punch"
        );

        assert!(User::from_json("{".as_bytes()).is_err());
    }

    #[test]
    fn test_pre_save() {
        let mut user = User {
            username: "Spin-Punch".into(),
            email: "Test@Nowhere.com".into(),
            password: "test".into(),
            ..Default::default()
        };
        user.pre_save();

        assert_eq!(user.id.len(), 26);
        assert_eq!(user.username, "spin-punch");
        assert_eq!(user.email, "test@nowhere.com");
        assert_ne!(user.create_at, 0);
        assert_eq!(user.create_at, user.update_at);
        assert_eq!(user.locale, DEFAULT_LOCALE);
        assert_eq!(user.roles, "system_user");
        assert_eq!(
            user.notify_props[NOTIFY_MENTION_KEYS],
            "spin-punch,@spin-punch"
        );
        assert_eq!(user.is_valid(), Ok(()));

        let etag = user.etag(true, true);
        assert!(etag.ends_with(&format!(
            "{}.{}.true.true",
            user.id, user.update_at
        )));
    }

    #[test]
    fn test_pre_save_keeps_id() {
        let id = new_id();
        let mut user = User {
            id: id.clone(),
            ..Default::default()
        };
        user.pre_save();

        assert_eq!(user.id, id);
        assert_eq!(user.username.len(), 26);
        assert_eq!(user.is_valid(), Ok(()));
    }

    #[test]
    fn test_pre_update() {
        let mut user = User {
            password: "test".into(),
            ..Default::default()
        };
        user.pre_update();
        assert_eq!(user.notify_props[NOTIFY_DESKTOP], NOTIFY_ALL);
        assert!(!user.notify_props.contains_key(NOTIFY_MENTION_KEYS));

        user.theme_props = StringMap::from([
            ("codeTheme".to_owned(), "github".to_owned()),
            ("awayIndicator".to_owned(), "#cdbd4e".to_owned()),
            ("buttonColor".to_owned(), "invalid".to_owned()),
        ]);
        user.pre_update();

        assert_eq!(user.theme_props["codeTheme"], "github");
        assert_eq!(user.theme_props["awayIndicator"], "#cdbd4e");
        assert_eq!(user.theme_props["buttonColor"], "#ffffff");
    }

    #[test]
    fn test_pre_update_without_username() {
        let mut user = User::default();
        user.pre_update();
        user.pre_update();
        assert_eq!(user.notify_props.get(NOTIFY_MENTION_KEYS), None);

        user.username = "user".into();
        user.set_default_notifications();
        user.pre_update();
        assert_eq!(user.notify_props[NOTIFY_MENTION_KEYS], "user,@user");
    }

    #[test]
    fn test_hash_password() {
        let pwd = PasswordManager::new(Some(crate::config::Argon2 {
            memory_cost: 1024,
            iterations: 1,
            parallelism: 1,
            hash_length: 32,
        }))
        .unwrap();

        let mut user = User {
            password: "test".into(),
            ..Default::default()
        };
        user.pre_save();
        assert_eq!(user.password, "test");

        user.hash_password(&pwd).unwrap().pre_save();
        assert!(user.password.starts_with("$argon2id$"));
        assert!(pwd.verify_password("test", &user.password).is_ok());

        let mut user = User::default();
        user.hash_password(&pwd).unwrap();
        assert!(user.password.is_empty());
    }

    #[test]
    fn test_pre_update_cleans_mention_keys() {
        let mut user = User {
            username: "user".into(),
            ..Default::default()
        };
        user.set_default_notifications();
        user.notify_props.insert(
            NOTIFY_MENTION_KEYS.to_owned(),
            "user,@user,,Mention,".to_owned(),
        );
        user.pre_update();

        assert_eq!(user.notify_props[NOTIFY_MENTION_KEYS], "user,@user,mention");
    }

    #[test]
    fn test_default_notifications() {
        let mut user = User {
            username: "user".into(),
            ..Default::default()
        };
        user.set_default_notifications();
        assert_eq!(user.notify_props[NOTIFY_FIRST_NAME], "false");
        assert_eq!(user.notify_props[NOTIFY_DESKTOP], NOTIFY_ALL);
        assert_eq!(user.notify_props[NOTIFY_EMAIL], "true");

        user.first_name = "first".into();
        user.set_default_notifications();
        assert_eq!(user.notify_props[NOTIFY_FIRST_NAME], "true");
    }

    #[test]
    fn test_update_mention_keys_from_username() {
        let mut user = User {
            username: "user".into(),
            ..Default::default()
        };
        user.set_default_notifications();
        assert_eq!(user.notify_props[NOTIFY_MENTION_KEYS], "user,@user");

        user.username = "person".into();
        user.update_mention_keys_from_username("user");
        assert_eq!(user.notify_props[NOTIFY_MENTION_KEYS], "person,@person");

        if let Some(keys) = user.notify_props.get_mut(NOTIFY_MENTION_KEYS) {
            keys.push_str(",mention");
        }
        user.update_mention_keys_from_username("person");
        assert_eq!(
            user.notify_props[NOTIFY_MENTION_KEYS],
            "person,@person,mention"
        );

        user.username = "user".into();
        user.update_mention_keys_from_username("person");
        assert_eq!(
            user.notify_props[NOTIFY_MENTION_KEYS],
            "user,@user,mention"
        );
    }

    #[test]
    fn test_mention_keys_without_notify_props() {
        let mut user = User {
            username: "user".into(),
            ..Default::default()
        };
        user.update_mention_keys_from_username("");
        assert_eq!(user.notify_props[NOTIFY_MENTION_KEYS], "user,@user");
    }

    #[test]
    fn test_full_name() {
        let mut user = User::default();
        assert_eq!(user.full_name(), "");

        user.first_name = "first".into();
        assert_eq!(user.full_name(), "first");

        user.first_name = String::new();
        user.last_name = "last".into();
        assert_eq!(user.full_name(), "last");

        user.first_name = "first".into();
        assert_eq!(user.full_name(), "first last");
    }

    #[test]
    fn test_display_name() {
        let mut user = User {
            username: "user".into(),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "user");

        user.first_name = "first".into();
        user.last_name = "last".into();
        assert_eq!(user.display_name(), "first last");

        user.nickname = "nickname".into();
        assert_eq!(user.display_name(), "nickname");
    }

    #[test]
    fn test_sanitize() {
        let mut user = User {
            password: "hash".into(),
            email: "test@nowhere.com".into(),
            first_name: "first".into(),
            last_name: "last".into(),
            ..Default::default()
        };

        user.sanitize(SanitizeOptions {
            email: true,
            full_name: false,
        });
        assert!(user.password.is_empty());
        assert_eq!(user.email, "test@nowhere.com");
        assert_eq!(user.full_name(), "");

        user.sanitize(SanitizeOptions::default());
        assert!(user.email.is_empty());
    }

    #[test]
    fn test_has_role() {
        let user = User {
            roles: "system_user system_admin".into(),
            ..Default::default()
        };
        assert!(user.has_role(Role::SystemAdmin));
        assert!(!User::default().has_role(Role::SystemAdmin));
    }
}
