//! Typed builder for User.

use crate::crypto::PasswordManager;
use crate::error::Result;
use crate::user::User;
use crate::validation::Validator;

/// [`User`] builder.
#[derive(Debug, Clone)]
pub struct UserBuilder<Username, Email> {
    username: Username,
    email: Email,
    password: String,
    nickname: String,
    first_name: String,
    last_name: String,
    locale: Option<String>,
}

/// Value is missing on [`UserBuilder`].
#[derive(Debug, Clone)]
pub struct Missing;

/// Value is present on [`UserBuilder`].
#[derive(Debug, Clone)]
pub struct Present<T>(pub T);

impl UserBuilder<Missing, Missing> {
    /// Create a new [`UserBuilder`].
    pub fn new() -> Self {
        Self {
            username: Missing,
            email: Missing,
            password: String::default(),
            nickname: String::default(),
            first_name: String::default(),
            last_name: String::default(),
            locale: None,
        }
    }
}

impl Default for UserBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Email> UserBuilder<Missing, Email> {
    /// Update `username` field on [`UserBuilder`].
    pub fn username(
        self,
        username: impl Into<String>,
    ) -> UserBuilder<Present<String>, Email> {
        UserBuilder {
            username: Present(username.into()),
            email: self.email,
            password: self.password,
            nickname: self.nickname,
            first_name: self.first_name,
            last_name: self.last_name,
            locale: self.locale,
        }
    }
}

impl<Username> UserBuilder<Username, Missing> {
    /// Update `email` field on [`UserBuilder`].
    pub fn email(
        self,
        email: impl Into<String>,
    ) -> UserBuilder<Username, Present<String>> {
        UserBuilder {
            username: self.username,
            email: Present(email.into()),
            password: self.password,
            nickname: self.nickname,
            first_name: self.first_name,
            last_name: self.last_name,
            locale: self.locale,
        }
    }
}

impl<Username, Email> UserBuilder<Username, Email> {
    /// Update `password` field on [`UserBuilder`].
    pub fn password(mut self, password: impl ToString) -> Self {
        self.password = password.to_string();
        self
    }

    /// Update `nickname` field on [`UserBuilder`].
    pub fn nickname(mut self, nickname: impl ToString) -> Self {
        self.nickname = nickname.to_string();
        self
    }

    /// Update `first_name` and `last_name` fields on [`UserBuilder`].
    pub fn name(mut self, first: impl ToString, last: impl ToString) -> Self {
        self.first_name = first.to_string();
        self.last_name = last.to_string();
        self
    }

    /// Update `locale` field on [`UserBuilder`].
    pub fn locale(mut self, locale: Option<String>) -> Self {
        self.locale = locale;
        self
    }
}

impl UserBuilder<Present<String>, Present<String>> {
    /// Build a saved-ready [`User`] using default rules.
    pub fn build(self, pwd: &PasswordManager) -> Result<User> {
        self.build_with(pwd, Validator::standard())
    }

    /// Build a saved-ready [`User`].
    ///
    /// The password is hashed, defaults are assigned and the result is
    /// validated.
    pub fn build_with(
        self,
        pwd: &PasswordManager,
        validator: &Validator,
    ) -> Result<User> {
        let mut user = User {
            username: self.username.0,
            email: self.email.0,
            password: self.password,
            nickname: self.nickname,
            first_name: self.first_name,
            last_name: self.last_name,
            locale: self.locale.unwrap_or_default(),
            ..Default::default()
        };
        user.hash_password(pwd)?.pre_save_with(validator);
        validator.validate(&user)?;

        Ok(user)
    }
}
