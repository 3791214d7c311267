//! Validation rules and the structural validator of [`User`].

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{FieldValidationError, Reason};
use crate::user::{StringMap, User, theme, username};

static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]{26}$").unwrap());

static STANDARD: LazyLock<Validator> = LazyLock::new(Validator::default);

/// Maximum length, in characters, of bounded fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub username: usize,
    pub email: usize,
    pub nickname: usize,
    pub first_name: usize,
    pub last_name: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            username: 64,
            email: 128,
            nickname: 64,
            first_name: 64,
            last_name: 64,
        }
    }
}

/// A theme slot recognized by the sanitizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeSlot {
    /// Key inside `theme_props`.
    pub name: String,
    /// Value written over an invalid one.
    pub default: String,
    /// Named values accepted by the slot.
    /// An empty list means the slot holds a `#rrggbb` color.
    #[serde(default)]
    pub allowed: Vec<String>,
}

impl ThemeSlot {
    /// Create a color slot.
    pub fn color(name: &str, default: &str) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            allowed: Vec::new(),
        }
    }

    /// Create a slot restricted to a set of named values.
    pub fn named(name: &str, default: &str, allowed: &[&str]) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            allowed: allowed.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Whether `value` is acceptable for this slot.
    pub fn accepts(&self, value: &str) -> bool {
        if self.allowed.is_empty() {
            theme::is_valid_color(value)
        } else {
            self.allowed.iter().any(|v| v == value)
        }
    }
}

/// Immutable tables the validator works with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub limits: Limits,
    /// Usernames with a system meaning, such as mentioning everyone.
    pub reserved_usernames: Vec<String>,
    pub theme_slots: Vec<ThemeSlot>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            reserved_usernames: vec!["all".into(), "channel".into()],
            theme_slots: default_theme_slots(),
        }
    }
}

impl Rules {
    /// Whether `username` is a reserved word.
    pub fn is_reserved(&self, username: &str) -> bool {
        self.reserved_usernames.iter().any(|r| r == username)
    }

    /// Find a recognized theme slot by name.
    pub fn theme_slot(&self, name: &str) -> Option<&ThemeSlot> {
        self.theme_slots.iter().find(|slot| slot.name == name)
    }
}

fn default_theme_slots() -> Vec<ThemeSlot> {
    vec![
        ThemeSlot::color("sidebarBg", "#2071a7"),
        ThemeSlot::color("sidebarText", "#ffffff"),
        ThemeSlot::color("sidebarUnreadText", "#ffffff"),
        ThemeSlot::color("sidebarTextHoverBg", "#136197"),
        ThemeSlot::color("sidebarTextActiveBorder", "#7ab0d6"),
        ThemeSlot::color("sidebarTextActiveColor", "#ffffff"),
        ThemeSlot::color("sidebarHeaderBg", "#2f81b7"),
        ThemeSlot::color("sidebarHeaderTextColor", "#ffffff"),
        ThemeSlot::color("onlineIndicator", "#7dbe00"),
        ThemeSlot::color("awayIndicator", "#dcbd4e"),
        ThemeSlot::color("mentionBj", "#fbfbfb"),
        ThemeSlot::color("mentionColor", "#2071a7"),
        ThemeSlot::color("centerChannelBg", "#f2f4f8"),
        ThemeSlot::color("centerChannelColor", "#333333"),
        ThemeSlot::color("newMessageSeparator", "#ff8800"),
        ThemeSlot::color("linkColor", "#2f81b7"),
        ThemeSlot::color("buttonBg", "#1dacfc"),
        ThemeSlot::color("buttonColor", "#ffffff"),
        ThemeSlot::color("mentionHighlightBg", "#fff2bb"),
        ThemeSlot::color("mentionHighlightLink", "#2f81b7"),
        ThemeSlot::named(
            "codeTheme",
            "github",
            &["github", "monokai", "solarized-dark", "solarized-light"],
        ),
    ]
}

/// Structural validator and canonicalizer of user identity fields.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: Rules,
}

impl Validator {
    /// Create a new [`Validator`] using `rules`.
    pub fn new(rules: Rules) -> Self {
        Self { rules }
    }

    /// Validator built on default [`Rules`].
    pub fn standard() -> &'static Validator {
        &STANDARD
    }

    /// Tables used by this validator.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Check every field of `user`. The first violation is returned.
    pub fn validate(&self, user: &User) -> Result<(), FieldValidationError> {
        if user.id.is_empty() {
            return Err(FieldValidationError::new("id", Reason::Missing));
        }
        if !ID_RE.is_match(&user.id) {
            return Err(FieldValidationError::new("id", Reason::Format));
        }

        if user.create_at == 0 {
            return Err(FieldValidationError::new("create_at", Reason::Missing));
        }
        if user.update_at == 0 {
            return Err(FieldValidationError::new("update_at", Reason::Missing));
        }

        username::check(&self.rules, &user.username)
            .map_err(|reason| FieldValidationError::new("username", reason))?;

        let limits = &self.rules.limits;
        check_length("email", &user.email, limits.email)?;
        check_length("nickname", &user.nickname, limits.nickname)?;
        check_length("first_name", &user.first_name, limits.first_name)?;
        check_length("last_name", &user.last_name, limits.last_name)?;

        Ok(())
    }

    /// See [`username::is_valid_username`].
    pub fn is_valid_username(&self, value: &str) -> bool {
        username::check(&self.rules, value).is_ok()
    }

    /// See [`username::clean_username`].
    pub fn clean_username(&self, value: &str) -> String {
        username::clean(&self.rules, value)
    }

    /// Repair recognized theme slots of `props` in place.
    pub fn sanitize_theme(&self, props: &mut StringMap) {
        theme::sanitize(&self.rules.theme_slots, props)
    }
}

fn check_length(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), FieldValidationError> {
    if value.chars().count() > max {
        Err(FieldValidationError::new(field, Reason::TooLong { max }))
    } else {
        Ok(())
    }
}
