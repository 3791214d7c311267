//! Username rules.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::crypto::new_id;
use crate::error::Reason;
use crate::validation::{Rules, Validator};

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9.\-_]+$").unwrap());

const REPLACEMENT: char = '-';
/// Prefix of generated usernames, keeping them from starting with a digit.
const GENERATED_PREFIX: char = 'a';

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | '_')
}

/// Check `username` against `rules`.
pub(crate) fn check(rules: &Rules, username: &str) -> Result<(), Reason> {
    if username.is_empty() {
        return Err(Reason::Missing);
    }

    let max = rules.limits.username;
    if username.chars().count() > max {
        return Err(Reason::TooLong { max });
    }

    if !USERNAME_RE.is_match(username) {
        return Err(Reason::Format);
    }

    if rules.is_reserved(username) {
        return Err(Reason::Reserved);
    }

    Ok(())
}

/// Best-effort repair of `username` under `rules`.
pub(crate) fn clean(rules: &Rules, username: &str) -> String {
    let cleaned = username
        .to_lowercase()
        .chars()
        .map(|c| if is_allowed_char(c) { c } else { REPLACEMENT })
        .collect::<String>();
    let cleaned = cleaned.trim_matches(REPLACEMENT);

    if check(rules, cleaned).is_ok() {
        return cleaned.to_owned();
    }

    let generated = format!("{GENERATED_PREFIX}{}", new_id());
    tracing::warn!(
        username = %username,
        generated = %generated,
        "generating a username, cleaned one is still invalid"
    );
    generated
}

/// Whether `username` is made of lowercase ASCII letters, digits, dots,
/// dashes or underscores, is at most 64 characters and is not reserved.
pub fn is_valid_username(username: &str) -> bool {
    Validator::standard().is_valid_username(username)
}

/// Turn any input into a valid username.
///
/// Input is lowercased and forbidden characters become dashes. When the
/// result is still invalid, e.g. a reserved word, a random username of 27
/// characters is generated instead.
pub fn clean_username(username: &str) -> String {
    Validator::standard().clean_username(username)
}
