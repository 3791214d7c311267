//! Mention keys: comma separated words a user is notified on.
//!
//! The first two keys always track the username (`name` then `@name`),
//! the following ones are free keywords added by the user.

const SEPARATOR: char = ',';

/// Mention keys of a freshly created user.
pub fn default_keys(username: &str) -> String {
    format!("{username},@{username}")
}

/// Replace the leading `old` and `@old` keys with `new` and `@new`.
///
/// Leading keys are only dropped when both match `old` in position.
/// Otherwise they are kept after the new pair. Extra keywords keep their
/// order.
pub fn update_mention_keys(keys: &str, old: &str, new: &str) -> String {
    let tokens: Vec<&str> =
        keys.split(SEPARATOR).filter(|k| !k.is_empty()).collect();

    let mention = format!("@{old}");
    let extra = match tokens.as_slice() {
        [first, second, rest @ ..] if *first == old && *second == mention => {
            rest
        },
        all => all,
    };

    let mut updated = default_keys(new);
    for token in extra {
        updated.push(SEPARATOR);
        updated.push_str(token);
    }
    updated
}

/// Drop blank keys and lowercase the others.
pub fn normalize(keys: &str) -> String {
    keys.split(SEPARATOR)
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(",")
}
