//! Theme properties sanitizer.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::user::StringMap;
use crate::validation::ThemeSlot;

static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap());

/// Whether `value` is a `#rrggbb` color.
pub fn is_valid_color(value: &str) -> bool {
    COLOR_RE.is_match(value)
}

/// Overwrite invalid values of recognized slots with their default.
/// Missing slots and unknown keys are left as is.
pub fn sanitize(slots: &[ThemeSlot], props: &mut StringMap) {
    for slot in slots {
        if let Some(value) = props.get_mut(&slot.name) {
            if !slot.accepts(value) {
                tracing::debug!(
                    slot = %slot.name,
                    value = %value,
                    "replacing invalid theme value"
                );
                value.clone_from(&slot.default);
            }
        }
    }
}
