//! Permission expression matching.
//!
//! Expressions are plain permission names that may contain a single `*`.
//! Only prefix wildcards are honoured: an expression such as `host/*` matches
//! every permission starting with `host/`, while a leading `*` followed by more
//! text (e.g. `*view`) never acts as a suffix wildcard and only matches itself.

/// Expression granting everything.
pub const WILDCARD: &str = "*";

/// Whether `expression` (as stored on a role) satisfies `required`.
///
/// `required` may itself contain a `*`, in which case the shorter of the two
/// literal prefixes decides.
pub fn matches(expression: &str, required: &str) -> bool {
    if expression == WILDCARD || expression == required {
        return true;
    }

    let wildcard = match required.find('*') {
        Some(required_at) => Some(
            expression
                .find('*')
                .map_or(required_at, |granted_at| required_at.min(granted_at)),
        ),
        None => expression.find('*'),
    };

    match wildcard {
        Some(index) if index > 0 => prefix(required, index) == prefix(expression, index),
        _ => required == expression,
    }
}

fn prefix(value: &str, index: usize) -> &[u8] {
    let bytes = value.as_bytes();
    bytes.get(..index.min(bytes.len())).unwrap_or(bytes)
}
