//! The `key=value;key=value` assignment string format
//!
//! Values are written verbatim: a value containing `;` or `=` does not
//! survive a round trip.

/// Separator between assignments.
pub const ASSIGNMENT_SEPARATOR: char = ';';

/// Separator between key and value.
pub const KEY_VALUE_SEPARATOR: char = '=';

/// Join key/value pairs into an assignment string.
pub fn format_assignments<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| format!("{key}{KEY_VALUE_SEPARATOR}{value}"))
        .collect::<Vec<_>>()
        .join(&ASSIGNMENT_SEPARATOR.to_string())
}

/// Split an assignment string into key/value pairs.
///
/// Each segment is split on its first `=`. A segment without `=` assigns
/// the empty string to its key. Empty segments are skipped.
pub fn parse_assignments(text: &str) -> Vec<(&str, &str)> {
    text.split(ASSIGNMENT_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            segment
                .split_once(KEY_VALUE_SEPARATOR)
                .unwrap_or((segment, ""))
        })
        .collect()
}
