//! Escaped string-list serialization
//!
//! Items are joined with `,`. A backslash escapes the next character, so
//! items may contain `,` and `\` themselves.

use ext_convert::{ConverterRegistry, FnConverter};

/// Separator between list items.
pub const LIST_SEPARATOR: char = ',';

/// Escape character.
pub const LIST_ESCAPE: char = '\\';

/// Serialize items into one escaped string.
///
/// An empty list and a list holding one empty string both serialize to
/// the empty string; it deserializes to the empty list.
pub fn serialize_list<S: AsRef<str>>(items: &[S]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(LIST_SEPARATOR);
        }
        for ch in item.as_ref().chars() {
            if ch == LIST_SEPARATOR || ch == LIST_ESCAPE {
                out.push(LIST_ESCAPE);
            }
            out.push(ch);
        }
    }
    out
}

/// Split an escaped string back into items.
///
/// A trailing lone backslash is kept literally.
pub fn deserialize_list(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        match ch {
            LIST_ESCAPE => current.push(chars.next().unwrap_or(LIST_ESCAPE)),
            LIST_SEPARATOR => items.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    items.push(current);
    items
}

/// Register a `Vec<String>` converter based on the escaped list format.
pub fn register_list_converter(registry: &mut ConverterRegistry) {
    registry.register::<Vec<String>>(FnConverter::new(
        |text| Ok(deserialize_list(text)),
        |items: &Vec<String>| serialize_list(items),
        Vec::new(),
    ));
}
