//! Display names from the genealogical `Given/Family/Suffix` encoding.

use crate::model::Value;

/// Render an encoded name for display.
///
/// The encoding is `Given/Family/Suffix`. A comma in the first segment
/// introduces alternate forms: `Smith,Jones` becomes `Smith (Jones)`.
/// Segments are displayed suffix first, `[Suffix, Given, Family]`, with
/// empty ones dropped.
///
/// Input that does not split into at least three segments is returned
/// as-is.
///
/// ```
/// use family_tree::family::display_name;
///
/// assert_eq!(display_name("Smith,Jones/John/Jr"), "Jr Smith (Jones) John");
/// assert_eq!(display_name("Moshe/Cohen/"), "Moshe Cohen");
/// assert_eq!(display_name("JustOneSegment"), "JustOneSegment");
/// ```
pub fn display_name(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let segments: Vec<&str> = raw.split('/').map(str::trim).collect();
    let [given, family, suffix, ..] = segments.as_slice() else {
        return raw.to_string();
    };

    let given = match given.split_once(',') {
        Some((primary, alternates)) => {
            let alternates: Vec<&str> = alternates.split(',').collect();
            format!("{primary} ({})", alternates.join("/"))
        }
        None => given.to_string(),
    };

    [*suffix, given.as_str(), *family]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// [`display_name`] for a raw property value. Absent or non-string
/// values have no name.
pub fn display_name_of(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).map(display_name).unwrap_or_default()
}
