//! Shared table lookup and formatting helpers.

/// First entry whose key contains `query` or is contained in it,
/// compared case-insensitively after trimming. Table order decides ties.
pub(crate) fn find_entry<'a, V>(table: &'a [(&'static str, V)], query: &str) -> Option<&'a V> {
    let needle = query.trim().to_lowercase();
    table
        .iter()
        .find(|(key, _)| needle.contains(key) || key.contains(needle.as_str()))
        .map(|(_, value)| value)
}

/// Capitalize the first letter of every word and lowercase the rest.
/// A word starts after any non-alphabetic character.
pub(crate) fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Read a required, non-blank string argument.
pub(crate) fn required_str<'a>(
    arguments: &'a serde_json::Value,
    key: &str,
) -> Result<&'a str, dsatutor_core::error::ToolError> {
    match arguments.get(key).and_then(|v| v.as_str()) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        Some(_) => Err(dsatutor_core::error::ToolError::InvalidArguments(format!(
            "'{key}' must not be empty"
        ))),
        None => Err(dsatutor_core::error::ToolError::InvalidArguments(format!(
            "Missing '{key}' argument"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: [(&str, u8); 3] = [("stack", 1), ("binary search", 2), ("binary tree", 3)];

    #[test]
    fn matches_in_both_directions() {
        assert_eq!(find_entry(&TABLE, "Monotonic STACK problems"), Some(&1));
        assert_eq!(find_entry(&TABLE, "binary"), Some(&2));
        assert_eq!(find_entry(&TABLE, "  Binary Tree "), Some(&3));
        assert_eq!(find_entry(&TABLE, "heap"), None);
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("binary SEARCH"), "Binary Search");
        assert_eq!(title_case("two-pointers"), "Two-Pointers");
        assert_eq!(title_case("2sum"), "2Sum");
    }

    #[test]
    fn required_str_rejects_blank_and_missing() {
        let args = serde_json::json!({"a": "  ", "b": "ok"});
        assert!(required_str(&args, "a").is_err());
        assert!(required_str(&args, "missing").is_err());
        assert_eq!(required_str(&args, "b").unwrap(), "ok");
    }
}
