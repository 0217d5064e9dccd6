//! Attribute selection

use std::collections::BTreeSet;

use super::pattern::AttributePattern;

/// Select the keys that fully match `pattern`
///
/// Keys come back in ascending lexicographic order without duplicates, so the
/// audit line for a record does not depend on attribute map iteration order.
pub fn select_attributes<'a, I>(keys: I, pattern: &AttributePattern) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a String>,
{
    keys.into_iter()
        .map(String::as_str)
        .filter(|key| pattern.is_full_match(key))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn attrs(keys: &[&str]) -> HashMap<String, String> {
        keys.iter().map(|k| (k.to_string(), String::new())).collect()
    }

    #[test]
    fn test_selects_matching_keys_sorted() {
        let attributes = attrs(&["uuid", "filesize", "path", "filename", "absolute.path"]);
        let pattern = AttributePattern::compile("file.*|path").unwrap();

        let selected = select_attributes(attributes.keys(), &pattern);
        assert_eq!(selected, vec!["filename", "filesize", "path"]);
    }

    #[test]
    fn test_no_matches() {
        let attributes = attrs(&["uuid", "path"]);
        let pattern = AttributePattern::compile("file.*").unwrap();
        assert!(select_attributes(attributes.keys(), &pattern).is_empty());
    }

    #[test]
    fn test_empty_keys() {
        let attributes: HashMap<String, String> = HashMap::new();
        let pattern = AttributePattern::compile(".*").unwrap();
        assert!(select_attributes(attributes.keys(), &pattern).is_empty());
    }

    #[test]
    fn test_duplicate_input_keys_collapse() {
        let keys = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        let pattern = AttributePattern::compile("[ab]").unwrap();
        assert_eq!(select_attributes(&keys, &pattern), vec!["a", "b"]);
    }

    #[test]
    fn test_selection_is_repeatable() {
        let attributes = attrs(&["filename", "filesize", "fileowner", "mime.type"]);
        let pattern = AttributePattern::compile("file.*").unwrap();
        let first = select_attributes(attributes.keys(), &pattern);
        let second = select_attributes(attributes.keys(), &pattern);
        assert_eq!(first, second);
        assert_eq!(first, vec!["filename", "fileowner", "filesize"]);
    }
}
