use std::collections::{HashMap, HashSet};
use regex::{Captures, Regex};
use lazy_static::lazy_static;


lazy_static! {
    static ref PLACEHOLDER_MATCH_RE: Regex = Regex::new(r"\{\{.*?\}\}").unwrap();
}

#[inline]
fn strip_format(key: &str) -> &str {
    //! Strips "{{" and "}}" from a matched placeholder.
    //! Only call this on matches of [PLACEHOLDER_MATCH_RE].
    &key[2..key.len() - 2]
}

/// Replaces all placeholders with their filling values in one pass.
///
/// Placeholders that are missing from the mapping, or mapped to `None`, are left as they are.
/// Filling values are inserted literally and never scanned for placeholders again.
pub(crate) fn replace_all_placeholders(original: &str, mapping: &HashMap<String, Option<String>>) -> String {
    PLACEHOLDER_MATCH_RE
        .replace_all(original, |captures: &Captures| {
            let match_text = &captures[0];
            let key = strip_format(match_text);
            match mapping.get(key) {
                Some(Some(value)) => value.clone(),
                _ => match_text.to_string(),
            }
        })
        .into_owned()
}

pub(crate) fn get_placeholders(string: &str) -> HashSet<String> {
    PLACEHOLDER_MATCH_RE.captures_iter(string)
        .map(|captures| strip_format(&captures[0]).to_string())
        .collect()
}

#[cfg(test)]
mod test_prompt_processing {
    use std::collections::{HashMap, HashSet};
    use super::{get_placeholders, replace_all_placeholders};

    #[test]
    fn test_get_keys() {
        let string = "{{a}}";
        let keys = get_placeholders(string);
        let expect_keys = HashSet::from(["a".to_string()]);
        assert_eq!(expect_keys, keys);

        let string = "{{a\n}}";
        let keys = get_placeholders(string);
        assert_eq!(0, keys.len());

        let string = "{{a}}    {{b}}";
        let keys = get_placeholders(string);
        let expect_keys = HashSet::from(["a".to_string(), "b".to_string()]);
        assert_eq!(expect_keys, keys);
    }

    #[test]
    fn test_replace() {
        let string = "{{a}} and {{b}} and {{a}}";
        let mapping = HashMap::from([
            ("a".to_string(), Some("alice".to_string())),
            ("b".to_string(), Some("bob".to_string())),
        ]);
        assert_eq!("alice and bob and alice", replace_all_placeholders(string, &mapping));
    }

    #[test]
    fn test_replace_is_literal() {
        let string = "{{a}} then {{b}}";
        let mapping = HashMap::from([
            ("a".to_string(), Some("{{b}} $1".to_string())),
            ("b".to_string(), None),
        ]);
        assert_eq!("{{b}} $1 then {{b}}", replace_all_placeholders(string, &mapping));
    }
}
