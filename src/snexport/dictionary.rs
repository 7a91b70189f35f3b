use serde::{Deserialize, Serialize};

/// Post-processing applied to recognized handwriting before it is written out.
pub trait TextTransform {
    fn apply(&self, text: &str) -> String;
}

/// Leaves text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl TextTransform for Verbatim {
    fn apply(&self, text: &str) -> String {
        text.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub original: String,
    pub replacement: String,
}

impl DictionaryEntry {
    pub fn new(original: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            replacement: replacement.into(),
        }
    }
}

/// User dictionary correcting common recognition mistakes.
///
/// Entries are applied in order as literal replace-all passes, so a later entry
/// sees the output of earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDictionary {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub entries: Vec<DictionaryEntry>,
}

impl TextTransform for CustomDictionary {
    fn apply(&self, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        self.entries
            .iter()
            .filter(|e| !e.original.is_empty())
            .fold(text.to_string(), |acc, e| {
                acc.replace(&e.original, &e.replacement)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(enabled: bool, entries: &[(&str, &str)]) -> CustomDictionary {
        CustomDictionary {
            enabled,
            entries: entries
                .iter()
                .map(|(o, r)| DictionaryEntry::new(*o, *r))
                .collect(),
        }
    }

    #[test]
    fn test_disabled_is_identity() {
        let d = dict(false, &[("teh", "the")]);
        assert_eq!(d.apply("teh cat"), "teh cat");
    }

    #[test]
    fn test_replaces_all_occurrences_in_order() {
        let d = dict(true, &[("teh", "the"), ("the cat", "the dog")]);
        assert_eq!(d.apply("teh cat and teh cat"), "the dog and the dog");
    }

    #[test]
    fn test_empty_original_is_ignored() {
        let d = dict(true, &[("", "x"), ("a", "b")]);
        assert_eq!(d.apply("aaa"), "bbb");
    }

    #[test]
    fn test_verbatim() {
        assert_eq!(Verbatim.apply("as is"), "as is");
    }
}
