// Named intervals: "81/80" <-> "Syntonic comma".
//
// The table is JSON (`{"intervals": [{"interval": "81/80", "name": ...}]}`)
// loaded with `IntervalLibrary::from_json`, the same JSON-string-in,
// typed-struct-out pattern as the config. `default_library()` embeds
// `data/intervals.json` at compile time. Lookups go both ways through two
// `FxHashMap`s; later entries win on duplicate keys.

use crate::error::Result;
use crate::rational::Rational;
use rustc_hash::FxHashMap;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct LibraryEntry {
    interval: Rational,
    name: String,
}

#[derive(Debug, Deserialize)]
struct LibraryFile {
    intervals: Vec<LibraryEntry>,
}

#[derive(Clone, Debug, Default)]
pub struct IntervalLibrary {
    names: FxHashMap<Rational, String>,
    rationals: FxHashMap<String, Rational>,
}

impl IntervalLibrary {
    pub fn from_json(json: &str) -> Result<Self> {
        let file: LibraryFile = serde_json::from_str(json)?;
        let mut library = IntervalLibrary::default();
        for entry in file.intervals {
            library.add(entry.interval, entry.name);
        }
        Ok(library)
    }

    pub fn add(&mut self, rational: Rational, name: impl Into<String>) {
        let name = name.into();
        self.names.insert(rational.clone(), name.clone());
        self.rationals.insert(name, rational);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn find_name(&self, rational: &Rational) -> Option<&str> {
        self.names.get(rational).map(String::as_str)
    }

    /// Exact match on the full name.
    pub fn find_rational(&self, name: &str) -> Option<&Rational> {
        self.rationals.get(name)
    }
}

/// The built-in table of common intervals and commas. Panics if the
/// embedded JSON is malformed.
pub fn default_library() -> IntervalLibrary {
    let json = include_str!("../data/intervals.json");
    IntervalLibrary::from_json(json).expect("embedded intervals.json is malformed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarmonicError;

    fn r(text: &str) -> Rational {
        Rational::parse(text).unwrap()
    }

    #[test]
    fn test_default_library_lookups() {
        let lib = default_library();
        assert!(lib.len() > 20);
        assert_eq!(lib.find_name(&r("81/80")), Some("Syntonic comma"));
        assert_eq!(lib.find_name(&r("162/160")), Some("Syntonic comma"));
        assert_eq!(lib.find_rational("Diaschisma"), Some(&r("2048/2025")));
        assert_eq!(lib.find_name(&r("17/16")), None);
        assert_eq!(lib.find_rational("No such interval"), None);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"intervals": [
            {"interval": "3/2", "name": "Fifth"},
            {"interval": "|-1 1>", "name": "Also a fifth"}
        ]}"#;
        let lib = IntervalLibrary::from_json(json).unwrap();
        // Same interval twice: the later name wins, both names resolve.
        assert_eq!(lib.len(), 1);
        assert_eq!(lib.find_name(&r("3/2")), Some("Also a fifth"));
        assert_eq!(lib.find_rational("Fifth"), Some(&r("3/2")));
    }

    #[test]
    fn test_bad_json() {
        let bad = r#"{"intervals": [{"interval": "0/1", "name": "Zero"}]}"#;
        assert!(matches!(
            IntervalLibrary::from_json(bad),
            Err(HarmonicError::Config(_))
        ));
    }
}
