// Explorer configuration.
//
// `ExplorerConfig` gathers everything needed to set up a search: metric,
// generator set, limits, an optional pitch range, and a temperament. It is
// plain serde data loaded from JSON (`from_json` / `load`); every field has
// a default, so a config file only lists what it changes. The `build_*`
// methods turn the text fields into core objects and surface configuration
// mistakes (unknown metric name, bad subgroup text) as errors.
//
// See also: `main.rs`, which layers command-line flags over a loaded config.

use crate::error::Result;
use crate::generator::{RangeFilter, RationalGenerator};
use crate::harmonicity::Harmonicity;
use crate::lattice::Limits;
use crate::rational::Rational;
use crate::subgroup::Subgroup;
use crate::temperament::{Temperament, Tempered};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Metric name; see `Harmonicity::from_name`.
    pub harmonicity: String,
    /// Rescale distances so that 81/80 is 1.
    pub normalize: bool,
    /// Subgroup text such as `2.3.7/5 (7/5)`. Empty means the primes up to
    /// `prime_limit_index`.
    pub subgroup: String,
    pub prime_limit_index: usize,
    pub max_count: Option<usize>,
    pub max_dimensions: Option<usize>,
    pub max_distance: Option<f64>,
    /// Inclusive pitch bounds, e.g. `["1", "2"]` for one octave.
    pub range: Option<(Rational, Rational)>,
    /// Entries such as `81/80 0c`.
    pub temperament: Vec<String>,
    /// 0 = just, 1 = fully tempered.
    pub temperament_measure: f64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        ExplorerConfig {
            harmonicity: "Barlow".to_string(),
            normalize: false,
            subgroup: String::new(),
            prime_limit_index: 2,
            max_count: Some(50),
            max_dimensions: None,
            max_distance: None,
            range: None,
            temperament: Vec::new(),
            temperament_measure: 0.0,
        }
    }
}

impl ExplorerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        ExplorerConfig::from_json(&data)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn build_metric(&self) -> Result<Harmonicity> {
        Harmonicity::from_name(&self.harmonicity, self.normalize)
    }

    pub fn build_subgroup(&self) -> Result<Subgroup> {
        if self.subgroup.trim().is_empty() {
            Subgroup::from_prime_limit(self.prime_limit_index)
        } else {
            Subgroup::parse(&self.subgroup)
        }
    }

    pub fn build_limits(&self) -> Limits {
        Limits {
            max_count: self.max_count,
            max_dimensions: self.max_dimensions,
            max_distance: self.max_distance,
        }
    }

    pub fn build_range(&self) -> Option<RangeFilter> {
        self.range
            .as_ref()
            .map(|(low, high)| RangeFilter::new(low.clone(), high.clone()))
    }

    pub fn build_generator(&self, subgroup: &Subgroup) -> Result<RationalGenerator> {
        Ok(subgroup.generator(self.build_metric()?, self.build_limits()))
    }

    /// The temperament over `subgroup`, plus one message per configured
    /// entry that could not be used.
    pub fn build_temperament(
        &self,
        subgroup: &Subgroup,
    ) -> Result<(Temperament, Vec<Option<String>>)> {
        let entries: Vec<Result<Tempered>> =
            self.temperament.iter().map(|t| t.parse()).collect();
        let errors = Temperament::errors(&entries, subgroup);
        let parsed: Vec<Tempered> = entries.into_iter().filter_map(|e| e.ok()).collect();
        let mut temperament = Temperament::new();
        temperament.set(&parsed, subgroup)?;
        temperament.set_measure(self.temperament_measure);
        Ok((temperament, errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarmonicError;
    use crate::harmonicity::MetricKind;

    #[test]
    fn test_default_round_trip() {
        let config = ExplorerConfig::default();
        let json = config.to_json().unwrap();
        let restored = ExplorerConfig::from_json(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            ExplorerConfig::from_json(r#"{"harmonicity": "Euler", "max_count": 10}"#).unwrap();
        assert_eq!(config.harmonicity, "Euler");
        assert_eq!(config.max_count, Some(10));
        assert_eq!(config.prime_limit_index, 2);
        assert_eq!(config.build_metric().unwrap().kind(), MetricKind::Euler);
    }

    #[test]
    fn test_range_as_text() {
        let config = ExplorerConfig::from_json(r#"{"range": ["1", "3/2"]}"#).unwrap();
        let range = config.build_range().unwrap();
        assert!(range.contains(&Rational::parse("5/4").unwrap()));
        assert!(!range.contains(&Rational::parse("2").unwrap()));
        assert!(ExplorerConfig::from_json(r#"{"range": ["1", "zero"]}"#).is_err());
    }

    #[test]
    fn test_build_subgroup() {
        let config = ExplorerConfig::default();
        assert_eq!(config.build_subgroup().unwrap().to_string(), "2.3.5");
        let config = ExplorerConfig {
            subgroup: "2.3.7/5".to_string(),
            ..ExplorerConfig::default()
        };
        assert_eq!(config.build_subgroup().unwrap().items().len(), 3);
        let config = ExplorerConfig {
            subgroup: "2.?".to_string(),
            ..ExplorerConfig::default()
        };
        assert!(matches!(config.build_subgroup(), Err(HarmonicError::Parse { .. })));
    }

    #[test]
    fn test_unknown_metric_is_error() {
        let config = ExplorerConfig {
            harmonicity: "Loudness".to_string(),
            ..ExplorerConfig::default()
        };
        assert!(matches!(config.build_metric(), Err(HarmonicError::UnknownMetric { .. })));
        let subgroup = config.build_subgroup().unwrap();
        assert!(config.build_generator(&subgroup).is_err());
    }

    #[test]
    fn test_build_temperament() {
        let config = ExplorerConfig {
            temperament: vec!["81/80 0c".to_string(), "7/4 960c".to_string()],
            temperament_measure: 1.0,
            ..ExplorerConfig::default()
        };
        let subgroup = config.build_subgroup().unwrap();
        let (temperament, errors) = config.build_temperament(&subgroup).unwrap();
        assert!(temperament.is_set());
        assert_eq!(temperament.measure(), 1.0);
        assert_eq!(errors, vec![None, Some("Out of JI range".to_string())]);
    }

    #[test]
    fn test_missing_file() {
        let err = ExplorerConfig::load(Path::new("/nonexistent/explorer.json")).unwrap_err();
        assert!(matches!(err, HarmonicError::Io(_)));
    }
}
