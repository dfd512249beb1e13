use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnitSelectionError;

/// Strategy used to map target frames onto corpus frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SelectionMethod {
    NearestNeighborTree,
    NearestNeighborBruteForce,
    ViterbiMarkov,
}

impl SelectionMethod {
    pub const ALL: [SelectionMethod; 3] = [
        SelectionMethod::NearestNeighborTree,
        SelectionMethod::NearestNeighborBruteForce,
        SelectionMethod::ViterbiMarkov,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SelectionMethod::NearestNeighborTree => "nearest_neighbor_tree",
            SelectionMethod::NearestNeighborBruteForce => "nearest_neighbor_brute_force",
            SelectionMethod::ViterbiMarkov => "viterbi_markov",
        }
    }
}

impl FromStr for SelectionMethod {
    type Err = UnitSelectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "nearest_neighbor_tree" | "kd_tree" | "kdTree" | "tree" => {
                Ok(SelectionMethod::NearestNeighborTree)
            }
            "nearest_neighbor_brute_force" | "brute_force" | "linearSearch" | "linear" => {
                Ok(SelectionMethod::NearestNeighborBruteForce)
            }
            "viterbi_markov" | "viterbi" | "Markov" | "markov" => Ok(SelectionMethod::ViterbiMarkov),
            other => Err(UnitSelectionError::invalid_config(format!(
                "unknown selection method '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for SelectionMethod {
    type Error = UnitSelectionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SelectionMethod> for String {
    fn from(method: SelectionMethod) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-dimension rescaling applied to target and corpus, each fit on its own
/// rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Normalization {
    MinMax,
    StandardScore,
    None,
}

impl Normalization {
    pub const ALL: [Normalization; 3] = [
        Normalization::MinMax,
        Normalization::StandardScore,
        Normalization::None,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Normalization::MinMax => "min_max",
            Normalization::StandardScore => "standard_score",
            Normalization::None => "none",
        }
    }
}

impl FromStr for Normalization {
    type Err = UnitSelectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "min_max" | "MinMax" | "minmax" => Ok(Normalization::MinMax),
            "standard_score" | "SD" | "sd" | "zscore" | "standard" => {
                Ok(Normalization::StandardScore)
            }
            "none" | "None" => Ok(Normalization::None),
            other => Err(UnitSelectionError::invalid_config(format!(
                "unknown normalization '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for Normalization {
    type Error = UnitSelectionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Normalization> for String {
    fn from(normalization: Normalization) -> Self {
        normalization.as_str().to_string()
    }
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "default_method")]
    pub method: SelectionMethod,
    #[serde(default = "default_normalization")]
    pub normalization: Normalization,
}

fn default_method() -> SelectionMethod {
    SelectionMethod::NearestNeighborTree
}

fn default_normalization() -> Normalization {
    Normalization::MinMax
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
            normalization: default_normalization(),
        }
    }
}

impl SelectionConfig {
    pub fn load(path: &Path) -> Result<Self, UnitSelectionError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| UnitSelectionError::io("read selection config", e))?;
        serde_json::from_str(&data)
            .map_err(|e| UnitSelectionError::json("parse selection config", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_config_default() {
        let config = SelectionConfig::default();
        assert_eq!(config.method, SelectionMethod::NearestNeighborTree);
        assert_eq!(config.normalization, Normalization::MinMax);
    }

    #[test]
    fn canonical_names_round_trip() {
        for method in SelectionMethod::ALL {
            assert_eq!(method.as_str().parse::<SelectionMethod>().unwrap(), method);
        }
        for normalization in Normalization::ALL {
            assert_eq!(
                normalization.as_str().parse::<Normalization>().unwrap(),
                normalization
            );
        }
    }

    #[test]
    fn legacy_selector_names_are_accepted() {
        assert_eq!(
            "kdTree".parse::<SelectionMethod>().unwrap(),
            SelectionMethod::NearestNeighborTree
        );
        assert_eq!(
            "linearSearch".parse::<SelectionMethod>().unwrap(),
            SelectionMethod::NearestNeighborBruteForce
        );
        assert_eq!(
            "Markov".parse::<SelectionMethod>().unwrap(),
            SelectionMethod::ViterbiMarkov
        );
        assert_eq!("SD".parse::<Normalization>().unwrap(), Normalization::StandardScore);
        assert_eq!("MinMax".parse::<Normalization>().unwrap(), Normalization::MinMax);
    }

    #[test]
    fn unknown_selectors_fail_loudly() {
        assert!(matches!(
            "dtw".parse::<SelectionMethod>(),
            Err(UnitSelectionError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            "robust".parse::<Normalization>(),
            Err(UnitSelectionError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn config_json_uses_defaults_for_missing_fields() {
        let config: SelectionConfig = serde_json::from_str(r#"{"method": "Markov"}"#).unwrap();
        assert_eq!(config.method, SelectionMethod::ViterbiMarkov);
        assert_eq!(config.normalization, Normalization::MinMax);

        let bad = serde_json::from_str::<SelectionConfig>(r#"{"method": "beam"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = SelectionConfig::load(Path::new("/nonexistent/selection.json")).unwrap_err();
        assert!(matches!(err, UnitSelectionError::Io { .. }));
    }

    #[test]
    fn load_reads_json_file() {
        let path = std::env::temp_dir().join("unit_select_config_load.json");
        std::fs::write(&path, r#"{"method": "viterbi_markov", "normalization": "none"}"#)
            .expect("write config");
        let config = SelectionConfig::load(&path).unwrap();
        assert_eq!(config.method, SelectionMethod::ViterbiMarkov);
        assert_eq!(config.normalization, Normalization::None);
        let _ = std::fs::remove_file(&path);
    }
}
