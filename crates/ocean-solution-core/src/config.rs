//! Solution configuration file.
//!
//! The YAML layout matches the files shipped with each ocean solution:
//!
//! ```yaml
//! StartYear: 2020
//! EndYear: 2050
//! BaseYear: 2014
//! PDSAdoptionFile: data/pds_adoption.json
//! REFAdoptionFile: data/ref_adoption.json
//! ScenariosFile: data/scenarios.json
//! RequiredVersionMinimum: "0.1"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::OceanSolutionError;
use crate::types::Year;
use crate::OceanResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionConfig {
    #[serde(rename = "StartYear")]
    pub start_year: Year,
    #[serde(rename = "EndYear")]
    pub end_year: Year,
    #[serde(rename = "BaseYear")]
    pub base_year: Year,
    #[serde(rename = "PDSAdoptionFile")]
    pub pds_adoption_file: PathBuf,
    #[serde(rename = "REFAdoptionFile")]
    pub ref_adoption_file: PathBuf,
    #[serde(rename = "ScenariosFile")]
    pub scenarios_file: PathBuf,
    #[serde(
        rename = "RequiredVersionMinimum",
        deserialize_with = "version_string"
    )]
    pub required_version_minimum: String,
}

impl SolutionConfig {
    /// Parse and validate YAML. Relative file paths are kept as written.
    pub fn from_yaml_str(contents: &str) -> OceanResult<Self> {
        let config: SolutionConfig = serde_yaml::from_str(contents)
            .map_err(|e| OceanSolutionError::config("configuration", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, resolving relative file paths against the
    /// directory that contains it.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> OceanResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            OceanSolutionError::config(
                "configuration",
                format!("Failed to read '{}': {}", path.display(), e),
            )
        })?;
        let mut config = Self::from_yaml_str(&contents)?;
        if let Some(dir) = path.parent() {
            config.resolve_paths(dir);
        }
        debug!(path = %path.display(), "loaded solution configuration");
        Ok(config)
    }

    fn resolve_paths(&mut self, dir: &Path) {
        for file in [
            &mut self.pds_adoption_file,
            &mut self.ref_adoption_file,
            &mut self.scenarios_file,
        ] {
            if file.is_relative() {
                *file = dir.join(&*file);
            }
        }
    }

    pub fn validate(&self) -> OceanResult<()> {
        if self.base_year > self.start_year {
            return Err(OceanSolutionError::config(
                "BaseYear",
                format!(
                    "base year {} is after start year {}",
                    self.base_year, self.start_year
                ),
            ));
        }
        if self.start_year > self.end_year {
            return Err(OceanSolutionError::config(
                "StartYear",
                format!(
                    "start year {} is after end year {}",
                    self.start_year, self.end_year
                ),
            ));
        }
        self.required_version()?;
        Ok(())
    }

    /// Numeric components of `RequiredVersionMinimum`.
    pub fn required_version(&self) -> OceanResult<Vec<u64>> {
        parse_version(&self.required_version_minimum).ok_or_else(|| {
            OceanSolutionError::config(
                "RequiredVersionMinimum",
                format!(
                    "'{}' is not a dotted numeric version",
                    self.required_version_minimum
                ),
            )
        })
    }

    /// Compare the required minimum with `running`. Returns a warning when
    /// the running version is older; this never blocks loading.
    pub fn check_required_version(&self, running: &str) -> OceanResult<Option<String>> {
        let required = self.required_version()?;
        let Some(current) = parse_version(running) else {
            return Err(OceanSolutionError::InvalidInput {
                field: "running_version".into(),
                reason: format!("'{running}' is not a dotted numeric version"),
            });
        };
        if version_less_than(&current, &required) {
            let message = format!(
                "Running version {running}; version {} or greater is required",
                self.required_version_minimum
            );
            warn!("{message}");
            return Ok(Some(message));
        }
        Ok(None)
    }
}

fn parse_version(text: &str) -> Option<Vec<u64>> {
    text.trim()
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect()
}

fn version_less_than(current: &[u64], required: &[u64]) -> bool {
    let width = current.len().max(required.len());
    let component = |v: &[u64], i: usize| v.get(i).copied().unwrap_or(0);
    for i in 0..width {
        let (c, r) = (component(current, i), component(required, i));
        if c != r {
            return c < r;
        }
    }
    false
}

/// Accept `RequiredVersionMinimum` written either as a string or as a bare
/// YAML number such as `3.6`.
fn version_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawVersion {
        Text(String),
        Integer(u64),
        Float(f64),
    }

    Ok(match RawVersion::deserialize(deserializer)? {
        RawVersion::Text(text) => text,
        RawVersion::Integer(major) => major.to_string(),
        RawVersion::Float(version) => version.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONFIG: &str = r#"
StartYear: 2020
EndYear: 2050
BaseYear: 2014
PDSAdoptionFile: data/pds_adoption.json
REFAdoptionFile: data/ref_adoption.json
ScenariosFile: data/scenarios.json
RequiredVersionMinimum: "0.1"
"#;

    #[test]
    fn test_parse_config() {
        let config = SolutionConfig::from_yaml_str(CONFIG).unwrap();
        assert_eq!(config.start_year, 2020);
        assert_eq!(config.end_year, 2050);
        assert_eq!(config.base_year, 2014);
        assert_eq!(config.scenarios_file, PathBuf::from("data/scenarios.json"));
        assert_eq!(config.required_version().unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let yaml = CONFIG.replace("EndYear: 2050\n", "");
        let err = SolutionConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, OceanSolutionError::Config { .. }));
        assert!(err.to_string().contains("EndYear"));
    }

    #[test]
    fn test_unparseable_yaml_is_config_error() {
        let err = SolutionConfig::from_yaml_str("StartYear: [2020\n").unwrap_err();
        assert!(matches!(err, OceanSolutionError::Config { .. }));
    }

    #[test]
    fn test_numeric_version_accepted() {
        let yaml = CONFIG.replace("\"0.1\"", "3.6");
        let config = SolutionConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(config.required_version().unwrap(), vec![3, 6]);
    }

    #[test]
    fn test_malformed_version_rejected() {
        let yaml = CONFIG.replace("\"0.1\"", "\"one.two\"");
        let err = SolutionConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(err.to_string().contains("RequiredVersionMinimum"));
    }

    #[test]
    fn test_year_ordering_validated() {
        let yaml = CONFIG.replace("BaseYear: 2014", "BaseYear: 2025");
        assert!(SolutionConfig::from_yaml_str(&yaml).is_err());
    }

    #[test]
    fn test_version_warning() {
        let config = SolutionConfig::from_yaml_str(&CONFIG.replace("\"0.1\"", "\"2.0\"")).unwrap();
        let warning = config.check_required_version("1.9.3").unwrap();
        assert!(warning.unwrap().contains("2.0"));
        assert_eq!(config.check_required_version("2.0.0").unwrap(), None);
        assert_eq!(config.check_required_version("10.0").unwrap(), None);
    }

    #[test]
    fn test_version_comparison_pads_components() {
        assert!(version_less_than(&[0, 1], &[0, 1, 1]));
        assert!(!version_less_than(&[0, 1, 0], &[0, 1]));
        assert!(!version_less_than(&[1], &[0, 9, 9]));
    }

    #[test]
    fn test_relative_paths_resolved() {
        let mut config = SolutionConfig::from_yaml_str(CONFIG).unwrap();
        config.resolve_paths(Path::new("/opt/solutions/seaweed"));
        assert_eq!(
            config.pds_adoption_file,
            PathBuf::from("/opt/solutions/seaweed/data/pds_adoption.json")
        );
    }
}
