use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable pointing at an explicit configuration file.
pub const CONFIG_ENV: &str = "FIRING_VIEWER_CONFIG";

/// Configuration file looked up in the working directory when
/// [`CONFIG_ENV`] is not set.
pub const DEFAULT_CONFIG_FILE: &str = "firing-viewer.json";

// ---------------------------------------------------------------------------
// Channel roles – which channel plays which part in the derived quantities
// ---------------------------------------------------------------------------

/// Semantic role → channel id for one instrumentation layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelRoles {
    /// Oxidizer flow, numerator of the O/F ratio.
    pub oxidizer: String,
    /// Fuel flow, denominator of the O/F ratio.
    pub fuel: String,
    /// Thrust load cell.
    pub thrust: String,
}

impl Default for ChannelRoles {
    fn default() -> Self {
        Self {
            oxidizer: "M850".to_string(),
            fuel: "M730".to_string(),
            thrust: "LC190".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub roles: ChannelRoles,
}

impl AnalysisConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing analysis configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Resolve the configuration the desktop app starts with.
    ///
    /// An explicit `FIRING_VIEWER_CONFIG` must exist; the working-directory
    /// file is optional and its absence means defaults.
    pub fn discover() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load(&PathBuf::from(path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::load(local);
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_layout() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.roles.oxidizer, "M850");
        assert_eq!(cfg.roles.fuel, "M730");
        assert_eq!(cfg.roles.thrust, "LC190");
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = AnalysisConfig::from_json(r#"{ "roles": { "thrust": "LC200" } }"#).unwrap();
        assert_eq!(cfg.roles.thrust, "LC200");
        assert_eq!(cfg.roles.oxidizer, "M850");
        assert_eq!(AnalysisConfig::from_json("{}").unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(AnalysisConfig::from_json(r#"{ "roles": 3 }"#).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let path = std::env::temp_dir().join("firing_viewer_no_such_config.json");
        let err = AnalysisConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("firing_viewer_no_such_config.json"));
    }
}
