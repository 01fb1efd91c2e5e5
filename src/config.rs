//! Per-project `.stricture.yml` (§6): rule overrides, plugin paths, and the
//! manifest binding for this service. Loaded with `serde_yaml` the way the
//! teacher's `config::Config` loads `.glotrc.json` with `serde_json`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StrictureError;
use crate::rules::{RuleConfig, RuleSeverityOverride};

pub const CONFIG_FILE_NAME: &str = ".stricture.yml";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProjectConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub rules: BTreeMap<String, RuleEntry>,
    #[serde(default)]
    pub plugins: Vec<String>,
    #[serde(default)]
    pub manifest: Option<ManifestConfig>,
}

/// A rule entry is either a bare severity string (`error|warn|off`) or a
/// detailed map carrying `severity` and `options` (§3 `RuleConfig`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RuleEntry {
    Severity(String),
    Detailed {
        #[serde(default)]
        severity: Option<String>,
        #[serde(default)]
        options: BTreeMap<String, serde_json::Value>,
    },
}

impl RuleEntry {
    pub fn to_rule_config(&self) -> Result<RuleConfig, StrictureError> {
        match self {
            RuleEntry::Severity(s) => Ok(RuleConfig {
                severity: Some(parse_severity(s)?),
                options: BTreeMap::new(),
            }),
            RuleEntry::Detailed { severity, options } => Ok(RuleConfig {
                severity: severity.as_deref().map(parse_severity).transpose()?,
                options: options.clone(),
            }),
        }
    }
}

fn parse_severity(s: &str) -> Result<RuleSeverityOverride, StrictureError> {
    match s {
        "error" => Ok(RuleSeverityOverride::Error),
        "warn" | "warning" => Ok(RuleSeverityOverride::Warn),
        "off" => Ok(RuleSeverityOverride::Off),
        other => Err(StrictureError::Config {
            detail: format!("unknown rule severity '{other}' (expected error, warn, or off)"),
        }),
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ManifestConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    pub service: String,
    #[serde(default)]
    pub contracts: Vec<ManifestContractEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ManifestContractEntry {
    pub id: String,
    pub role: String,
    #[serde(default)]
    pub handler_paths: Vec<String>,
    #[serde(default)]
    pub type_paths: Vec<String>,
    /// §4.5: when `true`, the code's enum must implement every manifest
    /// value exactly (no narrower subset); when `false` (the default), the
    /// manifest may declare values the code hasn't implemented yet.
    #[serde(default)]
    pub enum_strict_subset: bool,
}

impl ProjectConfig {
    /// Validate glob patterns and the `manifest.{url,path}` precedence rule
    /// (§6: "when both url and path are given, path wins with a warning.
    /// Neither given is a parse error"). Returns warnings to surface under
    /// `--verbose`.
    pub fn validate(&self) -> Result<Vec<String>, StrictureError> {
        let mut warnings = Vec::new();

        for entry in &self.rules {
            entry.1.to_rule_config()?;
        }

        for path in self.plugins.iter().chain(
            self.manifest
                .iter()
                .flat_map(|m| m.contracts.iter())
                .flat_map(|c| c.handler_paths.iter().chain(c.type_paths.iter())),
        ) {
            glob::Pattern::new(path).map_err(|e| StrictureError::Config {
                detail: format!("invalid glob pattern '{path}': {e}"),
            })?;
        }

        if let Some(manifest) = &self.manifest {
            match (&manifest.url, &manifest.path) {
                (None, None) => {
                    return Err(StrictureError::Config {
                        detail: "manifest config must set at least one of 'url' or 'path'".to_string(),
                    });
                }
                (Some(_), Some(_)) => {
                    warnings.push("manifest config sets both 'url' and 'path'; 'path' wins".to_string());
                }
                _ => {}
            }
        }

        Ok(warnings)
    }

    /// The manifest document path, resolving the `url`/`path` precedence
    /// rule; `None` when no manifest is configured.
    pub fn manifest_path(&self) -> Option<&str> {
        self.manifest.as_ref().and_then(|m| m.path.as_deref().or(m.url.as_deref()))
    }
}

pub struct ConfigLoadResult {
    pub config: ProjectConfig,
    pub from_file: bool,
    pub warnings: Vec<String>,
}

/// Walk upward from `start_dir` looking for `.stricture.yml`, stopping at a
/// `.git` boundary (teacher's `find_config_file` shape).
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load `path` explicitly, or discover one from `start_dir` unless
/// `no_config` is set, falling back to `ProjectConfig::default()`.
pub fn load_config(start_dir: &Path, explicit_path: Option<&Path>, no_config: bool) -> Result<ConfigLoadResult, StrictureError> {
    if no_config {
        return Ok(ConfigLoadResult {
            config: ProjectConfig::default(),
            from_file: false,
            warnings: Vec::new(),
        });
    }

    let resolved = explicit_path.map(Path::to_path_buf).or_else(|| find_config_file(start_dir));

    match resolved {
        Some(path) => {
            let content = fs::read_to_string(&path).map_err(|source| StrictureError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let config: ProjectConfig = serde_yaml::from_str(&content).map_err(|e| StrictureError::Parse {
                path: path.display().to_string(),
                detail: e.to_string(),
            })?;
            let warnings = config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
                warnings,
            })
        }
        None => Ok(ConfigLoadResult {
            config: ProjectConfig::default(),
            from_file: false,
            warnings: Vec::new(),
        }),
    }
}

/// The commented default document `stricture init` writes.
pub fn default_config_yaml() -> String {
    r#"# Stricture project configuration.
version: "1.0"

# Per-rule overrides: RULE-ID: error|warn|off, or a map with severity+options.
rules: {}

# Paths to plugin rule definitions (table-driven must_contain/must_not_contain checks).
plugins: []

# Uncomment and fill in to enable cross-service CTR-* rules:
# manifest:
#   path: ./manifest.yml
#   service: this-service-id
#   contracts:
#     - id: contract-id
#       role: producer
#       handler_paths: ["src/handlers/**"]
#       type_paths: ["src/types/**"]
"#
    .to_string()
}
