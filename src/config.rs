//! Analysis configuration
//!
//! Settings come from three places, later ones winning:
//! - built-in defaults
//! - the project settings file (`polydep.toml` in the project root, or
//!   the file given with `--config`)
//! - command line flags
//!
//! ```toml
//! [settings]
//! read_timeout_secs = 5
//! max_manifest_bytes = 1048576
//! use_lockfiles = true
//!
//! [aliases]
//! protobuf = ["python:protobuf", "java:com.google.protobuf:protobuf-java"]
//! ```

use crate::analyzer::AnalyzerRegistry;
use crate::cli::CliArgs;
use crate::domain::{AliasTable, Ecosystem};
use crate::error::ConfigError;
use crate::manifest::ReadLimits;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the project settings file
pub const CONFIG_FILE_NAME: &str = "polydep.toml";

/// `[settings]` table of the project settings file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub read_timeout_secs: Option<u64>,
    pub max_manifest_bytes: Option<u64>,
    pub use_lockfiles: Option<bool>,
}

/// Contents of a project settings file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub settings: Settings,
    /// Canonical name to `<ecosystem>:<package>` entries
    pub aliases: BTreeMap<String, Vec<String>>,
}

impl SettingsFile {
    /// Parse settings file content; `path` is only used in errors
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load a settings file that must exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    /// Load `polydep.toml` from a project root, `None` if there is none
    pub fn from_dir(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        Self::load(&path).map(Some)
    }

    /// Build the alias table declared by `[aliases]`
    pub fn alias_table(&self) -> Result<AliasTable, ConfigError> {
        let mut table = AliasTable::new();
        for (canonical, entries) in &self.aliases {
            for entry in entries {
                let (ecosystem, package) = parse_alias(canonical, entry)?;
                table.insert(ecosystem, package, canonical.clone());
            }
        }
        Ok(table)
    }
}

/// Split `<ecosystem>:<package>`; the package part may itself contain `:`
/// (Maven coordinates)
pub fn parse_alias(name: &str, value: &str) -> Result<(Ecosystem, String), ConfigError> {
    let invalid = || ConfigError::InvalidAlias {
        name: name.to_string(),
        value: value.to_string(),
    };

    let (ecosystem, package) = value.split_once(':').ok_or_else(invalid)?;
    let package = package.trim();
    if package.is_empty() {
        return Err(invalid());
    }
    let ecosystem = ecosystem
        .parse::<Ecosystem>()
        .map_err(|_| ConfigError::InvalidEcosystem {
            value: ecosystem.to_string(),
        })?;

    Ok((ecosystem, package.to_string()))
}

/// Everything the orchestrator needs to run one analysis
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Analyzers to run, one per ecosystem
    pub registry: AnalyzerRegistry,
    /// Per-manifest read bounds
    pub limits: ReadLimits,
    /// Seed the version catalog from lockfiles
    pub use_lockfiles: bool,
    /// Cross-ecosystem aliases
    pub aliases: AliasTable,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            registry: AnalyzerRegistry::default(),
            limits: ReadLimits::default(),
            use_lockfiles: true,
            aliases: AliasTable::new(),
        }
    }
}

impl AnalysisConfig {
    pub fn with_limits(mut self, limits: ReadLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_lockfiles(mut self, use_lockfiles: bool) -> Self {
        self.use_lockfiles = use_lockfiles;
        self
    }

    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    /// Restrict analysis to the given ecosystems; an empty list keeps all
    pub fn with_ecosystems(mut self, ecosystems: &[Ecosystem]) -> Self {
        if !ecosystems.is_empty() {
            self.registry.retain(ecosystems);
        }
        self
    }

    /// Apply a settings file on top of the current values
    pub fn apply_settings(mut self, file: &SettingsFile) -> Result<Self, ConfigError> {
        if let Some(secs) = file.settings.read_timeout_secs {
            self.limits = self.limits.with_timeout(Duration::from_secs(secs));
        }
        if let Some(max_bytes) = file.settings.max_manifest_bytes {
            self.limits = self.limits.with_max_bytes(max_bytes);
        }
        if let Some(use_lockfiles) = file.settings.use_lockfiles {
            self.use_lockfiles = use_lockfiles;
        }
        self.aliases = file.alias_table()?;
        Ok(self)
    }

    /// Build the configuration for a CLI run
    pub fn from_cli(args: &CliArgs) -> Result<Self, ConfigError> {
        args.validate()?;
        if args.path.exists() && !args.path.is_dir() {
            return Err(ConfigError::InvalidPath {
                path: args.path.clone(),
                message: "not a directory".to_string(),
            });
        }

        let settings = match &args.config {
            Some(path) => Some(SettingsFile::load(path)?),
            None => SettingsFile::from_dir(&args.path)?,
        };

        let mut config = Self::default();
        if let Some(settings) = &settings {
            config = config.apply_settings(settings)?;
        }

        if let Some(secs) = args.timeout {
            config.limits = config.limits.with_timeout(Duration::from_secs(secs));
        }
        if args.no_lockfiles {
            config.use_lockfiles = false;
        }

        Ok(config.with_ecosystems(&args.ecosystem_filter()))
    }

    /// Settings file location a CLI run would read
    pub fn settings_path(args: &CliArgs) -> PathBuf {
        args.config
            .clone()
            .unwrap_or_else(|| args.path.join(CONFIG_FILE_NAME))
    }
}
