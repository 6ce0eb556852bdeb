//! Ecosystem definitions for supported package managers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported language ecosystems
///
/// The declaration order is the deterministic merge order used when
/// per-ecosystem record lists are combined into one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// Python (requirements.txt, pyproject.toml)
    Python,
    /// JavaScript (package.json)
    JavaScript,
    /// Java (pom.xml, build.gradle)
    Java,
    /// Rust (Cargo.toml)
    Rust,
}

impl Ecosystem {
    /// Returns the manifest filenames this ecosystem reads, in priority order
    pub fn manifest_filenames(&self) -> &'static [&'static str] {
        match self {
            Ecosystem::Python => &["requirements.txt", "pyproject.toml"],
            Ecosystem::JavaScript => &["package.json"],
            Ecosystem::Java => &["pom.xml", "build.gradle", "build.gradle.kts"],
            Ecosystem::Rust => &["Cargo.toml"],
        }
    }

    /// Returns the lock filenames that can seed the version catalog
    pub fn lock_filenames(&self) -> &'static [&'static str] {
        match self {
            Ecosystem::Python => &[],
            Ecosystem::JavaScript => &["package-lock.json"],
            Ecosystem::Java => &[],
            Ecosystem::Rust => &["Cargo.lock"],
        }
    }

    /// Returns the identifier used in config files and JSON output
    pub fn id(&self) -> &'static str {
        match self {
            Ecosystem::Python => "python",
            Ecosystem::JavaScript => "javascript",
            Ecosystem::Java => "java",
            Ecosystem::Rust => "rust",
        }
    }

    /// Returns the display name for this ecosystem
    pub fn display_name(&self) -> &'static str {
        match self {
            Ecosystem::Python => "Python",
            Ecosystem::JavaScript => "JavaScript",
            Ecosystem::Java => "Java",
            Ecosystem::Rust => "Rust",
        }
    }

    /// Returns all supported ecosystems in merge order
    pub fn all() -> &'static [Ecosystem] {
        &[
            Ecosystem::Python,
            Ecosystem::JavaScript,
            Ecosystem::Java,
            Ecosystem::Rust,
        ]
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Ecosystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Ecosystem::Python),
            "javascript" | "js" | "node" | "npm" => Ok(Ecosystem::JavaScript),
            "java" | "maven" | "gradle" => Ok(Ecosystem::Java),
            "rust" | "cargo" => Ok(Ecosystem::Rust),
            other => Err(format!("unknown ecosystem '{}'", other)),
        }
    }
}
