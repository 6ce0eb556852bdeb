//! Rust analyzer: Cargo.toml

use super::Analyzer;
use crate::domain::Ecosystem;
use crate::manifest::{CargoTomlParser, ManifestParser};

pub struct RustAnalyzer;

impl Analyzer for RustAnalyzer {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Rust
    }

    fn parser_for(&self, file_name: &str) -> Option<Box<dyn ManifestParser>> {
        match file_name {
            "Cargo.toml" => Some(Box::new(CargoTomlParser)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestFile;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_analyze_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("Cargo.toml"),
            "[package]\nname = \"x\"\n\n[dependencies]\nserde = \"1.0\"\n",
        )
        .unwrap();

        let records = RustAnalyzer.analyze(temp_dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "serde");
    }

    #[test]
    fn test_analyze_manifests_invalid_toml() {
        let result = RustAnalyzer.analyze_manifests(&[ManifestFile::new("Cargo.toml", "[deps")]);
        assert!(result.is_err());
    }
}
