//! Python analyzer: requirements.txt and pyproject.toml

use super::Analyzer;
use crate::domain::Ecosystem;
use crate::manifest::{ManifestParser, PyprojectTomlParser, RequirementsTxtParser};

pub struct PythonAnalyzer;

impl Analyzer for PythonAnalyzer {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Python
    }

    fn parser_for(&self, file_name: &str) -> Option<Box<dyn ManifestParser>> {
        match file_name {
            "requirements.txt" => Some(Box::new(RequirementsTxtParser)),
            "pyproject.toml" => Some(Box::new(PyprojectTomlParser)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestFile;

    #[test]
    fn test_analyze_manifests() {
        let manifests = vec![
            ManifestFile::new("requirements.txt", "requests==2.28.0\nDjango>=4.0\n"),
            ManifestFile::new(
                "pyproject.toml",
                "[tool.poetry.dependencies]\npython = \"^3.10\"\nrequests = \"^2.31\"\n",
            ),
        ];

        let records = PythonAnalyzer.analyze_manifests(&manifests).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["requests", "django", "requests"]);
        assert!(records.iter().all(|r| r.ecosystem == Ecosystem::Python));
    }

    #[test]
    fn test_parser_for() {
        assert!(PythonAnalyzer.parser_for("requirements.txt").is_some());
        assert!(PythonAnalyzer.parser_for("setup.py").is_none());
    }
}
