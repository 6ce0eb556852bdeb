//! JavaScript analyzer: package.json

use super::Analyzer;
use crate::domain::Ecosystem;
use crate::manifest::{ManifestParser, PackageJsonParser};

pub struct JavaScriptAnalyzer;

impl Analyzer for JavaScriptAnalyzer {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::JavaScript
    }

    fn parser_for(&self, file_name: &str) -> Option<Box<dyn ManifestParser>> {
        match file_name {
            "package.json" => Some(Box::new(PackageJsonParser)),
            _ => None,
        }
    }
}
