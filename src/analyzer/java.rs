//! Java analyzer: pom.xml, build.gradle and build.gradle.kts

use super::Analyzer;
use crate::domain::Ecosystem;
use crate::manifest::{GradleParser, ManifestParser, PomXmlParser};

pub struct JavaAnalyzer;

impl Analyzer for JavaAnalyzer {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Java
    }

    fn parser_for(&self, file_name: &str) -> Option<Box<dyn ManifestParser>> {
        match file_name {
            "pom.xml" => Some(Box::new(PomXmlParser)),
            "build.gradle" | "build.gradle.kts" => Some(Box::new(GradleParser)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestFile;

    #[test]
    fn test_analyze_maven_and_gradle() {
        let pom = ManifestFile::new(
            "pom.xml",
            r#"<project>
    <dependencies>
        <dependency>
            <groupId>com.google.guava</groupId>
            <artifactId>guava</artifactId>
            <version>32.1.2-jre</version>
        </dependency>
    </dependencies>
</project>"#,
        );
        let gradle = ManifestFile::new(
            "build.gradle",
            "dependencies {\n    implementation 'com.google.guava:guava:31.1-jre'\n}\n",
        );

        let records = JavaAnalyzer.analyze_manifests(&[pom, gradle]).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.name == "com.google.guava:guava"));
        assert_ne!(records[0].source_manifest, records[1].source_manifest);
    }

    #[test]
    fn test_parser_for() {
        assert!(JavaAnalyzer.parser_for("build.gradle.kts").is_some());
        assert!(JavaAnalyzer.parser_for("settings.gradle").is_none());
    }
}
