//! pom.xml parser for Maven projects
//!
//! Handles:
//! - project/dependencies/dependency
//! - project/dependencyManagement versions, filling in dependencies that
//!   omit `<version>`
//! - `${property}` substitution from project/properties, plus the
//!   built-in `project.version`, `project.groupId` and
//!   `project.parent.version`
//!
//! A property that cannot be resolved leaves the `${...}` text in place,
//! which the Maven constraint parser keeps as an opaque pin.

use crate::domain::{push_merged, Constraint, DependencyRecord, Ecosystem};
use crate::error::ManifestError;
use crate::manifest::{ManifestFile, ManifestParser};
use crate::parser::{ConstraintParser, JavaConstraintParser};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;

/// Parser for pom.xml files
pub struct PomXmlParser;

// Nesting depth of property references
const MAX_INTERPOLATION_DEPTH: usize = 16;
// Longest expansion kept; anything longer stays unexpanded
const MAX_INTERPOLATED_LEN: usize = 4096;

#[derive(Debug, Default, Clone)]
struct PomDependency {
    group_id: String,
    artifact_id: String,
    version: Option<String>,
}

impl PomDependency {
    fn coordinate(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

#[derive(Debug, Default)]
struct Pom {
    properties: HashMap<String, String>,
    dependencies: Vec<PomDependency>,
    managed: Vec<PomDependency>,
}

impl Pom {
    fn managed_version(&self, dep: &PomDependency) -> Option<&str> {
        self.managed
            .iter()
            .find(|m| m.group_id == dep.group_id && m.artifact_id == dep.artifact_id)
            .and_then(|m| m.version.as_deref())
    }

    /// Replace every `${key}` whose key is known, expanding nested
    /// references
    ///
    /// A reference cycle or an oversized expansion returns `value` as
    /// written, so the `${...}` text stays opaque.
    fn interpolate(&self, value: &str) -> String {
        let mut expanding = Vec::new();
        self.expand(value, &mut expanding)
            .unwrap_or_else(|| value.to_string())
    }

    fn expand<'a>(&'a self, value: &str, expanding: &mut Vec<&'a str>) -> Option<String> {
        let mut output = String::with_capacity(value.len());
        let mut rest = value;

        while let Some(start) = rest.find("${") {
            output.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                output.push_str(&rest[start..]);
                rest = "";
                break;
            };
            let key = &after[..end];
            match self.properties.get_key_value(key) {
                Some((key, replacement)) => {
                    if expanding.contains(&key.as_str())
                        || expanding.len() >= MAX_INTERPOLATION_DEPTH
                    {
                        return None;
                    }
                    expanding.push(key);
                    let expanded = self.expand(replacement, expanding)?;
                    expanding.pop();
                    output.push_str(&expanded);
                }
                None => {
                    output.push_str("${");
                    output.push_str(key);
                    output.push('}');
                }
            }
            if output.len() > MAX_INTERPOLATED_LEN {
                return None;
            }
            rest = &after[end + 1..];
        }
        output.push_str(rest);

        (output.len() <= MAX_INTERPOLATED_LEN).then_some(output)
    }
}

fn read_pom(manifest: &ManifestFile) -> Result<Pom, ManifestError> {
    let mut reader = Reader::from_str(&manifest.content);
    reader.config_mut().trim_text(true);

    let mut pom = Pom::default();
    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut current: Option<PomDependency> = None;
    let mut saw_project = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                if path.is_empty() {
                    saw_project = tag == "project";
                }
                path.push(tag);
                text.clear();

                if is_dependency(&path) {
                    current = Some(PomDependency::default());
                }
            }
            Ok(Event::Empty(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                if path.is_empty() {
                    saw_project = tag == "project";
                } else if path == ["project", "properties"] {
                    pom.properties.insert(tag, String::new());
                }
            }
            Ok(Event::Text(ref e)) => {
                text = e
                    .unescape()
                    .map_err(|err| ManifestError::xml_parse_error(&manifest.path, err.to_string()))?
                    .into_owned();
            }
            Ok(Event::CData(ref e)) => {
                text = String::from_utf8_lossy(e.as_ref()).into_owned();
            }
            Ok(Event::End(_)) => {
                let value = std::mem::take(&mut text);
                record_element(&path, value, &mut pom, &mut current);

                if is_dependency(&path) {
                    if let Some(dep) = current.take() {
                        if path.len() == 4 {
                            pom.managed.push(dep);
                        } else {
                            pom.dependencies.push(dep);
                        }
                    }
                }
                path.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ManifestError::xml_parse_error(
                    &manifest.path,
                    format!("error at position {}: {}", reader.buffer_position(), e),
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    if !path.is_empty() {
        return Err(ManifestError::xml_parse_error(
            &manifest.path,
            format!("unexpected end of document inside <{}>", path.join(">")),
        ));
    }
    if !saw_project {
        return Err(ManifestError::xml_parse_error(
            &manifest.path,
            "missing <project> root element",
        ));
    }

    Ok(pom)
}

fn is_dependency(path: &[String]) -> bool {
    matches!(
        path_refs(path).as_slice(),
        ["project", "dependencies", "dependency"]
            | ["project", "dependencyManagement", "dependencies", "dependency"]
    )
}

fn path_refs(path: &[String]) -> Vec<&str> {
    path.iter().map(String::as_str).collect()
}

/// Store the text of a closing element where it belongs
fn record_element(
    path: &[String],
    value: String,
    pom: &mut Pom,
    current: &mut Option<PomDependency>,
) {
    match path_refs(path).as_slice() {
        ["project", "properties", key] => {
            pom.properties.insert(key.to_string(), value);
        }
        ["project", "version"] => {
            pom.properties.insert("project.version".to_string(), value);
        }
        ["project", "groupId"] => {
            pom.properties.insert("project.groupId".to_string(), value);
        }
        ["project", "artifactId"] => {
            pom.properties.insert("project.artifactId".to_string(), value);
        }
        ["project", "parent", "version"] => {
            pom.properties
                .insert("project.parent.version".to_string(), value);
        }
        ["project", "parent", "groupId"] => {
            pom.properties
                .insert("project.parent.groupId".to_string(), value);
        }
        [.., "dependency", field] => {
            if let Some(dep) = current.as_mut() {
                match *field {
                    "groupId" => dep.group_id = value,
                    "artifactId" => dep.artifact_id = value,
                    "version" => dep.version = Some(value),
                    _ => {}
                }
            }
        }
        _ => {}
    }
}

impl ManifestParser for PomXmlParser {
    fn parse(&self, manifest: &ManifestFile) -> Result<Vec<DependencyRecord>, ManifestError> {
        let mut pom = read_pom(manifest)?;

        // A child module inherits coordinates it does not declare
        for (own, inherited) in [
            ("project.version", "project.parent.version"),
            ("project.groupId", "project.parent.groupId"),
        ] {
            if !pom.properties.contains_key(own) {
                if let Some(value) = pom.properties.get(inherited).cloned() {
                    pom.properties.insert(own.to_string(), value);
                }
            }
        }

        let parser = JavaConstraintParser;
        let mut records = Vec::new();

        for dep in &pom.dependencies {
            let group_id = pom.interpolate(&dep.group_id);
            let artifact_id = pom.interpolate(&dep.artifact_id);
            if group_id.is_empty() || artifact_id.is_empty() {
                tracing::debug!(
                    dependency = %dep.coordinate(),
                    "skipping dependency without full coordinates"
                );
                continue;
            }

            let version = dep
                .version
                .as_deref()
                .or_else(|| pom.managed_version(dep))
                .map(|v| pom.interpolate(v));

            let constraint = match version {
                Some(v) => parser.parse(&v),
                None => Constraint::any(),
            };

            push_merged(
                &mut records,
                DependencyRecord::new(
                    format!("{}:{}", group_id, artifact_id),
                    Ecosystem::Java,
                    constraint,
                    &manifest.path,
                ),
            );
        }

        Ok(records)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Java
    }
}
