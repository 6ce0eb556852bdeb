//! Two-tier version model
//!
//! Every version string parses into a [`Version`]:
//! - `Semantic`: a full `MAJOR.MINOR.PATCH[-pre][+build]` value, including
//!   numeric partial forms (`1`, `1.2`) and PEP 440 style pre-releases
//!   (`1.0rc1`) that can be promoted by padding
//! - `Fallback`: anything else (`latest`, git refs, `5.0.0.RELEASE`),
//!   ordered lexicographically over the raw text
//!
//! Comparisons touching a fallback value are reported with
//! [`Confidence::Low`] so conflict reporting can discount them.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

// Numeric partial forms: 1, 1.2, 1.2.3, with optional pre-release/build
static PARTIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:-([0-9A-Za-z.-]+))?(?:\+([0-9A-Za-z.-]+))?$")
        .unwrap()
});

// PEP 440 pre-releases: 1.0rc1, 2.0.0a1, 3.1b2
static PEP440_PRE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?\.?(a|b|rc|alpha|beta)\.?(\d+)$").unwrap()
});

/// How much a comparison result can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Both sides were semantic versions
    High,
    /// At least one side was a fallback value compared lexicographically
    Low,
}

/// Result of comparing two versions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub ordering: Ordering,
    pub confidence: Confidence,
}

/// A parsed version value
#[derive(Debug, Clone)]
pub enum Version {
    /// Strict semantic version; `raw` keeps the text as declared
    Semantic { version: semver::Version, raw: String },
    /// Non-semantic text, ordered lexicographically
    Fallback(String),
}

impl Version {
    /// Parse a version string. Never fails: malformed input degrades to
    /// [`Version::Fallback`].
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let body = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);

        if let Ok(version) = semver::Version::parse(body) {
            return Version::Semantic {
                version,
                raw: trimmed.to_string(),
            };
        }

        if let Some(version) = promote(body) {
            return Version::Semantic {
                version,
                raw: trimmed.to_string(),
            };
        }

        Version::Fallback(trimmed.to_string())
    }

    /// Build a semantic version from its numeric components
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        let version = semver::Version::new(major, minor, patch);
        Version::Semantic {
            raw: version.to_string(),
            version,
        }
    }

    /// Returns true if this value is a strict semantic version
    pub fn is_semantic(&self) -> bool {
        matches!(self, Version::Semantic { .. })
    }

    /// Returns true if this value fell back to lexicographic ordering
    pub fn is_fallback(&self) -> bool {
        matches!(self, Version::Fallback(_))
    }

    /// The underlying semantic version, if any
    pub fn semver(&self) -> Option<&semver::Version> {
        match self {
            Version::Semantic { version, .. } => Some(version),
            Version::Fallback(_) => None,
        }
    }

    pub fn major(&self) -> Option<u64> {
        self.semver().map(|v| v.major)
    }

    pub fn minor(&self) -> Option<u64> {
        self.semver().map(|v| v.minor)
    }

    pub fn patch(&self) -> Option<u64> {
        self.semver().map(|v| v.patch)
    }

    /// Pre-release identifiers in order, empty for releases and fallbacks
    pub fn prerelease(&self) -> Vec<&str> {
        match self.semver() {
            Some(v) if !v.pre.is_empty() => v.pre.as_str().split('.').collect(),
            _ => Vec::new(),
        }
    }

    /// Build metadata, ignored for ordering
    pub fn build(&self) -> Option<&str> {
        match self.semver() {
            Some(v) if !v.build.is_empty() => Some(v.build.as_str()),
            _ => None,
        }
    }

    /// Returns true for semantic versions carrying pre-release identifiers
    pub fn is_prerelease(&self) -> bool {
        self.semver().is_some_and(|v| !v.pre.is_empty())
    }

    /// The text as it appeared in the manifest
    pub fn raw(&self) -> &str {
        match self {
            Version::Semantic { raw, .. } => raw,
            Version::Fallback(raw) => raw,
        }
    }

    /// The declared text without a leading `v`, as a fetcher expects it
    pub fn declared(&self) -> &str {
        match self {
            Version::Semantic { raw, .. } => raw.strip_prefix(['v', 'V']).unwrap_or(raw),
            Version::Fallback(raw) => raw,
        }
    }

    /// Compare two versions, reporting how trustworthy the result is
    pub fn compare(&self, other: &Version) -> Comparison {
        match (self, other) {
            (Version::Semantic { version: a, .. }, Version::Semantic { version: b, .. }) => {
                Comparison {
                    ordering: compare_semver(a, b),
                    confidence: Confidence::High,
                }
            }
            _ => Comparison {
                ordering: self.raw().cmp(other.raw()),
                confidence: Confidence::Low,
            },
        }
    }

    /// Ordering-only shorthand for [`Version::compare`]
    pub fn cmp_version(&self, other: &Version) -> Ordering {
        self.compare(other).ordering
    }

    /// Smallest version of the next major line (`2.0.0-0` for `1.x`)
    pub(crate) fn next_major_floor(&self) -> Option<Version> {
        self.semver()
            .map(|v| floor_of(semver::Version::new(v.major + 1, 0, 0)))
    }

    /// Smallest version of the next minor line (`1.3.0-0` for `1.2.x`)
    pub(crate) fn next_minor_floor(&self) -> Option<Version> {
        self.semver()
            .map(|v| floor_of(semver::Version::new(v.major, v.minor + 1, 0)))
    }

    /// Smallest version of the next patch (`0.0.4-0` for `0.0.3`)
    pub(crate) fn next_patch_floor(&self) -> Option<Version> {
        self.semver()
            .map(|v| floor_of(semver::Version::new(v.major, v.minor, v.patch + 1)))
    }

    /// Smallest pre-release of this release (`2.0.0-0` for `2.0.0`), or
    /// `None` when this already is a pre-release
    pub(crate) fn release_floor(&self) -> Option<Version> {
        self.semver()
            .filter(|v| v.pre.is_empty())
            .map(|v| floor_of(semver::Version::new(v.major, v.minor, v.patch)))
    }

    /// Returns true for the `X.Y.Z-0` bounds produced by the floor helpers
    pub(crate) fn is_floor(&self) -> bool {
        self.semver().is_some_and(|v| v.pre.as_str() == "0")
    }
}

/// The lowest possible pre-release of a version, used as an exclusive bound
fn floor_of(mut version: semver::Version) -> Version {
    version.pre = semver::Prerelease::new("0").unwrap_or(semver::Prerelease::EMPTY);
    Version::Semantic {
        raw: version.to_string(),
        version,
    }
}

fn compare_semver(a: &semver::Version, b: &semver::Version) -> Ordering {
    a.major
        .cmp(&b.major)
        .then(a.minor.cmp(&b.minor))
        .then(a.patch.cmp(&b.patch))
        .then_with(|| a.pre.cmp(&b.pre))
}

/// Promote numeric-looking partial forms to a full semantic version
fn promote(body: &str) -> Option<semver::Version> {
    if let Some(caps) = PARTIAL_RE.captures(body) {
        let part = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or("0");
        let mut text = format!(
            "{}.{}.{}",
            part(1).parse::<u64>().ok()?,
            part(2).parse::<u64>().ok()?,
            part(3).parse::<u64>().ok()?
        );
        if let Some(pre) = caps.get(4) {
            text.push('-');
            text.push_str(pre.as_str());
        }
        if let Some(build) = caps.get(5) {
            text.push('+');
            text.push_str(build.as_str());
        }
        return semver::Version::parse(&text).ok();
    }

    if let Some(caps) = PEP440_PRE_RE.captures(body) {
        let part = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or("0");
        let tag = match part(4) {
            "alpha" => "a",
            "beta" => "b",
            other => other,
        };
        let text = format!(
            "{}.{}.{}-{}.{}",
            part(1).parse::<u64>().ok()?,
            part(2).parse::<u64>().ok()?,
            part(3).parse::<u64>().ok()?,
            tag,
            part(5).parse::<u64>().ok()?
        );
        return semver::Version::parse(&text).ok();
    }

    None
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_version(other) == Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp_version(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Semantic { version, .. } => write!(f, "{}", version),
            Version::Fallback(raw) => write!(f, "{}", raw),
        }
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Version::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s)
    }

    #[test]
    fn test_parse_full_semver() {
        let version = v("1.2.3-beta.1+build.5");
        assert!(version.is_semantic());
        assert_eq!(version.major(), Some(1));
        assert_eq!(version.minor(), Some(2));
        assert_eq!(version.patch(), Some(3));
        assert_eq!(version.prerelease(), vec!["beta", "1"]);
        assert_eq!(version.build(), Some("build.5"));
    }

    #[test]
    fn test_parse_strips_v_prefix() {
        let version = v("v2.0.1");
        assert!(version.is_semantic());
        assert_eq!(version.to_string(), "2.0.1");
        assert_eq!(version.raw(), "v2.0.1");
    }

    #[test]
    fn test_parse_promotes_partial() {
        assert_eq!(v("1.0").to_string(), "1.0.0");
        assert_eq!(v("7").to_string(), "7.0.0");
        assert!(v("1.2-beta").is_prerelease());
        assert_eq!(v("01.2.3").to_string(), "1.2.3");
    }

    #[test]
    fn test_parse_promotes_pep440_prerelease() {
        let version = v("1.0rc1");
        assert!(version.is_semantic());
        assert_eq!(version.to_string(), "1.0.0-rc.1");
        assert_eq!(v("2.0.0a1").cmp_version(&v("2.0.0b1")), Ordering::Less);
    }

    #[test]
    fn test_parse_fallback() {
        for raw in ["latest", "5.0.0.RELEASE", "1.2.3.4", "git+https://x/y", ""] {
            assert!(v(raw).is_fallback(), "{raw} should be fallback");
        }
    }

    #[test]
    fn test_build_metadata_ignored() {
        let cmp = v("1.2.3+build1").compare(&v("1.2.3+build2"));
        assert_eq!(cmp.ordering, Ordering::Equal);
        assert_eq!(cmp.confidence, Confidence::High);
        assert_eq!(v("1.2.3+build1"), v("1.2.3"));
    }

    #[test]
    fn test_prerelease_below_release() {
        assert_eq!(v("1.0.0-alpha").cmp_version(&v("1.0.0")), Ordering::Less);
        assert_eq!(v("1.0.0").cmp_version(&v("1.0.0-rc.9")), Ordering::Greater);
    }

    #[test]
    fn test_prerelease_identifier_ordering() {
        // Precedence example chain from the semver specification
        let chain = [
            "1.0.0-alpha",
            "1.0.0-alpha.1",
            "1.0.0-alpha.beta",
            "1.0.0-beta",
            "1.0.0-beta.2",
            "1.0.0-beta.11",
            "1.0.0-rc.1",
            "1.0.0",
        ];
        for pair in chain.windows(2) {
            assert_eq!(
                v(pair[0]).cmp_version(&v(pair[1])),
                Ordering::Less,
                "{} < {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_numeric_components_compare_by_value() {
        assert_eq!(v("1.9.0").cmp_version(&v("1.10.0")), Ordering::Less);
        assert_eq!(v("10.0.0").cmp_version(&v("9.9.9")), Ordering::Greater);
    }

    #[test]
    fn test_total_order_over_semantic_versions() {
        let versions: Vec<Version> = [
            "0.0.1", "0.1.0", "1.0.0-alpha", "1.0.0", "1.0.1", "1.2.0", "2.0.0-rc.1", "2.0.0",
            "10.0.0",
        ]
        .iter()
        .map(|s| v(s))
        .collect();

        for a in &versions {
            for b in &versions {
                let ab = a.cmp_version(b);
                let ba = b.cmp_version(a);
                assert_eq!(ab, ba.reverse(), "antisymmetry for {a} / {b}");
                for c in &versions {
                    if ab == Ordering::Less && b.cmp_version(c) == Ordering::Less {
                        assert_eq!(a.cmp_version(c), Ordering::Less, "transitivity {a} {b} {c}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_fallback_comparison_is_low_confidence() {
        let cmp = v("latest").compare(&v("1.0.0"));
        assert_eq!(cmp.confidence, Confidence::Low);
        assert_eq!(cmp.ordering, "latest".cmp("1.0.0"));

        let cmp = v("5.0.0.RELEASE").compare(&v("5.0.0.RELEASE"));
        assert_eq!(cmp.ordering, Ordering::Equal);
        assert_eq!(cmp.confidence, Confidence::Low);
    }

    #[test]
    fn test_floors() {
        assert_eq!(v("1.2.3").next_major_floor().unwrap().to_string(), "2.0.0-0");
        assert_eq!(v("1.2.3").next_minor_floor().unwrap().to_string(), "1.3.0-0");
        assert_eq!(v("0.0.3").next_patch_floor().unwrap().to_string(), "0.0.4-0");
        assert!(v("2.0.0-alpha").cmp_version(&v("2.0.0-0")) == Ordering::Greater);
        assert!(v("latest").next_major_floor().is_none());
        assert!(v("1.2.3").next_minor_floor().unwrap().is_floor());
        assert!(!v("1.2.3").is_floor());
    }

    #[test]
    fn test_release_floor() {
        assert_eq!(v("2.0").release_floor().unwrap().to_string(), "2.0.0-0");
        assert!(v("2.0.0a1").cmp_version(&v("2.0").release_floor().unwrap()) == Ordering::Greater);
        assert!(v("2.0.0-rc.1").release_floor().is_none());
        assert!(v("latest").release_floor().is_none());
    }

    #[test]
    fn test_declared_text() {
        assert_eq!(v("31.1").declared(), "31.1");
        assert_eq!(v("31.1").to_string(), "31.1.0");
        assert_eq!(v("v1.2.3").declared(), "1.2.3");
        assert_eq!(v("1.0rc1").declared(), "1.0rc1");
        assert_eq!(v("5.0.0.RELEASE").declared(), "5.0.0.RELEASE");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&v("1.2.3+meta")).unwrap();
        assert_eq!(json, "\"1.2.3+meta\"");
        let parsed: Version = serde_json::from_str("\"latest\"").unwrap();
        assert!(parsed.is_fallback());
    }
}
