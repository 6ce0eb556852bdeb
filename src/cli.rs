//! CLI argument parsing module for polydep

use crate::domain::Ecosystem;
use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;

/// Parse a read timeout in whole seconds, optionally suffixed with `s`
fn parse_timeout(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let digits = s.strip_suffix('s').unwrap_or(s);
    if digits.is_empty() {
        return Err("empty timeout".to_string());
    }

    let secs: u64 = digits
        .parse()
        .map_err(|_| format!("invalid timeout: {}", s))?;
    if secs == 0 {
        return Err("timeout must be at least 1 second".to_string());
    }
    Ok(secs)
}

/// Multi-ecosystem dependency conflict detector
#[derive(Parser, Debug, Clone)]
#[command(
    name = "polydep",
    version,
    about = "Detect and resolve dependency version conflicts across Python, JavaScript, Java and Rust manifests"
)]
pub struct CliArgs {
    /// Project directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // General options
    /// Enable verbose output (debug logging on stderr)
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Ecosystem filters
    /// Analyze only Python (requirements.txt, pyproject.toml) manifests
    #[arg(long)]
    pub python: bool,

    /// Analyze only JavaScript (package.json) manifests
    #[arg(long)]
    pub javascript: bool,

    /// Analyze only Java (pom.xml, build.gradle) manifests
    #[arg(long)]
    pub java: bool,

    /// Analyze only Rust (Cargo.toml) manifests
    #[arg(long = "rust")]
    pub rust_lang: bool,

    // Analysis options
    /// Do not read lockfiles for known versions
    #[arg(long)]
    pub no_lockfiles: bool,

    /// Settings file to use instead of <PATH>/polydep.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Per-manifest read timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = parse_timeout)]
    pub timeout: Option<u64>,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// Check if any ecosystem filter is specified
    pub fn has_ecosystem_filter(&self) -> bool {
        self.python || self.javascript || self.java || self.rust_lang
    }

    /// Check if a specific ecosystem should be analyzed
    pub fn should_process_ecosystem(&self, ecosystem: Ecosystem) -> bool {
        if !self.has_ecosystem_filter() {
            return true;
        }
        match ecosystem {
            Ecosystem::Python => self.python,
            Ecosystem::JavaScript => self.javascript,
            Ecosystem::Java => self.java,
            Ecosystem::Rust => self.rust_lang,
        }
    }

    /// Ecosystems selected by filter flags; empty when no filter is given
    pub fn ecosystem_filter(&self) -> Vec<Ecosystem> {
        if !self.has_ecosystem_filter() {
            return Vec::new();
        }
        Ecosystem::all()
            .iter()
            .copied()
            .filter(|e| self.should_process_ecosystem(*e))
            .collect()
    }

    /// Reject flag combinations that contradict each other
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.verbose && self.quiet {
            return Err(ConfigError::ConflictingOptions {
                message: "--verbose and --quiet cannot be used together".to_string(),
            });
        }
        Ok(())
    }

    /// Spinners are off in quiet and JSON runs
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["polydep"]);
        assert_eq!(args.path, PathBuf::from("."));
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(!args.python);
        assert!(!args.javascript);
        assert!(!args.java);
        assert!(!args.rust_lang);
        assert!(!args.no_lockfiles);
        assert!(args.config.is_none());
        assert!(args.timeout.is_none());
        assert!(!args.json);
    }

    #[test]
    fn test_path_argument() {
        let args = CliArgs::parse_from(["polydep", "/some/path"]);
        assert_eq!(args.path, PathBuf::from("/some/path"));
    }

    #[test]
    fn test_quiet_flags() {
        let args = CliArgs::parse_from(["polydep", "-q"]);
        assert!(args.quiet);

        let args = CliArgs::parse_from(["polydep", "--quiet"]);
        assert!(args.quiet);
    }

    #[test]
    fn test_ecosystem_filters() {
        let args = CliArgs::parse_from(["polydep", "--python"]);
        assert!(args.python);
        assert!(!args.javascript);

        let args = CliArgs::parse_from(["polydep", "--javascript"]);
        assert!(args.javascript);

        let args = CliArgs::parse_from(["polydep", "--java"]);
        assert!(args.java);

        let args = CliArgs::parse_from(["polydep", "--rust"]);
        assert!(args.rust_lang);
    }

    #[test]
    fn test_should_process_ecosystem() {
        let args = CliArgs::parse_from(["polydep"]);
        for ecosystem in Ecosystem::all() {
            assert!(args.should_process_ecosystem(*ecosystem));
        }
        assert!(args.ecosystem_filter().is_empty());

        let args = CliArgs::parse_from(["polydep", "--java", "--python"]);
        assert!(args.should_process_ecosystem(Ecosystem::Python));
        assert!(args.should_process_ecosystem(Ecosystem::Java));
        assert!(!args.should_process_ecosystem(Ecosystem::JavaScript));
        assert!(!args.should_process_ecosystem(Ecosystem::Rust));
        assert_eq!(
            args.ecosystem_filter(),
            vec![Ecosystem::Python, Ecosystem::Java]
        );
    }

    #[test]
    fn test_timeout() {
        let args = CliArgs::parse_from(["polydep", "--timeout", "10"]);
        assert_eq!(args.timeout, Some(10));

        let args = CliArgs::parse_from(["polydep", "--timeout", "3s"]);
        assert_eq!(args.timeout, Some(3));

        assert!(CliArgs::try_parse_from(["polydep", "--timeout", "0"]).is_err());
    }

    #[test]
    fn test_parse_timeout_invalid() {
        assert!(parse_timeout("").is_err());
        assert!(parse_timeout("s").is_err());
        assert!(parse_timeout("abc").is_err());
        assert!(parse_timeout("-1").is_err());
        assert!(parse_timeout("0").is_err());
    }

    #[test]
    fn test_config_flag() {
        let args = CliArgs::parse_from(["polydep", "--config", "custom.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn test_validate_conflicting_verbosity() {
        let args = CliArgs::parse_from(["polydep", "--verbose", "--quiet"]);
        assert!(matches!(
            args.validate(),
            Err(ConfigError::ConflictingOptions { .. })
        ));

        let args = CliArgs::parse_from(["polydep", "--verbose"]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_show_progress() {
        assert!(CliArgs::parse_from(["polydep"]).show_progress());
        assert!(!CliArgs::parse_from(["polydep", "--json"]).show_progress());
        assert!(!CliArgs::parse_from(["polydep", "-q"]).show_progress());
    }

    #[test]
    fn test_combined_flags() {
        let args = CliArgs::parse_from([
            "polydep",
            "/path/to/project",
            "--verbose",
            "--javascript",
            "--rust",
            "--no-lockfiles",
            "--json",
        ]);
        assert_eq!(args.path, PathBuf::from("/path/to/project"));
        assert!(args.verbose);
        assert!(args.javascript);
        assert!(args.rust_lang);
        assert!(!args.python);
        assert!(args.no_lockfiles);
        assert!(args.json);
    }
}
