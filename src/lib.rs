//! polydep - Multi-ecosystem dependency conflict detector library
//!
//! This library normalizes dependency manifests from several ecosystems
//! into one canonical model, detects version conflicts within and across
//! them, and resolves one version per package:
//! - Python (requirements.txt, pyproject.toml)
//! - JavaScript (package.json)
//! - Java (pom.xml, build.gradle)
//! - Rust (Cargo.toml)

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod progress;
pub mod resolve;
