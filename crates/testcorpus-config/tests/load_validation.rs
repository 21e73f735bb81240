//! Config file loading tests for testcorpus-config.
// crates/testcorpus-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Tests
// Description: Validate file limits, path resolution, and the shipped example.
// Purpose: Ensure loading fails closed and relative paths follow the file.
// =============================================================================

use std::fs;

use tempfile::TempDir;
use testcorpus_config::CorpusConfig;
use testcorpus_config::config_toml_example;

type TestResult = Result<(), String>;

#[test]
fn example_config_loads_from_disk() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("testcorpus.toml");
    fs::write(&path, config_toml_example()).map_err(|err| err.to_string())?;
    let config = CorpusConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if config.corpus_root() != dir.path().join("tests/suites") {
        return Err(format!("unexpected corpus root {}", config.corpus_root().display()));
    }
    if config.variants_root() != dir.path().join("tests/variants") {
        return Err(format!("unexpected variants root {}", config.variants_root().display()));
    }
    if config.report_path() != dir.path().join("tests/README.md") {
        return Err(format!("unexpected report path {}", config.report_path().display()));
    }
    if config.source.as_deref() != Some(path.as_path()) {
        return Err("source path should be recorded".to_string());
    }
    Ok(())
}

#[test]
fn missing_explicit_file_is_io_error() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    match CorpusConfig::load(Some(&dir.path().join("absent.toml"))) {
        Err(error) if error.to_string().contains("config io error") => Ok(()),
        Err(error) => Err(format!("unexpected error {error}")),
        Ok(_) => Err("missing config should fail".to_string()),
    }
}

#[test]
fn oversized_file_is_rejected() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("big.toml");
    let mut content = String::from("# padding\n");
    content.push_str(&"#".repeat(1024 * 1024 + 1));
    fs::write(&path, content).map_err(|err| err.to_string())?;
    match CorpusConfig::load(Some(&path)) {
        Err(error) if error.to_string().contains("size limit") => Ok(()),
        Err(error) => Err(format!("unexpected error {error}")),
        Ok(_) => Err("oversized config should fail".to_string()),
    }
}

#[test]
fn non_utf8_file_is_rejected() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("bad.toml");
    fs::write(&path, [0xff, 0xfe, 0x00]).map_err(|err| err.to_string())?;
    match CorpusConfig::load(Some(&path)) {
        Err(error) if error.to_string().contains("utf-8") => Ok(()),
        Err(error) => Err(format!("unexpected error {error}")),
        Ok(_) => Err("non-utf8 config should fail".to_string()),
    }
}

#[test]
fn invalid_toml_is_parse_error() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[corpus\nroot = 1").map_err(|err| err.to_string())?;
    match CorpusConfig::load(Some(&path)) {
        Err(error) if error.to_string().contains("config parse error") => Ok(()),
        Err(error) => Err(format!("unexpected error {error}")),
        Ok(_) => Err("broken config should fail".to_string()),
    }
}

#[test]
fn absolute_paths_are_kept() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let corpus = dir.path().join("elsewhere");
    let path = dir.path().join("nested").join("testcorpus.toml");
    fs::create_dir_all(dir.path().join("nested")).map_err(|err| err.to_string())?;
    let content = format!("[corpus]\nroot = \"{}\"\n", corpus.display().to_string().replace('\\', "/"));
    fs::write(&path, content).map_err(|err| err.to_string())?;
    let config = CorpusConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if config.corpus_root() != corpus {
        return Err(format!("unexpected corpus root {}", config.corpus_root().display()));
    }
    Ok(())
}
