//! Load validation tests for directive-gate-config.
// crates/directive-gate-config/tests/load_validation.rs
// =============================================================================
// Module: Load Validation Tests
// Description: File loading limits, parse failures, and default resolution.
// Purpose: Ensure config loading fails closed on malformed or oversized input.
// =============================================================================

use std::fs;
use std::path::PathBuf;

use directive_gate_config::ConfigError;
use directive_gate_config::DirectiveGateConfig;
use directive_gate_config::MAX_CONFIG_FILE_SIZE;
use directive_gate_config::MAX_PATH_COMPONENT_LENGTH;
use directive_gate_config::config_toml_example;
use directive_gate_core::AuditPayloads;
use directive_gate_core::DefinitionsStatus;

mod common;

use common::TestResult;
use common::assert_invalid;

/// Writes a config file into a temp dir and returns its path.
fn write_config(dir: &tempfile::TempDir, contents: &[u8]) -> Result<PathBuf, String> {
    let path = dir.path().join("directive-gate.toml");
    fs::write(&path, contents).map_err(|err| err.to_string())?;
    Ok(path)
}

// ============================================================================
// SECTION: Successful Loads
// ============================================================================

#[test]
fn example_config_loads_and_validates() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write_config(&dir, config_toml_example().as_bytes())?;
    let config = DirectiveGateConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if config.definitions.status != DefinitionsStatus::Current {
        return Err("expected current definitions".to_string());
    }
    if config.definitions.reviewed_on.as_deref() != Some("2026-01-15") {
        return Err("expected reviewed_on to round-trip".to_string());
    }
    if !config.audit.enabled || config.audit_payloads() != AuditPayloads::HashOnly {
        return Err("expected hash-only audit enabled".to_string());
    }
    if config.source_path.as_deref() != Some(path.as_path()) {
        return Err("expected source path to be recorded".to_string());
    }
    Ok(())
}

#[test]
fn empty_config_uses_defaults() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write_config(&dir, b"")?;
    let config = DirectiveGateConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if (config.policy.guardrail_ratio - 12.0).abs() > f64::EPSILON {
        return Err(format!("unexpected guardrail ratio {}", config.policy.guardrail_ratio));
    }
    if config.audit.enabled || config.catalog.is_some() {
        return Err("expected audit disabled and no catalog overrides".to_string());
    }
    Ok(())
}

#[test]
fn outdated_definitions_parse() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write_config(&dir, b"[definitions]\nstatus = \"outdated\"\n")?;
    let config = DirectiveGateConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if config.definitions.status != DefinitionsStatus::Outdated {
        return Err("expected outdated definitions".to_string());
    }
    Ok(())
}

// ============================================================================
// SECTION: Failures
// ============================================================================

#[test]
fn explicit_missing_file_is_io_error() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    match DirectiveGateConfig::load(Some(&path)) {
        Err(ConfigError::Io(_)) => Ok(()),
        Err(other) => Err(format!("expected io error, got {other}")),
        Ok(_) => Err("expected missing file to fail".to_string()),
    }
}

#[test]
fn oversized_file_is_rejected() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let mut contents = b"# padding\n".to_vec();
    contents.resize(MAX_CONFIG_FILE_SIZE + 1, b' ');
    let path = write_config(&dir, &contents)?;
    assert_invalid(DirectiveGateConfig::load(Some(&path)), "exceeds size limit")
}

#[test]
fn non_utf8_file_is_rejected() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write_config(&dir, &[0xff, 0xfe, 0x00])?;
    assert_invalid(DirectiveGateConfig::load(Some(&path)), "utf-8")
}

#[test]
fn malformed_toml_is_parse_error() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write_config(&dir, b"[policy\nguardrail_ratio = ")?;
    match DirectiveGateConfig::load(Some(&path)) {
        Err(ConfigError::Parse(_)) => Ok(()),
        Err(other) => Err(format!("expected parse error, got {other}")),
        Ok(_) => Err("expected malformed toml to fail".to_string()),
    }
}

#[test]
fn unknown_sections_are_rejected() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write_config(&dir, b"[server]\nmode = \"strict\"\n")?;
    match DirectiveGateConfig::load(Some(&path)) {
        Err(ConfigError::Parse(message)) if message.contains("server") => Ok(()),
        Err(other) => Err(format!("expected parse error naming server, got {other}")),
        Ok(_) => Err("expected unknown section to fail".to_string()),
    }
}

#[test]
fn long_path_component_is_rejected() -> TestResult {
    let long = "a".repeat(MAX_PATH_COMPONENT_LENGTH + 1);
    let path = PathBuf::from(format!("{long}.toml"));
    assert_invalid(DirectiveGateConfig::load(Some(&path)), "component too long")
}

#[test]
fn bad_review_date_is_rejected() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = write_config(&dir, b"[definitions]\nreviewed_on = \"last spring\"\n")?;
    assert_invalid(DirectiveGateConfig::load(Some(&path)), "definitions.reviewed_on")
}
