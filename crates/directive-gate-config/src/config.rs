// crates/directive-gate-config/src/config.rs
// ============================================================================
// Module: Directive Gate Configuration
// Description: Configuration loading and validation for Directive Gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: directive-gate-core, serde, time, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! An explicitly named file must exist; when no path is given and the default
//! `directive-gate.toml` is absent, built-in defaults apply. Invalid
//! configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use directive_gate_core::AuditPayloads;
use directive_gate_core::DecisionRouter;
use directive_gate_core::DefinitionsStatus;
use directive_gate_core::DirectiveCatalog;
use directive_gate_core::DirectiveRegistry;
use directive_gate_core::DirectiveSpec;
use directive_gate_core::PolicyConstants;
use directive_gate_core::ScenarioSpec;
use directive_gate_core::builtin_directives;
use directive_gate_core::builtin_scenarios;
use serde::Deserialize;
use thiserror::Error;
use time::Date;
use time::Month;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "directive-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "DIRECTIVE_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of directives in a catalog override.
pub const MAX_CATALOG_DIRECTIVES: usize = 256;
/// Maximum number of scenario groups in a catalog override.
pub const MAX_CATALOG_SCENARIOS: usize = 256;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Directive Gate configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectiveGateConfig {
    /// LTV/CAC definitions status (Gate 0).
    #[serde(default)]
    pub definitions: DefinitionsConfig,
    /// Policy constants for formulas and gates.
    #[serde(default)]
    pub policy: PolicyConstants,
    /// Routing audit configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Optional directive catalog overrides.
    #[serde(default)]
    pub catalog: Option<CatalogConfig>,
    /// Path the configuration was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl DirectiveGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved.path)?;
        if !resolved.explicit && !resolved.path.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let bytes = fs::read(&resolved.path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.source_path = Some(resolved.path);
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.definitions.validate()?;
        self.policy.validate().map_err(|err| ConfigError::Invalid(format!("policy: {err}")))?;
        self.audit.validate()?;
        if let Some(catalog) = &self.catalog {
            catalog.validate()?;
        }
        Ok(())
    }

    /// Builds the directive catalog, applying any overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the resulting catalog is invalid.
    pub fn directive_catalog(&self) -> Result<DirectiveCatalog, ConfigError> {
        self.catalog.as_ref().map_or_else(
            || build_catalog(builtin_directives(), builtin_scenarios()),
            CatalogConfig::build,
        )
    }

    /// Builds a router over the configured catalog, policy, and definitions.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the catalog or policy is invalid.
    pub fn router(&self) -> Result<DecisionRouter, ConfigError> {
        let registry = DirectiveRegistry::new(self.directive_catalog()?);
        DecisionRouter::new(registry, self.policy, self.definitions.status)
            .map_err(|err| ConfigError::Invalid(format!("policy: {err}")))
    }

    /// Returns the audit payload policy.
    #[must_use]
    pub const fn audit_payloads(&self) -> AuditPayloads {
        AuditPayloads::from_include_payloads(self.audit.include_payloads)
    }
}

// ============================================================================
// SECTION: Definitions
// ============================================================================

/// LTV/CAC definitions configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefinitionsConfig {
    /// Whether the definitions are authoritative.
    #[serde(default)]
    pub status: DefinitionsStatus,
    /// Date the definitions were last reviewed (`YYYY-MM-DD`).
    #[serde(default)]
    pub reviewed_on: Option<String>,
}

impl DefinitionsConfig {
    /// Validates the review date against the calendar.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(reviewed_on) = &self.reviewed_on
            && parse_review_date(reviewed_on).is_none()
        {
            return Err(ConfigError::Invalid(
                "definitions.reviewed_on must be a YYYY-MM-DD date".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Routing audit configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Emit one structured audit event per routing call.
    #[serde(default)]
    pub enabled: bool,
    /// Optional audit log path (JSON lines); stderr when absent.
    #[serde(default)]
    pub path: Option<String>,
    /// Include raw request/result payloads (explicit opt-in).
    #[serde(default)]
    pub include_payloads: bool,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        if !self.enabled && (self.path.is_some() || self.include_payloads) {
            return Err(ConfigError::Invalid(
                "audit.path and audit.include_payloads require audit.enabled = true".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Catalog Overrides
// ============================================================================

/// Replacement directive and scenario tables.
///
/// # Invariants
/// - A missing table falls back to the built-in table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Replacement directives in declared (tie-break) order.
    #[serde(default)]
    pub directives: Option<Vec<DirectiveSpec>>,
    /// Replacement scenario groups.
    #[serde(default)]
    pub scenarios: Option<Vec<ScenarioSpec>>,
}

impl CatalogConfig {
    /// Validates table sizes and builds the catalog once.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.directives.as_ref().is_some_and(|d| d.len() > MAX_CATALOG_DIRECTIVES) {
            return Err(ConfigError::Invalid(format!(
                "catalog.directives exceeds {MAX_CATALOG_DIRECTIVES} entries"
            )));
        }
        if self.scenarios.as_ref().is_some_and(|s| s.len() > MAX_CATALOG_SCENARIOS) {
            return Err(ConfigError::Invalid(format!(
                "catalog.scenarios exceeds {MAX_CATALOG_SCENARIOS} entries"
            )));
        }
        self.build().map(|_| ())
    }

    /// Builds a validated catalog from the overrides.
    fn build(&self) -> Result<DirectiveCatalog, ConfigError> {
        let directives = self.directives.clone().unwrap_or_else(builtin_directives);
        let scenarios = self.scenarios.clone().unwrap_or_else(builtin_scenarios);
        build_catalog(directives, scenarios)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolved config path and whether it was named explicitly.
struct ResolvedPath {
    /// Path to read.
    path: PathBuf,
    /// True when supplied by the caller or the environment.
    explicit: bool,
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<ResolvedPath, ConfigError> {
    if let Some(path) = path {
        return Ok(ResolvedPath {
            path: path.to_path_buf(),
            explicit: true,
        });
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(ResolvedPath {
            path: PathBuf::from(env_path),
            explicit: true,
        });
    }
    Ok(ResolvedPath {
        path: PathBuf::from(DEFAULT_CONFIG_NAME),
        explicit: false,
    })
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Parses a `YYYY-MM-DD` calendar date, rejecting days the month does not have.
fn parse_review_date(value: &str) -> Option<Date> {
    let mut parts = value.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return None;
    }
    if ![year, month, day].iter().all(|part| part.bytes().all(|byte| byte.is_ascii_digit())) {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
    let day: u8 = day.parse().ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

/// Builds a catalog and maps validation failures into config errors.
fn build_catalog(
    directives: Vec<DirectiveSpec>,
    scenarios: Vec<ScenarioSpec>,
) -> Result<DirectiveCatalog, ConfigError> {
    DirectiveCatalog::new(directives, scenarios)
        .map_err(|err| ConfigError::Invalid(format!("catalog: {err}")))
}
