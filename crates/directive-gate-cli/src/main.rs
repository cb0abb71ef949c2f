// crates/directive-gate-cli/src/main.rs
// ============================================================================
// Module: Directive Gate CLI Entry Point
// Description: Command dispatcher for routing, metrics, and config workflows.
// Purpose: Provide a safe, localized CLI over the directive router.
// Dependencies: clap, directive-gate-core, directive-gate-config, serde, thiserror.
// ============================================================================

//! ## Overview
//! The Directive Gate CLI routes a JSON decision request through the
//! directive catalog, computes individual LTV/CAC metrics, lists the
//! catalog, and validates configuration. All user-facing strings are routed
//! through the i18n catalog. Inputs are untrusted: every file read is
//! bounded and every parse fails closed.
//!
//! Exit codes for `route`: 0 routed, 2 definitions stop (Gate 0), 3 blocked
//! on missing input, 4 ambiguous intent. Any I/O or config failure exits 1.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use directive_gate_cli::audit::sink_for;
use directive_gate_cli::render::directive_listing;
use directive_gate_cli::render::route_report;
use directive_gate_cli::t;
use directive_gate_config::DirectiveGateConfig;
use directive_gate_config::config_toml_example;
use directive_gate_core::CacInputs;
use directive_gate_core::CacResult;
use directive_gate_core::DecisionError;
use directive_gate_core::ExpectedOrder;
use directive_gate_core::LtvResult;
use directive_gate_core::MetricFormulaEngine;
use directive_gate_core::MetricInputs;
use directive_gate_core::OrderContribution;
use directive_gate_core::OrderProfile;
use directive_gate_core::RepeatProfile;
use directive_gate_core::RoutingDecision;
use directive_gate_core::RoutingRequest;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a routing request JSON input.
const MAX_REQUEST_BYTES: usize = 1024 * 1024;
/// Maximum size of a metric input JSON file.
const MAX_METRIC_INPUT_BYTES: usize = 256 * 1024;

// ============================================================================
// SECTION: Exit Codes
// ============================================================================

/// Gate 0 is closed; nothing ran.
const EXIT_DEFINITIONS_STOP: u8 = 2;
/// The route halted on missing input.
const EXIT_NEEDS_INPUT: u8 = 3;
/// Intent was ambiguous; a clarifying question is pending.
const EXIT_NEEDS_CLARIFICATION: u8 = 4;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "directive-gate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Route a decision request through the directive catalog.
    Route(RouteCommand),
    /// Compute a single LTV/CAC metric from a JSON input.
    Metrics {
        /// Selected metric.
        #[command(subcommand)]
        command: MetricsCommand,
    },
    /// Directive catalog utilities.
    Directives {
        /// Selected directives subcommand.
        #[command(subcommand)]
        command: DirectivesCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for routing.
#[derive(Args, Debug)]
struct RouteCommand {
    /// Path to the routing request JSON file.
    #[arg(long, value_name = "PATH")]
    request: PathBuf,
    /// Optional config file path (defaults to directive-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Output formats for reports.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum OutputFormat {
    /// Plain-text report.
    Text,
    /// Canonical JSON output.
    Json,
}

/// Metric subcommands.
#[derive(Subcommand, Debug)]
enum MetricsCommand {
    /// Per-order contribution from explicit cost fields.
    Contribution(MetricsArgs),
    /// Expected LTV over a horizon from inputs and a repeat profile.
    Ltv(MetricsArgs),
    /// Blended, per-channel, and usable CAC.
    Cac(MetricsArgs),
    /// Usable LTV over usable CAC against the guardrail ratio.
    Guardrail(MetricsArgs),
    /// Expand an order profile (fees, labor, overhead) into contribution.
    OrderProfile(MetricsArgs),
}

/// Arguments shared by metric subcommands.
#[derive(Args, Debug)]
struct MetricsArgs {
    /// Path to the metric input JSON file.
    #[arg(long, value_name = "PATH")]
    input: PathBuf,
    /// Optional config file path for policy constants.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Directive catalog subcommands.
#[derive(Subcommand, Debug)]
enum DirectivesCommand {
    /// List directives in declared order.
    List(DirectivesListCommand),
}

/// Arguments for directive listing.
#[derive(Args, Debug)]
struct DirectivesListCommand {
    /// Optional config file path for catalog overrides.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a configuration file.
    Validate(ConfigValidateCommand),
    /// Print the canonical example configuration.
    Example,
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to directive-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Metric Payloads
// ============================================================================

/// Input for the `metrics ltv` command.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LtvInput {
    /// Per-order cost fields.
    inputs: MetricInputs,
    /// Repeat-purchase profile.
    repeat_profile: RepeatProfile,
    /// Horizon in months.
    horizon_months: i64,
}

/// Output of the `metrics ltv` command.
#[derive(Debug, Serialize)]
struct LtvOutput {
    /// Per-order contribution.
    contribution: OrderContribution,
    /// Probability-weighted orders.
    expected_orders: Vec<ExpectedOrder>,
    /// Lifetime value over the horizon.
    ltv: LtvResult,
}

/// Input for the `metrics guardrail` command.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GuardrailInput {
    /// Usable LTV.
    usable_ltv: f64,
    /// Usable CAC.
    usable_cac: f64,
}

/// Output of the `metrics cac` command.
#[derive(Debug, Serialize)]
struct CacOutput {
    /// CAC result.
    cac: CacResult,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Route(command) => command_route(&command),
        Commands::Metrics {
            command,
        } => command_metrics(&command),
        Commands::Directives {
            command,
        } => command_directives(&command),
        Commands::Config {
            command,
        } => command_config(&command),
    }
}

/// Prints CLI help to stdout.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Route Command
// ============================================================================

/// Executes the `route` command.
fn command_route(command: &RouteCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let router =
        config.router().map_err(|err| CliError::new(t!("route.init_failed", error = err)))?;
    let kind = t!("input.kind.request");
    let request: RoutingRequest = read_json_with_limit(&command.request, &kind, MAX_REQUEST_BYTES)?;

    let sink = sink_for(&config.audit).map_err(|err| {
        CliError::new(t!(
            "audit.open_failed",
            path = config.audit.path.as_deref().unwrap_or_default(),
            error = err
        ))
    })?;
    let result = match &sink {
        Some(sink) => router.route_audited(&request, sink.as_ref(), config.audit_payloads()),
        None => router.route(&request),
    }
    .map_err(|err| CliError::new(t!("route.failed", error = err)))?;

    match command.format {
        OutputFormat::Text => {
            let report = route_report(&result, router.registry().catalog());
            write_stdout_bytes(report.as_bytes())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        OutputFormat::Json => write_canonical_json(&result, "routing result")?,
    }
    Ok(route_exit_code(&result.decision))
}

/// Maps a routing decision to the process exit code.
fn route_exit_code(decision: &RoutingDecision) -> ExitCode {
    match decision {
        RoutingDecision::DefinitionsStop {
            ..
        } => ExitCode::from(EXIT_DEFINITIONS_STOP),
        RoutingDecision::NeedsInput {
            ..
        } => ExitCode::from(EXIT_NEEDS_INPUT),
        RoutingDecision::NeedsClarification => ExitCode::from(EXIT_NEEDS_CLARIFICATION),
        RoutingDecision::Escalate {
            ..
        }
        | RoutingDecision::Stop {
            ..
        }
        | RoutingDecision::Unresolved {
            ..
        } => ExitCode::SUCCESS,
    }
}

// ============================================================================
// SECTION: Metrics Commands
// ============================================================================

/// Dispatches metric subcommands.
fn command_metrics(command: &MetricsCommand) -> CliResult<ExitCode> {
    let (MetricsCommand::Contribution(args)
    | MetricsCommand::Ltv(args)
    | MetricsCommand::Cac(args)
    | MetricsCommand::Guardrail(args)
    | MetricsCommand::OrderProfile(args)) = command;
    let config = load_config(args.config.as_deref())?;
    let engine = MetricFormulaEngine::new(config.policy);
    let kind = t!("input.kind.metrics");
    let metric_failed = |err: DecisionError| CliError::new(t!("metrics.failed", error = err));

    match command {
        MetricsCommand::Contribution(args) => {
            let inputs: MetricInputs =
                read_json_with_limit(&args.input, &kind, MAX_METRIC_INPUT_BYTES)?;
            let output = engine.compute_order_contribution(&inputs).map_err(metric_failed)?;
            write_canonical_json(&output, "contribution")?;
        }
        MetricsCommand::Ltv(args) => {
            let input: LtvInput = read_json_with_limit(&args.input, &kind, MAX_METRIC_INPUT_BYTES)?;
            let contribution =
                engine.compute_order_contribution(&input.inputs).map_err(metric_failed)?;
            let expected_orders = engine
                .expected_orders(&input.repeat_profile, contribution.contribution)
                .map_err(metric_failed)?;
            let ltv = engine
                .compute_expected_ltv(&expected_orders, input.horizon_months)
                .map_err(metric_failed)?;
            write_canonical_json(
                &LtvOutput {
                    contribution,
                    expected_orders,
                    ltv,
                },
                "ltv",
            )?;
        }
        MetricsCommand::Cac(args) => {
            let inputs: CacInputs =
                read_json_with_limit(&args.input, &kind, MAX_METRIC_INPUT_BYTES)?;
            let cac = engine.compute_cac(&inputs).map_err(metric_failed)?;
            write_canonical_json(
                &CacOutput {
                    cac,
                },
                "cac",
            )?;
        }
        MetricsCommand::Guardrail(args) => {
            let input: GuardrailInput =
                read_json_with_limit(&args.input, &kind, MAX_METRIC_INPUT_BYTES)?;
            let output = engine
                .guardrail_from_usable(input.usable_ltv, input.usable_cac)
                .map_err(metric_failed)?;
            write_canonical_json(&output, "guardrail")?;
        }
        MetricsCommand::OrderProfile(args) => {
            let profile: OrderProfile =
                read_json_with_limit(&args.input, &kind, MAX_METRIC_INPUT_BYTES)?;
            let output = engine.compute_order_profile(&profile).map_err(metric_failed)?;
            write_canonical_json(&output, "order profile")?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Directives Commands
// ============================================================================

/// Dispatches directive catalog subcommands.
fn command_directives(command: &DirectivesCommand) -> CliResult<ExitCode> {
    match command {
        DirectivesCommand::List(command) => {
            let config = load_config(command.config.as_deref())?;
            let catalog = config
                .directive_catalog()
                .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
            match command.format {
                OutputFormat::Text => write_stdout_bytes(directive_listing(&catalog).as_bytes())
                    .map_err(|err| CliError::new(output_error("stdout", &err)))?,
                OutputFormat::Json => write_canonical_json(&catalog.directives(), "directives")?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => {
            let _config = load_config(command.config.as_deref())?;
            write_stdout_line(&t!("config.validate.ok"))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        ConfigCommand::Example => {
            write_stdout_bytes(config_toml_example().as_bytes())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Loads configuration with the default resolution rules.
fn load_config(path: Option<&Path>) -> CliResult<DirectiveGateConfig> {
    DirectiveGateConfig::load(path)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

// ============================================================================
// SECTION: Bounded Input
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads and parses a bounded JSON input file.
fn read_json_with_limit<T: DeserializeOwned>(
    path: &Path,
    kind: &str,
    max_bytes: usize,
) -> CliResult<T> {
    let bytes = read_bytes_with_limit(path, max_bytes).map_err(|err| match err {
        ReadLimitError::Io(err) => CliError::new(t!(
            "input.read_failed",
            kind = kind,
            path = path.display(),
            error = err
        )),
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!(
            "input.read_too_large",
            kind = kind,
            path = path.display(),
            size = size,
            limit = limit
        )),
    })?;
    serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(t!("input.parse_failed", kind = kind, path = path.display(), error = err))
    })
}

// ============================================================================
// SECTION: Output
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes canonical JSON to stdout followed by a newline.
fn write_canonical_json<T: Serialize>(value: &T, kind: &str) -> CliResult<()> {
    let mut bytes = serde_jcs::to_vec(value)
        .map_err(|err| CliError::new(t!("output.serialize_failed", kind = kind, error = err)))?;
    bytes.push(b'\n');
    write_stdout_bytes(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
