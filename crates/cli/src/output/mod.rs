//! Structured output envelope for all CLI commands.
//!
//! ## Output Contract
//!
//! With `--format json` every command prints one envelope on stdout:
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "ok": true,
//!   "command": "run",
//!   "data": { ... }
//! }
//! ```
//!
//! On failure:
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "ok": false,
//!   "command": "run",
//!   "error": {
//!     "code": "FIXTURE_INVALID",
//!     "message": "failed to load fixture session.json: ..."
//!   }
//! }
//! ```
//!
//! A run whose expectations did not all hold is still a complete report, so
//! it carries `data` and `ok: false` together.


use std::io::{self, Write};

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::run::{Report, StepOutcome};

/// Current schema version for command output.
pub const SCHEMA_VERSION: u32 = 1;

/// Output format for CLI results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text
	#[default]
	Text,
	/// JSON output
	Json,
}

/// The result envelope returned by all commands.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	pub schema_version: u32,

	/// Whether the command succeeded
	pub ok: bool,

	/// Command name (`run`, `describe`)
	pub command: String,

	/// Command-specific result data
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,

	/// Error information (only present on failure)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,
}

impl<T: Serialize> CommandResult<T> {
	pub fn success(command: &str, data: T) -> Self {
		Self {
			schema_version: SCHEMA_VERSION,
			ok: true,
			command: command.to_string(),
			data: Some(data),
			error: None,
		}
	}

	pub fn failure(command: &str, error: CommandError) -> Self {
		Self {
			schema_version: SCHEMA_VERSION,
			ok: false,
			command: command.to_string(),
			data: None,
			error: Some(error),
		}
	}

	/// Marks a completed result as failed without dropping its data.
	pub fn with_ok(mut self, ok: bool) -> Self {
		self.ok = ok;
		self
	}
}

/// Error information in a result envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandError {
	pub code: ErrorCode,
	pub message: String,
}

/// Stable error codes for machine consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	/// The fixture file could not be read, parsed or staged
	FixtureInvalid,
	/// One or more step expectations did not hold
	ExpectationFailed,
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let code = match self {
			ErrorCode::FixtureInvalid => "FIXTURE_INVALID",
			ErrorCode::ExpectationFailed => "EXPECTATION_FAILED",
		};
		f.write_str(code)
	}
}

/// Prints a command result in the requested format.
pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	match format {
		OutputFormat::Json => {
			if let Ok(json) = serde_json::to_string_pretty(result) {
				println!("{json}");
			}
		}
		OutputFormat::Text => print_result_text(result),
	}
}

fn print_result_text<T: Serialize>(result: &CommandResult<T>) {
	let mut stdout = io::stdout().lock();

	if let Some(ref data) = result.data {
		if let Ok(json) = serde_json::to_string_pretty(data) {
			let _ = writeln!(stdout, "{json}");
		}
	} else if let Some(ref error) = result.error {
		let _ = writeln!(stdout, "Error [{}]: {}", error.code, error.message);
	}
}

/// Prints a run report as an aligned step table.
pub fn print_report_text(report: &Report) {
	let mut stdout = io::stdout().lock();
	let _ = writeln!(stdout, "{}", render_report(report));
}

/// Renders a run report for humans.
pub fn render_report(report: &Report) -> String {
	let version = report
		.version
		.map(|version| version.to_string())
		.unwrap_or_else(|| "none".to_string());
	let mut lines = vec![format!(
		"{} {} (api version: {version}, active: {})",
		"run".bold(),
		report.fixture,
		report.active
	)];

	let width = report.steps.iter().map(|step| step.call.len()).max().unwrap_or(0);
	for step in &report.steps {
		lines.push(render_step(step, width));
	}

	let failed = report.failures();
	let summary = if failed == 0 {
		format!("{} expectations held", report.checked()).green().to_string()
	} else {
		format!("{failed} of {} expectations failed", report.checked())
			.red()
			.to_string()
	};
	lines.push(summary);
	lines.join("\n")
}

fn render_step(step: &StepOutcome, width: usize) -> String {
	let result = step.result.to_string();
	let verdict = match (&step.expected, step.passed) {
		(None, _) => String::new(),
		(Some(_), true) => "ok".green().to_string(),
		(Some(expected), false) => format!("{} (expected {expected})", "FAIL".red()),
	};
	format!("{:>3}. {:<width$}  {result}  {verdict}", step.index, step.call)
		.trim_end()
		.to_string()
}

/// Prints an error to stderr for humans.
pub fn print_error_stderr(error: &CommandError) {
	eprintln!("{} [{}]: {}", "Error".red().bold(), error.code, error.message);
}
