use std::path::PathBuf;

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{Args, Parser, Subcommand};
use scorm::{ProtocolVersion, SessionConfig};

use crate::output::OutputFormat;

/// Colours for `--help` and usage errors.
const HELP_STYLES: Styles = Styles::styled()
	.header(AnsiColor::Yellow.on_default().bold())
	.usage(AnsiColor::Yellow.on_default().bold())
	.literal(AnsiColor::Green.on_default().bold())
	.placeholder(AnsiColor::Blue.on_default())
	.error(AnsiColor::Red.on_default().bold())
	.invalid(AnsiColor::Red.on_default());

#[derive(Parser, Debug)]
#[command(name = "scorm")]
#[command(about = "Replay LMS session scripts against an in-memory SCORM/AICC host")]
#[command(version)]
#[command(styles = HELP_STYLES)]
pub struct Cli {
	/// Increase verbosity (-v warnings, -vv session trace)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: text (default) or json
	#[arg(short = 'f', long, global = true, value_enum, default_value = "text")]
	pub format: OutputFormat,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Run a session script against the host described by a fixture file
	Run(RunArgs),

	/// Print the globals, methods and tracked fields of a protocol version
	Describe {
		/// Protocol version: 1.2, 2004 or AICC
		#[arg(value_parser = parse_version)]
		version: ProtocolVersion,
	},
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
	/// Fixture file (JSON)
	#[arg(value_name = "FIXTURE")]
	pub fixture: PathBuf,

	/// Pin discovery to one protocol version: 1.2, 2004 or AICC
	#[arg(long = "api-version", value_name = "VERSION", value_parser = parse_version)]
	pub api_version: Option<ProtocolVersion>,

	/// Do not mark fresh attempts incomplete on initialize
	#[arg(long)]
	pub no_completion_status: bool,

	/// Do not write an exit value on terminate
	#[arg(long)]
	pub no_exit_mode: bool,

	/// Make the host answer every last-error query with RAW
	#[arg(long, value_name = "RAW")]
	pub no_error_sentinel: Option<String>,
}

impl RunArgs {
	/// Applies the command-line overrides on top of the fixture's config.
	pub fn apply(&self, mut config: SessionConfig) -> SessionConfig {
		if let Some(version) = self.api_version {
			config.version = Some(version);
		}
		if self.no_completion_status {
			config.handle_completion_status = false;
		}
		if self.no_exit_mode {
			config.handle_exit_mode = false;
		}
		config
	}
}

fn parse_version(value: &str) -> Result<ProtocolVersion, String> {
	value.parse().map_err(|err: scorm_protocol::UnknownVersion| err.to_string())
}
