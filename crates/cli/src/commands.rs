//! Command dispatch.

use scorm::ProtocolVersion;
use scorm_protocol::{AICC_DOCUMENT_GLOBAL, FieldMap, MethodTable};
use serde::Serialize;

use crate::cli::{Cli, Commands, RunArgs};
use crate::error::{CliError, Result};
use crate::fixture;
use crate::output::{self, CommandResult, OutputFormat};
use crate::run;

pub fn dispatch(cli: Cli) -> Result<()> {
	match cli.command {
		Commands::Run(args) => run_fixture(&args, cli.format),
		Commands::Describe { version } => {
			output::print_result(&CommandResult::success("describe", describe(version)), cli.format);
			Ok(())
		}
	}
}

fn run_fixture(args: &RunArgs, format: OutputFormat) -> Result<()> {
	let fixture = fixture::load(&args.fixture).map_err(|source| CliError::Fixture {
		path: args.fixture.clone(),
		source,
	})?;
	let config = args.apply(fixture.config.clone());
	let name = args.fixture.display().to_string();

	let report = run::run(&name, &fixture, config, args.no_error_sentinel.as_deref());
	let failed = report.failures();
	let checked = report.checked();

	match format {
		OutputFormat::Json => {
			let result = CommandResult::success("run", report).with_ok(failed == 0);
			output::print_result(&result, format);
		}
		OutputFormat::Text => output::print_report_text(&report),
	}

	if failed > 0 {
		return Err(CliError::ExpectationsFailed { failed, checked });
	}
	Ok(())
}

/// Names a protocol version uses on the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
	pub version: ProtocolVersion,
	/// Window global the API is published under.
	pub global: &'static str,
	pub methods: &'static MethodTable,
	pub fields: &'static FieldMap,
}

pub fn describe(version: ProtocolVersion) -> Description {
	Description {
		version,
		global: version.window_global().unwrap_or(AICC_DOCUMENT_GLOBAL),
		methods: version.methods(),
		fields: version.fields(),
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn describe_aicc_uses_document_global_and_lms_methods() {
		let value = serde_json::to_value(describe(ProtocolVersion::Aicc)).unwrap();
		assert_eq!(value["version"], json!("AICC"));
		assert_eq!(value["global"], json!("AICC_API"));
		assert_eq!(value["methods"]["begin"], json!("LMSInitialize"));
		assert_eq!(value["fields"]["completionStatus"], json!("cmi.core.lesson_status"));
		assert_eq!(value["fields"]["exit"], json!(null));
	}

	#[test]
	fn describe_2004() {
		let value = serde_json::to_value(describe(ProtocolVersion::Scorm2004)).unwrap();
		assert_eq!(value["global"], json!("API_1484_11"));
		assert_eq!(value["methods"]["getValue"], json!("GetValue"));
		assert_eq!(value["fields"]["normalExit"], json!("normal"));
	}
}
