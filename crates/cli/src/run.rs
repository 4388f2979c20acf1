//! Session script execution.

use scorm::{ProtocolVersion, Session, SessionConfig};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::fixture::{Call, Fixture};

/// What one step returned, and whether that matched its expectation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
	/// 1-based position in the script.
	pub index: usize,
	pub call: String,
	pub result: Value,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub expected: Option<Value>,
	pub passed: bool,
}

/// A call the in-memory LMS received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostCallRecord {
	pub method: String,
	pub args: Vec<String>,
}

/// Outcome of a whole script.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
	pub fixture: String,
	/// Protocol version the session settled on.
	pub version: Option<ProtocolVersion>,
	/// Whether the session was still connected after the last step.
	pub active: bool,
	pub steps: Vec<StepOutcome>,
	/// Every call the LMS received, in order.
	pub host_calls: Vec<HostCallRecord>,
}

impl Report {
	/// Number of steps that carried an expectation.
	pub fn checked(&self) -> usize {
		self.steps.iter().filter(|step| step.expected.is_some()).count()
	}

	/// Number of expectations that did not hold.
	pub fn failures(&self) -> usize {
		self.steps.iter().filter(|step| !step.passed).count()
	}
}

/// Runs the fixture's script with `config` against its staged host.
pub fn run(name: &str, fixture: &Fixture, config: SessionConfig, sentinel: Option<&str>) -> Report {
	let stage = fixture.host.stage();
	if let (Some(lms), Some(raw)) = (&stage.lms, sentinel) {
		lms.force_last_error(raw);
	}

	info!(fixture = name, steps = fixture.steps.len(), "running session script");
	let mut session = Session::new(stage.root(), config);

	let steps: Vec<StepOutcome> = fixture
		.steps
		.iter()
		.enumerate()
		.map(|(i, step)| {
			let result = execute(&mut session, &step.call);
			let passed = step.expect.as_ref().is_none_or(|expected| *expected == result);
			debug!(index = i + 1, call = %step.call.label(), %result, passed, "step done");
			StepOutcome {
				index: i + 1,
				call: step.call.label(),
				result,
				expected: step.expect.clone(),
				passed,
			}
		})
		.collect();

	let host_calls: Vec<HostCallRecord> = stage
		.lms
		.as_ref()
		.map(|lms| {
			lms.calls()
				.into_iter()
				.map(|call| HostCallRecord {
					method: call.method,
					args: call.args,
				})
				.collect()
		})
		.unwrap_or_default();

	Report {
		fixture: name.to_string(),
		version: session.version(),
		active: session.is_active(),
		steps,
		host_calls,
	}
}

/// Performs one call through the session's public boundary forms.
fn execute(session: &mut Session, call: &Call) -> Value {
	match call {
		Call::Initialize => json!(session.connection().initialize()),
		Call::Terminate => json!(session.connection().terminate()),
		Call::Get { field } => json!(session.data().get(field)),
		Call::Set { field, value } => json!(session.data().set(field, value)),
		Call::Save => json!(session.data().save()),
		Call::Status { action, value } => match session.status_str(action, value.as_deref()) {
			scorm::StatusReply::Value(value) => json!(value),
			scorm::StatusReply::Written(ok) => json!(ok),
		},
		Call::GetCode => json!(session.debug().get_code()),
		Call::GetInfo { code } => json!(session.debug().get_info(*code)),
		Call::GetDiagnostic { code } => json!(session.debug().get_diagnostic(*code)),
	}
}
