//! Fixture files: a mock host layout plus a session script.
//!
//! ```json
//! {
//!   "config": { "handleExitMode": false },
//!   "host": {
//!     "version": "2004",
//!     "depth": 2,
//!     "placement": "ancestor",
//!     "values": { "cmi.location": "page-3" },
//!     "failures": { "Commit": { "reject": 391 } },
//!     "lastError": null
//!   },
//!   "steps": [
//!     { "op": "initialize", "expect": true },
//!     { "op": "get", "field": "cmi.location", "expect": "page-3" },
//!     { "op": "terminate" }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, ensure};
use scorm::testing::{MockFailure, MockFrame, MockLms};
use scorm::{HostFrame, ProtocolVersion, SessionConfig};
use scorm_protocol::AICC_DOCUMENT_GLOBAL;
use serde::Deserialize;
use serde_json::Value;

/// Deepest frame chain a fixture may ask for.
pub const MAX_DEPTH: usize = 4096;

/// A parsed fixture file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Fixture {
	/// Session configuration; command-line flags override it.
	#[serde(default)]
	pub config: SessionConfig,
	#[serde(default)]
	pub host: HostFixture,
	#[serde(default)]
	pub steps: Vec<Step>,
}

/// Where the in-memory LMS lives and how it behaves.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HostFixture {
	/// Protocol the LMS speaks; absent means no LMS at all.
	pub version: Option<ProtocolVersion>,
	/// Number of frames between the content and the LMS frame.
	#[serde(default)]
	pub depth: usize,
	#[serde(default)]
	pub placement: Placement,
	/// Data-model values seeded before the session starts.
	#[serde(default)]
	pub values: BTreeMap<String, String>,
	/// Failures injected per host method name.
	#[serde(default)]
	pub failures: BTreeMap<String, FailureSpec>,
	/// Raw answer for every last-error query.
	pub last_error: Option<String>,
}

/// Which window the LMS is reachable from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
	/// The top of the content's parent chain.
	#[default]
	Ancestor,
	/// The top of the opener window's parent chain.
	Opener,
}

/// Fixture form of [`MockFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureSpec {
	Reject(u32),
	AcceptWithError(u32),
	Silent,
}

impl From<FailureSpec> for MockFailure {
	fn from(spec: FailureSpec) -> Self {
		match spec {
			FailureSpec::Reject(code) => MockFailure::Reject(code),
			FailureSpec::AcceptWithError(code) => MockFailure::AcceptWithError(code),
			FailureSpec::Silent => MockFailure::Silent,
		}
	}
}

/// One scripted call and, optionally, what it should return.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
	#[serde(flatten)]
	pub call: Call,
	#[serde(default)]
	pub expect: Option<Value>,
}

/// A public session operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Call {
	Initialize,
	Terminate,
	Get { field: String },
	Set { field: String, value: String },
	Save,
	Status { action: String, value: Option<String> },
	GetCode,
	GetInfo { code: i64 },
	GetDiagnostic { code: i64 },
}

impl Call {
	/// Short human label, e.g. `set cmi.location=3`.
	pub fn label(&self) -> String {
		match self {
			Call::Initialize => "initialize".to_string(),
			Call::Terminate => "terminate".to_string(),
			Call::Get { field } => format!("get {field}"),
			Call::Set { field, value } => format!("set {field}={value}"),
			Call::Save => "save".to_string(),
			Call::Status { action, value: Some(value) } => format!("status {action} {value}"),
			Call::Status { action, value: None } => format!("status {action}"),
			Call::GetCode => "getCode".to_string(),
			Call::GetInfo { code } => format!("getInfo {code}"),
			Call::GetDiagnostic { code } => format!("getDiagnostic {code}"),
		}
	}
}

/// Frames and LMS built from a [`HostFixture`].
pub struct Stage {
	/// The frame the content runs in; the session's root.
	pub content: Rc<MockFrame>,
	pub lms: Option<Rc<MockLms>>,
}

impl Stage {
	pub fn root(&self) -> Rc<dyn HostFrame> {
		Rc::clone(&self.content) as Rc<dyn HostFrame>
	}
}

impl HostFixture {
	/// Builds the window hierarchy and places the LMS in it.
	pub fn stage(&self) -> Stage {
		let (content, top) = MockFrame::chain(self.depth);
		let Some(version) = self.version else {
			return Stage { content, lms: None };
		};

		let lms = MockLms::new(version);
		for (field, value) in &self.values {
			lms.seed(field, value);
		}
		for (method, failure) in &self.failures {
			lms.inject(method, (*failure).into());
		}
		if let Some(raw) = &self.last_error {
			lms.force_last_error(raw);
		}

		let (owner, lms_top) = match self.placement {
			Placement::Ancestor => (Rc::clone(&content), top),
			// Rejected for AICC by `Fixture::validate`.
			Placement::Opener => {
				let (opener, opener_top) = MockFrame::chain(self.depth);
				content.set_opener(&opener);
				(opener, opener_top)
			}
		};

		match version.window_global() {
			Some(global) => lms_top.expose(global, lms.clone()),
			None => {
				// AICC adapters hang off the document of the owner's parent.
				let frame = owner.parent_frame().unwrap_or(owner);
				frame.expose_document(AICC_DOCUMENT_GLOBAL, lms.clone());
			}
		}

		Stage { content, lms: Some(lms) }
	}
}

impl Fixture {
	pub fn parse(text: &str) -> anyhow::Result<Self> {
		let fixture: Fixture = serde_json::from_str(text).context("parsing fixture JSON")?;
		fixture.validate()?;
		Ok(fixture)
	}

	pub fn validate(&self) -> anyhow::Result<()> {
		ensure!(
			self.host.depth <= MAX_DEPTH,
			"host.depth {} exceeds the maximum of {MAX_DEPTH}",
			self.host.depth
		);
		ensure!(
			!(self.host.version == Some(ProtocolVersion::Aicc) && self.host.placement == Placement::Opener),
			"an AICC host must use ancestor placement; the adapter is only looked up on the content's parent document"
		);
		Ok(())
	}
}

/// Reads and validates a fixture file.
pub fn load(path: &Path) -> anyhow::Result<Fixture> {
	let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
	Fixture::parse(&text)
}
