//! Testing infrastructure for sessions.
//!
//! Provides in-memory implementations of the host capabilities so sessions
//! can be exercised without a browser:
//! - [`MockFrame`]: a frame in a window hierarchy, with globals, a document,
//!   a parent and an opener
//! - [`MockLms`]: an in-memory LMS API for one protocol variant that records
//!   every call and can be told to fail
//!
//! # Example
//!
//! ```ignore
//! use scorm::testing::{MockFrame, MockLms};
//!
//! let (content, top) = MockFrame::chain(2);
//! let lms = MockLms::new(ProtocolVersion::Scorm2004);
//! top.expose("API_1484_11", lms.clone());
//!
//! let mut session = Session::new(content, SessionConfig::default());
//! assert!(session.connection().initialize());
//! assert_eq!(lms.count("Initialize"), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use scorm_protocol::{
	AICC_DOCUMENT_GLOBAL, HostValue, MethodTable, ProtocolVersion, STATUS_NOT_ATTEMPTED, STATUS_UNKNOWN,
};

use crate::host::{HostApi, HostFrame};

/// In-memory frame for building window hierarchies.
pub struct MockFrame {
	name: String,
	globals: RefCell<HashMap<String, Rc<dyn HostApi>>>,
	document_globals: RefCell<HashMap<String, Rc<dyn HostApi>>>,
	parent: RefCell<Option<Rc<MockFrame>>>,
	opener: RefCell<Option<Rc<MockFrame>>>,
	probes: Cell<usize>,
}

impl MockFrame {
	/// Creates a top-level frame.
	pub fn new(name: impl Into<String>) -> Rc<Self> {
		Rc::new(Self {
			name: name.into(),
			globals: RefCell::new(HashMap::new()),
			document_globals: RefCell::new(HashMap::new()),
			parent: RefCell::new(None),
			opener: RefCell::new(None),
			probes: Cell::new(0),
		})
	}

	/// Creates a child frame of `parent`.
	pub fn with_parent(name: impl Into<String>, parent: &Rc<MockFrame>) -> Rc<Self> {
		let frame = Self::new(name);
		*frame.parent.borrow_mut() = Some(Rc::clone(parent));
		frame
	}

	/// Creates a chain with `depth` ancestors above the returned content
	/// frame. Returns `(content, top)`.
	pub fn chain(depth: usize) -> (Rc<Self>, Rc<Self>) {
		let top = Self::new(format!("frame-{depth}"));
		let mut current = Rc::clone(&top);
		for level in (0..depth).rev() {
			current = Self::with_parent(format!("frame-{level}"), &current);
		}
		(current, top)
	}

	/// Creates a frame exposing a fresh [`MockLms`] the way `version` is
	/// normally found: as a window global, or for AICC on the document.
	pub fn with_api(version: ProtocolVersion) -> (Rc<Self>, Rc<MockLms>) {
		let frame = Self::new("lms");
		let lms = MockLms::new(version);
		match version.window_global() {
			Some(global) => frame.expose(global, lms.clone()),
			None => frame.expose_document(AICC_DOCUMENT_GLOBAL, lms.clone()),
		}
		(frame, lms)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Binds `api` to the window global `name`.
	pub fn expose(&self, name: &str, api: Rc<dyn HostApi>) {
		self.globals.borrow_mut().insert(name.to_string(), api);
	}

	/// Binds `api` to the document property `name`.
	pub fn expose_document(&self, name: &str, api: Rc<dyn HostApi>) {
		self.document_globals.borrow_mut().insert(name.to_string(), api);
	}

	pub fn set_opener(&self, opener: &Rc<MockFrame>) {
		*self.opener.borrow_mut() = Some(Rc::clone(opener));
	}

	/// Returns the concrete parent frame.
	pub fn parent_frame(&self) -> Option<Rc<MockFrame>> {
		self.parent.borrow().clone()
	}

	/// Number of window-global lookups made on this frame.
	pub fn probes(&self) -> usize {
		self.probes.get()
	}
}

impl HostFrame for MockFrame {
	fn global(&self, name: &str) -> Option<Rc<dyn HostApi>> {
		self.probes.set(self.probes.get() + 1);
		self.globals.borrow().get(name).cloned()
	}

	fn document_global(&self, name: &str) -> Option<Rc<dyn HostApi>> {
		self.document_globals.borrow().get(name).cloned()
	}

	fn parent(&self) -> Option<Rc<dyn HostFrame>> {
		self.parent_frame().map(|parent| parent as Rc<dyn HostFrame>)
	}

	fn opener(&self) -> Option<Rc<dyn HostFrame>> {
		self.opener.borrow().clone().map(|opener| opener as Rc<dyn HostFrame>)
	}
}

/// A host call recorded by [`MockLms`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCall {
	pub method: String,
	pub args: Vec<String>,
}

/// Failure injected into a [`MockLms`] method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
	/// Answer `"false"` (or `""` for reads) and record `code`.
	Reject(u32),
	/// Answer `"true"` but record `code`.
	AcceptWithError(u32),
	/// Answer `"false"` (or `""`) and leave the error code at 0.
	Silent,
}

#[derive(Default)]
struct LmsState {
	initialized: bool,
	terminated: bool,
	values: BTreeMap<String, String>,
	committed: BTreeMap<String, String>,
	last_error: u32,
	forced_error: Option<String>,
	failures: HashMap<String, MockFailure>,
	calls: Vec<HostCall>,
}

/// In-memory LMS API speaking one protocol variant.
///
/// Implements the begin/get/set/commit/end rules of the run-time
/// environment closely enough to exercise a session: calls before begin or
/// after end are rejected with the variant's error code, unknown elements
/// read as `""` with code 401, and commit snapshots the current values.
pub struct MockLms {
	version: ProtocolVersion,
	methods: &'static MethodTable,
	state: RefCell<LmsState>,
}

impl MockLms {
	/// Creates an LMS with the variant's default data model for a first
	/// attempt.
	pub fn new(version: ProtocolVersion) -> Rc<Self> {
		let lms = Self {
			version,
			methods: version.methods(),
			state: RefCell::new(LmsState::default()),
		};
		lms.seed_defaults();
		Rc::new(lms)
	}

	pub fn version(&self) -> ProtocolVersion {
		self.version
	}

	fn seed_defaults(&self) {
		let defaults: &[(&str, &str)] = match self.version {
			ProtocolVersion::Scorm12 => &[
				("cmi.core.lesson_status", STATUS_NOT_ATTEMPTED),
				("cmi.core.entry", "ab-initio"),
				("cmi.core.exit", ""),
				("cmi.core.student_name", ""),
				("cmi.core.lesson_location", ""),
				("cmi.core.score.raw", ""),
				("cmi.suspend_data", ""),
			],
			ProtocolVersion::Scorm2004 => &[
				("cmi.completion_status", STATUS_UNKNOWN),
				("cmi.success_status", STATUS_UNKNOWN),
				("cmi.entry", "ab-initio"),
				("cmi.exit", ""),
				("cmi.learner_name", ""),
				("cmi.location", ""),
				("cmi.score.raw", ""),
				("cmi.suspend_data", ""),
			],
			ProtocolVersion::Aicc => &[
				("cmi.core.lesson_status", STATUS_NOT_ATTEMPTED),
				("cmi.core.student_name", ""),
				("cmi.core.lesson_location", ""),
				("cmi.core.score.raw", ""),
				("cmi.suspend_data", ""),
			],
		};
		let mut state = self.state.borrow_mut();
		for (field, value) in defaults {
			state.values.insert(field.to_string(), value.to_string());
		}
	}

	/// Sets a data-model value directly, bypassing the session rules.
	pub fn seed(&self, field: &str, value: &str) {
		self.state
			.borrow_mut()
			.values
			.insert(field.to_string(), value.to_string());
	}

	/// Returns the current (uncommitted) value of `field`.
	pub fn value(&self, field: &str) -> Option<String> {
		self.state.borrow().values.get(field).cloned()
	}

	/// Returns the value of `field` as of the last commit.
	pub fn committed(&self, field: &str) -> Option<String> {
		self.state.borrow().committed.get(field).cloned()
	}

	/// Makes every call to `method` fail as described until cleared.
	pub fn inject(&self, method: &str, failure: MockFailure) {
		self.state
			.borrow_mut()
			.failures
			.insert(method.to_string(), failure);
	}

	pub fn clear_failures(&self) {
		self.state.borrow_mut().failures.clear();
	}

	/// Sets the code the next last-error call reports.
	pub fn set_last_error(&self, code: &str) {
		let mut state = self.state.borrow_mut();
		match code.parse() {
			Ok(code) => state.last_error = code,
			Err(_) => state.forced_error = Some(code.to_string()),
		}
	}

	/// Makes every last-error call answer `raw` verbatim, modelling hosts
	/// that use a non-numeric or non-zero "no error" value.
	pub fn force_last_error(&self, raw: &str) {
		self.state.borrow_mut().forced_error = Some(raw.to_string());
	}

	/// Allows a new begin after end, as if the content were relaunched.
	pub fn reset_session(&self) {
		let mut state = self.state.borrow_mut();
		state.initialized = false;
		state.terminated = false;
		state.last_error = 0;
	}

	pub fn is_initialized(&self) -> bool {
		let state = self.state.borrow();
		state.initialized && !state.terminated
	}

	pub fn is_terminated(&self) -> bool {
		self.state.borrow().terminated
	}

	/// Returns every call received, in order.
	pub fn calls(&self) -> Vec<HostCall> {
		self.state.borrow().calls.clone()
	}

	/// Returns how many times `method` was called.
	pub fn count(&self, method: &str) -> usize {
		self.state
			.borrow()
			.calls
			.iter()
			.filter(|call| call.method == method)
			.count()
	}

	fn codes(&self) -> ErrorCodes {
		match self.version {
			ProtocolVersion::Scorm2004 => ErrorCodes {
				already_initialized: 103,
				already_terminated: 104,
				end_before_begin: 112,
				get_before_begin: 122,
				set_before_begin: 132,
				commit_before_begin: 142,
				undefined_element: 401,
			},
			ProtocolVersion::Scorm12 | ProtocolVersion::Aicc => ErrorCodes {
				already_initialized: 101,
				already_terminated: 101,
				end_before_begin: 301,
				get_before_begin: 301,
				set_before_begin: 301,
				commit_before_begin: 301,
				undefined_element: 401,
			},
		}
	}

	fn describe(&self, code: &str) -> &'static str {
		match (self.version, code) {
			(_, "0") => "No error",
			(ProtocolVersion::Scorm2004, "103") => "Already Initialized",
			(ProtocolVersion::Scorm2004, "104") => "Content Instance Terminated",
			(ProtocolVersion::Scorm2004, "112") => "Termination Before Initialization",
			(ProtocolVersion::Scorm2004, "122") => "Retrieve Data Before Initialization",
			(ProtocolVersion::Scorm2004, "132") => "Store Data Before Initialization",
			(ProtocolVersion::Scorm2004, "142") => "Commit Before Initialization",
			(ProtocolVersion::Scorm2004, "391") => "General Commit Failure",
			(ProtocolVersion::Scorm2004, "401") => "Undefined Data Model Element",
			(ProtocolVersion::Scorm2004, "403") => "Data Model Element Value Not Initialized",
			(ProtocolVersion::Scorm2004, "406") => "Data Model Element Type Mismatch",
			(_, "101") => "General exception",
			(_, "301") => "Not initialized",
			(_, "401") => "Not implemented error",
			(_, "403") => "Element is read only",
			(_, "405") => "Incorrect data type",
			_ => "",
		}
	}

	/// Applies an injected failure, if any, for `method`.
	fn injected(&self, method: &str, rejected: HostValue) -> Option<HostValue> {
		let failure = self.state.borrow().failures.get(method).copied()?;
		let mut state = self.state.borrow_mut();
		Some(match failure {
			MockFailure::Reject(code) => {
				state.last_error = code;
				rejected
			}
			MockFailure::AcceptWithError(code) => {
				state.last_error = code;
				HostValue::text("true")
			}
			MockFailure::Silent => {
				state.last_error = 0;
				rejected
			}
		})
	}

	fn finish(&self, code: u32, ok: HostValue, rejected: HostValue) -> HostValue {
		self.state.borrow_mut().last_error = code;
		if code == 0 { ok } else { rejected }
	}

	fn begin(&self) -> HostValue {
		let codes = self.codes();
		let code = {
			let mut state = self.state.borrow_mut();
			if state.terminated {
				codes.already_terminated
			} else if state.initialized {
				codes.already_initialized
			} else {
				state.initialized = true;
				0
			}
		};
		self.finish(code, HostValue::text("true"), HostValue::text("false"))
	}

	fn end(&self) -> HostValue {
		let codes = self.codes();
		let code = {
			let mut state = self.state.borrow_mut();
			if !state.initialized {
				codes.end_before_begin
			} else if state.terminated {
				codes.already_terminated
			} else {
				state.terminated = true;
				0
			}
		};
		self.finish(code, HostValue::text("true"), HostValue::text("false"))
	}

	fn get_value(&self, field: &str) -> HostValue {
		let codes = self.codes();
		let (code, value) = {
			let state = self.state.borrow();
			if !state.initialized || state.terminated {
				(codes.get_before_begin, String::new())
			} else {
				match state.values.get(field) {
					Some(value) => (0, value.clone()),
					None => (codes.undefined_element, String::new()),
				}
			}
		};
		self.finish(code, HostValue::Text(value), HostValue::text(""))
	}

	fn set_value(&self, field: &str, value: &str) -> HostValue {
		let codes = self.codes();
		let code = {
			let mut state = self.state.borrow_mut();
			if !state.initialized || state.terminated {
				codes.set_before_begin
			} else {
				state.values.insert(field.to_string(), value.to_string());
				0
			}
		};
		self.finish(code, HostValue::text("true"), HostValue::text("false"))
	}

	fn commit(&self) -> HostValue {
		let codes = self.codes();
		let code = {
			let mut state = self.state.borrow_mut();
			if !state.initialized || state.terminated {
				codes.commit_before_begin
			} else {
				state.committed = state.values.clone();
				0
			}
		};
		self.finish(code, HostValue::text("true"), HostValue::text("false"))
	}

	fn last_error(&self) -> HostValue {
		let state = self.state.borrow();
		match &state.forced_error {
			Some(raw) => HostValue::text(raw.as_str()),
			None => HostValue::Text(state.last_error.to_string()),
		}
	}
}

struct ErrorCodes {
	already_initialized: u32,
	already_terminated: u32,
	end_before_begin: u32,
	get_before_begin: u32,
	set_before_begin: u32,
	commit_before_begin: u32,
	undefined_element: u32,
}

impl HostApi for MockLms {
	fn call(&self, method: &str, args: &[&str]) -> HostValue {
		self.state.borrow_mut().calls.push(HostCall {
			method: method.to_string(),
			args: args.iter().map(|arg| arg.to_string()).collect(),
		});

		let arg = |index: usize| args.get(index).copied().unwrap_or_default();
		let m = self.methods;

		if method == m.begin {
			self.injected(method, HostValue::text("false")).unwrap_or_else(|| self.begin())
		} else if method == m.end {
			self.injected(method, HostValue::text("false")).unwrap_or_else(|| self.end())
		} else if method == m.get_value {
			self.injected(method, HostValue::text("")).unwrap_or_else(|| self.get_value(arg(0)))
		} else if method == m.set_value {
			self.injected(method, HostValue::text("false"))
				.unwrap_or_else(|| self.set_value(arg(0), arg(1)))
		} else if method == m.commit {
			self.injected(method, HostValue::text("false")).unwrap_or_else(|| self.commit())
		} else if method == m.last_error {
			self.last_error()
		} else if method == m.error_string {
			HostValue::text(self.describe(arg(0)))
		} else if method == m.diagnostic {
			HostValue::Text(format!("{} diagnostic for code {}", self.version, arg(0)))
		} else {
			HostValue::Undefined
		}
	}
}
