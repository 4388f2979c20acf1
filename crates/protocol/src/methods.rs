//! Host method names per protocol variant.

use serde::Serialize;

use crate::version::ProtocolVersion;

/// Names of the host methods a session calls for one protocol variant.
///
/// SCORM 1.2 and AICC adapters answer to the same `LMS*` names; SCORM 2004
/// dropped the prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodTable {
	/// Begins the communication session. Called with `""`.
	pub begin: &'static str,
	/// Ends the communication session. Called with `""`.
	pub end: &'static str,
	/// Reads a data-model element.
	pub get_value: &'static str,
	/// Writes a data-model element.
	pub set_value: &'static str,
	/// Persists buffered writes. Called with `""`.
	pub commit: &'static str,
	/// Returns the last error code as a string.
	pub last_error: &'static str,
	/// Returns the description of an error code.
	pub error_string: &'static str,
	/// Returns vendor-specific detail for an error code.
	pub diagnostic: &'static str,
}

/// `LMS*` method set shared by SCORM 1.2 and AICC.
pub const LMS_METHODS: MethodTable = MethodTable {
	begin: "LMSInitialize",
	end: "LMSFinish",
	get_value: "LMSGetValue",
	set_value: "LMSSetValue",
	commit: "LMSCommit",
	last_error: "LMSGetLastError",
	error_string: "LMSGetErrorString",
	diagnostic: "LMSGetDiagnostic",
};

/// SCORM 2004 method set.
pub const SCORM_2004_METHODS: MethodTable = MethodTable {
	begin: "Initialize",
	end: "Terminate",
	get_value: "GetValue",
	set_value: "SetValue",
	commit: "Commit",
	last_error: "GetLastError",
	error_string: "GetErrorString",
	diagnostic: "GetDiagnostic",
};

impl MethodTable {
	/// Returns the method table for `version`.
	pub fn for_version(version: ProtocolVersion) -> &'static MethodTable {
		match version {
			ProtocolVersion::Scorm12 | ProtocolVersion::Aicc => &LMS_METHODS,
			ProtocolVersion::Scorm2004 => &SCORM_2004_METHODS,
		}
	}
}
