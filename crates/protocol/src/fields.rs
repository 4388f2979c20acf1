//! Data-model field names and vocabulary values.

use serde::Serialize;

use crate::version::ProtocolVersion;

/// Completion status before the learner has started.
pub const STATUS_NOT_ATTEMPTED: &str = "not attempted";
/// Completion status reported by SCORM 2004 hosts for new attempts.
pub const STATUS_UNKNOWN: &str = "unknown";
/// Completion status for an attempt in progress.
pub const STATUS_INCOMPLETE: &str = "incomplete";
/// Completion status for a finished attempt.
pub const STATUS_COMPLETED: &str = "completed";
/// Lesson status for a passed attempt (SCORM 1.2).
pub const STATUS_PASSED: &str = "passed";
/// Exit value asking the host to resume the attempt on next launch.
pub const EXIT_SUSPEND: &str = "suspend";

/// Version-specific names of the fields the session tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMap {
	/// Field carrying learner completion state.
	pub completion_status: &'static str,
	/// Field reporting whether this is a resumed attempt.
	pub entry: Option<&'static str>,
	/// Field describing how the attempt ended.
	pub exit: Option<&'static str>,
	/// Exit value written when a finished attempt ends normally.
	pub normal_exit: Option<&'static str>,
}

/// SCORM 1.2 field names.
pub const SCORM_12_FIELDS: FieldMap = FieldMap {
	completion_status: "cmi.core.lesson_status",
	entry: Some("cmi.core.entry"),
	exit: Some("cmi.core.exit"),
	normal_exit: Some("logout"),
};

/// SCORM 2004 field names.
pub const SCORM_2004_FIELDS: FieldMap = FieldMap {
	completion_status: "cmi.completion_status",
	entry: Some("cmi.entry"),
	exit: Some("cmi.exit"),
	normal_exit: Some("normal"),
};

/// AICC adapters expose lesson status through the SCORM 1.2 name and have
/// no entry or exit element.
pub const AICC_FIELDS: FieldMap = FieldMap {
	completion_status: "cmi.core.lesson_status",
	entry: None,
	exit: None,
	normal_exit: None,
};

impl FieldMap {
	/// Returns the field map for `version`.
	pub fn for_version(version: ProtocolVersion) -> &'static FieldMap {
		match version {
			ProtocolVersion::Scorm12 => &SCORM_12_FIELDS,
			ProtocolVersion::Scorm2004 => &SCORM_2004_FIELDS,
			ProtocolVersion::Aicc => &AICC_FIELDS,
		}
	}

	/// Returns true if reading `field` reveals the completion state.
	pub fn tracks_completion(&self, field: &str) -> bool {
		field == self.completion_status || self.entry == Some(field)
	}

	/// Returns true if `field` is the exit element.
	pub fn is_exit(&self, field: &str) -> bool {
		self.exit == Some(field)
	}
}

/// Returns true if a completion status means the attempt has not begun.
pub fn is_fresh_status(status: &str) -> bool {
	status == STATUS_NOT_ATTEMPTED || status == STATUS_UNKNOWN
}

/// Returns true if a completion status means the attempt is finished.
pub fn is_finished_status(status: &str) -> bool {
	status == STATUS_COMPLETED || status == STATUS_PASSED
}

/// Returns true if `field` is any variant's completion-status element.
pub fn is_completion_field(field: &str) -> bool {
	field == SCORM_12_FIELDS.completion_status || field == SCORM_2004_FIELDS.completion_status
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn entry_field_tracks_completion() {
		let fields = FieldMap::for_version(ProtocolVersion::Scorm2004);
		assert!(fields.tracks_completion("cmi.completion_status"));
		assert!(fields.tracks_completion("cmi.entry"));
		assert!(!fields.tracks_completion("cmi.core.lesson_status"));
		assert!(fields.is_exit("cmi.exit"));
	}

	#[test]
	fn aicc_has_no_exit_field() {
		let fields = FieldMap::for_version(ProtocolVersion::Aicc);
		assert!(!fields.is_exit("cmi.core.exit"));
		assert_eq!(fields.normal_exit, None);
	}

	#[test]
	fn status_classes() {
		assert!(is_fresh_status("not attempted"));
		assert!(is_fresh_status("unknown"));
		assert!(!is_fresh_status("incomplete"));
		assert!(is_finished_status("passed"));
		assert!(!is_finished_status("failed"));
	}
}
