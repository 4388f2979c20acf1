//! Completion-status shorthand.

use std::fmt;

use crate::data::FieldValue;
use crate::error::{Error, Result};
use crate::session::Session;

/// What [`Session::status`] should do with the completion-status field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusAction {
	Get,
	Set(String),
}

/// Result of [`Session::status`]: a read value, or whether a write succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReply {
	Value(String),
	Written(bool),
}

impl fmt::Display for StatusReply {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StatusReply::Value(value) => f.write_str(value),
			StatusReply::Written(ok) => write!(f, "{ok}"),
		}
	}
}

impl Session {
	/// Name of the completion-status field for the active version, or `""`
	/// before a version is known.
	pub fn completion_field(&self) -> &'static str {
		self.version()
			.map(|version| version.fields().completion_status)
			.unwrap_or_default()
	}

	/// Reads the completion status.
	pub fn completion_status(&mut self) -> Result<FieldValue> {
		let field = self.completion_field();
		self.data().read(field)
	}

	/// Writes the completion status.
	pub fn set_completion_status(&mut self, value: &str) -> Result<()> {
		let field = self.completion_field();
		self.data().write(field, value)
	}

	/// Gets or sets the completion status through the data channel.
	pub fn status(&mut self, action: StatusAction) -> StatusReply {
		match action {
			StatusAction::Get => {
				let field = self.completion_field();
				StatusReply::Value(self.data().get(field))
			}
			StatusAction::Set(value) => StatusReply::Written(self.set_completion_status(&value).is_ok()),
		}
	}

	/// String form of [`status`](Self::status) for script callers.
	///
	/// `action` is `"get"` or `"set"`; `"set"` requires `value`. Bad input
	/// is logged and answered with `Written(false)`.
	pub fn status_str(&mut self, action: &str, value: Option<&str>) -> StatusReply {
		match parse_action(action, value) {
			Ok(action) => self.status(action),
			Err(err) => {
				self.report(err);
				StatusReply::Written(false)
			}
		}
	}
}

fn parse_action(action: &str, value: Option<&str>) -> Result<StatusAction> {
	match action {
		"get" => Ok(StatusAction::Get),
		"set" => value
			.map(|v| StatusAction::Set(v.to_string()))
			.ok_or(Error::MissingArgument("status")),
		other => Err(Error::UnknownAction(other.to_string())),
	}
}

#[cfg(test)]
mod tests {
	use scorm_protocol::ProtocolVersion;

	use super::*;
	use crate::config::SessionConfig;
	use crate::testing::MockFrame;

	#[test]
	fn status_maps_to_version_field() {
		let (frame, lms) = MockFrame::with_api(ProtocolVersion::Scorm2004);
		let mut session = Session::new(frame, SessionConfig::new().with_completion_status_handling(false));
		assert!(session.connection().initialize());

		assert_eq!(session.status(StatusAction::Get), StatusReply::Value("unknown".to_string()));
		assert_eq!(
			session.status(StatusAction::Set("completed".to_string())),
			StatusReply::Written(true)
		);
		assert_eq!(lms.value("cmi.completion_status").as_deref(), Some("completed"));
	}

	#[test]
	fn set_without_value_is_rejected() {
		let (frame, lms) = MockFrame::with_api(ProtocolVersion::Scorm12);
		let mut session = Session::new(frame, SessionConfig::default());
		assert!(session.connection().initialize());
		let writes = lms.count("LMSSetValue");

		assert_eq!(session.status_str("set", None), StatusReply::Written(false));
		assert_eq!(session.status_str("toggle", Some("x")), StatusReply::Written(false));
		assert_eq!(lms.count("LMSSetValue"), writes);
	}

	#[test]
	fn status_while_disconnected_is_null() {
		let mut session = Session::new(MockFrame::new("content"), SessionConfig::default());
		assert_eq!(session.status_str("get", None), StatusReply::Value("null".to_string()));
		assert_eq!(session.status_str("set", Some("completed")), StatusReply::Written(false));
	}

	#[test]
	fn parse_action_taxonomy() {
		assert_eq!(parse_action("get", None), Ok(StatusAction::Get));
		assert!(parse_action("set", None).unwrap_err().is_caller_input());
		assert!(parse_action("", None).unwrap_err().is_caller_input());
	}
}
