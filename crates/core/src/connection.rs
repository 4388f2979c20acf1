//! Initialize/terminate state machine.
//!
//! ```text
//! Disconnected --initialize--> Active --terminate--> Disconnected
//! ```
//!
//! Re-entrant calls are no-ops that report failure. A begin or end result
//! from the host is provisional until the error code reads back as 0.

use scorm_protocol::{EXIT_SUSPEND, STATUS_INCOMPLETE, is_finished_status, is_fresh_status, to_boolean};

use crate::data::FieldValue;
use crate::error::{Error, Result};
use crate::session::{ConnectionState, Session};

const INITIALIZE: &str = "connection.initialize";
const TERMINATE: &str = "connection.terminate";

/// Connection lifecycle view over a [`Session`] (`session.connection()`).
pub struct Connection<'a> {
	session: &'a mut Session,
}

impl<'a> Connection<'a> {
	pub(crate) fn new(session: &'a mut Session) -> Self {
		Self { session }
	}

	/// Opens the host session.
	///
	/// On success, and when completion-status handling is on, a fresh
	/// attempt (`not attempted`/`unknown`) is marked `incomplete` and the
	/// session is committed whenever a status value could be read.
	pub fn connect(&mut self) -> Result<()> {
		crate::lms_trace!(self.session.trace_enabled(), "connection.initialize called");

		if self.session.state.is_active() {
			return Err(self.session.report(Error::AlreadyActive));
		}

		let api = self.session.api(INITIALIZE)?;
		let begun = to_boolean(&api.begin());

		if !begun {
			let err = self.session.debug().failure(INITIALIZE);
			return Err(self.session.report(err));
		}

		if let Err(err) = self.session.debug().confirm(INITIALIZE) {
			crate::lms_warn!(
				self.session.trace_enabled(),
				"connection.initialize: host accepted the call but reported an error; \
				 the LMS may not be running or the content was not launched from an LMS"
			);
			return Err(self.session.report(err));
		}

		self.session.state = ConnectionState::Active;
		crate::lms_trace!(self.session.trace_enabled(), version = ?self.session.version(), "connection active");

		if self.session.config.handle_completion_status {
			self.prime_completion_status();
		}

		Ok(())
	}

	/// Opens the host session, returning false on any failure.
	pub fn initialize(&mut self) -> bool {
		self.connect().is_ok()
	}

	/// Commits and closes the host session.
	///
	/// When exit-mode handling is on and no exit value has been seen, the
	/// exit field is set to `suspend` for unfinished attempts and to the
	/// variant's normal value otherwise. A failed commit or end leaves the
	/// connection active.
	pub fn disconnect(&mut self) -> Result<()> {
		crate::lms_trace!(self.session.trace_enabled(), "connection.terminate called");

		if !self.session.state.is_active() {
			return Err(self.session.report(Error::NotActive { operation: TERMINATE }));
		}

		let api = self.session.api(TERMINATE)?;

		if self.session.config.handle_exit_mode && !self.session.cache.has_exit_status() {
			let fields = api.fields();
			let finished = self
				.session
				.cache
				.completion_status
				.as_deref()
				.is_some_and(is_finished_status);
			let value = if finished { fields.normal_exit } else { Some(EXIT_SUSPEND) };

			if let (Some(exit), Some(value)) = (fields.exit, value) {
				// A rejected exit value must not block the commit.
				let _ = self.session.data().write(exit, value);
			}
		}

		self.session.data().commit()?;

		let ended = to_boolean(&api.end());
		if !ended {
			let err = self.session.debug().failure(TERMINATE);
			return Err(self.session.report(err));
		}
		if let Err(err) = self.session.debug().confirm(TERMINATE) {
			return Err(self.session.report(err));
		}

		self.session.state = ConnectionState::Disconnected;
		crate::lms_trace!(self.session.trace_enabled(), "connection closed");
		Ok(())
	}

	/// Commits and closes the host session, returning false on any failure.
	pub fn terminate(&mut self) -> bool {
		self.disconnect().is_ok()
	}

	fn prime_completion_status(&mut self) {
		let status = match self.session.completion_status() {
			Ok(FieldValue::Value(status)) => status,
			Ok(FieldValue::Empty) | Err(_) => return,
		};

		if is_fresh_status(&status) {
			let _ = self.session.set_completion_status(STATUS_INCOMPLETE);
		}
		let _ = self.session.data().commit();
	}
}

#[cfg(test)]
mod tests {
	use scorm_protocol::ProtocolVersion;

	use super::*;
	use crate::config::SessionConfig;
	use crate::testing::{MockFailure, MockFrame};

	fn quiet() -> SessionConfig {
		SessionConfig::new()
			.with_completion_status_handling(false)
			.with_exit_mode_handling(false)
	}

	#[test]
	fn initialize_twice_fails_and_stays_active() {
		let (frame, lms) = MockFrame::with_api(ProtocolVersion::Scorm12);
		let mut session = Session::new(frame, quiet());

		assert!(session.connection().initialize());
		assert!(!session.connection().initialize());
		assert!(session.is_active());
		assert_eq!(lms.count("LMSInitialize"), 1);
	}

	#[test]
	fn terminate_while_disconnected_fails() {
		let (frame, lms) = MockFrame::with_api(ProtocolVersion::Scorm12);
		let mut session = Session::new(frame, quiet());

		assert_eq!(
			session.connection().disconnect(),
			Err(Error::NotActive { operation: TERMINATE })
		);
		assert!(!session.is_active());
		assert!(lms.calls().is_empty());
	}

	#[test]
	fn initialize_without_api_fails() {
		let mut session = Session::new(MockFrame::new("orphan"), quiet());
		let err = session.connection().connect().unwrap_err();
		assert!(err.is_discovery());
		assert!(!session.is_active());
	}

	#[test]
	fn truthy_begin_with_error_code_is_downgraded() {
		let (frame, lms) = MockFrame::with_api(ProtocolVersion::Scorm2004);
		lms.inject("Initialize", MockFailure::AcceptWithError(101));
		let mut session = Session::new(frame, quiet());

		let err = session.connection().connect().unwrap_err();
		assert_eq!(err.fault().map(|f| f.code), Some(101));
		assert!(!session.is_active());
	}

	#[test]
	fn rejected_begin_reports_host_code() {
		let (frame, lms) = MockFrame::with_api(ProtocolVersion::Scorm12);
		lms.inject("LMSInitialize", MockFailure::Reject(101));
		let mut session = Session::new(frame, quiet());

		let err = session.connection().connect().unwrap_err();
		assert!(matches!(err, Error::Host { operation: INITIALIZE, .. }));
	}

	#[test]
	fn rejected_begin_without_code_is_unconfirmed() {
		let (frame, lms) = MockFrame::with_api(ProtocolVersion::Scorm12);
		lms.inject("LMSInitialize", MockFailure::Silent);
		let mut session = Session::new(frame, quiet());

		assert_eq!(
			session.connection().connect(),
			Err(Error::Unconfirmed { operation: INITIALIZE })
		);
	}

	#[test]
	fn terminate_then_reinitialize_is_allowed() {
		let (frame, lms) = MockFrame::with_api(ProtocolVersion::Scorm2004);
		let mut session = Session::new(frame, quiet());

		assert!(session.connection().initialize());
		assert!(session.connection().terminate());
		assert!(!session.is_active());
		assert!(!session.connection().terminate());

		lms.reset_session();
		assert!(session.connection().initialize());
		assert_eq!(lms.count("Initialize"), 2);
	}

	#[test]
	fn failed_end_keeps_connection_active() {
		let (frame, lms) = MockFrame::with_api(ProtocolVersion::Scorm12);
		let mut session = Session::new(frame, quiet());
		assert!(session.connection().initialize());

		lms.inject("LMSFinish", MockFailure::Reject(101));
		let err = session.connection().disconnect().unwrap_err();
		assert!(err.is_host());
		assert!(session.is_active());
	}

	#[test]
	fn failed_commit_skips_end() {
		let (frame, lms) = MockFrame::with_api(ProtocolVersion::Scorm2004);
		let mut session = Session::new(frame, quiet());
		assert!(session.connection().initialize());

		lms.inject("Commit", MockFailure::Reject(391));
		assert!(!session.connection().terminate());
		assert_eq!(lms.count("Terminate"), 0);
		assert!(session.is_active());
	}

	#[test]
	fn fresh_status_is_marked_incomplete_and_committed() {
		let (frame, lms) = MockFrame::with_api(ProtocolVersion::Scorm12);
		let mut session = Session::new(frame, SessionConfig::default());

		assert!(session.connection().initialize());
		assert_eq!(lms.value("cmi.core.lesson_status").as_deref(), Some("incomplete"));
		assert_eq!(lms.count("LMSCommit"), 1);
		assert_eq!(session.status_cache().completion_status.as_deref(), Some("incomplete"));
	}

	#[test]
	fn started_status_is_left_alone_but_committed() {
		let (frame, lms) = MockFrame::with_api(ProtocolVersion::Scorm12);
		lms.seed("cmi.core.lesson_status", "failed");
		let mut session = Session::new(frame, SessionConfig::default());

		assert!(session.connection().initialize());
		assert_eq!(lms.value("cmi.core.lesson_status").as_deref(), Some("failed"));
		assert_eq!(lms.count("LMSSetValue"), 0);
		assert_eq!(lms.count("LMSCommit"), 1);
	}

	#[test]
	fn unreadable_status_skips_commit() {
		let (frame, lms) = MockFrame::with_api(ProtocolVersion::Scorm2004);
		lms.inject("GetValue", MockFailure::Reject(403));
		let mut session = Session::new(frame, SessionConfig::default());

		assert!(session.connection().initialize());
		assert_eq!(lms.count("Commit"), 0);
	}

	#[test]
	fn unfinished_attempt_exits_with_suspend() {
		let (frame, lms) = MockFrame::with_api(ProtocolVersion::Scorm2004);
		let mut session = Session::new(frame, SessionConfig::default());

		assert!(session.connection().initialize());
		assert!(session.connection().terminate());
		assert_eq!(lms.committed("cmi.exit").as_deref(), Some("suspend"));
	}

	#[test]
	fn explicit_exit_status_is_respected() {
		let (frame, lms) = MockFrame::with_api(ProtocolVersion::Scorm12);
		let mut session = Session::new(frame, SessionConfig::default());

		assert!(session.connection().initialize());
		lms.seed("cmi.core.exit", "time-out");
		assert_eq!(session.data().get("cmi.core.exit"), "time-out");
		assert!(session.connection().terminate());
		assert_eq!(lms.committed("cmi.core.exit").as_deref(), Some("time-out"));
	}

	#[test]
	fn aicc_terminate_writes_no_exit_field() {
		let (frame, lms) = MockFrame::with_api(ProtocolVersion::Aicc);
		let mut session = Session::new(frame, SessionConfig::default());

		assert!(session.connection().initialize());
		let writes_before = lms.count("LMSSetValue");
		assert!(session.connection().terminate());
		assert_eq!(lms.count("LMSSetValue"), writes_before);
		assert_eq!(lms.count("LMSFinish"), 1);
	}
}
