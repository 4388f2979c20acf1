//! End-to-end session lifecycles against in-memory LMS frames.

use std::rc::Rc;

use scorm::testing::{MockFailure, MockFrame, MockLms};
use scorm::{FIND_ATTEMPT_LIMIT, ProtocolVersion, Session, SessionConfig, StatusAction, StatusReply};

fn launch(depth: usize, version: ProtocolVersion) -> (Session, Rc<MockLms>) {
	let (content, top) = MockFrame::chain(depth);
	let lms = MockLms::new(version);
	top.expose(version.window_global().expect("window global"), lms.clone());
	(Session::new(content, SessionConfig::default()), lms)
}

#[test]
fn scorm_2004_fresh_attempt_is_marked_incomplete() {
	let (mut session, lms) = launch(2, ProtocolVersion::Scorm2004);

	assert!(session.connection().initialize());
	assert_eq!(session.version(), Some(ProtocolVersion::Scorm2004));
	assert_eq!(lms.count("GetValue"), 1);
	assert_eq!(lms.count("SetValue"), 1);
	assert_eq!(lms.count("Commit"), 1);
	assert_eq!(lms.committed("cmi.completion_status").as_deref(), Some("incomplete"));
	assert_eq!(
		session.status(StatusAction::Get),
		StatusReply::Value("incomplete".to_string())
	);
}

#[test]
fn completed_attempt_exits_normally() {
	let (mut session, lms) = launch(1, ProtocolVersion::Scorm2004);
	lms.seed("cmi.completion_status", "completed");

	assert!(session.connection().initialize());
	assert_eq!(lms.count("SetValue"), 0);
	assert!(session.connection().terminate());

	assert_eq!(lms.committed("cmi.exit").as_deref(), Some("normal"));
	assert!(lms.is_terminated());

	let methods: Vec<String> = lms.calls().into_iter().map(|call| call.method).collect();
	let set_exit = methods.iter().rposition(|m| m == "SetValue").expect("exit written");
	let commit = methods.iter().rposition(|m| m == "Commit").expect("commit");
	let end = methods.iter().position(|m| m == "Terminate").expect("terminate");
	assert!(set_exit < commit && commit < end);
}

#[test]
fn scorm_12_passed_attempt_logs_out() {
	let (mut session, lms) = launch(0, ProtocolVersion::Scorm12);

	assert!(session.connection().initialize());
	assert!(session.data().set("cmi.core.lesson_status", "passed"));
	assert!(session.connection().terminate());
	assert_eq!(lms.committed("cmi.core.exit").as_deref(), Some("logout"));
}

#[test]
fn unfinished_scorm_12_attempt_suspends() {
	let (mut session, lms) = launch(3, ProtocolVersion::Scorm12);

	assert!(session.connection().initialize());
	assert!(session.data().set("cmi.suspend_data", "page=4"));
	assert!(session.connection().terminate());
	assert_eq!(lms.committed("cmi.core.exit").as_deref(), Some("suspend"));
	assert_eq!(lms.committed("cmi.suspend_data").as_deref(), Some("page=4"));
}

#[test]
fn handling_can_be_disabled() {
	let (content, top) = MockFrame::chain(1);
	let lms = MockLms::new(ProtocolVersion::Scorm12);
	top.expose("API", lms.clone());
	let config = SessionConfig::new()
		.with_completion_status_handling(false)
		.with_exit_mode_handling(false)
		.with_trace(false);
	let mut session = Session::new(content, config);

	assert!(session.connection().initialize());
	assert!(session.connection().terminate());
	assert_eq!(lms.count("LMSGetValue"), 0);
	assert_eq!(lms.count("LMSSetValue"), 0);
	assert_eq!(lms.count("LMSCommit"), 1);
}

#[test]
fn lifecycle_is_idempotent_at_both_ends() {
	let (mut session, lms) = launch(1, ProtocolVersion::Scorm2004);

	assert!(!session.connection().terminate());
	assert!(!session.is_active());
	assert!(session.connection().initialize());
	assert!(!session.connection().initialize());
	assert!(session.is_active());
	assert!(session.connection().terminate());
	assert!(!session.connection().terminate());
	assert!(!session.is_active());
	assert_eq!(lms.count("Initialize"), 1);
	assert_eq!(lms.count("Terminate"), 1);
}

#[test]
fn data_calls_fail_closed_when_disconnected() {
	let (mut session, lms) = launch(1, ProtocolVersion::Scorm12);

	assert_eq!(session.data().get("cmi.core.lesson_location"), "null");
	assert!(!session.data().set("cmi.core.lesson_location", "3"));
	assert!(!session.data().save());
	assert!(lms.calls().is_empty());
}

#[test]
fn ambiguous_empty_reads_are_disambiguated() {
	let (mut session, lms) = launch(1, ProtocolVersion::Scorm12);
	assert!(session.connection().initialize());

	assert_eq!(session.data().get("cmi.core.lesson_location"), "");

	lms.inject("LMSGetValue", MockFailure::Reject(5));
	assert_eq!(session.data().get("cmi.core.lesson_location"), "null");
	lms.clear_failures();

	assert_eq!(session.data().get("cmi.interactions._count"), "null");
	assert_eq!(session.debug().get_code(), 401);
}

#[test]
fn failed_discovery_is_not_retried() {
	let (content, _top) = MockFrame::chain(4);
	let mut session = Session::new(content.clone(), SessionConfig::default());

	assert!(!session.connection().initialize());
	let probes = content.probes();
	assert!(!session.connection().initialize());
	assert_eq!(session.debug().get_code(), 0);
	assert_eq!(content.probes(), probes);
	assert_eq!(session.locator().searches(), 1);
}

#[test]
fn discovery_through_deep_chain_is_capped() {
	let (content, _top) = MockFrame::chain(FIND_ATTEMPT_LIMIT + 1);
	let mut session = Session::new(content, SessionConfig::default());

	let err = session.connection().connect().unwrap_err();
	assert!(err.is_discovery());
}

#[test]
fn pinned_version_does_not_fall_back_to_other_variant() {
	let (content, top) = MockFrame::chain(1);
	top.expose("API", MockLms::new(ProtocolVersion::Scorm12));
	let mut session = Session::new(content, SessionConfig::new().with_version(ProtocolVersion::Scorm2004));

	assert!(!session.connection().initialize());
	assert_eq!(session.version(), Some(ProtocolVersion::Scorm2004));
}

#[test]
fn aicc_adapter_on_parent_document() {
	let parent = MockFrame::new("launcher");
	let content = MockFrame::with_parent("content", &parent);
	let lms = MockLms::new(ProtocolVersion::Aicc);
	parent.expose_document("AICC_API", lms.clone());
	let mut session = Session::new(content, SessionConfig::default());

	assert!(session.connection().initialize());
	assert_eq!(session.version(), Some(ProtocolVersion::Aicc));
	assert_eq!(lms.value("cmi.core.lesson_status").as_deref(), Some("incomplete"));
	assert!(session.connection().terminate());
	assert_eq!(lms.count("LMSFinish"), 1);
}

#[test]
fn non_zero_no_error_sentinel_blocks_connection() {
	let (mut session, lms) = launch(1, ProtocolVersion::Scorm2004);
	lms.force_last_error("none");

	assert!(!session.connection().initialize());
	assert!(!session.is_active());
}
