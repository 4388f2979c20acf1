//! scorm: client-side adapter for host-injected LMS APIs.
//!
//! E-learning content runs inside a frame of a Learning Management System
//! that injects a runtime API object into some ancestor window. This crate
//! finds that object, works out which of the three wire-incompatible variants
//! it speaks (SCORM 1.2, SCORM 2004, AICC), and drives a uniform session
//! lifecycle on top of it: connect, read and write data-model fields,
//! commit, disconnect.
//!
//! Host APIs report failure ambiguously, so every state-changing result is
//! checked against the host's last error code before it is trusted.
//!
//! # Example
//!
//! ```ignore
//! use scorm::{Session, SessionConfig};
//!
//! let mut session = Session::new(content_frame, SessionConfig::default());
//! if session.connection().initialize() {
//!     let name = session.data().get("cmi.core.student_name");
//!     session.data().set("cmi.core.score.raw", "92");
//!     session.connection().terminate();
//! }
//! ```
//!
//! # Structure
//!
//! - [`host`]: capabilities the session needs from its environment
//!   ([`HostFrame`], [`HostApi`])
//! - [`locator`]: window-hierarchy search and version detection
//! - [`protocol`]: the three variant bindings behind [`SessionProtocol`]
//! - [`Session`] views: [`Connection`], [`DataChannel`], [`ErrorInspector`],
//!   and the completion-status shorthand [`Session::status`]
//! - [`testing`]: in-memory frames and LMS for tests and tooling

/// Emits a `debug` event on the `scorm` target when tracing is enabled.
macro_rules! lms_trace {
	($enabled:expr, $($arg:tt)+) => {
		if $enabled {
			::tracing::debug!(target: "scorm", $($arg)+);
		}
	};
}
pub(crate) use lms_trace;

/// Emits a `warn` event on the `scorm` target when tracing is enabled.
macro_rules! lms_warn {
	($enabled:expr, $($arg:tt)+) => {
		if $enabled {
			::tracing::warn!(target: "scorm", $($arg)+);
		}
	};
}
pub(crate) use lms_warn;

pub mod config;
pub mod connection;
pub mod data;
pub mod error;
pub mod host;
pub mod inspector;
pub mod locator;
pub mod protocol;
pub mod session;
pub mod status;
pub mod testing;

pub use config::SessionConfig;
pub use connection::Connection;
pub use data::{DataChannel, FieldValue, NULL_VALUE};
pub use error::{Error, HostFault, Result, UNPARSABLE_ERROR_CODE};
pub use host::{HostApi, HostFrame};
pub use inspector::{ErrorInspector, parse_error_code};
pub use locator::{ApiLocator, FIND_ATTEMPT_LIMIT};
pub use protocol::{AiccApi, Scorm12Api, Scorm2004Api, SessionProtocol};
pub use scorm_protocol::{HostValue, ProtocolVersion, to_boolean};
pub use session::{ConnectionState, Session, StatusCache};
pub use status::{StatusAction, StatusReply};
