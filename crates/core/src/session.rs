//! [`Session`] context object owning all per-session state.

use std::rc::Rc;

use scorm_protocol::ProtocolVersion;

use crate::config::SessionConfig;
use crate::connection::Connection;
use crate::data::DataChannel;
use crate::error::{Error, Result};
use crate::host::HostFrame;
use crate::inspector::ErrorInspector;
use crate::locator::{ApiLocator, FIND_ATTEMPT_LIMIT};
use crate::protocol::SessionProtocol;

/// Whether the host communication session is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
	#[default]
	Disconnected,
	Active,
}

impl ConnectionState {
	pub fn is_active(self) -> bool {
		self == ConnectionState::Active
	}
}

/// Last known completion and exit values.
///
/// Updated whenever those fields are read or written through the session.
/// Only used to pick exit-mode defaults on terminate; never authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCache {
	pub completion_status: Option<String>,
	pub exit_status: Option<String>,
}

impl StatusCache {
	/// Returns true if an exit value has been seen and is non-empty.
	pub fn has_exit_status(&self) -> bool {
		self.exit_status.as_deref().is_some_and(|s| !s.is_empty())
	}
}

/// One content session against a host LMS API.
///
/// Owns the discovered API handle, the protocol version, the connection
/// state and the status cache. Operations are grouped into borrowed views
/// mirroring the host surface: [`connection`](Self::connection),
/// [`data`](Self::data), [`debug`](Self::debug) and [`status`](Self::status).
///
/// Each view offers typed operations returning [`Result`] and the
/// traditional `bool`/`String` forms that log failures and fall back to a
/// safe default.
pub struct Session {
	pub(crate) config: SessionConfig,
	pub(crate) locator: ApiLocator,
	pub(crate) state: ConnectionState,
	pub(crate) cache: StatusCache,
}

impl Session {
	/// Creates a session that will search for the API starting at `root`,
	/// the frame the content runs in.
	///
	/// Discovery is lazy: nothing is probed until the first operation.
	pub fn new(root: Rc<dyn HostFrame>, config: SessionConfig) -> Self {
		let locator = ApiLocator::new(root, config.version).with_trace(config.trace);
		Self {
			config,
			locator,
			state: ConnectionState::default(),
			cache: StatusCache::default(),
		}
	}

	/// Presence probe for embedding content. Always true.
	pub fn is_available(&self) -> bool {
		true
	}

	pub fn config(&self) -> &SessionConfig {
		&self.config
	}

	/// Returns the configured or discovered protocol version.
	pub fn version(&self) -> Option<ProtocolVersion> {
		self.locator.version()
	}

	pub fn state(&self) -> ConnectionState {
		self.state
	}

	pub fn is_active(&self) -> bool {
		self.state.is_active()
	}

	pub fn status_cache(&self) -> &StatusCache {
		&self.cache
	}

	pub fn locator(&self) -> &ApiLocator {
		&self.locator
	}

	/// Initialize/terminate operations.
	pub fn connection(&mut self) -> Connection<'_> {
		Connection::new(self)
	}

	/// Get/set/save operations.
	pub fn data(&mut self) -> DataChannel<'_> {
		DataChannel::new(self)
	}

	/// Last-error inspection.
	pub fn debug(&mut self) -> ErrorInspector<'_> {
		ErrorInspector::new(self)
	}

	/// Resolves the bound API, reporting discovery failure for `operation`.
	pub(crate) fn api(&mut self, operation: &'static str) -> Result<Rc<dyn SessionProtocol>> {
		match self.locator.handle() {
			Some(api) => Ok(api),
			None => {
				crate::lms_warn!(self.config.trace, operation, "API is null");
				Err(Error::ApiNotFound {
					attempts: self.locator.attempts(),
					limit: FIND_ATTEMPT_LIMIT,
				})
			}
		}
	}

	/// Requires an active connection for `operation`.
	pub(crate) fn ensure_active(&self, operation: &'static str) -> Result<()> {
		if self.state.is_active() {
			Ok(())
		} else {
			Err(self.report(Error::NotActive { operation }))
		}
	}

	/// Logs `err` and hands it back.
	pub(crate) fn report(&self, err: Error) -> Error {
		match err.fault() {
			Some(fault) => crate::lms_warn!(
				self.config.trace,
				code = fault.code,
				description = %fault.description,
				"{err}"
			),
			None => crate::lms_warn!(self.config.trace, "{err}"),
		}
		err
	}

	pub(crate) fn trace_enabled(&self) -> bool {
		self.config.trace
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::MockFrame;

	#[test]
	fn new_session_is_lazy_and_disconnected() {
		let frame = MockFrame::new("content");
		let session = Session::new(frame.clone(), SessionConfig::default());
		assert!(session.is_available());
		assert!(!session.is_active());
		assert_eq!(session.version(), None);
		assert_eq!(frame.probes(), 0);
	}

	#[test]
	fn configured_version_is_known_before_discovery() {
		let frame = MockFrame::new("content");
		let session = Session::new(frame, SessionConfig::new().with_version(ProtocolVersion::Scorm12));
		assert_eq!(session.version(), Some(ProtocolVersion::Scorm12));
	}

	#[test]
	fn empty_exit_status_counts_as_unset() {
		let mut cache = StatusCache::default();
		assert!(!cache.has_exit_status());
		cache.exit_status = Some(String::new());
		assert!(!cache.has_exit_status());
		cache.exit_status = Some("suspend".to_string());
		assert!(cache.has_exit_status());
	}
}
