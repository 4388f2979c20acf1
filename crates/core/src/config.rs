//! Session configuration.

use scorm_protocol::ProtocolVersion;
use serde::{Deserialize, Serialize};

/// Knobs controlling discovery and the automatic status handling done by
/// [`Connection`](crate::Connection).
///
/// Deserializes from camelCase keys with every field optional, so
/// `{"version": "2004"}` is a complete config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
	/// Pins discovery to one protocol variant instead of auto-detecting.
	pub version: Option<ProtocolVersion>,
	/// Marks fresh attempts `incomplete` and commits on initialize.
	pub handle_completion_status: bool,
	/// Writes `suspend` or the normal exit value on terminate.
	pub handle_exit_mode: bool,
	/// Emits diagnostics through `tracing`.
	pub trace: bool,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			version: None,
			handle_completion_status: true,
			handle_exit_mode: true,
			trace: true,
		}
	}
}

impl SessionConfig {
	/// Creates a config that auto-detects the version with all handling on.
	pub fn new() -> Self {
		Self::default()
	}

	/// Pins the protocol version.
	pub fn with_version(mut self, version: ProtocolVersion) -> Self {
		self.version = Some(version);
		self
	}

	pub fn with_completion_status_handling(mut self, enabled: bool) -> Self {
		self.handle_completion_status = enabled;
		self
	}

	pub fn with_exit_mode_handling(mut self, enabled: bool) -> Self {
		self.handle_exit_mode = enabled;
		self
	}

	pub fn with_trace(mut self, enabled: bool) -> Self {
		self.trace = enabled;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_enable_all_handling() {
		let cfg = SessionConfig::default();
		assert_eq!(cfg.version, None);
		assert!(cfg.handle_completion_status);
		assert!(cfg.handle_exit_mode);
		assert!(cfg.trace);
	}

	#[test]
	fn partial_json_keeps_defaults() {
		let cfg: SessionConfig = serde_json::from_str(r#"{"version": "1.2", "handleExitMode": false}"#).unwrap();
		assert_eq!(cfg.version, Some(ProtocolVersion::Scorm12));
		assert!(!cfg.handle_exit_mode);
		assert!(cfg.handle_completion_status);
	}
}
