//! Error types for LMS sessions.
//!
//! Every variant belongs to one of four kinds: discovery failures, protocol or
//! state violations, host-reported failures, and caller-input errors. The
//! `bool`/`String` operations on [`Session`](crate::Session) views never
//! return these; they log them and degrade to a safe default.

use std::fmt;

use thiserror::Error;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error code reported by the host when it answered with something that is
/// not a base-10 integer.
pub const UNPARSABLE_ERROR_CODE: i64 = -1;

/// Error code and description read back from the host after a failed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostFault {
	/// Last error code, or [`UNPARSABLE_ERROR_CODE`].
	pub code: i64,
	/// Host description of `code`.
	pub description: String,
}

impl fmt::Display for HostFault {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "error code {}", self.code)?;
		if !self.description.is_empty() {
			write!(f, " ({})", self.description)?;
		}
		Ok(())
	}
}

/// Errors that can occur while discovering or talking to an LMS API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
	/// No API object was found in the frame, opener or parent document.
	#[error("LMS API not found after {attempts} find attempts (limit {limit})")]
	ApiNotFound { attempts: usize, limit: usize },

	/// Operation requires an active connection.
	#[error("{operation}: connection is not active")]
	NotActive { operation: &'static str },

	/// Initialize was called on an active connection.
	#[error("connection is already active")]
	AlreadyActive,

	/// The host rejected a call and reported a non-zero error code.
	#[error("{operation} failed: {fault}")]
	Host {
		operation: &'static str,
		fault: HostFault,
	},

	/// The host rejected a call but reported error code 0.
	#[error("{operation} failed with no error code; the call is likely being made incorrectly")]
	Unconfirmed { operation: &'static str },

	/// The host's last-error call did not return an integer.
	#[error("host returned non-numeric error code '{raw}'")]
	UnparsableErrorCode { raw: String },

	/// A required argument was omitted.
	#[error("{0}: value was not specified")]
	MissingArgument(&'static str),

	/// A status action other than `get` or `set`.
	#[error("status: unknown action '{0}'")]
	UnknownAction(String),
}

impl Error {
	/// Returns true if no host API could be located.
	pub fn is_discovery(&self) -> bool {
		matches!(self, Error::ApiNotFound { .. })
	}

	/// Returns true if the operation was not allowed in the current
	/// connection state.
	pub fn is_state_violation(&self) -> bool {
		matches!(self, Error::NotActive { .. } | Error::AlreadyActive)
	}

	/// Returns true if the host itself reported or implied the failure.
	pub fn is_host(&self) -> bool {
		matches!(
			self,
			Error::Host { .. } | Error::Unconfirmed { .. } | Error::UnparsableErrorCode { .. }
		)
	}

	/// Returns true if the caller supplied bad input.
	pub fn is_caller_input(&self) -> bool {
		matches!(self, Error::MissingArgument(_) | Error::UnknownAction(_))
	}

	/// Returns the host fault, if the host reported one.
	pub fn fault(&self) -> Option<&HostFault> {
		match self {
			Error::Host { fault, .. } => Some(fault),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn host_error_message_includes_code_and_description() {
		let err = Error::Host {
			operation: "data.get",
			fault: HostFault {
				code: 401,
				description: "Not implemented error".to_string(),
			},
		};
		assert_eq!(err.to_string(), "data.get failed: error code 401 (Not implemented error)");
		assert!(err.is_host());
		assert_eq!(err.fault().map(|f| f.code), Some(401));
	}

	#[test]
	fn taxonomy_is_disjoint() {
		let errors = [
			Error::ApiNotFound { attempts: 3, limit: 500 },
			Error::NotActive { operation: "data.save" },
			Error::Unconfirmed { operation: "connection.initialize" },
			Error::MissingArgument("status"),
		];
		for err in &errors {
			let kinds = [err.is_discovery(), err.is_state_violation(), err.is_host(), err.is_caller_input()];
			assert_eq!(kinds.iter().filter(|k| **k).count(), 1, "{err:?}");
		}
	}
}
