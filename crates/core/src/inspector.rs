//! Last-error inspection.
//!
//! Hosts signal failure ambiguously: a rejected read returns `""`, which is
//! also a legal value, and some hosts return a truthy result while recording
//! an error. Every session operation therefore reads the error code back
//! through [`ErrorInspector`] before trusting a result.

use scorm_protocol::HostValue;

use crate::error::{Error, HostFault, Result, UNPARSABLE_ERROR_CODE};
use crate::session::Session;

/// Error code view over a [`Session`] (`session.debug()`).
pub struct ErrorInspector<'a> {
	session: &'a mut Session,
}

impl<'a> ErrorInspector<'a> {
	pub(crate) fn new(session: &'a mut Session) -> Self {
		Self { session }
	}

	/// Returns the host's last error code, or 0 when no API is available.
	///
	/// A non-numeric answer is [`Error::UnparsableErrorCode`], never 0.
	pub fn code(&mut self) -> Result<u32> {
		match self.session.locator.handle() {
			Some(api) => parse_error_code(&api.last_error()),
			None => {
				crate::lms_trace!(self.session.trace_enabled(), "debug.getCode: API is null");
				Ok(0)
			}
		}
	}

	/// Returns the last error code, or [`UNPARSABLE_ERROR_CODE`] when the
	/// host answered with something other than an integer.
	pub fn get_code(&mut self) -> i64 {
		match self.code() {
			Ok(code) => i64::from(code),
			Err(err) => {
				self.session.report(err);
				UNPARSABLE_ERROR_CODE
			}
		}
	}

	/// Returns the host's description of `code`, or `""` without an API.
	pub fn get_info(&mut self, code: i64) -> String {
		match self.session.locator.handle() {
			Some(api) => api.error_string(&code.to_string()).render(),
			None => {
				crate::lms_trace!(self.session.trace_enabled(), "debug.getInfo: API is null");
				String::new()
			}
		}
	}

	/// Returns the host's diagnostic detail for `code`, or `""` without an
	/// API.
	pub fn get_diagnostic(&mut self, code: i64) -> String {
		match self.session.locator.handle() {
			Some(api) => api.diagnostic(&code.to_string()).render(),
			None => {
				crate::lms_trace!(self.session.trace_enabled(), "debug.getDiagnosticInfo: API is null");
				String::new()
			}
		}
	}

	/// Returns the current fault, if the last error code is not 0.
	pub fn fault(&mut self) -> Option<HostFault> {
		match self.code() {
			Ok(0) => None,
			Ok(code) => Some(self.describe(i64::from(code))),
			Err(_) => Some(self.describe(UNPARSABLE_ERROR_CODE)),
		}
	}

	/// Accepts a provisional success only if the error code is 0.
	pub(crate) fn confirm(&mut self, operation: &'static str) -> Result<()> {
		match self.code() {
			Ok(0) => Ok(()),
			Ok(code) => Err(Error::Host {
				operation,
				fault: self.describe(i64::from(code)),
			}),
			Err(err) => Err(err),
		}
	}

	/// Builds the error for a call the host rejected.
	pub(crate) fn failure(&mut self, operation: &'static str) -> Error {
		match self.code() {
			Ok(0) => Error::Unconfirmed { operation },
			Ok(code) => Error::Host {
				operation,
				fault: self.describe(i64::from(code)),
			},
			Err(err) => err,
		}
	}

	fn describe(&mut self, code: i64) -> HostFault {
		HostFault {
			code,
			description: self.get_info(code),
		}
	}
}

/// Parses a last-error result as a base-10 integer.
pub fn parse_error_code(raw: &HostValue) -> Result<u32> {
	match raw {
		HostValue::Text(s) => s
			.trim()
			.parse::<u32>()
			.map_err(|_| Error::UnparsableErrorCode { raw: s.clone() }),
		HostValue::Number(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX) => Ok(*n as u32),
		other => Err(Error::UnparsableErrorCode { raw: other.render() }),
	}
}
