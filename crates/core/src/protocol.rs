//! Per-variant bindings of the session operations to host method calls.

use std::rc::Rc;

use scorm_protocol::{FieldMap, HostValue, LMS_METHODS, ProtocolVersion, SCORM_2004_METHODS};

use crate::host::HostApi;

/// Session operations against a located host API.
///
/// Chosen once at discovery by [`bind`] and held for the lifetime of the
/// session. Results are returned raw; coercion and error checks belong to the
/// caller.
pub trait SessionProtocol {
	/// Returns the protocol variant this binding speaks.
	fn version(&self) -> ProtocolVersion;

	/// Returns the variant's tracked field names.
	fn fields(&self) -> &'static FieldMap {
		self.version().fields()
	}

	/// Begins the communication session.
	fn begin(&self) -> HostValue;

	/// Ends the communication session.
	fn end(&self) -> HostValue;

	/// Reads a data-model element.
	fn get_value(&self, field: &str) -> HostValue;

	/// Writes a data-model element.
	fn set_value(&self, field: &str, value: &str) -> HostValue;

	/// Persists buffered writes.
	fn commit(&self) -> HostValue;

	/// Returns the last error code.
	fn last_error(&self) -> HostValue;

	/// Returns the description of `code`.
	fn error_string(&self, code: &str) -> HostValue;

	/// Returns vendor-specific detail for `code`.
	fn diagnostic(&self, code: &str) -> HostValue;
}

/// Binds `host` to the implementation for `version`.
pub fn bind(version: ProtocolVersion, host: Rc<dyn HostApi>) -> Rc<dyn SessionProtocol> {
	match version {
		ProtocolVersion::Scorm12 => Rc::new(Scorm12Api::new(host)),
		ProtocolVersion::Scorm2004 => Rc::new(Scorm2004Api::new(host)),
		ProtocolVersion::Aicc => Rc::new(AiccApi::new(host)),
	}
}

/// SCORM 1.2 binding (`LMSInitialize`, `LMSGetValue`, ...).
pub struct Scorm12Api {
	host: Rc<dyn HostApi>,
}

impl Scorm12Api {
	pub fn new(host: Rc<dyn HostApi>) -> Self {
		Self { host }
	}
}

impl SessionProtocol for Scorm12Api {
	fn version(&self) -> ProtocolVersion {
		ProtocolVersion::Scorm12
	}

	fn begin(&self) -> HostValue {
		self.host.call(LMS_METHODS.begin, &[""])
	}

	fn end(&self) -> HostValue {
		self.host.call(LMS_METHODS.end, &[""])
	}

	fn get_value(&self, field: &str) -> HostValue {
		self.host.call(LMS_METHODS.get_value, &[field])
	}

	fn set_value(&self, field: &str, value: &str) -> HostValue {
		self.host.call(LMS_METHODS.set_value, &[field, value])
	}

	fn commit(&self) -> HostValue {
		self.host.call(LMS_METHODS.commit, &[""])
	}

	fn last_error(&self) -> HostValue {
		self.host.call(LMS_METHODS.last_error, &[])
	}

	fn error_string(&self, code: &str) -> HostValue {
		self.host.call(LMS_METHODS.error_string, &[code])
	}

	fn diagnostic(&self, code: &str) -> HostValue {
		self.host.call(LMS_METHODS.diagnostic, &[code])
	}
}

/// SCORM 2004 binding (`Initialize`, `GetValue`, ...).
pub struct Scorm2004Api {
	host: Rc<dyn HostApi>,
}

impl Scorm2004Api {
	pub fn new(host: Rc<dyn HostApi>) -> Self {
		Self { host }
	}
}

impl SessionProtocol for Scorm2004Api {
	fn version(&self) -> ProtocolVersion {
		ProtocolVersion::Scorm2004
	}

	fn begin(&self) -> HostValue {
		self.host.call(SCORM_2004_METHODS.begin, &[""])
	}

	fn end(&self) -> HostValue {
		self.host.call(SCORM_2004_METHODS.end, &[""])
	}

	fn get_value(&self, field: &str) -> HostValue {
		self.host.call(SCORM_2004_METHODS.get_value, &[field])
	}

	fn set_value(&self, field: &str, value: &str) -> HostValue {
		self.host.call(SCORM_2004_METHODS.set_value, &[field, value])
	}

	fn commit(&self) -> HostValue {
		self.host.call(SCORM_2004_METHODS.commit, &[""])
	}

	fn last_error(&self) -> HostValue {
		self.host.call(SCORM_2004_METHODS.last_error, &[])
	}

	fn error_string(&self, code: &str) -> HostValue {
		self.host.call(SCORM_2004_METHODS.error_string, &[code])
	}

	fn diagnostic(&self, code: &str) -> HostValue {
		self.host.call(SCORM_2004_METHODS.diagnostic, &[code])
	}
}

/// AICC binding. AICC adapters answer to the SCORM 1.2 method names but
/// have no entry or exit element.
pub struct AiccApi {
	inner: Scorm12Api,
}

impl AiccApi {
	pub fn new(host: Rc<dyn HostApi>) -> Self {
		Self {
			inner: Scorm12Api::new(host),
		}
	}
}

impl SessionProtocol for AiccApi {
	fn version(&self) -> ProtocolVersion {
		ProtocolVersion::Aicc
	}

	fn begin(&self) -> HostValue {
		self.inner.begin()
	}

	fn end(&self) -> HostValue {
		self.inner.end()
	}

	fn get_value(&self, field: &str) -> HostValue {
		self.inner.get_value(field)
	}

	fn set_value(&self, field: &str, value: &str) -> HostValue {
		self.inner.set_value(field, value)
	}

	fn commit(&self) -> HostValue {
		self.inner.commit()
	}

	fn last_error(&self) -> HostValue {
		self.inner.last_error()
	}

	fn error_string(&self, code: &str) -> HostValue {
		self.inner.error_string(code)
	}

	fn diagnostic(&self, code: &str) -> HostValue {
		self.inner.diagnostic(code)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::MockLms;

	#[test]
	fn bindings_call_variant_method_names() {
		let lms = MockLms::new(ProtocolVersion::Scorm2004);
		let api = bind(ProtocolVersion::Scorm2004, lms.clone());
		api.begin();
		api.commit();
		assert_eq!(lms.count("Initialize"), 1);
		assert_eq!(lms.count("Commit"), 1);
		assert_eq!(lms.count("LMSCommit"), 0);
	}

	#[test]
	fn aicc_uses_lms_names_and_own_fields() {
		let lms = MockLms::new(ProtocolVersion::Aicc);
		let api = bind(ProtocolVersion::Aicc, lms.clone());
		api.begin();
		assert_eq!(lms.count("LMSInitialize"), 1);
		assert_eq!(api.version(), ProtocolVersion::Aicc);
		assert_eq!(api.fields().exit, None);
	}
}
