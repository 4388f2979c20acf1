//! Data-model reads, writes and commits.

use scorm_protocol::{HostValue, is_completion_field, to_boolean};

use crate::error::Result;
use crate::session::Session;

const GET: &str = "data.get";
const SET: &str = "data.set";
const SAVE: &str = "data.save";

/// String returned by [`DataChannel::get`] when no value could be read.
pub const NULL_VALUE: &str = "null";

/// Successful read of a data-model element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
	/// The element holds a value.
	Value(String),
	/// The element is legitimately empty (empty string with error code 0).
	Empty,
}

impl FieldValue {
	pub fn as_str(&self) -> &str {
		match self {
			FieldValue::Value(value) => value,
			FieldValue::Empty => "",
		}
	}

	pub fn into_string(self) -> String {
		match self {
			FieldValue::Value(value) => value,
			FieldValue::Empty => String::new(),
		}
	}
}

/// Data-model view over a [`Session`] (`session.data()`).
pub struct DataChannel<'a> {
	session: &'a mut Session,
}

impl<'a> DataChannel<'a> {
	pub(crate) fn new(session: &'a mut Session) -> Self {
		Self { session }
	}

	/// Reads `field` from the host.
	///
	/// An empty or missing result is checked against the error code: code 0
	/// makes it [`FieldValue::Empty`], anything else is a failure.
	pub fn read(&mut self, field: &str) -> Result<FieldValue> {
		crate::lms_trace!(self.session.trace_enabled(), field, "data.get called");
		self.session.ensure_active(GET)?;
		let api = self.session.api(GET)?;

		let raw = api.get_value(field);
		let value = match &raw {
			HostValue::Text(text) if !text.is_empty() => FieldValue::Value(text.clone()),
			HostValue::Bool(_) | HostValue::Number(_) => FieldValue::Value(raw.render()),
			_ => match self.session.debug().code() {
				Ok(0) if raw.is_empty_text() => FieldValue::Empty,
				Ok(0) => FieldValue::Value(raw.render()),
				_ => {
					let err = self.session.debug().failure(GET);
					return Err(self.session.report(err));
				}
			},
		};

		let fields = api.fields();
		if fields.tracks_completion(field) {
			self.session.cache.completion_status = Some(value.as_str().to_string());
		}
		if fields.is_exit(field) {
			self.session.cache.exit_status = Some(value.as_str().to_string());
		}

		crate::lms_trace!(self.session.trace_enabled(), field, value = value.as_str(), "data.get value");
		Ok(value)
	}

	/// Reads `field`, returning `"null"` on any failure.
	pub fn get(&mut self, field: &str) -> String {
		match self.read(field) {
			Ok(value) => value.into_string(),
			Err(_) => NULL_VALUE.to_string(),
		}
	}

	/// Writes `value` to `field`.
	pub fn write(&mut self, field: &str, value: &str) -> Result<()> {
		crate::lms_trace!(self.session.trace_enabled(), field, value, "data.set called");
		self.session.ensure_active(SET)?;
		let api = self.session.api(SET)?;

		if !to_boolean(&api.set_value(field, value)) {
			let err = self.session.debug().failure(SET);
			return Err(self.session.report(err));
		}

		if is_completion_field(field) {
			self.session.cache.completion_status = Some(value.to_string());
		}
		Ok(())
	}

	/// Writes `value` to `field`, returning false on any failure.
	pub fn set(&mut self, field: &str, value: &str) -> bool {
		self.write(field, value).is_ok()
	}

	/// Asks the host to persist buffered writes.
	pub fn commit(&mut self) -> Result<()> {
		crate::lms_trace!(self.session.trace_enabled(), "data.save called");
		self.session.ensure_active(SAVE)?;
		let api = self.session.api(SAVE)?;

		if to_boolean(&api.commit()) {
			Ok(())
		} else {
			let err = self.session.debug().failure(SAVE);
			Err(self.session.report(err))
		}
	}

	/// Asks the host to persist buffered writes, returning false on any
	/// failure.
	pub fn save(&mut self) -> bool {
		self.commit().is_ok()
	}
}

impl Session {
	/// Reads `field`. Shorthand for `session.data().get(field)`.
	pub fn get(&mut self, field: &str) -> String {
		self.data().get(field)
	}

	/// Writes `field`. Shorthand for `session.data().set(field, value)`.
	pub fn set(&mut self, field: &str, value: &str) -> bool {
		self.data().set(field, value)
	}

	/// Commits. Shorthand for `session.data().save()`.
	pub fn save(&mut self) -> bool {
		self.data().save()
	}
}
