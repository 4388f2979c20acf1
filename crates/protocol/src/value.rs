//! Loosely-typed values returned by host API calls.

use std::fmt;

/// Raw result of a host method call.
///
/// Host objects are scripted and may answer with a string, a boolean, a
/// number, or nothing at all. The session never trusts the shape; it coerces
/// with [`to_boolean`] or [`HostValue::render`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HostValue {
	/// The call returned nothing.
	#[default]
	Undefined,
	/// The call returned an explicit null.
	Null,
	/// A boolean result.
	Bool(bool),
	/// A numeric result.
	Number(f64),
	/// A string result.
	Text(String),
}

impl HostValue {
	/// Creates a string value.
	pub fn text(value: impl Into<String>) -> Self {
		Self::Text(value.into())
	}

	/// Returns the string form of this value as a script host would print it.
	pub fn render(&self) -> String {
		match self {
			Self::Undefined => "undefined".to_string(),
			Self::Null => "null".to_string(),
			Self::Bool(b) => b.to_string(),
			Self::Number(n) => render_number(*n),
			Self::Text(s) => s.clone(),
		}
	}

	/// Returns true for the empty string, the value hosts use to signal
	/// "no value or error" from a read.
	pub fn is_empty_text(&self) -> bool {
		matches!(self, Self::Text(s) if s.is_empty())
	}
}

impl fmt::Display for HostValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.render())
	}
}

impl From<&str> for HostValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for HostValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<bool> for HostValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

fn render_number(n: f64) -> String {
	if n.is_nan() {
		"NaN".to_string()
	} else if n.is_infinite() {
		if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
	} else if n.fract() == 0.0 && n.abs() < 1e15 {
		format!("{}", n as i64)
	} else {
		n.to_string()
	}
}

/// Strings hosts use for a successful boolean result.
pub const TRUTHY_STRINGS: [&str; 2] = ["true", "1"];

/// Coerces a host result to a boolean.
///
/// Strings are true only when they match [`TRUTHY_STRINGS`] (ASCII
/// case-insensitive, surrounding whitespace ignored). Numbers are true when
/// non-zero. Null and undefined are false.
pub fn to_boolean(value: &HostValue) -> bool {
	match value {
		HostValue::Bool(b) => *b,
		HostValue::Number(n) => *n != 0.0 && !n.is_nan(),
		HostValue::Text(s) => {
			let s = s.trim();
			TRUTHY_STRINGS.iter().any(|t| s.eq_ignore_ascii_case(t))
		}
		HostValue::Undefined | HostValue::Null => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn coerces_truthy_strings() {
		assert!(to_boolean(&HostValue::text("true")));
		assert!(to_boolean(&HostValue::text("TRUE")));
		assert!(to_boolean(&HostValue::text(" 1 ")));
		assert!(!to_boolean(&HostValue::text("false")));
		assert!(!to_boolean(&HostValue::text("0")));
		assert!(!to_boolean(&HostValue::text("")));
		assert!(!to_boolean(&HostValue::text("10")));
	}

	#[test]
	fn coerces_non_strings() {
		assert!(to_boolean(&HostValue::Bool(true)));
		assert!(to_boolean(&HostValue::Number(1.0)));
		assert!(!to_boolean(&HostValue::Number(0.0)));
		assert!(!to_boolean(&HostValue::Null));
		assert!(!to_boolean(&HostValue::Undefined));
	}

	#[test]
	fn renders_like_a_script_host() {
		assert_eq!(HostValue::Null.render(), "null");
		assert_eq!(HostValue::Number(101.0).render(), "101");
		assert_eq!(HostValue::Number(0.5).render(), "0.5");
		assert_eq!(HostValue::Bool(false).render(), "false");
		assert!(HostValue::text("").is_empty_text());
		assert!(!HostValue::Null.is_empty_text());
	}
}
