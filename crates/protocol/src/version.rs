//! Protocol variants a host API object may implement.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::fields::FieldMap;
use crate::methods::MethodTable;

/// Global property exposing a SCORM 1.2 API object.
pub const SCORM_12_GLOBAL: &str = "API";

/// Global property exposing a SCORM 2004 API object.
pub const SCORM_2004_GLOBAL: &str = "API_1484_11";

/// Document property exposing an AICC API object.
pub const AICC_DOCUMENT_GLOBAL: &str = "AICC_API";

/// One of the three wire-incompatible LMS API variants.
///
/// Serialized with the names content authors use when pinning a version
/// (`"1.2"`, `"2004"`, `"AICC"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolVersion {
	/// SCORM 1.2 (`LMSInitialize`, `cmi.core.*`).
	#[serde(rename = "1.2")]
	Scorm12,
	/// SCORM 2004 (`Initialize`, `cmi.*`).
	#[serde(rename = "2004")]
	Scorm2004,
	/// AICC through a SCORM 1.2 style adapter found on the parent document.
	#[serde(rename = "AICC")]
	Aicc,
}

impl ProtocolVersion {
	/// Variants in discovery preference order.
	pub const ALL: [ProtocolVersion; 3] = [Self::Scorm2004, Self::Scorm12, Self::Aicc];

	/// Returns the wire name of this version.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Scorm12 => "1.2",
			Self::Scorm2004 => "2004",
			Self::Aicc => "AICC",
		}
	}

	/// Returns the window global that exposes this version's API, if the
	/// version is discovered by walking frames.
	///
	/// AICC adapters live on the parent document instead and have no window
	/// global.
	pub fn window_global(self) -> Option<&'static str> {
		match self {
			Self::Scorm12 => Some(SCORM_12_GLOBAL),
			Self::Scorm2004 => Some(SCORM_2004_GLOBAL),
			Self::Aicc => None,
		}
	}

	/// Returns the host method names for this version.
	pub fn methods(self) -> &'static MethodTable {
		MethodTable::for_version(self)
	}

	/// Returns the version-specific data-model field names.
	pub fn fields(self) -> &'static FieldMap {
		FieldMap::for_version(self)
	}
}

impl fmt::Display for ProtocolVersion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when parsing an unknown version name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVersion(pub String);

impl fmt::Display for UnknownVersion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "unknown LMS API version '{}' (expected 1.2, 2004 or AICC)", self.0)
	}
}

impl std::error::Error for UnknownVersion {}

impl FromStr for ProtocolVersion {
	type Err = UnknownVersion;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"1.2" => Ok(Self::Scorm12),
			"2004" => Ok(Self::Scorm2004),
			s if s.eq_ignore_ascii_case("aicc") => Ok(Self::Aicc),
			other => Err(UnknownVersion(other.to_string())),
		}
	}
}
