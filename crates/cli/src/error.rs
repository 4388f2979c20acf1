use std::path::PathBuf;

use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	/// The fixture could not be read or parsed.
	#[error("failed to load fixture {}", path.display())]
	Fixture {
		path: PathBuf,
		#[source]
		source: anyhow::Error,
	},

	/// The report has already been printed; only the exit status remains.
	#[error("{failed} of {checked} expectations failed")]
	ExpectationsFailed { failed: usize, checked: usize },
}

impl CliError {
	pub fn is_output_already_printed(&self) -> bool {
		matches!(self, CliError::ExpectationsFailed { .. })
	}

	pub fn code(&self) -> ErrorCode {
		match self {
			CliError::Fixture { .. } => ErrorCode::FixtureInvalid,
			CliError::ExpectationsFailed { .. } => ErrorCode::ExpectationFailed,
		}
	}

	/// Converts to the structured error of the output envelope, folding the
	/// source chain into the message.
	pub fn to_command_error(&self) -> CommandError {
		let mut message = self.to_string();
		let mut source = std::error::Error::source(self);
		while let Some(cause) = source {
			message.push_str(": ");
			message.push_str(&cause.to_string());
			source = cause.source();
		}
		CommandError {
			code: self.code(),
			message,
		}
	}
}
