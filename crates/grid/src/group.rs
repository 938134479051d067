//! Shared-size group keys.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ConfigurationError;

/// Name of a shared-size group.
///
/// Cheap to clone; compares by name. Valid names start with an ASCII letter
/// or underscore and continue with ASCII letters, digits or underscores.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey(Arc<str>);

impl GroupKey {
	/// Validates `name` and wraps it.
	pub fn new(name: &str) -> Result<Self, ConfigurationError> {
		let mut chars = name.chars();
		let valid_head = chars
			.next()
			.is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
		if !valid_head || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
			return Err(ConfigurationError::InvalidGroupKey(name.to_owned()));
		}
		Ok(Self(Arc::from(name)))
	}

	/// Returns the group name.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl FromStr for GroupKey {
	type Err = ConfigurationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

impl Borrow<str> for GroupKey {
	fn borrow(&self) -> &str {
		self.as_str()
	}
}

impl fmt::Debug for GroupKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("GroupKey").field(&self.as_str()).finish()
	}
}

impl fmt::Display for GroupKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
