//! Comparison configuration errors.

use thiserror::Error;

/// Errors raised while running a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CmpError {
	/// More than one comparer-class rule claimed the same value pair.
	#[error("ambiguous set of applicable rules at {path}: {}", rules.join(", "))]
	Ambiguous {
		/// Location of the contested pair.
		path: String,
		/// Names of the conflicting rules.
		rules: Vec<String>,
	},
}
