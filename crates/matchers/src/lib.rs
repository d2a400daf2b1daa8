//! Argument matchers for mock expectations, backed by deep comparison.
//!
//! [`diff_eq`] builds a matcher that accepts arguments deeply equal to an
//! expected value, where placeholders inside the expected value match
//! anything:
//!
//! ```ignore
//! let scope = Scope::new();
//! let matcher = diff_eq(Request { id: placeholders::make(&scope), path: "/".into() }, []);
//! assert!(matcher.matches(&Request { id: Ref::new(7), path: "/".into() }));
//! ```

use std::fmt;

use placeholders_cmp::{CmpError, Compare, Render, Rule, try_diff, try_equal};
use tracing::debug;

/// Decides whether a mock argument satisfies an expectation.
pub trait Matcher<T: ?Sized>: fmt::Display {
	fn matches(&self, x: &T) -> bool;

	/// Describes why `x` does not match, when the matcher can tell.
	fn explain(&self, x: &T) -> Option<String> {
		let _ = x;
		None
	}
}

impl<T: ?Sized, M: Matcher<T> + ?Sized> Matcher<T> for Box<M> {
	fn matches(&self, x: &T) -> bool {
		(**self).matches(x)
	}

	fn explain(&self, x: &T) -> Option<String> {
		(**self).explain(x)
	}
}

/// Matcher accepting values deeply equal to `expected` under `rules` plus
/// [`placeholders::comparer`].
///
/// The placeholder rule is comparer-class. Passing another comparer that
/// claims the same value pairs makes matching panic as ambiguous; merge such
/// rules into a single custom [`Rule::decide`] instead.
pub fn diff_eq<E: Compare>(expected: E, rules: impl IntoIterator<Item = Rule>) -> DiffEq<E> {
	let mut rules: Vec<Rule> = rules.into_iter().collect();
	rules.push(placeholders::comparer());
	DiffEq { expected, rules }
}

/// See [`diff_eq`].
pub struct DiffEq<E> {
	expected: E,
	rules: Vec<Rule>,
}

impl<E: Compare> DiffEq<E> {
	pub fn expected(&self) -> &E {
		&self.expected
	}

	/// Caller rules followed by the placeholder comparer.
	pub fn rules(&self) -> &[Rule] {
		&self.rules
	}

	/// # Errors
	///
	/// Returns [`CmpError::Ambiguous`] when the configured rules conflict.
	pub fn try_matches(&self, x: &dyn Compare) -> Result<bool, CmpError> {
		try_equal(&self.expected, x, &self.rules)
	}

	/// Adapts the matcher to a plain predicate over `T`.
	pub fn into_predicate<T: Compare>(self) -> impl Fn(&T) -> bool {
		move |x: &T| Matcher::<T>::matches(&self, x)
	}
}

impl<E: Compare, T: Compare> Matcher<T> for DiffEq<E> {
	fn matches(&self, x: &T) -> bool {
		match self.try_matches(x) {
			Ok(true) => true,
			Ok(false) => {
				debug!(expected = %self, "argument mismatch");
				false
			}
			Err(err) => panic!("{err}"),
		}
	}

	fn explain(&self, x: &T) -> Option<String> {
		match try_diff(&self.expected, x, &self.rules) {
			Ok(report) if report.is_empty() => None,
			Ok(report) => Some(format!("diff (-want +got):\n{report}")),
			Err(err) => Some(err.to_string()),
		}
	}
}

impl<E: Compare> fmt::Display for DiffEq<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "is equal to {}", Render(&self.expected))
	}
}

impl<E: Compare + fmt::Debug> fmt::Debug for DiffEq<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DiffEq").field("expected", &self.expected).field("rules", &self.rules).finish()
	}
}
