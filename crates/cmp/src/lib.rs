//! Structural deep equality with pluggable override rules.
//!
//! Values describe their shape through [`Compare`] (usually derived). The
//! engine walks two shapes in lockstep and consults a list of [`Rule`]s at
//! every pair before recursing:
//!
//! ```ignore
//! #[derive(Compare)]
//! struct Point { x: i64, y: i64, label: String }
//!
//! let a = Point { x: 1, y: 2, label: "a".into() };
//! let b = Point { x: 1, y: 2, label: "b".into() };
//! assert!(!placeholders_cmp::equal(&a, &b, &[]));
//! assert!(placeholders_cmp::equal(&a, &b, &[Rule::ignore_fields(&["label"])]));
//! ```
//!
//! References ([`Node::Ref`]) with the same identity are equal without
//! recursion, and cyclic graphs terminate.

extern crate self as placeholders_cmp;

mod engine;
mod error;
mod impls;
mod macros;
mod node;
mod path;
mod render;
mod rule;

pub use engine::Difference;
pub use error::CmpError;
pub use node::{Anchor, Compare, Field, Leaf, Node, Pointee, Record, RefNode, Token};
pub use path::{Path, Step};
#[cfg(feature = "derive")]
pub use placeholders_macros::Compare;
pub use render::{MAX_RENDER_DEPTH, Render};
pub use rule::Rule;

use engine::State;

/// Reports whether `x` and `y` are deeply equal under `rules`.
///
/// # Errors
///
/// Returns [`CmpError::Ambiguous`] when two comparer-class rules claim the
/// same value pair.
pub fn try_equal(x: &dyn Compare, y: &dyn Compare, rules: &[Rule]) -> Result<bool, CmpError> {
	State::new(rules, x, false).compare(x, y)
}

/// Reports whether `x` and `y` are deeply equal under `rules`.
///
/// # Panics
///
/// Panics on a rule conflict (see [`try_equal`]). The conflict is a
/// configuration error in the calling test.
pub fn equal(x: &dyn Compare, y: &dyn Compare, rules: &[Rule]) -> bool {
	match try_equal(x, y, rules) {
		Ok(equal) => equal,
		Err(err) => panic!("{err}"),
	}
}

/// Lists every difference between `x` and `y` under `rules`.
///
/// # Errors
///
/// See [`try_equal`].
pub fn try_differences(x: &dyn Compare, y: &dyn Compare, rules: &[Rule]) -> Result<Vec<Difference>, CmpError> {
	let mut state = State::new(rules, x, true);
	state.compare(x, y)?;
	Ok(state.into_report())
}

/// Renders the differences between `x` and `y`, or an empty string when
/// they are equal.
///
/// # Errors
///
/// See [`try_equal`].
pub fn try_diff(x: &dyn Compare, y: &dyn Compare, rules: &[Rule]) -> Result<String, CmpError> {
	let mut out = String::new();
	for difference in try_differences(x, y, rules)? {
		out.push_str(&format!("{}:\n\t-: {}\n\t+: {}\n", difference.path, difference.left, difference.right));
	}
	Ok(out)
}

/// Renders the differences between `x` and `y`, or an empty string when
/// they are equal.
///
/// # Panics
///
/// Panics on a rule conflict (see [`try_equal`]).
pub fn diff(x: &dyn Compare, y: &dyn Compare, rules: &[Rule]) -> String {
	match try_diff(x, y, rules) {
		Ok(report) => report,
		Err(err) => panic!("{err}"),
	}
}
