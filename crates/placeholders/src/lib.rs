//! Placeholder references for deep-equality tests.
//!
//! A placeholder is a freshly allocated, uniquely addressed object. Under the
//! [`ignore`] rule, any reference to it matches anything at all, while the
//! rest of the value is still compared structurally:
//!
//! ```ignore
//! use placeholders::{Ref, Scope, cmp::Compare};
//!
//! #[derive(Compare)]
//! #[compare(crate = placeholders::cmp)]
//! struct Greeting {
//!     who: Ref<String>,
//!     text: String,
//! }
//!
//! let scope = Scope::new();
//! let expected = Greeting { who: placeholders::make(&scope), text: "hi".into() };
//! let actual = Greeting { who: Ref::new("world".into()), text: "hi".into() };
//! assert!(placeholders::cmp::equal(&expected, &actual, &[placeholders::ignore()]));
//! ```
//!
//! Only the reference is a wildcard. The pointee of a placeholder is an
//! ordinary zero value and compares like one. Placeholders stay registered
//! until the [`Scope`] (or any other [`Cleanup`] implementation) they were
//! made in ends.
//!
//! `#[derive(Compare)]` names the engine as `::placeholders_cmp` by default.
//! Crates that only depend on `placeholders` point it at the re-export with
//! `#[compare(crate = placeholders::cmp)]`.

extern crate self as placeholders;

mod ptr;
mod registry;
mod scope;

pub use placeholders_cmp as cmp;
pub use placeholders_macros::Pointer;
pub use ptr::{Pointer, Ref, WeakRef};
pub use registry::Registry;
pub use scope::{Cleanup, Scope};

use placeholders_cmp::{Compare, Rule};

/// Allocates a placeholder in the global registry, released when `scope`
/// ends.
///
/// `P` is any [`Pointer`]: `Ref<T>`, `Option<Ref<T>>`, the weak variants,
/// or a newtype deriving `Pointer`.
pub fn make<P: Pointer>(scope: &(impl Cleanup + ?Sized)) -> P {
	Registry::global().make(scope)
}

/// Reports whether `value` references a live placeholder of the global
/// registry.
pub fn is_placeholder(value: &dyn Compare) -> bool {
	Registry::global().is_placeholder(value)
}

/// Ignore rule for global placeholders. See [`Registry::ignore`].
pub fn ignore() -> Rule {
	Registry::global().ignore()
}

/// Comparer-class rule for global placeholders. See [`Registry::comparer`].
///
/// Combining it with another comparer that claims the same pair makes the
/// comparison fail as ambiguous.
pub fn comparer() -> Rule {
	Registry::global().comparer()
}

#[cfg(test)]
mod tests;
