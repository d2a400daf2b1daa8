//! Override rules that short-circuit structural comparison.
//!
//! A [`Rule`] is a set of filters plus an action. At every value pair the
//! engine collects the rules whose filters all pass:
//!
//! * any applicable [`Rule::ignore`] makes the pair equal and stops there;
//! * exactly one applicable comparer-class rule decides the pair;
//! * two or more comparer-class rules on the same pair are a configuration
//!   error ([`CmpError::Ambiguous`](crate::CmpError::Ambiguous)).

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::node::Compare;
use crate::path::{Path, Step};

type ValueFilter = Arc<dyn Fn(&dyn Compare, &dyn Compare) -> bool + Send + Sync>;
type PathFilter = Arc<dyn Fn(&Path) -> bool + Send + Sync>;
type Decide = Arc<dyn Fn(&dyn Compare, &dyn Compare) -> Option<bool> + Send + Sync>;

#[derive(Clone)]
enum Filter {
	Values(ValueFilter),
	Path(PathFilter),
}

#[derive(Clone)]
enum Action {
	Ignore,
	/// Comparer-class: returns `None` when the pair is outside its domain.
	Decide(Decide),
}

/// What a rule says about one value pair.
pub(crate) enum Applied {
	NotApplicable,
	Ignore,
	Decided(bool),
}

/// A pluggable override for the deep-equality engine.
#[derive(Clone)]
pub struct Rule {
	name: Cow<'static, str>,
	filters: Vec<Filter>,
	action: Action,
}

impl Rule {
	/// Treats every pair it applies to as equal without looking inside.
	///
	/// Never conflicts with other rules.
	pub fn ignore() -> Self {
		Self {
			name: Cow::Borrowed("Ignore"),
			filters: Vec::new(),
			action: Action::Ignore,
		}
	}

	/// Comparer-class rule that reports every pair it applies to as equal.
	pub fn equal() -> Self {
		Self::decide("Equal", |_, _| Some(true))
	}

	/// Comparer-class rule from a raw decision function.
	///
	/// `decide` returns `None` for pairs it does not claim.
	pub fn decide<F>(name: impl Into<Cow<'static, str>>, decide: F) -> Self
	where
		F: Fn(&dyn Compare, &dyn Compare) -> Option<bool> + Send + Sync + 'static,
	{
		Self {
			name: name.into(),
			filters: Vec::new(),
			action: Action::Decide(Arc::new(decide)),
		}
	}

	/// Comparer-class rule applied to pairs where both sides are a `T`.
	pub fn comparer<T, F>(eq: F) -> Self
	where
		T: Any,
		F: Fn(&T, &T) -> bool + Send + Sync + 'static,
	{
		let name = format!("Comparer({})", std::any::type_name::<T>());
		Self::decide(name, move |x, y| {
			let x: &dyn Any = x;
			let y: &dyn Any = y;
			Some(eq(x.downcast_ref::<T>()?, y.downcast_ref::<T>()?))
		})
	}

	/// Restricts `rule` to pairs accepted by `filter`.
	pub fn filter_values<F>(filter: F, mut rule: Rule) -> Self
	where
		F: Fn(&dyn Compare, &dyn Compare) -> bool + Send + Sync + 'static,
	{
		rule.name = Cow::Owned(format!("FilterValues({})", rule.name));
		rule.filters.push(Filter::Values(Arc::new(filter)));
		rule
	}

	/// Restricts `rule` to pairs located at paths accepted by `filter`.
	pub fn filter_path<F>(filter: F, mut rule: Rule) -> Self
	where
		F: Fn(&Path) -> bool + Send + Sync + 'static,
	{
		rule.name = Cow::Owned(format!("FilterPath({})", rule.name));
		rule.filters.push(Filter::Path(Arc::new(filter)));
		rule
	}

	/// Ignores record fields with any of the given names.
	pub fn ignore_fields(fields: &[&'static str]) -> Self {
		let fields = fields.to_vec();
		let label = fields.join(", ");
		Self::filter_path(move |path| matches!(path.last(), Some(Step::Field(name)) if fields.contains(name)), Self::ignore())
			.named(format!("IgnoreFields({label})"))
	}

	/// Replaces the name shown in ambiguity errors.
	#[must_use]
	pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
		self.name = name.into();
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// True for rules that decide pairs exclusively and can therefore
	/// conflict with one another.
	pub fn is_comparer(&self) -> bool {
		matches!(self.action, Action::Decide(_))
	}

	pub(crate) fn apply(&self, path: &Path, x: &dyn Compare, y: &dyn Compare) -> Applied {
		let admitted = self.filters.iter().all(|filter| match filter {
			Filter::Values(filter) => filter(x, y),
			Filter::Path(filter) => filter(path),
		});
		if !admitted {
			return Applied::NotApplicable;
		}
		match &self.action {
			Action::Ignore => Applied::Ignore,
			Action::Decide(decide) => decide(x, y).map_or(Applied::NotApplicable, Applied::Decided),
		}
	}
}

impl fmt::Debug for Rule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Rule").field(&self.name).finish()
	}
}
