//! Location of a value pair inside the compared structures.

use std::fmt;

/// One step from a parent value to a child value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
	Field(&'static str),
	Index(usize),
	Key(String),
	/// Into the payload of a `Some`.
	Some,
	/// Through a reference to its target.
	Deref,
	/// Into a dynamically typed box holding the named type.
	Dyn(&'static str),
	Variant(&'static str),
}

/// Steps taken from the root of a comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
	root: String,
	steps: Vec<Step>,
}

impl Path {
	/// Starts a path at a root value of type `root`.
	pub fn new(root: &str) -> Self {
		Self {
			root: short_type_name(root),
			steps: Vec::new(),
		}
	}

	pub fn steps(&self) -> &[Step] {
		&self.steps
	}

	pub fn last(&self) -> Option<&Step> {
		self.steps.last()
	}

	pub(crate) fn push(&mut self, step: Step) {
		self.steps.push(step);
	}

	pub(crate) fn pop(&mut self) {
		self.steps.pop();
	}
}

impl fmt::Display for Path {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.root)?;
		for step in &self.steps {
			match step {
				Step::Field(name) => write!(f, ".{name}")?,
				Step::Index(index) => write!(f, "[{index}]")?,
				Step::Key(key) => write!(f, "[{key}]")?,
				Step::Some | Step::Deref => {}
				Step::Dyn(name) => write!(f, ".({name})")?,
				Step::Variant(name) => write!(f, "::{name}")?,
			}
		}
		Ok(())
	}
}

/// Strips module paths from every segment of a type name.
///
/// `alloc::vec::Vec<my::Foo>` becomes `Vec<Foo>`.
pub(crate) fn short_type_name(name: &str) -> String {
	let mut out = String::with_capacity(name.len());
	let mut segment_start = 0;
	let mut chars = name.chars().peekable();
	while let Some(c) = chars.next() {
		if c == ':' && chars.peek() == Some(&':') {
			chars.next();
			out.truncate(segment_start);
			continue;
		}
		out.push(c);
		if !(c.is_alphanumeric() || c == '_') {
			segment_start = out.len();
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn short_type_name_strips_nested_module_paths() {
		assert_eq!(short_type_name("alloc::vec::Vec<my::mod::Foo>"), "Vec<Foo>");
		assert_eq!(short_type_name("Option<alloc::string::String>"), "Option<String>");
		assert_eq!(short_type_name("u64"), "u64");
	}

	#[test]
	fn display_joins_steps() {
		let mut path = Path::new("crate::Foo");
		path.push(Step::Field("items"));
		path.push(Step::Index(2));
		path.push(Step::Some);
		path.push(Step::Deref);
		path.push(Step::Field("name"));
		assert_eq!(path.to_string(), "Foo.items[2].name");
		assert_eq!(path.steps().len(), 5);
		assert_eq!(path.last(), Some(&Step::Field("name")));

		path.pop();
		assert_eq!(path.steps(), &[Step::Field("items"), Step::Index(2), Step::Some, Step::Deref]);
	}
}
