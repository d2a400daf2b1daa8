//! Human-readable rendering of compared values.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::node::{Compare, Node, Token};
use crate::path::short_type_name;

/// Nesting depth past which values are elided as `...`.
pub const MAX_RENDER_DEPTH: usize = 8;

/// Displays a value through its [`Node`] shape.
///
/// References already being rendered further up print as `<cycle>`.
pub struct Render<'a>(pub &'a dyn Compare);

impl fmt::Display for Render<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		Renderer {
			f,
			active: FxHashSet::default(),
		}
		.value(self.0, 0)
	}
}

struct Renderer<'f, 'o> {
	f: &'f mut fmt::Formatter<'o>,
	active: FxHashSet<Token>,
}

impl Renderer<'_, '_> {
	fn value(&mut self, value: &dyn Compare, depth: usize) -> fmt::Result {
		if depth > MAX_RENDER_DEPTH {
			return self.f.write_str("...");
		}
		match value.node() {
			Node::Leaf(leaf) => write!(self.f, "{leaf:?}"),
			Node::Opt(None) => self.f.write_str("None"),
			Node::Opt(Some(inner)) => {
				self.f.write_str("Some(")?;
				self.value(inner, depth + 1)?;
				self.f.write_str(")")
			}
			Node::Dyn(inner) => self.value(inner, depth),
			Node::Record(record) => {
				match record.variant_name() {
					Some(variant) => write!(self.f, "{}::{variant}", record.name())?,
					None => self.f.write_str(record.name())?,
				}
				let fields = record.fields();
				if fields.is_empty() {
					return Ok(());
				}
				let positional = fields.iter().all(|field| field.is_positional());
				self.f.write_str(if positional { "(" } else { " { " })?;
				for (i, field) in fields.iter().enumerate() {
					if i > 0 {
						self.f.write_str(", ")?;
					}
					if !positional {
						write!(self.f, "{}: ", field.name())?;
					}
					self.value(field.value(), depth + 1)?;
				}
				self.f.write_str(if positional { ")" } else { " }" })
			}
			Node::Seq(items) => {
				self.f.write_str("[")?;
				for (i, item) in items.into_iter().enumerate() {
					if i > 0 {
						self.f.write_str(", ")?;
					}
					self.value(item, depth + 1)?;
				}
				self.f.write_str("]")
			}
			Node::Map(entries) => {
				self.f.write_str("{")?;
				for (i, (key, item)) in entries.into_iter().enumerate() {
					if i > 0 {
						self.f.write_str(", ")?;
					}
					write!(self.f, "{key}: ")?;
					self.value(item, depth + 1)?;
				}
				self.f.write_str("}")
			}
			Node::Ref(pointer) => {
				let token = pointer.token();
				let Some(target) = pointer.pointee() else {
					return write!(self.f, "&<dropped {:#x}>", token.addr());
				};
				if !self.active.insert(token) {
					return self.f.write_str("&<cycle>");
				}
				self.f.write_str("&")?;
				let result = self.value(target, depth + 1);
				self.active.remove(&token);
				result
			}
		}
	}
}

/// Short display name of a value's concrete type.
pub fn type_label(value: &dyn Compare) -> String {
	short_type_name(value.type_name())
}
