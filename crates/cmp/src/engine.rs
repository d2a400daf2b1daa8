//! Pairwise structural walk.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::CmpError;
use crate::node::{Compare, Node, RefNode, Token, concrete_type};
use crate::path::{Path, Step};
use crate::render::{Render, type_label};
use crate::rule::{Applied, Rule};


/// One reported difference between the compared values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
	pub path: String,
	pub left: String,
	pub right: String,
}

/// Comparison state for one `equal`/`diff` call.
pub(crate) struct State<'r> {
	rules: &'r [Rule],
	path: Path,
	/// Depth at which each reference on the current path was entered, per side.
	left_refs: FxHashMap<Token, usize>,
	right_refs: FxHashMap<Token, usize>,
	/// `None` stops at the first difference.
	report: Option<Vec<Difference>>,
}

impl<'r> State<'r> {
	pub(crate) fn new(rules: &'r [Rule], root: &dyn Compare, collect: bool) -> Self {
		Self {
			rules,
			path: Path::new(root.type_name()),
			left_refs: FxHashMap::default(),
			right_refs: FxHashMap::default(),
			report: collect.then(Vec::new),
		}
	}

	pub(crate) fn into_report(self) -> Vec<Difference> {
		self.report.unwrap_or_default()
	}

	pub(crate) fn compare(&mut self, x: &dyn Compare, y: &dyn Compare) -> Result<bool, CmpError> {
		if let Some(equal) = self.apply_rules(x, y)? {
			if !equal {
				self.record(x, y);
			}
			return Ok(equal);
		}
		self.compare_structure(x, y)
	}

	fn apply_rules(&self, x: &dyn Compare, y: &dyn Compare) -> Result<Option<bool>, CmpError> {
		let mut claims: Vec<(&Rule, bool)> = Vec::new();
		for rule in self.rules {
			match rule.apply(&self.path, x, y) {
				Applied::NotApplicable => {}
				Applied::Ignore => return Ok(Some(true)),
				Applied::Decided(equal) => claims.push((rule, equal)),
			}
		}
		match claims.as_slice() {
			[] => Ok(None),
			[(_, equal)] => Ok(Some(*equal)),
			_ => {
				let rules: Vec<String> = claims.iter().map(|(rule, _)| rule.name().to_owned()).collect();
				debug!(path = %self.path, ?rules, "conflicting comparer rules");
				Err(CmpError::Ambiguous {
					path: self.path.to_string(),
					rules,
				})
			}
		}
	}

	fn compare_structure(&mut self, x: &dyn Compare, y: &dyn Compare) -> Result<bool, CmpError> {
		match (x.node(), y.node()) {
			(Node::Leaf(a), Node::Leaf(b)) => Ok(self.check(a.leaf_eq(b), x, y)),
			(Node::Opt(a), Node::Opt(b)) => match (a, b) {
				(None, None) => Ok(true),
				(Some(a), Some(b)) => self.descend(Step::Some, a, b),
				_ => Ok(self.check(false, x, y)),
			},
			(Node::Dyn(a), Node::Dyn(b)) => {
				if concrete_type(a) != concrete_type(b) {
					return Ok(self.check(false, x, y));
				}
				self.descend(Step::Dyn(a.type_name()), a, b)
			}
			(Node::Record(a), Node::Record(b)) => {
				if !a.same_kind(&b) {
					return Ok(self.check(false, x, y));
				}
				if let Some(variant) = a.variant_name() {
					self.path.push(Step::Variant(variant));
				}
				let mut equal = true;
				for (fa, fb) in a.fields().iter().zip(b.fields()) {
					equal &= self.descend(Step::Field(fa.name()), fa.value(), fb.value())?;
					if !equal && !self.collecting() {
						break;
					}
				}
				if a.variant_name().is_some() {
					self.path.pop();
				}
				Ok(equal)
			}
			(Node::Seq(a), Node::Seq(b)) => {
				if a.len() != b.len() {
					return Ok(self.check(false, x, y));
				}
				let mut equal = true;
				for (i, (ea, eb)) in a.into_iter().zip(b).enumerate() {
					equal &= self.descend(Step::Index(i), ea, eb)?;
					if !equal && !self.collecting() {
						break;
					}
				}
				Ok(equal)
			}
			(Node::Map(a), Node::Map(b)) => self.compare_maps(a, b),
			(Node::Ref(a), Node::Ref(b)) => self.compare_refs(&a, &b, x, y),
			_ => Ok(self.check(false, x, y)),
		}
	}

	fn compare_maps(&mut self, a: Vec<(String, &dyn Compare)>, b: Vec<(String, &dyn Compare)>) -> Result<bool, CmpError> {
		let mut right: FxHashMap<String, &dyn Compare> = b.into_iter().collect();
		let mut equal = true;
		for (key, va) in a {
			let Some(vb) = right.remove(&key) else {
				equal = false;
				self.record_missing(key, Some(va), None);
				if !self.collecting() {
					return Ok(false);
				}
				continue;
			};
			equal &= self.descend(Step::Key(key), va, vb)?;
			if !equal && !self.collecting() {
				return Ok(false);
			}
		}
		let mut extra: Vec<_> = right.into_iter().collect();
		extra.sort_by(|a, b| a.0.cmp(&b.0));
		for (key, vb) in extra {
			equal = false;
			self.record_missing(key, None, Some(vb));
		}
		Ok(equal)
	}

	/// Same identity is equal. Otherwise the targets are compared, with each
	/// side's path tracked so a cycle ends the walk: revisits on both sides at
	/// the same depth are equal, anything else is not.
	fn compare_refs(&mut self, a: &RefNode<'_>, b: &RefNode<'_>, x: &dyn Compare, y: &dyn Compare) -> Result<bool, CmpError> {
		let (ta, tb) = (a.token(), b.token());
		if ta == tb {
			return Ok(true);
		}
		let seen_left = self.left_refs.get(&ta).copied();
		let seen_right = self.right_refs.get(&tb).copied();
		if seen_left.is_some() || seen_right.is_some() {
			return Ok(self.check(seen_left == seen_right, x, y));
		}
		match (a.pointee(), b.pointee()) {
			(Some(pa), Some(pb)) => {
				let depth = self.left_refs.len();
				self.left_refs.insert(ta, depth);
				self.right_refs.insert(tb, depth);
				let result = self.descend(Step::Deref, pa, pb);
				self.left_refs.remove(&ta);
				self.right_refs.remove(&tb);
				result
			}
			(None, None) => Ok(true),
			_ => Ok(self.check(false, x, y)),
		}
	}

	fn descend(&mut self, step: Step, x: &dyn Compare, y: &dyn Compare) -> Result<bool, CmpError> {
		self.path.push(step);
		let result = self.compare(x, y);
		self.path.pop();
		result
	}

	fn collecting(&self) -> bool {
		self.report.is_some()
	}

	fn check(&mut self, equal: bool, x: &dyn Compare, y: &dyn Compare) -> bool {
		if !equal {
			self.record(x, y);
		}
		equal
	}

	fn record(&mut self, x: &dyn Compare, y: &dyn Compare) {
		let Some(report) = self.report.as_mut() else {
			return;
		};
		report.push(Difference {
			path: self.path.to_string(),
			left: describe(x),
			right: describe(y),
		});
	}

	fn record_missing(&mut self, key: String, x: Option<&dyn Compare>, y: Option<&dyn Compare>) {
		let Some(report) = self.report.as_mut() else {
			return;
		};
		self.path.push(Step::Key(key));
		report.push(Difference {
			path: self.path.to_string(),
			left: x.map_or_else(|| "<missing>".to_owned(), describe),
			right: y.map_or_else(|| "<missing>".to_owned(), describe),
		});
		self.path.pop();
	}
}

fn describe(value: &dyn Compare) -> String {
	match value.node() {
		Node::Dyn(inner) => format!("{} ({})", Render(inner), type_label(inner)),
		_ => Render(value).to_string(),
	}
}
