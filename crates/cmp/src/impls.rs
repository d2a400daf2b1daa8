//! [`Compare`] for standard library types.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt;
use std::hash::BuildHasher;
use std::path::PathBuf;
use std::rc::{self, Rc};
use std::sync::{self, Arc};
use std::time::Duration;

use crate::node::{Anchor, Compare, Node, RefNode, Record, Token};

macro_rules! leaf_impls {
	($($ty:ty),* $(,)?) => {
		$(
			impl Compare for $ty {
				fn node(&self) -> Node<'_> {
					Node::Leaf(self)
				}
			}
		)*
	};
}

leaf_impls!(
	bool,
	char,
	(),
	i8,
	i16,
	i32,
	i64,
	i128,
	isize,
	u8,
	u16,
	u32,
	u64,
	u128,
	usize,
	f32,
	f64,
	String,
	&'static str,
	Cow<'static, str>,
	PathBuf,
	Duration,
);

impl<T: Compare> Compare for Option<T> {
	fn node(&self) -> Node<'_> {
		Node::Opt(self.as_ref().map(|value| value as &dyn Compare))
	}
}

impl<T: Compare> Compare for Vec<T> {
	fn node(&self) -> Node<'_> {
		Node::Seq(self.iter().map(|value| value as &dyn Compare).collect())
	}
}

impl<T: Compare> Compare for VecDeque<T> {
	fn node(&self) -> Node<'_> {
		Node::Seq(self.iter().map(|value| value as &dyn Compare).collect())
	}
}

impl<T: Compare, const N: usize> Compare for [T; N] {
	fn node(&self) -> Node<'_> {
		Node::Seq(self.iter().map(|value| value as &dyn Compare).collect())
	}
}

impl<T: Compare> Compare for BTreeSet<T> {
	fn node(&self) -> Node<'_> {
		Node::Seq(self.iter().map(|value| value as &dyn Compare).collect())
	}
}

impl<K: fmt::Debug + 'static, V: Compare> Compare for BTreeMap<K, V> {
	fn node(&self) -> Node<'_> {
		Node::Map(self.iter().map(|(key, value)| (format!("{key:?}"), value as &dyn Compare)).collect())
	}
}

impl<K: fmt::Debug + 'static, V: Compare, S: BuildHasher + 'static> Compare for HashMap<K, V, S> {
	fn node(&self) -> Node<'_> {
		let mut entries: Vec<_> = self.iter().map(|(key, value)| (format!("{key:?}"), value as &dyn Compare)).collect();
		entries.sort_by(|a, b| a.0.cmp(&b.0));
		Node::Map(entries)
	}
}

macro_rules! tuple_impls {
	($(($($name:ident $idx:tt),+))+) => {
		$(
			impl<$($name: Compare),+> Compare for ($($name,)+) {
				fn node(&self) -> Node<'_> {
					Node::Record(Record::new::<Self>("tuple")$(.field(stringify!($idx), &self.$idx))+)
				}
			}
		)+
	};
}

tuple_impls! {
	(A 0)
	(A 0, B 1)
	(A 0, B 1, C 2)
	(A 0, B 1, C 2, D 3)
	(A 0, B 1, C 2, D 3, E 4)
	(A 0, B 1, C 2, D 3, E 4, F 5)
}

/// Owning boxes are transparent: `Box<T>` compares like `T`.
impl<T: Compare> Compare for Box<T> {
	fn node(&self) -> Node<'_> {
		(**self).node()
	}
}

impl Compare for Box<dyn Compare> {
	fn node(&self) -> Node<'_> {
		Node::Dyn(&**self)
	}

	fn type_name(&self) -> &'static str {
		(**self).type_name()
	}
}

impl Compare for Box<dyn Compare + Send + Sync> {
	fn node(&self) -> Node<'_> {
		Node::Dyn(&**self)
	}

	fn type_name(&self) -> &'static str {
		(**self).type_name()
	}
}

impl<T: Compare> Compare for Arc<T> {
	fn node(&self) -> Node<'_> {
		Node::Ref(RefNode::borrowed(Token::of(Arc::as_ptr(self)), &**self))
	}
}

impl<T: Compare> Compare for Rc<T> {
	fn node(&self) -> Node<'_> {
		Node::Ref(RefNode::borrowed(Token::of(Rc::as_ptr(self)), &**self))
	}
}

impl<T: Compare> Anchor for Arc<T> {
	fn get(&self) -> &dyn Compare {
		&**self
	}
}

impl<T: Compare> Anchor for Rc<T> {
	fn get(&self) -> &dyn Compare {
		&**self
	}
}

impl<T: Compare> Compare for sync::Weak<T> {
	fn node(&self) -> Node<'_> {
		let token = Token::of(self.as_ptr());
		match self.upgrade() {
			Some(strong) => Node::Ref(RefNode::anchored(token, Box::new(strong))),
			None => Node::Ref(RefNode::dangling(token)),
		}
	}
}

impl<T: Compare> Compare for rc::Weak<T> {
	fn node(&self) -> Node<'_> {
		let token = Token::of(self.as_ptr());
		match self.upgrade() {
			Some(strong) => Node::Ref(RefNode::anchored(token, Box::new(strong))),
			None => Node::Ref(RefNode::dangling(token)),
		}
	}
}
