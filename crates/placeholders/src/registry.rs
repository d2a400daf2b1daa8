//! Live placeholder identities.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use placeholders_cmp::{Compare, Node, Rule, Token};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ptr::{Pointer, Ref};
use crate::scope::Cleanup;

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Set of placeholder identities that are currently live.
///
/// Each entry owns a strong handle to its allocation, so a registered
/// address cannot be freed and reused while the entry exists. Cloning the
/// registry clones the handle, not the set.
#[derive(Clone, Default)]
pub struct Registry {
	inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
	sequence: AtomicU64,
	live: RwLock<FxHashMap<Token, Arc<dyn Any + Send + Sync>>>,
}

impl Registry {
	/// Creates an empty registry, independent of [`Registry::global`].
	pub fn new() -> Self {
		Self::default()
	}

	/// Process-wide registry used by the free functions of this crate.
	pub fn global() -> &'static Registry {
		&GLOBAL
	}

	/// Allocates a fresh zero-valued placeholder and registers it until
	/// `scope` runs its cleanups.
	pub fn make<P: Pointer>(&self, scope: &(impl Cleanup + ?Sized)) -> P {
		let sn = self.inner.sequence.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
		let slot = Ref::tagged(P::Target::default(), sn);
		let token = Ref::token(&slot);

		let registry = self.clone();
		scope.cleanup(Box::new(move || registry.remove(token)));
		self.insert(token, Ref::owner(&slot));

		trace!(sn, ?token, ty = std::any::type_name::<P::Target>(), "placeholder allocated");
		P::from_ref(slot)
	}

	/// Registers `token`, keeping `owner` alive until it is removed.
	pub fn insert(&self, token: Token, owner: Arc<dyn Any + Send + Sync>) {
		self.inner.live.write().insert(token, owner);
	}

	/// Forgets `token`. Unknown tokens are ignored.
	pub fn remove(&self, token: Token) {
		if self.inner.live.write().remove(&token).is_some() {
			trace!(?token, "placeholder released");
		}
	}

	pub fn contains(&self, token: Token) -> bool {
		self.inner.live.read().contains_key(&token)
	}

	pub fn len(&self) -> usize {
		self.inner.live.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Reports whether `value` is a reference to a live placeholder.
	///
	/// Nullable and boxed wrappers are looked through. A placeholder's
	/// pointee is an ordinary value and never counts.
	pub fn is_placeholder(&self, value: &dyn Compare) -> bool {
		match value.node() {
			Node::Ref(pointer) => self.contains(pointer.token()),
			Node::Opt(Some(inner)) | Node::Dyn(inner) => self.is_placeholder(inner),
			_ => false,
		}
	}

	/// Rule that treats any pair involving one of this registry's
	/// placeholders as equal without descending into it.
	pub fn ignore(&self) -> Rule {
		Rule::filter_values(self.either_side(), Rule::ignore()).named("placeholders::Ignore")
	}

	/// Like [`Registry::ignore`], but as a comparer-class rule. It conflicts
	/// with any other comparer claiming the same pair.
	pub fn comparer(&self) -> Rule {
		Rule::filter_values(self.either_side(), Rule::equal()).named("placeholders::Comparer")
	}

	fn either_side(&self) -> impl Fn(&dyn Compare, &dyn Compare) -> bool + Send + Sync + 'static {
		let registry = self.clone();
		move |x, y| registry.is_placeholder(x) || registry.is_placeholder(y)
	}
}

impl fmt::Debug for Registry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registry")
			.field("live", &self.len())
			.field("sequence", &self.inner.sequence.load(Ordering::Relaxed))
			.finish()
	}
}
