//! Shared references with a stable, comparable identity.

use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Weak};

use placeholders_cmp::{Anchor, Compare, Node, RefNode, Token};

/// Allocation behind every [`Ref`].
///
/// `obj` sits at offset 0 so the slot address is the object address. `sn`
/// is nonzero for placeholders and keeps two slots from ever being
/// structurally identical, whatever `T` is.
#[repr(C)]
struct Slot<T> {
	obj: T,
	sn: u64,
}

/// Shared, clonable reference to a heap object.
///
/// Clones share identity: any clone of a placeholder is a placeholder. The
/// pointee itself (`(*r).clone()`) is an ordinary value.
pub struct Ref<T>(Arc<Slot<T>>);

impl<T> Ref<T> {
	pub fn new(value: T) -> Self {
		Self::tagged(value, 0)
	}

	pub(crate) fn tagged(value: T, sn: u64) -> Self {
		Self(Arc::new(Slot { obj: value, sn }))
	}

	/// Builds a value that holds weak references to itself.
	pub fn new_cyclic<F>(build: F) -> Self
	where
		F: FnOnce(&WeakRef<T>) -> T,
	{
		Self(Arc::new_cyclic(|weak| Slot {
			obj: build(&WeakRef(weak.clone())),
			sn: 0,
		}))
	}

	pub fn downgrade(this: &Self) -> WeakRef<T> {
		WeakRef(Arc::downgrade(&this.0))
	}

	pub fn ptr_eq(this: &Self, other: &Self) -> bool {
		Arc::ptr_eq(&this.0, &other.0)
	}

	pub fn as_ptr(this: &Self) -> *const T {
		std::ptr::from_ref(&this.0.obj)
	}

	/// Allocation sequence number, or 0 for references not made by a
	/// registry.
	pub fn sequence(this: &Self) -> u64 {
		this.0.sn
	}
}

impl<T: Any> Ref<T> {
	pub fn token(this: &Self) -> Token {
		Token::of(Self::as_ptr(this))
	}
}

impl<T: Send + Sync + 'static> Ref<T> {
	/// Type-erased strong handle keeping the allocation alive.
	pub(crate) fn owner(this: &Self) -> Arc<dyn Any + Send + Sync> {
		this.0.clone()
	}
}

impl<T> Deref for Ref<T> {
	type Target = T;

	fn deref(&self) -> &T {
		&self.0.obj
	}
}

impl<T> Clone for Ref<T> {
	fn clone(&self) -> Self {
		Self(Arc::clone(&self.0))
	}
}

impl<T: Default> Default for Ref<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

impl<T: fmt::Debug> fmt::Debug for Ref<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&**self, f)
	}
}

impl<T> From<T> for Ref<T> {
	fn from(value: T) -> Self {
		Self::new(value)
	}
}

/// Non-owning counterpart of [`Ref`], used to build cyclic structures.
pub struct WeakRef<T>(Weak<Slot<T>>);

impl<T> WeakRef<T> {
	pub fn upgrade(&self) -> Option<Ref<T>> {
		self.0.upgrade().map(Ref)
	}

	pub fn as_ptr(&self) -> *const T {
		self.0.as_ptr().cast::<T>()
	}
}

impl<T: Any> WeakRef<T> {
	/// Same token as the [`Ref`]s it was downgraded from.
	pub fn token(&self) -> Token {
		Token::of(self.as_ptr())
	}
}

impl<T> Clone for WeakRef<T> {
	fn clone(&self) -> Self {
		Self(Weak::clone(&self.0))
	}
}

impl<T> fmt::Debug for WeakRef<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("(WeakRef)")
	}
}

impl<T: Compare> Compare for Ref<T> {
	fn node(&self) -> Node<'_> {
		Node::Ref(RefNode::borrowed(Ref::token(self), &**self))
	}
}

impl<T: Compare> Anchor for Ref<T> {
	fn get(&self) -> &dyn Compare {
		&**self
	}
}

impl<T: Compare> Compare for WeakRef<T> {
	fn node(&self) -> Node<'_> {
		let token = self.token();
		match self.upgrade() {
			Some(strong) => Node::Ref(RefNode::anchored(token, Box::new(strong))),
			None => Node::Ref(RefNode::dangling(token)),
		}
	}
}

/// Types whose representation is a reference to `Target`, and which can
/// therefore be handed out as placeholders.
///
/// Named pointer newtypes get this through `#[derive(Pointer)]`.
pub trait Pointer: Sized {
	type Target: Default + Send + Sync + 'static;

	fn from_ref(target: Ref<Self::Target>) -> Self;
}

impl<T: Default + Send + Sync + 'static> Pointer for Ref<T> {
	type Target = T;

	fn from_ref(target: Ref<T>) -> Self {
		target
	}
}

impl<T: Default + Send + Sync + 'static> Pointer for Option<Ref<T>> {
	type Target = T;

	fn from_ref(target: Ref<T>) -> Self {
		Some(target)
	}
}

/// The registry owns the allocation, so the weak reference stays live for
/// as long as the placeholder is registered.
impl<T: Default + Send + Sync + 'static> Pointer for WeakRef<T> {
	type Target = T;

	fn from_ref(target: Ref<T>) -> Self {
		Ref::downgrade(&target)
	}
}

impl<T: Default + Send + Sync + 'static> Pointer for Option<WeakRef<T>> {
	type Target = T;

	fn from_ref(target: Ref<T>) -> Self {
		Some(Ref::downgrade(&target))
	}
}
