//! Structural view of comparable values.
//!
//! [`Compare::node`] exposes one level of a value's shape. The engine walks
//! these shapes pairwise, so new container or pointer types only need to
//! describe themselves here to take part in comparisons.

use std::any::{Any, TypeId};
use std::fmt;

/// A value the deep-equality engine can walk.
///
/// Usually derived with `#[derive(Compare)]`. Hand-written impls return the
/// [`Node`] matching the value's runtime shape.
pub trait Compare: Any + 'static {
	/// Returns the shape of this value one level deep.
	fn node(&self) -> Node<'_>;

	/// Name used in diff reports and ambiguity errors.
	fn type_name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}
}

/// Scalar values compared with [`PartialEq`].
pub trait Leaf: Any + fmt::Debug + 'static {
	/// Returns true when `other` has the same concrete type and is equal.
	fn leaf_eq(&self, other: &dyn Leaf) -> bool;
}

impl<T: Any + PartialEq + fmt::Debug> Leaf for T {
	fn leaf_eq(&self, other: &dyn Leaf) -> bool {
		let other: &dyn Any = other;
		other.downcast_ref::<T>().is_some_and(|other| self == other)
	}
}

/// Address-equivalent identity of a referenced object.
///
/// Carries the pointee's [`TypeId`] next to the address so a reference to a
/// zero-sized leading field never aliases a reference to its parent.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
	addr: usize,
	ty: TypeId,
}

impl Token {
	/// Identity of the object behind `ptr`.
	pub fn of<T: Any>(ptr: *const T) -> Self {
		Self {
			addr: ptr.addr(),
			ty: TypeId::of::<T>(),
		}
	}

	/// Raw address of the referenced object.
	pub const fn addr(&self) -> usize {
		self.addr
	}
}

impl fmt::Debug for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Token({:#x})", self.addr)
	}
}

/// Keeps an upgraded pointee alive while the engine looks at it.
pub trait Anchor {
	fn get(&self) -> &dyn Compare;
}

/// Target of a [`RefNode`].
pub enum Pointee<'a> {
	Borrowed(&'a dyn Compare),
	Anchored(Box<dyn Anchor + 'a>),
}

/// A single-level reference: identity plus (when still alive) its target.
pub struct RefNode<'a> {
	token: Token,
	pointee: Option<Pointee<'a>>,
}

impl<'a> RefNode<'a> {
	pub fn borrowed(token: Token, value: &'a dyn Compare) -> Self {
		Self {
			token,
			pointee: Some(Pointee::Borrowed(value)),
		}
	}

	/// Reference whose target is reachable only through an owned handle, such
	/// as an upgraded weak reference.
	pub fn anchored(token: Token, anchor: Box<dyn Anchor + 'a>) -> Self {
		Self {
			token,
			pointee: Some(Pointee::Anchored(anchor)),
		}
	}

	/// Reference whose target has already been dropped.
	pub fn dangling(token: Token) -> Self {
		Self { token, pointee: None }
	}

	pub const fn token(&self) -> Token {
		self.token
	}

	pub fn pointee(&self) -> Option<&dyn Compare> {
		match self.pointee.as_ref()? {
			Pointee::Borrowed(value) => Some(*value),
			Pointee::Anchored(anchor) => Some(anchor.get()),
		}
	}
}

/// One named (or positional) member of a [`Record`].
pub struct Field<'a> {
	name: &'static str,
	value: &'a dyn Compare,
}

impl<'a> Field<'a> {
	pub const fn name(&self) -> &'static str {
		self.name
	}

	pub fn value(&self) -> &'a dyn Compare {
		self.value
	}

	/// True for tuple-struct members, whose names are their indices.
	pub fn is_positional(&self) -> bool {
		self.name.bytes().all(|b| b.is_ascii_digit())
	}
}

/// A struct, tuple struct, tuple or enum variant.
pub struct Record<'a> {
	ty: TypeId,
	name: &'static str,
	variant: Option<&'static str>,
	fields: Vec<Field<'a>>,
}

impl<'a> Record<'a> {
	/// Starts a record for type `T`, displayed as `name`.
	pub fn new<T: Any>(name: &'static str) -> Self {
		Self {
			ty: TypeId::of::<T>(),
			name,
			variant: None,
			fields: Vec::new(),
		}
	}

	/// Starts a record for variant `variant` of enum `T`.
	pub fn variant<T: Any>(name: &'static str, variant: &'static str) -> Self {
		Self {
			variant: Some(variant),
			..Self::new::<T>(name)
		}
	}

	/// Appends a member.
	#[must_use]
	pub fn field(mut self, name: &'static str, value: &'a dyn Compare) -> Self {
		self.fields.push(Field { name, value });
		self
	}

	pub const fn name(&self) -> &'static str {
		self.name
	}

	pub const fn variant_name(&self) -> Option<&'static str> {
		self.variant
	}

	pub fn fields(&self) -> &[Field<'a>] {
		&self.fields
	}

	/// True when both records describe the same type and variant.
	pub fn same_kind(&self, other: &Record<'_>) -> bool {
		self.ty == other.ty && self.variant == other.variant && self.fields.len() == other.fields.len()
	}
}

/// Runtime shape of a value, one level deep.
pub enum Node<'a> {
	/// Scalar compared with `PartialEq`.
	Leaf(&'a dyn Leaf),
	/// Nullable slot: `None` or the wrapped value.
	Opt(Option<&'a dyn Compare>),
	/// Dynamically typed box. Both sides must hold the same concrete type.
	Dyn(&'a dyn Compare),
	Record(Record<'a>),
	Seq(Vec<&'a dyn Compare>),
	/// Entries keyed by their `Debug` rendering, sorted by key.
	Map(Vec<(String, &'a dyn Compare)>),
	Ref(RefNode<'a>),
}

impl Node<'_> {
	pub const fn kind(&self) -> &'static str {
		match self {
			Self::Leaf(_) => "leaf",
			Self::Opt(_) => "option",
			Self::Dyn(_) => "dyn",
			Self::Record(_) => "record",
			Self::Seq(_) => "sequence",
			Self::Map(_) => "map",
			Self::Ref(_) => "reference",
		}
	}
}

/// Concrete [`TypeId`] behind a trait object.
pub(crate) fn concrete_type(value: &dyn Compare) -> TypeId {
	let any: &dyn Any = value;
	any.type_id()
}
