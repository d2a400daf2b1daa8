//! Procedural macros for placeholder-aware deep equality.
//!
//! Provides derive macros:
//! * `#[derive(Compare)]` - describes a type's shape to the comparison engine
//! * `#[derive(Pointer)]` - lets a named pointer newtype hold placeholders

use proc_macro::TokenStream;

mod attrs;
/// Compare derive implementation.
mod compare;
mod pointer;

/// Derives `placeholders_cmp::Compare`.
///
/// Structs become records of their fields, enums become records of the
/// active variant's fields. Every field type must implement `Compare`.
///
/// Attributes:
/// * `#[compare(transparent)]` on a single-field struct - compare exactly like
///   the field (used for named pointer types)
/// * `#[compare(crate = path)]` on the container - reach the engine through
///   `path` instead of `::placeholders_cmp`, e.g. `placeholders::cmp` when
///   `placeholders-cmp` is not a direct dependency
/// * `#[compare(skip)]` on a field - leave the field out of comparisons
///
/// ```ignore
/// #[derive(Compare)]
/// pub struct Foo {
///     bar: Option<Ref<Bar>>,
///     baz: BazPtr,
///     #[compare(skip)]
///     cache: u64,
/// }
///
/// #[derive(Compare)]
/// #[compare(transparent)]
/// pub struct BazPtr(Option<Ref<Baz>>);
/// ```
#[proc_macro_derive(Compare, attributes(compare))]
pub fn derive_compare(input: TokenStream) -> TokenStream {
	compare::derive_compare(input)
}

/// Derives `placeholders::Pointer` for a single-field wrapper around another
/// pointer type, so `placeholders::make::<Wrapper>(scope)` works.
///
/// ```ignore
/// #[derive(Compare, Pointer)]
/// #[compare(transparent)]
/// pub struct BazPtr(Option<Ref<Baz>>);
/// ```
#[proc_macro_derive(Pointer)]
pub fn derive_pointer(input: TokenStream) -> TokenStream {
	pointer::derive_pointer(input)
}
