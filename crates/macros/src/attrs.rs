//! `#[compare(...)]` attribute parsing.

use syn::{Attribute, Field, Path, parse_quote};

/// Container-level flags.
#[derive(Default)]
pub struct ContainerAttrs {
	pub transparent: bool,
	/// Path the generated impl uses to reach the engine crate.
	krate: Option<Path>,
}

impl ContainerAttrs {
	pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
		let mut out = Self::default();
		for attr in attrs.iter().filter(|a| a.path().is_ident("compare")) {
			attr.parse_nested_meta(|meta| {
				if meta.path.is_ident("transparent") {
					out.transparent = true;
					Ok(())
				} else if meta.path.is_ident("crate") {
					out.krate = Some(meta.value()?.parse()?);
					Ok(())
				} else {
					Err(meta.error("unknown compare container attribute, expected `transparent` or `crate = path`"))
				}
			})?;
		}
		Ok(out)
	}

	/// `#[compare(crate = ...)]`, or `::placeholders_cmp` when absent.
	pub fn krate(&self) -> Path {
		self.krate.clone().unwrap_or_else(|| parse_quote!(::placeholders_cmp))
	}
}

/// True when the field carries `#[compare(skip)]`.
pub fn is_skipped(field: &Field) -> syn::Result<bool> {
	let mut skip = false;
	for attr in field.attrs.iter().filter(|a| a.path().is_ident("compare")) {
		attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("skip") {
				skip = true;
				Ok(())
			} else {
				Err(meta.error("unknown compare field attribute, expected `skip`"))
			}
		})?;
	}
	Ok(skip)
}
