//! `Compare` derive macro.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, GenericParam, Index, Path, parse_macro_input, parse_quote};

use crate::attrs::{ContainerAttrs, is_skipped};

pub fn derive_compare(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	match expand(input) {
		Ok(tokens) => tokens.into(),
		Err(err) => err.to_compile_error().into(),
	}
}

fn expand(mut input: DeriveInput) -> syn::Result<TokenStream2> {
	if let Some(lifetime) = input.generics.lifetimes().next() {
		return Err(syn::Error::new_spanned(
			lifetime,
			"Compare requires 'static types and cannot be derived for types with lifetime parameters",
		));
	}

	let attrs = ContainerAttrs::parse(&input.attrs)?;
	let krate = attrs.krate();
	let name = input.ident.clone();
	let label = name.to_string();

	let body = match &input.data {
		Data::Struct(data) if attrs.transparent => transparent_body(&krate, &input, &data.fields)?,
		Data::Struct(data) => struct_body(&krate, &label, &data.fields)?,
		Data::Enum(data) => {
			let mut arms = Vec::new();
			for variant in &data.variants {
				let ident = &variant.ident;
				let variant_label = ident.to_string();
				let (pattern, record) = variant_parts(&krate, &label, &variant_label, &variant.fields)?;
				arms.push(quote! { Self::#ident #pattern => #krate::Node::Record(#record) });
			}
			if arms.is_empty() {
				quote! { match *self {} }
			} else {
				quote! { match self { #(#arms,)* } }
			}
		}
		Data::Union(_) => {
			return Err(syn::Error::new_spanned(&input, "Compare cannot be derived for unions"));
		}
	};

	for param in &mut input.generics.params {
		if let GenericParam::Type(ty) = param {
			ty.bounds.push(parse_quote!(#krate::Compare));
		}
	}
	let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

	Ok(quote! {
		impl #impl_generics #krate::Compare for #name #ty_generics #where_clause {
			fn node(&self) -> #krate::Node<'_> {
				#body
			}
		}
	})
}

fn transparent_body(krate: &Path, input: &DeriveInput, fields: &Fields) -> syn::Result<TokenStream2> {
	let mut kept = Vec::new();
	for (i, field) in fields.iter().enumerate() {
		if !is_skipped(field)? {
			kept.push((i, field));
		}
	}
	let [(i, field)] = kept.as_slice() else {
		return Err(syn::Error::new_spanned(input, "#[compare(transparent)] requires exactly one compared field"));
	};
	let access = match &field.ident {
		Some(ident) => quote! { self.#ident },
		None => {
			let index = Index::from(*i);
			quote! { self.#index }
		}
	};
	Ok(quote! { #krate::Compare::node(&#access) })
}

fn struct_body(krate: &Path, label: &str, fields: &Fields) -> syn::Result<TokenStream2> {
	let mut chain = Vec::new();
	for (i, field) in fields.iter().enumerate() {
		if is_skipped(field)? {
			continue;
		}
		let (field_label, access) = match &field.ident {
			Some(ident) => (ident.to_string(), quote! { self.#ident }),
			None => {
				let index = Index::from(i);
				(i.to_string(), quote! { self.#index })
			}
		};
		chain.push(quote! { .field(#field_label, &#access) });
	}
	Ok(quote! {
		#krate::Node::Record(#krate::Record::new::<Self>(#label) #(#chain)*)
	})
}

/// Builds the match pattern and record expression for one enum variant.
fn variant_parts(krate: &Path, label: &str, variant_label: &str, fields: &Fields) -> syn::Result<(TokenStream2, TokenStream2)> {
	let mut chain = Vec::new();
	let pattern = match fields {
		Fields::Unit => quote! {},
		Fields::Named(named) => {
			let mut binds = Vec::new();
			for field in &named.named {
				let Some(ident) = field.ident.as_ref() else {
					continue;
				};
				if is_skipped(field)? {
					binds.push(quote! { #ident: _ });
					continue;
				}
				let field_label = ident.to_string();
				binds.push(quote! { #ident });
				chain.push(quote! { .field(#field_label, #ident) });
			}
			quote! { { #(#binds),* } }
		}
		Fields::Unnamed(unnamed) => {
			let mut binds = Vec::new();
			for (i, field) in unnamed.unnamed.iter().enumerate() {
				if is_skipped(field)? {
					binds.push(quote! { _ });
					continue;
				}
				let bind = format_ident!("__field{}", i);
				let field_label = i.to_string();
				binds.push(quote! { #bind });
				chain.push(quote! { .field(#field_label, #bind) });
			}
			quote! { ( #(#binds),* ) }
		}
	};
	let record = quote! {
		#krate::Record::variant::<Self>(#label, #variant_label) #(#chain)*
	};
	Ok((pattern, record))
}
