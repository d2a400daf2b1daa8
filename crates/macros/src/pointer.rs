//! `Pointer` derive macro for named pointer newtypes.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

pub fn derive_pointer(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	let name = &input.ident;

	let Data::Struct(data) = &input.data else {
		return syn::Error::new_spanned(&input, "Pointer can only be derived for structs")
			.to_compile_error()
			.into();
	};

	let (inner, construct) = match &data.fields {
		Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
			let inner = &fields.unnamed[0].ty;
			(inner, quote! { Self(<#inner as ::placeholders::Pointer>::from_ref(target)) })
		}
		Fields::Named(fields) if fields.named.len() == 1 => {
			let field = &fields.named[0];
			let inner = &field.ty;
			let ident = &field.ident;
			(inner, quote! { Self { #ident: <#inner as ::placeholders::Pointer>::from_ref(target) } })
		}
		_ => {
			return syn::Error::new_spanned(&input, "Pointer requires a struct with exactly one field")
				.to_compile_error()
				.into();
		}
	};

	let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
	let mut predicates = where_clause.map(|w| w.predicates.iter().cloned().collect::<Vec<_>>()).unwrap_or_default();
	predicates.push(syn::parse_quote!(#inner: ::placeholders::Pointer));

	quote! {
		impl #impl_generics ::placeholders::Pointer for #name #ty_generics where #(#predicates),* {
			type Target = <#inner as ::placeholders::Pointer>::Target;

			fn from_ref(target: ::placeholders::Ref<Self::Target>) -> Self {
				#construct
			}
		}
	}
	.into()
}
