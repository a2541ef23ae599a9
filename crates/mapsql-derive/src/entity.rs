//! Entity derive macro implementation

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

use crate::attrs::{field_attrs, struct_attrs};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let type_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let attrs = struct_attrs(&input.attrs)?;

    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity can only be derived for structs",
            ));
        }
    };

    let body = match &data.fields {
        Fields::Named(fields) => {
            let table = match &attrs.table {
                Some(t) => quote!(::core::option::Option::Some(#t)),
                None => quote!(::core::option::Option::None),
            };

            let mut descriptors = Vec::new();
            let mut getters = Vec::new();
            let mut setters = Vec::new();

            for field in &fields.named {
                let fattrs = field_attrs(&field.attrs)?;
                if fattrs.skip {
                    continue;
                }
                let Some(ident) = field.ident.as_ref() else {
                    continue;
                };
                let index = descriptors.len();
                let field_name = ident.unraw().to_string();
                let ty = &field.ty;
                let ty_name = ty.to_token_stream().to_string().replace(' ', "");
                let column = match &fattrs.column {
                    Some(c) => quote!(::core::option::Option::Some(#c)),
                    None => quote!(::core::option::Option::None),
                };

                descriptors.push(quote! {
                    ::mapsql::FieldDescriptor {
                        name: #field_name,
                        column: #column,
                        kind: <#ty as ::mapsql::FieldType>::KIND,
                        type_name: #ty_name,
                        offset: ::core::mem::offset_of!(#name #ty_generics, #ident),
                    }
                });
                getters.push(quote! {
                    #index => ::core::option::Option::Some(::mapsql::FieldType::to_value(&self.#ident)),
                });
                setters.push(quote! {
                    #index => {
                        self.#ident = <#ty as ::mapsql::FieldType>::from_value(value)
                            .map_err(|message| ::mapsql::OrmError::decode(#field_name, message))?;
                        ::core::result::Result::Ok(())
                    }
                });
            }

            quote! {
                fn shape() -> ::mapsql::EntityShape {
                    ::mapsql::EntityShape::Record(::mapsql::RecordShape {
                        type_name: #type_name,
                        table: #table,
                        fields: ::std::vec![#(#descriptors),*],
                    })
                }

                fn get_field(&self, index: usize) -> ::core::option::Option<::mapsql::Value> {
                    match index {
                        #(#getters)*
                        _ => ::core::option::Option::None,
                    }
                }

                fn set_field(&mut self, index: usize, value: ::mapsql::Value) -> ::mapsql::OrmResult<()> {
                    match index {
                        #(#setters)*
                        _ => {
                            let _ = value;
                            ::core::result::Result::Err(::mapsql::OrmError::UnknownField(
                                ::std::format!("{}#{}", #type_name, index),
                            ))
                        }
                    }
                }
            }
        }
        Fields::Unnamed(_) | Fields::Unit => {
            let variant = if matches!(data.fields, Fields::Unit) {
                quote!(Unit)
            } else {
                quote!(Tuple)
            };
            quote! {
                fn shape() -> ::mapsql::EntityShape {
                    ::mapsql::EntityShape::#variant(#type_name)
                }

                fn get_field(&self, _index: usize) -> ::core::option::Option<::mapsql::Value> {
                    ::core::option::Option::None
                }

                fn set_field(&mut self, index: usize, _value: ::mapsql::Value) -> ::mapsql::OrmResult<()> {
                    ::core::result::Result::Err(::mapsql::OrmError::UnknownField(
                        ::std::format!("{}#{}", #type_name, index),
                    ))
                }
            }
        }
    };

    Ok(quote! {
        // SAFETY: descriptors are generated from the struct definition itself;
        // offsets come from `offset_of!` and kinds from each field's type.
        unsafe impl #impl_generics ::mapsql::Entity for #name #ty_generics #where_clause {
            #body
        }
    })
}
