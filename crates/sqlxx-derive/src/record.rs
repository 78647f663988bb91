//! Record derive macro implementation

mod attrs;

use attrs::{FieldAttrs, StructAttrs};

use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Record can only be derived for structs",
            ));
        }
    };
    if fields.is_empty() {
        return Err(syn::Error::new_spanned(
            &input,
            "Record requires at least one field",
        ));
    }

    let struct_attrs = StructAttrs::from_attrs(&input.attrs)?;
    let table_name = struct_attrs
        .table
        .unwrap_or_else(|| name.to_string().to_snake_case());

    let mut column_stmts = Vec::with_capacity(fields.len());
    let mut value_stmts = Vec::with_capacity(fields.len());

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let ty = &field.ty;
        let attrs = FieldAttrs::from_attrs(&field.attrs)?;

        if attrs.flatten {
            column_stmts.push(quote! {
                <#ty as sqlxx::meta::Record>::collect_columns(columns);
            });
            value_stmts.push(quote! {
                <#ty as sqlxx::meta::Record>::collect_values(&self.#ident, values);
            });
            continue;
        }

        let field_name = ident.to_string();
        let primary_key = option_tokens(attrs.primary_key);
        let tenant_key = option_tokens(attrs.tenant_key);
        let soft_delete = option_tokens(attrs.soft_delete);
        let ignore = attrs.ignore;
        let column = match &attrs.column {
            Some(column) => quote! { ::core::option::Option::Some(#column) },
            None => quote! { ::core::option::Option::None },
        };

        column_stmts.push(quote! {
            columns.push(sqlxx::meta::Column::from_field(
                #field_name,
                sqlxx::meta::Markers {
                    primary_key: #primary_key,
                    tenant_key: #tenant_key,
                    soft_delete: #soft_delete,
                    ignore: #ignore,
                    column: #column,
                },
            ));
        });

        // Ignored fields keep their slot so values stay aligned with columns.
        value_stmts.push(if attrs.ignore {
            quote! { values.push(sqlxx::value::Value::Null); }
        } else {
            quote! {
                values.push(sqlxx::value::Value::from(::core::clone::Clone::clone(&self.#ident)));
            }
        });
    }

    let as_hooks = if struct_attrs.hooks {
        quote! {
            fn as_hooks(&mut self) -> ::core::option::Option<&mut dyn sqlxx::hooks::Hooks> {
                ::core::option::Option::Some(self)
            }
        }
    } else {
        quote! {}
    };

    let type_name = name.to_string();

    Ok(quote! {
        impl sqlxx::meta::Record for #name {
            fn table_name() -> &'static str {
                #table_name
            }

            fn collect_columns(columns: &mut ::std::vec::Vec<sqlxx::meta::Column>) {
                #(#column_stmts)*
            }

            fn entity() -> &'static sqlxx::meta::Entity {
                static ENTITY: ::std::sync::OnceLock<sqlxx::meta::Entity> =
                    ::std::sync::OnceLock::new();
                ENTITY.get_or_init(sqlxx::meta::build_entity::<Self>)
            }

            fn collect_values(&self, values: &mut ::std::vec::Vec<sqlxx::value::Value>) {
                #(#value_stmts)*
            }

            #as_hooks
        }

        // Register this record so it shows up in `sqlxx::meta::registered_entities()`
        sqlxx::inventory::submit! {
            sqlxx::meta::EntityRegistration {
                type_name: #type_name,
                entity_fn: <#name as sqlxx::meta::Record>::entity,
            }
        }
    })
}

fn option_tokens(flag: Option<bool>) -> TokenStream {
    match flag {
        Some(b) => quote! { ::core::option::Option::Some(#b) },
        None => quote! { ::core::option::Option::None },
    }
}
