//! Derive macro for automigrate record types.
//!
//! This crate provides `#[derive(Record)]`, which turns a struct's
//! fields and markers into a static `automigrate_core::Record` schema.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, GenericArgument, Ident, Lit,
    Meta, PathArguments, Type,
};

/// Derives `automigrate_core::Record` for a struct with named fields.
///
/// # Attributes
///
/// - `#[record(table = "People")]` - Table name (optional, defaults to
///   the struct name)
///
/// # Field Attributes
///
/// - `#[column(key)]` - Marks the primary key; exactly one is required
/// - `#[column(required)]` - Stores the field as NOT NULL (only
///   meaningful for text, every other type is always NOT NULL)
/// - `#[column(not_mapped)]` - Leaves the field out of the table
/// - `#[column(name = "Column")]` - Column name (optional, defaults to
///   the field name)
///
/// Field types are resolved from their path. `Option<T>` resolves to
/// `T`. Paths the macro does not recognise are probed at runtime with
/// `automigrate_core::probe::probe_type`.
#[proc_macro_derive(Record, attributes(record, column))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_record_impl(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_record_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let type_name = struct_name.to_string();
    let table_name = get_table_name(&input.attrs, struct_name)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Record derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Record derive only supports structs",
            ));
        }
    };

    let mut field_defs: Vec<TokenStream2> = Vec::new();
    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let attrs = parse_column_attrs(&field.attrs)?;
        let column_name = attrs.name.unwrap_or_else(|| field_name.to_string());

        let (inner, optional) = unwrap_option(&field.ty);
        if optional && attrs.required {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "#[column(required)] cannot be used on an Option field",
            ));
        }

        let rust_type = quote!(#inner).to_string().replace(' ', "");
        let ty = match semantic_type(inner) {
            Some(variant) => {
                let variant = Ident::new(variant, proc_macro2::Span::call_site());
                quote! {
                    ::automigrate_core::kind::FieldType::Known(
                        ::automigrate_core::kind::SemanticType::#variant
                    )
                }
            }
            None => quote! {
                ::automigrate_core::kind::FieldType::Probed(
                    ::automigrate_core::probe::probe_type::<#inner>
                )
            },
        };

        let key = attrs.key;
        let required = attrs.required;
        let not_mapped = attrs.not_mapped;
        field_defs.push(quote! {
            ::automigrate_core::record::FieldDef {
                name: ::std::borrow::Cow::Borrowed(#column_name),
                rust_type: ::std::borrow::Cow::Borrowed(#rust_type),
                ty: #ty,
                key: #key,
                required: #required,
                not_mapped: #not_mapped,
            }
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::automigrate_core::record::Record
            for #struct_name #ty_generics #where_clause
        {
            const TYPE_NAME: &'static str = #type_name;
            const TABLE: &'static str = #table_name;
            const FIELDS: &'static [::automigrate_core::record::FieldDef] = &[
                #(#field_defs),*
            ];
        }
    })
}

/// Maps a field type to a `SemanticType` variant name.
///
/// Well-known spellings match on the whole normalised type; anything
/// else matches on the ident of its last path segment only, so
/// `Vec<DateTime<Utc>>` or `MyDateTimeRange` fall through to probing.
fn semantic_type(ty: &Type) -> Option<&'static str> {
    let normalised = quote!(#ty).to_string().replace(' ', "");
    let variant = match normalised.as_str() {
        "String" | "str" | "&str" | "&'staticstr" | "Box<str>" | "Cow<'static,str>" => "Text",
        "u8" => "Byte",
        "i8" | "i16" | "u16" | "i32" => "Int",
        "u32" | "i64" | "u64" | "isize" | "usize" => "Long",
        "f32" => "Float",
        "f64" => "Double",
        "bool" => "Bool",
        "Vec<u8>" => "Bytes",
        _ => match last_segment(ty)?.to_string().as_str() {
            "DateTime" | "NaiveDateTime" | "NaiveDate" | "NaiveTime" | "SystemTime" => "DateTime",
            "String" => "Text",
            _ => return None,
        },
    };
    Some(variant)
}

fn last_segment(ty: &Type) -> Option<&Ident> {
    match ty {
        Type::Path(path) if path.qself.is_none() => {
            path.path.segments.last().map(|segment| &segment.ident)
        }
        _ => None,
    }
}

/// Strips one level of `Option<..>`.
fn unwrap_option(ty: &Type) -> (&Type, bool) {
    if let Type::Path(path) = ty {
        if let Some(segment) = path.path.segments.last() {
            if segment.ident == "Option" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner)) = args.args.first() {
                        return (inner, true);
                    }
                }
            }
        }
    }
    (ty, false)
}

struct ColumnAttrs {
    name: Option<String>,
    key: bool,
    required: bool,
    not_mapped: bool,
}

fn get_table_name(attrs: &[Attribute], struct_name: &Ident) -> syn::Result<String> {
    for attr in attrs {
        if attr.path().is_ident("record") {
            let mut table_name = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("table") {
                    table_name = Some(string_value(&meta)?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported record attribute, expected `table`"))
                }
            })?;
            if let Some(name) = table_name {
                return Ok(name);
            }
        }
    }
    Ok(struct_name.to_string())
}

fn parse_column_attrs(attrs: &[Attribute]) -> syn::Result<ColumnAttrs> {
    let mut result = ColumnAttrs {
        name: None,
        key: false,
        required: false,
        not_mapped: false,
    };

    for attr in attrs {
        if attr.path().is_ident("column") {
            // Handle empty attribute like #[column]
            if matches!(attr.meta, Meta::Path(_)) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("key") {
                    result.key = true;
                } else if meta.path.is_ident("required") {
                    result.required = true;
                } else if meta.path.is_ident("not_mapped") {
                    result.not_mapped = true;
                } else if meta.path.is_ident("name") {
                    result.name = Some(string_value(&meta)?);
                } else {
                    return Err(meta.error(
                        "unsupported column attribute, expected `key`, `required`, \
                         `not_mapped` or `name`",
                    ));
                }
                Ok(())
            })?;
        }
    }

    Ok(result)
}

fn string_value(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<String> {
    let value: Expr = meta.value()?.parse()?;
    match value {
        Expr::Lit(lit) => match lit.lit {
            Lit::Str(s) => Ok(s.value()),
            other => Err(syn::Error::new_spanned(other, "expected a string literal")),
        },
        other => Err(syn::Error::new_spanned(other, "expected a string literal")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn classify(ty: Type) -> Option<&'static str> {
        semantic_type(&ty)
    }

    #[test]
    fn recognises_std_paths() {
        assert_eq!(classify(parse_quote!(String)), Some("Text"));
        assert_eq!(classify(parse_quote!(std::string::String)), Some("Text"));
        assert_eq!(classify(parse_quote!(i32)), Some("Int"));
        assert_eq!(classify(parse_quote!(i64)), Some("Long"));
        assert_eq!(classify(parse_quote!(u8)), Some("Byte"));
        assert_eq!(classify(parse_quote!(Vec<u8>)), Some("Bytes"));
        assert_eq!(classify(parse_quote!(chrono::DateTime<Utc>)), Some("DateTime"));
        assert_eq!(classify(parse_quote!(NaiveDate)), Some("DateTime"));
        assert_eq!(classify(parse_quote!(std::time::SystemTime)), Some("DateTime"));
        assert_eq!(classify(parse_quote!(Money)), None);
    }

    #[test]
    fn dates_match_on_last_segment_only() {
        assert_eq!(classify(parse_quote!(MyDateTimeRange)), None);
        assert_eq!(classify(parse_quote!(Vec<DateTime<Utc>>)), None);
        assert_eq!(classify(parse_quote!(Option<NaiveDate>)), None);
        assert_eq!(classify(parse_quote!(NaiveDateTimeWindow)), None);
    }

    #[test]
    fn unwraps_option() {
        let ty: Type = parse_quote!(Option<String>);
        let (inner, optional) = unwrap_option(&ty);
        assert!(optional);
        assert_eq!(quote!(#inner).to_string(), "String");

        let ty: Type = parse_quote!(i32);
        assert!(!unwrap_option(&ty).1);
    }
}
