//! Attribute parsing for the Record derive macro.
//!
//! Handles struct-level and field-level `#[dbx(...)]` attributes.

use proc_macro2::Span;
use syn::{Attribute, Error, Result};

/// One `key`, `key = "str"` or `key = bool` entry.
struct AttrItem {
    key: syn::Ident,
    value: Option<syn::Lit>,
}

struct AttrList(Vec<AttrItem>);

impl syn::parse::Parse for AttrList {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut items = Vec::new();

        loop {
            if input.is_empty() {
                break;
            }

            let key: syn::Ident = input.parse()?;
            if input.peek(syn::token::Paren) {
                return Err(Error::new(key.span(), "unexpected function-style attribute"));
            }

            let value = if input.peek(syn::Token![=]) {
                let _: syn::Token![=] = input.parse()?;
                Some(input.parse::<syn::Lit>()?)
            } else {
                None
            };
            items.push(AttrItem { key, value });

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else if !input.is_empty() {
                return Err(input.error("expected `,`"));
            }
        }

        Ok(AttrList(items))
    }
}

/// Every entry of every `#[dbx(...)]` attribute, in order.
fn dbx_items(attrs: &[Attribute]) -> Result<Vec<AttrItem>> {
    let mut items = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("dbx")) {
        let list: AttrList = attr.parse_args()?;
        items.extend(list.0);
    }
    Ok(items)
}

impl AttrItem {
    fn name(&self) -> String {
        self.key.to_string()
    }

    /// A bare flag or `flag = true|false`.
    fn flag(&self) -> Result<bool> {
        match &self.value {
            None => Ok(true),
            Some(syn::Lit::Bool(b)) => Ok(b.value),
            Some(other) => Err(Error::new(
                other.span(),
                format!("`{}` expects a boolean", self.key),
            )),
        }
    }

    fn string(&self) -> Result<syn::LitStr> {
        match &self.value {
            Some(syn::Lit::Str(s)) => Ok(s.clone()),
            Some(other) => Err(Error::new(
                other.span(),
                format!("`{}` expects a string", self.key),
            )),
            None => Err(Error::new(
                self.key.span(),
                format!("`{}` requires a value: {} = \"...\"", self.key, self.key),
            )),
        }
    }
}

pub(super) struct StructAttrs {
    pub(super) table: Option<String>,
    pub(super) hooks: bool,
}

impl StructAttrs {
    pub(super) fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
        let mut out = StructAttrs {
            table: None,
            hooks: false,
        };
        for item in dbx_items(attrs)? {
            match item.name().as_str() {
                "table" => {
                    let lit = item.string()?;
                    out.table = Some(parse_sql_ident(&lit.value(), lit.span(), "table")?);
                }
                "hooks" => out.hooks = item.flag()?,
                other => {
                    return Err(Error::new(
                        item.key.span(),
                        format!("unknown struct attribute `{other}`"),
                    ));
                }
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct FieldAttrs {
    pub(super) primary_key: Option<bool>,
    pub(super) tenant_key: Option<bool>,
    pub(super) soft_delete: Option<bool>,
    pub(super) ignore: bool,
    pub(super) flatten: bool,
    pub(super) column: Option<String>,
}

impl FieldAttrs {
    pub(super) fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
        let mut out = FieldAttrs::default();
        let mut other_than_flatten: Option<Span> = None;

        for item in dbx_items(attrs)? {
            let name = item.name();
            if name != "flatten" {
                other_than_flatten.get_or_insert(item.key.span());
            }
            match name.as_str() {
                "primary_key" => out.primary_key = Some(item.flag()?),
                "tenant_key" => out.tenant_key = Some(item.flag()?),
                "soft_delete" => out.soft_delete = Some(item.flag()?),
                "ignore" => out.ignore = item.flag()?,
                "flatten" => out.flatten = item.flag()?,
                "column" => {
                    let lit = item.string()?;
                    out.column = Some(parse_sql_ident(&lit.value(), lit.span(), "column")?);
                }
                "markers" => {
                    let lit = item.string()?;
                    out.apply_markers(&lit)?;
                }
                other => {
                    return Err(Error::new(
                        item.key.span(),
                        format!("unknown field attribute `{other}`"),
                    ));
                }
            }
        }

        if out.flatten
            && let Some(span) = other_than_flatten
        {
            return Err(Error::new(
                span,
                "`flatten` cannot be combined with other attributes",
            ));
        }
        Ok(out)
    }

    /// Comma-separated marker vocabulary: `primaryKey`, `_`, `tenantKey`,
    /// `softDelete`.
    fn apply_markers(&mut self, lit: &syn::LitStr) -> Result<()> {
        for marker in lit.value().split(',').map(str::trim).filter(|m| !m.is_empty()) {
            match marker {
                "primaryKey" => self.primary_key = Some(true),
                "_" => self.ignore = true,
                "tenantKey" => self.tenant_key = Some(true),
                "softDelete" => self.soft_delete = Some(true),
                other => {
                    return Err(Error::new(
                        lit.span(),
                        format!(
                            "unknown marker '{other}' (expected primaryKey, _, tenantKey or softDelete)"
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn is_valid_sql_ident(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_sql_ident(s: &str, span: Span, what: &str) -> Result<String> {
    let s = s.trim();
    if !is_valid_sql_ident(s) {
        return Err(Error::new(
            span,
            format!("{what} must be a valid SQL identifier (expected [A-Za-z_][A-Za-z0-9_]*)"),
        ));
    }
    Ok(s.to_string())
}
