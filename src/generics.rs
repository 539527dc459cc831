//! Substitution of Move generic parameters inside type strings.

use std::collections::HashMap;

use anyhow::{bail, Result};
use sui_bind_types::type_parsing::{split_generic, split_type_params, strip_reference, vector_inner};

/// Binding of generic parameter names (`T`, `U`) to concrete type strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericTypeResolver {
    bindings: HashMap<String, String>,
}

impl GenericTypeResolver {
    /// Bind `param_names[i]` to `type_args[i]`.
    pub fn new<P, A>(param_names: &[P], type_args: &[A]) -> Result<Self>
    where
        P: AsRef<str>,
        A: AsRef<str>,
    {
        if param_names.len() != type_args.len() {
            bail!(
                "type parameter count mismatch: {} params but {} args",
                param_names.len(),
                type_args.len()
            );
        }
        let bindings = param_names
            .iter()
            .zip(type_args)
            .map(|(p, a)| (p.as_ref().trim().to_string(), a.as_ref().trim().to_string()))
            .collect();
        Ok(Self { bindings })
    }

    pub fn binding(&self, param: &str) -> Option<&str> {
        self.bindings.get(param).map(String::as_str)
    }

    /// Rewrite `type_expr` with every bound parameter replaced.
    ///
    /// Recurses through `&mut `/`&` prefixes, `vector<..>` and struct type
    /// parameters; struct parameters are rejoined with `,`. Anything that
    /// mentions no bound parameter comes back unchanged.
    pub fn resolve(&self, type_expr: &str) -> String {
        let type_expr = type_expr.trim();
        if let Some(concrete) = self.bindings.get(type_expr) {
            return concrete.clone();
        }

        let (reference, inner) = strip_reference(type_expr);
        if inner.len() != type_expr.len() {
            return format!("{}{}", reference.prefix(), self.resolve(inner));
        }

        if let Some(elem) = vector_inner(type_expr) {
            return format!("vector<{}>", self.resolve(elem));
        }

        if let Some((base, params)) = split_generic(type_expr) {
            if !base.is_empty() {
                let resolved: Vec<String> = split_type_params(params)
                    .into_iter()
                    .map(|p| self.resolve(p))
                    .collect();
                return format!("{}<{}>", base, resolved.join(","));
            }
        }

        type_expr.to_string()
    }
}

/// True if `type_expr` is, or mentions, a generic parameter (a single
/// uppercase letter).
pub fn is_generic(type_expr: &str) -> bool {
    let type_expr = type_expr.trim();
    if is_type_param(type_expr) {
        return true;
    }
    let (_, inner) = strip_reference(type_expr);
    if inner.len() != type_expr.len() {
        return is_generic(inner);
    }
    if let Some(elem) = vector_inner(type_expr) {
        return is_generic(elem);
    }
    if let Some((_, params)) = split_generic(type_expr) {
        return split_type_params(params).into_iter().any(is_generic);
    }
    false
}

fn is_type_param(s: &str) -> bool {
    let mut chars = s.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_uppercase())
}
