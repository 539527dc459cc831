//! Move type-string parsing utilities.
//!
//! Function signatures arrive as strings (`"&mut 0x2::coin::Coin<T>"`,
//! `"vector<vector<u8>>"`), and every layer of the encoder needs to take them
//! apart the same way. The helpers here are purely textual except for
//! [`parse_type_tag`], which produces a real [`TypeTag`].

use anyhow::{anyhow, bail, Context, Result};
use move_core_types::account_address::AccountAddress;
use move_core_types::identifier::Identifier;
use move_core_types::language_storage::{StructTag, TypeTag};

use crate::encoding::format_address;

/// Reference qualifier stripped from a parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    None,
    Immutable,
    Mutable,
}

impl Reference {
    /// The textual prefix this qualifier is written with.
    pub fn prefix(self) -> &'static str {
        match self {
            Reference::None => "",
            Reference::Immutable => "&",
            Reference::Mutable => "&mut ",
        }
    }
}

/// Split a leading `&mut ` or `&` off a type string.
pub fn strip_reference(type_str: &str) -> (Reference, &str) {
    if let Some(rest) = type_str.strip_prefix("&mut ") {
        (Reference::Mutable, rest)
    } else if let Some(rest) = type_str.strip_prefix('&') {
        (Reference::Immutable, rest)
    } else {
        (Reference::None, type_str)
    }
}

/// Inner element type of `vector<X>`, if `type_str` is a vector.
pub fn vector_inner(type_str: &str) -> Option<&str> {
    type_str
        .strip_prefix("vector<")
        .and_then(|s| s.strip_suffix('>'))
}

/// Split `Name<P1, P2>` into `("Name", "P1, P2")`.
///
/// Returns `None` for non-generic types and for vectors.
pub fn split_generic(type_str: &str) -> Option<(&str, &str)> {
    if type_str.starts_with("vector<") {
        return None;
    }
    let open = type_str.find('<')?;
    let inner = type_str[open + 1..].strip_suffix('>')?;
    Some((&type_str[..open], inner))
}

/// Parse a Move type string into a TypeTag.
///
/// Supports:
/// - Primitive types: `bool`, `u8`, `u16`, `u32`, `u64`, `u128`, `u256`, `address`, `signer`
/// - Vector types: `vector<T>`
/// - Struct types: `0x2::module::Struct` or `0x2::module::Struct<T1, T2>`
///
/// Unbound generic parameters (`T`) are not valid type tags and are rejected.
pub fn parse_type_tag(type_str: &str) -> Result<TypeTag> {
    let type_str = type_str.trim();

    match type_str {
        "bool" => return Ok(TypeTag::Bool),
        "u8" => return Ok(TypeTag::U8),
        "u16" => return Ok(TypeTag::U16),
        "u32" => return Ok(TypeTag::U32),
        "u64" => return Ok(TypeTag::U64),
        "u128" => return Ok(TypeTag::U128),
        "u256" => return Ok(TypeTag::U256),
        "address" => return Ok(TypeTag::Address),
        "signer" => return Ok(TypeTag::Signer),
        _ => {}
    }

    if let Some(inner) = vector_inner(type_str) {
        let inner_tag = parse_type_tag(inner)
            .with_context(|| format!("invalid vector element type in '{}'", type_str))?;
        return Ok(TypeTag::Vector(Box::new(inner_tag)));
    }

    let (base_type, type_args) = match type_str.find('<') {
        Some(open) => {
            let inner = type_str[open + 1..]
                .strip_suffix('>')
                .ok_or_else(|| anyhow!("unbalanced type parameters in '{}'", type_str))?;
            (&type_str[..open], Some(inner))
        }
        None => (type_str, None),
    };

    let parts: Vec<&str> = base_type.split("::").collect();
    if parts.len() != 3 {
        bail!("cannot parse type tag '{}'", type_str);
    }

    let address = AccountAddress::from_hex_literal(parts[0])
        .map_err(|e| anyhow!("invalid address in type '{}': {}", type_str, e))?;
    let module = Identifier::new(parts[1])
        .map_err(|e| anyhow!("invalid module name in type '{}': {}", type_str, e))?;
    let name = Identifier::new(parts[2])
        .map_err(|e| anyhow!("invalid struct name in type '{}': {}", type_str, e))?;

    let type_params = match type_args {
        Some(inner) if !inner.trim().is_empty() => split_type_params(inner)
            .into_iter()
            .map(parse_type_tag)
            .collect::<Result<Vec<_>>>()?,
        _ => vec![],
    };

    Ok(TypeTag::Struct(Box::new(StructTag {
        address,
        module,
        name,
        type_params,
    })))
}

/// Split type parameters respecting nested angle brackets.
///
/// Given "A, B<C, D>, E", returns ["A", "B<C, D>", "E"] by tracking bracket depth.
pub fn split_type_params(s: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth -= 1,
            ',' if depth == 0 => {
                result.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    if start < s.len() {
        let last = s[start..].trim();
        if !last.is_empty() {
            result.push(last);
        }
    }

    result
}

/// Render a TypeTag as a type string with full-width addresses and `,`-joined
/// parameters, the form return types are written in.
pub fn format_type_tag(tag: &TypeTag) -> String {
    match tag {
        TypeTag::Vector(inner) => format!("vector<{}>", format_type_tag(inner)),
        TypeTag::Struct(s) => {
            let mut out = format!(
                "{}::{}::{}",
                format_address(&s.address),
                s.module.as_str(),
                s.name.as_str()
            );
            if !s.type_params.is_empty() {
                let params: Vec<String> = s.type_params.iter().map(format_type_tag).collect();
                out.push('<');
                out.push_str(&params.join(","));
                out.push('>');
            }
            out
        }
        other => other.to_string(),
    }
}
