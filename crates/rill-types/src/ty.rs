//! Type representation for the Rill type system.
//!
//! Defines the core `Ty` enum: the vocabulary of value types the inference
//! engine works with, together with refinement bounds (exact integer/float
//! ranges, array sizes, hash key/value types). Refined types are built
//! fully-formed; nothing mutates a `Ty` after construction.

use std::fmt;

use serde::Serialize;

/// A Rill type, possibly refined.
///
/// `None` bounds mean "unbounded": `Integer { bounds: None }` is the type of
/// all integers, `Integer { bounds: Some((1, 1)) }` exactly the value 1.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Ty {
    /// The type of `undef`.
    Undef,
    /// Booleans.
    Boolean,
    /// Integers, optionally narrowed to an inclusive `[from, to]` range.
    Integer { bounds: Option<(i64, i64)> },
    /// Floats, optionally narrowed to an inclusive `[from, to]` range.
    Float { bounds: Option<(f64, f64)> },
    /// Strings. Bare words and interpolations are strings too.
    Str,
    /// Regular expressions, optionally a single concrete pattern.
    Regexp { pattern: Option<String> },
    /// The permissive data supremum: scalars, undef, and arrays/hashes
    /// thereof.
    Data,
    /// Arrays with an element type and an optional `[from, to]` size bound.
    Array {
        element: Box<Ty>,
        size: Option<(i64, i64)>,
    },
    /// Hashes. `None` is the generic hash-of-data; `Some` carries the key
    /// and value types.
    Hash { entry: Option<Box<(Ty, Ty)>> },
    /// A value that is either the wrapped type or undef.
    Optional(Box<Ty>),
    /// A union of alternatives.
    Variant(Vec<Ty>),
    /// A reference to a resource of the named type; `None` is the type of
    /// all resources.
    Resource { type_name: Option<String> },
}

impl Ty {
    /// The unbounded integer type.
    pub fn integer() -> Ty {
        Ty::Integer { bounds: None }
    }

    /// An integer type narrowed to `[from, to]`.
    pub fn integer_range(from: i64, to: i64) -> Ty {
        Ty::Integer {
            bounds: Some((from, to)),
        }
    }

    /// The unbounded float type.
    pub fn float() -> Ty {
        Ty::Float { bounds: None }
    }

    /// A float type narrowed to `[from, to]`.
    pub fn float_range(from: f64, to: f64) -> Ty {
        Ty::Float {
            bounds: Some((from, to)),
        }
    }

    pub fn string() -> Ty {
        Ty::Str
    }

    pub fn boolean() -> Ty {
        Ty::Boolean
    }

    pub fn undef() -> Ty {
        Ty::Undef
    }

    pub fn data() -> Ty {
        Ty::Data
    }

    /// A regexp type, optionally refined to one pattern.
    pub fn regexp(pattern: Option<String>) -> Ty {
        Ty::Regexp { pattern }
    }

    /// An unsized array of the given element type.
    pub fn array_of(element: Ty) -> Ty {
        Ty::Array {
            element: Box::new(element),
            size: None,
        }
    }

    /// The generic array-of-data.
    pub fn array_of_data() -> Ty {
        Ty::array_of(Ty::Data)
    }

    /// An array refined to a `[from, to]` size bound.
    pub fn sized_array(element: Ty, from: i64, to: i64) -> Ty {
        Ty::Array {
            element: Box::new(element),
            size: Some((from, to)),
        }
    }

    /// A hash with the given key and value types.
    pub fn hash_of(key: Ty, value: Ty) -> Ty {
        Ty::Hash {
            entry: Some(Box::new((key, value))),
        }
    }

    /// The generic hash-of-data.
    pub fn hash_of_data() -> Ty {
        Ty::Hash { entry: None }
    }

    pub fn optional(inner: Ty) -> Ty {
        Ty::Optional(Box::new(inner))
    }

    /// A union of the given alternatives. Nested variants are flattened.
    pub fn variant(members: Vec<Ty>) -> Ty {
        let mut flat = Vec::with_capacity(members.len());
        for member in members {
            match member {
                Ty::Variant(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        Ty::Variant(flat)
    }

    /// A reference to a resource of the named type.
    pub fn resource(type_name: impl Into<String>) -> Ty {
        Ty::Resource {
            type_name: Some(type_name.into()),
        }
    }
}

/// Render a float bound the way type strings expect: always with a decimal
/// point (`1.0`, not `1`).
fn fmt_float(value: f64) -> String {
    if value.is_finite() && value == value.trunc() {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Capitalise a resource type name for display (`notify` -> `Notify`).
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Undef => write!(f, "Undef"),
            Ty::Boolean => write!(f, "Boolean"),
            Ty::Integer { bounds: None } => write!(f, "Integer"),
            Ty::Integer {
                bounds: Some((from, to)),
            } => write!(f, "Integer[{from}, {to}]"),
            Ty::Float { bounds: None } => write!(f, "Float"),
            Ty::Float {
                bounds: Some((from, to)),
            } => write!(f, "Float[{}, {}]", fmt_float(*from), fmt_float(*to)),
            Ty::Str => write!(f, "String"),
            Ty::Regexp { pattern: None } => write!(f, "Regexp"),
            Ty::Regexp {
                pattern: Some(pattern),
            } => write!(f, "Regexp[/{pattern}/]"),
            Ty::Data => write!(f, "Data"),
            Ty::Array { element, size } => {
                let generic = matches!(**element, Ty::Data) && size.is_none();
                if generic {
                    return write!(f, "Array");
                }
                match size {
                    Some((from, to)) => write!(f, "Array[{element}, {from}, {to}]"),
                    None => write!(f, "Array[{element}]"),
                }
            }
            Ty::Hash { entry: None } => write!(f, "Hash"),
            Ty::Hash { entry: Some(entry) } => {
                write!(f, "Hash[{}, {}]", entry.0, entry.1)
            }
            Ty::Optional(inner) => write!(f, "Optional[{inner}]"),
            Ty::Variant(members) => {
                write!(f, "Variant[")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{member}")?;
                }
                write!(f, "]")
            }
            Ty::Resource { type_name: None } => write!(f, "Resource"),
            Ty::Resource {
                type_name: Some(name),
            } => write!(f, "Resource[{}]", capitalize(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_exact_bounds() {
        assert_eq!(Ty::integer_range(1, 1).to_string(), "Integer[1, 1]");
        assert_eq!(Ty::float_range(1.0, 1.0).to_string(), "Float[1.0, 1.0]");
        assert_eq!(Ty::float_range(2.5, 2.5).to_string(), "Float[2.5, 2.5]");
    }

    #[test]
    fn renders_unbounded_scalars() {
        assert_eq!(Ty::integer().to_string(), "Integer");
        assert_eq!(Ty::float().to_string(), "Float");
        assert_eq!(Ty::string().to_string(), "String");
        assert_eq!(Ty::undef().to_string(), "Undef");
        assert_eq!(Ty::boolean().to_string(), "Boolean");
    }

    #[test]
    fn renders_generic_collections_bare() {
        assert_eq!(Ty::hash_of_data().to_string(), "Hash");
        assert_eq!(Ty::array_of_data().to_string(), "Array");
    }

    #[test]
    fn renders_sized_array() {
        assert_eq!(
            Ty::sized_array(Ty::Data, 0, 0).to_string(),
            "Array[Data, 0, 0]"
        );
        assert_eq!(
            Ty::sized_array(Ty::integer_range(1, 1), 1, 1).to_string(),
            "Array[Integer[1, 1], 1, 1]"
        );
    }

    #[test]
    fn renders_parameterized_hash() {
        assert_eq!(
            Ty::hash_of(Ty::integer_range(1, 2), Ty::integer_range(1, 2)).to_string(),
            "Hash[Integer[1, 2], Integer[1, 2]]"
        );
    }

    #[test]
    fn renders_optional_and_variant() {
        assert_eq!(
            Ty::optional(Ty::float_range(2.0, 2.0)).to_string(),
            "Optional[Float[2.0, 2.0]]"
        );
        assert_eq!(
            Ty::variant(vec![Ty::integer_range(1, 1), Ty::undef()]).to_string(),
            "Variant[Integer[1, 1], Undef]"
        );
    }

    #[test]
    fn renders_resource_capitalized() {
        assert_eq!(Ty::resource("notify").to_string(), "Resource[Notify]");
        assert_eq!(
            Ty::Resource { type_name: None }.to_string(),
            "Resource"
        );
    }

    #[test]
    fn variant_constructor_flattens() {
        let nested = Ty::variant(vec![
            Ty::variant(vec![Ty::string(), Ty::integer()]),
            Ty::boolean(),
        ]);
        assert_eq!(
            nested,
            Ty::Variant(vec![Ty::string(), Ty::integer(), Ty::boolean()])
        );
    }
}
