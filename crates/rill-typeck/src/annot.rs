//! Evaluation of type annotations into `Ty` values.
//!
//! Parameter declarations carry syntactic type expressions (`String`,
//! `Integer[1, 10]`, `Hash[String, Integer]`). This module turns them into
//! the engine's `Ty` representation, rejecting unknown names and malformed
//! parameter lists.

use rill_parser::ast::{TypeArg, TypeExpr};
use rill_types::Ty;

use crate::error::TypeError;

/// Evaluate a type annotation.
pub fn evaluate(expr: &TypeExpr) -> Result<Ty, TypeError> {
    match expr {
        TypeExpr::Name { name, span } => match name.as_str() {
            "String" => Ok(Ty::string()),
            "Integer" => Ok(Ty::integer()),
            "Float" => Ok(Ty::float()),
            "Boolean" => Ok(Ty::boolean()),
            "Undef" => Ok(Ty::undef()),
            "Data" => Ok(Ty::data()),
            "Regexp" => Ok(Ty::regexp(None)),
            "Array" => Ok(Ty::array_of_data()),
            "Hash" => Ok(Ty::hash_of_data()),
            "Resource" => Ok(Ty::Resource { type_name: None }),
            _ => Err(TypeError::UnknownTypeName {
                name: name.clone(),
                span: *span,
            }),
        },
        TypeExpr::Parameterized { name, args, span } => {
            let bad = || TypeError::BadTypeParameters {
                name: name.clone(),
                span: *span,
            };
            match name.as_str() {
                "Integer" => match args.as_slice() {
                    [TypeArg::Int(from, _)] => Ok(Ty::integer_range(*from, *from)),
                    [TypeArg::Int(from, _), TypeArg::Int(to, _)] => {
                        Ok(Ty::integer_range(*from, *to))
                    }
                    _ => Err(bad()),
                },
                "Float" => match args.as_slice() {
                    [TypeArg::Float(from, _)] => Ok(Ty::float_range(*from, *from)),
                    [TypeArg::Float(from, _), TypeArg::Float(to, _)] => {
                        Ok(Ty::float_range(*from, *to))
                    }
                    _ => Err(bad()),
                },
                "Regexp" => match args.as_slice() {
                    [TypeArg::Str(pattern, _)] => Ok(Ty::regexp(Some(pattern.clone()))),
                    _ => Err(bad()),
                },
                "Array" => match args.as_slice() {
                    [TypeArg::Type(element)] => Ok(Ty::array_of(evaluate(element)?)),
                    [TypeArg::Type(element), TypeArg::Int(from, _), TypeArg::Int(to, _)] => {
                        Ok(Ty::sized_array(evaluate(element)?, *from, *to))
                    }
                    _ => Err(bad()),
                },
                "Hash" => match args.as_slice() {
                    [TypeArg::Type(key), TypeArg::Type(value)] => {
                        Ok(Ty::hash_of(evaluate(key)?, evaluate(value)?))
                    }
                    _ => Err(bad()),
                },
                "Optional" => match args.as_slice() {
                    [TypeArg::Type(inner)] => Ok(Ty::optional(evaluate(inner)?)),
                    _ => Err(bad()),
                },
                "Variant" => {
                    if args.is_empty() {
                        return Err(bad());
                    }
                    let mut members = Vec::with_capacity(args.len());
                    for arg in args {
                        match arg {
                            TypeArg::Type(member) => members.push(evaluate(member)?),
                            _ => return Err(bad()),
                        }
                    }
                    Ok(Ty::variant(members))
                }
                "Resource" => match args.as_slice() {
                    [TypeArg::Str(type_name, _)] => Ok(Ty::resource(type_name.clone())),
                    _ => Err(bad()),
                },
                "String" | "Boolean" | "Undef" | "Data" => Err(bad()),
                _ => Err(TypeError::UnknownTypeName {
                    name: name.clone(),
                    span: *span,
                }),
            }
        }
    }
}
