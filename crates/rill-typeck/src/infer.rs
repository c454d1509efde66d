//! The inference engine: a single-pass walk over the AST.
//!
//! Each node kind has one rule. Literals produce exactly-bounded types,
//! collections union their members, `if` covers its branches, and resource
//! instantiations are checked against the parameter schemas registered by
//! earlier `define`/`class` declarations. The walk stops at the first error.

use rustc_hash::FxHashMap;

use rill_parser::ast::{Expr, Program, ResourceBody};
use rill_types::{assignable, Ty};

use crate::algebra::{covering_type, union_type};
use crate::annot;
use crate::env::{Environment, ParamSchema};
use crate::error::TypeError;

/// Walks a program and produces the type of its last statement.
#[derive(Debug, Default)]
pub struct Inferer {
    env: Environment,
}

impl Inferer {
    pub fn new() -> Self {
        Inferer::default()
    }

    /// Infer a whole program. The result is the type of the final
    /// statement, or `Undef` for an empty program.
    pub fn infer_program(&mut self, program: &Program) -> Result<Ty, TypeError> {
        self.infer_body(&program.body)
    }

    fn infer_body(&mut self, body: &[Expr]) -> Result<Ty, TypeError> {
        let mut result = Ty::undef();
        for expr in body {
            result = self.infer(expr)?;
        }
        Ok(result)
    }

    /// Infer a single expression.
    pub fn infer(&mut self, expr: &Expr) -> Result<Ty, TypeError> {
        match expr {
            Expr::Undef { .. } | Expr::Nop { .. } => Ok(Ty::undef()),
            Expr::Int { value, .. } => Ok(Ty::integer_range(*value, *value)),
            Expr::Float { value, .. } => Ok(Ty::float_range(*value, *value)),
            Expr::Str { .. } | Expr::Word { .. } => Ok(Ty::string()),
            Expr::Interp { segments, .. } => {
                // Interpolated segments can assign; walk them before
                // producing the string type.
                for segment in segments {
                    self.infer(segment)?;
                }
                Ok(Ty::string())
            }
            Expr::Regexp { pattern, .. } => Ok(Ty::regexp(Some(pattern.clone()))),
            Expr::List { elements, .. } => self.infer_list(elements),
            Expr::Map { entries, .. } => self.infer_map(entries),
            Expr::Neg { operand, .. } => self.infer(operand),
            Expr::Arith { lhs, rhs, .. } => {
                let left = self.infer(lhs)?;
                let right = self.infer(rhs)?;
                Ok(arithmetic_result(&left, &right))
            }
            Expr::Compare { span, .. } => Err(TypeError::UnsupportedConstruct {
                construct: "comparison expressions",
                span: *span,
            }),
            Expr::Assign { name, value, .. } => {
                let ty = self.infer(value)?;
                self.env.bind(name.clone(), ty.clone());
                Ok(ty)
            }
            Expr::If {
                then_body,
                else_body,
                ..
            } => self.infer_if(then_body, else_body.as_deref()),
            Expr::Var { name, .. } => {
                Ok(self.env.lookup(name).cloned().unwrap_or(Ty::undef()))
            }
            Expr::Match { lhs, rhs, .. } => {
                self.infer(lhs)?;
                self.infer(rhs)?;
                Ok(Ty::boolean())
            }
            Expr::Or { lhs, rhs, .. } | Expr::And { lhs, rhs, .. } => {
                self.infer(lhs)?;
                self.infer(rhs)?;
                Ok(Ty::boolean())
            }
            Expr::Not { operand, .. } => {
                self.infer(operand)?;
                Ok(Ty::boolean())
            }
            Expr::Index { base, key, .. } => {
                let collection = self.infer(base)?;
                self.infer(key)?;
                Ok(index_result(collection))
            }
            Expr::Resource {
                type_name, bodies, ..
            } => self.infer_resource(type_name, bodies),
            Expr::Define {
                name, params, ..
            } => {
                let schema = self.build_schema(params)?;
                self.env.register_define(name.clone(), schema);
                Ok(Ty::undef())
            }
            Expr::ClassDef {
                name, params, ..
            } => {
                let schema = self.build_schema(params)?;
                self.env.register_class(name.clone(), schema);
                Ok(Ty::undef())
            }
        }
    }

    fn infer_list(&mut self, elements: &[Expr]) -> Result<Ty, TypeError> {
        let mut types = Vec::with_capacity(elements.len());
        for element in elements {
            types.push(self.infer(element)?);
        }
        let size = elements.len() as i64;
        match union_type(&types) {
            Some(element) => Ok(Ty::sized_array(element, size, size)),
            None => Ok(Ty::sized_array(Ty::data(), 0, 0)),
        }
    }

    fn infer_map(&mut self, entries: &[(Expr, Expr)]) -> Result<Ty, TypeError> {
        let mut keys = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            keys.push(self.infer(key)?);
            values.push(self.infer(value)?);
        }
        match (union_type(&keys), union_type(&values)) {
            (Some(key), Some(value)) => Ok(Ty::hash_of(key, value)),
            _ => Ok(Ty::hash_of_data()),
        }
    }

    /// Each branch runs on its own copy of the variable bindings. A variable
    /// assigned in only one branch keeps the other branch's possibility as
    /// `Undef` in the merged outcome.
    fn infer_if(
        &mut self,
        then_body: &[Expr],
        else_body: Option<&[Expr]>,
    ) -> Result<Ty, TypeError> {
        let before = self.env.snapshot();

        let then_ty = self.infer_body(then_body)?;
        let then_vars = self.env.snapshot();

        self.env.restore(before);
        let else_ty = match else_body {
            Some(body) => self.infer_body(body)?,
            None => Ty::undef(),
        };
        let else_vars = self.env.snapshot();

        let mut merged = FxHashMap::default();
        for (name, ty) in &then_vars {
            let other = else_vars.get(name).cloned().unwrap_or(Ty::undef());
            merged.insert(name.clone(), covering_type(ty, &other));
        }
        for (name, ty) in &else_vars {
            if !merged.contains_key(name) {
                merged.insert(name.clone(), covering_type(ty, &Ty::undef()));
            }
        }
        self.env.restore(merged);

        Ok(covering_type(&then_ty, &else_ty))
    }

    fn infer_resource(
        &mut self,
        type_name: &str,
        bodies: &[ResourceBody],
    ) -> Result<Ty, TypeError> {
        for body in bodies {
            self.infer(&body.title)?;

            let schema = if type_name == "class" {
                title_name(&body.title)
                    .and_then(|name| self.env.class_schema(name))
                    .cloned()
            } else {
                self.env.define_schema(type_name).cloned()
            };

            for op in &body.operations {
                let inferred = self.infer(&op.value)?;
                let Some(schema) = &schema else {
                    // Unknown resource types are instantiated unchecked.
                    continue;
                };
                let declared = schema.lookup(&op.name).ok_or_else(|| {
                    TypeError::UnknownParameter {
                        parameter: op.name.clone(),
                        type_name: type_name.to_string(),
                        span: op.span,
                    }
                })?;
                if !assignable(declared, &inferred) {
                    return Err(TypeError::ParameterMismatch {
                        parameter: op.name.clone(),
                        declared: declared.clone(),
                        inferred,
                        span: op.span,
                    });
                }
            }
        }
        Ok(Ty::resource(type_name))
    }

    fn build_schema(
        &mut self,
        params: &[rill_parser::ast::Param],
    ) -> Result<ParamSchema, TypeError> {
        let mut declared = Vec::with_capacity(params.len());
        for param in params {
            let ty = match &param.type_expr {
                Some(annotation) => annot::evaluate(annotation)?,
                None => Ty::data(),
            };
            declared.push((param.name.clone(), ty));
        }
        Ok(ParamSchema::new(declared))
    }
}

/// The class name a `class { name: ... }` instantiation refers to, when the
/// title is a literal name.
fn title_name(title: &Expr) -> Option<&str> {
    match title {
        Expr::Word { name, .. } => Some(name),
        Expr::Str { value, .. } => Some(value),
        _ => None,
    }
}

/// Promotion for arithmetic, dispatched on the left operand. An integer
/// widens to a float only when the right side is one; a float stays a float
/// whatever the right side is. A hash or array on the left means the
/// operator is merging or concatenation, so the result stays a generic
/// collection. Any other left operand leaves the result open.
fn arithmetic_result(left: &Ty, right: &Ty) -> Ty {
    match left {
        Ty::Integer { .. } => match right {
            Ty::Float { .. } => Ty::float(),
            _ => Ty::integer(),
        },
        Ty::Float { .. } => Ty::float(),
        Ty::Hash { .. } => Ty::hash_of_data(),
        Ty::Array { .. } => Ty::array_of_data(),
        _ => Ty::variant(vec![
            Ty::hash_of_data(),
            Ty::array_of_data(),
            Ty::float(),
            Ty::integer(),
        ]),
    }
}

/// The type of `base[key]`. The key may be absent at runtime, so the
/// element type comes back wrapped in `Optional`.
fn index_result(collection: Ty) -> Ty {
    let collection = match collection {
        Ty::Optional(inner) => *inner,
        other => other,
    };
    let element = match collection {
        Ty::Array { element, .. } => *element,
        Ty::Hash { entry: Some(entry) } => entry.1,
        Ty::Hash { entry: None } => Ty::data(),
        // TODO: indexing a scalar should produce its own error once the
        // engine reports more than the first failure.
        _ => Ty::undef(),
    };
    Ty::optional(element)
}
