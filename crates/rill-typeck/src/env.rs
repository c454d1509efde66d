//! The inference environment.
//!
//! Tracks variable bindings and the parameter schemas registered by `define`
//! and `class` declarations. Variables live in a single flat map; `if`
//! branches take a snapshot of it and the engine merges the branch outcomes
//! afterwards. Schemas are global and survive for the rest of the program
//! once registered.

use rustc_hash::FxHashMap;

use rill_types::Ty;

/// The declared parameters of a `define` or `class`, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ParamSchema {
    params: Vec<(String, Ty)>,
}

impl ParamSchema {
    pub fn new(params: Vec<(String, Ty)>) -> Self {
        ParamSchema { params }
    }

    /// The declared type of a parameter, if the schema has one by that name.
    pub fn lookup(&self, name: &str) -> Option<&Ty> {
        self.params
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, ty)| ty)
    }
}

/// Inference state threaded through a single program walk.
#[derive(Debug, Default)]
pub struct Environment {
    variables: FxHashMap<String, Ty>,
    defines: FxHashMap<String, ParamSchema>,
    classes: FxHashMap<String, ParamSchema>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    /// Bind a variable. Rebinding replaces the previous type.
    pub fn bind(&mut self, name: impl Into<String>, ty: Ty) {
        self.variables.insert(name.into(), ty);
    }

    pub fn lookup(&self, name: &str) -> Option<&Ty> {
        self.variables.get(name)
    }

    /// Snapshot the variable bindings for branch isolation.
    pub fn snapshot(&self) -> FxHashMap<String, Ty> {
        self.variables.clone()
    }

    /// Replace the variable bindings wholesale (restoring a snapshot or
    /// installing a merged branch outcome).
    pub fn restore(&mut self, variables: FxHashMap<String, Ty>) {
        self.variables = variables;
    }

    pub fn register_define(&mut self, name: impl Into<String>, schema: ParamSchema) {
        self.defines.insert(name.into(), schema);
    }

    pub fn register_class(&mut self, name: impl Into<String>, schema: ParamSchema) {
        self.classes.insert(name.into(), schema);
    }

    pub fn define_schema(&self, name: &str) -> Option<&ParamSchema> {
        self.defines.get(name)
    }

    pub fn class_schema(&self, name: &str) -> Option<&ParamSchema> {
        self.classes.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebinding_replaces() {
        let mut env = Environment::new();
        env.bind("x", Ty::integer_range(1, 1));
        env.bind("x", Ty::string());
        assert_eq!(env.lookup("x"), Some(&Ty::string()));
    }

    #[test]
    fn snapshot_and_restore_isolate_bindings() {
        let mut env = Environment::new();
        env.bind("x", Ty::integer_range(1, 1));
        let before = env.snapshot();

        env.bind("y", Ty::string());
        env.restore(before);
        assert!(env.lookup("y").is_none());
        assert!(env.lookup("x").is_some());
    }

    #[test]
    fn schemas_look_up_by_parameter_name() {
        let schema = ParamSchema::new(vec![
            ("a".into(), Ty::string()),
            ("b".into(), Ty::integer()),
        ]);
        assert_eq!(schema.lookup("b"), Some(&Ty::integer()));
        assert!(schema.lookup("c").is_none());
    }
}
