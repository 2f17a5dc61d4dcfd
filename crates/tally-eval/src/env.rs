//! Scoped name environment for the Tally evaluator.

use crate::value::Value;
use std::collections::BTreeMap;
use tally_types::ast::FunctionDef;

/// What a name resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Binding<'p> {
    Value(Value),
    /// Borrowed from the program being run, which outlives every scope.
    Function(&'p FunctionDef),
}

/// A single scope, optionally chained to the scope it reads through to.
///
/// Lookups check local bindings first, then walk the parent chain.
/// Bindings always go into the local scope. A child borrows its parent,
/// so it can never outlive it and the chain cannot form a cycle.
#[derive(Debug, Default)]
pub struct Environment<'p> {
    bindings: BTreeMap<String, Binding<'p>>,
    parent: Option<&'p Environment<'p>>,
}

impl<'p> Environment<'p> {
    /// Create a root (global) environment.
    pub fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
            parent: None,
        }
    }

    /// Create an empty scope that reads through to `parent`.
    pub fn child(parent: &'p Environment<'p>) -> Self {
        tracing::trace!(depth = parent.depth() + 1, "enter scope");
        Self {
            bindings: BTreeMap::new(),
            parent: Some(parent),
        }
    }

    /// Bind `name` to a value in this scope, replacing any previous binding.
    pub fn bind(&mut self, name: &str, value: Value) {
        self.bindings
            .insert(name.to_string(), Binding::Value(value));
    }

    /// Register a function definition under its own name in this scope.
    pub fn bind_function(&mut self, def: &'p FunctionDef) {
        tracing::debug!(name = %def.name.name, arity = def.arity(), "register function");
        self.bindings
            .insert(def.name.name.clone(), Binding::Function(def));
    }

    /// Resolve `name`, innermost scope first.
    pub fn lookup(&self, name: &str) -> Option<&Binding<'p>> {
        let mut env = self;
        loop {
            if let Some(binding) = env.bindings.get(name) {
                return Some(binding);
            }
            env = env.parent?;
        }
    }

    /// The root of the chain.
    pub fn global(&self) -> &Environment<'p> {
        let mut env = self;
        while let Some(parent) = env.parent {
            env = parent;
        }
        env
    }

    pub fn is_global(&self) -> bool {
        self.parent.is_none()
    }

    /// Number of scopes from here to the root, inclusive.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut env = self;
        while let Some(parent) = env.parent {
            depth += 1;
            env = parent;
        }
        depth
    }

    /// Value bindings of this scope only, in name order.
    pub fn value_bindings(&self) -> BTreeMap<String, Value> {
        self.bindings
            .iter()
            .filter_map(|(name, binding)| match binding {
                Binding::Value(v) => Some((name.clone(), *v)),
                Binding::Function(_) => None,
            })
            .collect()
    }

    /// Release this scope and everything bound in it.
    pub fn destroy(self) {
        tracing::trace!(depth = self.depth(), bindings = self.bindings.len(), "leave scope");
    }
}
