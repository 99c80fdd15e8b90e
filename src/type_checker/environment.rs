//! Lexical scopes.
//!
//! Scopes form a stack: the first one is the root, the last one is innermost.
//! Lookups walk from the innermost scope outwards, inserts always target the
//! innermost scope, so an inner binding shadows an outer one without
//! replacing it.

use std::collections::HashMap;

use log::trace;

use super::symbol_table::{FunctionInfo, Id, LocalInfo, RecordInfo, TypeInfo};

/// What a name means in the value namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvEntry {
    Function(Id<FunctionInfo>),
    Local(Id<LocalInfo>),
}

/// What a name means in the type namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeEnvEntry {
    Type(Id<TypeInfo>),
    Record(Id<RecordInfo>),
}

#[derive(Debug, Default)]
struct Scope {
    values: HashMap<String, EnvEntry>,
    types: HashMap<String, TypeEnvEntry>,
}

#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// An environment holding only the root scope.
    pub fn new() -> Self {
        Environment {
            scopes: vec![Scope::default()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
        trace!("entered scope {}", self.depth());
    }

    /// Pops the innermost scope. The root scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            trace!("left scope {}", self.depth());
            self.scopes.pop();
        }
    }

    /// Number of scopes above the root.
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    fn innermost(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    pub fn get(&self, name: &str) -> Option<EnvEntry> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.values.get(name).copied())
    }

    pub fn get_type(&self, name: &str) -> Option<TypeEnvEntry> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.types.get(name).copied())
    }

    /// Binds `name` in the innermost scope. Redeclaration is the caller's call.
    pub fn put(&mut self, name: impl Into<String>, entry: EnvEntry) {
        self.innermost().values.insert(name.into(), entry);
    }

    pub fn put_type(&mut self, name: impl Into<String>, entry: TypeEnvEntry) {
        self.innermost().types.insert(name.into(), entry);
    }

    /// Whether `name` is bound in the innermost scope itself.
    pub fn declared_here(&self, name: &str) -> bool {
        self.scopes
            .last()
            .is_some_and(|scope| scope.values.contains_key(name))
    }
}
