//! Append-only arenas for the facts the type checker discovers.
//!
//! Each arena hands out typed `Id`s that are never reused. Types are also
//! interned: structurally equal types always get the same id, so comparing
//! ids is comparing types.

use std::{
    collections::HashMap,
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use super::types::Type;

/// Handle into one of the `SymbolTable` arenas.
pub struct Id<T> {
    index: u32,
    marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    fn new(index: usize) -> Self {
        Id {
            index: u32::try_from(index).unwrap_or_else(|_| panic!("symbol table overflow")),
            marker: PhantomData,
        }
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }
}

// Manual impls: derives would put bounds on `T`.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.index)
    }
}

impl<T> Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.index)
    }
}

#[derive(Debug, Clone)]
pub struct FunctionInfo {
    pub name: String,
    pub signature: Id<TypeInfo>,
}

#[derive(Debug, Clone)]
pub struct RecordInfo {
    pub name: String,
    pub ty: Id<TypeInfo>,
}

#[derive(Debug, Clone)]
pub struct LocalInfo {
    pub name: String,
    pub ty: Id<TypeInfo>,
}

#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub ty: Type,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    functions: Vec<FunctionInfo>,
    records: Vec<RecordInfo>,
    locals: Vec<LocalInfo>,
    types: Vec<TypeInfo>,
    type_ids: HashMap<Type, Id<TypeInfo>>,
}

fn lookup<'a, T>(arena: &'a [T], id: Id<T>, what: &str) -> &'a T {
    arena
        .get(id.index())
        .unwrap_or_else(|| panic!("{} {} was never issued by this symbol table", what, id))
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `ty`, returning the id already issued for an equal type if any.
    pub fn type_id(&mut self, ty: Type) -> Id<TypeInfo> {
        if let Some(id) = self.type_ids.get(&ty) {
            return *id;
        }

        let id = Id::new(self.types.len());
        self.types.push(TypeInfo { ty: ty.clone() });
        self.type_ids.insert(ty, id);
        id
    }

    pub fn type_definition(&self, id: Id<TypeInfo>) -> &Type {
        &lookup(&self.types, id, "type").ty
    }

    pub fn insert_function(&mut self, info: FunctionInfo) -> Id<FunctionInfo> {
        let id = Id::new(self.functions.len());
        self.functions.push(info);
        id
    }

    pub fn function(&self, id: Id<FunctionInfo>) -> &FunctionInfo {
        lookup(&self.functions, id, "function")
    }

    pub fn insert_record(&mut self, info: RecordInfo) -> Id<RecordInfo> {
        let id = Id::new(self.records.len());
        self.records.push(info);
        id
    }

    pub fn record(&self, id: Id<RecordInfo>) -> &RecordInfo {
        lookup(&self.records, id, "record")
    }

    pub fn insert_local(&mut self, info: LocalInfo) -> Id<LocalInfo> {
        let id = Id::new(self.locals.len());
        self.locals.push(info);
        id
    }

    pub fn local(&self, id: Id<LocalInfo>) -> &LocalInfo {
        lookup(&self.locals, id, "local")
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}
