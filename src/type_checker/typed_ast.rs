//! Typed Abstract Syntax Tree definitions.
//!
//! This module contains the typed variants of AST nodes produced by
//! the type checker. Every expression and statement carries its type as an
//! interned `Id<TypeInfo>`; names are resolved to symbol table handles.
//!
//! The typed AST mirrors the structure of the untyped AST but includes:
//! - Resolved types for all expressions
//! - Validated function signatures
//! - Variable references resolved to locals or functions
//!
//! This typed AST, together with its `SymbolTable`, is what a later code
//! generation stage would consume.

use std::fmt::Write;

use crate::{lexer::tokens::{LiteralValue, TokenKind}, Span};

use super::{
    environment::EnvEntry,
    symbol_table::{FunctionInfo, Id, LocalInfo, RecordInfo, SymbolTable, TypeInfo},
};

#[derive(Debug, Clone)]
pub struct TypedArgument {
    pub label: Option<String>,
    pub value: TypedExpr,
}

#[derive(Debug, Clone)]
pub enum TypedExprKind {
    Literal(LiteralValue),
    /// A name, resolved unless it was undeclared.
    Variable {
        name: String,
        entry: Option<EnvEntry>,
    },
    List(Vec<TypedExpr>),
    Range {
        start: Box<TypedExpr>,
        end: Box<TypedExpr>,
    },
    Binary {
        left: Box<TypedExpr>,
        operator: TokenKind,
        right: Box<TypedExpr>,
    },
    Assignment {
        assignee: Box<TypedExpr>,
        operator: TokenKind,
        value: Box<TypedExpr>,
    },
    Unary {
        operator: TokenKind,
        operand: Box<TypedExpr>,
    },
    Call {
        callee: Box<TypedExpr>,
        arguments: Vec<TypedArgument>,
    },
    Index {
        target: Box<TypedExpr>,
        index: Box<TypedExpr>,
    },
    /// `index` is the field's position in the record, if it exists.
    Field {
        target: Box<TypedExpr>,
        field: String,
        index: Option<usize>,
    },
    For {
        variable: Id<LocalInfo>,
        range: Box<TypedExpr>,
        body: TypedBlock,
    },
    If {
        condition: Box<TypedExpr>,
        then_branch: TypedBlock,
        else_branch: Option<TypedBlock>,
    },
    While {
        condition: Box<TypedExpr>,
        body: TypedBlock,
    },
    Return(Option<Box<TypedExpr>>),
    Debug(Box<TypedExpr>),
    Block(TypedBlock),
}

#[derive(Debug, Clone)]
pub struct TypedExpr {
    pub kind: TypedExprKind,
    pub ty: Id<TypeInfo>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypedStmt {
    Declaration {
        name: String,
        local: Id<LocalInfo>,
        value: Option<TypedExpr>,
        /// Always `unit`.
        ty: Id<TypeInfo>,
        span: Span,
    },
    Expression {
        expression: TypedExpr,
        ty: Id<TypeInfo>,
        span: Span,
    },
}

impl TypedStmt {
    pub fn ty(&self) -> Id<TypeInfo> {
        match self {
            TypedStmt::Declaration { ty, .. } => *ty,
            TypedStmt::Expression { ty, .. } => *ty,
        }
    }

    pub fn get_span(&self) -> &Span {
        match self {
            TypedStmt::Declaration { span, .. } => span,
            TypedStmt::Expression { span, .. } => span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypedBlock {
    pub statements: Vec<TypedStmt>,
    pub tail: Option<Box<TypedStmt>>,
    /// Type of the tail, or `unit` without one.
    pub ty: Id<TypeInfo>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedParameter {
    pub name: String,
    pub local: Id<LocalInfo>,
}

#[derive(Debug, Clone)]
pub struct TypedFunction {
    pub name: String,
    pub id: Id<FunctionInfo>,
    pub parameters: Vec<TypedParameter>,
    pub return_type: Id<TypeInfo>,
    pub body: TypedBlock,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypedRecField {
    pub name: String,
    pub ty: Id<TypeInfo>,
}

#[derive(Debug, Clone)]
pub struct TypedRecord {
    pub name: String,
    pub id: Id<RecordInfo>,
    pub fields: Vec<TypedRecField>,
    pub span: Span,
}

/// Output of the type checker.
#[derive(Debug)]
pub struct TypedProgram {
    pub functions: Vec<TypedFunction>,
    pub records: Vec<TypedRecord>,
    pub table: SymbolTable,
}

impl TypedProgram {
    pub fn function(&self, name: &str) -> Option<&TypedFunction> {
        self.functions.iter().find(|function| function.name == name)
    }

    pub fn record(&self, name: &str) -> Option<&TypedRecord> {
        self.records.iter().find(|record| record.name == name)
    }

    /// Renders the program as an indented tree annotated with types.
    pub fn dump(&self) -> String {
        let mut printer = Printer {
            table: &self.table,
            out: String::new(),
            indent: 0,
        };

        for record in &self.records {
            printer.line(&format!("rec {}", record.name));
            printer.indent += 1;
            for field in &record.fields {
                let ty = printer.ty(field.ty);
                printer.line(&format!("{}: {}", field.name, ty));
            }
            printer.indent -= 1;
        }

        for function in &self.functions {
            let signature = self.table.function(function.id).signature;
            let signature = printer.ty(signature);
            printer.line(&format!("fn {}: {}", function.name, signature));
            printer.indent += 1;
            printer.block(&function.body);
            printer.indent -= 1;
        }

        printer.out
    }
}

struct Printer<'a> {
    table: &'a SymbolTable,
    out: String,
    indent: usize,
}

impl Printer<'_> {
    fn ty(&self, id: Id<TypeInfo>) -> String {
        self.table.type_definition(id).to_string()
    }

    fn line(&mut self, text: &str) {
        // Writing into a String cannot fail
        let _ = writeln!(self.out, "{:width$}{}", "", text, width = self.indent * 2);
    }

    fn block(&mut self, block: &TypedBlock) {
        let ty = self.ty(block.ty);
        self.line(&format!("block: {}", ty));
        self.indent += 1;
        for stmt in &block.statements {
            self.stmt(stmt);
        }
        if let Some(tail) = &block.tail {
            self.line("tail");
            self.indent += 1;
            self.stmt(tail);
            self.indent -= 1;
        }
        self.indent -= 1;
    }

    fn stmt(&mut self, stmt: &TypedStmt) {
        match stmt {
            TypedStmt::Declaration { name, local, value, .. } => {
                let ty = self.ty(self.table.local(*local).ty);
                self.line(&format!("let {}: {}", name, ty));
                if let Some(value) = value {
                    self.indent += 1;
                    self.expr(value);
                    self.indent -= 1;
                }
            }
            TypedStmt::Expression { expression, .. } => self.expr(expression),
        }
    }

    fn expr(&mut self, expr: &TypedExpr) {
        let ty = self.ty(expr.ty);
        let label = match &expr.kind {
            TypedExprKind::Literal(value) => format!("literal {:?}", value),
            TypedExprKind::Variable { name, .. } => format!("variable {}", name),
            TypedExprKind::List(_) => String::from("list"),
            TypedExprKind::Range { .. } => String::from("range"),
            TypedExprKind::Binary { operator, .. } => format!("binary {}", operator),
            TypedExprKind::Assignment { operator, .. } => format!("assignment {}", operator),
            TypedExprKind::Unary { operator, .. } => format!("unary {}", operator),
            TypedExprKind::Call { .. } => String::from("call"),
            TypedExprKind::Index { .. } => String::from("index"),
            TypedExprKind::Field { field, .. } => format!("field {}", field),
            TypedExprKind::For { variable, .. } => format!("for {}", self.table.local(*variable).name),
            TypedExprKind::If { .. } => String::from("if"),
            TypedExprKind::While { .. } => String::from("while"),
            TypedExprKind::Return(_) => String::from("return"),
            TypedExprKind::Debug(_) => String::from("debug"),
            TypedExprKind::Block(_) => String::from("block"),
        };
        self.line(&format!("{}: {}", label, ty));

        self.indent += 1;
        match &expr.kind {
            TypedExprKind::Literal(_) | TypedExprKind::Variable { .. } => {}
            TypedExprKind::List(elements) => elements.iter().for_each(|element| self.expr(element)),
            TypedExprKind::Range { start, end } => {
                self.expr(start);
                self.expr(end);
            }
            TypedExprKind::Binary { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            TypedExprKind::Assignment { assignee, value, .. } => {
                self.expr(assignee);
                self.expr(value);
            }
            TypedExprKind::Unary { operand, .. } => self.expr(operand),
            TypedExprKind::Call { callee, arguments } => {
                self.expr(callee);
                arguments.iter().for_each(|argument| self.expr(&argument.value));
            }
            TypedExprKind::Index { target, index } => {
                self.expr(target);
                self.expr(index);
            }
            TypedExprKind::Field { target, .. } => self.expr(target),
            TypedExprKind::For { range, body, .. } => {
                self.expr(range);
                self.block(body);
            }
            TypedExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.expr(condition);
                self.block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.block(else_branch);
                }
            }
            TypedExprKind::While { condition, body } => {
                self.expr(condition);
                self.block(body);
            }
            TypedExprKind::Return(value) => {
                if let Some(value) = value {
                    self.expr(value);
                }
            }
            TypedExprKind::Debug(value) => self.expr(value),
            TypedExprKind::Block(block) => self.block(block),
        }
        self.indent -= 1;
    }
}
