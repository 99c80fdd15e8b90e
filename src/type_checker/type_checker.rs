use std::ops::{Deref, DerefMut};

use log::debug;

use crate::{
    ast::{
        ast::{Function, Program, Rec},
        expressions::{
            AssignmentExpr, BinaryExpr, CallExpr, Expr, ForExpr, IfExpr, IndexExpr, ListExpr,
            MemberExpr, PrefixExpr, RangeExpr, ReturnExpr, SymbolExpr, WhileExpr,
        },
        statements::{BlockExpr, Stmt},
        types::TypeExpr,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{LiteralValue, TokenKind},
    Position, Span,
};

use super::{
    cfa::{analyse_function, Verdict},
    environment::{EnvEntry, Environment, TypeEnvEntry},
    symbol_table::{FunctionInfo, Id, LocalInfo, RecordInfo, SymbolTable, TypeInfo},
    typed_ast::{
        TypedArgument, TypedBlock, TypedExpr, TypedExprKind, TypedFunction, TypedParameter,
        TypedProgram, TypedRecField, TypedRecord, TypedStmt,
    },
    types::{compatible, glb, Type},
};

#[derive(Debug)]
pub struct TypeChecker {
    table: SymbolTable,
    environment: Environment,
    errors: Vec<Error>,
    /// Declared return type of the function being checked.
    return_type: Option<Id<TypeInfo>>,
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeChecker {
    /// A checker whose root scope knows the primitives and the numeric conversions.
    pub fn new() -> Self {
        let mut type_checker = TypeChecker {
            table: SymbolTable::new(),
            environment: Environment::new(),
            errors: vec![],
            return_type: None,
        };

        for primitive in Type::PRIMITIVES {
            let name = primitive.to_string();
            let id = type_checker.table.type_id(primitive);
            type_checker.environment.put_type(name, TypeEnvEntry::Type(id));
        }

        // `i32(x)` converts any numeric value
        for target in Type::CONCRETE_NUMERICS {
            let name = target.to_string();
            let signature = type_checker.table.type_id(Type::Function {
                args: vec![Type::NUMERIC],
                ret: Box::new(target),
                names: vec![String::from("value")],
            });
            let id = type_checker.table.insert_function(FunctionInfo {
                name: name.clone(),
                signature,
            });
            type_checker.environment.put(name, EnvEntry::Function(id));
        }

        type_checker
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    fn report(&mut self, error: ErrorImpl, position: &Position) {
        debug!("{}:{}: {}", position.line, position.column, error);
        self.errors.push(Error::new(error, position.clone()));
    }

    fn intern(&mut self, ty: Type) -> Id<TypeInfo> {
        self.table.type_id(ty)
    }

    fn type_of(&self, id: Id<TypeInfo>) -> &Type {
        self.table.type_definition(id)
    }

    fn is_invalid(&self, id: Id<TypeInfo>) -> bool {
        *self.type_of(id) == Type::INVALID
    }

    fn invalid(&mut self) -> Id<TypeInfo> {
        self.intern(Type::INVALID)
    }

    fn unit(&mut self) -> Id<TypeInfo> {
        self.intern(Type::UNIT)
    }

    /// Enters a block scope, left again when the guard drops.
    pub fn scope(&mut self) -> ScopeGuard<'_> {
        self.environment.push_scope();
        ScopeGuard {
            type_checker: self,
            saved_return_type: None,
        }
    }

    /// Enters a function scope. The previous return type comes back on drop.
    pub fn function_scope(&mut self, return_type: Id<TypeInfo>) -> ScopeGuard<'_> {
        self.environment.push_scope();
        let saved = self.return_type.replace(return_type);
        ScopeGuard {
            type_checker: self,
            saved_return_type: Some(saved),
        }
    }

    /// Resolves a written type against the type namespace.
    pub fn resolve_type(&mut self, type_expr: &TypeExpr) -> Type {
        match type_expr {
            TypeExpr::Symbol(symbol) => match self.environment.get_type(&symbol.name) {
                Some(TypeEnvEntry::Type(id)) => self.type_of(id).clone(),
                Some(TypeEnvEntry::Record(id)) => {
                    let ty = self.table.record(id).ty;
                    self.type_of(ty).clone()
                }
                None => {
                    let error = ErrorImpl::UnknownType {
                        type_: symbol.name.clone(),
                    };
                    self.report(error, &symbol.span.start);
                    Type::INVALID
                }
            },
            TypeExpr::List(list) => match self.resolve_type(&list.element) {
                element if element == Type::INVALID => Type::INVALID,
                element => Type::list(element),
            },
        }
    }

    /// Checks that `received` may stand where `expected` is required.
    ///
    /// `INVALID` on either side fails without a new diagnostic.
    fn require(
        &mut self,
        expected: Id<TypeInfo>,
        received: Id<TypeInfo>,
        position: &Position,
        error: impl FnOnce(String, String) -> ErrorImpl,
    ) -> bool {
        if self.is_invalid(expected) || self.is_invalid(received) {
            return false;
        }

        let (expected, received) = (self.type_of(expected), self.type_of(received));
        if compatible(expected, received) {
            return true;
        }

        let error = error(expected.to_string(), received.to_string());
        self.report(error, position);
        false
    }

    fn require_numeric(&mut self, expr: &TypedExpr) -> bool {
        let ty = self.type_of(expr.ty);
        if *ty == Type::INVALID {
            return false;
        }
        if compatible(ty, &Type::NUMERIC) {
            return true;
        }

        let error = ErrorImpl::ExpectedNumeric {
            received: ty.to_string(),
        };
        self.report(error, &expr.span.start);
        false
    }

    fn require_boolean(&mut self, expr: &TypedExpr) -> bool {
        let ty = self.type_of(expr.ty);
        if *ty == Type::INVALID {
            return false;
        }
        if compatible(ty, &Type::BOOLEAN) {
            return true;
        }

        let error = ErrorImpl::ExpectedBoolean {
            received: ty.to_string(),
        };
        self.report(error, &expr.span.start);
        false
    }

    fn declare_local(&mut self, name: &str, ty: Id<TypeInfo>) -> Id<LocalInfo> {
        let local = self.table.insert_local(LocalInfo {
            name: name.to_string(),
            ty,
        });
        self.environment.put(name, EnvEntry::Local(local));
        local
    }
}

/// Keeps a scope open for as long as it lives.
pub struct ScopeGuard<'a> {
    type_checker: &'a mut TypeChecker,
    saved_return_type: Option<Option<Id<TypeInfo>>>,
}

impl Deref for ScopeGuard<'_> {
    type Target = TypeChecker;

    fn deref(&self) -> &TypeChecker {
        self.type_checker
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut TypeChecker {
        self.type_checker
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.type_checker.environment.pop_scope();
        if let Some(saved) = self.saved_return_type.take() {
            self.type_checker.return_type = saved;
        }
    }
}

enum LiteralNumber {
    Integer(i128),
    Float(f64),
}

/// Value and source text of a numeric literal, looking through leading `-`.
fn literal_number(expr: &Expr) -> Option<(LiteralNumber, String)> {
    match expr {
        Expr::Literal(literal) => match &literal.value {
            LiteralValue::Integer(value) => Some((LiteralNumber::Integer(*value as i128), literal.lexeme.clone())),
            LiteralValue::Float(value) => Some((LiteralNumber::Float(*value), literal.lexeme.clone())),
            _ => None,
        },
        Expr::Prefix(prefix) if prefix.operator.kind == TokenKind::Dash => {
            let (number, text) = literal_number(&prefix.right)?;
            let number = match number {
                LiteralNumber::Integer(value) => LiteralNumber::Integer(-value),
                LiteralNumber::Float(value) => LiteralNumber::Float(-value),
            };
            Some((number, format!("-{}", text)))
        }
        _ => None,
    }
}

fn check_literal_range(type_checker: &mut TypeChecker, expr: &Expr, declared: Id<TypeInfo>) {
    let Some((number, text)) = literal_number(expr) else {
        return;
    };

    let ty = type_checker.type_of(declared);
    let fits = match number {
        LiteralNumber::Integer(value) => ty
            .integer_bounds()
            .map_or(true, |(min, max)| (min..=max).contains(&value)),
        LiteralNumber::Float(value) => ty.float_bound().map_or(true, |bound| value.abs() <= bound),
    };

    if !fits {
        let error = ErrorImpl::LiteralOutOfRange {
            literal: text,
            type_: ty.to_string(),
        };
        type_checker.report(error, &expr.get_span().start);
    }
}

fn is_literal_zero(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(literal) => match literal.value {
            LiteralValue::Integer(value) => value == 0,
            LiteralValue::Float(value) => value == 0.0,
            _ => false,
        },
        _ => false,
    }
}

pub fn type_check_expr(type_checker: &mut TypeChecker, ast: &Expr) -> TypedExpr {
    let (kind, ty) = match ast {
        Expr::Literal(literal) => {
            let ty = match &literal.value {
                LiteralValue::Integer(_) => Type::I_LITERAL,
                LiteralValue::Float(_) => Type::F_LITERAL,
                LiteralValue::Str(_) => Type::STR,
                LiteralValue::Char(_) => Type::CHAR,
                LiteralValue::Bool(_) => Type::BOOLEAN,
            };
            (TypedExprKind::Literal(literal.value.clone()), type_checker.intern(ty))
        }
        Expr::Symbol(symbol) => type_check_symbol(type_checker, symbol),
        Expr::List(list) => type_check_list(type_checker, list),
        Expr::Range(range) => type_check_range(type_checker, range),
        Expr::Binary(binary) => type_check_binary(type_checker, binary),
        Expr::Assignment(assignment) => type_check_assignment(type_checker, assignment),
        Expr::Prefix(prefix) => type_check_prefix(type_checker, prefix),
        Expr::Call(call) => type_check_call(type_checker, call),
        Expr::Index(index) => type_check_index(type_checker, index),
        Expr::Member(member) => type_check_member(type_checker, member),
        Expr::For(for_expr) => type_check_for(type_checker, for_expr),
        Expr::If(if_expr) => type_check_if(type_checker, if_expr),
        Expr::While(while_expr) => type_check_while(type_checker, while_expr),
        Expr::Return(return_expr) => type_check_return(type_checker, return_expr),
        Expr::Debug(debug_expr) => {
            let value = type_check_expr(type_checker, &debug_expr.value);
            let ty = value.ty;
            (TypedExprKind::Debug(Box::new(value)), ty)
        }
        Expr::Block(block) => {
            let block = type_check_block(type_checker, block);
            let ty = block.ty;
            (TypedExprKind::Block(block), ty)
        }
    };

    TypedExpr {
        kind,
        ty,
        span: ast.get_span().clone(),
    }
}

type Checked = (TypedExprKind, Id<TypeInfo>);

fn type_check_symbol(type_checker: &mut TypeChecker, symbol: &SymbolExpr) -> Checked {
    let entry = type_checker.environment.get(&symbol.value);
    let ty = match entry {
        Some(EnvEntry::Local(id)) => type_checker.table.local(id).ty,
        Some(EnvEntry::Function(id)) => type_checker.table.function(id).signature,
        None => {
            let error = ErrorImpl::VariableNotDeclared {
                variable: symbol.value.clone(),
            };
            type_checker.report(error, &symbol.span.start);
            type_checker.invalid()
        }
    };

    let kind = TypedExprKind::Variable {
        name: symbol.value.clone(),
        entry,
    };
    (kind, ty)
}

fn type_check_list(type_checker: &mut TypeChecker, list: &ListExpr) -> Checked {
    let elements: Vec<TypedExpr> = list
        .elements
        .iter()
        .map(|element| type_check_expr(type_checker, element))
        .collect();

    let mut element_type = match elements.first() {
        Some(first) => type_checker.type_of(first.ty).clone(),
        None => Type::ANY,
    };
    for element in elements.iter().skip(1) {
        let received = type_checker.type_of(element.ty).clone();
        if element_type == Type::INVALID || received == Type::INVALID {
            element_type = Type::INVALID;
            break;
        }

        let meet = glb(&element_type, &received);
        if meet == Type::NOTHING {
            let error = ErrorImpl::ListElementTypeError {
                expected: element_type.to_string(),
                received: received.to_string(),
            };
            type_checker.report(error, &element.span.start);
            element_type = Type::INVALID;
            break;
        }
        element_type = meet;
    }

    let ty = type_checker.intern(Type::list(element_type));
    (TypedExprKind::List(elements), ty)
}

fn type_check_range(type_checker: &mut TypeChecker, range: &RangeExpr) -> Checked {
    let start = type_check_expr(type_checker, &range.start);
    let end = type_check_expr(type_checker, &range.end);

    let ty = if type_checker.require(start.ty, end.ty, &end.span.start, |left, right| {
        ErrorImpl::OperandTypeMatchError {
            operator: String::from(".."),
            left,
            right,
        }
    }) {
        let element = glb(type_checker.type_of(start.ty), type_checker.type_of(end.ty));
        type_checker.intern(Type::range(element))
    } else {
        type_checker.invalid()
    };

    let kind = TypedExprKind::Range {
        start: Box::new(start),
        end: Box::new(end),
    };
    (kind, ty)
}

fn type_check_arithmetic(
    type_checker: &mut TypeChecker,
    operator: &str,
    left: &TypedExpr,
    right: &TypedExpr,
    divides_by_zero: bool,
) -> Id<TypeInfo> {
    if !(type_checker.require_numeric(left) && type_checker.require_numeric(right)) {
        return type_checker.invalid();
    }

    if divides_by_zero {
        type_checker.report(ErrorImpl::DivisionByZero, &right.span.start);
        return type_checker.invalid();
    }

    let (left_type, right_type) = (type_checker.type_of(left.ty), type_checker.type_of(right.ty));
    let meet = glb(left_type, right_type);
    if meet == Type::NOTHING {
        let error = ErrorImpl::OperandTypeMatchError {
            operator: operator.to_string(),
            left: left_type.to_string(),
            right: right_type.to_string(),
        };
        type_checker.report(error, &right.span.start);
        return type_checker.invalid();
    }

    type_checker.intern(meet)
}

fn type_check_binary(type_checker: &mut TypeChecker, binary: &BinaryExpr) -> Checked {
    let left = type_check_expr(type_checker, &binary.left);
    let right = type_check_expr(type_checker, &binary.right);
    let operator = binary.operator.kind;

    let ty = match operator {
        TokenKind::Plus
        | TokenKind::Dash
        | TokenKind::Star
        | TokenKind::Slash
        | TokenKind::Percent
        | TokenKind::Caret => {
            let divides_by_zero = matches!(operator, TokenKind::Slash | TokenKind::Percent)
                && is_literal_zero(&binary.right);
            type_check_arithmetic(type_checker, &binary.operator.value, &left, &right, divides_by_zero)
        }
        TokenKind::Less | TokenKind::LessEquals | TokenKind::Greater | TokenKind::GreaterEquals => {
            if type_checker.require_numeric(&left) && type_checker.require_numeric(&right) {
                type_checker.intern(Type::BOOLEAN)
            } else {
                type_checker.invalid()
            }
        }
        TokenKind::Equals | TokenKind::NotEquals => type_checker.intern(Type::BOOLEAN),
        TokenKind::And | TokenKind::Or => {
            if type_checker.require_boolean(&left) && type_checker.require_boolean(&right) {
                type_checker.intern(Type::BOOLEAN)
            } else {
                type_checker.invalid()
            }
        }
        _ => unreachable!("parser produced binary operator {}", operator),
    };

    let kind = TypedExprKind::Binary {
        left: Box::new(left),
        operator,
        right: Box::new(right),
    };
    (kind, ty)
}

fn type_check_assignment(type_checker: &mut TypeChecker, assignment: &AssignmentExpr) -> Checked {
    let assignee = type_check_expr(type_checker, &assignment.assignee);
    let value = type_check_expr(type_checker, &assignment.value);
    let operator = assignment.operator.kind;

    let assignable = matches!(
        *assignment.assignee,
        Expr::Symbol(_) | Expr::Member(_) | Expr::Index(_)
    );

    let ty = if !assignable {
        type_checker.report(ErrorImpl::InvalidAssignmentTarget, &assignee.span.start);
        type_checker.invalid()
    } else if type_checker.require(assignee.ty, value.ty, &value.span.start, |expected, received| {
        ErrorImpl::TypeMatchError { expected, received }
    }) {
        assignee.ty
    } else {
        type_checker.invalid()
    };

    let kind = TypedExprKind::Assignment {
        assignee: Box::new(assignee),
        operator,
        value: Box::new(value),
    };
    (kind, ty)
}

fn type_check_prefix(type_checker: &mut TypeChecker, prefix: &PrefixExpr) -> Checked {
    let operand = type_check_expr(type_checker, &prefix.right);
    let operator = prefix.operator.kind;

    let ty = match operator {
        TokenKind::Not => {
            if type_checker.require_boolean(&operand) {
                type_checker.intern(Type::BOOLEAN)
            } else {
                type_checker.invalid()
            }
        }
        TokenKind::Dash => {
            if type_checker.require_numeric(&operand) {
                operand.ty
            } else {
                type_checker.invalid()
            }
        }
        TokenKind::Hash => {
            let operand_type = type_checker.type_of(operand.ty);
            if *operand_type == Type::INVALID {
                type_checker.invalid()
            } else if operand_type.is_list() || compatible(operand_type, &Type::STR) {
                type_checker.intern(Type::I_LITERAL)
            } else {
                let error = ErrorImpl::NotMeasurable {
                    type_: operand_type.to_string(),
                };
                type_checker.report(error, &operand.span.start);
                type_checker.invalid()
            }
        }
        _ => unreachable!("parser produced prefix operator {}", operator),
    };

    let kind = TypedExprKind::Unary {
        operator,
        operand: Box::new(operand),
    };
    (kind, ty)
}

fn type_check_call(type_checker: &mut TypeChecker, call: &CallExpr) -> Checked {
    let callee = type_check_expr(type_checker, &call.callee);
    // Labels are kept but never matched against parameter names
    let arguments: Vec<TypedArgument> = call
        .arguments
        .iter()
        .map(|argument| TypedArgument {
            label: argument.label.as_ref().map(|label| label.value.clone()),
            value: type_check_expr(type_checker, &argument.value),
        })
        .collect();

    let ty = call_result(type_checker, &callee, &arguments, &call.span);

    let kind = TypedExprKind::Call {
        callee: Box::new(callee),
        arguments,
    };
    (kind, ty)
}

fn call_result(
    type_checker: &mut TypeChecker,
    callee: &TypedExpr,
    arguments: &[TypedArgument],
    span: &Span,
) -> Id<TypeInfo> {
    let (parameters, ret) = match type_checker.type_of(callee.ty).clone() {
        Type::Function { args, ret, .. } => (args, *ret),
        other if other == Type::INVALID => return type_checker.invalid(),
        other => {
            let error = ErrorImpl::NotCallable {
                type_: other.to_string(),
            };
            type_checker.report(error, &callee.span.start);
            return type_checker.invalid();
        }
    };

    if arguments.len() > parameters.len() {
        let error = ErrorImpl::UnexpectedArguments {
            expected: parameters.len(),
            received: arguments.len(),
        };
        type_checker.report(error, &arguments[parameters.len()].value.span.start);
        return type_checker.invalid();
    }
    if arguments.len() < parameters.len() {
        let error = ErrorImpl::MissingArguments {
            expected: parameters.len(),
            received: arguments.len(),
        };
        type_checker.report(error, &span.end);
        return type_checker.invalid();
    }

    let mut matched = true;
    for (argument, parameter) in arguments.iter().zip(parameters) {
        let parameter = type_checker.intern(parameter);
        matched &= type_checker.require(parameter, argument.value.ty, &argument.value.span.start, |expected, received| {
            ErrorImpl::ArgumentTypeMatchError { expected, received }
        });
    }

    if matched {
        type_checker.intern(ret)
    } else {
        type_checker.invalid()
    }
}

fn type_check_index(type_checker: &mut TypeChecker, index_expr: &IndexExpr) -> Checked {
    let target = type_check_expr(type_checker, &index_expr.target);
    let index = type_check_expr(type_checker, &index_expr.index);

    let target_type = type_checker.type_of(target.ty).clone();
    let element = if target_type == Type::INVALID {
        None
    } else if let Some(element) = target_type.list_element() {
        Some(element.clone())
    } else {
        let error = ErrorImpl::ExpectedList {
            received: target_type.to_string(),
        };
        type_checker.report(error, &target.span.start);
        None
    };

    let integer = type_checker.intern(Type::I_LITERAL);
    let index_fits = type_checker.require(integer, index.ty, &index.span.start, |expected, received| {
        ErrorImpl::TypeMatchError { expected, received }
    });

    let ty = match element {
        Some(element) if index_fits => type_checker.intern(element),
        _ => type_checker.invalid(),
    };

    let kind = TypedExprKind::Index {
        target: Box::new(target),
        index: Box::new(index),
    };
    (kind, ty)
}

fn type_check_member(type_checker: &mut TypeChecker, member: &MemberExpr) -> Checked {
    let target = type_check_expr(type_checker, &member.target);
    let field = member.member.value.clone();

    let (index, ty) = match type_checker.type_of(target.ty).clone() {
        Type::Record { name, fields, types } => match fields.iter().position(|candidate| *candidate == field) {
            Some(index) => (Some(index), type_checker.intern(types[index].clone())),
            None => {
                let error = ErrorImpl::UnknownField {
                    record: name,
                    field: field.clone(),
                };
                type_checker.report(error, &member.member.span.start);
                (None, type_checker.invalid())
            }
        },
        other if other == Type::INVALID => (None, type_checker.invalid()),
        other => {
            let error = ErrorImpl::ExpectedRecord {
                received: other.to_string(),
            };
            type_checker.report(error, &target.span.start);
            (None, type_checker.invalid())
        }
    };

    let kind = TypedExprKind::Field {
        target: Box::new(target),
        field,
        index,
    };
    (kind, ty)
}

fn type_check_for(type_checker: &mut TypeChecker, for_expr: &ForExpr) -> Checked {
    let range = type_check_expr(type_checker, &for_expr.range);
    let declared = type_checker.resolve_type(&for_expr.variable_type);
    let declared = type_checker.intern(declared);

    let range_type = type_checker.type_of(range.ty).clone();
    if range_type != Type::INVALID {
        match range_type.range_element() {
            Some(element) => {
                let element = type_checker.intern(element.clone());
                type_checker.require(declared, element, &range.span.start, |expected, received| {
                    ErrorImpl::TypeMatchError { expected, received }
                });
            }
            None => {
                let error = ErrorImpl::ExpectedRange {
                    received: range_type.to_string(),
                };
                type_checker.report(error, &range.span.start);
            }
        }
    }

    let (variable, body) = {
        let mut scope = type_checker.scope();
        let variable = scope.declare_local(&for_expr.variable.value, declared);
        let body = type_check_block(&mut scope, &for_expr.body);
        (variable, body)
    };

    let kind = TypedExprKind::For {
        variable,
        range: Box::new(range),
        body,
    };
    (kind, type_checker.unit())
}

fn type_check_if(type_checker: &mut TypeChecker, if_expr: &IfExpr) -> Checked {
    let condition = type_check_expr(type_checker, &if_expr.condition);
    type_checker.require_boolean(&condition);

    let then_branch = type_check_block(type_checker, &if_expr.then_branch);
    let else_branch = if_expr
        .else_branch
        .as_ref()
        .map(|else_branch| type_check_block(type_checker, else_branch));

    let ty = match &else_branch {
        None => type_checker.unit(),
        Some(else_branch) => {
            let (then_type, else_type) = (type_checker.type_of(then_branch.ty), type_checker.type_of(else_branch.ty));
            if *then_type == Type::INVALID || *else_type == Type::INVALID {
                type_checker.invalid()
            } else if compatible(then_type, else_type) {
                then_branch.ty
            } else {
                let error = ErrorImpl::BranchTypeMatchError {
                    then_type: then_type.to_string(),
                    else_type: else_type.to_string(),
                };
                type_checker.report(error, &else_branch.span.start);
                type_checker.invalid()
            }
        }
    };

    let kind = TypedExprKind::If {
        condition: Box::new(condition),
        then_branch,
        else_branch,
    };
    (kind, ty)
}

fn type_check_while(type_checker: &mut TypeChecker, while_expr: &WhileExpr) -> Checked {
    let condition = type_check_expr(type_checker, &while_expr.condition);
    type_checker.require_boolean(&condition);
    let body = type_check_block(type_checker, &while_expr.body);

    let kind = TypedExprKind::While {
        condition: Box::new(condition),
        body,
    };
    (kind, type_checker.unit())
}

fn type_check_return(type_checker: &mut TypeChecker, return_expr: &ReturnExpr) -> Checked {
    let value = return_expr
        .value
        .as_ref()
        .map(|value| type_check_expr(type_checker, value));

    let received = match &value {
        Some(value) => value.ty,
        None => type_checker.unit(),
    };
    let expected = match type_checker.return_type {
        Some(expected) => expected,
        None => type_checker.unit(),
    };
    let position = value
        .as_ref()
        .map_or(&return_expr.span.start, |value| &value.span.start)
        .clone();

    // Records the type narrowed to the declared one: `return 1` in an
    // `i32` function has type `i32`.
    let ty = if type_checker.require(expected, received, &position, |expected, received| {
        ErrorImpl::ReturnTypeMatchError { expected, received }
    }) {
        let narrowed = glb(type_checker.type_of(received), type_checker.type_of(expected));
        if narrowed == Type::NOTHING {
            expected
        } else {
            type_checker.intern(narrowed)
        }
    } else {
        type_checker.invalid()
    };

    (TypedExprKind::Return(value.map(Box::new)), ty)
}

pub fn type_check_stmt(type_checker: &mut TypeChecker, ast: &Stmt) -> TypedStmt {
    match ast {
        Stmt::VarDecl(decl) => {
            let declared = type_checker.resolve_type(&decl.explicit_type);
            let declared = type_checker.intern(declared);

            let value = match &decl.assigned_value {
                Some(value) => {
                    let typed = type_check_expr(type_checker, value);
                    if type_checker.require(declared, typed.ty, &typed.span.start, |expected, received| {
                        ErrorImpl::TypeMatchError { expected, received }
                    }) {
                        check_literal_range(type_checker, value, declared);
                    }
                    Some(typed)
                }
                None => None,
            };

            let name = decl.name.value.clone();
            if type_checker.environment.declared_here(&name) {
                let error = ErrorImpl::VariableAlreadyDeclared {
                    variable: name.clone(),
                };
                type_checker.report(error, &decl.name.span.start);
            }
            // Bound even after an error so later uses still resolve
            let local = type_checker.declare_local(&name, declared);

            TypedStmt::Declaration {
                name,
                local,
                value,
                ty: type_checker.unit(),
                span: decl.span.clone(),
            }
        }
        Stmt::Expression(stmt) => {
            let expression = type_check_expr(type_checker, &stmt.expression);
            TypedStmt::Expression {
                ty: expression.ty,
                expression,
                span: stmt.span.clone(),
            }
        }
    }
}

pub fn type_check_block(type_checker: &mut TypeChecker, ast: &BlockExpr) -> TypedBlock {
    let mut scope = type_checker.scope();

    if ast.is_empty() {
        scope.report(ErrorImpl::EmptyBlock, &ast.span.start);
    }

    let statements = ast
        .body
        .iter()
        .map(|stmt| type_check_stmt(&mut scope, stmt))
        .collect();
    let tail = ast
        .tail
        .as_ref()
        .map(|tail| Box::new(type_check_stmt(&mut scope, tail)));

    let ty = match &tail {
        Some(tail) => tail.ty(),
        None => scope.unit(),
    };

    TypedBlock {
        statements,
        tail,
        ty,
        span: ast.span.clone(),
    }
}

pub fn type_check_record(type_checker: &mut TypeChecker, ast: &Rec) -> Option<TypedRecord> {
    let name = ast.name.value.clone();
    if type_checker.environment.get_type(&name).is_some() {
        let error = ErrorImpl::RecordAlreadyDeclared { record: name };
        type_checker.report(error, &ast.name.span.start);
        return None;
    }

    let mut field_names: Vec<String> = vec![];
    let mut field_types = vec![];
    for field in &ast.fields {
        if field_names.contains(&field.name.value) {
            let error = ErrorImpl::FieldAlreadyDeclared {
                field: field.name.value.clone(),
            };
            type_checker.report(error, &field.name.span.start);
            continue;
        }
        field_names.push(field.name.value.clone());
        field_types.push(type_checker.resolve_type(&field.type_));
    }

    let record_type = Type::Record {
        name: name.clone(),
        fields: field_names.clone(),
        types: field_types.clone(),
    };
    let ty = type_checker.intern(record_type.clone());
    let id = type_checker.table.insert_record(RecordInfo { name: name.clone(), ty });
    type_checker.environment.put_type(name.clone(), TypeEnvEntry::Record(id));

    // Positional constructor under the record's name
    let signature = type_checker.intern(Type::Function {
        args: field_types.clone(),
        ret: Box::new(record_type),
        names: field_names.clone(),
    });
    let constructor = type_checker.table.insert_function(FunctionInfo {
        name: name.clone(),
        signature,
    });
    type_checker.environment.put(name.clone(), EnvEntry::Function(constructor));
    debug!("registered record `{}` ({} fields)", name, field_names.len());

    let fields = field_names
        .into_iter()
        .zip(field_types)
        .map(|(name, ty)| TypedRecField {
            name,
            ty: type_checker.intern(ty),
        })
        .collect();

    Some(TypedRecord {
        name,
        id,
        fields,
        span: ast.span.clone(),
    })
}

pub fn type_check_function(type_checker: &mut TypeChecker, ast: &Function) -> TypedFunction {
    let name = ast.name.value.clone();
    let errors_before = type_checker.errors.len();

    let parameter_names: Vec<String> = ast.parameters.iter().map(|parameter| parameter.name.value.clone()).collect();
    let parameter_types: Vec<Type> = ast
        .parameters
        .iter()
        .map(|parameter| type_checker.resolve_type(&parameter.type_))
        .collect();
    let return_type = match &ast.return_type {
        Some(return_type) => type_checker.resolve_type(return_type),
        None => Type::UNIT,
    };
    let return_id = type_checker.intern(return_type.clone());

    let signature = type_checker.intern(Type::Function {
        args: parameter_types.clone(),
        ret: Box::new(return_type.clone()),
        names: parameter_names.clone(),
    });
    let id = type_checker.table.insert_function(FunctionInfo {
        name: name.clone(),
        signature,
    });

    // Bound before the body so recursive calls resolve
    if type_checker.environment.declared_here(&name) {
        let error = ErrorImpl::FunctionAlreadyDeclared { function: name.clone() };
        type_checker.report(error, &ast.name.span.start);
    } else {
        type_checker.environment.put(name.clone(), EnvEntry::Function(id));
    }
    debug!("registered function `{}`: {}", name, type_checker.type_of(signature));

    let (parameters, body) = {
        let mut scope = type_checker.function_scope(return_id);

        let mut parameters = vec![];
        for ((parameter, name), ty) in ast.parameters.iter().zip(parameter_names).zip(parameter_types) {
            if scope.environment.declared_here(&name) {
                let error = ErrorImpl::VariableAlreadyDeclared { variable: name.clone() };
                scope.report(error, &parameter.name.span.start);
            }
            let ty = scope.intern(ty);
            let local = scope.declare_local(&name, ty);
            parameters.push(TypedParameter { name, local });
        }

        let body = type_check_block(&mut scope, &ast.body);
        (parameters, body)
    };

    let verdict = analyse_function(&body, return_id);
    debug!("return analysis of `{}`: {:?}", name, verdict);

    let accepted = verdict == Verdict::ReturnedType || compatible(type_checker.type_of(body.ty), &return_type);
    // A body that already failed explains itself
    if !accepted && type_checker.errors.len() == errors_before {
        let error = ErrorImpl::MissingReturn {
            function: name.clone(),
            expected: return_type.to_string(),
        };
        type_checker.report(error, &ast.name.span.start);
    }

    TypedFunction {
        name,
        id,
        parameters,
        return_type: return_id,
        body,
        span: ast.span.clone(),
    }
}

impl TypeChecker {
    /// Checks records, then functions in source order. Every error is collected.
    pub fn check_program(&mut self, program: &Program) -> (Vec<TypedRecord>, Vec<TypedFunction>) {
        let records = program
            .records
            .iter()
            .filter_map(|record| type_check_record(self, record))
            .collect();
        let functions = program
            .functions
            .iter()
            .map(|function| type_check_function(self, function))
            .collect();

        (records, functions)
    }
}

/// Type checks `program`, returning the typed program even when errors were found.
pub fn analyse(program: &Program) -> (TypedProgram, Vec<Error>) {
    let mut type_checker = TypeChecker::new();
    let (records, functions) = type_checker.check_program(program);

    let TypeChecker { table, errors, .. } = type_checker;
    debug!(
        "type checked {} functions and {} records, {} errors, {} interned types",
        functions.len(),
        records.len(),
        errors.len(),
        table.type_count()
    );

    (
        TypedProgram {
            functions,
            records,
            table,
        },
        errors,
    )
}

pub fn type_check(ast: &Program) -> Result<TypedProgram, Vec<Error>> {
    let (typed_program, errors) = analyse(ast);

    if errors.is_empty() {
        Ok(typed_program)
    } else {
        Err(errors)
    }
}
