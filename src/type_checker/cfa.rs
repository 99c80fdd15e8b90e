//! Return-path analysis over the typed AST.
//!
//! Every node gets a `Verdict` describing how control leaves it. A function
//! whose body ends in `ReturnedType` returns a value of the declared type on
//! every path.

use super::{
    symbol_table::{Id, TypeInfo},
    typed_ast::{TypedBlock, TypedExpr, TypedExprKind, TypedStmt},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every path leaves with a value of the expected type.
    ReturnedType,
    /// Some path leaves with something else.
    ReturnedOther,
    /// Control falls through.
    Continue,
}

/// Verdict for a function body expected to produce `expected`.
pub fn analyse_function(body: &TypedBlock, expected: Id<TypeInfo>) -> Verdict {
    analyse_block(body, expected)
}

fn first_exit<'a>(children: impl IntoIterator<Item = &'a TypedExpr>, expected: Id<TypeInfo>) -> Verdict {
    children
        .into_iter()
        .map(|child| analyse_expr(child, expected))
        .find(|verdict| *verdict != Verdict::Continue)
        .unwrap_or(Verdict::Continue)
}

fn analyse_block(block: &TypedBlock, expected: Id<TypeInfo>) -> Verdict {
    for stmt in &block.statements {
        let verdict = analyse_stmt(stmt, expected);
        if verdict != Verdict::Continue {
            return verdict;
        }
    }

    match &block.tail {
        Some(tail) => match analyse_stmt(tail, expected) {
            Verdict::Continue if tail.ty() == expected => Verdict::ReturnedType,
            Verdict::Continue => Verdict::ReturnedOther,
            verdict => verdict,
        },
        None => Verdict::Continue,
    }
}

fn analyse_stmt(stmt: &TypedStmt, expected: Id<TypeInfo>) -> Verdict {
    match stmt {
        TypedStmt::Declaration { value, .. } => first_exit(value.iter(), expected),
        TypedStmt::Expression { expression, .. } => analyse_expr(expression, expected),
    }
}

fn analyse_expr(expr: &TypedExpr, expected: Id<TypeInfo>) -> Verdict {
    match &expr.kind {
        TypedExprKind::Literal(_) | TypedExprKind::Variable { .. } => Verdict::Continue,
        TypedExprKind::List(elements) => first_exit(elements, expected),
        TypedExprKind::Range { start, end } => first_exit([&**start, &**end], expected),
        TypedExprKind::Binary { left, right, .. } => first_exit([&**left, &**right], expected),
        TypedExprKind::Assignment { assignee, value, .. } => first_exit([&**assignee, &**value], expected),
        TypedExprKind::Unary { operand, .. } => analyse_expr(operand, expected),
        TypedExprKind::Call { callee, arguments } => first_exit(
            std::iter::once(&**callee).chain(arguments.iter().map(|argument| &argument.value)),
            expected,
        ),
        TypedExprKind::Index { target, index } => first_exit([&**target, &**index], expected),
        TypedExprKind::Field { target, .. } => analyse_expr(target, expected),
        TypedExprKind::Debug(value) => analyse_expr(value, expected),
        TypedExprKind::For { range, body, .. } => match analyse_expr(range, expected) {
            Verdict::Continue => analyse_block(body, expected),
            verdict => verdict,
        },
        TypedExprKind::While { .. } => Verdict::Continue,
        TypedExprKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            let verdict = analyse_expr(condition, expected);
            if verdict != Verdict::Continue {
                return verdict;
            }

            let then_verdict = analyse_block(then_branch, expected);
            let Some(else_branch) = else_branch else {
                return then_verdict;
            };

            match (then_verdict, analyse_block(else_branch, expected)) {
                (Verdict::ReturnedType, Verdict::ReturnedType) => Verdict::ReturnedType,
                (Verdict::Continue, _) | (_, Verdict::Continue) => Verdict::Continue,
                _ => Verdict::ReturnedOther,
            }
        }
        TypedExprKind::Return(value) => {
            let verdict = first_exit(value.as_deref(), expected);
            if verdict != Verdict::Continue {
                verdict
            } else if expr.ty == expected {
                Verdict::ReturnedType
            } else {
                Verdict::ReturnedOther
            }
        }
        TypedExprKind::Block(block) => analyse_block(block, expected),
    }
}
