use crate::{
    ast::{
        expressions::{
            Argument, AssignmentExpr, BinaryExpr, CallExpr, DebugExpr, Expr, ForExpr, IfExpr, IndexExpr,
            ListExpr, LiteralExpr, MemberExpr, PrefixExpr, RangeExpr, ReturnExpr, SymbolExpr, WhileExpr,
        },
        statements::{BlockExpr, ExpressionStmt, Stmt},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser, stmt::parse_block, types::parse_type};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected("expected expression")),
    };

    let mut left = nud(parser)?;

    // While the next operator binds tighter than `bp`, keep extending lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => break,
        };
        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::Identifier => {
            let token = parser.advance().clone();
            Ok(Expr::Symbol(SymbolExpr {
                value: token.value,
                span: token.span,
            }))
        }
        _ => {
            let literal = match &parser.current_token().literal {
                Some(literal) => literal.clone(),
                None => return Err(parser.unexpected("expected literal")),
            };
            let token = parser.advance().clone();
            Ok(Expr::Literal(LiteralExpr {
                value: literal,
                lexeme: token.value,
                span: token.span,
            }))
        }
    }
}

pub fn parse_list_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.clone();

    let mut elements = vec![];
    while parser.current_token_kind() != TokenKind::CloseBracket {
        elements.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    let end = parser.expect(TokenKind::CloseBracket)?.span;

    Ok(Expr::List(ListExpr {
        elements,
        span: start.to(&end),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: left.get_span().to(right.get_span()),
        left: Box::new(left),
        operator: operator_token,
        right: Box::new(right),
    }))
}

/// `^` is right associative: `a ^ b ^ c` is `a ^ (b ^ c)`.
pub fn parse_exponent_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parse_binary_expr(parser, left, BindingPower::Multiplicative)
}

pub fn parse_range_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let end = parse_expr(parser, bp)?;

    Ok(Expr::Range(RangeExpr {
        span: left.get_span().to(end.get_span()),
        start: Box::new(left),
        end: Box::new(end),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Prefix(PrefixExpr {
        span: operator_token.span.to(rhs.get_span()),
        operator: operator_token,
        right: Box::new(rhs),
    }))
}

/// Assignments are right associative: `a = b = c` is `a = (b = c)`.
pub fn parse_assignment_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let rhs = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::Assignment(AssignmentExpr {
        span: left.get_span().to(rhs.get_span()),
        operator: operator_token,
        value: Box::new(rhs),
        assignee: Box::new(left),
    }))
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();

    let mut arguments = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        let label = if parser.current_token_kind() == TokenKind::Identifier
            && parser.peek_kind(1) == TokenKind::Colon
        {
            let label = parser.advance().clone();
            parser.advance();
            Some(label)
        } else {
            None
        };

        arguments.push(Argument {
            label,
            value: parse_expr(parser, BindingPower::Default)?,
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    let end = parser.expect(TokenKind::CloseParen)?.span;

    Ok(Expr::Call(CallExpr {
        span: left.get_span().to(&end),
        callee: Box::new(left),
        arguments,
    }))
}

pub fn parse_index_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let index = parse_expr(parser, BindingPower::Default)?;
    let end = parser.expect(TokenKind::CloseBracket)?.span;

    Ok(Expr::Index(IndexExpr {
        span: left.get_span().to(&end),
        target: Box::new(left),
        index: Box::new(index),
    }))
}

pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let member = parser.expect(TokenKind::Identifier)?;

    Ok(Expr::Member(MemberExpr {
        span: left.get_span().to(&member.span),
        target: Box::new(left),
        member,
    }))
}

pub fn parse_block_expr(parser: &mut Parser) -> Result<Expr, Error> {
    Ok(Expr::Block(parse_block(parser)?))
}

pub fn parse_if_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    let then_branch = parse_block(parser)?;

    let else_branch = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        if parser.current_token_kind() == TokenKind::If {
            // `else if` is sugar for an else block holding just the inner `if`
            let nested = parse_if_expr(parser)?;
            let span = nested.get_span().clone();
            Some(BlockExpr {
                body: vec![],
                tail: Some(Box::new(Stmt::Expression(ExpressionStmt {
                    expression: nested,
                    span: span.clone(),
                }))),
                span,
            })
        } else {
            Some(parse_block(parser)?)
        }
    } else {
        None
    };

    let end = match &else_branch {
        Some(block) => &block.span,
        None => &then_branch.span,
    };

    Ok(Expr::If(IfExpr {
        span: start.to(end),
        condition: Box::new(condition),
        then_branch,
        else_branch,
    }))
}

pub fn parse_while_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    let body = parse_block(parser)?;

    Ok(Expr::While(WhileExpr {
        span: start.to(&body.span),
        condition: Box::new(condition),
        body,
    }))
}

/// `for v: T in range { body }`
pub fn parse_for_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.clone();

    let variable = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::Colon)?;
    let variable_type = parse_type(parser)?;
    parser.expect(TokenKind::In)?;
    let range = parse_expr(parser, BindingPower::Default)?;
    let body = parse_block(parser)?;

    Ok(Expr::For(ForExpr {
        span: start.to(&body.span),
        variable,
        variable_type,
        range: Box::new(range),
        body,
    }))
}

pub fn parse_return_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.clone();

    let value = match parser.current_token_kind() {
        TokenKind::Semicolon | TokenKind::CloseCurly => None,
        _ => Some(Box::new(parse_expr(parser, BindingPower::Default)?)),
    };

    let span = match &value {
        Some(value) => start.to(value.get_span()),
        None => start,
    };

    Ok(Expr::Return(ReturnExpr { value, span }))
}

pub fn parse_debug_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.clone();
    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::Debug(DebugExpr {
        span: start.to(value.get_span()),
        value: Box::new(value),
    }))
}
