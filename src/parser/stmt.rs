use crate::{
    ast::{
        ast::{Function, Parameter, Rec, RecField},
        expressions::Expr,
        statements::{BlockExpr, ExpressionStmt, Stmt, VarDeclStmt},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{
    expr::{parse_block_expr, parse_expr, parse_for_expr, parse_if_expr, parse_while_expr},
    lookups::BindingPower,
    parser::Parser,
    types::parse_type,
};

/// Parses one statement inside a block.
///
/// Returns the statement and whether it was terminated by `;`. Block-like
/// expressions (`if`, `while`, `for`, `{}`) need no `;`; any other
/// expression needs one unless it is directly followed by `}`.
pub fn parse_stmt(parser: &mut Parser) -> Result<(Stmt, bool), Error> {
    if parser.current_token_kind() == TokenKind::Let {
        return Ok((parse_var_decl_stmt(parser)?, true));
    }

    // A block-like expression at the start of a statement ends at its `}`
    let expr = match parser.current_token_kind() {
        TokenKind::If => parse_if_expr(parser)?,
        TokenKind::While => parse_while_expr(parser)?,
        TokenKind::For => parse_for_expr(parser)?,
        TokenKind::OpenCurly => parse_block_expr(parser)?,
        _ => parse_expr(parser, BindingPower::Default)?,
    };

    match parser.current_token_kind() {
        TokenKind::Semicolon => {
            let end = parser.advance().span.clone();
            Ok((
                Stmt::Expression(ExpressionStmt {
                    span: expr.get_span().to(&end),
                    expression: expr,
                }),
                true,
            ))
        }
        TokenKind::CloseCurly => Ok((expression_stmt(expr), false)),
        _ if expr.is_block_like() => Ok((expression_stmt(expr), false)),
        _ => Err(parser.unexpected("expected `;`")),
    }
}

fn expression_stmt(expression: Expr) -> Stmt {
    Stmt::Expression(ExpressionStmt {
        span: expression.get_span().clone(),
        expression,
    })
}

/// `let name: T = value;`
pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_token = parser.advance().clone();

    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected identifier during variable declaration"),
        },
        parser.get_position(),
    );
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?;

    let error = parser.unexpected("expected `:` and a type, every variable needs one");
    parser.expect_error(TokenKind::Colon, Some(error))?;
    let explicit_type = parse_type(parser)?;

    let assigned_value = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    let error = parser.unexpected("expected `;`");
    let end = parser.expect_error(TokenKind::Semicolon, Some(error))?.span;

    Ok(Stmt::VarDecl(VarDeclStmt {
        span: start_token.span.to(&end),
        name,
        explicit_type,
        assigned_value,
    }))
}

/// Parses `{ statements }`, recovering from broken statements.
///
/// The last statement becomes the block's tail when it was not terminated by
/// `;`.
pub fn parse_block(parser: &mut Parser) -> Result<BlockExpr, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span;

    let mut body = vec![];
    let mut tail: Option<Box<Stmt>> = None;

    while parser.current_token_kind() != TokenKind::CloseCurly && parser.has_tokens() {
        if let Some(previous) = tail.take() {
            body.push(*previous);
        }

        let started_at = parser.pos();
        match parse_stmt(parser) {
            Ok((stmt, true)) => body.push(stmt),
            Ok((stmt, false)) => tail = Some(Box::new(stmt)),
            Err(error) => {
                parser.report(error);
                parser.synchronize_statement(started_at);
            }
        }
    }

    let error = parser.unexpected("expected `}`");
    let end = parser.expect_error(TokenKind::CloseCurly, Some(error))?.span;

    Ok(BlockExpr {
        body,
        tail,
        span: start.to(&end),
    })
}

/// `fn name(a: T, b: U) -> R { body }`
pub fn parse_function(parser: &mut Parser) -> Result<Function, Error> {
    let start = parser.advance().span.clone();

    let name = parser.expect(TokenKind::Identifier)?;

    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        let name = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Colon)?;
        let type_ = parse_type(parser)?;

        parameters.push(Parameter { name, type_ });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let return_type = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        Some(parse_type(parser)?)
    } else {
        None
    };

    let body = parse_block(parser)?;

    Ok(Function {
        span: start.to(&body.span),
        name,
        parameters,
        return_type,
        body,
    })
}

/// `rec Name { let field: T; ... }`
pub fn parse_rec(parser: &mut Parser) -> Result<Rec, Error> {
    let start = parser.advance().span.clone();

    let name = parser.expect(TokenKind::Identifier)?;

    parser.expect(TokenKind::OpenCurly)?;

    let mut fields = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        let error = parser.unexpected("expected `let` field declaration");
        parser.expect_error(TokenKind::Let, Some(error))?;

        let name = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Colon)?;
        let type_ = parse_type(parser)?;
        parser.expect(TokenKind::Semicolon)?;

        fields.push(RecField { name, type_ });
    }

    let end = parser.expect(TokenKind::CloseCurly)?.span;

    Ok(Rec {
        name,
        fields,
        span: start.to(&end),
    })
}
