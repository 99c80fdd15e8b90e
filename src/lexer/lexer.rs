use std::rc::Rc;

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{LiteralValue, Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(regex: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        // Patterns are compile-time constants.
        regex: Regex::new(&format!("^(?:{})", regex)).unwrap(),
        handler,
    }
}

lazy_static! {
    /// Tried in order, first match wins. Longer operators come before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern("\\s+", skip_handler),
        pattern("//[^\\n]*", skip_handler),
        pattern("[\\p{L}_][\\p{L}\\p{N}_]*", symbol_handler),
        pattern("0x[0-9a-fA-F]+", number_handler),
        pattern("0b[01]+", number_handler),
        pattern("0o[0-7]+", number_handler),
        pattern("[0-9]+\\.[0-9]+", float_handler),
        pattern("[0-9]+", number_handler),
        pattern("\"", string_handler),
        pattern("'", char_handler),
        pattern("\\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
        pattern("\\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
        pattern("\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern("\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern("\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern("\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern("==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern("!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern("!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!")),
        pattern("=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern("<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern("<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern(">=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern(">", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern("\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
        pattern("&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
        pattern("\\.\\.", MK_DEFAULT_HANDLER!(TokenKind::DotDot, "..")),
        pattern("\\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        pattern(";", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        pattern(":", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        pattern(",", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern("#", MK_DEFAULT_HANDLER!(TokenKind::Hash, "#")),
        pattern("->", MK_DEFAULT_HANDLER!(TokenKind::Arrow, "->")),
        pattern("\\+=", MK_DEFAULT_HANDLER!(TokenKind::PlusEquals, "+=")),
        pattern("-=", MK_DEFAULT_HANDLER!(TokenKind::MinusEquals, "-=")),
        pattern("\\*=", MK_DEFAULT_HANDLER!(TokenKind::StarEquals, "*=")),
        pattern("/=", MK_DEFAULT_HANDLER!(TokenKind::SlashEquals, "/=")),
        pattern("%=", MK_DEFAULT_HANDLER!(TokenKind::PercentEquals, "%=")),
        pattern("\\^=", MK_DEFAULT_HANDLER!(TokenKind::CaretEquals, "^=")),
        pattern("\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern("-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern("\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern("/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern("%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
        pattern("\\^", MK_DEFAULT_HANDLER!(TokenKind::Caret, "^")),
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    errors: Vec<Error>,
    source: Rc<String>,
    file: Rc<String>,
    pos: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            tokens: vec![],
            errors: vec![],
            source: Rc::new(source),
            file: file_name,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Advances `n` bytes, keeping line and column in step.
    pub fn advance_n(&mut self, n: usize) {
        let end = (self.pos + n).min(self.source.len());
        for ch in self.source[self.pos..end].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos = end;
    }

    pub fn push(&mut self, token: Token) {
        trace!("token {}", token);
        self.tokens.push(token);
    }

    pub fn error(&mut self, error: ErrorImpl, position: Position) {
        debug!("lexical error at {}:{}: {}", position.line, position.column, error);
        self.errors.push(Error::new(error, position));
    }

    pub fn position(&self) -> Position {
        Position::new(
            self.line,
            self.column,
            Rc::clone(&self.file),
            Rc::clone(&self.source),
        )
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn matched(&self, regex: &Regex) -> String {
        regex
            .find(self.remainder())
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    lexer.advance_n(matched.len());
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = lexer.matched(regex);
    let start = lexer.position();
    lexer.advance_n(value.len());
    let span = Span::new(start, lexer.position());

    if let Some(kind) = RESERVED_LOOKUP.get(value.as_str()) {
        let literal = match kind {
            TokenKind::True => Some(LiteralValue::Bool(true)),
            TokenKind::False => Some(LiteralValue::Bool(false)),
            _ => None,
        };
        lexer.push(MK_TOKEN!(*kind, value, span, literal));
    } else {
        lexer.push(MK_TOKEN!(TokenKind::Identifier, value, span));
    }
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = lexer.matched(regex);
    let start = lexer.position();
    lexer.advance_n(value.len());
    let span = Span::new(start.clone(), lexer.position());

    let parsed = if let Some(digits) = value.strip_prefix("0x") {
        u64::from_str_radix(digits, 16)
    } else if let Some(digits) = value.strip_prefix("0b") {
        u64::from_str_radix(digits, 2)
    } else if let Some(digits) = value.strip_prefix("0o") {
        u64::from_str_radix(digits, 8)
    } else {
        value.parse::<u64>()
    };

    match parsed {
        Ok(number) => lexer.push(MK_TOKEN!(
            TokenKind::Integer,
            value,
            span,
            Some(LiteralValue::Integer(number))
        )),
        Err(_) => lexer.error(ErrorImpl::NumberParseError { token: value }, start),
    }
}

fn float_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = lexer.matched(regex);
    let start = lexer.position();
    lexer.advance_n(value.len());
    let span = Span::new(start.clone(), lexer.position());

    match value.parse::<f64>() {
        Ok(number) => lexer.push(MK_TOKEN!(
            TokenKind::Float,
            value,
            span,
            Some(LiteralValue::Float(number))
        )),
        Err(_) => lexer.error(ErrorImpl::NumberParseError { token: value }, start),
    }
}

/// Decodes the escape following a backslash. Returns `None` for unknown escapes.
fn escape(ch: char) -> Option<char> {
    match ch {
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        '\'' => Some('\''),
        '0' => Some('\0'),
        _ => None,
    }
}

/// A quoted literal: decoded contents, bytes consumed, and any unknown
/// escapes with their char offset from the opening quote.
struct Quoted {
    value: String,
    length: usize,
    invalid: Vec<(String, usize)>,
}

/// Scans a quoted literal starting at the opening `quote`. Returns `None`
/// when the line or input ends before the closing quote.
fn scan_quoted(text: &str, quote: char) -> Option<Quoted> {
    let mut value = String::new();
    let mut invalid = vec![];
    let mut chars = text.char_indices().skip(1);

    while let Some((index, ch)) = chars.next() {
        match ch {
            c if c == quote => {
                return Some(Quoted {
                    value,
                    length: index + ch.len_utf8(),
                    invalid,
                });
            }
            '\n' => return None,
            '\\' => match chars.next() {
                Some((_, next)) => match escape(next) {
                    Some(decoded) => value.push(decoded),
                    None => invalid.push((next.to_string(), text[..index].chars().count())),
                },
                None => return None,
            },
            _ => value.push(ch),
        }
    }

    None
}

fn report_escapes(lexer: &mut Lexer, start: &Position, invalid: Vec<(String, usize)>) {
    for (escape, offset) in invalid {
        let mut position = start.clone();
        position.column += offset as u32;
        lexer.error(ErrorImpl::InvalidEscape { escape }, position);
    }
}

/// Skips the rest of the line after an unterminated literal.
fn skip_line(lexer: &mut Lexer) {
    let rest = lexer.remainder().find('\n').unwrap_or(lexer.remainder().len());
    lexer.advance_n(rest);
}

fn string_handler(lexer: &mut Lexer, _regex: &Regex) {
    let start = lexer.position();

    match scan_quoted(lexer.remainder(), '"') {
        Some(Quoted {
            value,
            length,
            invalid,
        }) => {
            report_escapes(lexer, &start, invalid);
            lexer.advance_n(length);
            let span = Span::new(start, lexer.position());
            lexer.push(MK_TOKEN!(
                TokenKind::String,
                value.clone(),
                span,
                Some(LiteralValue::Str(value))
            ));
        }
        None => {
            lexer.error(ErrorImpl::UnterminatedString, start);
            skip_line(lexer);
        }
    }
}

fn char_handler(lexer: &mut Lexer, _regex: &Regex) {
    let start = lexer.position();

    match scan_quoted(lexer.remainder(), '\'') {
        Some(Quoted {
            value,
            length,
            invalid,
        }) => {
            report_escapes(lexer, &start, invalid);
            lexer.advance_n(length);
            let span = Span::new(start.clone(), lexer.position());
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => lexer.push(MK_TOKEN!(
                    TokenKind::Char,
                    value,
                    span,
                    Some(LiteralValue::Char(ch))
                )),
                _ => lexer.error(
                    ErrorImpl::UnrecognisedToken {
                        token: format!("'{}'", value),
                    },
                    start,
                ),
            }
        }
        None => {
            lexer.error(ErrorImpl::UnterminatedChar, start);
            skip_line(lexer);
        }
    }
}

/// Turns source text into tokens, always ending with an `EOF` token.
///
/// Unrecognised characters are reported and skipped so that every lexical
/// error in the file is collected in one pass.
pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Vec<Error>> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let mut matched = false;

        for pattern in PATTERNS.iter() {
            if pattern.regex.is_match(lex.remainder()) {
                (pattern.handler)(&mut lex, &pattern.regex);
                matched = true;
                break;
            }
        }

        if !matched {
            if let Some(ch) = lex.at() {
                let position = lex.position();
                lex.error(
                    ErrorImpl::UnrecognisedToken {
                        token: ch.to_string(),
                    },
                    position,
                );
                lex.advance_n(ch.len_utf8());
            }
        }
    }

    let end = lex.position();
    lex.push(MK_TOKEN!(
        TokenKind::EOF,
        String::from("EOF"),
        Span::new(end.clone(), end)
    ));

    debug!("lexed {} tokens from {}", lex.tokens.len(), lex.file);

    if lex.errors.is_empty() {
        Ok(lex.tokens)
    } else {
        Err(lex.errors)
    }
}
