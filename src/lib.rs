#![allow(clippy::module_inception)]

use std::rc::Rc;

use colored::Colorize;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// A location in a source file.
///
/// `line` and `column` are 1-based, `column` counts characters. The full
/// source text travels with every position so diagnostics can be rendered
/// without going back to the file system.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub file: Rc<String>,
    pub source: Rc<String>,
}

impl Position {
    pub fn new(line: u32, column: u32, file: Rc<String>, source: Rc<String>) -> Self {
        Position {
            line,
            column,
            file,
            source,
        }
    }

    pub fn null() -> Self {
        Position {
            line: 0,
            column: 0,
            file: Rc::new(String::from("<null>")),
            source: Rc::new(String::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// Span running from the start of `self` to the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start.clone(),
            end: other.end.clone(),
        }
    }
}

/// Returns `(line number, line text, 0-based column)` for a position.
pub fn get_line_at_position(position: &Position) -> (usize, String, usize) {
    let line_number = position.line.max(1) as usize;
    let line = position
        .source
        .lines()
        .nth(line_number - 1)
        .unwrap_or("")
        .to_string();

    (line_number, line, position.column.saturating_sub(1) as usize)
}


pub fn display_error(error: &Error) {
    /*
        error[semantic]: message
         --> main.pop:20:9
           |
        20 | let a = #;
           | --------^ tip
    */

    let position = error.get_position();
    let (line, line_text, line_pos) = get_line_at_position(position);

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    eprintln!(
        "{}{} {}",
        format!("error[{}]", error.get_kind()).red().bold(),
        ":".bold(),
        error.message().bold()
    );
    eprintln!(
        "{:>width$} {}:{}:{}",
        "-->".blue(),
        position.file,
        position.line,
        position.column,
        width = padding + 1
    );
    eprintln!("{:>padding$}", "|".blue());

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    eprintln!("{} {} {}", line_string.blue(), "|".blue(), line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    if let ErrorTip::Suggestion(tip) = error.get_tip() {
        eprintln!(
            "{:>padding$} {} {}",
            "|".blue(),
            format!("{:->arrows$}", "^").red(),
            tip.red()
        );
    } else {
        eprintln!("{:>padding$} {}", "|".blue(), format!("{:->arrows$}", "^").red());
    }
    eprintln!();
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (string.chars().skip(start).collect(), start)
}
