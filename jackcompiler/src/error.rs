//! Error types for the Jack compiler.
//!
//! Source-located variants carry the unit (source file stem) and 1-based
//! line number; they render as `<unit>.jack:<line>: message`.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Fatal compilation errors. The first error in any file aborts the whole
/// invocation; no `.vm` output is written.
#[derive(Debug)]
pub enum JackError {
    Io(io::Error),
    /// Illegal character, unterminated string or block comment.
    Lex {
        unit: String,
        line: usize,
        message: String,
    },
    /// Token mismatch against the grammar.
    Syntax {
        unit: String,
        line: usize,
        expected: String,
        found: String,
    },
    /// Identifier used as a variable without a declaration in scope.
    Undeclared {
        unit: String,
        line: usize,
        name: String,
    },
    /// Name declared twice in the same scope.
    Redeclared {
        unit: String,
        line: usize,
        name: String,
    },
    /// Integer constant outside 0..=32767.
    IntOutOfRange {
        unit: String,
        line: usize,
        value: String,
    },
    /// Token stream ran out mid-rule.
    UnexpectedEof { unit: String },
    /// Directory input contained no `.jack` files.
    NoJackFiles(PathBuf),
    /// Input path is not a directory.
    NotADirectory(PathBuf),
}

impl fmt::Display for JackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Lex {
                unit,
                line,
                message,
            } => write!(f, "{unit}.jack:{line}: {message}"),
            Self::Syntax {
                unit,
                line,
                expected,
                found,
            } => write!(f, "{unit}.jack:{line}: expected {expected}, found {found}"),
            Self::Undeclared { unit, line, name } => {
                write!(f, "{unit}.jack:{line}: undeclared identifier `{name}`")
            }
            Self::Redeclared { unit, line, name } => {
                write!(f, "{unit}.jack:{line}: `{name}` is already declared in this scope")
            }
            Self::IntOutOfRange { unit, line, value } => {
                write!(f, "{unit}.jack:{line}: integer constant `{value}` outside 0..=32767")
            }
            Self::UnexpectedEof { unit } => {
                write!(f, "{unit}.jack: unexpected end of input")
            }
            Self::NoJackFiles(dir) => {
                write!(f, "no .jack files found in {}", dir.display())
            }
            Self::NotADirectory(path) => {
                write!(f, "{} is not a directory", path.display())
            }
        }
    }
}

impl std::error::Error for JackError {}

impl From<io::Error> for JackError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}
