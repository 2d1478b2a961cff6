//! Error types for the Hack assembler.
//!
//! Every error that originates in source text carries the 1-based line
//! number of the offending command; the binary prefixes the input path when
//! reporting, yielding `<file>: <error>`.

use std::fmt;
use std::io;

/// Fatal assembly errors. There is no recovery: the first error aborts the
/// whole translation.
#[derive(Debug)]
pub enum AsmError {
    /// Input could not be read or output could not be written.
    Io(io::Error),
    /// A field accessor was called with no current command (exhausted
    /// stream or `advance` never called).
    NoCurrentCommand,
    /// `dest=` mnemonic not in the dest table.
    UnknownDest { line: usize, mnemonic: String },
    /// `comp` mnemonic not in the comp table.
    UnknownComp { line: usize, mnemonic: String },
    /// `;jump` mnemonic not in the jump table.
    UnknownJump { line: usize, mnemonic: String },
    /// A-command decimal literal outside 0..=32767.
    AddressOutOfRange { line: usize, value: String },
    /// `(LABEL)` bound more than once.
    DuplicateLabel { line: usize, label: String },
    /// A command that fits no legal shape (empty symbol, unclosed label,
    /// illegal character in a symbol).
    MalformedCommand { line: usize, text: String },
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::NoCurrentCommand => write!(f, "no current command"),
            Self::UnknownDest { line, mnemonic } => {
                write!(f, "line {line}: unknown dest mnemonic `{mnemonic}`")
            }
            Self::UnknownComp { line, mnemonic } => {
                write!(f, "line {line}: unknown comp mnemonic `{mnemonic}`")
            }
            Self::UnknownJump { line, mnemonic } => {
                write!(f, "line {line}: unknown jump mnemonic `{mnemonic}`")
            }
            Self::AddressOutOfRange { line, value } => {
                write!(f, "line {line}: address `{value}` outside 0..=32767")
            }
            Self::DuplicateLabel { line, label } => {
                write!(f, "line {line}: duplicate label `{label}`")
            }
            Self::MalformedCommand { line, text } => {
                write!(f, "line {line}: malformed command `{text}`")
            }
        }
    }
}

impl std::error::Error for AsmError {}

impl From<io::Error> for AsmError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_line_number() {
        let err = AsmError::UnknownComp {
            line: 12,
            mnemonic: "D+2".to_string(),
        };
        assert_eq!(err.to_string(), "line 12: unknown comp mnemonic `D+2`");
    }

    #[test]
    fn io_error_converts() {
        let io = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err = AsmError::from(io);
        assert!(matches!(err, AsmError::Io(_)));
    }
}
