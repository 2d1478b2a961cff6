//! Error types for the VM translator.
//!
//! Source-located variants carry the unit (source file stem) and 1-based
//! line number; they render as `<unit>.vm:<line>: message`.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Fatal translation errors. Any error aborts the whole invocation; in
/// directory mode no output file is written at all.
#[derive(Debug)]
pub enum VmError {
    Io(io::Error),
    /// First word of a command is not a VM opcode.
    UnknownCommand {
        unit: String,
        line: usize,
        text: String,
    },
    /// Segment name not one of the eight memory segments.
    UnknownSegment {
        unit: String,
        line: usize,
        segment: String,
    },
    /// Command is missing a required argument.
    MissingArgument {
        unit: String,
        line: usize,
        command: String,
    },
    /// Numeric argument failed to parse as an unsigned 15-bit value.
    InvalidIndex {
        unit: String,
        line: usize,
        text: String,
    },
    /// Index outside the segment's legal range (`temp` 0..=7, `pointer`
    /// 0..=1, `constant` 0..=32767).
    IndexOutOfRange {
        unit: String,
        line: usize,
        segment: String,
        index: u16,
    },
    /// `pop constant`: the constant segment is push-only.
    PopConstant { unit: String, line: usize },
    /// A field accessor was called with no current command.
    NoCurrentCommand,
    /// Directory input contained no `.vm` files.
    NoVmFiles(PathBuf),
    /// Input path is neither a `.vm` file nor a directory.
    UnsupportedInput(PathBuf),
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::UnknownCommand { unit, line, text } => {
                write!(f, "{unit}.vm:{line}: unknown command `{text}`")
            }
            Self::UnknownSegment {
                unit,
                line,
                segment,
            } => write!(f, "{unit}.vm:{line}: unknown segment `{segment}`"),
            Self::MissingArgument {
                unit,
                line,
                command,
            } => write!(f, "{unit}.vm:{line}: missing argument for `{command}`"),
            Self::InvalidIndex { unit, line, text } => {
                write!(f, "{unit}.vm:{line}: invalid index `{text}`")
            }
            Self::IndexOutOfRange {
                unit,
                line,
                segment,
                index,
            } => write!(
                f,
                "{unit}.vm:{line}: index {index} out of range for segment `{segment}`"
            ),
            Self::PopConstant { unit, line } => {
                write!(f, "{unit}.vm:{line}: cannot pop to the constant segment")
            }
            Self::NoCurrentCommand => write!(f, "no current command"),
            Self::NoVmFiles(dir) => {
                write!(f, "no .vm files found in {}", dir.display())
            }
            Self::UnsupportedInput(path) => {
                write!(f, "{} is not a .vm file or directory", path.display())
            }
        }
    }
}

impl std::error::Error for VmError {}

impl From<io::Error> for VmError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_unit_and_line() {
        let err = VmError::UnknownSegment {
            unit: "Main".to_string(),
            line: 4,
            segment: "stack".to_string(),
        };
        assert_eq!(err.to_string(), "Main.vm:4: unknown segment `stack`");
    }
}
