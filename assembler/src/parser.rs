//! Parser module for Hack assembly language.
//!
//! Zero-copy line scanning: commands are classified and sliced without
//! allocating. The parser tracks the 1-based source line of the current
//! command so that every diagnostic can point back into the input file.

use crate::error::AsmError;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // Command suffix is intentional and clear
pub enum CommandType {
    /// @Xxx where Xxx is either a symbol or a decimal number
    ACommand,
    /// dest=comp;jump
    CCommand,
    /// (Xxx) where Xxx is a symbol
    LCommand,
}

/// Parser over the preprocessed lines of one `.asm` file.
///
/// `advance` skips comments and blank lines; the accessors slice fields out
/// of the current command. Reading a field with no current command is an
/// error, never a sentinel.
pub struct ParserLines<'a> {
    lines: std::iter::Enumerate<std::slice::Iter<'a, String>>,
    current_line: &'a str,
    current_number: usize,
    current_command_type: Option<CommandType>,
}

impl<'a> ParserLines<'a> {
    #[must_use]
    pub fn from_lines(lines: &'a [String]) -> Self {
        Self {
            lines: lines.iter().enumerate(),
            current_line: "",
            current_number: 0,
            current_command_type: None,
        }
    }

    /// Advances to the next command, skipping comments and whitespace.
    /// Returns `false` once the input is exhausted.
    pub fn advance(&mut self) -> bool {
        for (index, line) in self.lines.by_ref() {
            let trimmed = Self::strip_comment(line).trim();
            if !trimmed.is_empty() {
                self.current_line = trimmed;
                self.current_number = index + 1;
                self.current_command_type = Some(Self::classify_command(trimmed));
                return true;
            }
        }

        self.current_command_type = None;
        false
    }

    /// Strips a `//` comment, if any.
    fn strip_comment(line: &str) -> &str {
        match line.find("//") {
            Some(pos) => &line[..pos],
            None => line,
        }
    }

    /// Classifies command type based on the first character.
    fn classify_command(line: &str) -> CommandType {
        match line.as_bytes()[0] {
            b'@' => CommandType::ACommand,
            b'(' => CommandType::LCommand,
            _ => CommandType::CCommand,
        }
    }

    /// 1-based source line of the current command.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.current_number
    }

    pub fn command_type(&self) -> Result<CommandType, AsmError> {
        self.current_command_type.ok_or(AsmError::NoCurrentCommand)
    }

    /// Returns the symbol of an A-command (`@Xxx`) or L-command (`(Xxx)`).
    ///
    /// The symbol text is validated here: decimal literals pass through for
    /// the caller to range-check, anything else must be a legal Hack symbol.
    pub fn symbol(&self) -> Result<&'a str, AsmError> {
        let command_type = self.command_type()?;
        let symbol = match command_type {
            CommandType::ACommand => &self.current_line[1..],
            CommandType::LCommand => {
                let inner = self
                    .current_line
                    .strip_prefix('(')
                    .and_then(|s| s.strip_suffix(')'));
                match inner {
                    Some(inner) => inner,
                    None => return Err(self.malformed()),
                }
            }
            CommandType::CCommand => return Err(self.malformed()),
        };

        // Decimal literals are only legal in A-commands; labels must be symbolic.
        if command_type == CommandType::ACommand
            && !symbol.is_empty()
            && symbol.bytes().all(|b| b.is_ascii_digit())
        {
            return Ok(symbol);
        }
        if is_valid_symbol(symbol) {
            Ok(symbol)
        } else {
            Err(self.malformed())
        }
    }

    /// Returns the dest field of a C-command, `""` when absent.
    pub fn dest(&self) -> Result<&'a str, AsmError> {
        self.expect_c_command()?;
        Ok(match self.current_line.find('=') {
            Some(pos) => &self.current_line[..pos],
            None => "",
        })
    }

    /// Returns the comp field of a C-command.
    pub fn comp(&self) -> Result<&'a str, AsmError> {
        self.expect_c_command()?;
        let start = self.current_line.find('=').map_or(0, |pos| pos + 1);
        let end = self
            .current_line
            .find(';')
            .unwrap_or(self.current_line.len());
        Ok(&self.current_line[start..end])
    }

    /// Returns the jump field of a C-command, `""` when absent.
    pub fn jump(&self) -> Result<&'a str, AsmError> {
        self.expect_c_command()?;
        Ok(match self.current_line.find(';') {
            Some(pos) => &self.current_line[pos + 1..],
            None => "",
        })
    }

    fn expect_c_command(&self) -> Result<(), AsmError> {
        match self.command_type()? {
            CommandType::CCommand => Ok(()),
            _ => Err(self.malformed()),
        }
    }

    fn malformed(&self) -> AsmError {
        AsmError::MalformedCommand {
            line: self.current_number,
            text: self.current_line.to_string(),
        }
    }
}

/// A legal Hack symbol: letters, digits, `_`, `.`, `$`, `:`, not starting
/// with a digit.
#[must_use]
pub fn is_valid_symbol(symbol: &str) -> bool {
    let mut bytes = symbol.bytes();
    let Some(first) = bytes.next() else {
        return false;
    };
    if first.is_ascii_digit() || !is_symbol_byte(first) {
        return false;
    }
    bytes.all(is_symbol_byte)
}

fn is_symbol_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'$' | b':')
}
