//! Parser for the stack VM intermediate language.
//!
//! One command per line; `//` comments and blank lines are dropped up
//! front, and each surviving command remembers its original line number for
//! diagnostics.

use crate::error::VmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Arithmetic,
    Push,
    Pop,
    Label,
    Goto,
    If,
    Function,
    Return,
    Call,
}

/// Parser over the commands of one `.vm` file.
pub struct Parser {
    unit: String,
    commands: Vec<(usize, String)>,
    cursor: usize,
    /// Whitespace-split words of the current command.
    current: Vec<String>,
    current_line: usize,
}

impl Parser {
    /// Builds a parser from raw source text. `unit` is the file stem, used
    /// in error messages.
    #[must_use]
    pub fn new(unit: &str, source: &str) -> Self {
        let mut commands = Vec::new();
        for (index, line) in source.lines().enumerate() {
            let line = match line.find("//") {
                Some(pos) => &line[..pos],
                None => line,
            };
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                commands.push((index + 1, trimmed.to_string()));
            }
        }

        Parser {
            unit: unit.to_string(),
            commands,
            cursor: 0,
            current: Vec::new(),
            current_line: 0,
        }
    }

    #[must_use]
    pub fn has_more_commands(&self) -> bool {
        self.cursor < self.commands.len()
    }

    /// Moves to the next command. Returns `false` when exhausted.
    pub fn advance(&mut self) -> bool {
        let Some((line, text)) = self.commands.get(self.cursor) else {
            self.current.clear();
            return false;
        };

        self.current_line = *line;
        self.current.clear();
        self.current
            .extend(text.split_whitespace().map(str::to_string));
        self.cursor += 1;
        true
    }

    /// 1-based source line of the current command.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.current_line
    }

    /// The current command's raw text, reassembled from its words.
    #[must_use]
    pub fn command_text(&self) -> String {
        self.current.join(" ")
    }

    pub fn command_type(&self) -> Result<CommandType, VmError> {
        let opcode = self.word(0)?;
        match opcode {
            "push" => Ok(CommandType::Push),
            "pop" => Ok(CommandType::Pop),
            "label" => Ok(CommandType::Label),
            "goto" => Ok(CommandType::Goto),
            "if-goto" => Ok(CommandType::If),
            "function" => Ok(CommandType::Function),
            "return" => Ok(CommandType::Return),
            "call" => Ok(CommandType::Call),
            "add" | "sub" | "neg" | "eq" | "gt" | "lt" | "and" | "or" | "not" => {
                Ok(CommandType::Arithmetic)
            }
            _ => Err(VmError::UnknownCommand {
                unit: self.unit.clone(),
                line: self.current_line,
                text: opcode.to_string(),
            }),
        }
    }

    /// First argument: the operator itself for arithmetic commands, the
    /// segment / label / function name otherwise. Not legal for `return`.
    pub fn arg1(&self) -> Result<&str, VmError> {
        match self.command_type()? {
            CommandType::Arithmetic => self.word(0),
            CommandType::Return => Err(self.missing_argument()),
            _ => self.word(1),
        }
    }

    /// Second argument: the index for push/pop, the local/argument count
    /// for function/call.
    pub fn arg2(&self) -> Result<u16, VmError> {
        match self.command_type()? {
            CommandType::Push | CommandType::Pop | CommandType::Function | CommandType::Call => {
                let text = self.word(2)?;
                text.parse::<u16>().map_err(|_| VmError::InvalidIndex {
                    unit: self.unit.clone(),
                    line: self.current_line,
                    text: text.to_string(),
                })
            }
            _ => Err(self.missing_argument()),
        }
    }

    fn word(&self, index: usize) -> Result<&str, VmError> {
        if self.current.is_empty() {
            return Err(VmError::NoCurrentCommand);
        }
        self.current
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| self.missing_argument())
    }

    fn missing_argument(&self) -> VmError {
        VmError::MissingArgument {
            unit: self.unit.clone(),
            line: self.current_line,
            command: self.command_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_all_command_types() {
        let source = "push constant 1\n\
                      pop local 0\n\
                      add\n\
                      label TOP\n\
                      goto TOP\n\
                      if-goto TOP\n\
                      function f 2\n\
                      call f 0\n\
                      return\n";
        let mut parser = Parser::new("Test", source);
        let expected = [
            CommandType::Push,
            CommandType::Pop,
            CommandType::Arithmetic,
            CommandType::Label,
            CommandType::Goto,
            CommandType::If,
            CommandType::Function,
            CommandType::Call,
            CommandType::Return,
        ];

        for want in expected {
            assert!(parser.advance());
            assert_eq!(parser.command_type().unwrap(), want);
        }
        assert!(!parser.advance());
    }

    #[test]
    fn strips_comments_and_blanks() {
        let source = "// header\n\n   push constant 7 // inline\n\nadd\n";
        let mut parser = Parser::new("Test", source);

        assert!(parser.advance());
        assert_eq!(parser.line_number(), 3);
        assert_eq!(parser.command_text(), "push constant 7");

        assert!(parser.advance());
        assert_eq!(parser.line_number(), 5);
        assert_eq!(parser.arg1().unwrap(), "add");
    }

    #[test]
    fn extracts_arguments() {
        let mut parser = Parser::new("Test", "push argument 3\nfunction Main.run 2\n");

        parser.advance();
        assert_eq!(parser.arg1().unwrap(), "argument");
        assert_eq!(parser.arg2().unwrap(), 3);

        parser.advance();
        assert_eq!(parser.arg1().unwrap(), "Main.run");
        assert_eq!(parser.arg2().unwrap(), 2);
    }

    #[test]
    fn unknown_opcode_is_fatal() {
        let mut parser = Parser::new("Test", "frobnicate local 0\n");
        parser.advance();
        assert!(matches!(
            parser.command_type(),
            Err(VmError::UnknownCommand { line: 1, .. })
        ));
    }

    #[test]
    fn missing_and_invalid_arguments() {
        let mut parser = Parser::new("Test", "push constant\npush constant x\nreturn\n");

        parser.advance();
        assert!(matches!(
            parser.arg2(),
            Err(VmError::MissingArgument { line: 1, .. })
        ));

        parser.advance();
        assert!(matches!(
            parser.arg2(),
            Err(VmError::InvalidIndex { line: 2, .. })
        ));

        parser.advance();
        assert!(parser.arg1().is_err());
    }

    #[test]
    fn exhausted_parser_errors() {
        let mut parser = Parser::new("Test", "add\n");
        parser.advance();
        assert!(!parser.advance());
        assert!(matches!(
            parser.command_type(),
            Err(VmError::NoCurrentCommand)
        ));
    }
}
