//! VM code emission for the Jack compiler.
//!
//! Writes canonical lowercase VM mnemonics into an owned line buffer, one
//! command per line.

use std::fmt;

/// The eight VM memory segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Constant,
    Argument,
    Local,
    Static,
    Pointer,
    This,
    That,
    Temp,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Segment::Constant => "constant",
            Segment::Argument => "argument",
            Segment::Local => "local",
            Segment::Static => "static",
            Segment::Pointer => "pointer",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Temp => "temp",
        };
        f.write_str(name)
    }
}

/// The nine arithmetic/logic commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::Add => "add",
            Command::Sub => "sub",
            Command::Neg => "neg",
            Command::Eq => "eq",
            Command::Gt => "gt",
            Command::Lt => "lt",
            Command::And => "and",
            Command::Or => "or",
            Command::Not => "not",
        };
        f.write_str(name)
    }
}

/// Emitter for one compilation unit's VM output.
#[derive(Debug, Default)]
pub struct VmWriter {
    output: Vec<String>,
}

impl VmWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_push(&mut self, segment: Segment, index: u16) {
        self.output.push(format!("push {segment} {index}"));
    }

    pub fn write_pop(&mut self, segment: Segment, index: u16) {
        self.output.push(format!("pop {segment} {index}"));
    }

    pub fn write_arithmetic(&mut self, command: Command) {
        self.output.push(command.to_string());
    }

    pub fn write_label(&mut self, label: &str) {
        self.output.push(format!("label {label}"));
    }

    pub fn write_goto(&mut self, label: &str) {
        self.output.push(format!("goto {label}"));
    }

    pub fn write_if(&mut self, label: &str) {
        self.output.push(format!("if-goto {label}"));
    }

    pub fn write_call(&mut self, name: &str, n_args: u16) {
        self.output.push(format!("call {name} {n_args}"));
    }

    pub fn write_function(&mut self, name: &str, n_locals: u16) {
        self.output.push(format!("function {name} {n_locals}"));
    }

    pub fn write_return(&mut self) {
        self.output.push("return".to_string());
    }

    /// The emitted VM commands, consuming the writer.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.output
    }
}
