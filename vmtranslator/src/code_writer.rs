//! Lowers VM commands to Hack assembly.
//!
//! Each `write_*` method appends the assembly template for one VM command
//! to the output buffer. The writer owns the two monotonic counters that
//! keep generated labels unique (comparison labels and call return labels)
//! and tracks the current function for flow-label mangling.

use crate::error::VmError;

/// Appends one or more assembly lines to the writer's output.
macro_rules! asm {
    ($writer:expr, $($line:expr),+ $(,)?) => {
        $( $writer.emit($line); )+
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Local,
    Argument,
    This,
    That,
    Temp,
    Pointer,
    Static,
    Constant,
}

impl Segment {
    fn from_str(segment: &str) -> Option<Self> {
        match segment {
            "local" => Some(Segment::Local),
            "argument" => Some(Segment::Argument),
            "this" => Some(Segment::This),
            "that" => Some(Segment::That),
            "temp" => Some(Segment::Temp),
            "pointer" => Some(Segment::Pointer),
            "static" => Some(Segment::Static),
            "constant" => Some(Segment::Constant),
            _ => None,
        }
    }

    /// Register holding the segment base, for the four indirect segments.
    fn base_symbol(self) -> &'static str {
        match self {
            Segment::Local => "LCL",
            Segment::Argument => "ARG",
            Segment::This => "THIS",
            Segment::That => "THAT",
            _ => unreachable!("segment has no base register"),
        }
    }

    /// Highest legal index, where the segment constrains it.
    fn max_index(self) -> u16 {
        match self {
            Segment::Temp => 7,
            Segment::Pointer => 1,
            _ => 32767,
        }
    }
}

/// Assembly emitter for one translation (one file or one directory).
pub struct CodeWriter {
    output: Vec<String>,
    unit: String,
    current_function: Option<String>,
    /// Counter for comparison labels (`CMP_<n>`).
    label_index: usize,
    /// Counter for call return labels (`<f>$ret.<n>`).
    return_index: usize,
}

impl CodeWriter {
    #[must_use]
    pub fn new(unit: &str) -> Self {
        CodeWriter {
            output: Vec::new(),
            unit: unit.to_string(),
            current_function: None,
            label_index: 0,
            return_index: 0,
        }
    }

    /// Switches to a new source unit (directory mode). Static variables of
    /// the following commands are namespaced under the new stem; the label
    /// counters keep running so generated labels stay globally unique.
    pub fn set_unit(&mut self, unit: &str) {
        self.unit.clear();
        self.unit.push_str(unit);
    }

    fn emit(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    /// Emits an informational `// ...` comment line.
    pub fn comment(&mut self, text: &str) {
        self.emit(format!("// {text}"));
    }

    /// Scope for `label`/`goto`/`if-goto`: the enclosing function, or the
    /// file stem before the first `function` command.
    fn scope(&self) -> &str {
        self.current_function.as_deref().unwrap_or(&self.unit)
    }

    /// The emitted assembly, consuming the writer.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.output
    }

    /// Bootstrap preamble for directory mode: SP=256, then a synthetic
    /// `call Sys.init 0`.
    pub fn write_bootstrap(&mut self) {
        asm!(self, "@256", "D=A", "@SP", "M=D");
        self.write_call("Sys.init", 0);
    }

    pub fn write_arithmetic(&mut self, command: &str) {
        match command {
            "add" => self.write_binary_op("M=D+M"),
            "sub" => self.write_binary_op("M=M-D"),
            "and" => self.write_binary_op("M=D&M"),
            "or" => self.write_binary_op("M=D|M"),
            "neg" => self.write_unary_op("M=-M"),
            "not" => self.write_unary_op("M=!M"),
            "eq" => self.write_comparison("JEQ"),
            "gt" => self.write_comparison("JGT"),
            "lt" => self.write_comparison("JLT"),
            _ => unreachable!("parser only classifies the nine operators as arithmetic"),
        }
    }

    /// Pops y into D, then applies `operation` in place on x at SP-1.
    fn write_binary_op(&mut self, operation: &str) {
        asm!(self, "@SP", "AM=M-1", "D=M", "A=A-1", operation);
    }

    /// Rewrites the top of stack in place.
    fn write_unary_op(&mut self, operation: &str) {
        asm!(self, "@SP", "A=M-1", operation);
    }

    /// Comparison: D = x - y, default the result slot to false (0), and
    /// branch to a fresh `CMP_<n>` label on the matched condition to
    /// rewrite it to true (-1).
    fn write_comparison(&mut self, jump: &str) {
        let n = self.label_index;
        self.label_index += 1;

        asm!(
            self,
            "@SP",
            "AM=M-1",
            "D=M",
            "A=A-1",
            "D=M-D",
            "M=0",
            format!("@CMP_{n}"),
            format!("D;{jump}"),
            format!("@CMP_END_{n}"),
            "0;JMP",
            format!("(CMP_{n})"),
            "@SP",
            "A=M-1",
            "M=-1",
            format!("(CMP_END_{n})"),
        );
    }

    pub fn write_push(&mut self, segment: &str, index: u16, line: usize) -> Result<(), VmError> {
        let seg = self.parse_segment(segment, index, line)?;

        match seg {
            Segment::Constant => {
                asm!(self, format!("@{index}"), "D=A");
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                asm!(
                    self,
                    format!("@{index}"),
                    "D=A",
                    format!("@{}", seg.base_symbol()),
                    "A=D+M",
                    "D=M",
                );
            }
            Segment::Temp => {
                asm!(self, format!("@{index}"), "D=A", "@5", "A=D+A", "D=M");
            }
            Segment::Pointer => {
                let alias = if index == 0 { "THIS" } else { "THAT" };
                asm!(self, format!("@{alias}"), "D=M");
            }
            Segment::Static => {
                asm!(self, format!("@{}.{index}", self.unit), "D=M");
            }
        }

        self.write_push_d();
        Ok(())
    }

    pub fn write_pop(&mut self, segment: &str, index: u16, line: usize) -> Result<(), VmError> {
        let seg = self.parse_segment(segment, index, line)?;

        match seg {
            Segment::Constant => {
                return Err(VmError::PopConstant {
                    unit: self.unit.clone(),
                    line,
                });
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                asm!(
                    self,
                    format!("@{index}"),
                    "D=A",
                    format!("@{}", seg.base_symbol()),
                    "D=D+M",
                    "@R13",
                    "M=D",
                );
                self.write_pop_d();
                asm!(self, "@R13", "A=M", "M=D");
            }
            Segment::Temp => {
                asm!(self, format!("@{index}"), "D=A", "@5", "D=D+A", "@R13", "M=D");
                self.write_pop_d();
                asm!(self, "@R13", "A=M", "M=D");
            }
            Segment::Pointer => {
                let alias = if index == 0 { "THIS" } else { "THAT" };
                self.write_pop_d();
                asm!(self, format!("@{alias}"), "M=D");
            }
            Segment::Static => {
                let symbol = format!("@{}.{index}", self.unit);
                self.write_pop_d();
                asm!(self, symbol, "M=D");
            }
        }

        Ok(())
    }

    pub fn write_label(&mut self, label: &str) {
        self.emit(format!("({}${label})", self.scope()));
    }

    pub fn write_goto(&mut self, label: &str) {
        asm!(self, format!("@{}${label}", self.scope()), "0;JMP");
    }

    /// Pops the top of stack and jumps when it is non-zero.
    pub fn write_if(&mut self, label: &str) {
        self.write_pop_d();
        asm!(self, format!("@{}${label}", self.scope()), "D;JNE");
    }

    /// `function f k`: define the entry label and push k zeroed locals.
    pub fn write_function(&mut self, name: &str, num_locals: u16) {
        self.emit(format!("({name})"));
        self.current_function = Some(name.to_string());
        for _ in 0..num_locals {
            asm!(self, "@SP", "A=M", "M=0", "@SP", "M=M+1");
        }
    }

    /// `call f n`: push the return address and the caller's LCL/ARG/THIS/
    /// THAT, reposition ARG and LCL, jump to f, and define the return label.
    pub fn write_call(&mut self, name: &str, num_args: u16) {
        let ret = format!("{name}$ret.{}", self.return_index);
        self.return_index += 1;

        asm!(self, format!("@{ret}"), "D=A");
        self.write_push_d();
        for saved in ["LCL", "ARG", "THIS", "THAT"] {
            asm!(self, format!("@{saved}"), "D=M");
            self.write_push_d();
        }
        asm!(
            self,
            format!("@{}", u32::from(num_args) + 5),
            "D=A",
            "@SP",
            "D=M-D",
            "@ARG",
            "M=D", // ARG = SP - n - 5
            "@SP",
            "D=M",
            "@LCL",
            "M=D", // LCL = SP
            format!("@{name}"),
            "0;JMP",
            format!("({ret})"),
        );
    }

    /// `return`: restore the caller's frame and jump to the saved return
    /// address.
    ///
    /// The return address is read out of the frame *before* the return
    /// value overwrites `*ARG`; for a zero-argument callee they can be the
    /// same cell.
    pub fn write_return(&mut self) {
        asm!(
            self,
            "@LCL",
            "D=M",
            "@R13",
            "M=D", // FRAME = LCL
            "@5",
            "D=A",
            "@R13",
            "A=M-D",
            "D=M",
            "@R14",
            "M=D", // RET = *(FRAME - 5)
            "@SP",
            "AM=M-1",
            "D=M",
            "@ARG",
            "A=M",
            "M=D", // *ARG = pop()
            "@ARG",
            "D=M+1",
            "@SP",
            "M=D", // SP = ARG + 1
            "@R13",
            "A=M-1",
            "D=M",
            "@THAT",
            "M=D", // THAT = *(FRAME - 1)
        );
        for (offset, register) in [(2u16, "THIS"), (3, "ARG"), (4, "LCL")] {
            asm!(
                self,
                format!("@{offset}"),
                "D=A",
                "@R13",
                "A=M-D",
                "D=M",
                format!("@{register}"),
                "M=D",
            );
        }
        asm!(self, "@R14", "A=M", "0;JMP");
    }

    fn write_push_d(&mut self) {
        asm!(self, "@SP", "A=M", "M=D", "@SP", "M=M+1");
    }

    fn write_pop_d(&mut self) {
        asm!(self, "@SP", "AM=M-1", "D=M");
    }

    fn parse_segment(&self, segment: &str, index: u16, line: usize) -> Result<Segment, VmError> {
        let seg = Segment::from_str(segment).ok_or_else(|| VmError::UnknownSegment {
            unit: self.unit.clone(),
            line,
            segment: segment.to_string(),
        })?;

        if index > seg.max_index() {
            return Err(VmError::IndexOutOfRange {
                unit: self.unit.clone(),
                line,
                segment: segment.to_string(),
                index,
            });
        }

        Ok(seg)
    }
}
