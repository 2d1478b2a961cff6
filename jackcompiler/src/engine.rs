//! Recursive-descent compilation engine for Jack.
//!
//! Parsing and code generation are fused: each grammar rule advances the
//! token stream and writes VM commands as it goes, so there is no AST.
//! Expressions are strictly left-associative with no operator precedence:
//! `1 + 2 * 3` compiles as `(1 + 2) * 3`.

use crate::error::JackError;
use crate::symbol_table::{Entry, Kind, SymbolTable};
use crate::tokenizer::{Token, TokenKind, TokenStream};
use crate::vm_writer::{Command, Segment, VmWriter};

const OPS: &[char] = &['+', '-', '*', '/', '&', '|', '<', '>', '='];

pub struct CompilationEngine {
    tokens: TokenStream,
    table: SymbolTable,
    writer: VmWriter,
}

impl CompilationEngine {
    #[must_use]
    pub fn new(unit: &str, tokens: Vec<Token>) -> Self {
        CompilationEngine {
            tokens: TokenStream::new(unit, tokens),
            table: SymbolTable::new(unit),
            writer: VmWriter::new(),
        }
    }

    /// Compiles the single class of one `.jack` file into VM commands.
    pub fn compile(mut self) -> Result<Vec<String>, JackError> {
        self.compile_class()?;
        Ok(self.writer.into_lines())
    }

    fn compile_class(&mut self) -> Result<(), JackError> {
        self.tokens.expect_keyword("class")?;
        let name = self.tokens.expect_identifier()?;
        self.table.set_class_name(&name);
        self.tokens.expect_symbol('{')?;

        while self.tokens.at_keyword("static") || self.tokens.at_keyword("field") {
            self.compile_class_var_dec()?;
        }
        while self.tokens.at_keyword("constructor")
            || self.tokens.at_keyword("function")
            || self.tokens.at_keyword("method")
        {
            self.compile_subroutine()?;
        }

        self.tokens.expect_symbol('}')?;
        if self.tokens.peek().is_some() {
            return Err(self.tokens.syntax_error("end of input"));
        }
        Ok(())
    }

    fn compile_class_var_dec(&mut self) -> Result<(), JackError> {
        let kind = if self.tokens.at_keyword("static") {
            Kind::Static
        } else {
            Kind::Field
        };
        self.tokens.bump()?;

        let ty = self.expect_type()?;
        loop {
            let line = self.tokens.line();
            let name = self.tokens.expect_identifier()?;
            self.table.define(&name, &ty, kind, line)?;
            if !self.tokens.eat_symbol(',') {
                break;
            }
        }
        self.tokens.expect_symbol(';')
    }

    fn compile_subroutine(&mut self) -> Result<(), JackError> {
        let Some(Token {
            kind: TokenKind::Keyword(subroutine_kind),
            line,
        }) = self.tokens.peek().cloned()
        else {
            return Err(self.tokens.syntax_error("a subroutine declaration"));
        };
        self.tokens.bump()?;

        self.expect_return_type()?;
        let name = self.tokens.expect_identifier()?;
        let full_name = format!("{}.{name}", self.table.class_name());

        self.table.start_subroutine();
        if subroutine_kind == "method" {
            // `this` occupies argument 0 of every method.
            let class_name = self.table.class_name().to_string();
            self.table.define("this", &class_name, Kind::Arg, line)?;
        }

        self.tokens.expect_symbol('(')?;
        self.compile_parameter_list()?;
        self.tokens.expect_symbol(')')?;

        self.tokens.expect_symbol('{')?;
        while self.tokens.at_keyword("var") {
            self.compile_var_dec()?;
        }

        self.writer
            .write_function(&full_name, self.table.var_count(Kind::Var));
        match subroutine_kind {
            "method" => {
                self.writer.write_push(Segment::Argument, 0);
                self.writer.write_pop(Segment::Pointer, 0);
            }
            "constructor" => {
                self.writer
                    .write_push(Segment::Constant, self.table.var_count(Kind::Field));
                self.writer.write_call("Memory.alloc", 1);
                self.writer.write_pop(Segment::Pointer, 0);
            }
            _ => {}
        }

        self.compile_statements()?;
        self.tokens.expect_symbol('}')
    }

    fn compile_parameter_list(&mut self) -> Result<(), JackError> {
        if self.tokens.at_symbol(')') {
            return Ok(());
        }
        loop {
            let ty = self.expect_type()?;
            let line = self.tokens.line();
            let name = self.tokens.expect_identifier()?;
            self.table.define(&name, &ty, Kind::Arg, line)?;
            if !self.tokens.eat_symbol(',') {
                break;
            }
        }
        Ok(())
    }

    fn compile_var_dec(&mut self) -> Result<(), JackError> {
        self.tokens.expect_keyword("var")?;
        let ty = self.expect_type()?;
        loop {
            let line = self.tokens.line();
            let name = self.tokens.expect_identifier()?;
            self.table.define(&name, &ty, Kind::Var, line)?;
            if !self.tokens.eat_symbol(',') {
                break;
            }
        }
        self.tokens.expect_symbol(';')
    }

    fn compile_statements(&mut self) -> Result<(), JackError> {
        loop {
            if self.tokens.at_keyword("let") {
                self.compile_let()?;
            } else if self.tokens.at_keyword("if") {
                self.compile_if()?;
            } else if self.tokens.at_keyword("while") {
                self.compile_while()?;
            } else if self.tokens.at_keyword("do") {
                self.compile_do()?;
            } else if self.tokens.at_keyword("return") {
                self.compile_return()?;
            } else {
                return Ok(());
            }
        }
    }

    fn compile_let(&mut self) -> Result<(), JackError> {
        self.tokens.expect_keyword("let")?;
        let line = self.tokens.line();
        let name = self.tokens.expect_identifier()?;
        let entry = self.resolve_variable(&name, line)?;

        if self.tokens.eat_symbol('[') {
            // Destination address: base + index.
            self.writer.write_push(entry.kind.segment(), entry.index);
            self.compile_expression()?;
            self.tokens.expect_symbol(']')?;
            self.writer.write_arithmetic(Command::Add);

            self.tokens.expect_symbol('=')?;
            self.compile_expression()?;

            // The RHS may itself use `pointer 1` (nested array reads), so
            // park its value in temp 0 before latching the destination.
            self.writer.write_pop(Segment::Temp, 0);
            self.writer.write_pop(Segment::Pointer, 1);
            self.writer.write_push(Segment::Temp, 0);
            self.writer.write_pop(Segment::That, 0);
        } else {
            self.tokens.expect_symbol('=')?;
            self.compile_expression()?;
            self.writer.write_pop(entry.kind.segment(), entry.index);
        }

        self.tokens.expect_symbol(';')
    }

    fn compile_while(&mut self) -> Result<(), JackError> {
        self.tokens.expect_keyword("while")?;
        let k = self.table.next_while();

        self.writer.write_label(&format!("WHILE_EXP{k}"));
        self.tokens.expect_symbol('(')?;
        self.compile_expression()?;
        self.tokens.expect_symbol(')')?;

        self.writer.write_arithmetic(Command::Not);
        self.writer.write_if(&format!("WHILE_END{k}"));

        self.tokens.expect_symbol('{')?;
        self.compile_statements()?;
        self.tokens.expect_symbol('}')?;

        self.writer.write_goto(&format!("WHILE_EXP{k}"));
        self.writer.write_label(&format!("WHILE_END{k}"));
        Ok(())
    }

    fn compile_if(&mut self) -> Result<(), JackError> {
        self.tokens.expect_keyword("if")?;
        self.tokens.expect_symbol('(')?;
        self.compile_expression()?;
        self.tokens.expect_symbol(')')?;

        let k = self.table.next_if();
        self.writer.write_if(&format!("IF_TRUE{k}"));
        self.writer.write_goto(&format!("IF_FALSE{k}"));

        self.writer.write_label(&format!("IF_TRUE{k}"));
        self.tokens.expect_symbol('{')?;
        self.compile_statements()?;
        self.tokens.expect_symbol('}')?;

        if self.tokens.at_keyword("else") {
            self.tokens.bump()?;
            self.writer.write_goto(&format!("IF_END{k}"));
            self.writer.write_label(&format!("IF_FALSE{k}"));
            self.tokens.expect_symbol('{')?;
            self.compile_statements()?;
            self.tokens.expect_symbol('}')?;
            self.writer.write_label(&format!("IF_END{k}"));
        } else {
            self.writer.write_label(&format!("IF_FALSE{k}"));
        }
        Ok(())
    }

    fn compile_do(&mut self) -> Result<(), JackError> {
        self.tokens.expect_keyword("do")?;
        let name = self.tokens.expect_identifier()?;
        self.compile_subroutine_call(name)?;
        // Discard the called subroutine's result.
        self.writer.write_pop(Segment::Temp, 0);
        self.tokens.expect_symbol(';')
    }

    fn compile_return(&mut self) -> Result<(), JackError> {
        self.tokens.expect_keyword("return")?;
        if self.tokens.at_symbol(';') {
            // A void return still leaves a value for the caller to discard.
            self.writer.write_push(Segment::Constant, 0);
        } else {
            self.compile_expression()?;
        }
        self.writer.write_return();
        self.tokens.expect_symbol(';')
    }

    /// `expression: term (op term)*`, left-to-right, no precedence.
    fn compile_expression(&mut self) -> Result<(), JackError> {
        self.compile_term()?;

        while let Some(op) = self.peek_op() {
            self.tokens.bump()?;
            self.compile_term()?;
            match op {
                '+' => self.writer.write_arithmetic(Command::Add),
                '-' => self.writer.write_arithmetic(Command::Sub),
                '*' => self.writer.write_call("Math.multiply", 2),
                '/' => self.writer.write_call("Math.divide", 2),
                '&' => self.writer.write_arithmetic(Command::And),
                '|' => self.writer.write_arithmetic(Command::Or),
                '<' => self.writer.write_arithmetic(Command::Lt),
                '>' => self.writer.write_arithmetic(Command::Gt),
                '=' => self.writer.write_arithmetic(Command::Eq),
                _ => unreachable!("peek_op only yields operator symbols"),
            }
        }
        Ok(())
    }

    fn peek_op(&self) -> Option<char> {
        match self.tokens.peek() {
            Some(Token {
                kind: TokenKind::Symbol(c),
                ..
            }) if OPS.contains(c) => Some(*c),
            _ => None,
        }
    }

    fn compile_term(&mut self) -> Result<(), JackError> {
        let Some(token) = self.tokens.peek().cloned() else {
            return Err(self.tokens.syntax_error("a term"));
        };

        match token.kind {
            TokenKind::IntConst(value) => {
                self.tokens.bump()?;
                self.writer.write_push(Segment::Constant, value);
            }
            TokenKind::StringConst(text) => {
                self.tokens.bump()?;
                self.writer
                    .write_push(Segment::Constant, text.len() as u16);
                self.writer.write_call("String.new", 1);
                for byte in text.bytes() {
                    self.writer.write_push(Segment::Constant, u16::from(byte));
                    self.writer.write_call("String.appendChar", 2);
                }
            }
            TokenKind::Keyword("true") => {
                self.tokens.bump()?;
                self.writer.write_push(Segment::Constant, 0);
                self.writer.write_arithmetic(Command::Not);
            }
            TokenKind::Keyword("false") | TokenKind::Keyword("null") => {
                self.tokens.bump()?;
                self.writer.write_push(Segment::Constant, 0);
            }
            TokenKind::Keyword("this") => {
                self.tokens.bump()?;
                self.writer.write_push(Segment::Pointer, 0);
            }
            TokenKind::Identifier(name) => {
                let line = token.line;
                self.tokens.bump()?;

                if self.tokens.eat_symbol('[') {
                    let entry = self.resolve_variable(&name, line)?;
                    self.writer.write_push(entry.kind.segment(), entry.index);
                    self.compile_expression()?;
                    self.tokens.expect_symbol(']')?;
                    self.writer.write_arithmetic(Command::Add);
                    self.writer.write_pop(Segment::Pointer, 1);
                    self.writer.write_push(Segment::That, 0);
                } else if self.tokens.at_symbol('(') || self.tokens.at_symbol('.') {
                    self.compile_subroutine_call(name)?;
                } else {
                    let entry = self.resolve_variable(&name, line)?;
                    self.writer.write_push(entry.kind.segment(), entry.index);
                }
            }
            TokenKind::Symbol('(') => {
                self.tokens.bump()?;
                self.compile_expression()?;
                self.tokens.expect_symbol(')')?;
            }
            TokenKind::Symbol('-') => {
                self.tokens.bump()?;
                self.compile_term()?;
                self.writer.write_arithmetic(Command::Neg);
            }
            TokenKind::Symbol('~') => {
                self.tokens.bump()?;
                self.compile_term()?;
                self.writer.write_arithmetic(Command::Not);
            }
            _ => return Err(self.tokens.syntax_error("a term")),
        }
        Ok(())
    }

    /// Subroutine call dispatch, entered after the leading identifier.
    ///
    /// - `name(args)`: a method call on `this`.
    /// - `recv.name(args)` with `recv` bound: a method call on the object;
    ///   the receiver is pushed and the call targets its declared type.
    /// - `recv.name(args)` with `recv` unbound: `recv` is a class name and
    ///   the call is a plain function call.
    fn compile_subroutine_call(&mut self, name: String) -> Result<(), JackError> {
        let (full_name, receiver_args) = if self.tokens.eat_symbol('.') {
            let method = self.tokens.expect_identifier()?;
            match self.table.resolve(&name).cloned() {
                Some(entry) => {
                    self.writer.write_push(entry.kind.segment(), entry.index);
                    (format!("{}.{method}", entry.ty), 1)
                }
                None => (format!("{name}.{method}"), 0),
            }
        } else {
            self.writer.write_push(Segment::Pointer, 0);
            (format!("{}.{name}", self.table.class_name()), 1)
        };

        self.tokens.expect_symbol('(')?;
        let n_args = receiver_args + self.compile_expression_list()?;
        self.tokens.expect_symbol(')')?;
        self.writer.write_call(&full_name, n_args);
        Ok(())
    }

    /// Compiles `(expression (, expression)*)?`, returning the count.
    fn compile_expression_list(&mut self) -> Result<u16, JackError> {
        let mut count = 0;
        if self.tokens.at_symbol(')') {
            return Ok(0);
        }
        loop {
            self.compile_expression()?;
            count += 1;
            if !self.tokens.eat_symbol(',') {
                break;
            }
        }
        Ok(count)
    }

    /// `int | char | boolean | ClassName`.
    fn expect_type(&mut self) -> Result<String, JackError> {
        match self.tokens.peek() {
            Some(Token {
                kind: TokenKind::Keyword(k @ ("int" | "char" | "boolean")),
                ..
            }) => {
                let ty = (*k).to_string();
                self.tokens.bump()?;
                Ok(ty)
            }
            Some(Token {
                kind: TokenKind::Identifier(_),
                ..
            }) => self.tokens.expect_identifier(),
            _ => Err(self.tokens.syntax_error("a type")),
        }
    }

    /// A subroutine's return type also admits `void`. The value is only
    /// parsed, never used: return semantics are caller-side.
    fn expect_return_type(&mut self) -> Result<(), JackError> {
        if self.tokens.at_keyword("void") {
            self.tokens.bump()?;
            Ok(())
        } else {
            self.expect_type().map(|_| ())
        }
    }

    fn resolve_variable(&self, name: &str, line: usize) -> Result<Entry, JackError> {
        self.table
            .resolve(name)
            .cloned()
            .ok_or_else(|| JackError::Undeclared {
                unit: self.tokens.unit().to_string(),
                line,
                name: name.to_string(),
            })
    }
}
