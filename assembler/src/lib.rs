//! Hack assembler: symbolic assembly to 16-bit binary machine code.
//!
//! The assembler is a classic two-pass translator:
//! - **Pass 1** walks the commands, binding each `(LABEL)` to the address of
//!   the next real instruction.
//! - **Pass 2** emits one 16-character binary string per A- or C-command,
//!   interning unseen symbolic A-operands as variables from RAM 16 upward.
//!
//! # Architecture
//!
//! - [`parser`]: zero-copy command scanning with source-line tracking
//! - [`code`]: compile-time perfect-hash encoding tables
//! - [`symbol_table`]: predefined symbols plus label/variable bindings
//! - [`error`]: fatal, line-annotated error type
//!
//! # Example
//!
//! ```rust
//! use assembler::assemble;
//!
//! let lines = vec![
//!     "@2".to_string(),
//!     "D=A".to_string(),
//! ];
//! let binary = assemble(&lines).unwrap();
//! assert_eq!(binary[0], "0000000000000010");
//! assert_eq!(binary[1], "1110110000010000");
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

pub mod code;
pub mod error;
pub mod parser;
pub mod symbol_table;

pub use error::AsmError;
pub use parser::{CommandType, ParserLines};
pub use symbol_table::SymbolTable;

/// Highest address expressible in an A-command (15 bits).
pub const MAX_ADDRESS: u16 = 32767;

/// Assembles the lines of one `.asm` file into binary instruction strings.
///
/// The first error aborts the translation; nothing is emitted for a file
/// that does not assemble completely.
pub fn assemble(lines: &[String]) -> Result<Vec<String>, AsmError> {
    let mut symbol_table = SymbolTable::new();
    first_pass(lines, &mut symbol_table)?;
    second_pass(lines, &mut symbol_table)
}

/// Pass 1: record the instruction address of every label.
///
/// Label definitions generate no code, so they do not advance the address
/// counter; every A- or C-command does.
fn first_pass(lines: &[String], symbol_table: &mut SymbolTable) -> Result<(), AsmError> {
    let mut rom_address = 0u16;
    let mut parser = ParserLines::from_lines(lines);

    while parser.advance() {
        match parser.command_type()? {
            CommandType::LCommand => {
                let symbol = parser.symbol()?;
                symbol_table.define_label(symbol, rom_address, parser.line_number())?;
            }
            CommandType::ACommand | CommandType::CCommand => {
                rom_address += 1;
            }
        }
    }

    Ok(())
}

/// Pass 2: translate each instruction to binary, resolving symbols.
fn second_pass(lines: &[String], symbol_table: &mut SymbolTable) -> Result<Vec<String>, AsmError> {
    let mut output = Vec::new();
    let mut ram_address = 16u16; // Variables start at RAM[16]
    let mut parser = ParserLines::from_lines(lines);

    while parser.advance() {
        match parser.command_type()? {
            CommandType::ACommand => {
                let symbol = parser.symbol()?;
                let address = resolve_a_operand(
                    symbol,
                    symbol_table,
                    &mut ram_address,
                    parser.line_number(),
                )?;
                output.push(code::encode_a_instruction(address));
            }
            CommandType::CCommand => {
                let instruction = code::encode_c_instruction(
                    parser.dest()?,
                    parser.comp()?,
                    parser.jump()?,
                    parser.line_number(),
                )?;
                output.push(instruction);
            }
            CommandType::LCommand => {} // Bound in pass 1; emits nothing
        }
    }

    Ok(output)
}

/// Resolves an A-command operand to a 15-bit address.
///
/// Decimal literals are range-checked; symbols are looked up, and unseen
/// symbols become fresh variables.
fn resolve_a_operand(
    symbol: &str,
    symbol_table: &mut SymbolTable,
    ram_address: &mut u16,
    line: usize,
) -> Result<u16, AsmError> {
    if symbol.bytes().all(|b| b.is_ascii_digit()) {
        return match symbol.parse::<u16>() {
            Ok(value) if value <= MAX_ADDRESS => Ok(value),
            _ => Err(AsmError::AddressOutOfRange {
                line,
                value: symbol.to_string(),
            }),
        };
    }

    Ok(symbol_table.get_or_insert(symbol, ram_address))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &[&str]) -> Vec<String> {
        src.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn assembles_straight_line_program() {
        let source = lines(&["@2", "D=A", "@3", "D=D+A", "@0", "M=D"]);
        let binary = assemble(&source).unwrap();

        assert_eq!(
            binary,
            vec![
                "0000000000000010",
                "1110110000010000",
                "0000000000000011",
                "1110000010010000",
                "0000000000000000",
                "1110001100001000",
            ]
        );
    }

    #[test]
    fn resolves_labels_and_variables() {
        let source = lines(&[
            "@i",      // variable -> 16
            "M=1",     //
            "(LOOP)",  // label -> 2
            "@i",      //
            "M=M+1",   //
            "@LOOP",   //
            "0;JMP",   //
        ]);
        let binary = assemble(&source).unwrap();

        assert_eq!(binary.len(), 6);
        assert_eq!(binary[0], code::encode_a_instruction(16));
        assert_eq!(binary[2], code::encode_a_instruction(16));
        assert_eq!(binary[4], code::encode_a_instruction(2));
    }

    #[test]
    fn literal_range_is_enforced() {
        let ok = lines(&["@32767"]);
        assert!(assemble(&ok).is_ok());

        let too_big = lines(&["@32768"]);
        assert!(matches!(
            assemble(&too_big),
            Err(AsmError::AddressOutOfRange { line: 1, .. })
        ));
    }

    #[test]
    fn duplicate_labels_are_fatal() {
        let source = lines(&["(END)", "@0", "(END)", "@1"]);
        assert!(matches!(
            assemble(&source),
            Err(AsmError::DuplicateLabel { line: 3, .. })
        ));
    }

    #[test]
    fn unknown_comp_is_fatal() {
        let source = lines(&["D=D+2"]);
        assert!(matches!(
            assemble(&source),
            Err(AsmError::UnknownComp { line: 1, .. })
        ));
    }
}
