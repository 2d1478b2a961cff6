//! Binary encoding tables for Hack assembly mnemonics.
//!
//! All three mnemonic tables are perfect-hash maps built at compile time
//! (`phf`), so encoding a command is a pair of O(1) lookups plus a format.
//! Unlike a permissive encoder, a mnemonic that is not in its table is a
//! fatal error: there is no legal Hack program it could have meant.

use crate::error::AsmError;
use phf::phf_map;

/// Destination mnemonic to binary code mapping (3 bits, d1 d2 d3 = A D M).
///
/// Empty string represents the null destination.
static DEST_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "" => "000",
    "M" => "001",
    "D" => "010",
    "MD" => "011",
    "A" => "100",
    "AM" => "101",
    "AD" => "110",
    "AMD" => "111",
};

/// Computation mnemonic to binary code mapping (7 bits: 1 bit 'a' + 6 bits
/// 'cccccc'). The a-bit selects between the A register (a=0) and M (a=1).
static COMP_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    // a=0 (A register operations)
    "0" => "0101010",
    "1" => "0111111",
    "-1" => "0111010",
    "D" => "0001100",
    "A" => "0110000",
    "!D" => "0001101",
    "!A" => "0110001",
    "-D" => "0001111",
    "-A" => "0110011",
    "D+1" => "0011111",
    "A+1" => "0110111",
    "D-1" => "0001110",
    "A-1" => "0110010",
    "D+A" => "0000010",
    "D-A" => "0010011",
    "A-D" => "0000111",
    "D&A" => "0000000",
    "D|A" => "0010101",

    // a=1 (M register operations)
    "M" => "1110000",
    "!M" => "1110001",
    "-M" => "1110011",
    "M+1" => "1110111",
    "M-1" => "1110010",
    "D+M" => "1000010",
    "D-M" => "1010011",
    "M-D" => "1000111",
    "D&M" => "1000000",
    "D|M" => "1010101",
};

/// Jump mnemonic to binary code mapping (3 bits).
///
/// Empty string represents no jump.
static JUMP_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "" => "000",
    "JGT" => "001",
    "JEQ" => "010",
    "JGE" => "011",
    "JLT" => "100",
    "JNE" => "101",
    "JLE" => "110",
    "JMP" => "111",
};

/// Looks up the 3-bit code for a dest mnemonic.
#[must_use]
pub fn dest(mnemonic: &str) -> Option<&'static str> {
    DEST_MAP.get(mnemonic).copied()
}

/// Looks up the 7-bit code for a comp mnemonic.
#[must_use]
pub fn comp(mnemonic: &str) -> Option<&'static str> {
    COMP_MAP.get(mnemonic).copied()
}

/// Looks up the 3-bit code for a jump mnemonic.
#[must_use]
pub fn jump(mnemonic: &str) -> Option<&'static str> {
    JUMP_MAP.get(mnemonic).copied()
}

/// Encodes a complete C-instruction: `111accccccdddjjj`.
///
/// Unknown mnemonics in any field are fatal; `line` is the source line used
/// to annotate the error.
///
/// # Example
/// ```
/// use assembler::code::encode_c_instruction;
/// let instruction = encode_c_instruction("D", "D+1", "", 1).unwrap();
/// assert_eq!(instruction, "1110011111010000");
/// ```
pub fn encode_c_instruction(
    dest_mnemonic: &str,
    comp_mnemonic: &str,
    jump_mnemonic: &str,
    line: usize,
) -> Result<String, AsmError> {
    let dest_bits = dest(dest_mnemonic).ok_or_else(|| AsmError::UnknownDest {
        line,
        mnemonic: dest_mnemonic.to_string(),
    })?;
    let comp_bits = comp(comp_mnemonic).ok_or_else(|| AsmError::UnknownComp {
        line,
        mnemonic: comp_mnemonic.to_string(),
    })?;
    let jump_bits = jump(jump_mnemonic).ok_or_else(|| AsmError::UnknownJump {
        line,
        mnemonic: jump_mnemonic.to_string(),
    })?;

    Ok(format!("111{comp_bits}{dest_bits}{jump_bits}"))
}

/// Encodes an A-instruction: `0` followed by the 15-bit big-endian address.
///
/// # Example
/// ```
/// use assembler::code::encode_a_instruction;
/// assert_eq!(encode_a_instruction(100), "0000000001100100");
/// ```
#[must_use]
pub fn encode_a_instruction(address: u16) -> String {
    format!("{address:016b}")
}
