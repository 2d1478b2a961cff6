//! VM translator: stack-VM intermediate language to Hack assembly.
//!
//! A single `.vm` file translates to a sibling `.asm` file. A directory
//! translates to `<dir>/<dir>.asm`: a bootstrap preamble (SP=256, `call
//! Sys.init 0`) followed by the translation of every `.vm` file in sorted
//! file-name order. Static variables are namespaced per source-file stem,
//! and generated labels stay unique across the whole output.
//!
//! # Example
//!
//! ```rust
//! use vmtranslator::translate_source;
//!
//! let asm = translate_source("Main", "push constant 7\n").unwrap();
//! assert_eq!(asm[0], "// push constant 7");
//! assert_eq!(asm[1], "@7");
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

pub mod code_writer;
pub mod error;
pub mod parser;

pub use code_writer::CodeWriter;
pub use error::VmError;
pub use parser::{CommandType, Parser};

use std::fs;
use std::path::{Path, PathBuf};

/// Translates a set of `(unit stem, source)` pairs into one assembly
/// listing, optionally preceded by the bootstrap preamble.
///
/// This is the in-memory core shared by file mode (one unit, no bootstrap)
/// and directory mode (all units, bootstrap first).
pub fn translate_units(units: &[(String, String)], bootstrap: bool) -> Result<Vec<String>, VmError> {
    let first_unit = units.first().map_or("Sys", |(unit, _)| unit.as_str());
    let mut writer = CodeWriter::new(first_unit);

    if bootstrap {
        writer.write_bootstrap();
    }

    for (unit, source) in units {
        writer.set_unit(unit);
        translate_unit(unit, source, &mut writer)?;
    }

    Ok(writer.into_lines())
}

/// Translates one unit's source into an existing writer.
fn translate_unit(unit: &str, source: &str, writer: &mut CodeWriter) -> Result<(), VmError> {
    let mut parser = Parser::new(unit, source);

    while parser.advance() {
        writer.comment(&parser.command_text());
        let line = parser.line_number();

        match parser.command_type()? {
            CommandType::Arithmetic => writer.write_arithmetic(parser.arg1()?),
            CommandType::Push => writer.write_push(parser.arg1()?, parser.arg2()?, line)?,
            CommandType::Pop => writer.write_pop(parser.arg1()?, parser.arg2()?, line)?,
            CommandType::Label => writer.write_label(parser.arg1()?),
            CommandType::Goto => writer.write_goto(parser.arg1()?),
            CommandType::If => writer.write_if(parser.arg1()?),
            CommandType::Function => writer.write_function(parser.arg1()?, parser.arg2()?),
            CommandType::Call => writer.write_call(parser.arg1()?, parser.arg2()?),
            CommandType::Return => writer.write_return(),
        }
    }

    Ok(())
}

/// Translates a single unit with no bootstrap. `unit` is the file stem used
/// for static namespacing and error messages.
pub fn translate_source(unit: &str, source: &str) -> Result<Vec<String>, VmError> {
    translate_units(&[(unit.to_string(), source.to_string())], false)
}

/// File/directory driver: translates `input` and writes the `.asm` output,
/// returning its path.
///
/// Output is only written once the whole translation has succeeded, so a
/// failing file never leaves a partial `.asm` behind.
pub fn translate(input: &Path) -> Result<PathBuf, VmError> {
    let (units, output, bootstrap) = if input.is_dir() {
        let mut vm_files: Vec<PathBuf> = fs::read_dir(input)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "vm"))
            .collect();
        vm_files.sort();

        if vm_files.is_empty() {
            return Err(VmError::NoVmFiles(input.to_path_buf()));
        }

        let mut units = Vec::with_capacity(vm_files.len());
        for path in &vm_files {
            units.push((unit_stem(path), fs::read_to_string(path)?));
        }

        let dir_name = input
            .file_name()
            .map_or_else(|| "out".to_string(), |n| n.to_string_lossy().into_owned());
        let output = input.join(format!("{dir_name}.asm"));
        (units, output, true)
    } else if input.extension().is_some_and(|ext| ext == "vm") {
        let units = vec![(unit_stem(input), fs::read_to_string(input)?)];
        (units, input.with_extension("asm"), false)
    } else {
        return Err(VmError::UnsupportedInput(input.to_path_buf()));
    };

    let lines = translate_units(&units, bootstrap)?;
    fs::write(&output, format!("{}\n", lines.join("\n")))?;
    Ok(output)
}

fn unit_stem(path: &Path) -> String {
    path.file_stem()
        .map_or_else(String::new, |stem| stem.to_string_lossy().into_owned())
}
