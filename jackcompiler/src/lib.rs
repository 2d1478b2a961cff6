//! Jack compiler: class-based Jack source to stack-VM commands.
//!
//! One `.jack` file holds one class and compiles to one `.vm` file. The
//! compiler is a single pass: a recursive-descent engine walks the grammar
//! and emits VM commands directly, driven by a two-scope symbol table.
//!
//! # Architecture
//!
//! - [`tokenizer`]: comment-stripping scanner producing line-tagged tokens
//! - [`symbol_table`]: class and subroutine scopes with per-kind indices
//! - [`engine`]: fused parser and code generator
//! - [`vm_writer`]: canonical VM mnemonic emission
//! - [`error`]: fatal, source-located error type
//!
//! # Example
//!
//! ```rust
//! use jackcompiler::compile_source;
//!
//! let vm = compile_source(
//!     "Main",
//!     "class Main { function void main() { return; } }",
//! )
//! .unwrap();
//! assert_eq!(vm, ["function Main.main 0", "push constant 0", "return"]);
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation
)]

pub mod engine;
pub mod error;
pub mod symbol_table;
pub mod tokenizer;
pub mod vm_writer;

pub use engine::CompilationEngine;
pub use error::JackError;
pub use symbol_table::{Entry, Kind, SymbolTable};
pub use tokenizer::{Token, TokenKind, tokenize};
pub use vm_writer::{Command, Segment, VmWriter};

use std::fs;
use std::path::{Path, PathBuf};

/// Compiles one class source to VM commands. `unit` is the file stem used
/// in error messages.
pub fn compile_source(unit: &str, source: &str) -> Result<Vec<String>, JackError> {
    let tokens = tokenize(unit, source)?;
    CompilationEngine::new(unit, tokens).compile()
}

/// Compiles every `.jack` file in a directory to a sibling `.vm` file,
/// returning the written paths.
///
/// All files are compiled before anything is written: if any file fails,
/// the invocation fails and no output appears.
pub fn compile_directory(dir: &Path) -> Result<Vec<PathBuf>, JackError> {
    if !dir.is_dir() {
        return Err(JackError::NotADirectory(dir.to_path_buf()));
    }

    let mut jack_files: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "jack"))
        .collect();
    jack_files.sort();

    if jack_files.is_empty() {
        return Err(JackError::NoJackFiles(dir.to_path_buf()));
    }

    let mut compiled = Vec::with_capacity(jack_files.len());
    for path in &jack_files {
        let unit = path
            .file_stem()
            .map_or_else(String::new, |stem| stem.to_string_lossy().into_owned());
        let source = fs::read_to_string(path)?;
        let vm = compile_source(&unit, &source)?;
        compiled.push((path.with_extension("vm"), vm));
    }

    let mut written = Vec::with_capacity(compiled.len());
    for (output, vm) in compiled {
        fs::write(&output, format!("{}\n", vm.join("\n")))?;
        written.push(output);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_minimal_main() {
        let vm = compile_source("Main", "class Main { function void main() { return; } }")
            .unwrap();
        assert_eq!(vm, ["function Main.main 0", "push constant 0", "return"]);
    }

    #[test]
    fn lex_errors_surface_through_compile() {
        assert!(matches!(
            compile_source("Main", "class Main { let @ }"),
            Err(JackError::Lex { .. })
        ));
    }

    #[test]
    fn missing_directory_is_fatal() {
        assert!(matches!(
            compile_directory(Path::new("definitely/not/here")),
            Err(JackError::NotADirectory(_))
        ));
    }
}
