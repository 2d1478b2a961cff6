//! Hack assembler entry point.
//!
//! Usage: `assembler <input.asm> [output.hack]`. The output defaults to the
//! input path with its extension replaced by `.hack`.

#![warn(clippy::all, clippy::pedantic)]

use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use assembler::{AsmError, assemble};

fn read_lines(path: &str) -> Result<Vec<String>, AsmError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    reader
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(Into::into)
}

/// Determines the output file path.
fn output_path(input: &str, explicit_output: Option<&str>) -> PathBuf {
    match explicit_output {
        Some(path) => PathBuf::from(path),
        None => Path::new(input).with_extension("hack"),
    }
}

fn run(input: &str, explicit_output: Option<&str>) -> Result<PathBuf, AsmError> {
    let lines = read_lines(input)?;
    let binary = assemble(&lines)?;

    let output = output_path(input, explicit_output);
    let mut writer = BufWriter::new(File::create(&output)?);
    for instruction in &binary {
        writeln!(writer, "{instruction}")?;
    }
    writer.flush()?;

    Ok(output)
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if !(2..=3).contains(&args.len()) {
        eprintln!("Usage: {} <input.asm> [output.hack]", args[0]);
        process::exit(1);
    }

    let input = &args[1];
    match run(input, args.get(2).map(String::as_str)) {
        Ok(output) => {
            println!("Assembly completed. Output written to {}", output.display());
        }
        Err(err) => {
            eprintln!("{input}: {err}");
            process::exit(1);
        }
    }
}
