//! VM translator entry point.
//!
//! Usage: `vmtrans <file.vm | directory>`. A file translates to a sibling
//! `.asm`; a directory translates to `<dir>/<dir>.asm` with the bootstrap
//! preamble.

#![warn(clippy::all, clippy::pedantic)]

use std::env;
use std::path::Path;
use std::process;

use vmtranslator::translate;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <file.vm | directory>", args[0]);
        process::exit(1);
    }

    let input = Path::new(&args[1]);
    match translate(input) {
        Ok(output) => {
            println!(
                "Translation complete: {} -> {}",
                input.display(),
                output.display()
            );
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}
