//! Jack compiler entry point.
//!
//! Usage: `jack <directory>`. Every `.jack` file in the directory compiles
//! to a sibling `.vm` file.

#![warn(clippy::all, clippy::pedantic)]

use std::env;
use std::path::Path;
use std::process;

use jackcompiler::compile_directory;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <directory>", args[0]);
        process::exit(1);
    }

    match compile_directory(Path::new(&args[1])) {
        Ok(outputs) => {
            for output in &outputs {
                println!("Compiled {}", output.display());
            }
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}
