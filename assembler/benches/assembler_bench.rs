//! Assembler benchmarks.
//!
//! Measures the encoding table lookups, the line parser, symbol table
//! operations, and the full two-pass pipeline.
//!
//! Run with:
//! ```bash
//! cargo bench
//! cargo bench --bench assembler_bench -- --save-baseline master
//! ```

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use assembler::{SymbolTable, assemble, code, parser::ParserLines};

/// PHF table lookups (the per-instruction hot path).
fn bench_code_lookups(c: &mut Criterion) {
    let mut group = c.benchmark_group("code_lookups");
    group.throughput(Throughput::Elements(4));

    group.bench_function("dest_lookup_hot", |b| {
        b.iter(|| {
            black_box(code::dest("AMD"));
            black_box(code::dest("D"));
            black_box(code::dest("M"));
            black_box(code::dest(""));
        });
    });

    group.bench_function("comp_lookup_hot", |b| {
        b.iter(|| {
            black_box(code::comp("D+1"));
            black_box(code::comp("D&M"));
            black_box(code::comp("M-D"));
            black_box(code::comp("0"));
        });
    });

    group.bench_function("encode_c_instruction", |b| {
        b.iter(|| {
            black_box(code::encode_c_instruction("D", "D+1", "JMP", 1).unwrap());
        });
    });

    group.bench_function("encode_a_instruction", |b| {
        b.iter(|| black_box(code::encode_a_instruction(16384)));
    });

    group.finish();
}

/// Symbol table lookups and interning.
fn bench_symbol_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("symbol_table");

    group.bench_function("lookup_predefined", |b| {
        let table = SymbolTable::new();
        b.iter(|| {
            black_box(table.get_address("SP"));
            black_box(table.get_address("R15"));
            black_box(table.get_address("SCREEN"));
        });
    });

    group.bench_function("get_or_insert_existing", |b| {
        let mut table = SymbolTable::new();
        table.define_label("LOOP", 100, 1).unwrap();
        let mut ram_address = 16;
        b.iter(|| {
            black_box(table.get_or_insert("LOOP", &mut ram_address));
        });
    });

    group.bench_function("get_or_insert_fresh", |b| {
        let mut counter = 0u32;
        b.iter(|| {
            let mut table = SymbolTable::new();
            let mut ram_address = 16;
            black_box(table.get_or_insert(&format!("VAR{counter}"), &mut ram_address));
            counter += 1;
        });
    });

    group.finish();
}

/// Line scanning over a mixed instruction stream.
fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    let lines_mixed: Vec<String> = [
        "@100",
        "D=A",
        "(LOOP)",
        "D=D-1 // count down",
        "@LOOP",
        "D;JGT",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect();

    group.throughput(Throughput::Elements(lines_mixed.len() as u64));
    group.bench_function("parse_mixed", |b| {
        b.iter(|| {
            let mut parser = ParserLines::from_lines(&lines_mixed);
            while parser.advance() {
                black_box(parser.command_type().unwrap());
            }
        });
    });

    group.bench_function("parse_c_fields", |b| {
        let lines: Vec<String> = vec!["MD=M-1;JEQ".to_string()];
        b.iter(|| {
            let mut parser = ParserLines::from_lines(&lines);
            while parser.advance() {
                black_box(parser.dest().unwrap());
                black_box(parser.comp().unwrap());
                black_box(parser.jump().unwrap());
            }
        });
    });

    group.finish();
}

/// Full two-pass assembly of a realistic loop program.
fn bench_full_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_assembly");

    let program: Vec<String> = [
        "@100",
        "D=A",
        "@i",
        "M=D",
        "(LOOP)",
        "@i",
        "D=M",
        "@END",
        "D;JEQ",
        "@i",
        "M=M-1",
        "@LOOP",
        "0;JMP",
        "(END)",
        "@END",
        "0;JMP",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect();

    group.throughput(Throughput::Elements(program.len() as u64));
    group.bench_function("pipeline_loop_16_lines", |b| {
        b.iter(|| assemble(black_box(&program)).unwrap());
    });

    let large: Vec<String> = program
        .iter()
        .cycle()
        .take(program.len() * 10)
        .cloned()
        .collect();

    // The cycled copy redefines its labels, so strip L-commands.
    let large: Vec<String> = large
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            if line.starts_with('(') {
                format!("(L{i})")
            } else {
                line
            }
        })
        .collect();

    group.throughput(Throughput::Elements(large.len() as u64));
    group.bench_function("pipeline_large_160_lines", |b| {
        b.iter(|| assemble(black_box(&large)).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_code_lookups,
    bench_symbol_table,
    bench_parser,
    bench_full_assembly,
);

criterion_main!(benches);
