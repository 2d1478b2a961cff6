//! End-to-end assembler tests over the library pipeline.

use assembler::{AsmError, assemble};

fn lines(src: &str) -> Vec<String> {
    src.lines().map(str::to_string).collect()
}

/// The canonical straight-line add program, checked bit for bit.
#[test]
fn add_program_exact_output() {
    let source = lines(
        "// Computes R0 = 2 + 3\n\
         @2\n\
         D=A\n\
         @3\n\
         D=D+A\n\
         @0\n\
         M=D\n",
    );

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

/// The canonical max program: labels resolved to pass-1 positions.
#[test]
fn max_program_labels_resolve() {
    let source = lines(
        "// Computes R2 = max(R0, R1)\n\
         @R0\n\
         D=M\n\
         @R1\n\
         D=D-M\n\
         @OUTPUT_FIRST\n\
         D;JGT\n\
         @R1\n\
         D=M\n\
         @OUTPUT_D\n\
         0;JMP\n\
         (OUTPUT_FIRST)\n\
         @R0\n\
         D=M\n\
         (OUTPUT_D)\n\
         @R2\n\
         M=D\n\
         (INFINITE_LOOP)\n\
         @INFINITE_LOOP\n\
         0;JMP\n",
    );

    let binary = assemble(&source).unwrap();
    assert_eq!(binary.len(), 16);
    assert_eq!(
        binary,
        vec![
            "0000000000000000", // @R0
            "1111110000010000", // D=M
            "0000000000000001", // @R1
            "1111010011010000", // D=D-M
            "0000000000001010", // @OUTPUT_FIRST -> 10
            "1110001100000001", // D;JGT
            "0000000000000001", // @R1
            "1111110000010000", // D=M
            "0000000000001100", // @OUTPUT_D -> 12
            "1110101010000111", // 0;JMP
            "0000000000000000", // @R0
            "1111110000010000", // D=M
            "0000000000000010", // @R2
            "1110001100001000", // M=D
            "0000000000001110", // @INFINITE_LOOP -> 14
            "1110101010000111", // 0;JMP
        ]
    );
}

/// Variables intern in first-use order starting at RAM 16.
#[test]
fn variables_intern_from_sixteen() {
    let source = lines("@first\nM=1\n@second\nM=1\n@first\nM=0\n");
    let binary = assemble(&source).unwrap();

    assert_eq!(binary[0], "0000000000010000"); // first -> 16
    assert_eq!(binary[2], "0000000000010001"); // second -> 17
    assert_eq!(binary[4], "0000000000010000"); // first again -> 16
}

/// Every output line is exactly 16 binary digits, in instruction order.
#[test]
fn output_is_sixteen_bit_binary() {
    let source = lines(
        "@100\n\
         D=A\n\
         (TOP)\n\
         @i\n\
         M=M+1\n\
         @TOP\n\
         D;JGT\n\
         @SCREEN\n\
         M=-1\n",
    );

    let binary = assemble(&source).unwrap();
    assert_eq!(binary.len(), 8);
    for line in &binary {
        assert_eq!(line.len(), 16);
        assert!(line.chars().all(|c| c == '0' || c == '1'));
    }
}

/// Identical input assembles to identical output.
#[test]
fn assembly_is_deterministic() {
    let source = lines(
        "@x\nM=1\n@y\nM=1\n(AGAIN)\n@x\nD=M\n@y\nD=D+M\n@AGAIN\nD;JNE\n",
    );

    let first = assemble(&source).unwrap();
    let second = assemble(&source).unwrap();
    assert_eq!(first, second);
}

#[test]
fn fatal_paths_report_lines() {
    let unknown_comp = lines("@1\nD=Q\n");
    assert!(matches!(
        assemble(&unknown_comp),
        Err(AsmError::UnknownComp { line: 2, .. })
    ));

    let overflow = lines("@40000\n");
    assert!(matches!(
        assemble(&overflow),
        Err(AsmError::AddressOutOfRange { line: 1, .. })
    ));

    let duplicate = lines("(L)\n@0\n(L)\n");
    assert!(matches!(
        assemble(&duplicate),
        Err(AsmError::DuplicateLabel { line: 3, .. })
    ));

    let unknown_jump = lines("D;JXX\n");
    assert!(matches!(
        assemble(&unknown_jump),
        Err(AsmError::UnknownJump { line: 1, .. })
    ));
}
