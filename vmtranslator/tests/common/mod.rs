//! Minimal Hack CPU interpreter for execution-backed tests.
//!
//! Executes the 16-character binary strings produced by the assembler:
//! enough of the reference CPU (A/D registers, 32K RAM, the full ALU and
//! jump table) to observe what translated VM programs do to the stack.

/// Hack machine state. RAM[0] is SP per the VM convention.
pub struct Machine {
    pub ram: Vec<i16>,
    rom: Vec<u16>,
    a: i16,
    d: i16,
    pc: usize,
}

impl Machine {
    pub fn new(program: &[String]) -> Self {
        let rom = program
            .iter()
            .map(|line| u16::from_str_radix(line, 2).expect("not a binary instruction"))
            .collect();
        Machine {
            ram: vec![0; 32768],
            rom,
            a: 0,
            d: 0,
            pc: 0,
        }
    }

    /// Runs at most `max_steps` instructions; stops early if the PC walks
    /// off the end of the program. Tight infinite loops (the conventional
    /// halt) simply burn the remaining steps.
    pub fn run(&mut self, max_steps: usize) {
        for _ in 0..max_steps {
            if self.pc >= self.rom.len() {
                break;
            }
            self.step();
        }
    }

    fn step(&mut self) {
        let word = self.rom[self.pc];

        // A-instruction: load the 15-bit value.
        if word & 0x8000 == 0 {
            self.a = word as i16;
            self.pc += 1;
            return;
        }

        let addr = (self.a as u16 & 0x7FFF) as usize;
        let y = if (word >> 12) & 1 == 1 {
            self.ram[addr]
        } else {
            self.a
        };
        let d = self.d;

        let out: i16 = match (word >> 6) & 0x3F {
            0b101010 => 0,
            0b111111 => 1,
            0b111010 => -1,
            0b001100 => d,
            0b110000 => y,
            0b001101 => !d,
            0b110001 => !y,
            0b001111 => d.wrapping_neg(),
            0b110011 => y.wrapping_neg(),
            0b011111 => d.wrapping_add(1),
            0b110111 => y.wrapping_add(1),
            0b001110 => d.wrapping_sub(1),
            0b110010 => y.wrapping_sub(1),
            0b000010 => d.wrapping_add(y),
            0b010011 => d.wrapping_sub(y),
            0b000111 => y.wrapping_sub(d),
            0b000000 => d & y,
            0b010101 => d | y,
            bits => panic!("illegal comp bits {bits:06b}"),
        };

        // dest bits: A D M. M writes through the pre-instruction A.
        if word & 0b001000 != 0 {
            self.ram[addr] = out;
        }
        if word & 0b100000 != 0 {
            self.a = out;
        }
        if word & 0b010000 != 0 {
            self.d = out;
        }

        let jump = (word & 0b100 != 0 && out < 0)
            || (word & 0b010 != 0 && out == 0)
            || (word & 0b001 != 0 && out > 0);
        self.pc = if jump { addr } else { self.pc + 1 };
    }
}

/// Assembles and runs a translated VM program with SP preset to 256.
pub fn execute(asm: &[String], max_steps: usize) -> Machine {
    let binary = assembler::assemble(asm).expect("translated assembly must assemble");
    let mut machine = Machine::new(&binary);
    machine.ram[0] = 256; // SP
    machine.run(max_steps);
    machine
}

/// Like `execute`, but leaves RAM untouched: for programs that carry their
/// own bootstrap.
pub fn execute_bootstrapped(asm: &[String], max_steps: usize) -> Machine {
    let binary = assembler::assemble(asm).expect("translated assembly must assemble");
    let mut machine = Machine::new(&binary);
    machine.run(max_steps);
    machine
}
