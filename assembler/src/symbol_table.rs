//! Symbol table for the Hack assembler.
//!
//! Predefined symbols live in a compile-time perfect-hash map; user-defined
//! labels and variables go into a `HashMap`. Labels bind once in pass 1
//! (rebinding is fatal), variables are interned on first use in pass 2 from
//! RAM address 16 upward.

use crate::error::AsmError;
use phf::phf_map;
use std::collections::HashMap;

/// The 23 predefined symbols of the Hack platform.
static PREDEFINED_SYMBOLS: phf::Map<&'static str, u16> = phf_map! {
    // Virtual registers
    "R0" => 0,
    "R1" => 1,
    "R2" => 2,
    "R3" => 3,
    "R4" => 4,
    "R5" => 5,
    "R6" => 6,
    "R7" => 7,
    "R8" => 8,
    "R9" => 9,
    "R10" => 10,
    "R11" => 11,
    "R12" => 12,
    "R13" => 13,
    "R14" => 14,
    "R15" => 15,

    // Special pointers
    "SP" => 0,
    "LCL" => 1,
    "ARG" => 2,
    "THIS" => 3,
    "THAT" => 4,

    // I/O pointers
    "SCREEN" => 16384,
    "KBD" => 24576,
};

/// Symbol table mapping names to 15-bit addresses.
///
/// Once a name is bound its address never changes: labels reject rebinding
/// outright, and `get_or_insert` only inserts names that are absent.
///
/// # Example
/// ```
/// use assembler::SymbolTable;
///
/// let mut st = SymbolTable::new();
/// assert_eq!(st.get_address("SP"), Some(0));
///
/// st.define_label("LOOP", 100, 1).unwrap();
/// assert_eq!(st.get_address("LOOP"), Some(100));
/// ```
#[derive(Debug, Default)]
pub struct SymbolTable {
    /// User-defined symbols (labels and variables)
    user_symbols: HashMap<String, u16>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            user_symbols: HashMap::with_capacity(32),
        }
    }

    /// Binds a label to an instruction address during pass 1.
    ///
    /// Binding a name that already exists (predefined or user) is fatal;
    /// `line` annotates the error.
    pub fn define_label(&mut self, symbol: &str, address: u16, line: usize) -> Result<(), AsmError> {
        if self.contains(symbol) {
            return Err(AsmError::DuplicateLabel {
                line,
                label: symbol.to_string(),
            });
        }
        self.user_symbols.insert(symbol.to_string(), address);
        Ok(())
    }

    /// Checks whether a symbol exists (predefined or user-defined).
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        PREDEFINED_SYMBOLS.contains_key(symbol) || self.user_symbols.contains_key(symbol)
    }

    /// Returns the address bound to a symbol, if any.
    #[must_use]
    pub fn get_address(&self, symbol: &str) -> Option<u16> {
        PREDEFINED_SYMBOLS
            .get(symbol)
            .or_else(|| self.user_symbols.get(symbol))
            .copied()
    }

    /// Resolves a symbol during pass 2, interning it as a fresh variable if
    /// it is still unbound.
    ///
    /// `next_address` is the next free RAM slot; it is post-incremented on
    /// insertion, so the first unseen variable lands at 16, the next at 17,
    /// and so on.
    ///
    /// # Example
    /// ```
    /// use assembler::SymbolTable;
    ///
    /// let mut st = SymbolTable::new();
    /// let mut ram_addr = 16;
    ///
    /// assert_eq!(st.get_or_insert("i", &mut ram_addr), 16);
    /// assert_eq!(st.get_or_insert("i", &mut ram_addr), 16);
    /// assert_eq!(ram_addr, 17);
    /// ```
    pub fn get_or_insert(&mut self, symbol: &str, next_address: &mut u16) -> u16 {
        use std::collections::hash_map::Entry;

        if let Some(&addr) = PREDEFINED_SYMBOLS.get(symbol) {
            return addr;
        }

        match self.user_symbols.entry(symbol.to_string()) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let addr = *next_address;
                *next_address += 1;
                *e.insert(addr)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_symbols() {
        let st = SymbolTable::new();

        assert_eq!(st.get_address("SP"), Some(0));
        assert_eq!(st.get_address("LCL"), Some(1));
        assert_eq!(st.get_address("ARG"), Some(2));
        assert_eq!(st.get_address("THIS"), Some(3));
        assert_eq!(st.get_address("THAT"), Some(4));
        assert_eq!(st.get_address("SCREEN"), Some(16384));
        assert_eq!(st.get_address("KBD"), Some(24576));

        for i in 0..=15 {
            assert_eq!(st.get_address(&format!("R{i}")), Some(i));
        }
    }

    #[test]
    fn labels_bind_once() {
        let mut st = SymbolTable::new();

        st.define_label("LOOP", 100, 1).unwrap();
        assert_eq!(st.get_address("LOOP"), Some(100));

        assert!(matches!(
            st.define_label("LOOP", 200, 9),
            Err(AsmError::DuplicateLabel { line: 9, .. })
        ));
        assert_eq!(st.get_address("LOOP"), Some(100));
    }

    #[test]
    fn labels_cannot_shadow_predefined() {
        let mut st = SymbolTable::new();
        assert!(st.define_label("SP", 5, 3).is_err());
    }

    #[test]
    fn unknown_symbol_is_none() {
        let st = SymbolTable::new();
        assert_eq!(st.get_address("NONEXISTENT"), None);
        assert!(!st.contains("NONEXISTENT"));
    }

    #[test]
    fn interns_variables_in_order() {
        let mut st = SymbolTable::new();
        let mut next = 16;

        assert_eq!(st.get_or_insert("var1", &mut next), 16);
        assert_eq!(next, 17);

        assert_eq!(st.get_or_insert("var1", &mut next), 16);
        assert_eq!(next, 17);

        assert_eq!(st.get_or_insert("var2", &mut next), 17);
        assert_eq!(next, 18);
    }

    #[test]
    fn predefined_not_interned() {
        let mut st = SymbolTable::new();
        let mut next = 16;

        assert_eq!(st.get_or_insert("SP", &mut next), 0);
        assert_eq!(next, 16);
    }

    #[test]
    fn labels_win_over_interning() {
        let mut st = SymbolTable::new();
        st.define_label("END", 42, 1).unwrap();

        let mut next = 16;
        assert_eq!(st.get_or_insert("END", &mut next), 42);
        assert_eq!(next, 16);
    }
}
