//! Two-scope symbol table for the Jack compiler.
//!
//! The class scope (kinds `static` and `field`) lives for one `.jack`
//! file; the subroutine scope (kinds `arg` and `var`) is rebuilt on every
//! subroutine declaration. Each kind has its own 0-based index counter.
//! The table also owns the per-subroutine `while`/`if` label counters.

use crate::error::JackError;
use crate::vm_writer::Segment;
use std::collections::HashMap;

/// Storage class of a Jack identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Static,
    Field,
    Arg,
    Var,
}

impl Kind {
    /// The VM segment a variable of this kind lives in.
    #[must_use]
    pub fn segment(self) -> Segment {
        match self {
            Kind::Static => Segment::Static,
            Kind::Field => Segment::This,
            Kind::Arg => Segment::Argument,
            Kind::Var => Segment::Local,
        }
    }

    fn is_class_scope(self) -> bool {
        matches!(self, Kind::Static | Kind::Field)
    }
}

/// One binding: declared type, storage kind, index within the kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub ty: String,
    pub kind: Kind,
    pub index: u16,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    unit: String,
    class_name: String,
    class_scope: HashMap<String, Entry>,
    subroutine_scope: HashMap<String, Entry>,
    static_index: u16,
    field_index: u16,
    arg_index: u16,
    var_index: u16,
    while_count: u16,
    if_count: u16,
}

impl SymbolTable {
    #[must_use]
    pub fn new(unit: &str) -> Self {
        SymbolTable {
            unit: unit.to_string(),
            ..Self::default()
        }
    }

    pub fn set_class_name(&mut self, name: &str) {
        self.class_name.clear();
        self.class_name.push_str(name);
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Resets the subroutine scope and its counters, including the
    /// while/if label counters.
    pub fn start_subroutine(&mut self) {
        self.subroutine_scope.clear();
        self.arg_index = 0;
        self.var_index = 0;
        self.while_count = 0;
        self.if_count = 0;
    }

    /// Declares a name in the scope its kind belongs to. Redeclaration
    /// within one scope is fatal.
    pub fn define(&mut self, name: &str, ty: &str, kind: Kind, line: usize) -> Result<(), JackError> {
        let (scope, counter) = if kind.is_class_scope() {
            let counter = match kind {
                Kind::Static => &mut self.static_index,
                _ => &mut self.field_index,
            };
            (&mut self.class_scope, counter)
        } else {
            let counter = match kind {
                Kind::Arg => &mut self.arg_index,
                _ => &mut self.var_index,
            };
            (&mut self.subroutine_scope, counter)
        };

        if scope.contains_key(name) {
            return Err(JackError::Redeclared {
                unit: self.unit.clone(),
                line,
                name: name.to_string(),
            });
        }

        let entry = Entry {
            ty: ty.to_string(),
            kind,
            index: *counter,
        };
        *counter += 1;
        scope.insert(name.to_string(), entry);
        Ok(())
    }

    /// Looks a name up, subroutine scope first, then class scope.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&Entry> {
        self.subroutine_scope
            .get(name)
            .or_else(|| self.class_scope.get(name))
    }

    /// Number of variables of a kind declared so far.
    #[must_use]
    pub fn var_count(&self, kind: Kind) -> u16 {
        match kind {
            Kind::Static => self.static_index,
            Kind::Field => self.field_index,
            Kind::Arg => self.arg_index,
            Kind::Var => self.var_index,
        }
    }

    /// Next unique index for `while` labels in the current subroutine.
    pub fn next_while(&mut self) -> u16 {
        let n = self.while_count;
        self.while_count += 1;
        n
    }

    /// Next unique index for `if` labels in the current subroutine.
    pub fn next_if(&mut self) -> u16 {
        let n = self.if_count;
        self.if_count += 1;
        n
    }
}
