//! Functions under construction: a local table plus a straight-line body.

use std::fmt;

use crate::{Instruction, Label, Ssa, TypeId};

/// How a local came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalKind {
    /// Declared under its name (parameters); visible to binding lookup.
    Declared,
    /// Allocated to hold an emitted instruction's result.
    Temporary,
}

/// One entry of a function's local table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Local {
    pub name: Option<Label>,
    pub ty: TypeId,
    pub kind: LocalKind,
}

impl Local {
    pub fn declared(name: Option<Label>, ty: TypeId) -> Self {
        Self {
            name,
            ty,
            kind: LocalKind::Declared,
        }
    }

    pub fn temporary(name: Option<Label>, ty: TypeId) -> Self {
        Self {
            name,
            ty,
            kind: LocalKind::Temporary,
        }
    }
}

/// Ordered locals and ordered instructions.
///
/// A local's index is its virtual register number. Locals are only ever
/// appended, so a register handed out once stays valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Function {
    locals: Vec<Local>,
    body: Vec<Instruction>,
    parameter_count: usize,
}

impl Function {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a local and return its register.
    pub fn allocate(&mut self, local: Local) -> Ssa {
        let ssa = Ssa(self.locals.len() as u32);
        let leading = self.body.is_empty() && self.parameter_count == ssa.index();
        if local.kind == LocalKind::Declared && leading {
            self.parameter_count += 1;
        }
        self.locals.push(local);
        ssa
    }

    pub fn append(&mut self, instruction: Instruction) {
        debug_assert!(instruction.dest.index() < self.locals.len());
        self.body.push(instruction);
    }

    pub fn local(&self, ssa: Ssa) -> Option<&Local> {
        self.locals.get(ssa.index())
    }

    pub fn locals(&self) -> &[Local] {
        &self.locals
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.body
    }

    pub fn local_count(&self) -> usize {
        self.locals.len()
    }

    /// Number of leading declared locals, which receive call arguments.
    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    /// The most recent local declared under `name`.
    pub fn find_declared(&self, name: Label) -> Option<Ssa> {
        self.locals
            .iter()
            .rposition(|l| l.kind == LocalKind::Declared && l.name == Some(name))
            .map(|i| Ssa(i as u32))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.body {
            writeln!(f, "{instruction}")?;
        }
        Ok(())
    }
}
