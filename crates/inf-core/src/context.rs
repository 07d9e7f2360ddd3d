//! The compilation context.
//!
//! A [`Context`] lives for one compilation unit and owns everything the
//! scanner, parser and compiler share: the type and label interners, the
//! global symbol table, the append-only error and location lists, the
//! evaluation stack and the stack of active frames.
//!
//! At most one function is *current*: the one in the top frame. Frames are
//! pushed by [`Context::begin_function`], which moves the function out of its
//! symbol and reserves one stack slot per local, and popped by
//! [`Context::end_function`], which moves it back.

use std::fmt::Write as _;

use tracing::{debug, trace};

use crate::{
    Binding, CompileError, ContextProperty, Diagnostic, ErrorList, ErrorTag, Function, Instruction,
    IntKind, Label, Local, Location, LocationList, LocationTag, Operand, Properties, Ssa, Storage,
    StringInterner, Symbol, SymbolTable, Type, TypeId, TypeInterner, Value,
};

/// An active function together with its region of the evaluation stack.
#[derive(Debug)]
pub struct Frame {
    /// Symbol the function belongs to.
    pub owner: Label,
    pub function: Function,
    /// Index of the frame's first slot in the evaluation stack.
    pub base: usize,
}

#[derive(Debug)]
pub struct Context {
    types: TypeInterner,
    strings: StringInterner,
    symbols: SymbolTable,
    errors: ErrorList,
    locations: LocationList,
    stack: Vec<Value>,
    frames: Vec<Frame>,
    properties: Properties,
    focus: Option<Location>,
}

impl Context {
    pub fn new() -> Self {
        let properties = Properties::default();
        Self {
            types: TypeInterner::new(),
            strings: StringInterner::new(),
            symbols: SymbolTable::new(),
            errors: ErrorList::new(),
            locations: LocationList::new(),
            stack: Vec::with_capacity(properties.get(ContextProperty::InitStackSize)),
            frames: Vec::new(),
            properties,
            focus: None,
        }
    }

    // ========================================================================
    // Properties
    // ========================================================================

    pub fn set_property(&mut self, property: ContextProperty, value: usize) {
        self.properties.set(property, value);
        if property == ContextProperty::InitStackSize {
            self.stack.reserve(value.saturating_sub(self.stack.len()));
        }
    }

    pub fn property(&self, property: ContextProperty) -> usize {
        self.properties.get(property)
    }

    // ========================================================================
    // Interning
    // ========================================================================

    pub fn intern_label(&mut self, text: &str) -> Label {
        self.strings.intern(text)
    }

    pub fn label_text(&self, label: Label) -> Option<&str> {
        self.strings.resolve(label)
    }

    pub fn lookup_label(&self, text: &str) -> Option<Label> {
        self.strings.lookup(text)
    }

    /// Interned type of an integer kind.
    #[inline]
    pub fn type_for(&self, kind: IntKind) -> TypeId {
        self.types.integer(kind)
    }

    #[inline]
    pub fn nil_type(&self) -> TypeId {
        self.types.nil()
    }

    pub fn function_type(&mut self, return_type: TypeId, arguments: Vec<TypeId>) -> TypeId {
        self.types.function(return_type, arguments)
    }

    pub fn intern_type(&mut self, ty: Type) -> TypeId {
        self.types.intern(ty)
    }

    pub fn type_of(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id)
    }

    /// The integer kind of a type, if it is one of the eight integer types.
    pub fn integer_kind(&self, id: TypeId) -> Option<IntKind> {
        self.types.integer_kind(id)
    }

    pub fn describe_type(&self, id: TypeId) -> String {
        self.types.describe(id)
    }

    // ========================================================================
    // Locations & Diagnostics
    // ========================================================================

    pub fn append_location(&mut self, location: Location) -> LocationTag {
        self.locations.push(location)
    }

    pub fn location(&self, tag: LocationTag) -> Option<&Location> {
        self.locations.get(tag)
    }

    /// Record an error and return its tag.
    pub fn append_error(&mut self, error: CompileError, location: Option<LocationTag>) -> ErrorTag {
        let tag = self.errors.push(Diagnostic::new(error, location));
        debug!(
            %tag,
            %error,
            location = %location
                .and_then(|l| self.locations.get(l))
                .map(ToString::to_string)
                .unwrap_or_default(),
            "error recorded"
        );
        tag
    }

    /// Record an error at the current focus and return it as an operand.
    pub fn fail(&mut self, error: CompileError) -> Operand {
        let location = self.focus.clone().map(|l| self.append_location(l));
        Operand::Error(self.append_error(error, location))
    }

    /// Record an error at `location` and return it as an operand.
    pub fn fail_at(&mut self, error: CompileError, location: &Location) -> Operand {
        let tag = self.append_location(location.clone());
        Operand::Error(self.append_error(error, Some(tag)))
    }

    /// Set the location attached to errors recorded through [`fail`](Self::fail).
    ///
    /// The location is only appended to the location list when an error is
    /// actually recorded.
    pub fn set_focus(&mut self, focus: Option<Location>) {
        self.focus = focus;
    }

    pub fn focus(&self) -> Option<&Location> {
        self.focus.as_ref()
    }

    pub fn error(&self, tag: ErrorTag) -> Option<&Diagnostic> {
        self.errors.get(tag)
    }

    /// The message and location of a recorded error.
    pub fn resolve_error(&self, tag: ErrorTag) -> Option<(String, Option<&Location>)> {
        let diagnostic = self.errors.get(tag)?;
        let location = diagnostic.location.and_then(|l| self.locations.get(l));
        Some((diagnostic.message(), location))
    }

    /// `"<location>: <message>"`, or just the message when no location is known.
    pub fn render_error(&self, tag: ErrorTag) -> Option<String> {
        let (message, location) = self.resolve_error(tag)?;
        Some(match location {
            Some(location) => format!("{location}: {message}"),
            None => message,
        })
    }

    pub fn errors(&self) -> &ErrorList {
        &self.errors
    }

    // ========================================================================
    // Symbols
    // ========================================================================

    /// Declare a non-function global. Returns the symbol it replaces.
    pub fn declare_global(&mut self, name: Label, ty: TypeId, value: Value) -> Option<Symbol> {
        trace!(name = name.0, ty = %self.types.describe(ty), "declare global");
        self.symbols.insert(Symbol { name, ty, value })
    }

    /// Declare a function symbol with an empty body whose leading locals are
    /// the given parameters. Returns the function's type.
    pub fn declare_function(
        &mut self,
        name: Label,
        return_type: TypeId,
        parameters: &[(Option<Label>, TypeId)],
    ) -> TypeId {
        let ty = self.function_type(return_type, parameters.iter().map(|(_, ty)| *ty).collect());
        let mut function = Function::new();
        for (param, param_ty) in parameters {
            function.allocate(Local::declared(*param, *param_ty));
        }
        trace!(name = name.0, ty = %self.types.describe(ty), "declare function");
        self.symbols.insert(Symbol {
            name,
            ty,
            value: Value::Function(function),
        });
        ty
    }

    pub fn symbol(&self, name: Label) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    // ========================================================================
    // Frames
    // ========================================================================

    /// Make the function named `name` current, reserving its stack region.
    ///
    /// While the frame is active the symbol holds [`Value::Nil`].
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn begin_function(&mut self, name: Label) -> Result<(), CompileError> {
        if self.frames.len() >= self.properties.get(ContextProperty::MaxFrameDepth) {
            return Err(CompileError::FrameDepthExceeded);
        }
        let symbol = self.symbols.get_mut(name).ok_or(CompileError::LocalNotFound)?;
        if !matches!(symbol.value, Value::Function(_)) {
            return Err(CompileError::NotAFunction);
        }
        let Value::Function(function) = std::mem::take(&mut symbol.value) else {
            return Err(CompileError::NotAFunction);
        };

        let base = self.stack.len();
        self.stack.resize(base + function.local_count(), Value::Nil);
        trace!(name = name.0, base, depth = self.frames.len() + 1, "begin function");
        self.frames.push(Frame {
            owner: name,
            function,
            base,
        });
        Ok(())
    }

    /// Pop the current frame and store its function back into its symbol.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn end_function(&mut self) -> Result<Label, CompileError> {
        let frame = self.frames.pop().ok_or(CompileError::NoActiveFunction)?;
        self.stack.truncate(frame.base);
        trace!(
            name = frame.owner.0,
            instructions = frame.function.instructions().len(),
            "end function"
        );
        if let Some(symbol) = self.symbols.get_mut(frame.owner) {
            symbol.value = Value::Function(frame.function);
        }
        Ok(frame.owner)
    }

    pub fn current_function(&self) -> Option<&Function> {
        self.frames.last().map(|f| &f.function)
    }

    /// Name of the symbol owning the current function.
    pub fn current_owner(&self) -> Option<Label> {
        self.frames.last().map(|f| f.owner)
    }

    pub fn frame_depth(&self) -> usize {
        self.frames.len()
    }

    // ========================================================================
    // Locals & Emission
    // ========================================================================

    fn push_local(&mut self, local: Local) -> Result<Ssa, CompileError> {
        let frame = self.frames.last_mut().ok_or(CompileError::NoActiveFunction)?;
        let ssa = frame.function.allocate(local);
        // The current frame is always the topmost region of the stack.
        self.stack.push(Value::Nil);
        debug_assert_eq!(self.stack.len(), frame.base + frame.function.local_count());
        Ok(ssa)
    }

    /// Allocate a temporary local in the current function.
    pub fn allocate_local(&mut self, ty: TypeId, name: Option<Label>) -> Result<Ssa, CompileError> {
        self.push_local(Local::temporary(name, ty))
    }

    /// Declare a named local, visible to [`lookup_binding`](Self::lookup_binding).
    pub fn declare_local(&mut self, name: Option<Label>, ty: TypeId) -> Result<Ssa, CompileError> {
        self.push_local(Local::declared(name, ty))
    }

    pub fn local(&self, ssa: Ssa) -> Option<&Local> {
        self.current_function()?.local(ssa)
    }

    pub fn append_instruction(&mut self, instruction: Instruction) -> Result<(), CompileError> {
        let frame = self.frames.last_mut().ok_or(CompileError::NoActiveFunction)?;
        frame.function.append(instruction);
        Ok(())
    }

    /// Allocate a temporary and append the instruction writing it, as one step.
    pub fn emit(
        &mut self,
        ty: TypeId,
        name: Option<Label>,
        build: impl FnOnce(Ssa) -> Instruction,
    ) -> Result<Ssa, CompileError> {
        let ssa = self.allocate_local(ty, name)?;
        let instruction = build(ssa);
        debug_assert_eq!(instruction.dest, ssa);
        self.append_instruction(instruction)?;
        Ok(ssa)
    }

    /// Resolve a label: declared locals of the current function first, then
    /// global symbols.
    pub fn lookup_binding(&self, name: Label) -> Option<Binding> {
        if let Some(function) = self.current_function()
            && let Some(ssa) = function.find_declared(name)
            && let Some(local) = function.local(ssa)
        {
            return Some(Binding {
                ty: local.ty,
                storage: Storage::Local(ssa),
            });
        }
        self.symbols.get(name).map(|symbol| Binding {
            ty: symbol.ty,
            storage: Storage::Global(name),
        })
    }

    // ========================================================================
    // Evaluation Stack
    // ========================================================================

    /// The current frame's slot for `ssa`.
    pub fn slot(&self, ssa: Ssa) -> Option<&Value> {
        let frame = self.frames.last()?;
        if ssa.index() >= frame.function.local_count() {
            return None;
        }
        self.stack.get(frame.base + ssa.index())
    }

    pub fn set_slot(&mut self, ssa: Ssa, value: Value) -> Result<(), CompileError> {
        let frame = self.frames.last().ok_or(CompileError::NoActiveFunction)?;
        if ssa.index() >= frame.function.local_count() {
            return Err(CompileError::LocalNotFound);
        }
        self.stack[frame.base + ssa.index()] = value;
        Ok(())
    }

    /// All slots of the current frame, in register order.
    pub fn frame_slots(&self) -> &[Value] {
        match self.frames.last() {
            Some(frame) => &self.stack[frame.base..],
            None => &[],
        }
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    // ========================================================================
    // Listings
    // ========================================================================

    /// Operand text with labels resolved to their identifiers.
    pub fn render_operand(&self, operand: &Operand) -> String {
        match operand {
            Operand::Label(label) => self.label_text(*label).unwrap_or("?").to_string(),
            other => other.to_string(),
        }
    }

    /// A readable listing of a function: its locals, then its instructions.
    pub fn render_function(&self, function: &Function) -> String {
        let mut out = String::new();
        for (index, local) in function.locals().iter().enumerate() {
            let _ = write!(out, "${index}: {}", self.describe_type(local.ty));
            if let Some(name) = local.name.and_then(|n| self.label_text(n)) {
                let _ = write!(out, " {name}");
            }
            out.push('\n');
        }
        for instruction in function.instructions() {
            let _ = write!(
                out,
                "{} = {} {}",
                instruction.dest,
                instruction.opcode,
                self.render_operand(&instruction.first)
            );
            if instruction.opcode.arity() == 2 {
                let _ = write!(out, ", {}", self.render_operand(&instruction.second));
            }
            out.push('\n');
        }
        out
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Opcode, Position};

    fn context_with_function(name: &str) -> (Context, Label) {
        let mut ctx = Context::new();
        let label = ctx.intern_label(name);
        let nil = ctx.nil_type();
        ctx.declare_function(label, nil, &[]);
        (ctx, label)
    }

    // ========================================================================
    // Types
    // ========================================================================

    #[test]
    fn interned_types_share_ids() {
        let mut ctx = Context::new();
        assert_eq!(ctx.intern_type(Type::Integer(IntKind::U8)), ctx.type_for(IntKind::U8));
        assert_eq!(ctx.intern_type(Type::Nil), ctx.nil_type());

        let i32_type = ctx.type_for(IntKind::I32);
        let signature = Type::Function {
            return_type: i32_type,
            arguments: vec![i32_type, i32_type],
        };
        let interned = ctx.intern_type(signature.clone());
        assert_eq!(ctx.intern_type(signature.clone()), interned);
        assert_eq!(ctx.function_type(i32_type, vec![i32_type, i32_type]), interned);
        assert_eq!(ctx.type_of(interned), Some(&signature));
        assert_eq!(ctx.integer_kind(interned), None);
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    #[test]
    fn errors_resolve_to_message_and_location() {
        let mut ctx = Context::new();
        let loc = Location::span(None, Position::new(2, 5), Position::new(2, 6));
        let op = ctx.fail_at(CompileError::UnexpectedCharacter { ch: '#' }, &loc);
        let tag = op.as_error().unwrap();

        let (message, location) = ctx.resolve_error(tag).unwrap();
        assert_eq!(message, "unexpected character");
        assert_eq!(location, Some(&loc));
        assert_eq!(ctx.render_error(tag).unwrap(), "2:5: unexpected character");
    }

    #[test]
    fn fail_uses_focus() {
        let mut ctx = Context::new();
        ctx.set_focus(Some(Location::span(None, Position::new(1, 3), Position::new(1, 4))));

        let op = ctx.fail(CompileError::DivisionByZero);
        assert_eq!(ctx.render_error(op.as_error().unwrap()).unwrap(), "1:3: division by zero");

        ctx.set_focus(None);
        let op = ctx.fail(CompileError::IntegerOverflow);
        assert_eq!(ctx.render_error(op.as_error().unwrap()).unwrap(), "integer overflow");
        assert_eq!(ctx.errors().len(), 2);
    }

    // ========================================================================
    // Frames
    // ========================================================================

    #[test]
    fn begin_and_end_move_the_function() {
        let (mut ctx, f) = context_with_function("main");
        assert!(ctx.current_function().is_none());

        ctx.begin_function(f).unwrap();
        assert_eq!(ctx.current_owner(), Some(f));
        assert_eq!(ctx.symbol(f).map(|s| &s.value), Some(&Value::Nil));

        assert_eq!(ctx.end_function(), Ok(f));
        assert!(ctx.symbol(f).and_then(|s| s.value.as_function()).is_some());
        assert_eq!(ctx.end_function(), Err(CompileError::NoActiveFunction));
    }

    #[test]
    fn begin_rejects_missing_and_non_functions() {
        let mut ctx = Context::new();
        let missing = ctx.intern_label("missing");
        assert_eq!(ctx.begin_function(missing), Err(CompileError::LocalNotFound));

        let k = ctx.intern_label("k");
        let ty = ctx.type_for(IntKind::U8);
        ctx.declare_global(k, ty, Value::U8(3));
        assert_eq!(ctx.begin_function(k), Err(CompileError::NotAFunction));
        assert_eq!(ctx.symbol(k).map(|s| &s.value), Some(&Value::U8(3)));
    }

    #[test]
    fn frame_depth_is_bounded() {
        let mut ctx = Context::new();
        ctx.set_property(ContextProperty::MaxFrameDepth, 2);
        let nil = ctx.nil_type();
        let names: Vec<Label> = ["a", "b", "c"].iter().map(|n| ctx.intern_label(n)).collect();
        for name in &names {
            ctx.declare_function(*name, nil, &[]);
        }

        ctx.begin_function(names[0]).unwrap();
        ctx.begin_function(names[1]).unwrap();
        assert_eq!(ctx.begin_function(names[2]), Err(CompileError::FrameDepthExceeded));
        assert_eq!(ctx.frame_depth(), 2);
    }

    #[test]
    fn frames_reserve_stack_regions() {
        let mut ctx = Context::new();
        let u8_ty = ctx.type_for(IntKind::U8);
        let nil = ctx.nil_type();
        let outer = ctx.intern_label("outer");
        let inner = ctx.intern_label("inner");
        ctx.declare_function(outer, nil, &[(None, u8_ty)]);
        ctx.declare_function(inner, nil, &[(None, u8_ty), (None, u8_ty)]);

        ctx.begin_function(outer).unwrap();
        ctx.allocate_local(u8_ty, None).unwrap();
        assert_eq!(ctx.stack_len(), 2);

        ctx.begin_function(inner).unwrap();
        assert_eq!(ctx.stack_len(), 4);
        assert_eq!(ctx.frame_slots().len(), 2);

        ctx.end_function().unwrap();
        assert_eq!(ctx.stack_len(), 2);
        assert_eq!(ctx.frame_slots().len(), 2);
    }

    // ========================================================================
    // Locals & Emission
    // ========================================================================

    #[test]
    fn emission_requires_a_function() {
        let mut ctx = Context::new();
        let ty = ctx.type_for(IntKind::I32);
        assert_eq!(ctx.allocate_local(ty, None), Err(CompileError::NoActiveFunction));
        let result = ctx.emit(ty, None, |dest| Instruction::unary(Opcode::Neg, dest, Operand::I32(1)));
        assert_eq!(result, Err(CompileError::NoActiveFunction));
    }

    #[test]
    fn emit_allocates_and_appends() {
        let (mut ctx, f) = context_with_function("main");
        ctx.begin_function(f).unwrap();
        let ty = ctx.type_for(IntKind::I32);
        let x = ctx.intern_label("x");
        let param = ctx.declare_local(Some(x), ty).unwrap();

        let dest = ctx
            .emit(ty, Some(x), |dest| {
                Instruction::binary(Opcode::Add, dest, Operand::Label(x), Operand::I32(1))
            })
            .unwrap();

        let function = ctx.current_function().unwrap();
        assert_eq!(dest, Ssa(1));
        assert_eq!(function.local_count(), 2);
        assert_eq!(function.instructions().len(), 1);
        assert_eq!(ctx.lookup_binding(x).map(|b| b.storage), Some(Storage::Local(param)));
        assert_eq!(ctx.render_function(function), "$0: i32 x\n$1: i32 x\n$1 = add x, 1i32\n");
    }

    #[test]
    fn lookup_prefers_locals_over_globals() {
        let (mut ctx, f) = context_with_function("main");
        let n = ctx.intern_label("n");
        let u16_ty = ctx.type_for(IntKind::U16);
        let i8_ty = ctx.type_for(IntKind::I8);
        ctx.declare_global(n, u16_ty, Value::U16(9));

        assert_eq!(
            ctx.lookup_binding(n),
            Some(Binding { ty: u16_ty, storage: Storage::Global(n) })
        );

        ctx.begin_function(f).unwrap();
        let local = ctx.declare_local(Some(n), i8_ty).unwrap();
        assert_eq!(
            ctx.lookup_binding(n),
            Some(Binding { ty: i8_ty, storage: Storage::Local(local) })
        );

        let unknown = ctx.intern_label("unknown");
        assert_eq!(ctx.lookup_binding(unknown), None);
    }

    #[test]
    fn slots_are_frame_relative() {
        let (mut ctx, f) = context_with_function("main");
        ctx.begin_function(f).unwrap();
        let ty = ctx.type_for(IntKind::U8);
        let a = ctx.allocate_local(ty, None).unwrap();

        ctx.set_slot(a, Value::U8(4)).unwrap();
        assert_eq!(ctx.slot(a), Some(&Value::U8(4)));
        assert_eq!(ctx.slot(Ssa(5)), None);
        assert_eq!(ctx.set_slot(Ssa(5), Value::Nil), Err(CompileError::LocalNotFound));
    }
}
