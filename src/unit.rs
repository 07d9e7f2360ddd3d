//! Compilation unit API.
//!
//! A [`Unit`] collects named sources, compiles each one into a function named
//! after it, and evaluates the built functions. Every statement of a source
//! (expressions separated by `;`) becomes one result operand.
//!
//! # Example
//!
//! ```
//! use inf::{IntKind, Unit, Value};
//!
//! let mut unit = Unit::new();
//! unit.add_source_with_parameters("scale", &[("x", IntKind::U8)], "x * 2u8; 200u8 + 100u8")
//!     .unwrap();
//! unit.build().unwrap();
//!
//! let values = unit.evaluate("scale", &[Value::U8(21)]).unwrap();
//! assert_eq!(values, vec![Value::U8(42), Value::U64(300)]);
//! ```

use std::path::Path;
use std::sync::Arc;

use inf_compiler::evaluate;
use inf_core::{
    CompileError, Context, ContextProperty, Function, IntKind, Integer, Label, Operand,
    Properties, Value,
};
use inf_parser::Parser;
use rustc_hash::FxHashMap;
use tracing::debug;
use xxhash_rust::xxh64::xxh64;

/// One named source and what it compiled to.
#[derive(Debug)]
struct SourceFile {
    name: String,
    text: String,
    parameters: Vec<(String, IntKind)>,
    hash: u64,
    /// One operand per statement, available after build.
    results: Vec<Operand>,
}

/// A compilation unit.
///
/// Users:
/// 1. Create a unit with `Unit::new()`
/// 2. Declare globals with `declare_global()` and add sources with
///    `add_source()`
/// 3. Build the unit with `build()`
/// 4. Inspect results and listings, or run functions with `evaluate()`
///
/// A failed statement does not stop the build: the remaining statements and
/// sources are still compiled, and `build()` reports every diagnostic.
#[derive(Debug)]
pub struct Unit {
    ctx: Context,
    properties: Properties,
    sources: Vec<SourceFile>,
    /// Source name to index in `sources`.
    index: FxHashMap<String, usize>,
    globals: Vec<(String, Integer)>,
    dirty: bool,
    is_built: bool,
}

impl Default for Unit {
    fn default() -> Self {
        Self::new()
    }
}

impl Unit {
    pub fn new() -> Self {
        Self {
            ctx: Context::new(),
            properties: Properties::default(),
            sources: Vec::new(),
            index: FxHashMap::default(),
            globals: Vec::new(),
            dirty: false,
            is_built: false,
        }
    }

    /// Set a property of the context used by the next build.
    pub fn set_property(&mut self, property: ContextProperty, value: usize) {
        self.properties.set(property, value);
    }

    /// Declare an integer constant visible to every source by name.
    ///
    /// # Errors
    ///
    /// Fails after the unit has been built, or if the name is taken.
    pub fn declare_global(
        &mut self,
        name: impl Into<String>,
        value: Integer,
    ) -> Result<(), UnitError> {
        let name = name.into();
        self.check_new_name(&name)?;
        self.globals.push((name, value));
        Ok(())
    }

    /// Add a source with no parameters.
    ///
    /// # Errors
    ///
    /// Fails after the unit has been built, or if the name is taken.
    pub fn add_source(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<(), UnitError> {
        self.add_source_with_parameters(name, &[], source)
    }

    /// Add a source whose function takes the given named parameters.
    pub fn add_source_with_parameters(
        &mut self,
        name: impl Into<String>,
        parameters: &[(&str, IntKind)],
        source: impl Into<String>,
    ) -> Result<(), UnitError> {
        let name = name.into();
        self.check_new_name(&name)?;

        let text = source.into();
        self.index.insert(name.clone(), self.sources.len());
        self.sources.push(SourceFile {
            hash: xxh64(text.as_bytes(), 0),
            name,
            text,
            parameters: parameters.iter().map(|(p, k)| (p.to_string(), *k)).collect(),
            results: Vec::new(),
        });
        self.dirty = true;
        Ok(())
    }

    /// Replace the text of an existing source.
    ///
    /// Returns `true` if the text actually changed. Changed sources are
    /// compiled again by [`rebuild`](Self::rebuild).
    pub fn update_source(
        &mut self,
        name: impl AsRef<str>,
        source: impl Into<String>,
    ) -> Result<bool, UnitError> {
        let name = name.as_ref();
        let index = *self
            .index
            .get(name)
            .ok_or_else(|| UnitError::SourceNotFound(name.to_string()))?;

        let text = source.into();
        let hash = xxh64(text.as_bytes(), 0);
        let file = &mut self.sources[index];
        if file.hash == hash && file.text == text {
            return Ok(false);
        }
        file.text = text;
        file.hash = hash;
        self.dirty = true;
        Ok(true)
    }

    /// Check if there are changes that need a rebuild.
    pub fn has_pending_changes(&self) -> bool {
        self.dirty
    }

    /// Compile every source.
    ///
    /// # Errors
    ///
    /// [`BuildError::Diagnostics`] when any statement failed. The unit still
    /// counts as built, so results and diagnostics can be inspected.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(&mut self) -> Result<(), BuildError> {
        if self.is_built {
            return Err(BuildError::AlreadyBuilt);
        }
        if self.sources.is_empty() {
            return Err(BuildError::NoSources);
        }

        let mut ctx = Context::new();
        for property in ContextProperty::ALL {
            ctx.set_property(property, self.properties.get(property));
        }

        for (name, value) in &self.globals {
            let label = ctx.intern_label(name);
            let ty = ctx.type_for(value.kind());
            ctx.declare_global(label, ty, Value::from(*value));
        }

        for file in &mut self.sources {
            file.results = compile_source(&mut ctx, file);
        }

        self.ctx = ctx;
        self.is_built = true;
        self.dirty = false;

        let diagnostics = self.diagnostics();
        if diagnostics.is_empty() {
            Ok(())
        } else {
            debug!(count = diagnostics.len(), "build finished with diagnostics");
            Err(BuildError::Diagnostics(diagnostics))
        }
    }

    /// Build again if anything changed since the last build.
    ///
    /// The whole unit is compiled into a fresh context.
    pub fn rebuild(&mut self) -> Result<(), BuildError> {
        if self.is_built && !self.dirty {
            return Ok(());
        }
        self.is_built = false;
        self.build()
    }

    /// Reset to an empty unit. Properties are kept.
    pub fn clear(&mut self) {
        self.ctx = Context::new();
        self.sources.clear();
        self.index.clear();
        self.globals.clear();
        self.dirty = false;
        self.is_built = false;
    }

    pub fn is_built(&self) -> bool {
        self.is_built
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Number of compiled functions (available after build).
    pub fn function_count(&self) -> usize {
        if !self.is_built {
            return 0;
        }
        self.ctx.symbols().iter().filter(|s| s.value.as_function().is_some()).count()
    }

    /// The context of the last build.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Per-statement results of a source.
    pub fn results(&self, name: &str) -> Option<&[Operand]> {
        let file = &self.sources[*self.index.get(name)?];
        self.is_built.then_some(file.results.as_slice())
    }

    /// The function compiled from a source.
    pub fn function(&self, name: &str) -> Option<&Function> {
        let label = self.ctx.lookup_label(name)?;
        self.ctx.symbol(label)?.value.as_function()
    }

    /// A readable listing of the function compiled from a source.
    pub fn listing(&self, name: &str) -> Option<String> {
        self.function(name).map(|f| self.ctx.render_function(f))
    }

    /// Every recorded diagnostic as `"<location>: <message>"`, in the order
    /// they were recorded.
    pub fn diagnostics(&self) -> Vec<String> {
        self.ctx
            .errors()
            .iter()
            .filter_map(|(tag, _)| self.ctx.render_error(tag))
            .collect()
    }

    /// Run the function compiled from `name` and return the value of every
    /// statement.
    ///
    /// Failed statements yield [`Value::Error`] with the tag of their
    /// diagnostic.
    pub fn evaluate(&mut self, name: &str, arguments: &[Value]) -> Result<Vec<Value>, EvalError> {
        if !self.is_built {
            return Err(EvalError::NotBuilt);
        }
        let index = *self
            .index
            .get(name)
            .ok_or_else(|| EvalError::SourceNotFound(name.to_string()))?;
        let label = self
            .ctx
            .lookup_label(name)
            .ok_or_else(|| EvalError::SourceNotFound(name.to_string()))?;

        let slots = evaluate(&mut self.ctx, label, arguments)?;
        let function = self.function(name).ok_or(EvalError::Compile(CompileError::NotAFunction))?;
        Ok(self.sources[index]
            .results
            .iter()
            .map(|result| self.statement_value(function, &slots, *result))
            .collect())
    }

    // =========================================
    // Internal
    // =========================================

    fn check_new_name(&self, name: &str) -> Result<(), UnitError> {
        if self.is_built {
            return Err(UnitError::AlreadyBuilt);
        }
        if self.index.contains_key(name) || self.globals.iter().any(|(g, _)| g == name) {
            return Err(UnitError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn statement_value(&self, function: &Function, slots: &[Value], result: Operand) -> Value {
        match result {
            Operand::Empty => Value::Nil,
            Operand::Error(tag) => Value::Error(tag),
            Operand::Ssa(ssa) => slots.get(ssa.index()).cloned().unwrap_or_default(),
            Operand::Label(label) => self.label_value(function, slots, label),
            literal => literal.as_integer().map(Value::from).unwrap_or_default(),
        }
    }

    fn label_value(&self, function: &Function, slots: &[Value], label: Label) -> Value {
        if let Some(ssa) = function.find_declared(label) {
            return slots.get(ssa.index()).cloned().unwrap_or_default();
        }
        match self.ctx.symbol(label) {
            Some(symbol) if symbol.value.as_function().is_none() => symbol.value.clone(),
            _ => Value::Nil,
        }
    }
}

/// Compile one source into a function named after it.
fn compile_source(ctx: &mut Context, file: &SourceFile) -> Vec<Operand> {
    let name = ctx.intern_label(&file.name);
    let parameters: Vec<_> = file
        .parameters
        .iter()
        .map(|(param, kind)| (Some(ctx.intern_label(param)), ctx.type_for(*kind)))
        .collect();
    let nil = ctx.nil_type();
    ctx.declare_function(name, nil, &parameters);

    if let Err(error) = ctx.begin_function(name) {
        return vec![ctx.fail(error)];
    }

    let path: Arc<Path> = Arc::from(Path::new(&file.name));
    let mut results = Vec::new();
    {
        let mut parser = Parser::new(ctx);
        parser.set_source(&file.text, Some(path));
        parser.prime();
        while !parser.done() {
            results.push(parser.parse());
        }
    }

    if let Err(error) = ctx.end_function() {
        results.push(ctx.fail(error));
    }
    debug!(source = %file.name, statements = results.len(), "compiled source");
    results
}

/// Errors that can occur when adding sources or managing the unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitError {
    #[error("unit has already been built; use update_source() and rebuild(), or clear()")]
    AlreadyBuilt,

    #[error("name '{0}' is already used by a source or global")]
    DuplicateName(String),

    #[error("source '{0}' not found in unit")]
    SourceNotFound(String),
}

/// Errors that can occur during unit building.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("no sources added to unit")]
    NoSources,

    #[error("unit has already been built")]
    AlreadyBuilt,

    /// Rendered diagnostics, one per recorded error.
    #[error("build failed with {} diagnostic(s)", .0.len())]
    Diagnostics(Vec<String>),
}

impl BuildError {
    /// The first diagnostic, if any.
    pub fn first_diagnostic(&self) -> Option<&str> {
        match self {
            BuildError::Diagnostics(diagnostics) => diagnostics.first().map(String::as_str),
            _ => None,
        }
    }
}

/// Errors that can occur when evaluating a built function.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("unit has not been built")]
    NotBuilt,

    #[error("source '{0}' not found in unit")]
    SourceNotFound(String),

    #[error(transparent)]
    Compile(#[from] CompileError),
}
