//! Identifier interning.
//!
//! Each distinct identifier text is stored once and named by a [`Label`].
//! Two labels are equal exactly when their texts are equal.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// Interned identifier handle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub u32);

impl Label {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label({})", self.0)
    }
}

/// Deduplicating store of identifier text.
#[derive(Debug, Default)]
pub struct StringInterner {
    map: FxHashMap<Arc<str>, Label>,
    strings: Vec<Arc<str>>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the label for `text`, interning it on first sight.
    pub fn intern(&mut self, text: &str) -> Label {
        if let Some(&label) = self.map.get(text) {
            return label;
        }
        let label = Label(self.strings.len() as u32);
        let shared: Arc<str> = Arc::from(text);
        self.strings.push(Arc::clone(&shared));
        self.map.insert(shared, label);
        label
    }

    /// The label for `text` if it was interned before.
    pub fn lookup(&self, text: &str) -> Option<Label> {
        self.map.get(text).copied()
    }

    pub fn resolve(&self, label: Label) -> Option<&str> {
        self.strings.get(label.index()).map(|s| &**s)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
