//! Tunable context properties.

/// Settings that can be changed on a [`Context`](crate::Context) after creation.
///
/// # Example
///
/// ```
/// use inf_core::{Context, ContextProperty};
///
/// let mut ctx = Context::new();
/// ctx.set_property(ContextProperty::MaxFrameDepth, 8);
/// assert_eq!(ctx.property(ContextProperty::MaxFrameDepth), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextProperty {
    /// Initial capacity of the evaluation stack, in slots (default: 256).
    InitStackSize,
    /// Maximum number of nested frames (default: 64).
    MaxFrameDepth,
}

impl ContextProperty {
    pub const ALL: [ContextProperty; 2] =
        [ContextProperty::InitStackSize, ContextProperty::MaxFrameDepth];

    pub fn default_value(self) -> usize {
        match self {
            ContextProperty::InitStackSize => 256,
            ContextProperty::MaxFrameDepth => 64,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Current values of all properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Properties {
    values: [usize; 2],
}

impl Properties {
    pub fn get(&self, property: ContextProperty) -> usize {
        self.values[property.index()]
    }

    pub fn set(&mut self, property: ContextProperty, value: usize) {
        self.values[property.index()] = value;
    }
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            values: ContextProperty::ALL.map(ContextProperty::default_value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let props = Properties::default();
        assert_eq!(props.get(ContextProperty::InitStackSize), 256);
        assert_eq!(props.get(ContextProperty::MaxFrameDepth), 64);
    }

    #[test]
    fn set_overrides_one_property() {
        let mut props = Properties::default();
        props.set(ContextProperty::InitStackSize, 16);
        assert_eq!(props.get(ContextProperty::InitStackSize), 16);
        assert_eq!(props.get(ContextProperty::MaxFrameDepth), 64);
    }
}
