//! Source location tracking for diagnostics.
//!
//! A [`Location`] covers the text of one token: an optional path identity plus
//! the line/column where it begins and ends. Locations that need to outlive the
//! scanner are appended to a [`LocationList`] and referenced by [`LocationTag`].

use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// A line/column pair (both 1-indexed, column counted in characters).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub column: u32,
}

impl Position {
    /// Create a position from a line and column.
    #[inline]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Step past one character.
    #[inline]
    pub fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The extent of a token in a source buffer.
///
/// The scanner keeps one `Location` and moves it forward token by token:
/// [`step`](Self::step) collapses it onto its end, then
/// [`advance`](Self::advance) extends the end past the consumed text.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Location {
    /// Path identity of the source, used only for display.
    pub path: Option<Arc<Path>>,
    /// Position of the first character.
    pub begin: Position,
    /// Position just past the last character.
    pub end: Position,
}

impl Location {
    /// Create a location at the start of a source.
    pub fn new(path: Option<Arc<Path>>) -> Self {
        Self {
            path,
            begin: Position::default(),
            end: Position::default(),
        }
    }

    /// Create a location spanning `begin..end`.
    pub fn span(path: Option<Arc<Path>>, begin: Position, end: Position) -> Self {
        Self { path, begin, end }
    }

    /// Start a new token where the previous one ended.
    #[inline]
    pub fn step(&mut self) {
        self.begin = self.end;
    }

    /// Extend the end of this location past `text`.
    pub fn advance(&mut self, text: &str) {
        for ch in text.chars() {
            self.end.advance(ch);
        }
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.begin, self.end)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{}:", path.display())?;
        }
        write!(f, "{}", self.begin)
    }
}

/// Stable handle to a location in a [`LocationList`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct LocationTag(pub u32);

impl LocationTag {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Append-only list of locations.
///
/// Entries are never removed or mutated, so a tag stays valid for the
/// lifetime of the list no matter how many entries are appended after it.
#[derive(Debug, Default)]
pub struct LocationList {
    entries: Vec<Location>,
}

impl LocationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a location and return its tag.
    pub fn push(&mut self, location: Location) -> LocationTag {
        let tag = LocationTag(self.entries.len() as u32);
        self.entries.push(location);
        tag
    }

    pub fn get(&self, tag: LocationTag) -> Option<&Location> {
        self.entries.get(tag.index())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_newline_resets_column() {
        let mut pos = Position::default();
        pos.advance('a');
        pos.advance('b');
        assert_eq!(pos, Position::new(1, 3));

        pos.advance('\n');
        assert_eq!(pos, Position::new(2, 1));
    }

    #[test]
    fn location_step_and_advance() {
        let mut loc = Location::new(None);
        loc.advance("12u8");
        assert_eq!(loc.begin, Position::new(1, 1));
        assert_eq!(loc.end, Position::new(1, 5));

        loc.step();
        loc.advance(" \n x");
        assert_eq!(loc.begin, Position::new(1, 5));
        assert_eq!(loc.end, Position::new(2, 3));
    }

    #[test]
    fn location_display() {
        let loc = Location::span(None, Position::new(3, 15), Position::new(3, 18));
        assert_eq!(loc.to_string(), "3:15");

        let path: Arc<Path> = Arc::from(Path::new("main.inf"));
        let loc = Location::span(Some(path), Position::new(1, 2), Position::new(1, 3));
        assert_eq!(loc.to_string(), "main.inf:1:2");
    }

    #[test]
    fn location_tags_survive_appends() {
        let mut list = LocationList::new();
        let first = list.push(Location::span(None, Position::new(1, 1), Position::new(1, 2)));
        for line in 2..100 {
            list.push(Location::span(None, Position::new(line, 1), Position::new(line, 2)));
        }
        assert_eq!(list.get(first).map(|l| l.begin), Some(Position::new(1, 1)));
        assert_eq!(list.len(), 99);
    }
}
