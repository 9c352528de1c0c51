//! The lexer's output type.

use std::ops::Range;

use syntax::SyntaxKind;

use crate::Position;

/// A sequence of [`SyntaxKind`]s.
#[derive(Debug)]
pub struct Lexed<'s> {
    source: &'s str,
    kinds: Vec<SyntaxKind>,
    positions: Vec<Position>,
    errors: Vec<LexError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub index: u32,
}

impl<'s> Lexed<'s> {
    pub(crate) fn new(source: &'s str) -> Lexed<'s> {
        let kinds = vec![];
        let positions = vec![];
        let errors = vec![];
        Lexed { source, kinds, positions, errors }
    }

    pub(crate) fn push(&mut self, kind: SyntaxKind, position: Position, error: Option<&str>) {
        if let Some(error) = error {
            let message = error.to_string();
            let index = self.kinds.len() as u32;
            self.errors.push(LexError { message, index });
        }

        self.kinds.push(kind);
        self.positions.push(position);
    }

    /// # Invariant
    ///
    /// [`Lexed`] always contains [`SyntaxKind::END_OF_FILE`] as its final element.
    /// It exclusively serves as an anchor for the final offset such that methods
    /// can compute the range for a token in a given index. With this in mind, we
    /// make sure that this token is hidden.
    ///
    /// For example, given `"hello"`
    ///
    /// ```rs
    /// // with END_OF_FILE, 0..5
    /// [(IDENTIFIER, 0), (END_OF_FILE, 5)]
    ///
    /// // without END_OF_FILE, 0..?
    /// [(IDENTIFIER, 0)]
    /// ```
    pub fn len(&self) -> usize {
        self.kinds.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    /// Returns the kind for an index.
    pub fn kind(&self, index: usize) -> SyntaxKind {
        assert!(index < self.len());
        self.kinds[index]
    }

    /// Returns the position for an index, including the end of file anchor.
    pub fn position(&self, index: usize) -> Position {
        assert!(index <= self.len());
        self.positions[index]
    }

    /// Returns the text for an index.
    pub fn text(&self, index: usize) -> &'s str {
        self.text_in_range(index..index + 1)
    }

    /// Returns the text for a range.
    pub fn text_in_range(&self, range: Range<usize>) -> &'s str {
        assert!(range.start < range.end && range.end <= self.len());
        let low = self.positions[range.start].offset;
        let high = self.positions[range.end].offset;
        &self.source[low..high]
    }

    /// Returns the error for an index.
    pub fn error(&self, index: usize) -> Option<&str> {
        assert!(index < self.len());
        let error_index = self.errors.binary_search_by_key(&(index as u32), |v| v.index).ok()?;
        Some(&self.errors[error_index].message)
    }

    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }
}
