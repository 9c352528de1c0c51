//! Pure text transforms, each describing a single edit.
//!
//! A [`TextManipulator`] never touches nodes. It computes an [`EditRequest`]
//! against the current text, which the document then replays through the
//! re-parse and reconciliation pipeline. Coordinates are validated by the
//! caller before a manipulator is constructed.

use syntax::{TextRange, TextSize};

use crate::{IndentationText, NewLineKind};

const CONTEXT: usize = 30;

/// A single contiguous replacement in the document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub position: TextSize,
    pub removed_len: TextSize,
    pub inserted_text: String,
}

impl EditRequest {
    pub fn old_range(&self) -> TextRange {
        TextRange::at(self.position, self.removed_len)
    }

    pub fn new_range(&self) -> TextRange {
        TextRange::at(self.position, TextSize::of(self.inserted_text.as_str()))
    }

    pub fn delta(&self) -> i64 {
        i64::from(u32::from(self.new_range().len())) - i64::from(u32::from(self.removed_len))
    }

    pub fn is_empty(&self) -> bool {
        self.removed_len == TextSize::from(0) && self.inserted_text.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        let range = self.old_range();
        let mut result = String::with_capacity(text.len() + self.inserted_text.len());
        result.push_str(&text[..usize::from(range.start())]);
        result.push_str(&self.inserted_text);
        result.push_str(&text[usize::from(range.end())..]);
        result
    }
}

pub trait TextManipulator {
    fn edit(&self, text: &str) -> EditRequest;

    /// The offset around which the edit takes place.
    fn position(&self) -> TextSize;

    fn manipulate(&self, text: &str) -> String {
        self.edit(text).apply(text)
    }

    /// Renders the new text around the edit, with `<|>` marking the position.
    fn describe_edit_for_error(&self, new_text: &str) -> String {
        let mut position = usize::from(self.position()).min(new_text.len());
        while !new_text.is_char_boundary(position) {
            position -= 1;
        }

        let mut low = position.saturating_sub(CONTEXT);
        while !new_text.is_char_boundary(low) {
            low -= 1;
        }

        let mut high = (position + CONTEXT).min(new_text.len());
        while !new_text.is_char_boundary(high) {
            high += 1;
        }

        let before = &new_text[low..position];
        let after = &new_text[position..high];
        format!("at offset {position}: {:?}", format!("{before}<|>{after}"))
    }
}

/// Inserts text, optionally replacing what was at the position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub position: TextSize,
    pub replacing_len: TextSize,
    pub text: String,
}

impl Insertion {
    pub fn insert(position: TextSize, text: impl Into<String>) -> Insertion {
        let replacing_len = TextSize::from(0);
        Insertion { position, replacing_len, text: text.into() }
    }

    pub fn replace(range: TextRange, text: impl Into<String>) -> Insertion {
        Insertion { position: range.start(), replacing_len: range.len(), text: text.into() }
    }
}

impl TextManipulator for Insertion {
    fn edit(&self, _: &str) -> EditRequest {
        let position = self.position;
        let removed_len = self.replacing_len;
        let inserted_text = self.text.clone();
        EditRequest { position, removed_len, inserted_text }
    }

    fn position(&self) -> TextSize {
        self.position
    }
}

/// Which whitespace runs next to the removed span are removed with it.
///
/// Spaces are trimmed before newlines on both sides.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrimOptions {
    pub preceding_spaces: bool,
    pub preceding_newlines: bool,
    pub following_spaces: bool,
    pub following_newlines: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveChildren {
    pub range: TextRange,
    pub trim: TrimOptions,
    pub replacement: Option<String>,
}

impl RemoveChildren {
    pub fn new(range: TextRange, trim: TrimOptions) -> RemoveChildren {
        RemoveChildren { range, trim, replacement: None }
    }

    fn trimmed_range(&self, text: &str) -> TextRange {
        let bytes = text.as_bytes();
        let mut start = usize::from(self.range.start());
        let mut end = usize::from(self.range.end());

        if self.trim.preceding_spaces {
            while start > 0 && is_space(bytes[start - 1]) {
                start -= 1;
            }
        }
        if self.trim.preceding_newlines {
            while start > 0 && is_newline(bytes[start - 1]) {
                start -= 1;
            }
        }
        if self.trim.following_spaces {
            while end < bytes.len() && is_space(bytes[end]) {
                end += 1;
            }
        }
        if self.trim.following_newlines {
            while end < bytes.len() && is_newline(bytes[end]) {
                end += 1;
            }
        }

        TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
    }
}

impl TextManipulator for RemoveChildren {
    fn edit(&self, text: &str) -> EditRequest {
        let range = self.trimmed_range(text);
        let position = range.start();
        let removed_len = range.len();
        let inserted_text = self.replacement.clone().unwrap_or_default();
        EditRequest { position, removed_len, inserted_text }
    }

    fn position(&self) -> TextSize {
        self.range.start()
    }
}

/// Replaces a construct with the de-indented contents of its braced body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unwrap {
    pub range: TextRange,
    /// The text between the braces, exclusive.
    pub body: TextRange,
    pub indentation: IndentationText,
    pub new_line: NewLineKind,
}

impl Unwrap {
    fn contents(&self, text: &str) -> String {
        let body = &text[self.body];

        let body = body.trim_start_matches([' ', '\t']);
        let body = body.strip_prefix("\r\n").or_else(|| body.strip_prefix('\n')).unwrap_or(body);
        let body = body.trim_end();

        let width = self.indentation.width();
        let lines: Vec<&str> = body.lines().map(|line| dedent(line, width)).collect();

        let mut contents = lines.join(self.new_line.as_str());
        let leading = contents.len() - contents.trim_start_matches([' ', '\t']).len();
        contents.drain(..leading);
        contents
    }
}

impl TextManipulator for Unwrap {
    fn edit(&self, text: &str) -> EditRequest {
        let position = self.range.start();
        let removed_len = self.range.len();
        let inserted_text = self.contents(text);
        EditRequest { position, removed_len, inserted_text }
    }

    fn position(&self) -> TextSize {
        self.range.start()
    }
}

fn dedent(line: &str, width: usize) -> &str {
    let mut columns = 0;
    let mut index = 0;
    for byte in line.bytes() {
        if columns >= width {
            break;
        }
        match byte {
            b' ' => columns += 1,
            b'\t' => columns = width,
            _ => break,
        }
        index += 1;
    }
    &line[index..]
}

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t')
}

fn is_newline(byte: u8) -> bool {
    matches!(byte, b'\n' | b'\r')
}
