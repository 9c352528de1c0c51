mod lexed;
mod lexer;

pub use lexed::{LexError, Lexed};
use syntax::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Default for Position {
    fn default() -> Position {
        Position { offset: 0, line: 1, column: 1 }
    }
}

pub fn lex(source: &str) -> Lexed<'_> {
    let mut lexer = lexer::Lexer::new(source);
    while !lexer.is_eof() {
        lexer.take_token();
    }
    lexer.finish()
}

/// Returns the significant tokens consumed by the parser.
pub fn tokens(lexed: &Lexed) -> Vec<SyntaxKind> {
    (0..lexed.len())
        .map(|index| lexed.kind(index))
        .filter(|kind| !kind.is_whitespace_or_comment())
        .collect()
}
