//! The core character-based lexer, inspired by `rustc_lexer`.

use std::str::Chars;

use syntax::SyntaxKind;

use crate::{Position, lexed::Lexed};

const EOF_CHAR: char = '\0';

pub(crate) struct Lexer<'s> {
    source: &'s str,
    chars: Chars<'s>,
    line: u32,
    column: u32,
    lexed: Lexed<'s>,
}

impl<'s> Lexer<'s> {
    pub(crate) fn new(source: &'s str) -> Lexer<'s> {
        let chars = source.chars();
        let line = 1;
        let column = 1;
        let lexed = Lexed::new(source);
        Lexer { source, chars, line, column, lexed }
    }

    pub(crate) fn finish(mut self) -> Lexed<'s> {
        let position = self.position();
        self.lexed.push(SyntaxKind::END_OF_FILE, position, None);
        self.lexed
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    fn consumed(&self) -> usize {
        self.source.len() - self.chars.as_str().len()
    }

    fn position(&self) -> Position {
        let offset = self.consumed();
        let line = self.line;
        let column = self.column;
        Position { offset, line, column }
    }

    fn first(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }

    fn second(&self) -> char {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next().unwrap_or(EOF_CHAR)
    }

    fn take(&mut self) -> char {
        let result = self.chars.next().unwrap_or(EOF_CHAR);
        if result == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        result
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) {
        while predicate(self.first()) && !self.is_eof() {
            self.take();
        }
    }
}

impl Lexer<'_> {
    pub(crate) fn take_token(&mut self) {
        match self.first() {
            '/' if self.second() == '/' => self.take_line_comment(),
            '/' if self.second() == '*' => self.take_block_comment(),

            '{' => self.take_single(SyntaxKind::LEFT_CURLY),
            '}' => self.take_single(SyntaxKind::RIGHT_CURLY),
            '(' => self.take_single(SyntaxKind::LEFT_PARENTHESIS),
            ')' => self.take_single(SyntaxKind::RIGHT_PARENTHESIS),

            ';' => self.take_single(SyntaxKind::SEMICOLON),
            ':' => self.take_single(SyntaxKind::COLON),
            ',' => self.take_single(SyntaxKind::COMMA),
            '.' if !self.second().is_ascii_digit() => self.take_single(SyntaxKind::DOT),
            '=' => self.take_single(SyntaxKind::EQUALS),
            '+' => self.take_single(SyntaxKind::PLUS),
            '-' => self.take_single(SyntaxKind::MINUS),
            '*' => self.take_single(SyntaxKind::STAR),
            '/' => self.take_single(SyntaxKind::SLASH),

            '"' | '\'' => self.take_string(),

            i => {
                if is_identifier_start(i) {
                    self.take_identifier_or_keyword();
                } else if i.is_ascii_digit() || i == '.' {
                    self.take_number();
                } else if i.is_whitespace() {
                    self.take_whitespace();
                } else {
                    self.take_unknown();
                }
            }
        }
    }

    #[inline]
    fn take_single(&mut self, kind: SyntaxKind) {
        let position = self.position();
        self.take();
        self.lexed.push(kind, position, None)
    }

    #[inline]
    fn take_identifier_or_keyword(&mut self) {
        let position @ Position { offset, .. } = self.position();
        self.take_while(is_identifier_part);
        let end_offset = self.consumed();
        let text = &self.source[offset..end_offset];
        let kind = SyntaxKind::from_keyword(text).unwrap_or(SyntaxKind::IDENTIFIER);
        self.lexed.push(kind, position, None)
    }

    #[inline]
    fn take_number(&mut self) {
        let position = self.position();

        self.take_while(|c| c.is_ascii_digit() || c == '_');
        if self.first() == '.' && self.second().is_ascii_digit() {
            self.take();
            self.take_while(|c| c.is_ascii_digit() || c == '_');
        }

        let error = if is_identifier_start(self.first()) {
            self.take_while(is_identifier_part);
            Some("invalid numeric literal")
        } else {
            None
        };

        self.lexed.push(SyntaxKind::NUMBER, position, error);
    }

    #[inline]
    fn take_string(&mut self) {
        let position = self.position();
        let quote = self.take();

        let mut error = None;
        loop {
            match self.first() {
                '\\' => {
                    self.take();
                    self.take();
                }
                c if c == quote => {
                    self.take();
                    break;
                }
                '\n' | '\r' => {
                    error = Some("unterminated string literal");
                    break;
                }
                _ if self.is_eof() => {
                    error = Some("unterminated string literal");
                    break;
                }
                _ => {
                    self.take();
                }
            }
        }

        self.lexed.push(SyntaxKind::STRING, position, error);
    }

    #[inline]
    fn take_whitespace(&mut self) {
        let position = self.position();
        self.take_while(|c| c.is_whitespace());
        self.lexed.push(SyntaxKind::WHITESPACE, position, None)
    }

    #[inline]
    fn take_line_comment(&mut self) {
        let position = self.position();
        assert_eq!(self.take(), '/');
        assert_eq!(self.take(), '/');
        self.take_while(|c| c != '\n' && c != '\r');
        self.lexed.push(SyntaxKind::LINE_COMMENT, position, None)
    }

    #[inline]
    fn take_block_comment(&mut self) {
        let position = self.position();
        assert_eq!(self.take(), '/');
        assert_eq!(self.take(), '*');
        let error = loop {
            if self.is_eof() {
                break Some("unterminated block comment");
            }
            if self.first() == '*' && self.second() == '/' {
                self.take();
                self.take();
                break None;
            }
            self.take();
        };
        self.lexed.push(SyntaxKind::BLOCK_COMMENT, position, error)
    }

    #[inline]
    fn take_unknown(&mut self) {
        let position = self.position();
        self.take();
        self.lexed.push(SyntaxKind::UNKNOWN, position, Some("unexpected character"))
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
