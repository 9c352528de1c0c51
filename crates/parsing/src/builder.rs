//! Implements the [`GreenNode`] builder.
//!
//! [`GreenNode`]: rowan::GreenNode

use std::sync::Arc;

use lexing::Lexed;
use rowan::GreenNodeBuilder;
use syntax::SyntaxKind;

use crate::{ParseError, ParsedSource};

#[derive(Debug)]
pub(crate) enum Output {
    Start { kind: SyntaxKind },
    Token { kind: SyntaxKind },
    Error { message: String },
    Finish,
}

struct Builder<'l, 's> {
    lexed: &'l Lexed<'s>,
    index: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

impl<'l, 's> Builder<'l, 's> {
    fn new(lexed: &'l Lexed<'s>) -> Builder<'l, 's> {
        let index = 0;
        let mut builder = GreenNodeBuilder::new();
        builder.start_node(SyntaxKind::SourceFile.into());
        let errors = vec![];
        Builder { lexed, index, builder, errors }
    }

    fn build(mut self) -> (ParsedSource, Vec<ParseError>) {
        while !self.is_eof() {
            let kind = self.lexed.kind(self.index);
            self.eat_token(kind);
        }
        self.builder.finish_node();
        let node = self.builder.finish();
        (ParsedSource::new(node), self.errors)
    }

    fn is_eof(&self) -> bool {
        self.index >= self.lexed.len()
    }

    fn eat_token(&mut self, kind: SyntaxKind) {
        if let Some(message) = self.lexed.error(self.index) {
            let message = Arc::from(message);
            self.push_error(message);
        }
        let text = self.lexed.text(self.index);
        self.builder.token(kind.into(), text);
        self.index += 1;
    }

    fn eat_whitespace_or_comments(&mut self) {
        while !self.is_eof() {
            let kind = self.lexed.kind(self.index);
            if !kind.is_whitespace_or_comment() {
                break;
            }
            self.eat_token(kind);
        }
    }

    fn start(&mut self, kind: SyntaxKind) {
        if kind == SyntaxKind::Node {
            return;
        }
        self.eat_whitespace_or_comments();
        self.builder.start_node(kind.into());
    }

    fn token(&mut self, kind: SyntaxKind) {
        self.eat_whitespace_or_comments();
        debug_assert_eq!(self.lexed.kind(self.index), kind);
        self.eat_token(kind);
    }

    fn error(&mut self, message: Arc<str>) {
        self.eat_whitespace_or_comments();
        self.push_error(message);
    }

    fn push_error(&mut self, message: Arc<str>) {
        let position = self.lexed.position(self.index);
        let offset = position.offset;
        self.errors.push(ParseError { offset, position, message });
    }

    fn finish(&mut self) {
        self.builder.finish_node();
    }
}

pub(crate) fn build(lexed: &Lexed<'_>, output: Vec<Output>) -> (ParsedSource, Vec<ParseError>) {
    let mut builder = Builder::new(lexed);

    for event in output {
        match event {
            Output::Start { kind } => builder.start(kind),
            Output::Token { kind } => builder.token(kind),
            Output::Error { message } => builder.error(Arc::from(message)),
            Output::Finish => builder.finish(),
        }
    }

    builder.build()
}
