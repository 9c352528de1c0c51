use drop_bomb::DropBomb;
use syntax::{SyntaxKind, TokenSet};

use crate::builder::Output;

mod declarations;
mod expressions;
mod statements;

pub(crate) use statements::source_file;

pub(crate) struct Parser<'t> {
    index: usize,
    tokens: &'t [SyntaxKind],
    output: Vec<Output>,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(tokens: &'t [SyntaxKind]) -> Parser<'t> {
        let index = 0;
        let output = vec![];
        Parser { index, tokens, output }
    }

    pub(crate) fn finish(self) -> Vec<Output> {
        self.output
    }

    fn nth(&self, index: usize) -> SyntaxKind {
        self.tokens.get(self.index + index).copied().unwrap_or(SyntaxKind::END_OF_FILE)
    }

    fn consume(&mut self) {
        let kind = self.tokens[self.index];
        self.index += 1;
        self.output.push(Output::Token { kind });
    }

    fn start(&mut self) -> NodeMarker {
        let index = self.output.len();
        self.output.push(Output::Start { kind: SyntaxKind::Node });
        NodeMarker::new(index)
    }

    fn error(&mut self, message: impl Into<String>) {
        self.output.push(Output::Error { message: message.into() });
    }

    fn error_recover(&mut self, message: impl Into<String>) {
        let mut marker = self.start();
        self.error(message);
        self.consume();
        marker.end(self, SyntaxKind::ERROR);
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.nth(0) == kind
    }

    fn at_eof(&self) -> bool {
        self.at(SyntaxKind::END_OF_FILE)
    }

    fn at_in(&self, set: TokenSet) -> bool {
        set.contains(self.nth(0))
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if !self.at(kind) {
            return false;
        }
        self.consume();
        true
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error(format!("expected {:?}", kind));
        false
    }
}

struct NodeMarker {
    index: usize,
    bomb: DropBomb,
}

impl NodeMarker {
    fn new(index: usize) -> NodeMarker {
        let bomb = DropBomb::new("failed to call end or cancel");
        NodeMarker { index, bomb }
    }

    fn end(&mut self, parser: &mut Parser, kind: SyntaxKind) {
        self.bomb.defuse();
        match &mut parser.output[self.index] {
            Output::Start { kind: marker } => {
                *marker = kind;
            }
            _ => unreachable!(),
        }
        parser.output.push(Output::Finish);
    }

    /// Abandons the marker; a [`SyntaxKind::Node`] left behind is skipped by the builder.
    fn cancel(&mut self, parser: &mut Parser) {
        self.bomb.defuse();
        if self.index == parser.output.len() - 1 {
            match parser.output.pop() {
                Some(Output::Start { kind: SyntaxKind::Node }) => (),
                _ => unreachable!(),
            }
        }
    }
}

const MODIFIER_START: TokenSet = TokenSet::new(&[
    SyntaxKind::EXPORT,
    SyntaxKind::PRIVATE,
    SyntaxKind::PROTECTED,
    SyntaxKind::PUBLIC,
    SyntaxKind::READONLY,
    SyntaxKind::STATIC,
]);

const LIST_RECOVERY: TokenSet =
    TokenSet::new(&[SyntaxKind::SEMICOLON, SyntaxKind::LEFT_CURLY, SyntaxKind::RIGHT_CURLY]);

fn modifiers(p: &mut Parser) -> bool {
    let mut any = false;
    while p.at_in(MODIFIER_START) {
        let mut marker = p.start();
        p.consume();
        marker.end(p, SyntaxKind::Modifier);
        any = true;
    }
    any
}

fn name(p: &mut Parser) {
    if !p.at(SyntaxKind::IDENTIFIER) {
        return p.error("expected a name");
    }
    let mut marker = p.start();
    p.consume();
    marker.end(p, SyntaxKind::Name);
}

fn type_annotation(p: &mut Parser) {
    if !p.at(SyntaxKind::COLON) {
        return;
    }

    let mut marker = p.start();
    p.consume();

    if p.at(SyntaxKind::IDENTIFIER) {
        let mut reference = p.start();
        p.consume();
        reference.end(p, SyntaxKind::TypeReference);
    } else {
        p.error("expected a type");
    }

    marker.end(p, SyntaxKind::TypeAnnotation);
}
