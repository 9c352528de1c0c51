use syntax::{SyntaxKind, TokenSet};

use super::{LIST_RECOVERY, Parser, name};

pub(super) const EXPRESSION_START: TokenSet = TokenSet::new(&[
    SyntaxKind::IDENTIFIER,
    SyntaxKind::NUMBER,
    SyntaxKind::STRING,
    SyntaxKind::LEFT_PARENTHESIS,
    SyntaxKind::MINUS,
]);

const BINARY_OPERATOR: TokenSet = TokenSet::new(&[
    SyntaxKind::PLUS,
    SyntaxKind::MINUS,
    SyntaxKind::STAR,
    SyntaxKind::SLASH,
    SyntaxKind::DOT,
    SyntaxKind::EQUALS,
]);

/// Operator chains are kept flat, `a + b * c` is a single [`SyntaxKind::BinaryExpression`].
pub(super) fn expression(p: &mut Parser) {
    if !p.at_in(EXPRESSION_START) {
        return p.error("expected an expression");
    }

    let mut marker = p.start();
    atom(p);

    let mut binary = false;
    while p.at_in(BINARY_OPERATOR) {
        p.consume();
        binary = true;
        if !p.at_in(EXPRESSION_START) {
            p.error("expected an expression");
            break;
        }
        atom(p);
    }

    if binary {
        marker.end(p, SyntaxKind::BinaryExpression);
    } else {
        marker.cancel(p);
    }
}

fn atom(p: &mut Parser) {
    match p.nth(0) {
        SyntaxKind::IDENTIFIER => {
            let mut call = p.start();

            let mut marker = p.start();
            name(p);
            marker.end(p, SyntaxKind::NameExpression);

            if p.at(SyntaxKind::LEFT_PARENTHESIS) {
                argument_list(p);
                call.end(p, SyntaxKind::CallExpression);
            } else {
                call.cancel(p);
            }
        }
        SyntaxKind::NUMBER | SyntaxKind::STRING => {
            let mut marker = p.start();
            p.consume();
            marker.end(p, SyntaxKind::LiteralExpression);
        }
        SyntaxKind::MINUS => {
            let mut marker = p.start();
            p.consume();
            p.expect(SyntaxKind::NUMBER);
            marker.end(p, SyntaxKind::LiteralExpression);
        }
        SyntaxKind::LEFT_PARENTHESIS => {
            let mut marker = p.start();
            p.consume();
            expression(p);
            p.expect(SyntaxKind::RIGHT_PARENTHESIS);
            marker.end(p, SyntaxKind::ParenthesizedExpression);
        }
        _ => p.error("expected an expression"),
    }
}

fn argument_list(p: &mut Parser) {
    let mut marker = p.start();

    p.consume();
    while !p.at(SyntaxKind::RIGHT_PARENTHESIS) && !p.at_eof() {
        if p.at_in(EXPRESSION_START) {
            expression(p);
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
            continue;
        }
        if p.at_in(LIST_RECOVERY) {
            break;
        }
        p.error_recover("unexpected token in argument list");
    }
    p.expect(SyntaxKind::RIGHT_PARENTHESIS);

    marker.end(p, SyntaxKind::ArgumentList);
}
