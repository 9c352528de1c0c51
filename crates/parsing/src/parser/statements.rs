use syntax::SyntaxKind;

use super::{Parser, declarations, expressions, modifiers};

pub(crate) fn source_file(p: &mut Parser) {
    while !p.at_eof() {
        statement(p);
    }
}

/// Parses a single statement, always consuming at least one token.
pub(super) fn statement(p: &mut Parser) {
    let mut marker = p.start();
    let has_modifiers = modifiers(p);

    match p.nth(0) {
        SyntaxKind::CONST | SyntaxKind::LET | SyntaxKind::VAR => {
            declarations::variable_statement(p);
            marker.end(p, SyntaxKind::VariableStatement);
        }
        SyntaxKind::FUNCTION => {
            declarations::function_declaration(p);
            marker.end(p, SyntaxKind::FunctionDeclaration);
        }
        SyntaxKind::CLASS => {
            declarations::class_declaration(p);
            marker.end(p, SyntaxKind::ClassDeclaration);
        }
        SyntaxKind::ENUM => {
            declarations::enum_declaration(p);
            marker.end(p, SyntaxKind::EnumDeclaration);
        }
        SyntaxKind::NAMESPACE => {
            declarations::namespace_declaration(p);
            marker.end(p, SyntaxKind::NamespaceDeclaration);
        }
        _ if has_modifiers => {
            p.error("expected a declaration after modifiers");
            marker.end(p, SyntaxKind::ERROR);
        }
        SyntaxKind::LEFT_CURLY => {
            marker.cancel(p);
            block(p);
        }
        SyntaxKind::RETURN => {
            p.consume();
            if p.at_in(expressions::EXPRESSION_START) {
                expressions::expression(p);
            }
            p.eat(SyntaxKind::SEMICOLON);
            marker.end(p, SyntaxKind::ReturnStatement);
        }
        SyntaxKind::IF => {
            if_statement(p);
            marker.end(p, SyntaxKind::IfStatement);
        }
        _ if p.at_in(expressions::EXPRESSION_START) => {
            expressions::expression(p);
            p.eat(SyntaxKind::SEMICOLON);
            marker.end(p, SyntaxKind::ExpressionStatement);
        }
        _ => {
            marker.cancel(p);
            p.error_recover("unexpected token");
        }
    }
}

pub(super) fn block(p: &mut Parser) {
    let mut marker = p.start();

    p.expect(SyntaxKind::LEFT_CURLY);
    while !p.at(SyntaxKind::RIGHT_CURLY) && !p.at_eof() {
        statement(p);
    }
    p.expect(SyntaxKind::RIGHT_CURLY);

    marker.end(p, SyntaxKind::Block);
}

fn if_statement(p: &mut Parser) {
    p.consume();

    p.expect(SyntaxKind::LEFT_PARENTHESIS);
    expressions::expression(p);
    p.expect(SyntaxKind::RIGHT_PARENTHESIS);

    branch(p);
    if p.eat(SyntaxKind::ELSE) {
        branch(p);
    }
}

fn branch(p: &mut Parser) {
    if p.at(SyntaxKind::RIGHT_CURLY) || p.at_eof() {
        return p.error("expected a statement");
    }
    statement(p);
}
