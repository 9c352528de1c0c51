use syntax::SyntaxKind;

use super::{
    LIST_RECOVERY, Parser, expressions, modifiers, name, statements::block, type_annotation,
};

pub(super) fn variable_statement(p: &mut Parser) {
    p.consume();
    loop {
        variable_declaration(p);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.eat(SyntaxKind::SEMICOLON);
}

fn variable_declaration(p: &mut Parser) {
    let mut marker = p.start();

    name(p);
    type_annotation(p);
    if p.eat(SyntaxKind::EQUALS) {
        expressions::expression(p);
    }

    marker.end(p, SyntaxKind::VariableDeclaration);
}

pub(super) fn function_declaration(p: &mut Parser) {
    p.consume();
    name(p);
    signature_and_body(p);
}

fn signature_and_body(p: &mut Parser) {
    if p.at(SyntaxKind::LEFT_PARENTHESIS) {
        parameter_list(p);
    } else {
        p.error("expected a parameter list");
    }

    type_annotation(p);

    if p.at(SyntaxKind::LEFT_CURLY) {
        block(p);
    } else {
        p.expect(SyntaxKind::SEMICOLON);
    }
}

fn parameter_list(p: &mut Parser) {
    let mut marker = p.start();

    p.consume();
    while !p.at(SyntaxKind::RIGHT_PARENTHESIS) && !p.at_eof() {
        if p.at(SyntaxKind::IDENTIFIER) {
            let mut parameter = p.start();
            name(p);
            type_annotation(p);
            parameter.end(p, SyntaxKind::Parameter);
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
            continue;
        }
        if p.at_in(LIST_RECOVERY) {
            break;
        }
        p.error_recover("unexpected token in parameter list");
    }
    p.expect(SyntaxKind::RIGHT_PARENTHESIS);

    marker.end(p, SyntaxKind::ParameterList);
}

pub(super) fn class_declaration(p: &mut Parser) {
    p.consume();
    name(p);

    if !p.at(SyntaxKind::LEFT_CURLY) {
        return p.error("expected a class body");
    }

    p.consume();
    while !p.at(SyntaxKind::RIGHT_CURLY) && !p.at_eof() {
        class_member(p);
    }
    p.expect(SyntaxKind::RIGHT_CURLY);
}

fn class_member(p: &mut Parser) {
    let mut marker = p.start();
    let has_modifiers = modifiers(p);

    if p.at(SyntaxKind::IDENTIFIER) {
        name(p);
        if p.at(SyntaxKind::LEFT_PARENTHESIS) {
            signature_and_body(p);
            marker.end(p, SyntaxKind::MethodDeclaration);
        } else {
            type_annotation(p);
            if p.eat(SyntaxKind::EQUALS) {
                expressions::expression(p);
            }
            p.eat(SyntaxKind::SEMICOLON);
            marker.end(p, SyntaxKind::PropertyDeclaration);
        }
    } else if has_modifiers {
        p.error("expected a member name");
        marker.end(p, SyntaxKind::ERROR);
    } else {
        marker.cancel(p);
        p.error_recover("unexpected token in class body");
    }
}

pub(super) fn enum_declaration(p: &mut Parser) {
    p.consume();
    name(p);

    if !p.at(SyntaxKind::LEFT_CURLY) {
        return p.error("expected an enum body");
    }

    p.consume();
    while !p.at(SyntaxKind::RIGHT_CURLY) && !p.at_eof() {
        if p.at(SyntaxKind::IDENTIFIER) {
            let mut member = p.start();
            name(p);
            if p.eat(SyntaxKind::EQUALS) {
                expressions::expression(p);
            }
            member.end(p, SyntaxKind::EnumMember);
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
            continue;
        }
        p.error_recover("expected an enum member");
    }
    p.expect(SyntaxKind::RIGHT_CURLY);
}

pub(super) fn namespace_declaration(p: &mut Parser) {
    p.consume();
    name(p);

    if p.at(SyntaxKind::LEFT_CURLY) {
        block(p);
    } else {
        p.error("expected a namespace body");
    }
}
