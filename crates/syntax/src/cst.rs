//! Typed views over [`SyntaxNode`]s.

use rowan::ast::AstNode;

use crate::{SyntaxKind, SyntaxNode, SyntaxToken, TokenSet};

#[macro_use]
mod macros;

const MODIFIER_KEYWORDS: TokenSet = TokenSet::new(&[
    SyntaxKind::EXPORT,
    SyntaxKind::PRIVATE,
    SyntaxKind::PROTECTED,
    SyntaxKind::PUBLIC,
    SyntaxKind::READONLY,
    SyntaxKind::STATIC,
]);

const DECLARATION_KEYWORDS: TokenSet =
    TokenSet::new(&[SyntaxKind::CONST, SyntaxKind::LET, SyntaxKind::VAR]);

fn direct_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    node.children_with_tokens().filter_map(|element| element.into_token())
}

cst_nodes!(SourceFile, Modifier, Name, VariableDeclaration, ParameterList, Parameter, EnumMember);

cst_union!(Statement {
    VariableStatement,
    FunctionDeclaration,
    ClassDeclaration,
    EnumDeclaration,
    NamespaceDeclaration,
    Block,
    ExpressionStatement,
    ReturnStatement,
    IfStatement,
});

cst_union!(ClassMember { PropertyDeclaration, MethodDeclaration });

cst_union!(Expression {
    NameExpression,
    LiteralExpression,
    CallExpression,
    ParenthesizedExpression,
    BinaryExpression,
});

cst_accessors!(SourceFile {
    statements -> children Statement,
});

cst_accessors!(Modifier {
    keyword -> token_in MODIFIER_KEYWORDS,
    keyword_kind -> kind_in MODIFIER_KEYWORDS,
});

cst_accessors!(Name {
    identifier -> token IDENTIFIER,
});

cst_accessors!(VariableStatement {
    modifiers -> children Modifier,
    keyword -> token_in DECLARATION_KEYWORDS,
    declarations -> children VariableDeclaration,
});

cst_accessors!(VariableDeclaration {
    name -> child Name,
    initializer -> child Expression,
});

cst_accessors!(FunctionDeclaration {
    modifiers -> children Modifier,
    name -> child Name,
    parameter_list -> child ParameterList,
    body -> child Block,
});

cst_accessors!(ParameterList {
    parameters -> children Parameter,
    commas -> tokens COMMA,
});

cst_accessors!(Parameter {
    name -> child Name,
});

cst_accessors!(ClassDeclaration {
    modifiers -> children Modifier,
    name -> child Name,
    members -> children ClassMember,
    left_curly -> token LEFT_CURLY,
    right_curly -> token RIGHT_CURLY,
});

cst_accessors!(PropertyDeclaration {
    modifiers -> children Modifier,
    name -> child Name,
});

cst_accessors!(MethodDeclaration {
    modifiers -> children Modifier,
    name -> child Name,
    body -> child Block,
});

cst_accessors!(EnumDeclaration {
    modifiers -> children Modifier,
    name -> child Name,
    members -> children EnumMember,
    commas -> tokens COMMA,
    left_curly -> token LEFT_CURLY,
    right_curly -> token RIGHT_CURLY,
});

cst_accessors!(EnumMember {
    name -> child Name,
    initializer -> child Expression,
});

cst_accessors!(NamespaceDeclaration {
    modifiers -> children Modifier,
    name -> child Name,
    body -> child Block,
});

cst_accessors!(Block {
    statements -> children Statement,
    left_curly -> token LEFT_CURLY,
    right_curly -> token RIGHT_CURLY,
});
