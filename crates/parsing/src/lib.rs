use std::sync::Arc;

use lexing::{Lexed, Position};
use rowan::{GreenNode, ast::AstNode};
use syntax::{SyntaxKind, SyntaxNode, cst};

mod builder;
mod parser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub offset: usize,
    pub position: Position,
    pub message: Arc<str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSource {
    node: GreenNode,
}

impl ParsedSource {
    pub fn new(node: GreenNode) -> ParsedSource {
        ParsedSource { node }
    }

    pub fn green(&self) -> &GreenNode {
        &self.node
    }

    pub fn syntax_node(&self) -> SyntaxNode {
        let node = self.node.clone();
        SyntaxNode::new_root(node)
    }

    pub fn cst(&self) -> cst::SourceFile {
        let node = self.syntax_node();
        cst::SourceFile::cast(node).expect("invariant violated: expected cst::SourceFile")
    }
}

pub type FullParsedSource = (ParsedSource, Arc<[ParseError]>);

pub fn parse(lexed: &Lexed<'_>, tokens: &[SyntaxKind]) -> FullParsedSource {
    let mut parser = parser::Parser::new(tokens);
    parser::source_file(&mut parser);

    let output = parser.finish();
    let (parsed, errors) = builder::build(lexed, output);

    (parsed, Arc::from(errors))
}

/// Lexes and parses `source` in one step.
pub fn parse_source(source: &str) -> FullParsedSource {
    let lexed = lexing::lex(source);
    let tokens = lexing::tokens(&lexed);
    parse(&lexed, &tokens)
}

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use rowan::NodeOrToken;
    use syntax::{SyntaxElement, SyntaxKind, cst};

    fn dump(source: &str) -> String {
        fn go(output: &mut String, depth: usize, element: SyntaxElement) {
            let indent = depth * 2;
            match element {
                NodeOrToken::Node(node) => {
                    writeln!(output, "{:indent$}{:?}@{:?}", "", node.kind(), node.text_range()).unwrap();
                    for child in node.children_with_tokens() {
                        go(output, depth + 1, child);
                    }
                }
                NodeOrToken::Token(token) => {
                    writeln!(
                        output,
                        "{:indent$}{:?}@{:?} {:?}",
                        "",
                        token.kind(),
                        token.text_range(),
                        token.text()
                    )
                    .unwrap();
                }
            }
        }

        let (parsed, _) = crate::parse_source(source);
        let mut output = String::new();
        go(&mut output, 0, parsed.syntax_node().into());
        output
    }

    #[test]
    fn property_declaration() {
        insta::assert_snapshot!(dump("class C {\n  private prop: string;\n}"), @r#"
        SourceFile@0..35
          ClassDeclaration@0..35
            CLASS@0..5 "class"
            WHITESPACE@5..6 " "
            Name@6..7
              IDENTIFIER@6..7 "C"
            WHITESPACE@7..8 " "
            LEFT_CURLY@8..9 "{"
            WHITESPACE@9..12 "\n  "
            PropertyDeclaration@12..33
              Modifier@12..19
                PRIVATE@12..19 "private"
              WHITESPACE@19..20 " "
              Name@20..24
                IDENTIFIER@20..24 "prop"
              TypeAnnotation@24..32
                COLON@24..25 ":"
                WHITESPACE@25..26 " "
                TypeReference@26..32
                  IDENTIFIER@26..32 "string"
              SEMICOLON@32..33 ";"
            WHITESPACE@33..34 "\n"
            RIGHT_CURLY@34..35 "}"
        "#);
    }

    #[test]
    fn leading_trivia_belongs_to_the_parent() {
        insta::assert_snapshot!(dump("// c\nf(1);\n"), @r#"
        SourceFile@0..11
          LINE_COMMENT@0..4 "// c"
          WHITESPACE@4..5 "\n"
          ExpressionStatement@5..10
            CallExpression@5..9
              NameExpression@5..6
                Name@5..6
                  IDENTIFIER@5..6 "f"
              ArgumentList@6..9
                LEFT_PARENTHESIS@6..7 "("
                LiteralExpression@7..8
                  NUMBER@7..8 "1"
                RIGHT_PARENTHESIS@8..9 ")"
            SEMICOLON@9..10 ";"
          WHITESPACE@10..11 "\n"
        "#);
    }

    #[test]
    fn stray_tokens_are_recovered() {
        let (parsed, errors) = crate::parse_source("export\n}");
        assert_eq!(parsed.syntax_node().to_string(), "export\n}");

        let errors: Vec<_> = errors.iter().map(|error| (error.offset, &*error.message)).collect();
        assert_eq!(
            errors,
            vec![(7, "expected a declaration after modifiers"), (7, "unexpected token")]
        );
    }

    #[test]
    fn lexical_errors_are_reported() {
        let (_, errors) = crate::parse_source("let s = 'abc\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].offset, 8);
        assert_eq!(errors[0].position.line, 1);
        assert_eq!(&*errors[0].message, "unterminated string literal");
    }

    #[test]
    fn typed_views() {
        let (parsed, errors) =
            crate::parse_source("function f(a: number): void { return a + 1; }");
        assert!(errors.is_empty());

        let statements: Vec<_> = parsed.cst().statements().collect();
        assert_eq!(statements.len(), 1);

        let cst::Statement::FunctionDeclaration(function) = &statements[0] else {
            panic!("expected a function declaration");
        };

        let name = function.name().and_then(|name| name.identifier()).unwrap();
        assert_eq!(name.text(), "f");
        assert_eq!(function.parameter_list().unwrap().parameters().count(), 1);

        let body: Vec<_> = function.body().unwrap().statements().collect();
        assert!(matches!(body[..], [cst::Statement::ReturnStatement(_)]));
    }

    #[test]
    fn enum_members_and_commas() {
        let (parsed, errors) = crate::parse_source("enum E { A, B = 2, }");
        assert!(errors.is_empty());

        let Some(cst::Statement::EnumDeclaration(declaration)) = parsed.cst().statements().next()
        else {
            panic!("expected an enum declaration");
        };
        assert_eq!(declaration.members().count(), 2);
        assert_eq!(declaration.commas().count(), 2);
    }

    #[test]
    fn modifier_and_declaration_keywords() {
        let (parsed, errors) = crate::parse_source("export const a = 1, b = f(a);");
        assert!(errors.is_empty());

        let Some(cst::Statement::VariableStatement(statement)) = parsed.cst().statements().next()
        else {
            panic!("expected a variable statement");
        };

        let modifiers: Vec<_> =
            statement.modifiers().filter_map(|modifier| modifier.keyword_kind()).collect();
        assert_eq!(modifiers, [SyntaxKind::EXPORT]);
        assert_eq!(statement.keyword().map(|keyword| keyword.kind()), Some(SyntaxKind::CONST));

        let initializers: Vec<_> =
            statement.declarations().filter_map(|declaration| declaration.initializer()).collect();
        assert!(matches!(
            initializers[..],
            [cst::Expression::LiteralExpression(_), cst::Expression::CallExpression(_)]
        ));
    }
}
