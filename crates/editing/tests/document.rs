mod common;

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use common::{assert_consistent, child, top_level, trace::capture_warnings};
use editing::{
    Document, EditError, IndentationText, ManipulationSettings, NewLineKind, Parsed,
    ReferenceParser, Scope, SourceParser, SyntaxKind, TextRange, TextSize,
};

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(TextSize::from(start), TextSize::from(end))
}

#[test]
fn removing_a_scope_keeps_the_member() {
    let mut document = Document::new("a.ts", "class C {\n    private prop: string;\n}\n");
    let class = top_level(&mut document, SyntaxKind::ClassDeclaration);
    let property = child(&mut document, class, SyntaxKind::PropertyDeclaration);
    let name = child(&mut document, property, SyntaxKind::Name);

    assert_eq!(document.scope(property), Ok(Some(Scope::Private)));
    document.set_scope(property, None).unwrap();

    assert_eq!(document.text(), "class C {\n    prop: string;\n}\n");
    assert_eq!(document.scope(property), Ok(None));

    let name = document.node(name).unwrap();
    assert_eq!(name.text(), "prop");
    assert_eq!(name.range(), range(14, 18));
    assert_consistent(&document);
}

#[test]
fn clearing_a_scope_on_one_line() {
    let mut document = Document::new("a.ts", "class C { private prop: string; }");
    let class = top_level(&mut document, SyntaxKind::ClassDeclaration);
    let property = child(&mut document, class, SyntaxKind::PropertyDeclaration);
    let prop = child(&mut document, property, SyntaxKind::Name);
    let before = document.node(prop).map(|prop| prop.start()).unwrap();

    document.set_scope(property, None).unwrap();
    assert_eq!(document.text(), "class C { prop: string; }");

    let after = document.node(prop).map(|prop| prop.start()).unwrap();
    assert_eq!(before - after, TextSize::from(8));
    assert_consistent(&document);
}

#[test]
fn adding_a_scope_goes_before_the_name() {
    let mut document = Document::new("a.ts", "class C {\n    prop: string;\n}\n");
    let class = top_level(&mut document, SyntaxKind::ClassDeclaration);
    let property = child(&mut document, class, SyntaxKind::PropertyDeclaration);
    let name = child(&mut document, property, SyntaxKind::Name);

    document.set_scope(property, Some(Scope::Protected)).unwrap();
    assert_eq!(document.text(), "class C {\n    protected prop: string;\n}\n");
    assert_eq!(document.node(name).map(|name| name.range()), Ok(range(24, 28)));

    document.set_scope(property, Some(Scope::Public)).unwrap();
    assert_eq!(document.text(), "class C {\n    public prop: string;\n}\n");
    assert_eq!(document.scope(property), Ok(Some(Scope::Public)));
    assert_consistent(&document);
}

#[test]
fn setting_the_current_scope_does_nothing() {
    let mut document = Document::new("a.ts", "class C {\n    private prop: string;\n}\n");
    let class = top_level(&mut document, SyntaxKind::ClassDeclaration);
    let property = child(&mut document, class, SyntaxKind::PropertyDeclaration);

    document.set_scope(property, Some(Scope::Private)).unwrap();
    assert_eq!(document.version(), 0);

    let mut unscoped = Document::new("b.ts", "class C {\n    prop: string;\n}\n");
    let class = top_level(&mut unscoped, SyntaxKind::ClassDeclaration);
    let property = child(&mut unscoped, class, SyntaxKind::PropertyDeclaration);
    unscoped.set_scope(property, None).unwrap();
    assert_eq!(unscoped.version(), 0);
}

#[test]
fn inserting_into_an_empty_enum() {
    let mut document = Document::new("a.ts", "enum E {\n}\n");
    let declaration = top_level(&mut document, SyntaxKind::EnumDeclaration);

    let m = document.insert_member(declaration, 0, "m").unwrap();
    assert_eq!(document.text(), "enum E {\n    m\n}\n");

    let member = document.node(m).unwrap();
    assert_eq!(member.kind(), SyntaxKind::EnumMember);
    assert_eq!(member.range(), range(13, 14));
    assert_eq!(member.parent(), Some(declaration));

    let n = document.insert_member(declaration, 1, "n").unwrap();
    let first = document.insert_member(declaration, 0, "first").unwrap();

    insta::assert_snapshot!(document.text(), @r"
    enum E {
        first,
        m,
        n
    }
    ");
    assert_eq!(document.node(m).map(|member| member.text()), Ok("m"));
    assert_eq!(document.node(n).map(|member| member.text()), Ok("n"));
    assert_eq!(document.node(first).map(|member| member.text()), Ok("first"));
    assert_consistent(&document);
}

#[test]
fn inserting_class_members() {
    let mut document = Document::new("a.ts", "class C {\n    a = 1;\n}\n");
    let class = top_level(&mut document, SyntaxKind::ClassDeclaration);

    let b = document.insert_member(class, 1, "b(): void {}").unwrap();
    assert_eq!(document.node(b).map(|member| member.kind()), Ok(SyntaxKind::MethodDeclaration));
    assert_eq!(document.text(), "class C {\n    a = 1;\n    b(): void {}\n}\n");

    let error = document.insert_member(class, 3, "c = 3;");
    assert!(matches!(error, Err(EditError::InvalidArgument(_))));
    assert_consistent(&document);
}

#[test]
fn removing_a_statement_forgets_it() {
    let mut document = Document::new("a.ts", "const a = 5;");
    let statement = top_level(&mut document, SyntaxKind::VariableStatement);

    document.remove(statement).unwrap();
    assert_eq!(document.text(), "");

    let Err(EditError::NodeForgotten { kind, text }) = document.node(statement) else {
        panic!("expected the statement to be forgotten");
    };
    assert_eq!(kind, SyntaxKind::VariableStatement);
    assert_eq!(text.as_str(), "const a = 5;");
    assert!(document.is_forgotten(statement));
    assert_eq!(document.last_known(statement).map(|known| known.text()), Some(text));
    assert_consistent(&document);
}

#[test]
fn remove_then_insert_restores_the_text() {
    let source = "class C {\n    a = 1;\n    b = 2;\n}\n";
    let mut document = Document::new("a.ts", source);
    let class = top_level(&mut document, SyntaxKind::ClassDeclaration);
    let a = child(&mut document, class, SyntaxKind::PropertyDeclaration);
    let members = document.children(class).unwrap();
    let b = members[2];

    document.remove(a).unwrap();
    assert_eq!(document.text(), "class C {\n    b = 2;\n}\n");
    assert_eq!(document.node(b).map(|member| member.range()), Ok(range(14, 20)));

    let a = document.insert_member(class, 0, "a = 1;").unwrap();
    assert_eq!(document.text(), source);
    assert_eq!(document.node(a).map(|member| member.range()), Ok(range(14, 20)));
    assert_eq!(document.node(b).map(|member| member.range()), Ok(range(25, 31)));
    assert_consistent(&document);
}

#[test]
fn removing_enum_members_takes_their_commas() {
    let mut document = Document::new("a.ts", "enum E { a, b, c }");
    let declaration = top_level(&mut document, SyntaxKind::EnumDeclaration);
    let members = document.children(declaration).unwrap();
    let [_, a, b, c] = members[..] else {
        panic!("expected a name and three members, found {members:?}");
    };

    document.remove(b).unwrap();
    assert_eq!(document.text(), "enum E { a, c }");

    document.remove(c).unwrap();
    assert_eq!(document.text(), "enum E { a }");
    assert_eq!(document.node(a).map(|member| member.text()), Ok("a"));
    assert_consistent(&document);
}

#[test]
fn removing_statements_sharing_a_line() {
    let mut document = Document::new("a.ts", "a; b; c;\nd; e;\n");
    let statements = document.children(document.root()).unwrap();
    let [a, b, _, d, e] = statements[..] else {
        panic!("expected five statements, found {statements:?}");
    };

    document.remove(b).unwrap();
    assert_eq!(document.text(), "a; c;\nd; e;\n");

    document.remove(e).unwrap();
    assert_eq!(document.text(), "a; c;\nd;\n");
    assert_eq!(document.node(a).map(|statement| statement.text()), Ok("a;"));
    assert_eq!(document.node(d).map(|statement| statement.range()), Ok(range(6, 8)));
    assert_consistent(&document);
}

#[test]
fn edits_shift_the_following_siblings() {
    let mut document = Document::new("a.ts", "let a = 1;\nlet b = 2;\n");
    let statements = document.children(document.root()).unwrap();
    let [a, b] = statements[..] else {
        panic!("expected two statements, found {statements:?}");
    };
    let declaration = child(&mut document, a, SyntaxKind::VariableDeclaration);
    let name = child(&mut document, declaration, SyntaxKind::Name);

    let renamed = document.replace_with_text(name, "alpha").unwrap();
    assert_ne!(renamed, name);
    assert!(document.is_forgotten(name));
    assert_eq!(document.text(), "let alpha = 1;\nlet b = 2;\n");
    assert_eq!(document.node(renamed).map(|name| name.range()), Ok(range(4, 9)));
    assert_eq!(document.node(renamed).map(|name| name.kind()), Ok(SyntaxKind::Name));
    assert_eq!(document.node(a).map(|statement| statement.range()), Ok(range(0, 14)));
    assert_eq!(document.node(b).map(|statement| statement.range()), Ok(range(15, 25)));
    assert_consistent(&document);
}

#[test]
fn inserting_a_sibling_after_the_target() {
    let mut document = Document::new("a.ts", "let a = 1;");
    let a = top_level(&mut document, SyntaxKind::VariableStatement);

    let (returned, warnings) =
        capture_warnings(|| document.insert_at(a, TextSize::from(10), "\nlet c = 3;"));
    assert_eq!(warnings, Vec::<String>::new());
    let returned = returned.unwrap();
    assert_eq!(document.text(), "let a = 1;\nlet c = 3;");
    assert_eq!(returned, a);
    assert!(!document.is_forgotten(a));
    assert_eq!(document.node(a).map(|statement| statement.range()), Ok(range(0, 10)));

    let statements = document.children(document.root()).unwrap();
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0], a);
    assert_consistent(&document);
}

#[test]
fn inserting_a_sibling_before_the_target() {
    let mut document = Document::new("a.ts", "let a = 1;\nlet b = 2;\n");
    let statements = document.children(document.root()).unwrap();
    let [a, b] = statements[..] else {
        panic!("expected two statements, found {statements:?}");
    };
    let declaration = child(&mut document, b, SyntaxKind::VariableDeclaration);

    let returned = document.insert_at(b, TextSize::from(11), "let z = 0;\n").unwrap();
    assert_eq!(document.text(), "let a = 1;\nlet z = 0;\nlet b = 2;\n");
    assert_eq!(returned, b);
    assert!(!document.is_forgotten(a));
    assert!(!document.is_forgotten(declaration));
    assert_eq!(document.node(a).map(|statement| statement.range()), Ok(range(0, 10)));
    assert_eq!(document.node(b).map(|statement| statement.range()), Ok(range(22, 32)));
    assert_eq!(document.node(declaration).map(|node| node.range()), Ok(range(26, 31)));
    assert_consistent(&document);
}

#[test]
fn replacing_a_node_with_another_kind() {
    let mut document = Document::new("a.ts", "let a = 1;\n");
    let statement = top_level(&mut document, SyntaxKind::VariableStatement);

    let result = document.replace_with_text(statement, "class C {}");
    assert!(matches!(
        result,
        Err(EditError::NodeForgotten { kind: SyntaxKind::VariableStatement, .. })
    ));
    assert_eq!(document.text(), "class C {}\n");
    assert_consistent(&document);
}

#[test]
fn ids_from_another_document_are_rejected() {
    let mut first = Document::new("a.ts", "let a = 1;\nlet b = 2;\n");
    let mut second = Document::new("b.ts", "let c = 3;\n");
    let statements = first.children(first.root()).unwrap();
    let foreign = statements[1];
    top_level(&mut second, SyntaxKind::VariableStatement);

    assert!(matches!(second.node(foreign), Err(EditError::InvalidArgument(_))));
    assert!(matches!(second.forget(foreign), Err(EditError::InvalidArgument(_))));
    assert!(matches!(second.remove(foreign), Err(EditError::InvalidArgument(_))));
    assert!(!second.is_forgotten(foreign));
    assert_eq!(second.last_known(foreign), None);
    assert_eq!(second.text(), "let c = 3;\n");
    assert_consistent(&second);
}

#[test]
fn replaced_nodes_are_forgotten() {
    let mut document = Document::new("a.ts", "let a = 1;\nlet b = 2;\n");
    let statements = document.children(document.root()).unwrap();
    let [a, b] = statements[..] else {
        panic!("expected two statements, found {statements:?}");
    };

    document.replace_range(document.root(), range(0, 10), "const z = 0;").unwrap();
    assert!(document.is_forgotten(a));
    assert_eq!(document.node(b).map(|statement| statement.start()), Ok(TextSize::from(13)));

    let replacement = top_level(&mut document, SyntaxKind::VariableStatement);
    assert_ne!(replacement, a);
    assert_eq!(document.node(replacement).map(|statement| statement.text()), Ok("const z = 0;"));
    assert_consistent(&document);
}

#[test]
fn structural_mismatches_are_logged() {
    let mut document = Document::new("a.ts", "let a = 1;\nlet b = 2;\nlet c = 3;\n");
    let statements = document.children(document.root()).unwrap();
    let [a, b, c] = statements[..] else {
        panic!("expected three statements, found {statements:?}");
    };

    let (result, warnings) =
        capture_warnings(|| document.insert_at(document.root(), TextSize::from(10), " /*"));

    assert!(result.is_ok());
    assert_eq!(warnings.len(), 2, "{warnings:#?}");
    for warning in &warnings {
        assert!(warning.contains("Structural mismatch"), "{warning}");
        assert!(warning.contains("kind=VariableStatement"), "{warning}");
        assert!(warning.contains("<|> /*"), "{warning}");
    }
    assert!(!document.is_forgotten(a));
    assert!(document.is_forgotten(b));
    assert!(document.is_forgotten(c));
    assert!(!document.diagnostics().is_empty());
    assert_consistent(&document);
}

#[test]
fn forgotten_nodes_are_rematerialized() {
    let mut document = Document::new("a.ts", "function f() {}\n");
    let function = top_level(&mut document, SyntaxKind::FunctionDeclaration);
    let name = child(&mut document, function, SyntaxKind::Name);

    document.forget(function).unwrap();
    assert!(document.is_forgotten(function));
    assert!(document.is_forgotten(name));

    let again = top_level(&mut document, SyntaxKind::FunctionDeclaration);
    assert_ne!(again, function);
    assert_eq!(document.node(again).map(|node| node.text()), Ok("function f() {}"));

    let root = document.root();
    assert!(matches!(document.forget(root), Err(EditError::InvalidArgument(_))));
    assert_consistent(&document);
}

#[test]
fn forgetting_descendants_keeps_the_node() {
    let mut document = Document::new("a.ts", "namespace N {\n    f();\n}\n");
    let namespace = top_level(&mut document, SyntaxKind::NamespaceDeclaration);
    let name = child(&mut document, namespace, SyntaxKind::Name);

    document.forget_descendants(namespace).unwrap();
    assert!(!document.is_forgotten(namespace));
    assert!(document.is_forgotten(name));
    assert_consistent(&document);
}

#[test]
fn unwrapping_a_namespace() {
    let source = "namespace N {\n    const a = 1;\n    f();\n}\nlet b = 2;\n";
    let mut document = Document::new("a.ts", source);
    let statements = document.children(document.root()).unwrap();
    let [namespace, b] = statements[..] else {
        panic!("expected two statements, found {statements:?}");
    };

    let unwrapped = document.unwrap(namespace).unwrap();
    assert_eq!(document.text(), "const a = 1;\nf();\nlet b = 2;\n");
    assert!(document.is_forgotten(namespace));

    let kinds: Vec<_> =
        unwrapped.iter().map(|&id| document.node(id).map(|node| node.kind())).collect();
    assert_eq!(kinds, [Ok(SyntaxKind::VariableStatement), Ok(SyntaxKind::ExpressionStatement)]);
    assert_eq!(document.node(b).map(|statement| statement.range()), Ok(range(18, 28)));
    assert_consistent(&document);
}

#[test]
fn unwrap_requires_a_body() {
    let mut document = Document::new("a.ts", "let a = 1;");
    let statement = top_level(&mut document, SyntaxKind::VariableStatement);

    let error = document.unwrap(statement);
    assert_eq!(
        error,
        Err(EditError::Unsupported { operation: "unwrap", kind: SyntaxKind::VariableStatement })
    );
    assert_eq!(document.version(), 0);
}

#[test]
fn inserting_statements_into_a_block() {
    let mut document = Document::new("a.ts", "namespace N {\n    const a = 1;\n}\n");
    let namespace = top_level(&mut document, SyntaxKind::NamespaceDeclaration);

    let inserted = document.insert_statements(namespace, 1, &["f();", "g();"]).unwrap();
    insta::assert_snapshot!(document.text(), @r"
    namespace N {
        const a = 1;
        f();
        g();
    }
    ");

    let texts: Vec<_> =
        inserted.iter().map(|&id| document.node(id).map(|node| node.text())).collect();
    assert_eq!(texts, [Ok("f();"), Ok("g();")]);
    assert_consistent(&document);
}

#[test]
fn inserting_statements_into_an_empty_file() {
    let mut document = Document::new("a.ts", "");
    let inserted = document.insert_statements(document.root(), 0, &["let a = 1;"]).unwrap();

    assert_eq!(document.text(), "let a = 1;\n");
    assert_eq!(inserted.len(), 1);
    assert_eq!(document.node(inserted[0]).map(|node| node.range()), Ok(range(0, 10)));
    assert_consistent(&document);
}

#[test]
fn toggling_export() {
    let mut document = Document::new("a.ts", "class C {}\n");
    let class = top_level(&mut document, SyntaxKind::ClassDeclaration);

    assert_eq!(document.is_exported(class), Ok(false));
    document.set_exported(class, true).unwrap();
    assert_eq!(document.text(), "export class C {}\n");
    assert_eq!(document.is_exported(class), Ok(true));

    document.set_exported(class, false).unwrap();
    assert_eq!(document.text(), "class C {}\n");
    assert_eq!(document.node(class).map(|class| class.range()), Ok(range(0, 10)));
    assert_consistent(&document);
}

#[test]
fn unsupported_operations() {
    let mut document = Document::new("a.ts", "class C {}\nlet a = 1;\n");
    let statements = document.children(document.root()).unwrap();
    let [class, variable] = statements[..] else {
        panic!("expected two statements, found {statements:?}");
    };

    assert_eq!(
        document.set_scope(class, Some(Scope::Private)),
        Err(EditError::Unsupported { operation: "set_scope", kind: SyntaxKind::ClassDeclaration })
    );
    assert_eq!(
        document.insert_member(variable, 0, "a"),
        Err(EditError::Unsupported {
            operation: "insert_member",
            kind: SyntaxKind::VariableStatement
        })
    );
    assert!(matches!(
        document.replace_range(class, range(5, 15), "x"),
        Err(EditError::InvalidArgument(_))
    ));

    let root = document.root();
    assert!(matches!(document.remove(root), Err(EditError::InvalidArgument(_))));
    assert_eq!(document.version(), 0);
}

#[test]
fn navigation() {
    let mut document = Document::new("a.ts", "let abc = f(1);\n");
    let root = document.root();

    let name = document.descendant_at(TextSize::from(5)).unwrap();
    assert_eq!(document.node(name).map(|node| node.kind()), Ok(SyntaxKind::Name));

    let call = document.first_descendant_of_kind(root, SyntaxKind::CallExpression).unwrap();
    let call = call.expect("a call expression");
    assert_eq!(document.node(call).map(|node| node.text()), Ok("f(1)"));

    let kinds: Vec<_> = document
        .descendants(root)
        .unwrap()
        .into_iter()
        .map(|id| document.node(id).map(|node| node.kind()))
        .collect::<Result<_, _>>()
        .unwrap();
    insta::assert_debug_snapshot!(kinds, @r"
    [
        VariableStatement,
        VariableDeclaration,
        Name,
        CallExpression,
        NameExpression,
        Name,
        ArgumentList,
        LiteralExpression,
    ]
    ");

    let parent = document.parent(call).unwrap().unwrap();
    assert_eq!(document.node(parent).map(|node| node.kind()), Ok(SyntaxKind::VariableDeclaration));
    assert!(document.descendant_at(TextSize::from(100)).is_err());
}

#[test]
fn custom_parsers_see_every_revision() {
    let parses = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&parses);
    let parser = move |file: &str, text: &str| -> Parsed {
        counter.fetch_add(1, Ordering::SeqCst);
        ReferenceParser.parse(file, text)
    };

    let mut document =
        Document::with_parser("a.ts", "let a = 1;", parser, ManipulationSettings::default());
    assert_eq!(parses.load(Ordering::SeqCst), 1);

    let root = document.root();
    document.insert_at(root, TextSize::from(10), "\nlet b = 2;").unwrap();
    document.insert_at(root, TextSize::from(0), "").unwrap();
    assert_eq!(parses.load(Ordering::SeqCst), 2);
    assert_eq!(document.version(), 1);
}

#[test]
fn settings_control_generated_text() {
    let settings = ManipulationSettings {
        indentation_text: IndentationText::TwoSpaces,
        new_line_kind: NewLineKind::CarriageReturnLineFeed,
    };
    let mut document = Document::with_parser("a.ts", "enum E {}", ReferenceParser, settings);
    let declaration = top_level(&mut document, SyntaxKind::EnumDeclaration);

    document.insert_member(declaration, 0, "m").unwrap();
    assert_eq!(document.text(), "enum E {\r\n  m\r\n}");
}

#[test]
fn documents_are_independent_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|index| {
            std::thread::spawn(move || {
                let mut document = Document::new(format!("{index}.ts"), "enum E {}\n");
                let declaration = top_level(&mut document, SyntaxKind::EnumDeclaration);
                for member in 0..index {
                    document.insert_member(declaration, member, &format!("m{member}")).unwrap();
                }
                assert_consistent(&document);
                document.text().to_string()
            })
        })
        .collect();

    let texts: Vec<String> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();
    assert_eq!(texts[0], "enum E {}\n");
    assert_eq!(texts[1], "enum E {\n    m0\n}\n");
    assert_eq!(texts[3], "enum E {\n    m0,\n    m1,\n    m2\n}\n");
}

#[test]
fn removing_a_range() {
    let mut document = Document::new("a.ts", "let a = 1;\nlet b = 2;\n");
    let statements = document.children(document.root()).unwrap();
    let [a, b] = statements[..] else {
        panic!("expected two statements, found {statements:?}");
    };

    document.remove_range(document.root(), range(10, 21)).unwrap();
    assert_eq!(document.text(), "let a = 1;\n");
    assert!(!document.is_forgotten(a));
    assert!(document.is_forgotten(b));

    let middle = document.remove_range(document.root(), range(4, 4));
    assert_eq!(middle, Ok(document.root()));
    assert_eq!(document.version(), 1);
    assert_consistent(&document);
}
