#![allow(dead_code)]

pub mod trace;

use editing::{Document, NodeId, SyntaxKind};

pub fn child(document: &mut Document, id: NodeId, kind: SyntaxKind) -> NodeId {
    match document.first_child_of_kind(id, kind) {
        Ok(Some(child)) => child,
        result => panic!("expected a {kind:?} child, found {result:?}"),
    }
}

pub fn top_level(document: &mut Document, kind: SyntaxKind) -> NodeId {
    let root = document.root();
    child(document, root, kind)
}

pub fn assert_consistent(document: &Document) {
    let problems = document.check_consistency();
    assert!(problems.is_empty(), "{problems:#?}");
}
