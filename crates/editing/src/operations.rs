//! Mutating operations on wrappers.

use std::iter;

use syntax::{SyntaxElement, SyntaxKind, SyntaxNode, TextRange, TextSize};

use crate::{
    Document, EditError, Insertion, NodeId, RemoveChildren, TextManipulator, TrimOptions, Unwrap,
    capabilities::{braces, capabilities, unsupported},
};

const SEPARATING_LINE: TrimOptions = TrimOptions {
    preceding_spaces: true,
    preceding_newlines: false,
    following_spaces: true,
    following_newlines: true,
};

impl Document {
    pub fn insert_at(
        &mut self,
        id: NodeId,
        position: TextSize,
        text: &str,
    ) -> Result<NodeId, EditError> {
        self.replace_range(id, TextRange::empty(position), text)
    }

    pub fn remove_range(&mut self, id: NodeId, range: TextRange) -> Result<NodeId, EditError> {
        self.replace_range(id, range, "")
    }

    /// Replaces `range` within the node, returning the node's wrapper afterwards.
    ///
    /// A forgotten node is stood in for by the node of the same kind that now
    /// spans its range. Without one, the edit is kept and the error reports
    /// the node as forgotten.
    pub fn replace_range(
        &mut self,
        id: NodeId,
        range: TextRange,
        text: &str,
    ) -> Result<NodeId, EditError> {
        let _span = tracing::info_span!("replace_range", ?id, ?range).entered();

        let node = self.node(id)?;
        let kind = node.kind();
        let node_range = node.range();
        if !node_range.contains_range(range) {
            return Err(EditError::invalid(format!(
                "{range:?} is outside of {kind:?}@{node_range:?}"
            )));
        }
        self.check_boundary(range.start())?;
        self.check_boundary(range.end())?;

        let insertion = Insertion::replace(range, text);
        let delta = insertion.edit(self.text()).delta();
        self.apply(id, &insertion)?;

        if !self.is_forgotten(id) {
            return Ok(id);
        }

        let end = i64::from(u32::from(node_range.end())) + delta;
        let expected = TextRange::new(node_range.start(), TextSize::from(end as u32));
        match self.exact_stand_in(expected, |candidate| candidate == kind) {
            Some(stand_in) => Ok(stand_in),
            None => self.node(id).map(|live| live.id()),
        }
    }

    pub fn replace_with_text(&mut self, id: NodeId, text: &str) -> Result<NodeId, EditError> {
        let range = self.node(id)?.range();
        self.replace_range(id, range, text)
    }

    /// Replaces a body owner with the contents of its body, returning the
    /// statements that took its place.
    pub fn unwrap(&mut self, id: NodeId) -> Result<Vec<NodeId>, EditError> {
        let _span = tracing::info_span!("unwrap", ?id).entered();

        let node = self.node(id)?;
        let kind = node.kind();
        let range = node.range();
        let syntax = node.syntax().clone();
        let Some(parent) = node.parent() else {
            return Err(EditError::invalid("the root node cannot be unwrapped"));
        };

        let Some(owner) = capabilities(kind).body else {
            return Err(unsupported("unwrap", kind));
        };
        let Some(body) = owner.body(&syntax) else {
            return Err(EditError::invalid(format!("{kind:?} has no body")));
        };
        let Some((left, right)) = braces(&body) else {
            return Err(EditError::invalid(format!("{kind:?} has an unterminated body")));
        };

        let settings = self.settings();
        let unwrap = Unwrap {
            range,
            body: TextRange::new(left.end(), right.start()),
            indentation: settings.indentation_text,
            new_line: settings.new_line_kind,
        };
        let replaced = unwrap.edit(self.text()).new_range();
        self.apply(parent, &unwrap)?;

        let mut statements = vec![];
        outermost_statements(&self.tree_root(), replaced, &mut statements);
        Ok(statements.into_iter().map(|statement| self.wrap(statement)).collect())
    }

    /// Removes the node from the document along with its separating trivia.
    pub fn remove(&mut self, id: NodeId) -> Result<(), EditError> {
        let _span = tracing::info_span!("remove", ?id).entered();

        let node = self.node(id)?;
        let syntax = node.syntax().clone();
        let range = node.range();
        let Some(parent) = node.parent() else {
            return Err(EditError::invalid("the root node cannot be removed"));
        };

        // A node on a line of its own takes the whole line with it. Otherwise it
        // takes the spaces after it, and those before it when it ends the line.
        let starts_line = self.starts_line(range.start());
        let trim = |end: TextSize| {
            if starts_line {
                SEPARATING_LINE
            } else {
                let preceding_spaces = self.ends_line(end);
                TrimOptions { preceding_spaces, following_spaces: true, ..TrimOptions::default() }
            }
        };

        let remove = if is_comma_separated(&syntax) {
            if let Some(comma) = next_significant(&syntax).filter(is_comma) {
                let range = TextRange::new(range.start(), comma.text_range().end());
                RemoveChildren::new(range, trim(range.end()))
            } else if let Some(comma) = previous_significant(&syntax).filter(is_comma) {
                let range = TextRange::new(comma.text_range().start(), range.end());
                RemoveChildren::new(range, TrimOptions::default())
            } else {
                RemoveChildren::new(range, trim(range.end()))
            }
        } else {
            RemoveChildren::new(range, trim(range.end()))
        };

        self.apply(parent, &remove)?;
        if !self.is_forgotten(id) {
            self.forget(id)?;
        }

        Ok(())
    }

    pub(crate) fn check_boundary(&self, offset: TextSize) -> Result<(), EditError> {
        if self.text().is_char_boundary(usize::from(offset)) {
            Ok(())
        } else {
            Err(EditError::invalid(format!("{offset:?} is not on a character boundary")))
        }
    }

    pub(crate) fn tree_root(&self) -> SyntaxNode {
        let Ok(root) = self.node(self.root()) else {
            unreachable!("invariant violated: the root node is always live");
        };
        root.syntax().clone()
    }

    fn starts_line(&self, offset: TextSize) -> bool {
        let before = self.text()[..usize::from(offset)].trim_end_matches([' ', '\t']);
        before.is_empty() || before.ends_with('\n')
    }

    fn ends_line(&self, offset: TextSize) -> bool {
        let after = self.text()[usize::from(offset)..].trim_start_matches([' ', '\t']);
        after.is_empty() || after.starts_with(['\r', '\n'])
    }

    /// Returns the leading whitespace of the line containing `offset`.
    pub(crate) fn indentation_at(&self, offset: TextSize) -> String {
        let text = self.text();
        let offset = usize::from(offset);
        let line_start = text[..offset].rfind('\n').map_or(0, |index| index + 1);
        text[line_start..].chars().take_while(|c| matches!(c, ' ' | '\t')).collect()
    }
}

fn outermost_statements(node: &SyntaxNode, range: TextRange, output: &mut Vec<SyntaxNode>) {
    for child in node.children() {
        let child_range = child.text_range();
        if range.contains_range(child_range) && child.kind().is_statement() {
            output.push(child);
        } else if child_range.intersect(range).is_some_and(|overlap| !overlap.is_empty()) {
            outermost_statements(&child, range, output);
        }
    }
}

fn is_comma_separated(node: &SyntaxNode) -> bool {
    match node.kind() {
        SyntaxKind::EnumMember | SyntaxKind::Parameter | SyntaxKind::VariableDeclaration => true,
        _ => node.parent().is_some_and(|parent| parent.kind() == SyntaxKind::ArgumentList),
    }
}

fn is_comma(element: &SyntaxElement) -> bool {
    element.kind() == SyntaxKind::COMMA
}

pub(crate) fn next_significant(node: &SyntaxNode) -> Option<SyntaxElement> {
    iter::successors(node.next_sibling_or_token(), |element| element.next_sibling_or_token())
        .find(|element| !element.kind().is_whitespace_or_comment())
}

pub(crate) fn previous_significant(node: &SyntaxNode) -> Option<SyntaxElement> {
    iter::successors(node.prev_sibling_or_token(), |element| element.prev_sibling_or_token())
        .find(|element| !element.kind().is_whitespace_or_comment())
}
