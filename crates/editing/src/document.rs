use std::{iter, ops::Range, sync::Arc};

use parsing::ParseError;
use rowan::NodeOrToken;
use rustc_hash::FxHashSet;
use syntax::{SyntaxKind, SyntaxNode, TextRange, TextSize};

use crate::{
    DocumentReplacer, EditError, LastKnown, LivenessTracker, ManipulationSettings, NodeData,
    NodeId, ReferenceParser, SourceParser, TextManipulator, WrapperRegistry,
    reconcile::TreeReconciler,
};

/// An open file, its current parse, and the wrappers handed out for it.
#[derive(Debug)]
pub struct Document {
    file: String,
    text: String,
    version: u64,
    root: NodeId,
    tree: SyntaxNode,
    diagnostics: Arc<[ParseError]>,
    settings: ManipulationSettings,
    replacer: DocumentReplacer,
    registry: WrapperRegistry,
    liveness: LivenessTracker,
}

/// A wrapper that was checked to be live.
#[derive(Debug, Clone, Copy)]
pub struct Live<'d> {
    id: NodeId,
    data: &'d NodeData,
    syntax: &'d SyntaxNode,
    source: &'d str,
}

impl<'d> Live<'d> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    pub fn range(&self) -> TextRange {
        self.data.range
    }

    pub fn start(&self) -> TextSize {
        self.data.range.start()
    }

    pub fn end(&self) -> TextSize {
        self.data.range.end()
    }

    pub fn text(&self) -> &'d str {
        &self.source[self.data.range]
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.data.parent
    }

    pub fn syntax(&self) -> &'d SyntaxNode {
        self.syntax
    }
}

impl Document {
    pub fn new(file: impl Into<String>, text: impl Into<String>) -> Document {
        Document::with_parser(file, text, ReferenceParser, ManipulationSettings::default())
    }

    pub fn with_parser(
        file: impl Into<String>,
        text: impl Into<String>,
        parser: impl SourceParser + 'static,
        settings: ManipulationSettings,
    ) -> Document {
        let file = file.into();
        let text = text.into();
        let replacer = DocumentReplacer::new(parser);

        let parsed = replacer.parse(&file, &text);
        let tree = SyntaxNode::new_root(parsed.root);
        let diagnostics = parsed.errors;

        let version = 0;
        let mut registry = WrapperRegistry::default();
        let liveness = LivenessTracker::default();
        let root = registry.get_or_create(version, tree.clone(), None, 0);

        Document {
            file,
            text,
            version,
            root,
            tree,
            diagnostics,
            settings,
            replacer,
            registry,
            liveness,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn diagnostics(&self) -> &[ParseError] {
        &self.diagnostics
    }

    pub fn settings(&self) -> ManipulationSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: ManipulationSettings) {
        self.settings = settings;
    }

    /// Returns a live view of `id`, the only way to read a wrapper.
    pub fn node(&self, id: NodeId) -> Result<Live<'_>, EditError> {
        if !self.registry.owns(id) {
            return Err(EditError::invalid(format!("{id:?} belongs to another document")));
        }
        if let Some(known) = self.liveness.last_known(id) {
            return Err(EditError::NodeForgotten { kind: known.kind, text: known.text() });
        }

        let data = self.registry.data(id);
        let Some(syntax) = &data.syntax else {
            unreachable!("invariant violated: live wrapper without a syntax node");
        };

        Ok(Live { id, data, syntax, source: &self.text })
    }

    /// Ids issued by another document are never forgotten here.
    pub fn is_forgotten(&self, id: NodeId) -> bool {
        self.registry.owns(id) && self.liveness.is_forgotten(id)
    }

    pub fn last_known(&self, id: NodeId) -> Option<&LastKnown> {
        self.registry.owns(id).then(|| self.liveness.last_known(id)).flatten()
    }

    /// Forgets `id` and its descendants. Later accesses to the same parse
    /// node create a new wrapper.
    pub fn forget(&mut self, id: NodeId) -> Result<(), EditError> {
        if id == self.root {
            return Err(EditError::invalid("the root node cannot be forgotten"));
        }
        if !self.registry.owns(id) {
            return Err(EditError::invalid(format!("{id:?} belongs to another document")));
        }
        let forgotten = self.liveness.forget(&mut self.registry, self.version, id);
        tracing::debug!(?id, forgotten, "Forgot node");
        Ok(())
    }

    pub fn forget_descendants(&mut self, id: NodeId) -> Result<(), EditError> {
        self.node(id)?;
        let children: Vec<NodeId> =
            self.registry.data(id).children.entries().map(|slot| slot.id).collect();
        for child in children {
            self.liveness.forget(&mut self.registry, self.version, child);
        }
        Ok(())
    }

    pub fn children(&mut self, id: NodeId) -> Result<Vec<NodeId>, EditError> {
        let syntax = self.node(id)?.syntax().clone();
        let children = syntax
            .children()
            .enumerate()
            .map(|(ordinal, child)| {
                self.registry.get_or_create(self.version, child, Some(id), ordinal as u32)
            })
            .collect();
        Ok(children)
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, EditError> {
        Ok(self.node(id)?.parent())
    }

    pub fn first_child_of_kind(
        &mut self,
        id: NodeId,
        kind: SyntaxKind,
    ) -> Result<Option<NodeId>, EditError> {
        let syntax = self.node(id)?.syntax().clone();
        let child = syntax.children().find(|child| child.kind() == kind);
        Ok(child.map(|child| self.wrap(child)))
    }

    /// Returns the descendants of `id` in preorder, excluding `id` itself.
    pub fn descendants(&mut self, id: NodeId) -> Result<Vec<NodeId>, EditError> {
        let syntax = self.node(id)?.syntax().clone();
        let descendants = syntax.descendants().skip(1).map(|node| self.wrap(node)).collect();
        Ok(descendants)
    }

    pub fn first_descendant_of_kind(
        &mut self,
        id: NodeId,
        kind: SyntaxKind,
    ) -> Result<Option<NodeId>, EditError> {
        let syntax = self.node(id)?.syntax().clone();
        let descendant = syntax.descendants().skip(1).find(|node| node.kind() == kind);
        Ok(descendant.map(|node| self.wrap(node)))
    }

    /// Returns the innermost node whose range contains `offset`.
    pub fn descendant_at(&mut self, offset: TextSize) -> Result<NodeId, EditError> {
        if offset > self.tree.text_range().end() {
            let length = self.text.len();
            return Err(EditError::invalid(format!("offset {offset:?} is past the end ({length})")));
        }
        let node = self.covering_node(TextRange::empty(offset));
        Ok(self.wrap(node))
    }

    /// Returns the wrapper for a node of the current tree, materializing its
    /// ancestors on the way.
    pub(crate) fn wrap(&mut self, syntax: SyntaxNode) -> NodeId {
        if let Some(id) = self.registry.get(self.version, &syntax) {
            return id;
        }
        let (parent, ordinal) = match syntax.parent() {
            Some(parent) => {
                let ordinal = iter::successors(syntax.prev_sibling(), |node| node.prev_sibling());
                let ordinal = ordinal.count() as u32;
                (Some(self.wrap(parent)), ordinal)
            }
            None => (None, 0),
        };
        self.registry.get_or_create(self.version, syntax, parent, ordinal)
    }

    /// Returns the wrapper for the node that now occupies `expected`.
    ///
    /// Prefers the outermost node accepted by `accept` whose range is exactly
    /// `expected`, and falls back to the innermost node covering it.
    pub(crate) fn stand_in(
        &mut self,
        expected: TextRange,
        accept: impl Fn(SyntaxKind) -> bool,
    ) -> NodeId {
        let covering = self.covering_node(expected);
        let node = exact_node(&covering, expected, accept).unwrap_or(covering);
        self.wrap(node)
    }

    /// Like [`Document::stand_in`], without falling back to the covering node.
    pub(crate) fn exact_stand_in(
        &mut self,
        expected: TextRange,
        accept: impl Fn(SyntaxKind) -> bool,
    ) -> Option<NodeId> {
        let covering = self.covering_node(expected);
        let node = exact_node(&covering, expected, accept)?;
        Some(self.wrap(node))
    }

    fn covering_node(&self, range: TextRange) -> SyntaxNode {
        match self.tree.covering_element(range) {
            NodeOrToken::Node(node) => node,
            NodeOrToken::Token(token) => token.parent().unwrap_or_else(|| self.tree.clone()),
        }
    }

    /// Runs an edit through the replace and reconcile pipeline.
    ///
    /// `focus` and its ancestors keep their identity when the edit touches
    /// their boundaries. Returns `false` if the edit was empty.
    pub(crate) fn apply(
        &mut self,
        focus: NodeId,
        manipulator: &dyn TextManipulator,
    ) -> Result<bool, EditError> {
        self.node(focus)?;

        let request = manipulator.edit(&self.text);
        if request.is_empty() {
            tracing::debug!("Skipped empty edit");
            return Ok(false);
        }

        let (text, parsed) = self.replacer.replace(&self.file, &self.text, &request);
        let tree = SyntaxNode::new_root(parsed.root);

        let focus = iter::successors(Some(focus), |&id| self.registry.data(id).parent);
        let focus: FxHashSet<NodeId> = focus.collect();

        let reconciler = TreeReconciler::new(
            &mut self.registry,
            &mut self.liveness,
            self.version,
            &request,
            focus,
        );
        let report = reconciler.reconcile(self.root, tree.clone());

        if !report.mismatched.is_empty() {
            let edit = manipulator.describe_edit_for_error(&text);
            for mismatch in &report.mismatched {
                tracing::warn!(
                    kind = ?mismatch.kind,
                    range = ?mismatch.range,
                    "Structural mismatch, forgetting subtree {edit}"
                );
            }
        }

        self.registry.drop_generation(self.version);
        self.version += 1;
        self.text = text;
        self.tree = tree;
        self.diagnostics = parsed.errors;

        if self.liveness.is_forgotten(self.root) {
            self.root = self.registry.get_or_create(self.version, self.tree.clone(), None, 0);
        }

        tracing::debug!(
            version = self.version,
            delta = request.delta(),
            rebound = report.rebound,
            forgotten = report.forgotten,
            "Committed edit"
        );

        Ok(true)
    }

    /// Lists every way the live wrappers disagree with the current tree.
    pub fn check_consistency(&self) -> Vec<String> {
        let mut problems = vec![];

        for (id, data) in self.registry.iter() {
            if self.liveness.is_forgotten(id) {
                if data.syntax.is_some() {
                    problems.push(format!("{id:?} is forgotten but still bound"));
                }
                continue;
            }

            let Some(syntax) = &data.syntax else {
                problems.push(format!("{id:?} is live but unbound"));
                continue;
            };

            if self.registry.get(self.version, syntax) != Some(id) {
                problems.push(format!("{id:?} is not bound to version {}", self.version));
            }
            if syntax.ancestors().last().as_ref() != Some(&self.tree) {
                problems.push(format!("{id:?} belongs to a superseded tree"));
            }
            if syntax.kind() != data.kind {
                problems.push(format!("{id:?} is {:?} but bound to {:?}", data.kind, syntax.kind()));
            }
            if syntax.text_range() != data.range {
                problems.push(format!(
                    "{id:?} has range {:?} but is bound to {:?}",
                    data.range,
                    syntax.text_range()
                ));
            } else {
                let text = self.text.get(Range::<usize>::from(data.range));
                if text.is_none_or(|text| syntax.to_string() != text) {
                    problems.push(format!("{id:?} does not match the document text"));
                }
            }

            let parent = data.parent.map(|parent| self.registry.data(parent).syntax.as_ref());
            match (parent, syntax.parent()) {
                (None, None) => (),
                (Some(Some(expected)), Some(actual)) if *expected == actual => (),
                _ => problems.push(format!("{id:?} has an inconsistent parent")),
            }

            for slot in data.children.entries() {
                let child = self.registry.data(slot.id);
                let expected = syntax.children().nth(slot.ordinal as usize);
                if child.ordinal != slot.ordinal || child.syntax.is_none() || child.syntax != expected {
                    problems.push(format!("{id:?} has an inconsistent child {:?}", slot.id));
                }
            }
        }

        problems
    }
}

/// The outermost ancestor of `covering` accepted by `accept` that spans exactly `expected`.
fn exact_node(
    covering: &SyntaxNode,
    expected: TextRange,
    accept: impl Fn(SyntaxKind) -> bool,
) -> Option<SyntaxNode> {
    covering.ancestors().filter(|node| accept(node.kind()) && node.text_range() == expected).last()
}
