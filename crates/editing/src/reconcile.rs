//! Re-establishes wrapper identity against a freshly parsed tree.
//!
//! The old and new trees are walked in parallel from the root. Each
//! materialized child is placed relative to the edited range:
//!
//! * before the edit, it is matched against the new child with the same
//!   ordinal counted from the start;
//! * after the edit, it is matched against the new child with the same
//!   ordinal counted from the end, and its range is shifted by the delta;
//! * containing the edit, it is on the path to the edit and is visited
//!   the same way as the root;
//! * anything else overlaps the edit and is forgotten.
//!
//! A counterpart must agree on kind and on the expected range, otherwise the
//! wrapper's subtree is forgotten rather than bound to a different node.

use rustc_hash::FxHashSet;
use syntax::{SyntaxKind, SyntaxNode, TextRange, TextSize};

use crate::{
    EditRequest, LivenessTracker, NodeData, NodeId, WrapperRegistry,
    registry::{ChildSlot, children_index},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Mismatch {
    pub(crate) kind: SyntaxKind,
    pub(crate) range: TextRange,
}

#[derive(Debug, Default)]
pub(crate) struct ReconcileReport {
    pub(crate) rebound: usize,
    pub(crate) forgotten: usize,
    pub(crate) mismatched: Vec<Mismatch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Before,
    After,
    Path,
}

pub(crate) struct TreeReconciler<'r> {
    registry: &'r mut WrapperRegistry,
    liveness: &'r mut LivenessTracker,
    old_version: u64,
    new_version: u64,
    edited: TextRange,
    delta: i64,
    /// The wrapper an operation was invoked on, and its ancestors.
    focus: FxHashSet<NodeId>,
    report: ReconcileReport,
}

impl<'r> TreeReconciler<'r> {
    pub(crate) fn new(
        registry: &'r mut WrapperRegistry,
        liveness: &'r mut LivenessTracker,
        old_version: u64,
        request: &EditRequest,
        focus: FxHashSet<NodeId>,
    ) -> TreeReconciler<'r> {
        let new_version = old_version + 1;
        let edited = request.old_range();
        let delta = request.delta();
        let report = ReconcileReport::default();
        TreeReconciler {
            registry,
            liveness,
            old_version,
            new_version,
            edited,
            delta,
            focus,
            report,
        }
    }

    pub(crate) fn reconcile(mut self, root: NodeId, tree: SyntaxNode) -> ReconcileReport {
        let _span =
            tracing::debug_span!("reconcile", edited = ?self.edited, delta = self.delta).entered();
        self.visit_path(root, tree);
        self.report
    }

    fn shift(&self, offset: TextSize) -> TextSize {
        let offset = i64::from(u32::from(offset)) + self.delta;
        TextSize::from(offset as u32)
    }

    fn place(&self, id: NodeId, range: TextRange) -> Option<Placement> {
        let (start, end) = (range.start(), range.end());
        let (edit_start, edit_end) = (self.edited.start(), self.edited.end());

        if edit_start <= start && end <= edit_end {
            return None;
        }

        // Text inserted at the boundary of the focused node belongs to it.
        let contains = start <= edit_start && edit_end <= end;
        if contains && self.focus.contains(&id) {
            return Some(Placement::Path);
        }

        self.outside(range).or(contains.then_some(Placement::Path))
    }

    fn outside(&self, range: TextRange) -> Option<Placement> {
        if range.end() <= self.edited.start() {
            Some(Placement::Before)
        } else if range.start() >= self.edited.end() {
            Some(Placement::After)
        } else {
            None
        }
    }

    /// Whether `counterpart` is what a node on the path becomes after the edit.
    fn grown_into(&self, data: &NodeData, counterpart: &SyntaxNode) -> bool {
        let expected = TextRange::new(data.range.start(), self.shift(data.range.end()));
        counterpart.kind() == data.kind && counterpart.text_range() == expected
    }

    fn visit_path(&mut self, id: NodeId, counterpart: SyntaxNode) -> bool {
        let data = self.registry.data(id);
        if !self.grown_into(data, &counterpart) {
            tracing::trace!(?id, kind = ?data.kind, "Edited node was reshaped");
            self.forget(id);
            return false;
        }

        let old_count = data.syntax.as_ref().map_or(0, |syntax| syntax.children().count());
        let slots: Vec<ChildSlot> = data.children.entries().copied().collect();
        let new_children: Vec<SyntaxNode> = counterpart.children().collect();
        self.rebind(id, counterpart);

        let mut children = children_index();
        for slot in slots {
            let data = self.registry.data(slot.id);
            let Some(mut placement) = self.place(slot.id, data.range) else {
                self.forget(slot.id);
                continue;
            };

            // A focused node touching the edit keeps its identity when the
            // inserted text turned into a sibling instead.
            let outside = self.outside(data.range).filter(|_| placement == Placement::Path);
            if let Some(outside) = outside {
                let grown = new_children.get(slot.ordinal as usize);
                if !grown.is_some_and(|node| self.grown_into(data, node)) {
                    tracing::trace!(id = ?slot.id, ?outside, "Boundary text became a sibling");
                    placement = outside;
                }
            }

            let ordinal = match placement {
                Placement::Before | Placement::Path => Some(slot.ordinal as usize),
                Placement::After => {
                    (new_children.len() + slot.ordinal as usize).checked_sub(old_count)
                }
            };

            let Some((ordinal, node)) = ordinal
                .and_then(|ordinal| new_children.get(ordinal).map(|node| (ordinal, node.clone())))
            else {
                match placement {
                    Placement::Path => self.forget(slot.id),
                    Placement::Before | Placement::After => self.mismatch(slot.id),
                }
                continue;
            };

            let survived = match placement {
                Placement::Path => self.visit_path(slot.id, node),
                Placement::Before => self.visit_unchanged(slot.id, node, false),
                Placement::After => self.visit_unchanged(slot.id, node, true),
            };

            if survived {
                let ordinal = ordinal as u32;
                self.registry.data_mut(slot.id).ordinal = ordinal;
                children.set(ChildSlot { ordinal, id: slot.id });
            }
        }

        self.registry.data_mut(id).children = children;
        true
    }

    /// Rebinds a subtree lying entirely outside of the edit.
    fn visit_unchanged(&mut self, id: NodeId, counterpart: SyntaxNode, shifted: bool) -> bool {
        let data = self.registry.data(id);
        let expected = if shifted {
            TextRange::new(self.shift(data.range.start()), self.shift(data.range.end()))
        } else {
            data.range
        };
        if counterpart.kind() != data.kind || counterpart.text_range() != expected {
            self.mismatch(id);
            return false;
        }

        let slots: Vec<ChildSlot> = data.children.entries().copied().collect();
        let new_children: Vec<SyntaxNode> = counterpart.children().collect();
        self.rebind(id, counterpart);

        let mut children = children_index();
        for slot in slots {
            let Some(node) = new_children.get(slot.ordinal as usize) else {
                self.mismatch(slot.id);
                continue;
            };
            if self.visit_unchanged(slot.id, node.clone(), shifted) {
                children.set(slot);
            }
        }

        self.registry.data_mut(id).children = children;
        true
    }

    fn rebind(&mut self, id: NodeId, counterpart: SyntaxNode) {
        tracing::trace!(?id, range = ?counterpart.text_range(), "Rebound wrapper");
        self.registry.rebind(self.new_version, id, counterpart);
        self.report.rebound += 1;
    }

    fn mismatch(&mut self, id: NodeId) {
        let data = self.registry.data(id);
        let mismatch = Mismatch { kind: data.kind, range: data.range };
        self.report.mismatched.push(mismatch);
        self.forget(id);
    }

    fn forget(&mut self, id: NodeId) {
        self.report.forgotten += self.liveness.forget(self.registry, self.old_version, id);
    }
}
