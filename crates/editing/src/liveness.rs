use std::fmt;

use la_arena::{ArenaMap, Idx};
use rowan::GreenNode;
use smol_str::SmolStr;
use syntax::SyntaxKind;

use crate::{NodeData, NodeId, WrapperRegistry};

/// What a wrapper looked like when it was forgotten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastKnown {
    pub kind: SyntaxKind,
    green: Option<GreenNode>,
}

impl LastKnown {
    /// The node's source text, rendered on demand.
    pub fn text(&self) -> SmolStr {
        self.green.as_ref().map(|green| SmolStr::new(green.to_string())).unwrap_or_default()
    }
}

/// Owns the forgotten state of every wrapper.
///
/// Forgetting is terminal, and a forgotten wrapper's descendants are always
/// forgotten with it.
#[derive(Default)]
pub struct LivenessTracker {
    forgotten: ArenaMap<Idx<NodeData>, LastKnown>,
}

impl fmt::Debug for LivenessTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LivenessTracker").finish_non_exhaustive()
    }
}

impl LivenessTracker {
    pub fn is_forgotten(&self, id: NodeId) -> bool {
        self.forgotten.contains_idx(id.index)
    }

    pub fn last_known(&self, id: NodeId) -> Option<&LastKnown> {
        self.forgotten.get(id.index)
    }

    /// Forgets `id` and its materialized descendants, returning how many
    /// wrappers were newly forgotten.
    pub(crate) fn forget(&mut self, registry: &mut WrapperRegistry, version: u64, id: NodeId) -> usize {
        if self.is_forgotten(id) {
            return 0;
        }
        registry.detach(id);
        self.forget_subtree(registry, version, id)
    }

    fn forget_subtree(&mut self, registry: &mut WrapperRegistry, version: u64, id: NodeId) -> usize {
        let data = registry.data_mut(id);
        let kind = data.kind;
        let syntax = data.syntax.take();
        let children: Vec<NodeId> = data.children.entries().map(|slot| slot.id).collect();
        data.children.clear();

        let green = syntax.map(|syntax| {
            registry.unbind(version, &syntax);
            syntax.green().into_owned()
        });

        tracing::trace!(?id, ?kind, "Forgot wrapper");
        self.forgotten.insert(id.index, LastKnown { kind, green });

        let descendants: usize =
            children.into_iter().map(|child| self.forget_subtree(registry, version, child)).sum();
        1 + descendants
    }
}
